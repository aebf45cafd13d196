//! Team labels ("First Last / First Last") to stored players and teams.

use crate::models::{
    Category, CategoryGender, CategoryId, Gender, NewPlayer, Player, PlayerId, PlayerName, Team,
};
use crate::store::{Store, StoreError};
use std::collections::HashMap;

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("team label {0:?} does not name exactly two players")]
    MalformedLabel(String),
    #[error("team label {0:?} names the same player twice")]
    SamePlayer(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Split a team label into its two players.
///
/// Each side's first token is the first name and the rest is the last name.
/// Returns `None` unless exactly two non-empty sides are present.
pub fn parse_team_players(label: &str) -> Option<[PlayerName; 2]> {
    let names = label
        .split(" / ")
        .map(|side| {
            let mut tokens = side.split_whitespace();
            let first_name = tokens.next()?;
            Some(PlayerName::new(first_name, tokens.collect::<Vec<_>>().join(" ")))
        })
        .collect::<Option<Vec<_>>>()?;
    <[PlayerName; 2]>::try_from(names).ok()
}

/// Gender for a player first seen at `position` (0 or 1) of a team label.
///
/// Mixed categories assume the woman is listed first. The sheets carry no gender
/// column, so this is a known approximation for mixed doubles.
pub fn infer_gender(category: CategoryGender, position: usize) -> Gender {
    match category {
        CategoryGender::Female => Gender::Female,
        CategoryGender::Male => Gender::Male,
        CategoryGender::Mixed if position == 0 => Gender::Female,
        CategoryGender::Mixed => Gender::Male,
    }
}

/// A resolved team label.
#[derive(Clone, Debug)]
pub struct ResolvedTeam {
    pub team: Team,
    pub players: [Player; 2],
}

/// Finds or creates players and teams, remembering them for one import run.
///
/// Players are matched by exact full name: "José Silva" and "Jose Silva" are two people.
#[derive(Debug, Default)]
pub struct IdentityResolver {
    players: HashMap<String, Player>,
    teams: HashMap<(PlayerId, PlayerId, CategoryId), Team>,
}

impl IdentityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve_player<S: Store + ?Sized>(
        &mut self,
        store: &S,
        name: &PlayerName,
        gender: Gender,
        level: u8,
    ) -> Result<Player, StoreError> {
        let full_name = name.full_name();
        if let Some(player) = self.players.get(&full_name) {
            return Ok(player.clone());
        }
        let player = store.upsert_player(&NewPlayer {
            name: name.clone(),
            gender,
            level,
        })?;
        self.players.insert(full_name, player.clone());
        Ok(player)
    }

    pub fn resolve_team<S: Store + ?Sized>(
        &mut self,
        store: &S,
        player_a: &Player,
        player_b: &Player,
        category_id: CategoryId,
    ) -> Result<Team, StoreError> {
        let key = (
            player_a.id.min(player_b.id),
            player_a.id.max(player_b.id),
            category_id,
        );
        if let Some(team) = self.teams.get(&key) {
            return Ok(team.clone());
        }
        let team = store.upsert_team(player_a.id, player_b.id, category_id)?;
        self.teams.insert(key, team.clone());
        Ok(team)
    }

    /// Resolve both players of `label` and their team in `category`.
    pub fn resolve_label<S: Store + ?Sized>(
        &mut self,
        store: &S,
        label: &str,
        category: &Category,
    ) -> Result<ResolvedTeam, IdentityError> {
        let [first, second] = parse_team_players(label)
            .ok_or_else(|| IdentityError::MalformedLabel(label.to_owned()))?;
        let player_a = self.resolve_player(
            store,
            &first,
            infer_gender(category.gender, 0),
            category.level,
        )?;
        let player_b = self.resolve_player(
            store,
            &second,
            infer_gender(category.gender, 1),
            category.level,
        )?;
        if player_a.id == player_b.id {
            return Err(IdentityError::SamePlayer(label.to_owned()));
        }
        let team = self.resolve_team(store, &player_a, &player_b, category.id)?;
        Ok(ResolvedTeam {
            team,
            players: [player_a, player_b],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_with_compound_last_names() {
        let [a, b] = parse_team_players("Ana Sofia Silva / Rita Costa").unwrap();
        assert_eq!(a, PlayerName::new("Ana", "Sofia Silva"));
        assert_eq!(b, PlayerName::new("Rita", "Costa"));
    }

    #[test]
    fn single_token_name_has_empty_last_name() {
        let [a, _] = parse_team_players("Ana / Rita Costa").unwrap();
        assert_eq!(a.last_name, "");
        assert_eq!(a.full_name(), "Ana");
    }

    #[test]
    fn labels_without_two_players_are_rejected() {
        assert!(parse_team_players("Ana Silva").is_none());
        assert!(parse_team_players("A B / C D / E F").is_none());
        assert!(parse_team_players("Ana Silva / ").is_none());
        assert!(parse_team_players("").is_none());
    }

    #[test]
    fn mixed_category_assumes_woman_first() {
        assert_eq!(infer_gender(CategoryGender::Mixed, 0), Gender::Female);
        assert_eq!(infer_gender(CategoryGender::Mixed, 1), Gender::Male);
        assert_eq!(infer_gender(CategoryGender::Male, 0), Gender::Male);
    }
}
