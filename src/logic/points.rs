//! Standings and ranking points for a tournament, recomputed from its decided matches.

use crate::error::PointsError;
use crate::logic::score::{parse_round, Round};
use crate::models::{
    CategoryId, Gender, PlayerId, PlayerTournamentResult, RegistrationStatus, TeamId, Tier,
    Tournament, TournamentCategoryId, TournamentId, TournamentRegistration,
};
use crate::store::{DecidedMatch, Store, StoreError};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Where one team finished and what it earned.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct TeamStanding {
    pub team_id: TeamId,
    pub category_id: CategoryId,
    pub tournament_category_id: TournamentCategoryId,
    pub level: u8,
    pub wins: u32,
    pub losses: u32,
    /// Round the team went out in, or "Campeão".
    pub final_round: String,
    pub final_position: Option<u32>,
    pub points: i32,
}

impl TeamStanding {
    pub fn is_champion(&self) -> bool {
        self.final_round == Round::Champion.name()
    }

    fn registration_status(&self) -> RegistrationStatus {
        if self.is_champion() {
            RegistrationStatus::Winner
        } else {
            RegistrationStatus::Eliminated
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct PointsResult {
    pub tournament_id: TournamentId,
    /// Teams whose standings were saved.
    pub teams_processed: usize,
    pub results: Vec<TeamStanding>,
}

/// Running record of a team while walking the matches.
#[derive(Debug)]
struct Tally {
    category_id: CategoryId,
    tournament_category_id: TournamentCategoryId,
    level: u8,
    wins: u32,
    losses: u32,
    /// Terminal round name and its order.
    terminal: Option<(String, u8)>,
}

impl Tally {
    fn new(m: &DecidedMatch) -> Self {
        Self {
            category_id: m.category_id,
            tournament_category_id: m.tournament_category_id,
            level: m.level,
            wins: 0,
            losses: 0,
            terminal: None,
        }
    }

    /// Record a terminal round unless a later one is already known.
    fn reach(&mut self, name: &str, order: u8) {
        if self.terminal.as_ref().map_or(true, |(_, known)| order > *known) {
            self.terminal = Some((name.to_owned(), order));
        }
    }
}

/// Walk decided matches, most advanced round first, and find each team's terminal round.
fn tally(matches: &[DecidedMatch]) -> BTreeMap<TeamId, Tally> {
    let mut teams = BTreeMap::new();
    for m in matches {
        let round = parse_round(&m.round);
        let loser = m.loser_team_id();

        let winner = teams.entry(m.winner_team_id).or_insert_with(|| Tally::new(m));
        winner.wins += 1;
        if round.round() == Some(Round::Final) {
            winner.reach(Round::Champion.name(), Round::Champion.order());
        }

        let loser = teams.entry(loser).or_insert_with(|| Tally::new(m));
        loser.losses += 1;
        loser.reach(&round.name, m.round_order.max(round.order));
    }
    teams
}

/// Points table lookups for one tier, memoized for the run. Missing rows are worth 0.
struct PointsLookup<'s, S: ?Sized> {
    store: &'s S,
    tier: Tier,
    cache: HashMap<(u8, String), i32>,
}

impl<'s, S: Store + ?Sized> PointsLookup<'s, S> {
    fn new(store: &'s S, tier: Tier) -> Self {
        Self {
            store,
            tier,
            cache: HashMap::new(),
        }
    }

    fn get(&mut self, level: u8, round_name: &str) -> Result<i32, StoreError> {
        let key = (level, round_name.to_owned());
        if let Some(points) = self.cache.get(&key) {
            return Ok(*points);
        }
        let points = self
            .store
            .points(self.tier, level, round_name)?
            .unwrap_or_default();
        self.cache.insert(key, points);
        Ok(points)
    }
}

/// Compute every team's standing without writing anything.
pub fn compute_standings<S: Store + ?Sized>(
    store: &S,
    tournament: &Tournament,
) -> Result<Vec<TeamStanding>, PointsError> {
    let matches = store.decided_matches(tournament.id)?;
    let mut lookup = PointsLookup::new(store, tournament.tier);
    let mut standings = Vec::new();
    for (team_id, tally) in tally(&matches) {
        // Teams that never lost and never won a final get the participation floor.
        let (final_round, _) = tally.terminal.unwrap_or_else(|| {
            (
                Round::GroupStage.name().to_owned(),
                Round::GroupStage.order(),
            )
        });
        standings.push(TeamStanding {
            team_id,
            category_id: tally.category_id,
            tournament_category_id: tally.tournament_category_id,
            level: tally.level,
            wins: tally.wins,
            losses: tally.losses,
            final_position: Round::from_name(&final_round).and_then(Round::final_position),
            points: lookup.get(tally.level, &final_round)?,
            final_round,
        });
    }
    Ok(standings)
}

/// Recompute and overwrite standings, player results and player totals for a tournament.
///
/// Safe to run any number of times. A team or player that fails to save is logged
/// and skipped; `teams_processed` counts the teams that were saved.
pub fn award_tournament_points<S: Store + ?Sized>(
    store: &S,
    tournament_id: TournamentId,
) -> Result<PointsResult, PointsError> {
    let tournament = store
        .tournament(tournament_id)?
        .ok_or(PointsError::TournamentNotFound(tournament_id))?;
    let standings = compute_standings(store, &tournament)?;

    let mut teams_processed = 0;
    let mut touched = BTreeSet::new();
    for standing in &standings {
        match save_standing(store, tournament_id, standing, &mut touched) {
            Ok(()) => teams_processed += 1,
            Err(e) => log::warn!(
                "Skipping team {} of tournament {}: {}",
                standing.team_id,
                tournament_id,
                e
            ),
        }
    }
    for player in touched {
        if let Err(e) = store.recompute_total_points(player) {
            log::warn!("Could not update total points of player {}: {}", player, e);
        }
    }
    log::info!(
        "Awarded points for tournament {} ({}): {} of {} teams saved",
        tournament.id,
        tournament.code,
        teams_processed,
        standings.len()
    );
    Ok(PointsResult {
        tournament_id,
        teams_processed,
        results: standings,
    })
}

/// Save one team's registration and both players' results.
///
/// Both players are attempted; the team fails if either result was not saved.
fn save_standing<S: Store + ?Sized>(
    store: &S,
    tournament_id: TournamentId,
    standing: &TeamStanding,
    touched: &mut BTreeSet<PlayerId>,
) -> Result<(), PointsError> {
    store.upsert_registration(&TournamentRegistration {
        tournament_id,
        tournament_category_id: standing.tournament_category_id,
        team_id: standing.team_id,
        status: standing.registration_status(),
        final_position: standing.final_position,
        points_earned: standing.points,
    })?;
    let team = store
        .team(standing.team_id)?
        .ok_or(PointsError::TeamNotFound(standing.team_id))?;
    let mut failed = 0;
    for (player, partner) in team.pairings() {
        let result = PlayerTournamentResult {
            player_id: player,
            tournament_id,
            category_id: team.category_id,
            team_id: team.id,
            partner_id: partner,
            final_round: standing.final_round.clone(),
            final_position: standing.final_position,
            points_earned: standing.points,
            matches_won: standing.wins,
            matches_lost: standing.losses,
        };
        match store.upsert_player_result(&result) {
            Ok(()) => {
                touched.insert(player);
            }
            Err(e) => {
                failed += 1;
                log::warn!(
                    "Skipping result of player {} in tournament {}: {}",
                    player,
                    tournament_id,
                    e
                );
            }
        }
    }
    if failed > 0 {
        return Err(PointsError::PlayerResultsNotSaved {
            team_id: team.id,
            failed,
        });
    }
    Ok(())
}

/// Rank active players by lifetime points, optionally within one gender.
pub fn recalculate_rankings<S: Store + ?Sized>(
    store: &S,
    gender: Option<Gender>,
) -> Result<usize, StoreError> {
    let ranked = store.rank_players(gender)?;
    log::info!("Ranked {} players", ranked);
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decided(
        id: i64,
        round: &str,
        order: u8,
        team1: TeamId,
        team2: TeamId,
        winner: TeamId,
    ) -> DecidedMatch {
        DecidedMatch {
            match_id: id,
            tournament_category_id: 1,
            category_id: 1,
            level: 1,
            round: round.to_owned(),
            round_order: order,
            team1_id: team1,
            team2_id: team2,
            winner_team_id: winner,
        }
    }

    #[test]
    fn elimination_round_never_regresses() {
        // Team 2 lost the semifinal and also a group match.
        let matches = [
            decided(1, "Final", 6, 1, 3, 1),
            decided(2, "Semifinal", 5, 1, 2, 1),
            decided(3, "Fase de grupos", 1, 2, 4, 4),
        ];
        let teams = tally(&matches);
        assert_eq!(teams[&2].terminal, Some(("Semifinal".to_owned(), 5)));
        assert_eq!(teams[&2].losses, 2);
        assert_eq!(teams[&1].terminal, Some(("Campeão".to_owned(), 7)));
        assert_eq!(teams[&3].terminal, Some(("Final".to_owned(), 6)));
        assert_eq!(teams[&4].terminal, None);
    }
}
