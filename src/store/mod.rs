//! Storage interface consumed by the import pipeline and the points engine.
//!
//! Every write keyed by a natural key is a single atomic upsert, so repeated
//! imports never duplicate categories, players, teams or standings.

mod sqlite;

pub use sqlite::SqliteStore;

use crate::models::{
    Category, CategoryId, ClearSummary, Gender, Match, MatchId, MatchOutcome, NewCategory,
    NewMatch, NewPlayer, NewTournament, Player, PlayerId, PlayerTournamentResult,
    PointsTableEntry, Team, TeamId, Tier, Tournament, TournamentCategory, TournamentCategoryId,
    TournamentId, TournamentRegistration,
};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Sql(#[from] rusqlite::Error),
}

/// A completed or walkover match with a winner, joined with its category.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct DecidedMatch {
    pub match_id: MatchId,
    pub tournament_category_id: TournamentCategoryId,
    pub category_id: CategoryId,
    pub level: u8,
    pub round: String,
    pub round_order: u8,
    pub team1_id: TeamId,
    pub team2_id: TeamId,
    pub winner_team_id: TeamId,
}

impl DecidedMatch {
    pub fn loser_team_id(&self) -> TeamId {
        if self.winner_team_id == self.team1_id {
            self.team2_id
        } else {
            self.team1_id
        }
    }
}

/// Relational store holding the league tables.
pub trait Store {
    fn tournament(&self, id: TournamentId) -> Result<Option<Tournament>, StoreError>;
    /// Find the tournament with `new.code`, or create it.
    fn upsert_tournament(&self, new: &NewTournament) -> Result<Tournament, StoreError>;

    fn category_by_code(&self, code: &str) -> Result<Option<Category>, StoreError>;
    /// Find the category with `new.code`, or create it.
    fn upsert_category(&self, new: &NewCategory) -> Result<Category, StoreError>;
    /// Link a category to a tournament; returns the existing link if present.
    fn declare_category(
        &self,
        tournament_id: TournamentId,
        category_id: CategoryId,
    ) -> Result<TournamentCategory, StoreError>;
    fn tournament_categories(
        &self,
        tournament_id: TournamentId,
    ) -> Result<Vec<TournamentCategory>, StoreError>;

    /// Find the player with the exact full name, or create one from `new`.
    fn upsert_player(&self, new: &NewPlayer) -> Result<Player, StoreError>;
    fn player(&self, id: PlayerId) -> Result<Option<Player>, StoreError>;
    /// Find the team formed by the two players in either order, or create it.
    fn upsert_team(
        &self,
        player_a: PlayerId,
        player_b: PlayerId,
        category_id: CategoryId,
    ) -> Result<Team, StoreError>;
    fn team(&self, id: TeamId) -> Result<Option<Team>, StoreError>;

    fn insert_match(&self, new: &NewMatch) -> Result<Match, StoreError>;
    fn match_by_uuid(&self, uuid: Uuid) -> Result<Option<Match>, StoreError>;
    /// Overwrite winner, result text, status and set scores; `None` if no such match.
    fn update_match_result(
        &self,
        id: MatchId,
        outcome: &MatchOutcome,
    ) -> Result<Option<Match>, StoreError>;
    fn matches(&self, tournament_id: TournamentId) -> Result<Vec<Match>, StoreError>;
    /// Completed/walkover matches with a winner, most advanced round first.
    fn decided_matches(&self, tournament_id: TournamentId) -> Result<Vec<DecidedMatch>, StoreError>;

    fn points(&self, tier: Tier, level: u8, round_name: &str) -> Result<Option<i32>, StoreError>;
    fn points_table(&self, tier: Option<Tier>) -> Result<Vec<PointsTableEntry>, StoreError>;

    /// Insert or overwrite the registration for (tournament, team).
    fn upsert_registration(&self, registration: &TournamentRegistration) -> Result<(), StoreError>;
    fn registrations(
        &self,
        tournament_id: TournamentId,
    ) -> Result<Vec<TournamentRegistration>, StoreError>;
    /// Insert or overwrite the result for (player, tournament, category).
    fn upsert_player_result(&self, result: &PlayerTournamentResult) -> Result<(), StoreError>;
    fn player_results(
        &self,
        tournament_id: TournamentId,
    ) -> Result<Vec<PlayerTournamentResult>, StoreError>;
    /// Set the player's lifetime total to the sum of all their results and return it.
    fn recompute_total_points(&self, player_id: PlayerId) -> Result<i32, StoreError>;

    /// Delete matches, registrations and player results of a tournament.
    /// Declared categories are kept; affected players' totals are recomputed.
    fn clear_results(&self, tournament_id: TournamentId) -> Result<ClearSummary, StoreError>;
    /// Write 1-based ranking positions by total points; returns the number of players ranked.
    fn rank_players(&self, gender: Option<Gender>) -> Result<usize, StoreError>;
}
