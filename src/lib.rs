//! Beach-tennis league: imports tournament result sheets and awards ranking points.

pub mod error;
pub mod logic;
pub mod models;
pub mod store;

pub use error::{ImportError, MatchUpdateError, PointsError, RowErrorKind};
pub use logic::{
    award_tournament_points, clear_tournament_results, compute_standings, determine_winner,
    import_batch, import_from_csv, import_from_path, parse_result, parse_round,
    recalculate_rankings, update_match_result, BatchReport, ImportOptions, ImportResult,
    ImportTarget, PointsResult, ResultUpdate, Round, TeamStanding,
};
pub use models::{
    Category, CategoryGender, Gender, Match, MatchStatus, Player, Team, Tier, Tournament,
    TournamentId, TournamentStatus,
};
pub use store::{SqliteStore, Store, StoreError};
