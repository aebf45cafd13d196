//! League business logic: score parsing, player identity, CSV import and points.

mod identity;
mod import;
mod match_result;
mod points;
mod score;

pub use identity::{
    infer_gender, parse_team_players, IdentityError, IdentityResolver, ResolvedTeam,
};
pub use import::{
    category_code, clear_tournament_results, import_batch, import_from_csv, import_from_path,
    parse_date, parse_time, parse_tournament_code, BatchReport, CsvRow, FileOutcome, ImportOptions,
    ImportResult, ImportSummary, ImportTarget, Importer, RowError, TournamentRef,
    BATCH_SUMMARY_MAX_ERRORS, SUMMARY_MAX_ERRORS,
};
pub use match_result::{update_match_result, ResultUpdate};
pub use points::{
    award_tournament_points, compute_standings, recalculate_rankings, PointsResult, TeamStanding,
};
pub use score::{
    determine_winner, normalize_label, parse_result, parse_round, ParsedResult, ParsedRound,
    Round, RETIREMENT, WALKOVER,
};
