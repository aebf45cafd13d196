//! Data structures for the league: tournaments, categories, players, teams, matches, standings.

mod game;
mod player;
mod standing;
mod tournament;

pub use game::{Match, MatchId, MatchOutcome, MatchStatus, NewMatch, SetScore, Side};
pub use player::{Gender, NewPlayer, Player, PlayerId, PlayerName, Team, TeamId};
pub use standing::{
    ClearSummary, PlayerTournamentResult, PointsTableEntry, RegistrationStatus,
    TournamentRegistration,
};
pub use tournament::{
    Category, CategoryGender, CategoryId, DrawFormat, NewCategory, NewTournament, Tier,
    Tournament, TournamentCategory, TournamentCategoryId, TournamentId, TournamentStatus,
};

/// A stored text value that does not name any variant of the target enum.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("invalid {kind}: {value:?}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}
