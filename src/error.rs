//! Errors of the import pipeline, the points engine and result corrections.

use crate::logic::IdentityError;
use crate::models::{PlayerId, TeamId, TournamentId};
use crate::store::StoreError;
use uuid::Uuid;

/// Failure of a whole import file. Nothing row-level ends up here.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("tournament {0} not found")]
    TournamentNotFound(TournamentId),
    #[error("could not read CSV file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse CSV file: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV file is empty")]
    EmptyFile,
    #[error("first row has no tournament code")]
    MissingTournamentCode,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Why a single CSV row was skipped.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum RowErrorKind {
    #[error("could not read row: {0}")]
    Unreadable(String),
    #[error("missing category")]
    MissingCategory,
    #[error("category not declared for this tournament: {0}")]
    UnknownCategory(String),
    #[error("missing team names")]
    MissingTeams,
    #[error("team label {0:?} does not name exactly two players")]
    MalformedTeam(String),
    #[error("team label {0:?} names the same player twice")]
    SamePlayer(String),
    #[error("both sides are the same team")]
    SameTeam,
    #[error("could not save row: {0}")]
    Persistence(String),
}

impl From<IdentityError> for RowErrorKind {
    fn from(e: IdentityError) -> Self {
        match e {
            IdentityError::MalformedLabel(label) => RowErrorKind::MalformedTeam(label),
            IdentityError::SamePlayer(label) => RowErrorKind::SamePlayer(label),
            IdentityError::Store(e) => RowErrorKind::Persistence(e.to_string()),
        }
    }
}

impl From<StoreError> for RowErrorKind {
    fn from(e: StoreError) -> Self {
        RowErrorKind::Persistence(e.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PointsError {
    #[error("tournament {0} not found")]
    TournamentNotFound(TournamentId),
    #[error("team {0} not found")]
    TeamNotFound(TeamId),
    #[error("{failed} player result(s) of team {team_id} not saved")]
    PlayerResultsNotSaved { team_id: TeamId, failed: usize },
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, thiserror::Error)]
pub enum MatchUpdateError {
    #[error("match {0} not found")]
    MatchNotFound(Uuid),
    #[error("team {0} did not play this match")]
    WinnerNotInMatch(TeamId),
    #[error("team {0} not found")]
    TeamNotFound(TeamId),
    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),
    #[error(transparent)]
    Store(#[from] StoreError),
}
