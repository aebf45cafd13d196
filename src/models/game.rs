//! Match, its status and set scores.

use crate::models::{ParseEnumError, TeamId, TournamentCategoryId, TournamentId};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Database id of a match.
pub type MatchId = i64;

/// Which side of a match won.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    One,
    Two,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Walkover,
    Cancelled,
}

impl MatchStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "scheduled",
            MatchStatus::InProgress => "in_progress",
            MatchStatus::Completed => "completed",
            MatchStatus::Walkover => "walkover",
            MatchStatus::Cancelled => "cancelled",
        }
    }

    /// Map the free-text STATUS column of an import file.
    pub fn from_import_text(text: &str) -> Self {
        let text = text.trim().to_lowercase();
        if text.contains("conclu") {
            MatchStatus::Completed
        } else if text.contains("desist") || text == "w.o." {
            MatchStatus::Walkover
        } else {
            MatchStatus::Scheduled
        }
    }

    /// Completed and walkover matches count towards standings.
    pub fn is_decided(self) -> bool {
        matches!(self, MatchStatus::Completed | MatchStatus::Walkover)
    }
}

impl FromStr for MatchStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(MatchStatus::Scheduled),
            "in_progress" => Ok(MatchStatus::InProgress),
            "completed" => Ok(MatchStatus::Completed),
            "walkover" => Ok(MatchStatus::Walkover),
            "cancelled" => Ok(MatchStatus::Cancelled),
            _ => Err(ParseEnumError::new("match status", s)),
        }
    }
}

/// Games won by each side in one set. `None` where the token did not parse.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SetScore {
    pub team1: Option<u32>,
    pub team2: Option<u32>,
    /// Tiebreak points from `7/6(5)` notation; informational only.
    pub tiebreak: Option<u32>,
}

impl SetScore {
    /// Side that took the set, if both scores parsed and differ.
    pub fn winner(&self) -> Option<Side> {
        match (self.team1, self.team2) {
            (Some(a), Some(b)) if a > b => Some(Side::One),
            (Some(a), Some(b)) if b > a => Some(Side::Two),
            _ => None,
        }
    }
}

/// Values for inserting a match row.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NewMatch {
    pub tournament_id: TournamentId,
    pub tournament_category_id: TournamentCategoryId,
    pub match_number: i64,
    pub round: String,
    pub group_name: Option<String>,
    pub round_order: u8,
    pub court: Option<String>,
    pub scheduled_date: Option<NaiveDate>,
    pub scheduled_time: Option<NaiveTime>,
    pub team1_id: TeamId,
    pub team2_id: TeamId,
    pub winner_team_id: Option<TeamId>,
    pub result: Option<String>,
    pub status: MatchStatus,
    /// At most three sets.
    pub sets: Vec<SetScore>,
}

/// A stored match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub uuid: Uuid,
    #[serde(flatten)]
    pub data: NewMatch,
}

/// Score fields of a stored match that can be rewritten after import.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub winner_team_id: Option<TeamId>,
    pub result: Option<String>,
    pub status: MatchStatus,
    pub sets: Vec<SetScore>,
}
