//! Derived standings (registrations, per-player results) and the points reference table.

use crate::models::{
    CategoryId, ParseEnumError, PlayerId, TeamId, Tier, TournamentCategoryId, TournamentId,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    #[default]
    Registered,
    Confirmed,
    Withdrawn,
    Eliminated,
    Winner,
}

impl RegistrationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RegistrationStatus::Registered => "registered",
            RegistrationStatus::Confirmed => "confirmed",
            RegistrationStatus::Withdrawn => "withdrawn",
            RegistrationStatus::Eliminated => "eliminated",
            RegistrationStatus::Winner => "winner",
        }
    }
}

impl FromStr for RegistrationStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "registered" => Ok(RegistrationStatus::Registered),
            "confirmed" => Ok(RegistrationStatus::Confirmed),
            "withdrawn" => Ok(RegistrationStatus::Withdrawn),
            "eliminated" => Ok(RegistrationStatus::Eliminated),
            "winner" => Ok(RegistrationStatus::Winner),
            _ => Err(ParseEnumError::new("registration status", s)),
        }
    }
}

/// Outcome of one team in one tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentRegistration {
    pub tournament_id: TournamentId,
    pub tournament_category_id: TournamentCategoryId,
    pub team_id: TeamId,
    pub status: RegistrationStatus,
    pub final_position: Option<u32>,
    pub points_earned: i32,
}

/// Outcome of one player in one category of one tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerTournamentResult {
    pub player_id: PlayerId,
    pub tournament_id: TournamentId,
    pub category_id: CategoryId,
    pub team_id: TeamId,
    pub partner_id: PlayerId,
    /// Label of the terminal round, e.g. "Semifinal" or "Campeão".
    pub final_round: String,
    pub final_position: Option<u32>,
    pub points_earned: i32,
    pub matches_won: u32,
    pub matches_lost: u32,
}

/// One row of the points reference table.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PointsTableEntry {
    pub tier: Tier,
    pub level: u8,
    pub round_name: String,
    pub round_order: u8,
    pub points: i32,
}

/// Rows removed by clearing a tournament's results.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ClearSummary {
    pub deleted_player_results: usize,
    pub deleted_matches: usize,
    pub deleted_registrations: usize,
}
