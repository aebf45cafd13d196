//! Player and Team data structures.

use crate::models::{CategoryId, ParseEnumError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Database id of a player.
pub type PlayerId = i64;
/// Database id of a team.
pub type TeamId = i64;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }
}

impl FromStr for Gender {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "M" => Ok(Gender::Male),
            "F" => Ok(Gender::Female),
            _ => Err(ParseEnumError::new("gender", s)),
        }
    }
}

/// First/last name pair as written in a team label.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerName {
    pub first_name: String,
    pub last_name: String,
}

impl PlayerName {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// `"First Last"`, trimmed. This is the player's identity key.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_owned()
    }
}

/// A stored player.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub uuid: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub gender: Gender,
    pub level: u8,
    /// Sum of points over all tournament results.
    pub total_points: i32,
    pub ranking: Option<u32>,
}

/// Values used when a player is seen for the first time.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewPlayer {
    pub name: PlayerName,
    pub gender: Gender,
    pub level: u8,
}

/// A doubles pair within a category. Stored with `player1_id < player2_id`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub uuid: Uuid,
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    pub category_id: CategoryId,
}

impl Team {
    pub fn players(&self) -> [PlayerId; 2] {
        [self.player1_id, self.player2_id]
    }

    /// The other member of the pair. `player` must belong to this team.
    fn partner_of(&self, player: PlayerId) -> PlayerId {
        if player == self.player1_id {
            self.player2_id
        } else {
            self.player1_id
        }
    }

    /// Each member paired with their partner.
    pub fn pairings(&self) -> [(PlayerId, PlayerId); 2] {
        self.players().map(|player| (player, self.partner_of(player)))
    }
}
