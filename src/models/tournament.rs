//! Tournament, tier, category and the per-tournament category link.

use crate::models::ParseEnumError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Database id of a tournament.
pub type TournamentId = i64;
/// Database id of a category.
pub type CategoryId = i64;
/// Database id of a tournament/category link.
pub type TournamentCategoryId = i64;

/// Tournament tier; together with the category level it selects the points row.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Ouro,
    Prata,
    Bronze,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Ouro, Tier::Prata, Tier::Bronze];

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Ouro => "OURO",
            Tier::Prata => "PRATA",
            Tier::Bronze => "BRONZE",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "OURO" => Ok(Tier::Ouro),
            "PRATA" => Ok(Tier::Prata),
            "BRONZE" => Ok(Tier::Bronze),
            _ => Err(ParseEnumError::new("tier", s)),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl TournamentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TournamentStatus::Scheduled => "scheduled",
            TournamentStatus::InProgress => "in_progress",
            TournamentStatus::Completed => "completed",
            TournamentStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for TournamentStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(TournamentStatus::Scheduled),
            "in_progress" => Ok(TournamentStatus::InProgress),
            "completed" => Ok(TournamentStatus::Completed),
            "cancelled" => Ok(TournamentStatus::Cancelled),
            _ => Err(ParseEnumError::new("tournament status", s)),
        }
    }
}

/// A stored tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub uuid: Uuid,
    pub name: String,
    /// Unique human code, e.g. "BT4500 PRATA 10-11 MAIO".
    pub code: String,
    pub tier: Tier,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub year: i32,
    pub status: TournamentStatus,
}

/// Values for creating a tournament. Creation is keyed by `code`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NewTournament {
    pub name: String,
    pub code: String,
    pub tier: Tier,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub year: i32,
    #[serde(default)]
    pub status: TournamentStatus,
}

/// Gender of a category. Mixed doubles pair one woman with one man.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum CategoryGender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "MX")]
    Mixed,
}

impl CategoryGender {
    pub fn as_str(self) -> &'static str {
        match self {
            CategoryGender::Male => "M",
            CategoryGender::Female => "F",
            CategoryGender::Mixed => "MX",
        }
    }

    /// Gender implied by a category code: `F*` female, `MX*` mixed, other `M*` male.
    /// Anything else is treated as mixed.
    pub fn from_code(code: &str) -> Self {
        if code.starts_with('F') {
            CategoryGender::Female
        } else if code.starts_with('M') && !code.starts_with("MX") {
            CategoryGender::Male
        } else {
            CategoryGender::Mixed
        }
    }
}

impl FromStr for CategoryGender {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "M" => Ok(CategoryGender::Male),
            "F" => Ok(CategoryGender::Female),
            "MX" => Ok(CategoryGender::Mixed),
            _ => Err(ParseEnumError::new("category gender", s)),
        }
    }
}

/// Reference category, e.g. `M1` (men's doubles, level 1).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub code: String,
    pub name: String,
    pub gender: CategoryGender,
    /// 1 = advanced, 2 = intermediate.
    pub level: u8,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NewCategory {
    pub code: String,
    pub name: String,
    pub gender: CategoryGender,
    pub level: u8,
}

impl NewCategory {
    /// Category derived from its code alone: gender from the prefix,
    /// level 1 iff the code ends in `1`.
    pub fn from_code(code: &str) -> Self {
        let gender = CategoryGender::from_code(code);
        let level = if code.ends_with('1') { 1 } else { 2 };
        let kind = match gender {
            CategoryGender::Female => "Femininos",
            CategoryGender::Male => "Masculinos",
            CategoryGender::Mixed => "Mistos",
        };
        Self {
            code: code.to_owned(),
            name: format!("Pares {kind} Nivel {level}"),
            gender,
            level,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawFormat {
    Elimination,
    GroupStage,
    #[default]
    Mixed,
}

impl DrawFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            DrawFormat::Elimination => "elimination",
            DrawFormat::GroupStage => "group_stage",
            DrawFormat::Mixed => "mixed",
        }
    }
}

impl FromStr for DrawFormat {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "elimination" => Ok(DrawFormat::Elimination),
            "group_stage" => Ok(DrawFormat::GroupStage),
            "mixed" => Ok(DrawFormat::Mixed),
            _ => Err(ParseEnumError::new("draw format", s)),
        }
    }
}

/// A category declared for one tournament, with its draw configuration.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentCategory {
    pub id: TournamentCategoryId,
    pub tournament_id: TournamentId,
    pub category: Category,
    pub draw_size: u32,
    pub format: DrawFormat,
}
