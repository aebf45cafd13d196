//! Round names and set scores as they appear in result sheets.
//!
//! Everything here is pure: no store access, no logging. Malformed input never
//! fails; it degrades to "unknown round" or "no winner".

use crate::models::{SetScore, Side};
use lazy_regex::regex_captures;
use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Result text recorded for a retirement.
pub const RETIREMENT: &str = "Desistência";
/// Result text recorded for a walkover.
pub const WALKOVER: &str = "W.O.";

const MAX_SETS: usize = 3;

/// Knockout stage, plus the champion pseudo-round used only for point lookups.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum Round {
    GroupStage,
    RoundOf32,
    RoundOf16,
    QuarterFinal,
    SemiFinal,
    Final,
    Champion,
}

impl Round {
    /// Rounds that can appear on a match, earliest first.
    pub const PLAYED: [Round; 6] = [
        Round::GroupStage,
        Round::RoundOf32,
        Round::RoundOf16,
        Round::QuarterFinal,
        Round::SemiFinal,
        Round::Final,
    ];

    /// Name used in result sheets and in the points table.
    pub fn name(self) -> &'static str {
        match self {
            Round::GroupStage => "Fase de grupos",
            Round::RoundOf32 => "R32",
            Round::RoundOf16 => "R16",
            Round::QuarterFinal => "Quartas de Final",
            Round::SemiFinal => "Semifinal",
            Round::Final => "Final",
            Round::Champion => "Campeão",
        }
    }

    /// Rank of the round; higher is later. Group stage is 1, champion 7.
    pub fn order(self) -> u8 {
        match self {
            Round::GroupStage => 1,
            Round::RoundOf32 => 2,
            Round::RoundOf16 => 3,
            Round::QuarterFinal => 4,
            Round::SemiFinal => 5,
            Round::Final => 6,
            Round::Champion => 7,
        }
    }

    /// Exact canonical name, including the champion pseudo-round.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::PLAYED
            .into_iter()
            .chain([Round::Champion])
            .find(|round| round.name() == name)
    }

    /// Best shared finishing position of a team whose tournament ended in this round.
    /// Group-stage exits have no fixed position.
    pub fn final_position(self) -> Option<u32> {
        match self {
            Round::Champion => Some(1),
            Round::Final => Some(2),
            Round::SemiFinal => Some(3),
            Round::QuarterFinal => Some(5),
            Round::RoundOf16 => Some(9),
            Round::RoundOf32 => Some(17),
            Round::GroupStage => None,
        }
    }
}

/// A round column value split into its canonical name, group label and order.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ParsedRound {
    pub name: String,
    pub group: Option<String>,
    /// 0 when the round is not recognized.
    pub order: u8,
}

impl ParsedRound {
    pub fn round(&self) -> Option<Round> {
        Round::from_name(&self.name).filter(|round| *round != Round::Champion)
    }
}

/// Parse a round such as `"Semifinal"` or `"Fase de grupos - G3"`.
/// Unrecognized text is kept verbatim with order 0.
pub fn parse_round(text: &str) -> ParsedRound {
    let text = text.trim();
    let group_stage = Round::GroupStage.name();
    if text.starts_with(group_stage) {
        return ParsedRound {
            name: group_stage.to_owned(),
            group: text
                .split(" - ")
                .nth(1)
                .map(str::trim)
                .filter(|group| !group.is_empty())
                .map(str::to_owned),
            order: Round::GroupStage.order(),
        };
    }
    let order = Round::PLAYED
        .into_iter()
        .find(|round| round.name() == text)
        .map_or(0, Round::order);
    ParsedRound {
        name: text.to_owned(),
        group: None,
        order,
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ParsedResult {
    /// No score was played: empty result, retirement or walkover.
    pub walkover: bool,
    pub sets: Vec<SetScore>,
}

impl ParsedResult {
    /// Side that won a strict majority of the sets with usable scores.
    pub fn winner(&self) -> Option<Side> {
        if self.walkover {
            return None;
        }
        let (mut one, mut two) = (0usize, 0usize);
        for set in &self.sets {
            match set.winner() {
                Some(Side::One) => one += 1,
                Some(Side::Two) => two += 1,
                None => {}
            }
        }
        match one.cmp(&two) {
            std::cmp::Ordering::Greater => Some(Side::One),
            std::cmp::Ordering::Less => Some(Side::Two),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Parse a result such as `"6/4 3/6 10/7"` or `"7/6(5) 6/4"`.
pub fn parse_result(text: &str) -> ParsedResult {
    let text = text.trim();
    if text.is_empty() || text == RETIREMENT || text == WALKOVER {
        return ParsedResult {
            walkover: true,
            sets: Vec::new(),
        };
    }
    ParsedResult {
        walkover: false,
        sets: text.split_whitespace().take(MAX_SETS).map(parse_set).collect(),
    }
}

fn parse_set(token: &str) -> SetScore {
    if let Some((_, team1, team2, tiebreak)) = regex_captures!(r"^(\d+)/(\d+)\((\d+)\)$", token) {
        return SetScore {
            team1: team1.parse().ok(),
            team2: team2.parse().ok(),
            tiebreak: tiebreak.parse().ok(),
        };
    }
    let mut scores = token.splitn(2, '/').map(|score| score.parse().ok());
    SetScore {
        team1: scores.next().flatten(),
        team2: scores.next().flatten(),
        tiebreak: None,
    }
}

/// Lowercase, strip diacritics and surrounding whitespace.
pub fn normalize_label(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_owned()
}

/// Decide which team won.
///
/// An explicit winner label that matches one of the teams wins outright, whatever
/// the score says. Without one, walkovers and retirements stay unresolved, and
/// otherwise the side with more sets wins.
pub fn determine_winner(
    result: &str,
    team1: &str,
    team2: &str,
    explicit_winner: Option<&str>,
) -> Option<Side> {
    if let Some(winner) = explicit_winner
        .map(normalize_label)
        .filter(|winner| !winner.is_empty())
    {
        if winner == normalize_label(team1) {
            return Some(Side::One);
        }
        if winner == normalize_label(team2) {
            return Some(Side::Two);
        }
    }
    parse_result(result).winner()
}
