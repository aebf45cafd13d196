//! Correcting the result of a match after it was imported.

use crate::error::MatchUpdateError;
use crate::logic::score::{determine_winner, parse_result};
use crate::models::{Match, MatchOutcome, MatchStatus, Side, TeamId};
use crate::store::Store;
use serde::Deserialize;
use uuid::Uuid;

/// New result for a match. The winner is `winner_team_id` when given, then the
/// `winner` label, then the set count of `result`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize)]
pub struct ResultUpdate {
    #[serde(default)]
    pub result: String,
    pub winner_team_id: Option<TeamId>,
    /// Winning team as a "First Last / First Last" label, in either player order.
    pub winner: Option<String>,
    /// Defaults to completed.
    pub status: Option<MatchStatus>,
}

/// Label of a team in both player orders.
fn team_labels<S: Store + ?Sized>(
    store: &S,
    team_id: TeamId,
) -> Result<[String; 2], MatchUpdateError> {
    let team = store
        .team(team_id)?
        .ok_or(MatchUpdateError::TeamNotFound(team_id))?;
    let [a, b] = team.players().map(|id| {
        store
            .player(id)
            .map_err(MatchUpdateError::from)
            .and_then(|player| player.ok_or(MatchUpdateError::PlayerNotFound(id)))
    });
    let (a, b) = (a?.full_name, b?.full_name);
    Ok([format!("{a} / {b}"), format!("{b} / {a}")])
}

/// Re-parse `update.result` into set scores, resolve the winner and store it.
///
/// Standings are not touched; run the points engine again to reflect the change.
pub fn update_match_result<S: Store + ?Sized>(
    store: &S,
    uuid: Uuid,
    update: &ResultUpdate,
) -> Result<Match, MatchUpdateError> {
    let current = store
        .match_by_uuid(uuid)?
        .ok_or(MatchUpdateError::MatchNotFound(uuid))?;
    let (team1, team2) = (current.data.team1_id, current.data.team2_id);
    let result = update.result.trim();

    let winner = match update.winner_team_id {
        Some(id) if id == team1 || id == team2 => Some(id),
        Some(id) => return Err(MatchUpdateError::WinnerNotInMatch(id)),
        None => {
            let [label1, reversed1] = team_labels(store, team1)?;
            let [label2, reversed2] = team_labels(store, team2)?;
            let explicit = update.winner.as_deref();
            let winner = [(&label1, &label2), (&reversed1, &reversed2)]
                .into_iter()
                .find_map(|(l1, l2)| determine_winner("", l1, l2, explicit))
                .or_else(|| determine_winner(result, &label1, &label2, None))
                .map(|side| match side {
                    Side::One => team1,
                    Side::Two => team2,
                });
            winner
        }
    };

    let outcome = MatchOutcome {
        winner_team_id: winner,
        result: (!result.is_empty()).then(|| result.to_owned()),
        status: update.status.unwrap_or(MatchStatus::Completed),
        sets: parse_result(result).sets,
    };
    let updated = store
        .update_match_result(current.id, &outcome)?
        .ok_or(MatchUpdateError::MatchNotFound(uuid))?;
    log::info!(
        "Updated result of match {} ({}): {:?}, winner {:?}",
        updated.id,
        updated.data.round,
        outcome.result,
        outcome.winner_team_id
    );
    Ok(updated)
}
