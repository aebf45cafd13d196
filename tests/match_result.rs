//! Integration tests for correcting a stored match result.

mod common;

use bt_league::models::{Match, MatchStatus, RegistrationStatus};
use bt_league::{
    award_tournament_points, import_from_csv, update_match_result, ImportOptions, ImportTarget,
    MatchUpdateError, ResultUpdate, SqliteStore, Store, Tier, Tournament,
};
use common::*;
use uuid::Uuid;

/// Store with `m1_draw` imported and points awarded.
fn awarded() -> (SqliteStore, Tournament) {
    let (store, t) = store_with_tournament(Tier::Prata);
    let result = import_from_csv(
        &store,
        csv(&m1_draw()).as_bytes(),
        ImportTarget::Tournament(t.id),
        ImportOptions::default(),
    )
    .unwrap();
    assert!(result.points_awarded.is_some());
    (store, t)
}

fn match_number(store: &SqliteStore, t: &Tournament, number: i64) -> Match {
    store
        .matches(t.id)
        .unwrap()
        .into_iter()
        .find(|m| m.data.match_number == number)
        .unwrap()
}

fn update(result: &str) -> ResultUpdate {
    ResultUpdate {
        result: result.to_owned(),
        ..ResultUpdate::default()
    }
}

#[test]
fn score_decides_the_winner_and_sets_are_stored() {
    let (store, t) = awarded();
    let last = match_number(&store, &t, 5);

    let updated = update_match_result(&store, last.uuid, &update("6/3 6/4")).unwrap();

    assert_eq!(updated.id, last.id);
    assert_eq!(updated.data.winner_team_id, Some(last.data.team1_id));
    assert_eq!(updated.data.status, MatchStatus::Completed);
    assert_eq!(updated.data.result.as_deref(), Some("6/3 6/4"));
    assert_eq!(updated.data.sets.len(), 2);
    assert_eq!(updated.data.sets[1].team2, Some(4));
    assert_eq!(match_number(&store, &t, 5), updated);
}

#[test]
fn points_rerun_reflects_the_corrected_final() {
    let (store, t) = awarded();
    let last = match_number(&store, &t, 5);
    let (joao_pedro, rui_nuno) = (last.data.team1_id, last.data.team2_id);

    update_match_result(&store, last.uuid, &update("6/3 6/4")).unwrap();
    award_tournament_points(&store, t.id).unwrap();

    let registrations = store.registrations(t.id).unwrap();
    let find = |team| registrations.iter().find(|r| r.team_id == team).unwrap();
    assert_eq!(find(joao_pedro).status, RegistrationStatus::Winner);
    assert_eq!(find(joao_pedro).points_earned, 400);
    assert_eq!(find(joao_pedro).final_position, Some(1));
    assert_eq!(find(rui_nuno).status, RegistrationStatus::Eliminated);
    assert_eq!(find(rui_nuno).points_earned, 280);
}

#[test]
fn winner_label_matches_in_either_player_order() {
    let (store, t) = awarded();
    let last = match_number(&store, &t, 5);

    let correction = ResultUpdate {
        winner: Some("Nuno Martins / Rui Dias".to_owned()),
        ..update("6/3 6/3")
    };
    let updated = update_match_result(&store, last.uuid, &correction).unwrap();
    assert_eq!(updated.data.winner_team_id, Some(last.data.team2_id));
}

#[test]
fn explicit_walkover_keeps_no_sets() {
    let (store, t) = awarded();
    let semi = match_number(&store, &t, 3);

    let correction = ResultUpdate {
        winner_team_id: Some(semi.data.team2_id),
        status: Some(MatchStatus::Walkover),
        ..update("W.O.")
    };
    let updated = update_match_result(&store, semi.uuid, &correction).unwrap();
    assert_eq!(updated.data.winner_team_id, Some(semi.data.team2_id));
    assert_eq!(updated.data.status, MatchStatus::Walkover);
    assert!(updated.data.sets.is_empty());
}

#[test]
fn winner_must_have_played_the_match() {
    let (store, t) = awarded();
    let last = match_number(&store, &t, 5);
    let outsider = match_number(&store, &t, 2).data.team2_id;

    let correction = ResultUpdate {
        winner_team_id: Some(outsider),
        ..update("6/0 6/0")
    };
    let err = update_match_result(&store, last.uuid, &correction).unwrap_err();
    assert!(matches!(err, MatchUpdateError::WinnerNotInMatch(id) if id == outsider));
    assert_eq!(match_number(&store, &t, 5), last);
}

#[test]
fn unknown_match_is_an_error() {
    let (store, _) = awarded();
    let uuid = Uuid::new_v4();
    let err = update_match_result(&store, uuid, &update("6/0 6/0")).unwrap_err();
    assert!(matches!(err, MatchUpdateError::MatchNotFound(u) if u == uuid));
}
