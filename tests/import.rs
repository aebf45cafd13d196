//! Integration tests for CSV import: row handling, identity reuse and re-imports.

mod common;

use bt_league::logic::{import_batch, ImportResult};
use bt_league::models::MatchStatus;
use bt_league::{
    import_from_csv, import_from_path, ImportError, ImportOptions, ImportTarget, RowErrorKind,
    SqliteStore, Store, Tier, TournamentId,
};
use common::*;

const NO_POINTS: ImportOptions = ImportOptions {
    calculate_points: false,
    clear_existing: false,
};

fn import(
    store: &SqliteStore,
    id: TournamentId,
    rows: &[String],
    options: ImportOptions,
) -> ImportResult {
    import_from_csv(store, csv(rows).as_bytes(), ImportTarget::Tournament(id), options).unwrap()
}

/// A semifinal row won 6/1 6/1 by `team1`.
fn won(number: u32, team1: &str, team2: &str) -> String {
    m1_row(number, "Semifinal", team1, team2, "", "6/1 6/1", "Concluído")
}

#[test]
fn imports_every_row_of_a_clean_sheet() {
    let (store, t) = store_with_tournament(Tier::Prata);
    let result = import(&store, t.id, &m1_draw(), NO_POINTS);

    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert_eq!(result.matches.len(), 5);
    assert_eq!(result.teams.len(), 4);
    assert_eq!(result.players.len(), 8);
    assert_eq!(store.matches(t.id).unwrap().len(), 5);
    assert!(result.points_awarded.is_none());
}

#[test]
fn match_fields_are_parsed_from_the_row() {
    let (store, t) = store_with_tournament(Tier::Prata);
    let result = import(&store, t.id, &m1_draw(), NO_POINTS);

    let group = &result.matches[0].data;
    assert_eq!(group.round, "Fase de grupos");
    assert_eq!(group.group_name.as_deref(), Some("G1"));
    assert_eq!(group.round_order, 1);
    assert_eq!(group.match_number, 1);
    assert_eq!(group.court.as_deref(), Some("Q1"));
    assert_eq!(group.status, MatchStatus::Completed);
    assert_eq!(group.sets.len(), 2);
    assert_eq!(group.winner_team_id, Some(group.team1_id));
    assert_eq!(group.scheduled_date.map(|d| d.to_string()).as_deref(), Some("2025-05-10"));

    let semi = &result.matches[3].data;
    assert_eq!(semi.winner_team_id, Some(semi.team2_id));
    assert_eq!(semi.sets.len(), 3);

    let last = &result.matches[4].data;
    assert_eq!(last.status, MatchStatus::Walkover);
    assert!(last.sets.is_empty());
    assert_eq!(last.winner_team_id, Some(last.team2_id));
    assert_eq!(last.result.as_deref(), Some("W.O."));
}

#[test]
fn bad_rows_are_reported_and_the_rest_imported() {
    let (store, t) = store_with_tournament(Tier::Prata);
    let mut rows = m1_draw();
    rows.insert(
        1,
        "BT4500,BT Espinho,X9 - Desconhecida,6,Final,Q1,10/05/2025,10:00h,\
         A B / C D,E F / G H,,6/1 6/1,Concluído"
            .to_owned(),
    );
    rows.insert(2, won(7, "Sozinho", RUI_NUNO));
    rows.insert(3, won(8, JOAO_PEDRO, ""));
    rows.insert(4, won(9, JOAO_PEDRO, "Pedro Costa / João Silva"));
    rows.insert(5, won(10, "Ana Lima / Ana Lima", RUI_NUNO));

    let result = import(&store, t.id, &rows, NO_POINTS);

    assert_eq!(result.matches.len(), 5);
    let kinds: Vec<_> = result.errors.iter().map(|e| e.kind.clone()).collect();
    assert_eq!(
        kinds,
        vec![
            RowErrorKind::UnknownCategory("X9".to_owned()),
            RowErrorKind::MalformedTeam("Sozinho".to_owned()),
            RowErrorKind::MissingTeams,
            RowErrorKind::SameTeam,
            RowErrorKind::SamePlayer("Ana Lima / Ana Lima".to_owned()),
        ]
    );
    // Header is line 1, the first data row line 2.
    assert_eq!(result.errors[0].line, Some(3));
    assert!(result.errors[0].row.is_some());
    assert_eq!(result.summary(2).errors.len(), 2);
    assert_eq!(result.summary(2).errors_count, 5);
}

#[test]
fn row_lines_count_blank_lines() {
    let (store, t) = store_with_tournament(Tier::Prata);
    let draw = m1_draw();
    let rows = vec![
        draw[0].clone(),
        String::new(),
        draw[1].clone(),
        won(6, "Sozinho", RUI_NUNO),
    ];
    let result = import(&store, t.id, &rows, NO_POINTS);

    assert_eq!(result.matches.len(), 2);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].line, Some(5));
}

#[test]
fn failed_match_insert_is_a_row_error() {
    let db = TempFile::new("db");
    let (store, t) = file_store_with_tournament(Tier::Prata, &db);
    db.connection()
        .execute_batch(
            "CREATE TRIGGER reject_third_match BEFORE INSERT ON matches
             WHEN NEW.match_number = 3
             BEGIN SELECT RAISE(ABORT, 'match rejected'); END;",
        )
        .unwrap();

    let result = import(&store, t.id, &m1_draw(), NO_POINTS);

    assert_eq!(result.matches.len(), 4);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].line, Some(4));
    match &result.errors[0].kind {
        RowErrorKind::Persistence(message) => assert!(message.contains("match rejected")),
        other => panic!("unexpected row error: {other:?}"),
    }
    assert_eq!(store.matches(t.id).unwrap().len(), 4);
}

#[test]
fn imports_a_sheet_from_disk() {
    let (store, t) = store_with_tournament(Tier::Prata);
    let sheet = TempFile::new("csv");
    std::fs::write(&sheet.path, csv(&m1_draw())).unwrap();

    let result =
        import_from_path(&store, &sheet.path, ImportTarget::Tournament(t.id), NO_POINTS).unwrap();
    assert_eq!(result.matches.len(), 5);
}

#[test]
fn missing_sheet_file_fails_the_import() {
    let (store, t) = store_with_tournament(Tier::Prata);
    let missing = TempFile::new("csv");

    let err = import_from_path(&store, &missing.path, ImportTarget::Tournament(t.id), NO_POINTS)
        .unwrap_err();
    assert!(matches!(err, ImportError::Io(_)));
    assert!(store.matches(t.id).unwrap().is_empty());
}

#[test]
fn team_members_in_either_order_are_one_team() {
    let (store, t) = store_with_tournament(Tier::Prata);
    let rows = vec![
        won(1, JOAO_PEDRO, RUI_NUNO),
        won(2, "Pedro Costa / João Silva", LUIS_TIAGO),
    ];
    let result = import(&store, t.id, &rows, NO_POINTS);

    assert_eq!(result.matches[0].data.team1_id, result.matches[1].data.team1_id);
    assert_eq!(result.teams.len(), 3);
    let team = store.team(result.matches[0].data.team1_id).unwrap().unwrap();
    assert!(team.player1_id < team.player2_id);
}

#[test]
fn players_and_teams_are_reused_across_imports() {
    let (store, t) = store_with_tournament(Tier::Prata);
    let first = import(&store, t.id, &m1_draw(), NO_POINTS);
    let second = import(&store, t.id, &m1_draw(), NO_POINTS);

    let ids = |r: &ImportResult| r.players.iter().map(|p| p.id).collect::<Vec<_>>();
    assert_eq!(ids(&first), ids(&second));
    assert_eq!(first.teams, second.teams);
    // Matches are not deduplicated without clearing.
    assert_eq!(store.matches(t.id).unwrap().len(), 10);
}

#[test]
fn clearing_before_reimport_gives_first_import_counts() {
    let (store, t) = store_with_tournament(Tier::Prata);
    let with_points = ImportOptions {
        calculate_points: true,
        clear_existing: false,
    };
    import(&store, t.id, &m1_draw(), with_points);
    let matches = store.matches(t.id).unwrap().len();
    let registrations = store.registrations(t.id).unwrap().len();
    let results = store.player_results(t.id).unwrap().len();
    let categories = store.tournament_categories(t.id).unwrap().len();

    let again = import(
        &store,
        t.id,
        &m1_draw(),
        ImportOptions {
            calculate_points: true,
            clear_existing: true,
        },
    );

    let cleared = again.cleared.unwrap();
    assert_eq!(cleared.deleted_matches, matches);
    assert_eq!(cleared.deleted_registrations, registrations);
    assert_eq!(cleared.deleted_player_results, results);
    assert_eq!(store.matches(t.id).unwrap().len(), matches);
    assert_eq!(store.registrations(t.id).unwrap().len(), registrations);
    assert_eq!(store.player_results(t.id).unwrap().len(), results);
    assert_eq!(store.tournament_categories(t.id).unwrap().len(), categories);
}

#[test]
fn unknown_tournament_fails_before_reading() {
    let store = SqliteStore::open_in_memory().unwrap();
    let err = import_from_csv(
        &store,
        csv(&m1_draw()).as_bytes(),
        ImportTarget::Tournament(42),
        ImportOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ImportError::TournamentNotFound(42)));
}

#[test]
fn sheet_without_rows_is_rejected() {
    let (store, t) = store_with_tournament(Tier::Prata);
    let err = import_from_csv(
        &store,
        HEADER.as_bytes(),
        ImportTarget::Tournament(t.id),
        ImportOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ImportError::EmptyFile));
}

#[test]
fn legacy_sheet_creates_tournament_and_categories_from_code() {
    let store = SqliteStore::open_in_memory().unwrap();
    store.seed_reference_data().unwrap();
    let mut rows = m1_draw();
    rows.push(
        "BT4500 OURO 10-11 MAIO,BT Espinho,MX2 - Pares Mistos Nivel 2,6,Final,Q2,11/05/2025,\
         18:00h,Ana Lima / Rui Dias,Marta Reis / Hugo Lopes,,6/3 6/3,Concluído"
            .to_owned(),
    );
    let result = import_from_csv(
        &store,
        csv(&rows).as_bytes(),
        ImportTarget::FromTournamentCode,
        NO_POINTS,
    )
    .unwrap();

    assert_eq!(result.tournament.code, "BT4500 ESPINHO 10-11 MAIO");
    assert_eq!(result.tournament.tier, Tier::Prata);
    assert_eq!(result.tournament.start_date.to_string().get(5..), Some("05-10"));
    let codes: Vec<_> = result.categories.iter().map(|c| c.category.code.as_str()).collect();
    assert_eq!(codes, ["M1", "MX2"]);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert_eq!(result.matches.len(), 6);

    // Ana Lima is listed first in a mixed pair.
    let ana = result.players.iter().find(|p| p.full_name == "Ana Lima").unwrap();
    assert_eq!(ana.gender, bt_league::Gender::Female);
    assert_eq!(ana.level, 2);
}

#[test]
fn batch_clears_once_and_keeps_going_after_a_bad_file() {
    let (store, t) = store_with_tournament(Tier::Prata);
    import(&store, t.id, &m1_draw(), NO_POINTS);

    let f1 = vec![
        "BT4500,BT Espinho,F1 - Pares Femininos Nivel 1,1,Final,Q1,10/05/2025,10:00h,\
         Ana Lima / Rita Costa,Joana Dias / Sofia Martins,,6/4 6/4,Concluído"
            .to_owned(),
    ];
    let files = vec![
        ("m1.csv", csv(&m1_draw())),
        ("empty.csv", String::new()),
        ("f1.csv", csv(&f1)),
    ];
    let report = import_batch(
        &store,
        files.iter().map(|(name, body)| (*name, body.as_bytes())),
        t.id,
        ImportOptions {
            calculate_points: true,
            clear_existing: true,
        },
    )
    .unwrap();

    assert_eq!(report.cleared.unwrap().deleted_matches, 5);
    assert_eq!(report.success_count(), 2);
    assert_eq!(report.fail_count(), 1);
    assert!(!report.files[1].success);
    assert!(report.files[1].error.is_some());
    assert_eq!(store.matches(t.id).unwrap().len(), 6);
    let points = report.points_awarded.unwrap();
    assert_eq!(points.teams_processed, 6);
}
