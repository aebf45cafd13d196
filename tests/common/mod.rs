//! Shared fixtures: seeded stores and a small result sheet.

#![allow(dead_code)]

use bt_league::models::{NewTournament, TournamentStatus};
use bt_league::{SqliteStore, Store, Tier, Tournament};
use chrono::NaiveDate;
use rusqlite::Connection;
use std::path::PathBuf;
use uuid::Uuid;

pub const HEADER: &str = "TORNEIO,LOCAL,CATEGORIA,NUMERO,FASE,QUADRA,DATA,HORA,\
                          JOGADOR(ES) 01,JOGADOR(ES) 02,VENCEDOR(ES),RESULTADO,STATUS";

pub const JOAO_PEDRO: &str = "João Silva / Pedro Costa";
pub const RUI_NUNO: &str = "Rui Dias / Nuno Martins";
pub const LUIS_TIAGO: &str = "Luís Sousa / Tiago Reis";
pub const HUGO_ANDRE: &str = "Hugo Lopes / André Pinto";

/// A file in the temp directory, removed on drop.
pub struct TempFile {
    pub path: PathBuf,
}

impl TempFile {
    pub fn new(extension: &str) -> Self {
        let name = format!("bt_league_{}.{extension}", Uuid::new_v4());
        Self {
            path: std::env::temp_dir().join(name),
        }
    }

    /// A second connection to the database file, for installing triggers.
    pub fn connection(&self) -> Connection {
        Connection::open(&self.path).unwrap()
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Seeded in-memory store with one tournament declaring M1 and F1.
pub fn store_with_tournament(tier: Tier) -> (SqliteStore, Tournament) {
    with_tournament(SqliteStore::open_in_memory().unwrap(), tier)
}

/// Like [`store_with_tournament`], backed by `db` so other connections can reach it.
pub fn file_store_with_tournament(tier: Tier, db: &TempFile) -> (SqliteStore, Tournament) {
    with_tournament(SqliteStore::open(&db.path).unwrap(), tier)
}

fn with_tournament(store: SqliteStore, tier: Tier) -> (SqliteStore, Tournament) {
    store.seed_reference_data().unwrap();
    let day = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap();
    let tournament = store
        .upsert_tournament(&NewTournament {
            name: "Liga BT4500 Espinho".to_owned(),
            code: "BT4500 ESPINHO 10-11 MAIO".to_owned(),
            tier,
            location: "BT Espinho".to_owned(),
            start_date: day,
            end_date: day.succ_opt().unwrap(),
            year: 2025,
            status: TournamentStatus::Completed,
        })
        .unwrap();
    for code in ["M1", "F1"] {
        let category = store.category_by_code(code).unwrap().unwrap();
        store.declare_category(tournament.id, category.id).unwrap();
    }
    (store, tournament)
}

/// One CSV line in M1 with the tournament columns filled.
pub fn m1_row(
    number: u32,
    round: &str,
    team1: &str,
    team2: &str,
    winner: &str,
    result: &str,
    status: &str,
) -> String {
    format!(
        "BT4500 ESPINHO 10-11 MAIO,BT Espinho,M1 - Pares Masculinos Nivel 1,{number},{round},\
         Q1,10/05/2025,09:30h,{team1},{team2},{winner},{result},{status}"
    )
}

/// Four M1 teams: two group matches, two semifinals and a final won by walkover.
///
/// Rui/Nuno win the final, João/Pedro lose it, Luís/Tiago and Hugo/André lose the semifinals.
pub fn m1_draw() -> Vec<String> {
    vec![
        m1_row(1, "Fase de grupos - G1", JOAO_PEDRO, HUGO_ANDRE, "", "6/4 6/3", "Concluído"),
        m1_row(2, "Fase de grupos - G2", RUI_NUNO, LUIS_TIAGO, "", "6/2 6/2", "Concluído"),
        m1_row(3, "Semifinal", JOAO_PEDRO, LUIS_TIAGO, "", "6/4 6/4", "Concluído"),
        m1_row(4, "Semifinal", HUGO_ANDRE, RUI_NUNO, "", "6/3 4/6 8/10", "Concluído"),
        m1_row(5, "Final", JOAO_PEDRO, RUI_NUNO, RUI_NUNO, "W.O.", "W.O."),
    ]
}

pub fn csv(rows: &[String]) -> String {
    let mut out = String::from(HEADER);
    for row in rows {
        out.push('\n');
        out.push_str(row);
    }
    out.push('\n');
    out
}
