//! SQLite implementation of [`Store`].

use crate::logic::Round;
use crate::models::{
    Category, CategoryGender, CategoryId, ClearSummary, DrawFormat, Gender, Match, MatchId,
    MatchOutcome, MatchStatus,
    NewCategory, NewMatch, NewPlayer, NewTournament, Player, PlayerId, PlayerTournamentResult,
    PointsTableEntry, RegistrationStatus, SetScore, Team, TeamId, Tier, Tournament,
    TournamentCategory, TournamentCategoryId, TournamentId, TournamentRegistration,
    TournamentStatus,
};
use crate::store::{DecidedMatch, Store, StoreError};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};
use std::path::Path;
use uuid::Uuid;

const SCHEMA: &str = include_str!("schema.sql");

/// Enums stored as their text form.
macro_rules! text_column {
    ($($ty:ty),* $(,)?) => {$(
        impl ToSql for $ty {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $ty {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|e| FromSqlError::Other(Box::new(e)))
            }
        }
    )*};
}

text_column!(
    Tier,
    TournamentStatus,
    CategoryGender,
    DrawFormat,
    Gender,
    MatchStatus,
    RegistrationStatus,
);

/// Reference categories every league database starts with.
const CATEGORY_CODES: [&str; 6] = ["F1", "F2", "M1", "M2", "MX1", "MX2"];

/// Base points at PRATA level 1, before tier and level weighting.
fn base_points(round: Round) -> i64 {
    match round {
        Round::Champion => 400,
        Round::Final => 280,
        Round::SemiFinal => 180,
        Round::QuarterFinal => 100,
        Round::RoundOf16 => 50,
        Round::RoundOf32 => 25,
        Round::GroupStage => 10,
    }
}

/// Points for (tier, level, round), rounded half up.
pub(crate) fn seeded_points(tier: Tier, level: u8, round: Round) -> i32 {
    let tier_pct = match tier {
        Tier::Ouro => 150,
        Tier::Prata => 100,
        Tier::Bronze => 75,
    };
    let level_pct = if level == 1 { 100 } else { 70 };
    ((base_points(round) * tier_pct * level_pct + 5_000) / 10_000) as i32
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (creating if needed) a database file and apply the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::new(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::new(Connection::open_in_memory()?)
    }

    pub fn new(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Insert the standard categories and points table. Existing rows are left untouched.
    pub fn seed_reference_data(&self) -> Result<(), StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        for code in CATEGORY_CODES {
            let category = NewCategory::from_code(code);
            tx.execute(
                "INSERT INTO categories (code, name, gender, level) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (code) DO NOTHING",
                params![category.code, category.name, category.gender, category.level],
            )?;
        }
        for tier in Tier::ALL {
            for level in [1u8, 2] {
                for round in Round::PLAYED.into_iter().chain([Round::Champion]) {
                    tx.execute(
                        "INSERT INTO points_table (tier, level, round_name, round_order, points)
                         VALUES (?1, ?2, ?3, ?4, ?5)
                         ON CONFLICT (tier, level, round_name) DO NOTHING",
                        params![
                            tier,
                            level,
                            round.name(),
                            round.order(),
                            seeded_points(tier, level, round)
                        ],
                    )?;
                }
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn tournament_category(
        &self,
        id: TournamentCategoryId,
    ) -> Result<TournamentCategory, StoreError> {
        Ok(self.conn.query_row(
            "SELECT tc.id AS tc_id, tc.tournament_id, tc.draw_size, tc.format,
                    c.id, c.code, c.name, c.gender, c.level
             FROM tournament_categories tc
             JOIN categories c ON c.id = tc.category_id
             WHERE tc.id = ?1",
            params![id],
            tournament_category_from_row,
        )?)
    }
}

fn tournament_from_row(row: &Row<'_>) -> rusqlite::Result<Tournament> {
    Ok(Tournament {
        id: row.get("id")?,
        uuid: row.get("uuid")?,
        name: row.get("name")?,
        code: row.get("code")?,
        tier: row.get("tier")?,
        location: row.get("location")?,
        start_date: row.get("start_date")?,
        end_date: row.get("end_date")?,
        year: row.get("year")?,
        status: row.get("status")?,
    })
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get("id")?,
        code: row.get("code")?,
        name: row.get("name")?,
        gender: row.get("gender")?,
        level: row.get("level")?,
    })
}

fn tournament_category_from_row(row: &Row<'_>) -> rusqlite::Result<TournamentCategory> {
    Ok(TournamentCategory {
        id: row.get("tc_id")?,
        tournament_id: row.get("tournament_id")?,
        category: category_from_row(row)?,
        draw_size: row.get("draw_size")?,
        format: row.get("format")?,
    })
}

fn player_from_row(row: &Row<'_>) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get("id")?,
        uuid: row.get("uuid")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        full_name: row.get("full_name")?,
        gender: row.get("gender")?,
        level: row.get("level")?,
        total_points: row.get("total_points")?,
        ranking: row.get("ranking")?,
    })
}

fn team_from_row(row: &Row<'_>) -> rusqlite::Result<Team> {
    Ok(Team {
        id: row.get("id")?,
        uuid: row.get("uuid")?,
        player1_id: row.get("player1_id")?,
        player2_id: row.get("player2_id")?,
        category_id: row.get("category_id")?,
    })
}

fn match_from_row(row: &Row<'_>) -> rusqlite::Result<Match> {
    let mut sets = Vec::with_capacity(3);
    for n in 1..=3 {
        sets.push(SetScore {
            team1: row.get(format!("set{n}_team1").as_str())?,
            team2: row.get(format!("set{n}_team2").as_str())?,
            tiebreak: row.get(format!("set{n}_tiebreak").as_str())?,
        });
    }
    let played = sets
        .iter()
        .rposition(|set| *set != SetScore::default())
        .map_or(0, |last| last + 1);
    sets.truncate(played);
    Ok(Match {
        id: row.get("id")?,
        uuid: row.get("uuid")?,
        data: NewMatch {
            tournament_id: row.get("tournament_id")?,
            tournament_category_id: row.get("tournament_category_id")?,
            match_number: row.get("match_number")?,
            round: row.get("round")?,
            group_name: row.get("group_name")?,
            round_order: row.get("round_order")?,
            court: row.get("court")?,
            scheduled_date: row.get("scheduled_date")?,
            scheduled_time: row.get("scheduled_time")?,
            team1_id: row.get("team1_id")?,
            team2_id: row.get("team2_id")?,
            winner_team_id: row.get("winner_team_id")?,
            result: row.get("result")?,
            status: row.get("status")?,
            sets,
        },
    })
}

fn recompute_total(conn: &Connection, player_id: PlayerId) -> rusqlite::Result<i32> {
    conn.query_row(
        "UPDATE players SET total_points = (
             SELECT COALESCE(SUM(points_earned), 0)
             FROM player_tournament_results
             WHERE player_id = ?1
         )
         WHERE id = ?1
         RETURNING total_points",
        params![player_id],
        |row| row.get(0),
    )
}

impl Store for SqliteStore {
    fn tournament(&self, id: TournamentId) -> Result<Option<Tournament>, StoreError> {
        Ok(self
            .conn
            .query_row(
                "SELECT * FROM tournaments WHERE id = ?1",
                params![id],
                tournament_from_row,
            )
            .optional()?)
    }

    fn upsert_tournament(&self, new: &NewTournament) -> Result<Tournament, StoreError> {
        Ok(self.conn.query_row(
            "INSERT INTO tournaments
                 (uuid, name, code, tier, location, start_date, end_date, year, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT (code) DO UPDATE SET code = excluded.code
             RETURNING *",
            params![
                Uuid::new_v4(),
                new.name,
                new.code,
                new.tier,
                new.location,
                new.start_date,
                new.end_date,
                new.year,
                new.status
            ],
            tournament_from_row,
        )?)
    }

    fn category_by_code(&self, code: &str) -> Result<Option<Category>, StoreError> {
        Ok(self
            .conn
            .query_row(
                "SELECT * FROM categories WHERE code = ?1",
                params![code],
                category_from_row,
            )
            .optional()?)
    }

    fn upsert_category(&self, new: &NewCategory) -> Result<Category, StoreError> {
        Ok(self.conn.query_row(
            "INSERT INTO categories (code, name, gender, level) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (code) DO UPDATE SET code = excluded.code
             RETURNING *",
            params![new.code, new.name, new.gender, new.level],
            category_from_row,
        )?)
    }

    fn declare_category(
        &self,
        tournament_id: TournamentId,
        category_id: CategoryId,
    ) -> Result<TournamentCategory, StoreError> {
        let id: TournamentCategoryId = self.conn.query_row(
            "INSERT INTO tournament_categories (tournament_id, category_id) VALUES (?1, ?2)
             ON CONFLICT (tournament_id, category_id) DO UPDATE SET draw_size = draw_size
             RETURNING id",
            params![tournament_id, category_id],
            |row| row.get(0),
        )?;
        self.tournament_category(id)
    }

    fn tournament_categories(
        &self,
        tournament_id: TournamentId,
    ) -> Result<Vec<TournamentCategory>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT tc.id AS tc_id, tc.tournament_id, tc.draw_size, tc.format,
                    c.id, c.code, c.name, c.gender, c.level
             FROM tournament_categories tc
             JOIN categories c ON c.id = tc.category_id
             WHERE tc.tournament_id = ?1
             ORDER BY c.gender, c.level",
        )?;
        let rows = stmt.query_map(params![tournament_id], tournament_category_from_row)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    fn upsert_player(&self, new: &NewPlayer) -> Result<Player, StoreError> {
        Ok(self.conn.query_row(
            "INSERT INTO players (uuid, first_name, last_name, full_name, gender, level)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT (full_name) DO UPDATE SET full_name = excluded.full_name
             RETURNING *",
            params![
                Uuid::new_v4(),
                new.name.first_name,
                new.name.last_name,
                new.name.full_name(),
                new.gender,
                new.level
            ],
            player_from_row,
        )?)
    }

    fn player(&self, id: PlayerId) -> Result<Option<Player>, StoreError> {
        Ok(self
            .conn
            .query_row("SELECT * FROM players WHERE id = ?1", params![id], player_from_row)
            .optional()?)
    }

    fn upsert_team(
        &self,
        player_a: PlayerId,
        player_b: PlayerId,
        category_id: CategoryId,
    ) -> Result<Team, StoreError> {
        let (player1, player2) = if player_a <= player_b {
            (player_a, player_b)
        } else {
            (player_b, player_a)
        };
        Ok(self.conn.query_row(
            "INSERT INTO teams (uuid, player1_id, player2_id, category_id) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (category_id, player1_id, player2_id)
                 DO UPDATE SET category_id = excluded.category_id
             RETURNING *",
            params![Uuid::new_v4(), player1, player2, category_id],
            team_from_row,
        )?)
    }

    fn team(&self, id: TeamId) -> Result<Option<Team>, StoreError> {
        Ok(self
            .conn
            .query_row("SELECT * FROM teams WHERE id = ?1", params![id], team_from_row)
            .optional()?)
    }

    fn insert_match(&self, new: &NewMatch) -> Result<Match, StoreError> {
        let set = |i: usize| new.sets.get(i).copied().unwrap_or_default();
        let (s1, s2, s3) = (set(0), set(1), set(2));
        let (id, uuid) = self.conn.query_row(
            "INSERT INTO matches (
                 uuid, tournament_id, tournament_category_id, match_number, round, group_name,
                 round_order, court, scheduled_date, scheduled_time, team1_id, team2_id,
                 winner_team_id, status, result,
                 set1_team1, set1_team2, set1_tiebreak,
                 set2_team1, set2_team2, set2_tiebreak,
                 set3_team1, set3_team2, set3_tiebreak
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15,
                       ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24)
             RETURNING id, uuid",
            params![
                Uuid::new_v4(),
                new.tournament_id,
                new.tournament_category_id,
                new.match_number,
                new.round,
                new.group_name,
                new.round_order,
                new.court,
                new.scheduled_date,
                new.scheduled_time,
                new.team1_id,
                new.team2_id,
                new.winner_team_id,
                new.status,
                new.result,
                s1.team1,
                s1.team2,
                s1.tiebreak,
                s2.team1,
                s2.team2,
                s2.tiebreak,
                s3.team1,
                s3.team2,
                s3.tiebreak
            ],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(Match {
            id,
            uuid,
            data: new.clone(),
        })
    }

    fn match_by_uuid(&self, uuid: Uuid) -> Result<Option<Match>, StoreError> {
        Ok(self
            .conn
            .query_row("SELECT * FROM matches WHERE uuid = ?1", params![uuid], match_from_row)
            .optional()?)
    }

    fn update_match_result(
        &self,
        id: MatchId,
        outcome: &MatchOutcome,
    ) -> Result<Option<Match>, StoreError> {
        let set = |i: usize| outcome.sets.get(i).copied().unwrap_or_default();
        let (s1, s2, s3) = (set(0), set(1), set(2));
        Ok(self
            .conn
            .query_row(
                "UPDATE matches SET
                     winner_team_id = ?2, result = ?3, status = ?4,
                     set1_team1 = ?5, set1_team2 = ?6, set1_tiebreak = ?7,
                     set2_team1 = ?8, set2_team2 = ?9, set2_tiebreak = ?10,
                     set3_team1 = ?11, set3_team2 = ?12, set3_tiebreak = ?13
                 WHERE id = ?1
                 RETURNING *",
                params![
                    id,
                    outcome.winner_team_id,
                    outcome.result,
                    outcome.status,
                    s1.team1,
                    s1.team2,
                    s1.tiebreak,
                    s2.team1,
                    s2.team2,
                    s2.tiebreak,
                    s3.team1,
                    s3.team2,
                    s3.tiebreak
                ],
                match_from_row,
            )
            .optional()?)
    }

    fn matches(&self, tournament_id: TournamentId) -> Result<Vec<Match>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT * FROM matches
             WHERE tournament_id = ?1
             ORDER BY scheduled_date, scheduled_time, round_order, match_number, id",
        )?;
        let rows = stmt.query_map(params![tournament_id], match_from_row)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    fn decided_matches(
        &self,
        tournament_id: TournamentId,
    ) -> Result<Vec<DecidedMatch>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT m.id, m.tournament_category_id, tc.category_id, c.level, m.round,
                    m.round_order, m.team1_id, m.team2_id, m.winner_team_id
             FROM matches m
             JOIN tournament_categories tc ON tc.id = m.tournament_category_id
             JOIN categories c ON c.id = tc.category_id
             WHERE m.tournament_id = ?1
               AND m.status IN ('completed', 'walkover')
               AND m.winner_team_id IS NOT NULL
             ORDER BY m.round_order DESC, m.id",
        )?;
        let rows = stmt.query_map(params![tournament_id], |row| {
            Ok(DecidedMatch {
                match_id: row.get(0)?,
                tournament_category_id: row.get(1)?,
                category_id: row.get(2)?,
                level: row.get(3)?,
                round: row.get(4)?,
                round_order: row.get(5)?,
                team1_id: row.get(6)?,
                team2_id: row.get(7)?,
                winner_team_id: row.get(8)?,
            })
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    fn points(&self, tier: Tier, level: u8, round_name: &str) -> Result<Option<i32>, StoreError> {
        Ok(self
            .conn
            .query_row(
                "SELECT points FROM points_table
                 WHERE tier = ?1 AND level = ?2 AND round_name = ?3",
                params![tier, level, round_name],
                |row| row.get(0),
            )
            .optional()?)
    }

    fn points_table(&self, tier: Option<Tier>) -> Result<Vec<PointsTableEntry>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT tier, level, round_name, round_order, points FROM points_table
             WHERE ?1 IS NULL OR tier = ?1
             ORDER BY tier, level, round_order DESC",
        )?;
        let rows = stmt.query_map(params![tier], |row| {
            Ok(PointsTableEntry {
                tier: row.get(0)?,
                level: row.get(1)?,
                round_name: row.get(2)?,
                round_order: row.get(3)?,
                points: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    fn upsert_registration(&self, registration: &TournamentRegistration) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO tournament_registrations
                 (tournament_id, tournament_category_id, team_id, status, final_position,
                  points_earned)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT (tournament_id, team_id) DO UPDATE SET
                 tournament_category_id = excluded.tournament_category_id,
                 status = excluded.status,
                 final_position = excluded.final_position,
                 points_earned = excluded.points_earned",
            params![
                registration.tournament_id,
                registration.tournament_category_id,
                registration.team_id,
                registration.status,
                registration.final_position,
                registration.points_earned
            ],
        )?;
        Ok(())
    }

    fn registrations(
        &self,
        tournament_id: TournamentId,
    ) -> Result<Vec<TournamentRegistration>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT tournament_id, tournament_category_id, team_id, status, final_position,
                    points_earned
             FROM tournament_registrations
             WHERE tournament_id = ?1
             ORDER BY points_earned DESC, final_position IS NULL, final_position, team_id",
        )?;
        let rows = stmt.query_map(params![tournament_id], |row| {
            Ok(TournamentRegistration {
                tournament_id: row.get(0)?,
                tournament_category_id: row.get(1)?,
                team_id: row.get(2)?,
                status: row.get(3)?,
                final_position: row.get(4)?,
                points_earned: row.get(5)?,
            })
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    fn upsert_player_result(&self, result: &PlayerTournamentResult) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO player_tournament_results
                 (player_id, tournament_id, category_id, team_id, partner_id, final_round,
                  final_position, points_earned, matches_won, matches_lost)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             ON CONFLICT (player_id, tournament_id, category_id) DO UPDATE SET
                 team_id = excluded.team_id,
                 partner_id = excluded.partner_id,
                 final_round = excluded.final_round,
                 final_position = excluded.final_position,
                 points_earned = excluded.points_earned,
                 matches_won = excluded.matches_won,
                 matches_lost = excluded.matches_lost",
            params![
                result.player_id,
                result.tournament_id,
                result.category_id,
                result.team_id,
                result.partner_id,
                result.final_round,
                result.final_position,
                result.points_earned,
                result.matches_won,
                result.matches_lost
            ],
        )?;
        Ok(())
    }

    fn player_results(
        &self,
        tournament_id: TournamentId,
    ) -> Result<Vec<PlayerTournamentResult>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT player_id, tournament_id, category_id, team_id, partner_id, final_round,
                    final_position, points_earned, matches_won, matches_lost
             FROM player_tournament_results
             WHERE tournament_id = ?1
             ORDER BY category_id, player_id",
        )?;
        let rows = stmt.query_map(params![tournament_id], |row| {
            Ok(PlayerTournamentResult {
                player_id: row.get(0)?,
                tournament_id: row.get(1)?,
                category_id: row.get(2)?,
                team_id: row.get(3)?,
                partner_id: row.get(4)?,
                final_round: row.get(5)?,
                final_position: row.get(6)?,
                points_earned: row.get(7)?,
                matches_won: row.get(8)?,
                matches_lost: row.get(9)?,
            })
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    fn recompute_total_points(&self, player_id: PlayerId) -> Result<i32, StoreError> {
        Ok(recompute_total(&self.conn, player_id)?)
    }

    fn clear_results(&self, tournament_id: TournamentId) -> Result<ClearSummary, StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        let players: Vec<PlayerId> = {
            let mut stmt = tx.prepare(
                "SELECT DISTINCT player_id FROM player_tournament_results WHERE tournament_id = ?1",
            )?;
            let rows = stmt.query_map(params![tournament_id], |row| row.get(0))?;
            rows.collect::<Result<_, _>>()?
        };
        let summary = ClearSummary {
            deleted_player_results: tx.execute(
                "DELETE FROM player_tournament_results WHERE tournament_id = ?1",
                params![tournament_id],
            )?,
            deleted_matches: tx.execute(
                "DELETE FROM matches WHERE tournament_id = ?1",
                params![tournament_id],
            )?,
            deleted_registrations: tx.execute(
                "DELETE FROM tournament_registrations WHERE tournament_id = ?1",
                params![tournament_id],
            )?,
        };
        for player in players {
            recompute_total(&tx, player)?;
        }
        tx.commit()?;
        Ok(summary)
    }

    fn rank_players(&self, gender: Option<Gender>) -> Result<usize, StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        let players: Vec<PlayerId> = {
            let mut stmt = tx.prepare(
                "SELECT id FROM players
                 WHERE active = 1 AND (?1 IS NULL OR gender = ?1)
                 ORDER BY total_points DESC, id",
            )?;
            let rows = stmt.query_map(params![gender], |row| row.get(0))?;
            rows.collect::<Result<_, _>>()?
        };
        for (position, player) in players.iter().enumerate() {
            tx.execute(
                "UPDATE players SET ranking = ?1 WHERE id = ?2",
                params![position as i64 + 1, player],
            )?;
        }
        tx.commit()?;
        Ok(players.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_points_follow_tier_and_level_weights() {
        assert_eq!(seeded_points(Tier::Prata, 1, Round::SemiFinal), 180);
        assert_eq!(seeded_points(Tier::Ouro, 1, Round::Champion), 600);
        assert_eq!(seeded_points(Tier::Bronze, 2, Round::SemiFinal), 95);
        assert_eq!(seeded_points(Tier::Bronze, 2, Round::GroupStage), 5);
    }

    #[test]
    fn team_pair_is_unordered() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.seed_reference_data().unwrap();
        let category = store.category_by_code("F1").unwrap().unwrap();
        let new = |first: &str, last: &str| NewPlayer {
            name: crate::models::PlayerName::new(first, last),
            gender: Gender::Female,
            level: 1,
        };
        let a = store.upsert_player(&new("Ana", "Silva")).unwrap();
        let b = store.upsert_player(&new("Rita", "Costa")).unwrap();
        let ab = store.upsert_team(a.id, b.id, category.id).unwrap();
        let ba = store.upsert_team(b.id, a.id, category.id).unwrap();
        assert_eq!(ab, ba);
        assert!(ab.player1_id < ab.player2_id);
    }
}
