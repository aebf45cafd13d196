//! Import of tournament result sheets (CSV) into matches, then points.
//!
//! Rows are processed strictly in file order. A bad row is recorded and skipped;
//! only tournament lookup and reading the file itself can fail an import.

use crate::error::{ImportError, RowErrorKind};
use crate::logic::identity::IdentityResolver;
use crate::logic::points::{award_tournament_points, PointsResult};
use crate::logic::score::{determine_winner, parse_result, parse_round};
use crate::models::{
    ClearSummary, Match, MatchStatus, NewCategory, NewMatch, NewTournament, Player, PlayerId,
    Side, Team, TeamId, Tier, Tournament, TournamentCategory, TournamentId, TournamentStatus,
};
use crate::store::Store;
use chrono::{Datelike, Local, NaiveDate, NaiveTime};
use lazy_regex::regex_captures;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;

/// Row errors included in a single-file summary.
pub const SUMMARY_MAX_ERRORS: usize = 10;
/// Row errors included per file in a batch summary.
pub const BATCH_SUMMARY_MAX_ERRORS: usize = 5;

const DEFAULT_LOCATION: &str = "BT Espinho";

/// Portuguese month abbreviations used in tournament codes.
const MONTHS: [(&str, u32); 13] = [
    ("JAN", 1),
    ("FEV", 2),
    ("MAR", 3),
    ("ABR", 4),
    ("MAI", 5),
    ("MAIO", 5),
    ("JUN", 6),
    ("JUL", 7),
    ("AGO", 8),
    ("SET", 9),
    ("OUT", 10),
    ("NOV", 11),
    ("DEZ", 12),
];

/// One line of a result sheet. Every column is optional; empty cells are `None`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CsvRow {
    #[serde(rename = "TORNEIO")]
    pub tournament: Option<String>,
    #[serde(rename = "LOCAL")]
    pub location: Option<String>,
    /// `"<code> - <description>"`, e.g. `"M1 - Masculinos Nivel 1"`.
    #[serde(rename = "CATEGORIA")]
    pub category: Option<String>,
    #[serde(rename = "NUMERO")]
    pub match_number: Option<String>,
    #[serde(rename = "FASE")]
    pub round: Option<String>,
    #[serde(rename = "QUADRA")]
    pub court: Option<String>,
    /// `DD/MM/YYYY`
    #[serde(rename = "DATA")]
    pub date: Option<String>,
    /// `HH:MMh`
    #[serde(rename = "HORA")]
    pub time: Option<String>,
    #[serde(rename = "JOGADOR(ES) 01", alias = "JOGADOR(ES)_01")]
    pub team1: Option<String>,
    #[serde(rename = "JOGADOR(ES) 02", alias = "JOGADOR(ES)_02")]
    pub team2: Option<String>,
    #[serde(rename = "VENCEDOR(ES)")]
    pub winner: Option<String>,
    #[serde(rename = "RESULTADO")]
    pub result: Option<String>,
    #[serde(rename = "STATUS")]
    pub status: Option<String>,
}

/// A row that could not be imported.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RowError {
    /// Line in the file, when known.
    pub line: Option<u64>,
    pub row: Option<CsvRow>,
    pub message: String,
    #[serde(skip)]
    pub kind: RowErrorKind,
}

impl RowError {
    fn new(line: Option<u64>, row: Option<CsvRow>, kind: RowErrorKind) -> Self {
        Self {
            line,
            row,
            message: kind.to_string(),
            kind,
        }
    }
}

/// Which tournament the file is imported into.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ImportTarget {
    /// An existing tournament chosen by the caller; rows may only use its declared categories.
    Tournament(TournamentId),
    /// Legacy: derive the tournament from the first row's code and declare every category seen.
    FromTournamentCode,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct ImportOptions {
    /// Recompute points once the file is in.
    #[serde(default = "default_calculate_points")]
    pub calculate_points: bool,
    /// Clear the tournament's matches and standings before importing.
    #[serde(default)]
    pub clear_existing: bool,
}

fn default_calculate_points() -> bool {
    true
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            calculate_points: default_calculate_points(),
            clear_existing: false,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ImportResult {
    pub tournament: Tournament,
    pub categories: Vec<TournamentCategory>,
    /// Players named in this file.
    pub players: Vec<Player>,
    /// Teams named in this file.
    pub teams: Vec<Team>,
    pub matches: Vec<Match>,
    pub errors: Vec<RowError>,
    pub cleared: Option<ClearSummary>,
    pub points_awarded: Option<PointsResult>,
    pub points_error: Option<String>,
}

/// Short identification of a tournament for summaries.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct TournamentRef {
    pub id: TournamentId,
    pub name: String,
    pub code: String,
    pub tier: Tier,
}

impl From<&Tournament> for TournamentRef {
    fn from(t: &Tournament) -> Self {
        Self {
            id: t.id,
            name: t.name.clone(),
            code: t.code.clone(),
            tier: t.tier,
        }
    }
}

/// Counts and the first few row errors of an import.
#[derive(Clone, Debug, Serialize)]
pub struct ImportSummary {
    pub tournament: TournamentRef,
    pub categories_count: usize,
    pub players_count: usize,
    pub teams_count: usize,
    pub matches_count: usize,
    pub errors_count: usize,
    pub errors: Vec<RowError>,
    pub points_recalculated: bool,
    pub teams_processed: Option<usize>,
    pub points_error: Option<String>,
}

impl ImportResult {
    pub fn summary(&self, max_errors: usize) -> ImportSummary {
        ImportSummary {
            tournament: TournamentRef::from(&self.tournament),
            categories_count: self.categories.len(),
            players_count: self.players.len(),
            teams_count: self.teams.len(),
            matches_count: self.matches.len(),
            errors_count: self.errors.len(),
            errors: self.errors.iter().take(max_errors).cloned().collect(),
            points_recalculated: self.points_awarded.is_some(),
            teams_processed: self.points_awarded.as_ref().map(|p| p.teams_processed),
            points_error: self.points_error.clone(),
        }
    }
}

/// Outcome of one file of a batch.
#[derive(Clone, Debug, Serialize)]
pub struct FileOutcome {
    pub filename: String,
    pub success: bool,
    pub summary: Option<ImportSummary>,
    pub error: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct BatchReport {
    pub tournament_id: TournamentId,
    pub cleared: Option<ClearSummary>,
    pub files: Vec<FileOutcome>,
    pub points_awarded: Option<PointsResult>,
    pub points_error: Option<String>,
}

impl BatchReport {
    pub fn success_count(&self) -> usize {
        self.files.iter().filter(|f| f.success).count()
    }

    pub fn fail_count(&self) -> usize {
        self.files.len() - self.success_count()
    }
}

/// Category code from a `CATEGORIA` cell: the text before `" - "`.
pub fn category_code(label: &str) -> &str {
    label.split(" - ").next().unwrap_or_default().trim()
}

/// `DD/MM/YYYY`
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%d/%m/%Y").ok()
}

/// `HH:MMh`; the trailing `h` is optional.
pub fn parse_time(text: &str) -> Option<NaiveTime> {
    let text = text.trim();
    let text = text
        .strip_suffix('h')
        .or_else(|| text.strip_suffix('H'))
        .unwrap_or(text);
    NaiveTime::parse_from_str(text, "%H:%M").ok()
}

/// Tournament described by a legacy code such as `"BT4500 PRATA 10-11 MAIO"`.
///
/// The tier defaults to PRATA. Dates fall back to `today` when the code has no
/// `<day>-<day> <month>` range or the range is not a real date.
pub fn parse_tournament_code(code: &str, location: &str, today: NaiveDate) -> NewTournament {
    let tier = code
        .split_whitespace()
        .find_map(|part| part.parse::<Tier>().ok())
        .unwrap_or(Tier::Prata);
    let year = today.year();
    let range = regex_captures!(r"(\d{1,2})-(\d{1,2})\s+(\w+)", code).and_then(
        |(_, start, end, month)| {
            let month = month.to_uppercase();
            let month = MONTHS
                .iter()
                .find(|(name, _)| *name == month)
                .map_or(1, |(_, number)| *number);
            let start = NaiveDate::from_ymd_opt(year, month, start.parse().ok()?)?;
            let end = NaiveDate::from_ymd_opt(year, month, end.parse().ok()?)?;
            Some((start, end))
        },
    );
    let (start_date, end_date) = range.unwrap_or((today, today));
    NewTournament {
        name: format!("Liga BT4500 {tier}"),
        code: code.trim().to_owned(),
        tier,
        location: location.to_owned(),
        start_date,
        end_date,
        year,
        status: TournamentStatus::Completed,
    }
}

/// A data row with the line it starts on.
type SheetRow = (Option<u64>, Result<CsvRow, csv::Error>);

/// Read all data rows. Header and I/O problems fail the file; a row that does not
/// deserialize is kept as an error for that row.
fn read_rows<R: Read>(reader: R) -> Result<Vec<SheetRow>, ImportError> {
    let mut csv = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = csv.headers()?.clone();
    let mut record = csv::StringRecord::new();
    let mut rows = Vec::new();
    loop {
        match csv.read_record(&mut record) {
            Ok(true) => {
                let line = record.position().map(|p| p.line());
                rows.push((line, record.deserialize(Some(&headers))));
            }
            Ok(false) => break,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => rows.push((e.position().map(|p| p.line()), Err(e))),
        }
    }
    Ok(rows)
}

/// Imports files into the store, sharing one identity cache for its lifetime.
pub struct Importer<'s, S: Store + ?Sized> {
    store: &'s S,
    identities: IdentityResolver,
}

impl<'s, S: Store + ?Sized> Importer<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            identities: IdentityResolver::new(),
        }
    }

    /// Import one file without computing points.
    pub fn import<R: Read>(
        &mut self,
        reader: R,
        target: ImportTarget,
        clear_existing: bool,
    ) -> Result<ImportResult, ImportError> {
        let selected = match target {
            ImportTarget::Tournament(id) => Some(
                self.store
                    .tournament(id)?
                    .ok_or(ImportError::TournamentNotFound(id))?,
            ),
            ImportTarget::FromTournamentCode => None,
        };
        let rows = read_rows(reader)?;
        if rows.is_empty() {
            return Err(ImportError::EmptyFile);
        }
        let tournament = match selected {
            Some(tournament) => tournament,
            None => self.tournament_from_code(&rows)?,
        };
        log::info!(
            "Importing {} rows into tournament {} ({})",
            rows.len(),
            tournament.id,
            tournament.code
        );

        let cleared = if clear_existing {
            Some(self.store.clear_results(tournament.id)?)
        } else {
            None
        };
        let categories = match target {
            ImportTarget::Tournament(_) => self.store.tournament_categories(tournament.id)?,
            ImportTarget::FromTournamentCode => self.declare_categories(tournament.id, &rows)?,
        };
        if categories.is_empty() {
            log::warn!("Tournament {} has no declared categories", tournament.id);
        }
        let by_code: HashMap<&str, &TournamentCategory> = categories
            .iter()
            .map(|tc| (tc.category.code.as_str(), tc))
            .collect();

        let mut players = BTreeMap::new();
        let mut teams = BTreeMap::new();
        let mut matches = Vec::new();
        let mut errors = Vec::new();
        for (line, row) in rows {
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    log::warn!("Row {:?}: {}", line, e);
                    let kind = RowErrorKind::Unreadable(e.to_string());
                    errors.push(RowError::new(line, None, kind));
                    continue;
                }
            };
            match self.import_row(&tournament, &by_code, &row, &mut players, &mut teams) {
                Ok(m) => {
                    log::debug!("Row {:?}: match {} ({})", line, m.id, m.data.round);
                    matches.push(m);
                }
                Err(kind) => {
                    log::warn!("Row {:?}: {}", line, kind);
                    errors.push(RowError::new(line, Some(row), kind));
                }
            }
        }
        log::info!(
            "Imported {} matches into tournament {} with {} row errors",
            matches.len(),
            tournament.id,
            errors.len()
        );
        Ok(ImportResult {
            tournament,
            categories,
            players: players.into_values().collect(),
            teams: teams.into_values().collect(),
            matches,
            errors,
            cleared,
            points_awarded: None,
            points_error: None,
        })
    }

    fn tournament_from_code(
        &self,
        rows: &[SheetRow],
    ) -> Result<Tournament, ImportError> {
        let first = rows
            .iter()
            .find_map(|(_, row)| row.as_ref().ok())
            .ok_or(ImportError::MissingTournamentCode)?;
        let code = first
            .tournament
            .as_deref()
            .ok_or(ImportError::MissingTournamentCode)?;
        let location = first.location.as_deref().unwrap_or(DEFAULT_LOCATION);
        let new = parse_tournament_code(code, location, Local::now().date_naive());
        Ok(self.store.upsert_tournament(&new)?)
    }

    fn declare_categories(
        &self,
        tournament_id: TournamentId,
        rows: &[SheetRow],
    ) -> Result<Vec<TournamentCategory>, ImportError> {
        let mut declared: Vec<TournamentCategory> = Vec::new();
        for (_, row) in rows {
            let Some(label) = row.as_ref().ok().and_then(|row| row.category.as_deref()) else {
                continue;
            };
            let code = category_code(label);
            if code.is_empty() || declared.iter().any(|tc| tc.category.code == code) {
                continue;
            }
            let category = match self.store.category_by_code(code)? {
                Some(category) => category,
                None => self.store.upsert_category(&NewCategory::from_code(code))?,
            };
            declared.push(self.store.declare_category(tournament_id, category.id)?);
        }
        Ok(declared)
    }

    fn import_row(
        &mut self,
        tournament: &Tournament,
        categories: &HashMap<&str, &TournamentCategory>,
        row: &CsvRow,
        players: &mut BTreeMap<PlayerId, Player>,
        teams: &mut BTreeMap<TeamId, Team>,
    ) -> Result<Match, RowErrorKind> {
        let label = row.category.as_deref().ok_or(RowErrorKind::MissingCategory)?;
        let code = category_code(label);
        let category = categories
            .get(code)
            .ok_or_else(|| RowErrorKind::UnknownCategory(code.to_owned()))?;

        let (Some(label1), Some(label2)) = (row.team1.as_deref(), row.team2.as_deref()) else {
            return Err(RowErrorKind::MissingTeams);
        };
        let team1 = self
            .identities
            .resolve_label(self.store, label1, &category.category)?;
        let team2 = self
            .identities
            .resolve_label(self.store, label2, &category.category)?;
        if team1.team.id == team2.team.id {
            return Err(RowErrorKind::SameTeam);
        }

        let result = row.result.as_deref().unwrap_or_default().trim();
        let winner = determine_winner(result, label1, label2, row.winner.as_deref()).map(|side| {
            match side {
                Side::One => team1.team.id,
                Side::Two => team2.team.id,
            }
        });
        let round = parse_round(row.round.as_deref().unwrap_or_default());
        let status = MatchStatus::from_import_text(row.status.as_deref().unwrap_or_default());
        if status.is_decided() && winner.is_none() {
            log::warn!(
                "Match {:?} ({}) is {} but has no resolvable winner",
                row.match_number,
                round.name,
                status.as_str()
            );
        }

        let new = NewMatch {
            tournament_id: tournament.id,
            tournament_category_id: category.id,
            match_number: row
                .match_number
                .as_deref()
                .and_then(|n| n.trim().parse().ok())
                .unwrap_or_default(),
            round: round.name,
            group_name: round.group,
            round_order: round.order,
            court: row.court.clone(),
            scheduled_date: row.date.as_deref().and_then(parse_date),
            scheduled_time: row.time.as_deref().and_then(parse_time),
            team1_id: team1.team.id,
            team2_id: team2.team.id,
            winner_team_id: winner,
            result: (!result.is_empty()).then(|| result.to_owned()),
            status,
            sets: parse_result(result).sets,
        };
        let stored = self.store.insert_match(&new)?;

        for resolved in [team1, team2] {
            for player in resolved.players {
                players.insert(player.id, player);
            }
            teams.insert(resolved.team.id, resolved.team);
        }
        Ok(stored)
    }
}

fn award_after_import<S: Store + ?Sized>(
    store: &S,
    tournament_id: TournamentId,
) -> (Option<PointsResult>, Option<String>) {
    match award_tournament_points(store, tournament_id) {
        Ok(points) => (Some(points), None),
        Err(e) => {
            log::error!("Points calculation failed for tournament {}: {}", tournament_id, e);
            (None, Some(format!("Points calculation failed: {e}")))
        }
    }
}

/// Import one CSV source, then recompute points if `options.calculate_points`.
pub fn import_from_csv<S: Store + ?Sized, R: Read>(
    store: &S,
    reader: R,
    target: ImportTarget,
    options: ImportOptions,
) -> Result<ImportResult, ImportError> {
    let mut result = Importer::new(store).import(reader, target, options.clear_existing)?;
    if options.calculate_points {
        (result.points_awarded, result.points_error) =
            award_after_import(store, result.tournament.id);
    }
    Ok(result)
}

pub fn import_from_path<S: Store + ?Sized>(
    store: &S,
    path: impl AsRef<Path>,
    target: ImportTarget,
    options: ImportOptions,
) -> Result<ImportResult, ImportError> {
    let file = std::fs::File::open(path)?;
    import_from_csv(store, file, target, options)
}

/// Import several files into one tournament, one after the other.
///
/// `clear_existing` clears once, before the first file. A failing file is reported
/// and the remaining files are still imported. Points are recomputed once at the end.
pub fn import_batch<S, R, N, I>(
    store: &S,
    files: I,
    tournament_id: TournamentId,
    options: ImportOptions,
) -> Result<BatchReport, ImportError>
where
    S: Store + ?Sized,
    R: Read,
    N: Into<String>,
    I: IntoIterator<Item = (N, R)>,
{
    if store.tournament(tournament_id)?.is_none() {
        return Err(ImportError::TournamentNotFound(tournament_id));
    }
    let cleared = if options.clear_existing {
        Some(clear_tournament_results(store, tournament_id)?)
    } else {
        None
    };

    let mut importer = Importer::new(store);
    let mut outcomes = Vec::new();
    for (index, (name, reader)) in files.into_iter().enumerate() {
        let filename = name.into();
        log::info!("Processing file {}: {}", index + 1, filename);
        let target = ImportTarget::Tournament(tournament_id);
        let outcome = match importer.import(reader, target, false) {
            Ok(result) => FileOutcome {
                filename,
                success: true,
                summary: Some(result.summary(BATCH_SUMMARY_MAX_ERRORS)),
                error: None,
            },
            Err(e) => {
                log::error!("Error processing {}: {}", filename, e);
                FileOutcome {
                    filename,
                    success: false,
                    summary: None,
                    error: Some(e.to_string()),
                }
            }
        };
        outcomes.push(outcome);
    }

    let (points_awarded, points_error) =
        if options.calculate_points && outcomes.iter().any(|o| o.success) {
            award_after_import(store, tournament_id)
        } else {
            (None, None)
        };
    Ok(BatchReport {
        tournament_id,
        cleared,
        files: outcomes,
        points_awarded,
        points_error,
    })
}

/// Delete a tournament's matches and standings, keeping its declared categories.
pub fn clear_tournament_results<S: Store + ?Sized>(
    store: &S,
    tournament_id: TournamentId,
) -> Result<ClearSummary, ImportError> {
    if store.tournament(tournament_id)?.is_none() {
        return Err(ImportError::TournamentNotFound(tournament_id));
    }
    let summary = store.clear_results(tournament_id)?;
    log::info!(
        "Cleared tournament {}: {} matches, {} registrations, {} player results",
        tournament_id,
        summary.deleted_matches,
        summary.deleted_registrations,
        summary.deleted_player_results
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn tournament_code_with_tier_and_range() {
        let t = parse_tournament_code("BT4500 OURO 10-11 MAIO", "Espinho", day(2025, 1, 3));
        assert_eq!(t.tier, Tier::Ouro);
        assert_eq!(t.start_date, day(2025, 5, 10));
        assert_eq!(t.end_date, day(2025, 5, 11));
        assert_eq!(t.name, "Liga BT4500 OURO");
        assert_eq!(t.year, 2025);
    }

    #[test]
    fn tournament_code_without_range_uses_today() {
        let today = day(2025, 7, 1);
        let t = parse_tournament_code("BT4500 TORNEIO", DEFAULT_LOCATION, today);
        assert_eq!(t.tier, Tier::Prata);
        assert_eq!((t.start_date, t.end_date), (today, today));
    }

    #[test]
    fn unknown_month_falls_back_to_january() {
        let t = parse_tournament_code("BT4500 BRONZE 3-4 XYZ", DEFAULT_LOCATION, day(2024, 6, 1));
        assert_eq!(t.start_date, day(2024, 1, 3));
    }

    #[test]
    fn sheet_date_and_time() {
        assert_eq!(parse_date("07/06/2025"), Some(day(2025, 6, 7)));
        assert_eq!(parse_date("2025-06-07"), None);
        assert_eq!(parse_time("09:30h"), NaiveTime::from_hms_opt(9, 30, 0));
        assert_eq!(parse_time("18:00"), NaiveTime::from_hms_opt(18, 0, 0));
    }

    #[test]
    fn category_code_from_label() {
        assert_eq!(category_code("MX1 - Pares Mistos Nivel 1"), "MX1");
        assert_eq!(category_code("F2"), "F2");
    }
}
