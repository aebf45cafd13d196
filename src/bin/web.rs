//! League API server: CSV result import, points and rankings over REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, DATABASE_PATH (default bt_league.db).

use actix_web::{
    delete, get, post, put,
    web::{self, Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use bt_league::logic::SUMMARY_MAX_ERRORS;
use bt_league::{
    award_tournament_points, clear_tournament_results, import_from_csv, recalculate_rankings,
    update_match_result, Gender, ImportError, ImportOptions, ImportTarget, MatchUpdateError,
    PointsError, ResultUpdate, SqliteStore, Store, Tier, TournamentId,
};
use serde::Deserialize;
use std::sync::Mutex;
use uuid::Uuid;

/// One connection, serialized behind a lock.
type AppState = Data<Mutex<SqliteStore>>;

/// Largest accepted CSV upload.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segment: match uuid (e.g. /api/matches/{uuid}/result)
#[derive(Deserialize)]
struct MatchPath {
    uuid: Uuid,
}

#[derive(Deserialize)]
struct PointsQuery {
    tier: Option<Tier>,
}

#[derive(Deserialize)]
struct RankingsQuery {
    gender: Option<Gender>,
}

fn error_body(e: impl ToString) -> serde_json::Value {
    serde_json::json!({ "error": e.to_string() })
}

fn import_error_response(e: ImportError) -> HttpResponse {
    match e {
        ImportError::TournamentNotFound(_) => HttpResponse::NotFound().json(error_body(e)),
        ImportError::Store(_) => HttpResponse::InternalServerError().json(error_body(e)),
        _ => HttpResponse::BadRequest().json(error_body(e)),
    }
}

fn points_error_response(e: PointsError) -> HttpResponse {
    match e {
        PointsError::TournamentNotFound(_) => HttpResponse::NotFound().json(error_body(e)),
        _ => HttpResponse::InternalServerError().json(error_body(e)),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "bt-league",
    })
}

/// Points table, optionally for one tier.
#[get("/api/points")]
async fn api_points_table(state: AppState, query: Query<PointsQuery>) -> HttpResponse {
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match store.points_table(query.tier) {
        Ok(table) => HttpResponse::Ok().json(table),
        Err(e) => HttpResponse::InternalServerError().json(error_body(e)),
    }
}

/// Matches stored for a tournament.
#[get("/api/tournaments/{id}/matches")]
async fn api_matches(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match store.tournament(path.id) {
        Ok(Some(_)) => {}
        Ok(None) => return HttpResponse::NotFound().json(error_body("No tournament")),
        Err(e) => return HttpResponse::InternalServerError().json(error_body(e)),
    }
    match store.matches(path.id) {
        Ok(matches) => HttpResponse::Ok().json(matches),
        Err(e) => HttpResponse::InternalServerError().json(error_body(e)),
    }
}

/// Per-player results of a tournament.
#[get("/api/tournaments/{id}/results")]
async fn api_results(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match store.tournament(path.id) {
        Ok(Some(_)) => {}
        Ok(None) => return HttpResponse::NotFound().json(error_body("No tournament")),
        Err(e) => return HttpResponse::InternalServerError().json(error_body(e)),
    }
    match store.player_results(path.id) {
        Ok(results) => HttpResponse::Ok().json(results),
        Err(e) => HttpResponse::InternalServerError().json(error_body(e)),
    }
}

/// Import a CSV body into an existing tournament.
#[post("/api/tournaments/{id}/import")]
async fn api_import(
    state: AppState,
    path: Path<TournamentPath>,
    options: Query<ImportOptions>,
    body: String,
) -> HttpResponse {
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match import_from_csv(
        &*store,
        body.as_bytes(),
        ImportTarget::Tournament(path.id),
        options.into_inner(),
    ) {
        Ok(result) => HttpResponse::Ok().json(result.summary(SUMMARY_MAX_ERRORS)),
        Err(e) => import_error_response(e),
    }
}

/// Import a CSV body whose first row names the tournament code.
#[post("/api/import")]
async fn api_import_by_code(
    state: AppState,
    options: Query<ImportOptions>,
    body: String,
) -> HttpResponse {
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match import_from_csv(
        &*store,
        body.as_bytes(),
        ImportTarget::FromTournamentCode,
        options.into_inner(),
    ) {
        Ok(result) => HttpResponse::Ok().json(result.summary(SUMMARY_MAX_ERRORS)),
        Err(e) => import_error_response(e),
    }
}

/// Correct one match's result. Points are recomputed separately.
#[put("/api/matches/{uuid}/result")]
async fn api_update_match_result(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<ResultUpdate>,
) -> HttpResponse {
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match update_match_result(&*store, path.uuid, &body) {
        Ok(updated) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Match result updated",
            "match": updated,
        })),
        Err(e @ MatchUpdateError::MatchNotFound(_)) => {
            HttpResponse::NotFound().json(error_body(e))
        }
        Err(e @ MatchUpdateError::WinnerNotInMatch(_)) => {
            HttpResponse::BadRequest().json(error_body(e))
        }
        Err(e) => HttpResponse::InternalServerError().json(error_body(e)),
    }
}

/// Recompute standings and points of a tournament.
#[post("/api/tournaments/{id}/calculate-points")]
async fn api_calculate_points(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match award_tournament_points(&*store, path.id) {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => points_error_response(e),
    }
}

/// Delete a tournament's matches and standings; categories stay declared.
#[delete("/api/tournaments/{id}/results")]
async fn api_clear_results(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match clear_tournament_results(&*store, path.id) {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => import_error_response(e),
    }
}

/// Rewrite ranking positions, optionally for one gender.
#[post("/api/rankings/recalculate")]
async fn api_recalculate_rankings(state: AppState, query: Query<RankingsQuery>) -> HttpResponse {
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match recalculate_rankings(&*store, query.gender) {
        Ok(ranked) => HttpResponse::Ok().json(serde_json::json!({ "ranked": ranked })),
        Err(e) => HttpResponse::InternalServerError().json(error_body(e)),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_database_path() -> String {
    "bt_league.db".to_string()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let database = std::env::var("DATABASE_PATH").unwrap_or_else(|_| default_database_path());

    let store = SqliteStore::open(&database)
        .and_then(|store| store.seed_reference_data().map(|()| store))
        .map_err(std::io::Error::other)?;
    log::info!("Using database {}", database);

    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(Mutex::new(store));
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(web::PayloadConfig::new(MAX_UPLOAD_BYTES))
            .service(api_health)
            .service(api_points_table)
            .service(api_matches)
            .service(api_results)
            .service(api_import)
            .service(api_import_by_code)
            .service(api_update_match_result)
            .service(api_calculate_points)
            .service(api_clear_results)
            .service(api_recalculate_rankings)
    })
    .bind(bind)?
    .run()
    .await
}
