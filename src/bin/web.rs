//! Single binary web server: JSON API over the match journal.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT, DATA_FILE,
//! RELOAD_INTERVAL_SECS (see `AppConfig`).

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::{NaiveDate, Utc};
use pickleball_journal::{
    export, filter_matches, filter_standings, AppConfig, GameMatch, ImportMode, Journal,
    JournalError, JsonFileStore, MatchFilter, MatchFormat, MatchId, MatchStatus, PlayerId,
    SetEntry, Side, StoredData,
};
use pickleball_journal::models::Sides;
use serde::Deserialize;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// The single state holder shared by all workers.
type AppState = Data<RwLock<Journal<JsonFileStore>>>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerBody {
    name: String,
    #[serde(default)]
    favorite_tennis_player: Option<String>,
}

#[derive(Deserialize)]
struct ColorBody {
    color: String,
}

#[derive(Deserialize)]
struct MergeBody {
    into: PlayerId,
}

/// Match as submitted by a form; ids and timestamps are assigned server-side.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchBody {
    date: NaiveDate,
    #[serde(default)]
    status: MatchStatus,
    #[serde(default)]
    format: MatchFormat,
    sides: Sides,
    #[serde(default)]
    set_count: Option<usize>,
    #[serde(default)]
    sets: Vec<SetEntry>,
    #[serde(default)]
    match_winner_side: Option<Side>,
    #[serde(default)]
    notes: Option<String>,
}

impl MatchBody {
    fn into_match(self, id: MatchId) -> GameMatch {
        let now = Utc::now();
        GameMatch {
            id,
            date: self.date,
            status: self.status,
            format: self.format,
            sides: self.sides,
            set_count: self.set_count.unwrap_or(self.sets.len()),
            sets: self.sets,
            match_winner_side: self.match_winner_side,
            notes: self.notes.filter(|n| !n.trim().is_empty()),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Deserialize)]
struct StandingsQuery {
    #[serde(default)]
    include_not_completed: bool,
    #[serde(default)]
    min_matches: u32,
}

#[derive(Deserialize)]
struct ProfileQuery {
    #[serde(default)]
    include_not_completed: bool,
}

#[derive(Deserialize)]
struct ImportQuery {
    #[serde(default)]
    mode: ImportMode,
}

#[derive(Deserialize)]
struct IdPath {
    id: Uuid,
}

fn error_response(e: &JournalError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        JournalError::PlayerNotFound(_) | JournalError::MatchNotFound(_) => {
            HttpResponse::NotFound().json(body)
        }
        JournalError::Storage(_) => {
            log::error!("{}", e);
            HttpResponse::InternalServerError().json(body)
        }
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

fn read(state: &AppState) -> Result<RwLockReadGuard<'_, Journal<JsonFileStore>>, HttpResponse> {
    state.read().map_err(|_| lock_error())
}

fn write(state: &AppState) -> Result<RwLockWriteGuard<'_, Journal<JsonFileStore>>, HttpResponse> {
    state.write().map_err(|_| lock_error())
}

fn csv_response(result: Result<String, csv::Error>) -> HttpResponse {
    match result {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .body(body),
        Err(e) => HttpResponse::InternalServerError()
            .json(serde_json::json!({ "error": e.to_string() })),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "pickleball-journal",
    })
}

#[get("/api/players")]
async fn api_list_players(state: AppState) -> HttpResponse {
    match read(&state) {
        Ok(j) => HttpResponse::Ok().json(j.players()),
        Err(resp) => resp,
    }
}

/// Create a player (name required, favourite optional).
#[post("/api/players")]
async fn api_create_player(state: AppState, body: Json<PlayerBody>) -> HttpResponse {
    let mut j = match write(&state) {
        Ok(guard) => guard,
        Err(resp) => return resp,
    };
    match j.create_player(&body.name, body.favorite_tennis_player.as_deref()) {
        Ok(player) => HttpResponse::Ok().json(player),
        Err(e) => error_response(&e),
    }
}

/// Update name and favourite.
#[put("/api/players/{id}")]
async fn api_update_player(state: AppState, path: Path<IdPath>, body: Json<PlayerBody>) -> HttpResponse {
    let mut j = match write(&state) {
        Ok(guard) => guard,
        Err(resp) => return resp,
    };
    match j.update_player_profile(path.id, &body.name, body.favorite_tennis_player.as_deref()) {
        Ok(player) => HttpResponse::Ok().json(player),
        Err(e) => error_response(&e),
    }
}

#[put("/api/players/{id}/color")]
async fn api_update_player_color(state: AppState, path: Path<IdPath>, body: Json<ColorBody>) -> HttpResponse {
    let mut j = match write(&state) {
        Ok(guard) => guard,
        Err(resp) => return resp,
    };
    match j.update_player_color(path.id, &body.color) {
        Ok(player) => HttpResponse::Ok().json(player),
        Err(e) => error_response(&e),
    }
}

/// Delete a player; fails while any match references them.
#[delete("/api/players/{id}")]
async fn api_delete_player(state: AppState, path: Path<IdPath>) -> HttpResponse {
    let mut j = match write(&state) {
        Ok(guard) => guard,
        Err(resp) => return resp,
    };
    match j.delete_player(path.id) {
        Ok(()) => HttpResponse::Ok().json(j.players()),
        Err(e) => error_response(&e),
    }
}

/// Merge the player into another one, rewriting match history.
#[post("/api/players/{id}/merge")]
async fn api_merge_player(state: AppState, path: Path<IdPath>, body: Json<MergeBody>) -> HttpResponse {
    let mut j = match write(&state) {
        Ok(guard) => guard,
        Err(resp) => return resp,
    };
    match j.merge_player(path.id, body.into) {
        Ok(rewritten) => HttpResponse::Ok().json(serde_json::json!({ "rewrittenMatches": rewritten })),
        Err(e) => error_response(&e),
    }
}

#[get("/api/players/{id}/profile")]
async fn api_player_profile(state: AppState, path: Path<IdPath>, query: Query<ProfileQuery>) -> HttpResponse {
    let j = match read(&state) {
        Ok(guard) => guard,
        Err(resp) => return resp,
    };
    match j.profile(path.id, query.include_not_completed) {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(e) => error_response(&e),
    }
}

#[get("/api/players/{id}/insights")]
async fn api_player_insights(state: AppState, path: Path<IdPath>) -> HttpResponse {
    let j = match read(&state) {
        Ok(guard) => guard,
        Err(resp) => return resp,
    };
    match j.insights(path.id) {
        Ok(insights) => HttpResponse::Ok().json(insights),
        Err(e) => error_response(&e),
    }
}

/// List matches, most recent first, with optional filters as query parameters.
#[get("/api/matches")]
async fn api_list_matches(state: AppState, query: Query<MatchFilter>) -> HttpResponse {
    let j = match read(&state) {
        Ok(guard) => guard,
        Err(resp) => return resp,
    };
    HttpResponse::Ok().json(filter_matches(j.players(), j.matches(), &query))
}

#[post("/api/matches")]
async fn api_create_match(state: AppState, body: Json<MatchBody>) -> HttpResponse {
    let mut j = match write(&state) {
        Ok(guard) => guard,
        Err(resp) => return resp,
    };
    match j.save_match(body.into_inner().into_match(Uuid::new_v4())) {
        Ok(saved) => HttpResponse::Ok().json(saved),
        Err(e) => error_response(&e),
    }
}

#[get("/api/matches/{id}")]
async fn api_get_match(state: AppState, path: Path<IdPath>) -> HttpResponse {
    let j = match read(&state) {
        Ok(guard) => guard,
        Err(resp) => return resp,
    };
    match j.game_match(path.id) {
        Some(m) => HttpResponse::Ok().json(m),
        None => error_response(&JournalError::MatchNotFound(path.id)),
    }
}

/// Replace a match; its creation time is kept.
#[put("/api/matches/{id}")]
async fn api_update_match(state: AppState, path: Path<IdPath>, body: Json<MatchBody>) -> HttpResponse {
    let mut j = match write(&state) {
        Ok(guard) => guard,
        Err(resp) => return resp,
    };
    if j.game_match(path.id).is_none() {
        return error_response(&JournalError::MatchNotFound(path.id));
    }
    match j.save_match(body.into_inner().into_match(path.id)) {
        Ok(saved) => HttpResponse::Ok().json(saved),
        Err(e) => error_response(&e),
    }
}

#[delete("/api/matches/{id}")]
async fn api_delete_match(state: AppState, path: Path<IdPath>) -> HttpResponse {
    let mut j = match write(&state) {
        Ok(guard) => guard,
        Err(resp) => return resp,
    };
    match j.delete_match(path.id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(&e),
    }
}

#[get("/api/standings")]
async fn api_standings(state: AppState, query: Query<StandingsQuery>) -> HttpResponse {
    let j = match read(&state) {
        Ok(guard) => guard,
        Err(resp) => return resp,
    };
    let rows = filter_standings(j.standings(query.include_not_completed), query.min_matches);
    HttpResponse::Ok().json(rows)
}

#[get("/api/standings.csv")]
async fn api_standings_csv(state: AppState, query: Query<StandingsQuery>) -> HttpResponse {
    let j = match read(&state) {
        Ok(guard) => guard,
        Err(resp) => return resp,
    };
    let rows = filter_standings(j.standings(query.include_not_completed), query.min_matches);
    csv_response(export::standings_csv(&rows))
}

#[get("/api/weekly")]
async fn api_weekly(state: AppState) -> HttpResponse {
    match read(&state) {
        Ok(j) => HttpResponse::Ok().json(j.weekly_snapshots()),
        Err(resp) => resp,
    }
}

#[get("/api/weekly.csv")]
async fn api_weekly_csv(state: AppState) -> HttpResponse {
    match read(&state) {
        Ok(j) => csv_response(export::weekly_csv(&j.weekly_snapshots())),
        Err(resp) => resp,
    }
}

#[get("/api/export")]
async fn api_export(state: AppState) -> HttpResponse {
    match read(&state) {
        Ok(j) => HttpResponse::Ok().json(j.export_data()),
        Err(resp) => resp,
    }
}

/// Import an export envelope (`?mode=overwrite|merge`); wrong schema versions are rejected.
#[post("/api/import")]
async fn api_import(state: AppState, query: Query<ImportQuery>, body: Json<StoredData>) -> HttpResponse {
    let mut j = match write(&state) {
        Ok(guard) => guard,
        Err(resp) => return resp,
    };
    match j.import_data(body.into_inner(), query.mode) {
        Ok(()) => HttpResponse::Ok().json(j.export_data()),
        Err(e) => error_response(&e),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env();
    let journal = Journal::open(JsonFileStore::new(&config.data_file))
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    log::info!(
        "Loaded {} players / {} matches from {:?}",
        journal.players().len(),
        journal.matches().len(),
        config.data_file
    );
    let state = Data::new(RwLock::new(journal));

    // Background task: reload the snapshot whenever another writer changed the data file
    let state_reload = state.clone();
    let reload_interval = config.reload_interval;
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(reload_interval);
        loop {
            interval.tick().await;
            let mut g = match state_reload.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            match g.refresh_if_changed() {
                Ok(true) => log::info!("Data file changed, snapshot reloaded"),
                Ok(false) => {}
                Err(e) => log::warn!("Reload failed: {}", e),
            }
        }
    });

    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_list_players)
            .service(api_create_player)
            .service(api_update_player)
            .service(api_update_player_color)
            .service(api_delete_player)
            .service(api_merge_player)
            .service(api_player_profile)
            .service(api_player_insights)
            .service(api_list_matches)
            .service(api_create_match)
            .service(api_get_match)
            .service(api_update_match)
            .service(api_delete_match)
            .service(api_standings_csv)
            .service(api_standings)
            .service(api_weekly_csv)
            .service(api_weekly)
            .service(api_export)
            .service(api_import)
    })
    .bind(bind)?
    .run()
    .await
}
