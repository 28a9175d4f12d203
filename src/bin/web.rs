//! Single binary web server: static front-end from STATIC_DIR, REST API under /api.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Configuration comes from the environment
//! (HOST, PORT, DATA_FILE, STATIC_DIR, ADMIN_PASSWORD, FLUSH_INTERVAL_SECS, COOKIE_SECURE).

use actix_files::Files;
use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::{
    cookie::Key,
    get, middleware, post,
    web::{self, Data, Json},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::{Local, NaiveDate, NaiveTime};
use football_tournament_web::{
    add_news, confirm_team, correct_result, create_match, default_kickoff, delete_match,
    delete_news, delete_team, edit_news, parse_score, rank, recompute_standings, register_team,
    reject_team, report_result, run_draw, standings_csv,
    store::file,
    Config, GameMatch, MatchId, MatchRepository, MatchState, MemoryStore, NewsEdit, NewsId,
    NewsRepository, TeamId, TeamRepository, TeamStatus, TournamentError,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Store plus a flag telling the flush task that something changed since the last write.
struct AppState {
    store: MemoryStore,
    dirty: bool,
}

/// Shared state. Every mutation holds the write lock for its whole load -> compute -> save.
type SharedState = Data<RwLock<AppState>>;

/// Session key holding the admin flag.
const ADMIN_KEY: &str = "admin";

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterBody {
    team_name: String,
    owner_name: String,
}

#[derive(Deserialize)]
struct LoginBody {
    password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TeamIdBody {
    team_id: TeamId,
}

/// Missing scores/status keep the match's current values.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateMatchBody {
    match_id: MatchId,
    score1: Option<serde_json::Value>,
    score2: Option<serde_json::Value>,
    status: Option<MatchState>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CorrectMatchBody {
    match_id: MatchId,
    score1: serde_json::Value,
    score2: serde_json::Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchIdBody {
    match_id: MatchId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateMatchBody {
    team1_id: TeamId,
    team2_id: TeamId,
    date: Option<NaiveDate>,
    /// "HH:MM" or "HH:MM:SS"; defaults to 20:00.
    time: Option<String>,
    round: Option<String>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct DrawBody {
    /// Absent: knockout round. Present: group draw with this many groups.
    group_count: Option<usize>,
    round: Option<String>,
    date: Option<NaiveDate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddNewsBody {
    title: String,
    content: String,
    image_url: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EditNewsBody {
    id: NewsId,
    title: Option<String>,
    content: Option<String>,
    #[serde(default, deserialize_with = "present_or_null")]
    image_url: Option<Option<String>>,
}

#[derive(Deserialize)]
struct NewsIdBody {
    id: NewsId,
}

/// Distinguish `"imageUrl": null` (clear) from a missing key (keep).
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    if e.is_not_found() {
        HttpResponse::NotFound().json(body)
    } else {
        HttpResponse::BadRequest().json(body)
    }
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

/// Run a read-only query against the store.
fn read_store<T, F>(state: &SharedState, f: F) -> HttpResponse
where
    T: Serialize,
    F: FnOnce(&MemoryStore) -> T,
{
    match state.read() {
        Ok(g) => HttpResponse::Ok().json(f(&g.store)),
        Err(_) => lock_error(),
    }
}

/// Run a mutation under the write lock; marks the store dirty only when it succeeded.
fn write_store<T, F>(state: &SharedState, f: F) -> HttpResponse
where
    T: Serialize,
    F: FnOnce(&mut MemoryStore) -> Result<T, TournamentError>,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match f(&mut g.store) {
        Ok(value) => {
            g.dirty = true;
            HttpResponse::Ok().json(value)
        }
        Err(e) => {
            log::warn!("Rejected: {}", e);
            error_response(&e)
        }
    }
}

/// `Some(response)` when the caller is not logged in as admin.
fn require_admin(session: &Session) -> Option<HttpResponse> {
    match session.get::<bool>(ADMIN_KEY) {
        Ok(Some(true)) => None,
        _ => Some(HttpResponse::Unauthorized().json(serde_json::json!({ "error": "Admin login required" }))),
    }
}

/// An empty body is a knockout draw with defaults; any other body must be a valid `DrawBody`.
fn parse_draw_body(raw: &[u8]) -> Result<DrawBody, serde_json::Error> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(DrawBody::default());
    }
    serde_json::from_slice(raw)
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw.trim(), "%H:%M:%S"))
        .ok()
}

#[get("/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "football-tournament-web",
    })
}

/// Confirmed teams (public list).
#[get("/teams")]
async fn api_teams(state: SharedState) -> HttpResponse {
    read_store(&state, |s| s.confirmed_teams())
}

/// Standings table: points, goal difference, goals scored.
#[get("/standings")]
async fn api_standings(state: SharedState) -> HttpResponse {
    read_store(&state, |s| rank(&s.confirmed_teams()))
}

#[get("/standings.csv")]
async fn api_standings_csv(state: SharedState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match standings_csv(&rank(&g.store.confirmed_teams())) {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .body(csv),
        Err(e) => {
            log::error!("CSV export failed: {}", e);
            HttpResponse::InternalServerError().body("csv error")
        }
    }
}

/// Matches grouped by lifecycle state: { upcoming: [...], live: [...], completed: [...] }.
#[get("/matches")]
async fn api_matches(state: SharedState) -> HttpResponse {
    read_store(&state, |s| {
        MatchState::ALL
            .iter()
            .map(|st| (st.as_str().to_string(), serde_json::json!(s.matches_by_state(*st))))
            .collect::<serde_json::Map<_, _>>()
    })
}

#[get("/news")]
async fn api_news(state: SharedState) -> HttpResponse {
    read_store(&state, |s| s.list_news())
}

/// Register a team; it waits for admin confirmation.
#[post("/register")]
async fn api_register(state: SharedState, body: Json<RegisterBody>) -> HttpResponse {
    write_store(&state, |s| register_team(s, &body.team_name, &body.owner_name))
}

#[post("/admin/login")]
async fn api_admin_login(
    config: Data<Config>,
    session: Session,
    body: Json<LoginBody>,
) -> HttpResponse {
    let Some(expected) = config.admin_password.as_deref() else {
        return HttpResponse::Forbidden()
            .json(serde_json::json!({ "success": false, "error": "Admin login is disabled" }));
    };
    if body.password != expected {
        log::warn!("Failed admin login attempt");
        return HttpResponse::Unauthorized().json(serde_json::json!({ "success": false }));
    }
    if let Err(e) = session.insert(ADMIN_KEY, true) {
        log::error!("Could not store admin session: {}", e);
        return HttpResponse::InternalServerError().body("session error");
    }
    HttpResponse::Ok().json(serde_json::json!({ "success": true }))
}

#[post("/admin/logout")]
async fn api_admin_logout(session: Session) -> HttpResponse {
    session.purge();
    HttpResponse::Ok().json(serde_json::json!({ "success": true }))
}

#[get("/admin/pending")]
async fn api_admin_pending(state: SharedState, session: Session) -> HttpResponse {
    if let Some(denied) = require_admin(&session) {
        return denied;
    }
    read_store(&state, |s| s.teams_by_status(TeamStatus::Pending))
}

#[post("/admin/confirm")]
async fn api_admin_confirm(state: SharedState, session: Session, body: Json<TeamIdBody>) -> HttpResponse {
    if let Some(denied) = require_admin(&session) {
        return denied;
    }
    write_store(&state, |s| confirm_team(s, body.team_id))
}

#[post("/admin/reject")]
async fn api_admin_reject(state: SharedState, session: Session, body: Json<TeamIdBody>) -> HttpResponse {
    if let Some(denied) = require_admin(&session) {
        return denied;
    }
    write_store(&state, |s| reject_team(s, body.team_id))
}

#[post("/admin/delete-team")]
async fn api_admin_delete_team(
    state: SharedState,
    session: Session,
    body: Json<TeamIdBody>,
) -> HttpResponse {
    if let Some(denied) = require_admin(&session) {
        return denied;
    }
    write_store(&state, |s| delete_team(s, body.team_id))
}

/// Score update and/or lifecycle move. Standings change only when the match becomes completed.
#[post("/admin/update-match")]
async fn api_admin_update_match(
    state: SharedState,
    session: Session,
    body: Json<UpdateMatchBody>,
) -> HttpResponse {
    if let Some(denied) = require_admin(&session) {
        return denied;
    }
    write_store(&state, |s| -> Result<GameMatch, TournamentError> {
        let current = s.match_by_id(body.match_id)?;
        let score1 = match &body.score1 {
            Some(v) => parse_score(v)?,
            None => current.score1,
        };
        let score2 = match &body.score2 {
            Some(v) => parse_score(v)?,
            None => current.score2,
        };
        let next = body.status.unwrap_or(current.state);
        report_result(s, body.match_id, score1.into(), score2.into(), next)
    })
}

/// Fix the score of a completed match; standings are rebuilt from all completed matches.
#[post("/admin/correct-match")]
async fn api_admin_correct_match(
    state: SharedState,
    session: Session,
    body: Json<CorrectMatchBody>,
) -> HttpResponse {
    if let Some(denied) = require_admin(&session) {
        return denied;
    }
    write_store(&state, |s| {
        let score1 = parse_score(&body.score1)?;
        let score2 = parse_score(&body.score2)?;
        correct_result(s, body.match_id, score1.into(), score2.into())
    })
}

#[post("/admin/recompute")]
async fn api_admin_recompute(state: SharedState, session: Session) -> HttpResponse {
    if let Some(denied) = require_admin(&session) {
        return denied;
    }
    write_store(&state, |s| {
        let applied = recompute_standings(s);
        Ok(serde_json::json!({ "success": true, "matchesApplied": applied }))
    })
}

/// Draw all confirmed teams and replace the upcoming fixtures.
#[post("/admin/draw-tournament")]
async fn api_admin_draw(
    state: SharedState,
    session: Session,
    body: web::Bytes,
) -> HttpResponse {
    if let Some(denied) = require_admin(&session) {
        return denied;
    }
    let body = match parse_draw_body(&body) {
        Ok(body) => body,
        Err(e) => {
            log::warn!("Rejected draw request: {}", e);
            return HttpResponse::BadRequest()
                .json(serde_json::json!({ "error": format!("Invalid draw request: {}", e) }));
        }
    };
    let kickoff = default_kickoff(body.date.unwrap_or_else(|| Local::now().date_naive()));
    write_store(&state, |s| {
        run_draw(
            s,
            body.group_count,
            body.round.as_deref(),
            kickoff,
            &mut rand::thread_rng(),
        )
    })
}

#[post("/admin/create-match")]
async fn api_admin_create_match(
    state: SharedState,
    session: Session,
    body: Json<CreateMatchBody>,
) -> HttpResponse {
    if let Some(denied) = require_admin(&session) {
        return denied;
    }
    let day = body.date.unwrap_or_else(|| Local::now().date_naive());
    let scheduled_at = match body.time.as_deref() {
        None => default_kickoff(day),
        Some(raw) => match parse_time(raw) {
            Some(t) => day.and_time(t),
            None => {
                return HttpResponse::BadRequest()
                    .json(serde_json::json!({ "error": "Invalid time, expected HH:MM" }))
            }
        },
    };
    let round = body.round.clone().filter(|r| !r.trim().is_empty());
    write_store(&state, |s| {
        create_match(s, body.team1_id, body.team2_id, scheduled_at, round)
    })
}

#[post("/admin/delete-match")]
async fn api_admin_delete_match(
    state: SharedState,
    session: Session,
    body: Json<MatchIdBody>,
) -> HttpResponse {
    if let Some(denied) = require_admin(&session) {
        return denied;
    }
    write_store(&state, |s| delete_match(s, body.match_id))
}

#[post("/admin/add-news")]
async fn api_admin_add_news(state: SharedState, session: Session, body: Json<AddNewsBody>) -> HttpResponse {
    if let Some(denied) = require_admin(&session) {
        return denied;
    }
    write_store(&state, |s| {
        add_news(s, &body.title, &body.content, body.image_url.clone())
    })
}

#[post("/admin/edit-news")]
async fn api_admin_edit_news(state: SharedState, session: Session, body: Json<EditNewsBody>) -> HttpResponse {
    if let Some(denied) = require_admin(&session) {
        return denied;
    }
    let body = body.into_inner();
    let edit = NewsEdit {
        title: body.title,
        content: body.content,
        image_url: body.image_url,
    };
    write_store(&state, |s| edit_news(s, body.id, edit))
}

#[post("/admin/delete-news")]
async fn api_admin_delete_news(state: SharedState, session: Session, body: Json<NewsIdBody>) -> HttpResponse {
    if let Some(denied) = require_admin(&session) {
        return denied;
    }
    write_store(&state, |s| delete_news(s, body.id))
}

async fn api_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "API endpoint not found" }))
}

/// Write the store to disk if it changed since the last flush.
async fn flush(state: &SharedState, path: &Path) {
    let snapshot = {
        let mut g = match state.write() {
            Ok(guard) => guard,
            Err(_) => return,
        };
        if !g.dirty {
            return;
        }
        g.dirty = false;
        file::to_json(&g.store)
    };
    let result = match snapshot {
        Ok(json) => file::write_atomic(path, json).await,
        Err(e) => Err(std::io::Error::new(std::io::ErrorKind::InvalidData, e)),
    };
    match result {
        Ok(()) => log::debug!("Saved tournament data to {}", path.display()),
        Err(e) => {
            log::error!("Could not save tournament data to {}: {}", path.display(), e);
            if let Ok(mut g) = state.write() {
                g.dirty = true;
            }
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    let store = match &config.data_file {
        Some(path) => {
            let store = file::load(path).inspect_err(|e| {
                log::error!("Could not load {}: {}", path.display(), e);
            })?;
            log::info!(
                "Loaded {} team(s), {} match(es), {} news item(s) from {}",
                store.teams.len(),
                store.matches.len(),
                store.news.len(),
                path.display()
            );
            store
        }
        None => {
            log::info!("DATA_FILE is empty: data is kept in memory only");
            MemoryStore::new()
        }
    };
    if config.admin_password.is_none() {
        log::warn!("ADMIN_PASSWORD is not set: admin routes are unreachable");
    }

    let state = Data::new(RwLock::new(AppState { store, dirty: false }));

    // Background task: periodically write changes to DATA_FILE
    if let Some(path) = config.data_file.clone() {
        let state_flush = state.clone();
        let every = config.flush_interval;
        actix_web::rt::spawn(async move {
            let mut interval = actix_web::rt::time::interval(every);
            loop {
                interval.tick().await;
                flush(&state_flush, &path).await;
            }
        });
    }

    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let session_key = Key::generate();
    let secure_cookies = config.secure_cookies;
    let static_dir: PathBuf = config.static_dir.clone();
    let data_file = config.data_file.clone();
    let config = Data::new(config);
    let server_state = state.clone();

    HttpServer::new(move || {
        App::new()
            .app_data(server_state.clone())
            .app_data(config.clone())
            .wrap(middleware::Logger::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), session_key.clone())
                    .cookie_secure(secure_cookies)
                    .build(),
            )
            .service(
                web::scope("/api")
                    .wrap(
                        middleware::DefaultHeaders::new()
                            .add(("Cache-Control", "no-cache, no-store, must-revalidate"))
                            .add(("Pragma", "no-cache"))
                            .add(("Expires", "0")),
                    )
                    .service(api_health)
                    .service(api_teams)
                    .service(api_standings)
                    .service(api_standings_csv)
                    .service(api_matches)
                    .service(api_news)
                    .service(api_register)
                    .service(api_admin_login)
                    .service(api_admin_logout)
                    .service(api_admin_pending)
                    .service(api_admin_confirm)
                    .service(api_admin_reject)
                    .service(api_admin_delete_team)
                    .service(api_admin_update_match)
                    .service(api_admin_correct_match)
                    .service(api_admin_recompute)
                    .service(api_admin_draw)
                    .service(api_admin_create_match)
                    .service(api_admin_delete_match)
                    .service(api_admin_add_news)
                    .service(api_admin_edit_news)
                    .service(api_admin_delete_news)
                    .default_service(web::route().to(api_not_found)),
            )
            .service(Files::new("/", static_dir.clone()).index_file("index.html"))
    })
    .bind(bind)?
    .run()
    .await?;

    if let Some(path) = data_file {
        flush(&state, &path).await;
    }
    Ok(())
}
