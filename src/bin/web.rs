//! Single binary web server: HTML from templates/, static from /static, API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT, INACTIVITY_HOURS.

use actix_files::Files;
use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::{
    cookie::Key,
    delete, get, post, put,
    web::{self, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tennis_tournament_web::{
    import_roster_csv, make_draw, record_walkover, reopen_tournament_match, score_point,
    start_match, undo_point, BracketError, BracketOptions, DrawSize, MatchFormat, PlayerId,
    PointType, ProgressionError, SeedingMode, Side, Tournament, TournamentError, TournamentId,
    UnseededPlacement,
};

/// Per-tournament entry: tournament data + last activity time (for auto-cleanup).
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

/// In-memory state: many tournaments by ID. Every mutation holds the write lock, so points and
/// results for a tournament are applied strictly one at a time.
type AppState = Data<RwLock<HashMap<TournamentId, TournamentEntry>>>;

/// Session key holding the caller's current tournament id.
const SESSION_TOURNAMENT_KEY: &str = "tournament_id";

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    #[serde(default)]
    name: String,
    #[serde(default = "default_draw_size")]
    draw_size: u32,
    #[serde(default)]
    seeding: SeedingMode,
    #[serde(default = "default_max_seeds")]
    max_seeds: u32,
    #[serde(default)]
    unseeded_placement: UnseededPlacement,
    #[serde(default = "default_best_of")]
    best_of: u32,
    #[serde(default = "default_tiebreak_sets")]
    tiebreak_sets: bool,
}

fn default_draw_size() -> u32 {
    DrawSize::default().get()
}

fn default_max_seeds() -> u32 {
    BracketOptions::default().max_seeds
}

fn default_best_of() -> u32 {
    3
}

fn default_tiebreak_sets() -> bool {
    true
}

#[derive(Deserialize)]
struct AddPlayerBody {
    name: String,
    #[serde(default)]
    ranking: Option<u32>,
}

#[derive(Deserialize)]
struct SetSeedBody {
    seed: Option<u32>,
}

#[derive(Deserialize)]
struct DrawSizeBody {
    draw_size: u32,
}

#[derive(Deserialize)]
struct SeedingBody {
    seeding: SeedingMode,
    #[serde(default = "default_max_seeds")]
    max_seeds: u32,
}

#[derive(Deserialize)]
struct FormatBody {
    best_of: u32,
    #[serde(default = "default_tiebreak_sets")]
    tiebreak_sets: bool,
}

#[derive(Deserialize)]
struct StartMatchBody {
    #[serde(default)]
    first_server: Option<Side>,
}

#[derive(Deserialize)]
struct PointBody {
    scorer: Side,
    point_type: PointType,
}

#[derive(Deserialize)]
struct WalkoverBody {
    winner: PlayerId,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and player id (e.g. /api/tournaments/{id}/players/{player_id})
#[derive(Deserialize)]
struct TournamentPlayerPath {
    id: TournamentId,
    player_id: PlayerId,
}

/// Path segments: tournament id and match coordinates (e.g. /api/tournaments/{id}/matches/1/3)
#[derive(Deserialize)]
struct MatchPath {
    id: TournamentId,
    round: usize,
    position: usize,
}

fn match_format(best_of: u32, tiebreak_sets: bool) -> Result<MatchFormat, TournamentError> {
    MatchFormat::best_of(best_of)
        .map(|f| MatchFormat { tiebreak_sets, ..f })
        .ok_or(TournamentError::InvalidMatchFormat)
}

fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        TournamentError::Progression(ProgressionError::ProgressionTargetMissing { .. })
        | TournamentError::Bracket(BracketError::ByePropagation(_)) => {
            HttpResponse::InternalServerError().json(body)
        }
        TournamentError::MatchNotFound { .. } => HttpResponse::NotFound().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }))
}

/// Run `action` on a tournament under the write lock and answer with the updated tournament.
fn update<T>(
    state: &AppState,
    id: TournamentId,
    action: impl FnOnce(&mut Tournament) -> Result<T, TournamentError>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    match action(&mut *t) {
        Ok(_) => HttpResponse::Ok().json(t),
        Err(e) => {
            log::warn!("Tournament {}: {}", id, e);
            error_response(&e)
        }
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "tennis-tournament-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Create a new tournament (returns it with id; the id is also remembered in the session).
#[post("/api/tournaments")]
async fn api_create_tournament(
    state: AppState,
    session: Session,
    body: Option<Json<CreateTournamentBody>>,
) -> HttpResponse {
    let body = body.map(Json::into_inner).unwrap_or(CreateTournamentBody {
        name: String::new(),
        draw_size: default_draw_size(),
        seeding: SeedingMode::default(),
        max_seeds: default_max_seeds(),
        unseeded_placement: UnseededPlacement::default(),
        best_of: default_best_of(),
        tiebreak_sets: default_tiebreak_sets(),
    });
    let draw_size = match DrawSize::new(body.draw_size) {
        Ok(d) => d,
        Err(e) => return error_response(&TournamentError::from(e)),
    };
    let format = match match_format(body.best_of, body.tiebreak_sets) {
        Ok(f) => f,
        Err(e) => return error_response(&e),
    };
    let options = BracketOptions {
        draw_size,
        seeding: body.seeding,
        max_seeds: body.max_seeds,
        unseeded_placement: body.unseeded_placement,
    };
    let tournament = Tournament::new(body.name.trim(), options, format);
    let id = tournament.id;
    if let Err(e) = session.insert(SESSION_TOURNAMENT_KEY, id) {
        log::warn!("Could not store tournament id in session: {}", e);
    }
    let response = HttpResponse::Ok().json(&tournament);
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    g.insert(
        id,
        TournamentEntry {
            tournament,
            last_activity: Instant::now(),
        },
    );
    log::info!("Created tournament {}", id);
    response
}

/// Get a tournament by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    update(&state, path.id, |_| Ok(()))
}

/// The tournament this browser session created last (404 if none or expired).
#[get("/api/session/tournament")]
async fn api_session_tournament(state: AppState, session: Session) -> HttpResponse {
    match session.get::<TournamentId>(SESSION_TOURNAMENT_KEY) {
        Ok(Some(id)) => update(&state, id, |_| Ok(())),
        Ok(None) => not_found(),
        Err(e) => {
            log::warn!("Unreadable session: {}", e);
            not_found()
        }
    }
}

/// Add a player (Setup or Drawn; a drawn tournament goes back to Setup).
#[post("/api/tournaments/{id}/players")]
async fn api_add_player(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<AddPlayerBody>,
) -> HttpResponse {
    update(&state, path.id, |t| t.add_player(body.name.trim(), body.ranking))
}

/// Import players from CSV text: name[,ranking[,seed]] per line.
#[post("/api/tournaments/{id}/players/import")]
async fn api_import_players(state: AppState, path: Path<TournamentPath>, body: String) -> HttpResponse {
    update(&state, path.id, |t| import_roster_csv(t, body.as_bytes()))
}

/// Remove a player by id.
#[delete("/api/tournaments/{id}/players/{player_id}")]
async fn api_remove_player(state: AppState, path: Path<TournamentPlayerPath>) -> HttpResponse {
    update(&state, path.id, |t| t.remove_player(path.player_id))
}

/// Set or clear a player's manual seed.
#[put("/api/tournaments/{id}/players/{player_id}/seed")]
async fn api_set_seed(
    state: AppState,
    path: Path<TournamentPlayerPath>,
    body: Json<SetSeedBody>,
) -> HttpResponse {
    update(&state, path.id, |t| t.set_seed(path.player_id, body.seed))
}

#[put("/api/tournaments/{id}/draw-size")]
async fn api_set_draw_size(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<DrawSizeBody>,
) -> HttpResponse {
    update(&state, path.id, |t| t.set_draw_size(body.draw_size))
}

#[put("/api/tournaments/{id}/seeding")]
async fn api_set_seeding(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<SeedingBody>,
) -> HttpResponse {
    update(&state, path.id, |t| t.set_seeding(body.seeding, body.max_seeds))
}

#[put("/api/tournaments/{id}/format")]
async fn api_set_format(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<FormatBody>,
) -> HttpResponse {
    update(&state, path.id, |t| {
        let format = match_format(body.best_of, body.tiebreak_sets)?;
        t.set_match_format(format)
    })
}

/// Make (or remake) the draw. Fails without touching the previous draw.
#[post("/api/tournaments/{id}/draw")]
async fn api_make_draw(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    update(&state, path.id, make_draw)
}

#[post("/api/tournaments/{id}/matches/{round}/{position}/start")]
async fn api_start_match(
    state: AppState,
    path: Path<MatchPath>,
    body: Option<Json<StartMatchBody>>,
) -> HttpResponse {
    let first_server = body.and_then(|b| b.first_server);
    update(&state, path.id, |t| {
        start_match(t, path.round, path.position, first_server)
    })
}

#[post("/api/tournaments/{id}/matches/{round}/{position}/points")]
async fn api_score_point(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<PointBody>,
) -> HttpResponse {
    update(&state, path.id, |t| {
        score_point(t, path.round, path.position, body.scorer, body.point_type)
    })
}

#[post("/api/tournaments/{id}/matches/{round}/{position}/undo")]
async fn api_undo_point(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    update(&state, path.id, |t| undo_point(t, path.round, path.position))
}

/// Decide a match without scoring (walkover or retirement).
#[post("/api/tournaments/{id}/matches/{round}/{position}/walkover")]
async fn api_walkover(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<WalkoverBody>,
) -> HttpResponse {
    update(&state, path.id, |t| {
        record_walkover(t, path.round, path.position, body.winner)
    })
}

/// Withdraw a decided result (rejected once the winner's next match has started).
#[post("/api/tournaments/{id}/matches/{round}/{position}/reopen")]
async fn api_reopen_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    update(&state, path.id, |t| {
        reopen_tournament_match(t, path.round, path.position)
    })
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_inactivity_hours() -> u64 {
    12
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let inactivity_hours: u64 = std::env::var("INACTIVITY_HOURS")
        .ok()
        .and_then(|h| h.parse().ok())
        .unwrap_or_else(default_inactivity_hours);
    let inactivity_timeout = Duration::from_secs(inactivity_hours * 3600);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(HashMap::<TournamentId, TournamentEntry>::new()));
    let session_key = Key::generate();

    // Background task: every 30 minutes, remove tournaments past the inactivity timeout
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < inactivity_timeout);
            let removed = before - g.len();
            if removed > 0 {
                log::info!(
                    "Cleaned up {} inactive tournament(s) (no activity for {}h)",
                    removed,
                    inactivity_hours
                );
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), session_key.clone())
                    .cookie_secure(false)
                    .build(),
            )
            .app_data(state.clone())
            .route("/", web::get().to(serve_index_async))
            .service(api_health)
            .service(favicon)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_session_tournament)
            .service(api_add_player)
            .service(api_import_players)
            .service(api_remove_player)
            .service(api_set_seed)
            .service(api_set_draw_size)
            .service(api_set_seeding)
            .service(api_set_format)
            .service(api_make_draw)
            .service(api_start_match)
            .service(api_score_point)
            .service(api_undo_point)
            .service(api_walkover)
            .service(api_reopen_match)
            .service(Files::new("/static", "static").show_files_listing())
    })
    .bind(bind)?
    .run()
    .await
}

async fn serve_index_async() -> HttpResponse {
    let html = include_str!("../../templates/index.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
