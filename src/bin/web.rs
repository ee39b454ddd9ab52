//! Single binary web server: HTML from templates/, static from /static, API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default so the app is reachable via DNS on a VPS.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080), DATA_DIR (e.g. ./data).

use actix_files::Files;
use actix_web::{
    delete, get, post,
    web::{self, Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use grand_prix_web::{
    calculate_fair_race_counts, confirm_results, end_grand_prix, leaderboard, reset_selection,
    select_rank, start_grand_prix, start_new_tournament, state_view, LeaderboardRow, RaceNight,
    Storage,
};
use serde::Deserialize;
use std::sync::RwLock;
use uuid::Uuid;

/// Shared state: the tournament night plus the storage handle that persists it.
struct AppCtx {
    night: RaceNight,
    storage: Storage,
}

type AppState = Data<RwLock<AppCtx>>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct AddPlayerBody {
    name: String,
}

#[derive(Deserialize)]
struct StartGrandPrixBody {
    controllers: usize,
    /// Absent or outside 1..=12 means unbounded.
    #[serde(default)]
    races: Option<u32>,
}

#[derive(Deserialize)]
struct SelectRankBody {
    player_id: Uuid,
}

#[derive(Deserialize)]
struct FairRaceCountsQuery {
    controllers: usize,
}

/// Path segment: player id (e.g. /api/players/{id})
#[derive(Deserialize)]
struct PlayerPath {
    id: Uuid,
}

/// Persist the mutated state, then answer with a fresh view-model snapshot.
/// A save failure is reported as a generic error; the mutation stays applied.
fn save_and_respond(ctx: &AppCtx) -> HttpResponse {
    if let Err(e) = ctx.storage.save(&ctx.night) {
        log::error!("Failed to persist state to {:?}: {}", ctx.storage.dir(), e);
        return HttpResponse::InternalServerError()
            .json(serde_json::json!({ "error": "Something went wrong saving the results" }));
    }
    HttpResponse::Ok().json(state_view(&ctx.night))
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "grand-prix-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Current state as a view-model snapshot (no mutation, no save).
#[get("/api/state")]
async fn api_get_state(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    HttpResponse::Ok().json(state_view(&g.night))
}

/// Register a player. A blank name is silently ignored.
#[post("/api/players")]
async fn api_add_player(state: AppState, body: Json<AddPlayerBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    g.night.add_player(&body.name);
    save_and_respond(&g)
}

/// Remove a player (the page confirms first). Strikes them from any
/// in-progress race.
#[delete("/api/players/{id}")]
async fn api_remove_player(state: AppState, path: Path<PlayerPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.night.remove_player(path.id) {
        Ok(()) => save_and_respond(&g),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Fairness advisory for the current roster and a prospective controller count.
#[get("/api/fair-race-counts")]
async fn api_fair_race_counts(state: AppState, query: Query<FairRaceCountsQuery>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let counts = calculate_fair_race_counts(g.night.players.len(), query.controllers);
    HttpResponse::Ok().json(serde_json::json!({ "fair_race_counts": counts }))
}

/// Start the grand prix (NotStarted -> Active) and queue the first race.
#[post("/api/grand-prix/start")]
async fn api_start_grand_prix(state: AppState, body: Json<StartGrandPrixBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match start_grand_prix(
        &mut g.night,
        body.controllers,
        body.races,
        &mut rand::thread_rng(),
    ) {
        Ok(()) => save_and_respond(&g),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Record the next finishing position for a racer (double clicks are no-ops).
#[post("/api/grand-prix/select")]
async fn api_select_rank(state: AppState, body: Json<SelectRankBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match select_rank(&mut g.night, body.player_id) {
        Ok(()) => save_and_respond(&g),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Clear the in-progress ranks for the current race.
#[post("/api/grand-prix/reset-selection")]
async fn api_reset_selection(state: AppState) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match reset_selection(&mut g.night) {
        Ok(()) => save_and_respond(&g),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Confirm the current race: score it and queue the next one (or finish).
#[post("/api/grand-prix/confirm")]
async fn api_confirm_results(state: AppState) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match confirm_results(&mut g.night, &mut rand::thread_rng()) {
        Ok(()) => save_and_respond(&g),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// End the grand prix early (no confirmation; final standings freeze).
#[post("/api/grand-prix/end")]
async fn api_end_grand_prix(state: AppState) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match end_grand_prix(&mut g.night) {
        Ok(()) => save_and_respond(&g),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Start a new tournament with the same roster: stats reset, grand prix cleared.
#[post("/api/grand-prix/new")]
async fn api_new_tournament(state: AppState) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match start_new_tournament(&mut g.night) {
        Ok(()) => save_and_respond(&g),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Full reset (the page confirms first): wipes roster, stats, and history.
#[post("/api/reset")]
async fn api_full_reset(state: AppState) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    g.night.reset_everything();
    save_and_respond(&g)
}

/// Standings export for sharing after the night.
#[get("/api/leaderboard.csv")]
async fn api_leaderboard_csv(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match leaderboard_csv(&leaderboard(&g.night.players)) {
        Ok(csv_text) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .body(csv_text),
        Err(e) => {
            log::error!("Failed to export leaderboard: {}", e);
            HttpResponse::InternalServerError()
                .json(serde_json::json!({ "error": "Failed to export leaderboard" }))
        }
    }
}

fn leaderboard_csv(rows: &[LeaderboardRow]) -> Result<String, Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["rank", "name", "wins", "points", "races_played"])?;
    for row in rows {
        wtr.write_record([
            row.rank.to_string(),
            row.player.name.clone(),
            row.player.wins.to_string(),
            row.player.points.to_string(),
            row.player.races_played.to_string(),
        ])?;
    }
    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_data_dir() -> String {
    "./data".to_string()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| default_data_dir());
    let bind = (host.as_str(), port);

    let storage = Storage::new(&data_dir);
    let night = match storage.load() {
        Ok(night) => {
            log::info!(
                "Loaded {} player(s) from {}",
                night.players.len(),
                data_dir
            );
            night
        }
        Err(e) => {
            log::warn!("Could not load saved state from {}: {}; starting fresh", data_dir, e);
            RaceNight::new()
        }
    };

    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(AppCtx { night, storage }));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .route("/", web::get().to(serve_index_async))
            .service(api_health)
            .service(favicon)
            .service(api_get_state)
            .service(api_add_player)
            .service(api_remove_player)
            .service(api_fair_race_counts)
            .service(api_start_grand_prix)
            .service(api_select_rank)
            .service(api_reset_selection)
            .service(api_confirm_results)
            .service(api_end_grand_prix)
            .service(api_new_tournament)
            .service(api_full_reset)
            .service(api_leaderboard_csv)
            .service(Files::new("/static", "static"))
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
