//! Single binary web server exposing the bracket engine over REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080).

use actix_web::{
    get, post,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use bracket_engine::{
    create_tournament, submit_result, EngineError, ErrorKind, Format, GeneratedParticipants,
    ParticipantRegistry, Tournament, TournamentId, TournamentStatus,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Per-tournament entry: tournament data + last activity time (for auto-cleanup).
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

/// In-memory state: many tournaments by ID. The write lock is the engine's
/// per-tournament mutual exclusion: two near-simultaneous submissions for the
/// same tournament serialize here.
type AppState = Data<RwLock<HashMap<TournamentId, TournamentEntry>>>;

/// Inactivity threshold: tournaments not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    participant_count: usize,
    #[serde(default)]
    format: Format,
}

#[derive(Deserialize)]
struct SubmitResultBody {
    match_id: Uuid,
    score1: u32,
    score2: u32,
    /// Opaque submitter tag, logged but not interpreted.
    #[serde(default)]
    submitted_by: Option<String>,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Map an engine error onto the transport: caller faults are 4xx, broken
/// invariants are 500 (and already logged by the engine).
fn error_response(err: &EngineError) -> HttpResponse {
    let body = serde_json::json!({ "error": err.to_string() });
    match err.kind() {
        ErrorKind::Validation => HttpResponse::BadRequest().json(body),
        ErrorKind::State => match err {
            EngineError::MatchNotFound(_) => HttpResponse::NotFound().json(body),
            _ => HttpResponse::Conflict().json(body),
        },
        ErrorKind::Topology | ErrorKind::Consistency => {
            HttpResponse::InternalServerError().json(body)
        }
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "bracket-engine",
    })
}

/// Create a tournament: builds the full topology up front.
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let participants = GeneratedParticipants.list_seeded_participants(body.participant_count);
    let tournament = match create_tournament(participants, body.format) {
        Ok(t) => t,
        Err(e) => return error_response(&e),
    };
    let id = tournament.id;
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
    HttpResponse::Ok().json(&g.get(&id).unwrap().tournament)
}

/// Submit a match result; the cascade runs synchronously before the response.
#[post("/api/tournaments/{id}/results")]
async fn api_submit_result(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<SubmitResultBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    match submit_result(t, body.match_id, body.score1, body.score2) {
        Ok(outcome) => {
            if let Some(who) = &body.submitted_by {
                log::info!("result for match {} submitted by {}", body.match_id, who);
            }
            // Fire-and-forget notification sink.
            for event in &outcome.events {
                log::info!("tournament {}: {:?}", t.id, event);
            }
            HttpResponse::Ok().json(serde_json::json!({
                "updated": outcome.updated,
                "events": outcome.events,
                "status": t.status,
                "champion": t.champion,
            }))
        }
        Err(e) => error_response(&e),
    }
}

/// Full match set, read-only projection for display.
#[get("/api/tournaments/{id}/bracket")]
async fn api_get_bracket(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(serde_json::json!({
                "format": entry.tournament.format,
                "participants": entry.tournament.participants,
                "matches": entry.tournament.bracket_view(),
            }))
        }
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
    }
}

/// Tournament status: in progress, or finished with the champion.
#[get("/api/tournaments/{id}/status")]
async fn api_get_status(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            let t = &entry.tournament;
            let champion = match t.status {
                TournamentStatus::Finished => t.champion.and_then(|id| t.participant(id)),
                TournamentStatus::InProgress => None,
            };
            HttpResponse::Ok().json(serde_json::json!({
                "status": t.status,
                "champion": champion,
                "needs_review": t.needs_review,
            }))
        }
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(HashMap::<TournamentId, TournamentEntry>::new()));

    // Background task: every 30 minutes, remove tournaments inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive tournament(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_submit_result)
            .service(api_get_bracket)
            .service(api_get_status)
    })
    .bind(bind)?
    .run()
    .await
}
