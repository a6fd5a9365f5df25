use actix_web::{web, App, HttpServer, HttpResponse, Result, HttpRequest, middleware};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::display::{build_roster_table, RosterRow};
use crate::lineup::{create_game_schedule, GameSchedule};
use crate::lineup::types::{position_name, FIELDING_POSITIONS,
                           DEFAULT_MIN_GIRLS_ON_FIELD, DEFAULT_NUM_INNINGS};
use crate::parser::{attendance_dates, load_roster_from_reader};

// In-memory storage for the last generated schedule (in production, use a database)
pub struct AppState {
    pub schedule: Mutex<Option<GameSchedule>>,
    pub admin_password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    password: String,
}

#[derive(Deserialize)]
pub struct UploadParams {
    date: Option<String>,
}

#[derive(Serialize)]
pub struct InningView {
    positions: HashMap<String, String>, // abbreviation -> player name
    bench: Vec<String>,
}

#[derive(Serialize)]
pub struct ScheduleResponse {
    game_date: String,
    table: Vec<RosterRow>,
    innings: Vec<InningView>,
}

// Admin login endpoint
async fn admin_login(
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if req.password == state.admin_password {
        Ok(HttpResponse::Ok().json(serde_json::json!({"success": true})))
    } else {
        Ok(HttpResponse::Unauthorized().json(serde_json::json!({"success": false, "error": "Invalid password"})))
    }
}

// Admin roster upload endpoint: runs the full optimization on the posted CSV
async fn admin_upload(
    req: HttpRequest,
    params: web::Query<UploadParams>,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    // Check password from header
    let password = req
        .headers()
        .get("X-Admin-Password")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if password != state.admin_password {
        return Ok(HttpResponse::Unauthorized().json(serde_json::json!({"success": false, "error": "Unauthorized"})));
    }

    let reader = csv::Reader::from_reader(&body[..]);
    let players = match load_roster_from_reader(reader) {
        Ok(players) => players,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": format!("Failed to process roster CSV: {}", e)
            })))
        }
    };

    // Use the requested game date, or the first one the roster mentions
    let game_date = match params.date.clone().or_else(|| attendance_dates(&players).into_iter().next()) {
        Some(date) => date,
        None => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": "Roster has no attendance columns and no date was given"
            })))
        }
    };

    match create_game_schedule(&players, &game_date, DEFAULT_NUM_INNINGS, DEFAULT_MIN_GIRLS_ON_FIELD) {
        Ok(schedule) => {
            *state.schedule.lock().unwrap() = Some(schedule);
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "message": format!("Schedule generated for {}", game_date)
            })))
        }
        Err(e) => Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to optimize roster: {}", e)
        }))),
    }
}

// Schedule endpoint: the roster-by-inning table plus a field view per inning
async fn get_schedule(state: web::Data<AppState>) -> Result<HttpResponse> {
    let schedule = state.schedule.lock().unwrap();

    if let Some(ref schedule) = *schedule {
        let table = build_roster_table(&schedule.batting, &schedule.innings);

        let innings: Vec<InningView> = schedule
            .innings
            .iter()
            .map(|assignment| {
                let mut positions = HashMap::new();
                for position in FIELDING_POSITIONS {
                    if let Some(player) = assignment.positions.get(&position) {
                        if let Some(abbreviation) = position_name(position) {
                            positions.insert(abbreviation.to_string(), player.name.clone());
                        }
                    }
                }
                let bench = schedule
                    .batting
                    .players
                    .iter()
                    .filter(|p| assignment.position_of(&p.name).is_none())
                    .map(|p| p.name.clone())
                    .collect();
                InningView { positions, bench }
            })
            .collect();

        Ok(HttpResponse::Ok().json(ScheduleResponse {
            game_date: schedule.game_date.clone(),
            table,
            innings,
        }))
    } else {
        Ok(HttpResponse::NotFound().json(serde_json::json!({"error": "Schedule not available"})))
    }
}

// HTML page handlers
async fn index() -> Result<HttpResponse> {
    let html = include_str!("../templates/index.html");
    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

async fn admin_page() -> Result<HttpResponse> {
    let html = include_str!("../templates/admin.html");
    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

pub async fn start_server(port: u16, admin_password: String) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState {
        schedule: Mutex::new(None),
        admin_password,
    });

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .route("/", web::get().to(index))
            .route("/admin", web::get().to(admin_page))
            .route("/api/login", web::post().to(admin_login))
            .route("/api/upload", web::post().to(admin_upload))
            .route("/api/schedule", web::get().to(get_schedule))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
