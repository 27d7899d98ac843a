use actix_web::{middleware, web, App, HttpResponse, HttpServer, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::display::render_schedule;
use crate::error::ScheduleError;
use crate::parser::{load_course_lines, parse_course_lines};
use crate::report::{conflict_lines, invalid_lines, summary_lines};
use crate::schedule::time_utils::{day_name, format_clock};
use crate::schedule::{build_schedule, WeekSchedule};

/// Read-only view over the configured files directory
pub struct AppState {
    pub config: Config,
}

#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    days: Vec<DayResponse>,
    summary: Vec<String>,
    total_credits: u64,
    conflicts: Vec<String>,
    invalid: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DayResponse {
    day: String,
    meetings: Vec<MeetingResponse>,
}

#[derive(Debug, Serialize)]
pub struct MeetingResponse {
    name: String,
    title: String,
    location: String,
    start: String,
    end: String,
}

impl From<&WeekSchedule> for ScheduleResponse {
    fn from(schedule: &WeekSchedule) -> Self {
        let days = schedule
            .days()
            .map(|(day, meetings)| DayResponse {
                day: day_name(day).to_string(),
                meetings: meetings
                    .iter()
                    .filter_map(|m| {
                        m.span().map(|span| MeetingResponse {
                            name: m.name.clone(),
                            title: m.title.clone(),
                            location: m.location.clone(),
                            start: format_clock(span.start),
                            end: format_clock(span.end),
                        })
                    })
                    .collect(),
            })
            .collect();

        ScheduleResponse {
            days,
            summary: summary_lines(schedule),
            total_credits: schedule.total_credits(),
            conflicts: conflict_lines(schedule),
            invalid: invalid_lines(schedule),
        }
    }
}

/// Only bare file names inside the files directory are served
fn is_safe_file_name(file: &str) -> bool {
    !file.is_empty() && !file.contains(['/', '\\']) && !file.contains("..")
}

fn error_response(err: &ScheduleError) -> HttpResponse {
    warn!(error = %err, "schedule request failed");
    let body = serde_json::json!({"error": err.to_string()});
    if err.is_unreadable() {
        HttpResponse::NotFound().json(body)
    } else {
        HttpResponse::UnprocessableEntity().json(body)
    }
}

fn load_schedule(state: &AppState, file: &str) -> std::result::Result<WeekSchedule, HttpResponse> {
    if !is_safe_file_name(file) {
        return Err(HttpResponse::BadRequest().json(serde_json::json!({"error": "Invalid file name"})));
    }
    let lines = load_course_lines(state.config.schedule_path(file)).map_err(|e| error_response(&e))?;
    info!(file, lines = lines.len(), "schedule loaded");
    Ok(build_schedule(&lines))
}

// JSON schedule endpoint
async fn get_schedule(file: web::Path<String>, state: web::Data<AppState>) -> Result<HttpResponse> {
    match load_schedule(&state, &file) {
        Ok(schedule) => Ok(HttpResponse::Ok().json(ScheduleResponse::from(&schedule))),
        Err(response) => Ok(response),
    }
}

// Plain-text timetable endpoint
async fn get_schedule_text(file: web::Path<String>, state: web::Data<AppState>) -> Result<HttpResponse> {
    match load_schedule(&state, &file) {
        Ok(schedule) => Ok(HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .body(render_schedule(&schedule))),
        Err(response) => Ok(response),
    }
}

// Renders an uploaded schedule without storing it
async fn render_upload(body: web::Bytes) -> Result<HttpResponse> {
    match parse_course_lines(&body[..]) {
        Ok(lines) => Ok(HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .body(render_schedule(&build_schedule(&lines)))),
        Err(e) => Ok(error_response(&e)),
    }
}

/// Registers all routes; shared by the server and the handler tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/schedule/{file}", web::get().to(get_schedule))
        .route("/schedule/{file}", web::get().to(get_schedule_text))
        .route("/api/render", web::post().to(render_upload));
}

pub async fn start_server(config: Config) -> std::io::Result<()> {
    let bind = (config.host.clone(), config.port);
    info!(host = %bind.0, port = bind.1, files_dir = %config.files_dir.display(), "starting web server");

    let app_state = web::Data::new(AppState { config });

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(bind)?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use std::fs;

    const WEEK: &str = "CS101,Intro,3,Hall101,MW-9:00 AM-10:00 AM\n\
                        CS102,Data,3,Hall102,MW-9:30 AM-10:30 AM\n\
                        ART100,Studio,2,ONLINE\n";

    fn state_for(dir: &std::path::Path) -> web::Data<AppState> {
        web::Data::new(AppState {
            config: Config {
                files_dir: dir.to_path_buf(),
                ..Config::default()
            },
        })
    }

    #[test]
    fn file_name_guard() {
        assert!(is_safe_file_name("week.csv"));
        assert!(!is_safe_file_name("../secret"));
        assert!(!is_safe_file_name("a/b.csv"));
        assert!(!is_safe_file_name(""));
    }

    #[actix_web::test]
    async fn json_schedule_from_files_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("week.csv"), WEEK).unwrap();
        let app = actix_test::init_service(App::new().app_data(state_for(dir.path())).configure(configure)).await;

        let req = actix_test::TestRequest::get().uri("/api/schedule/week.csv").to_request();
        let body: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["total_credits"], 5);
        assert_eq!(body["days"][0]["day"], "Monday");
        assert_eq!(body["days"][0]["meetings"][0]["start"], "9:00 AM");
        assert_eq!(body["conflicts"][0], "Data conflicts with Intro on Monday");
        assert_eq!(body["summary"].as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn text_schedule_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("week.csv"), WEEK).unwrap();
        let app = actix_test::init_service(App::new().app_data(state_for(dir.path())).configure(configure)).await;

        let req = actix_test::TestRequest::get().uri("/schedule/week.csv").to_request();
        let body = actix_test::call_and_read_body(&app, req).await;
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("----MONDAY"));
        assert!(text.contains("Total Credits: 5"));

        let req = actix_test::TestRequest::get().uri("/schedule/other.csv").to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn upload_renders_or_rejects() {
        let dir = tempfile::tempdir().unwrap();
        let app = actix_test::init_service(App::new().app_data(state_for(dir.path())).configure(configure)).await;

        let req = actix_test::TestRequest::post().uri("/api/render").set_payload(WEEK).to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = actix_test::TestRequest::post()
            .uri("/api/render")
            .set_payload("CS101,Intro,3,Hall101,MZ-9:00 AM-10:00 AM")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
