use actix_web::{get, post, web, App, HttpResponse, HttpServer, Responder};
use anyhow::{Context, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use ksp_assistant::{ConversationContext, Engine, ScoreParams, ThreadRandom};

#[derive(Deserialize)]
struct AskRequest {
    session_id: Option<Uuid>,
    user_input: String,
}

#[derive(Serialize)]
struct AskResponse {
    session_id: Uuid,
    response: String,
    topic: String,
    suggested_questions: Vec<String>,
}

#[derive(Deserialize)]
struct ResetRequest {
    session_id: Uuid,
}

#[derive(Serialize)]
struct ResetResponse {
    cleared: bool,
}

struct AppState {
    engine: Engine,
    sessions: Mutex<HashMap<Uuid, ConversationContext>>,
}

#[post("/ask")]
async fn ask_endpoint(req: web::Json<AskRequest>, data: web::Data<AppState>) -> impl Responder {
    let session_id = req.session_id.unwrap_or_else(Uuid::new_v4);
    let context = data
        .sessions
        .lock()
        .get(&session_id)
        .cloned()
        .unwrap_or_default();

    let answer = data.engine.answer_query(&req.user_input, &context, &mut ThreadRandom);
    data.sessions.lock().insert(session_id, answer.updated_context);

    HttpResponse::Ok().json(AskResponse {
        session_id,
        response: answer.response_text,
        topic: answer.topic,
        suggested_questions: answer.suggested_questions,
    })
}

#[post("/reset")]
async fn reset_endpoint(req: web::Json<ResetRequest>, data: web::Data<AppState>) -> impl Responder {
    let cleared = data.sessions.lock().remove(&req.session_id).is_some();
    HttpResponse::Ok().json(ResetResponse { cleared })
}

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(include_str!("index.html"))
}

#[actix_web::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = config::Config::builder()
        .add_source(config::File::with_name("Config"))
        .build()?;

    // [engine] overrides the shipped scoring calibration; absent keys keep
    // their defaults.
    let params: ScoreParams = settings.get("engine").unwrap_or_default();
    let data = web::Data::new(AppState {
        engine: Engine::new(params),
        sessions: Mutex::new(HashMap::new()),
    });

    let host = settings
        .get_string("server.host")
        .context("Config.toml is missing server.host")?;
    let port = settings
        .get_int("server.port")
        .context("Config.toml is missing server.port")? as u16;

    log::info!("Starting assistant at http://{}:{}", host, port);
    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .service(index)
            .service(ask_endpoint)
            .service(reset_endpoint)
    })
    .bind((host, port))?
    .run()
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #[test]
    fn missing_server_keys_are_errors_not_panics() {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(
                "[server]\nhost = \"0.0.0.0\"",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();
        assert_eq!(settings.get_string("server.host").unwrap(), "0.0.0.0");
        assert!(settings.get_int("server.port").is_err());
    }
}
