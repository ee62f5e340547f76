use actix_web::{get, post, web, App, HttpResponse, HttpServer, Responder};
use anyhow::Result;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::time::Duration;

mod catalog;
mod classifier;
mod conversation;
mod form;
mod gateway;
mod session;
mod validation;

use catalog::CatalogEntry;
use conversation::ChatTurn;
use form::{FormPhase, IncidentRecord};
use gateway::WebhookGateway;
use session::{
    ChatTiming, Notification, PlannedReply, SubmitOutcome, SubmitResolution, SupportSession,
};
use validation::{Field, ValidationReport};

type SharedSession = web::Data<Mutex<SupportSession>>;

// --- Configuration ---

#[derive(Debug, Clone, Deserialize)]
struct AppConfig {
    server: ServerConfig,
    gateway: GatewayConfig,
    #[serde(default)]
    chat: ChatConfig,
}

#[derive(Debug, Clone, Deserialize)]
struct ServerConfig {
    host: String,
    port: u16,
}

#[derive(Debug, Clone, Deserialize)]
struct GatewayConfig {
    webhook_url: String,
    #[serde(default = "default_timeout_ms")]
    timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    10_000
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct ChatConfig {
    thinking_delay_min_ms: u64,
    thinking_delay_max_ms: u64,
    transition_delay_ms: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        let timing = ChatTiming::default();
        Self {
            thinking_delay_min_ms: timing.thinking_min_ms,
            thinking_delay_max_ms: timing.thinking_max_ms,
            transition_delay_ms: timing.transition_ms,
        }
    }
}

impl ChatConfig {
    fn timing(&self) -> ChatTiming {
        ChatTiming {
            thinking_min_ms: self.thinking_delay_min_ms,
            thinking_max_ms: self.thinking_delay_max_ms,
            transition_ms: self.transition_delay_ms,
        }
    }
}

// --- Request / response shapes ---

#[derive(Deserialize)]
struct MessageRequest {
    text: String,
}

#[derive(Serialize)]
struct MessageResponse {
    accepted: bool,
    composing: bool,
}

#[derive(Deserialize)]
struct FieldRequest {
    field: Field,
    value: String,
}

#[derive(Serialize)]
struct ActionResponse {
    applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    phase: Option<FormPhase>,
}

#[derive(Serialize)]
struct FormView {
    phase: FormPhase,
    record: IncidentRecord,
    errors: ValidationReport,
    // Display names for the review screen; None until the id is chosen.
    clinic_name: Option<&'static str>,
    department_name: Option<&'static str>,
    priority_name: Option<&'static str>,
}

#[derive(Serialize)]
struct StateResponse {
    transcript: Vec<ChatTurn>,
    composing: bool,
    show_form: bool,
    quick_replies: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    form: Option<FormView>,
    notifications: Vec<Notification>,
}

#[derive(Serialize)]
struct CatalogResponse {
    clinics: &'static [CatalogEntry],
    departments: &'static [CatalogEntry],
    priorities: &'static [CatalogEntry],
}

fn form_view(session: &SupportSession) -> Option<FormView> {
    session.form().map(|form| {
        let record = form.record().clone();
        FormView {
            phase: form.phase(),
            clinic_name: catalog::display_name(catalog::CLINICS, &record.clinic),
            department_name: catalog::display_name(catalog::DEPARTMENTS, &record.department),
            priority_name: catalog::display_name(catalog::PRIORITIES, &record.priority),
            errors: form.errors().clone(),
            record,
        }
    })
}

// --- Endpoints ---

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(include_str!("index.html"))
}

#[get("/api/state")]
async fn state(data: SharedSession) -> impl Responder {
    let mut session = data.lock();
    let snapshot = StateResponse {
        transcript: session.conversation().turns().to_vec(),
        composing: session.conversation().is_composing(),
        show_form: session.conversation().form_visible(),
        quick_replies: session.conversation().quick_replies(),
        form: form_view(&session),
        notifications: session.drain_notifications(),
    };
    HttpResponse::Ok().json(snapshot)
}

#[get("/api/catalogs")]
async fn catalogs() -> impl Responder {
    HttpResponse::Ok().json(CatalogResponse {
        clinics: catalog::CLINICS,
        departments: catalog::DEPARTMENTS,
        priorities: catalog::PRIORITIES,
    })
}

// The thinking delay and the chained form-open transition run as a spawned
// task; the handle is deliberately never aborted, so a pending reply always
// lands.
fn schedule_reply(session: SharedSession, reply: PlannedReply, transition: Duration) {
    actix_web::rt::spawn(async move {
        tokio::time::sleep(reply.delay).await;
        let opens_form = session.lock().deliver_reply(&reply);
        if opens_form {
            tokio::time::sleep(transition).await;
            session.lock().open_form();
        }
    });
}

#[post("/api/message")]
async fn post_message(req: web::Json<MessageRequest>, data: SharedSession) -> impl Responder {
    let (planned, transition) = {
        let mut session = data.lock();
        let planned = session.handle_user_message(&req.text);
        (planned, session.timing().transition_delay())
    };

    let accepted = planned.is_some();
    if let Some(reply) = planned {
        schedule_reply(data.clone(), reply, transition);
    }

    HttpResponse::Ok().json(MessageResponse {
        accepted,
        composing: accepted,
    })
}

#[post("/api/quick-reply")]
async fn quick_reply(req: web::Json<MessageRequest>, data: SharedSession) -> impl Responder {
    let (planned, transition) = {
        let mut session = data.lock();
        let planned = session.handle_quick_reply(&req.text);
        (planned, session.timing().transition_delay())
    };

    let accepted = planned.is_some();
    if let Some(reply) = planned {
        schedule_reply(data.clone(), reply, transition);
    }

    HttpResponse::Ok().json(MessageResponse {
        accepted,
        composing: accepted,
    })
}

#[post("/api/form/field")]
async fn form_field(req: web::Json<FieldRequest>, data: SharedSession) -> impl Responder {
    let req = req.into_inner();
    let mut session = data.lock();
    let applied = session.edit_field(req.field, req.value);
    HttpResponse::Ok().json(ActionResponse {
        applied,
        phase: session.form().map(|form| form.phase()),
    })
}

#[post("/api/form/submit")]
async fn form_submit(data: SharedSession, gateway: web::Data<WebhookGateway>) -> impl Responder {
    let (outcome, phase, transition) = {
        let mut session = data.lock();
        let outcome = session.submit();
        (
            outcome,
            session.form().map(|form| form.phase()),
            session.timing().transition_delay(),
        )
    };

    let applied = !matches!(outcome, SubmitOutcome::Ignored);
    if let SubmitOutcome::Dispatch(record) = outcome {
        let session = data.clone();
        let gateway = gateway.clone();
        actix_web::rt::spawn(async move {
            let result = gateway.submit(&record).await;
            if let Err(err) = &result {
                log::error!("Incident submission failed: {err}");
            }
            let resolution = session.lock().complete_submit(result.is_ok());
            if resolution == SubmitResolution::Succeeded {
                tokio::time::sleep(transition).await;
                session.lock().acknowledge_submission();
            }
        });
    }

    HttpResponse::Ok().json(ActionResponse { applied, phase })
}

#[post("/api/form/back")]
async fn form_back(data: SharedSession) -> impl Responder {
    let mut session = data.lock();
    let applied = session.back();
    HttpResponse::Ok().json(ActionResponse {
        applied,
        phase: session.form().map(|form| form.phase()),
    })
}

#[post("/api/form/cancel")]
async fn form_cancel(data: SharedSession) -> impl Responder {
    let (cancelled, transition) = {
        let mut session = data.lock();
        (session.cancel_form(), session.timing().transition_delay())
    };

    if cancelled {
        let session = data.clone();
        actix_web::rt::spawn(async move {
            tokio::time::sleep(transition).await;
            session.lock().acknowledge_cancellation();
        });
    }

    HttpResponse::Ok().json(ActionResponse {
        applied: cancelled,
        phase: None,
    })
}

#[actix_web::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = config::Config::builder()
        .add_source(config::File::with_name("Config"))
        .build()?;
    let app_config: AppConfig = settings.try_deserialize()?;

    let timing = app_config.chat.timing();
    let session = web::Data::new(Mutex::new(SupportSession::new(timing)));
    let gateway = web::Data::new(WebhookGateway::new(
        app_config.gateway.webhook_url.clone(),
        Duration::from_millis(app_config.gateway.timeout_ms),
    )?);

    log::info!(
        "Incident intake assistant forwarding submissions to {}",
        gateway.endpoint()
    );
    log::info!(
        "Starting server at http://{}:{}",
        app_config.server.host,
        app_config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(session.clone())
            .app_data(gateway.clone())
            .service(index)
            .service(state)
            .service(catalogs)
            .service(post_message)
            .service(quick_reply)
            .service(form_field)
            .service(form_submit)
            .service(form_back)
            .service(form_cancel)
    })
    .bind((app_config.server.host.as_str(), app_config.server.port))?
    .run()
    .await?;
    Ok(())
}
