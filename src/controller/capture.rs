use actix_web::http::{Method, StatusCode};
use actix_web::web::{self, Data};
use actix_web::{HttpRequest, HttpResponse, HttpResponseBuilder};
use serde_json::{Value, json};

use crate::cache::QueryCache;
use crate::capture::{CaptureError, CaptureRequest, CaptureReviewRequest, CaptureService};
use crate::controller::auth::require_player;
use crate::controller::response::html;
use crate::controller::round::load_round_form;
use crate::mvu::round_form_effects::Deps;
use crate::mvu::runtime::run_round_form_all;
use crate::session::SessionStore;
use crate::storage::Storage;
use crate::view::round_form::render_round_form;

pub const MISSING_PARAMETERS: &str =
    "Missing required parameters: players, courses, and imageBase64 are required";
pub const EXTRACTION_FAILED: &str = "Extraction failed, please enter manually";

const ALLOW_ORIGIN: (&str, &str) = ("Access-Control-Allow-Origin", "*");
const ALLOW_HEADERS: (&str, &str) = (
    "Access-Control-Allow-Headers",
    "authorization, x-client-info, apikey, content-type",
);

fn cors(status: StatusCode) -> HttpResponseBuilder {
    let mut builder = HttpResponse::build(status);
    builder.insert_header(ALLOW_ORIGIN).insert_header(ALLOW_HEADERS);
    builder
}

fn json_error(status: StatusCode, body: &Value) -> HttpResponse {
    cors(status).json(body)
}

/// Body and status for a failed extraction. Upstream bodies are passed back as `details`.
#[must_use]
pub fn capture_error_body(err: &CaptureError) -> Value {
    match err {
        CaptureError::Configuration => json!({ "error": "OpenAI API key not configured" }),
        CaptureError::Upstream { status, body } => json!({
            "error": format!("Vision model API error ({status})"),
            "details": body,
        }),
        CaptureError::EmptyResult => json!({ "error": "No analysis result from vision model" }),
        CaptureError::MalformedResult(details) => json!({
            "error": "Vision model returned malformed JSON",
            "details": details,
        }),
        CaptureError::Network(details) => json!({
            "error": "Internal server error",
            "details": details,
        }),
    }
}

/// Proxy in front of the vision model. Accepts any method so it can answer
/// preflight and reject the rest itself.
pub async fn create_round_ai(
    req: HttpRequest,
    body: web::Bytes,
    capture: Data<CaptureService>,
) -> HttpResponse {
    if req.method() == Method::OPTIONS {
        return cors(StatusCode::OK).body("ok");
    }
    if req.method() != Method::POST {
        return json_error(
            StatusCode::METHOD_NOT_ALLOWED,
            &json!({ "error": "Method not allowed" }),
        );
    }

    let request: CaptureRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!(error = %e, "capture proxy body is not json");
            CaptureRequest::default()
        }
    };
    let (Some(image), Some(players), Some(courses)) =
        (request.image_base64, request.players, request.courses)
    else {
        return json_error(
            StatusCode::BAD_REQUEST,
            &json!({ "error": MISSING_PARAMETERS }),
        );
    };
    if image.trim().is_empty() {
        return json_error(
            StatusCode::BAD_REQUEST,
            &json!({ "error": MISSING_PARAMETERS }),
        );
    }

    match capture.extract_json(&image, &players, &courses).await {
        Ok(value) => cors(StatusCode::OK).json(value),
        Err(e) => {
            tracing::error!(error = %e, "scorecard extraction failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, &capture_error_body(&e))
        }
    }
}

/// Review path: extracts a round from the uploaded photo and returns the round
/// form pre-filled with it, ready to be checked and submitted by hand.
pub async fn capture_round(
    req: HttpRequest,
    body: web::Json<CaptureReviewRequest>,
    sessions: Data<SessionStore>,
    storage: Data<dyn Storage>,
    cache: Data<QueryCache>,
    capture: Data<CaptureService>,
) -> HttpResponse {
    if let Err(resp) = require_player(&req, &sessions, storage.get_ref()).await {
        return resp;
    }
    let deps = Deps {
        storage: storage.get_ref(),
        cache: &cache,
    };
    let mut model = match load_round_form(deps).await {
        Ok(model) => model,
        Err(resp) => return resp,
    };

    let extracted = capture
        .extract_round(&body.image_base64, &model.players, &model.courses)
        .await;
    let notice = match extracted {
        Ok(round) => {
            let msgs = round.to_form_messages(&model.courses, &model.players);
            tracing::info!(messages = msgs.len(), "scorecard extracted");
            match run_round_form_all(&mut model, msgs, deps).await {
                Ok(()) => None,
                Err(e) => {
                    tracing::warn!(error = %e, "extracted round could not be applied");
                    Some(EXTRACTION_FAILED)
                }
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "scorecard extraction failed, falling back to manual entry");
            Some(EXTRACTION_FAILED)
        }
    };

    html(render_round_form(&model, capture.is_enabled(), notice))
}
