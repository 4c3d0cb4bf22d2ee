use actix_web::http::StatusCode;
use actix_web::web::{self, Data};
use actix_web::{HttpRequest, HttpResponse};
use chrono::Local;

use crate::cache::{CacheTag, QueryCache};
use crate::capture::CaptureService;
use crate::controller::auth::require_player;
use crate::controller::response::{html, html_with_status, redirect};
use crate::model::Round;
use crate::mvu::round_form::{Msg, Phase, RoundFormModel, decode_form_pairs};
use crate::mvu::round_form_effects::Deps;
use crate::mvu::runtime::{run_round_form, run_round_form_all};
use crate::session::SessionStore;
use crate::storage::{Storage, StorageError};
use crate::view::layout::render_error_page;
use crate::view::round_form::render_round_form_page;
use crate::view::rounds::render_rounds_page;

pub const ROUNDS_KEY: &str = "rounds";

/// Every round with its children, through the cache.
///
/// # Errors
///
/// Will return `Err` if storage fails
pub async fn load_rounds(
    storage: &dyn Storage,
    cache: &QueryCache,
) -> Result<Vec<Round>, StorageError> {
    cache
        .get_or_load(
            ROUNDS_KEY,
            &[CacheTag::Rounds, CacheTag::Players, CacheTag::Courses],
            || storage.list_rounds(),
        )
        .await
}

pub async fn rounds_page(
    req: HttpRequest,
    sessions: Data<SessionStore>,
    storage: Data<dyn Storage>,
    cache: Data<QueryCache>,
) -> HttpResponse {
    let session = match require_player(&req, &sessions, storage.get_ref()).await {
        Ok(session) => session,
        Err(resp) => return resp,
    };

    match load_rounds(storage.get_ref(), &cache).await {
        Ok(rounds) => html(render_rounds_page(&rounds, Some(&session))),
        Err(e) => {
            tracing::error!(error = %e, "rounds could not be loaded");
            html_with_status(
                StatusCode::INTERNAL_SERVER_ERROR,
                render_error_page(Some(&session), "Rounds could not be loaded."),
            )
        }
    }
}

/// Fresh form model with the catalog loaded.
///
/// # Errors
///
/// Returns the error page response when the catalog cannot be loaded
pub async fn load_round_form(deps: Deps<'_>) -> Result<RoundFormModel, HttpResponse> {
    let mut model = RoundFormModel::new(Local::now().naive_local());
    if let Err(e) = run_round_form(&mut model, Msg::PageLoad, deps).await {
        tracing::error!(error = %e, "round form catalog could not be loaded");
        return Err(html_with_status(
            e.status_code(),
            render_error_page(None, "Courses and players could not be loaded."),
        ));
    }
    Ok(model)
}

pub async fn create_round_form(
    req: HttpRequest,
    sessions: Data<SessionStore>,
    storage: Data<dyn Storage>,
    cache: Data<QueryCache>,
    capture: Data<CaptureService>,
) -> HttpResponse {
    let session = match require_player(&req, &sessions, storage.get_ref()).await {
        Ok(session) => session,
        Err(resp) => return resp,
    };
    let deps = Deps {
        storage: storage.get_ref(),
        cache: &cache,
    };
    match load_round_form(deps).await {
        Ok(model) => html(render_round_form_page(
            &model,
            capture.is_enabled(),
            Some(&session),
        )),
        Err(resp) => resp,
    }
}

/// Replays the posted form onto a fresh model, applies the action, then either
/// redirects after a successful save or re-renders the form with its alert.
pub async fn create_round(
    req: HttpRequest,
    form: web::Form<Vec<(String, String)>>,
    sessions: Data<SessionStore>,
    storage: Data<dyn Storage>,
    cache: Data<QueryCache>,
    capture: Data<CaptureService>,
) -> HttpResponse {
    let session = match require_player(&req, &sessions, storage.get_ref()).await {
        Ok(session) => session,
        Err(resp) => return resp,
    };
    let deps = Deps {
        storage: storage.get_ref(),
        cache: &cache,
    };
    let mut model = match load_round_form(deps).await {
        Ok(model) => model,
        Err(resp) => return resp,
    };

    if let Err(e) = run_round_form_all(&mut model, decode_form_pairs(&form), deps).await {
        tracing::warn!(error = %e, "round form submission failed");
    }

    if let Some(location) = &model.redirect {
        return redirect(location);
    }
    let status = match (&model.phase, &model.alert) {
        (Phase::Failed, _) => StatusCode::INTERNAL_SERVER_ERROR,
        (_, Some(_)) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::OK,
    };
    html_with_status(
        status,
        render_round_form_page(&model, capture.is_enabled(), Some(&session)),
    )
}
