use actix_web::http::StatusCode;
use actix_web::web::{self, Data};
use actix_web::{HttpRequest, HttpResponse};
use chrono::Local;
use uuid::Uuid;

use crate::cache::{CacheTag, QueryCache};
use crate::controller::auth::{require_player, require_session};
use crate::controller::response::{html, html_with_status, redirect};
use crate::controller::round::load_rounds;
use crate::controller::stats::{compute_player_stats, players_with_stats, rank_players};
use crate::model::{NewPlayer, Player, PlayerFormErrors, PlayerRoundScore, validate_new_player};
use crate::mvu::round_form_effects::PLAYERS_KEY;
use crate::paths;
use crate::session::SessionStore;
use crate::storage::{Storage, StorageError};
use crate::view::layout::render_error_page;
use crate::view::players::{
    render_create_player_page, render_player_not_found, render_player_page, render_players_page,
};

pub const PLAYER_SCORES_KEY: &str = "player_round_scores";

/// Round scores through the cache; `None` gets every player's.
///
/// # Errors
///
/// Will return `Err` if storage fails
pub async fn load_player_round_scores(
    storage: &dyn Storage,
    cache: &QueryCache,
    player_id: Option<&Uuid>,
) -> Result<Vec<PlayerRoundScore>, StorageError> {
    let key = match player_id {
        Some(id) => format!("{PLAYER_SCORES_KEY}:{id}"),
        None => PLAYER_SCORES_KEY.to_string(),
    };
    cache
        .get_or_load(&key, &[CacheTag::Rounds, CacheTag::Players], || {
            storage.list_player_round_scores(player_id)
        })
        .await
}

/// # Errors
///
/// Will return `Err` if storage fails
pub async fn load_players(
    storage: &dyn Storage,
    cache: &QueryCache,
) -> Result<Vec<Player>, StorageError> {
    cache
        .get_or_load(PLAYERS_KEY, &[CacheTag::Players], || storage.list_players())
        .await
}

pub async fn players_page(
    req: HttpRequest,
    sessions: Data<SessionStore>,
    storage: Data<dyn Storage>,
    cache: Data<QueryCache>,
) -> HttpResponse {
    let session = match require_player(&req, &sessions, storage.get_ref()).await {
        Ok(session) => session,
        Err(resp) => return resp,
    };

    let loaded = futures::try_join!(
        load_players(storage.get_ref(), &cache),
        load_player_round_scores(storage.get_ref(), &cache, None),
    );

    match loaded {
        Ok((players, scores)) => {
            let mut ranked = players_with_stats(players, &scores);
            rank_players(&mut ranked);
            html(render_players_page(&ranked, Some(&session)))
        }
        Err(e) => {
            tracing::error!(error = %e, "players could not be loaded");
            html_with_status(
                StatusCode::INTERNAL_SERVER_ERROR,
                render_error_page(Some(&session), "Players could not be loaded."),
            )
        }
    }
}

pub async fn player_page(
    req: HttpRequest,
    path: web::Path<String>,
    sessions: Data<SessionStore>,
    storage: Data<dyn Storage>,
    cache: Data<QueryCache>,
) -> HttpResponse {
    let session = match require_player(&req, &sessions, storage.get_ref()).await {
        Ok(session) => session,
        Err(resp) => return resp,
    };
    let not_found = || {
        html_with_status(
            StatusCode::NOT_FOUND,
            render_player_not_found(Some(&session)),
        )
    };

    let Ok(player_id) = Uuid::parse_str(path.trim()) else {
        return not_found();
    };
    let player = match storage.get_player(&player_id).await {
        Ok(player) => player,
        Err(StorageError::NotFound(_)) => return not_found(),
        Err(e) => {
            tracing::error!(error = %e, %player_id, "player could not be loaded");
            return html_with_status(
                StatusCode::INTERNAL_SERVER_ERROR,
                render_error_page(Some(&session), "Player could not be loaded."),
            );
        }
    };

    let loaded = futures::try_join!(
        load_player_round_scores(storage.get_ref(), &cache, Some(&player_id)),
        load_rounds(storage.get_ref(), &cache),
    );

    match loaded {
        Ok((scores, rounds)) => {
            let stats = compute_player_stats(&scores);
            let played: Vec<_> = rounds
                .into_iter()
                .filter(|r| r.round_scores.iter().any(|s| s.player_id == player_id))
                .collect();
            html(render_player_page(&player, &stats, &played, Some(&session)))
        }
        Err(e) => {
            tracing::error!(error = %e, %player_id, "player rounds could not be loaded");
            html_with_status(
                StatusCode::INTERNAL_SERVER_ERROR,
                render_error_page(Some(&session), "Player rounds could not be loaded."),
            )
        }
    }
}

pub async fn create_player_form(
    req: HttpRequest,
    sessions: Data<SessionStore>,
    storage: Data<dyn Storage>,
) -> HttpResponse {
    let session = match require_session(&req, &sessions, storage.get_ref()).await {
        Ok(session) => session,
        Err(resp) => return resp,
    };
    if session.player.is_some() {
        return redirect(paths::HOME);
    }
    html(render_create_player_page(
        &NewPlayer::default(),
        &PlayerFormErrors::default(),
        None,
        Some(&session),
    ))
}

pub async fn create_player(
    req: HttpRequest,
    form: web::Form<NewPlayer>,
    sessions: Data<SessionStore>,
    storage: Data<dyn Storage>,
    cache: Data<QueryCache>,
) -> HttpResponse {
    let session = match require_session(&req, &sessions, storage.get_ref()).await {
        Ok(session) => session,
        Err(resp) => return resp,
    };
    if session.player.is_some() {
        return redirect(paths::HOME);
    }

    let form = form.into_inner();
    let birthdate = match validate_new_player(&form, Local::now().date_naive()) {
        Ok(birthdate) => birthdate,
        Err(errors) => {
            return html_with_status(
                StatusCode::UNPROCESSABLE_ENTITY,
                render_create_player_page(&form, &errors, None, Some(&session)),
            );
        }
    };

    let player = Player {
        id: Uuid::new_v4(),
        first_name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
        birthdate,
        nationality: form.nationality.trim().to_string(),
        handicap: None,
        auth_id: Some(session.account.id),
    };
    match storage.create_player(&player).await {
        Ok(()) => {
            cache.invalidate(&[CacheTag::Players]).await;
            tracing::info!(player_id = %player.id, "player created");
            redirect(paths::HOME)
        }
        Err(e) => {
            tracing::error!(error = %e, "player could not be created");
            html_with_status(
                StatusCode::INTERNAL_SERVER_ERROR,
                render_create_player_page(
                    &form,
                    &PlayerFormErrors::default(),
                    Some("Failed to create player. Please try again."),
                    Some(&session),
                ),
            )
        }
    }
}
