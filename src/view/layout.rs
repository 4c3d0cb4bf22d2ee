use maud::{DOCTYPE, Markup, html};

use crate::session::Session;
use crate::{APP_TITLE, HTMX_PATH, paths};

fn render_nav(session: Option<&Session>) -> Markup {
    html! {
        nav class="navbar" {
            a class="brand" href=(paths::HOME) { (APP_TITLE) }
            @if let Some(session) = session {
                div class="nav-links" {
                    a href=(paths::HOME) { "Rounds" }
                    a href=(paths::PLAYERS) { "Players" }
                    a href=(paths::CREATE_ROUND) { "New round" }
                    @if let Some(player) = &session.player {
                        a href=(paths::player(&player.id)) { (player.first_name) }
                    }
                    a href=(paths::LOGOUT) { "Logout" }
                }
            }
        }
    }
}

/// Full page shell; the nav links only show for a signed-in session.
#[must_use]
pub fn render_page(title: &str, session: Option<&Session>, body: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                link rel="stylesheet" type="text/css" href="/static/app.css";
                title { (title) " | " (APP_TITLE) }
                script src=(HTMX_PATH) defer {}
                script src="/static/round_form.js" defer {}
            }
            body {
                (render_nav(session))
                main class="container" {
                    (body)
                }
            }
        }
    }
}

/// Blocking message box above a form.
#[must_use]
pub fn render_alert(message: Option<&str>) -> Markup {
    html! {
        @if let Some(message) = message {
            div class="alert" role="alert" { (message) }
        }
    }
}

#[must_use]
pub fn render_error_page(session: Option<&Session>, message: &str) -> Markup {
    let body = html! {
        div class="card error-card" {
            h2 { "Something went wrong" }
            p { (message) }
            a href=(paths::HOME) { "Back to rounds" }
        }
    };
    render_page("Error", session, &body)
}
