use maud::{Markup, html};

use crate::controller::stats::{PlayerStats, PlayerWithStats, leaderboard_position};
use crate::model::{NewPlayer, Player, PlayerFormErrors, Round, player_color};
use crate::paths;
use crate::session::Session;
use crate::view::layout::{render_alert, render_page};
use crate::view::rounds::{format_played_date, render_no_rounds, render_round_card};

fn render_avatar(player: &Player, size_class: &str) -> Markup {
    let (bg, text) = player_color(&player.first_name);
    html! {
        span class=(format!("badge {bg} {size_class}")) {
            span class=(text) { (player.initial()) }
        }
    }
}

fn render_stat(value: &str, label: &str, class: &str) -> Markup {
    html! {
        div class="stat" {
            div class=(format!("stat-value {class}")) { (value) }
            div class="stat-label" { (label) }
        }
    }
}

fn render_last_played(stats: &PlayerStats) -> Markup {
    let Some(round) = stats.recent_round.as_ref().and_then(|s| s.round.as_ref()) else {
        return html! {};
    };
    html! {
        p class="last-played muted" {
            "Last played " (format_played_date(&round.played_at))
            @if let Some(course_name) = &round.course_name {
                " at " (course_name)
            }
        }
    }
}

fn render_leaderboard_card(entry: &PlayerWithStats, position: Option<usize>) -> Markup {
    let player = &entry.player;
    let stats = &entry.stats;
    let handicap = player
        .handicap
        .map_or_else(|| "N/A".to_string(), |h| format!("{h:.1}"));

    html! {
        a class="card player-card" href=(paths::player(&player.id)) {
            div class="player-card-head" {
                @if let Some(position) = position {
                    span class="rank" { "#" (position) }
                }
                (render_avatar(player, "badge-md"))
                div {
                    h3 { (player.full_name()) }
                    span class="tag" { (player.nationality) }
                }
            }
            div class="player-card-stats" {
                (render_stat(&stats.average_score.to_string(), "Avg Score", "text-blue"))
                (render_stat(&stats.best_score.to_string(), "Best", "text-green"))
                (render_stat(&stats.total_rounds.to_string(), "Rounds", "text-purple"))
                (render_stat(&stats.worst_score.to_string(), "Worst", "text-red"))
                (render_stat(&handicap, "Handicap", "text-sky"))
            }
            (render_last_played(stats))
        }
    }
}

/// Leaderboard; `ranked` must already be in leaderboard order.
#[must_use]
pub fn render_players_page(ranked: &[PlayerWithStats], session: Option<&Session>) -> Markup {
    let body = html! {
        div class="page-header" {
            h1 { "Players" }
            p class="muted" { "View all players and their golf statistics" }
        }
        div class="players" {
            @for (index, entry) in ranked.iter().enumerate() {
                (render_leaderboard_card(entry, leaderboard_position(ranked, index)))
            }
        }
    };
    render_page("Players", session, &body)
}

/// Player header, stats when there is at least one round, then the rounds they played.
#[must_use]
pub fn render_player_page(
    player: &Player,
    stats: &PlayerStats,
    rounds: &[Round],
    session: Option<&Session>,
) -> Markup {
    let body = html! {
        div class="player-header" {
            (render_avatar(player, "badge-lg"))
            div {
                h1 { (player.full_name()) }
                p class="muted" { (player.nationality) " • " (player.birthdate.format("%Y")) }
            }
        }
        @if stats.total_rounds > 0 {
            div class="stats-grid" {
                (render_stat(&stats.total_rounds.to_string(), "Total Rounds", "text-green"))
                (render_stat(&stats.average_score.to_string(), "Average Score", "text-blue"))
                (render_stat(&stats.best_score.to_string(), "Best Score", "text-green"))
                (render_stat(&stats.worst_score.to_string(), "Worst Score", "text-red"))
            }
        }
        h2 { "Golf Rounds" }
        @if rounds.is_empty() {
            (render_no_rounds())
        } @else {
            div class="rounds" {
                @for round in rounds {
                    (render_round_card(round))
                }
            }
        }
    };
    render_page(&player.full_name(), session, &body)
}

#[must_use]
pub fn render_player_not_found(session: Option<&Session>) -> Markup {
    let body = html! {
        div class="card empty-state" {
            h2 { "Player not found" }
            p { "The player you are looking for does not exist." }
            a href=(paths::PLAYERS) { "Back to players" }
        }
    };
    render_page("Player not found", session, &body)
}

fn render_field(
    label: &str,
    name: &str,
    input_type: &str,
    value: &str,
    error: Option<&String>,
) -> Markup {
    html! {
        div class="field" {
            label for=(name) { (label) " *" }
            input.invalid[error.is_some()] id=(name) name=(name) type=(input_type) value=(value);
            @if let Some(error) = error {
                p class="field-error" { (error) }
            }
        }
    }
}

#[must_use]
pub fn render_create_player_page(
    form: &NewPlayer,
    errors: &PlayerFormErrors,
    alert: Option<&str>,
    session: Option<&Session>,
) -> Markup {
    let body = html! {
        div class="card form-card" {
            h1 { "Create New Player" }
            p class="muted" { "Fill in the details below to create a new player profile." }
            (render_alert(alert))
            form method="post" action=(paths::CREATE_PLAYER) {
                (render_field("First Name", "first_name", "text", &form.first_name, errors.first_name.as_ref()))
                (render_field("Last Name", "last_name", "text", &form.last_name, errors.last_name.as_ref()))
                (render_field("Birthdate", "birthdate", "date", &form.birthdate, errors.birthdate.as_ref()))
                (render_field("Nationality", "nationality", "text", &form.nationality, errors.nationality.as_ref()))
                button type="submit" class="button" { "Create Player" }
            }
        }
    };
    render_page("Create player", session, &body)
}
