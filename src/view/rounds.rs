use chrono::NaiveDateTime;
use maud::{Markup, html};

use crate::model::{Course, Round, RoundScore, format_over_par, player_color};
use crate::paths;
use crate::session::Session;
use crate::view::layout::render_page;
use crate::view::score::render_hole_score;

pub const HOLES_PER_ROW: usize = 9;

#[must_use]
pub fn format_played_date(played_at: &NaiveDateTime) -> String {
    played_at.format("%A, %B %-d, %Y").to_string()
}

#[must_use]
pub fn render_no_rounds() -> Markup {
    html! {
        div class="card empty-state" {
            h3 { "No rounds available" }
            p { "Start playing golf to see your rounds here!" }
        }
    }
}

fn render_player_badge(score: &RoundScore) -> Markup {
    match &score.player {
        Some(player) => {
            let (bg, text) = player_color(&player.first_name);
            html! {
                a class=(format!("badge {bg}")) href=(paths::player(&player.id)) {
                    span class=(text) { (player.initial()) }
                }
            }
        }
        None => html! { span class="badge bg-green" { span class="text-green" { "P" } } },
    }
}

/// One player's line on a round card: totals plus hole-by-hole indicators in rows of nine.
#[must_use]
pub fn render_score_card(score: &RoundScore, course: Option<&Course>) -> Markup {
    let mut holes: Vec<_> = score.holes.iter().collect();
    holes.sort_by_key(|h| h.hole_number);
    let over_par = format_over_par(course.and_then(|c| c.par), score.gross_score);

    html! {
        div class="score-card" {
            div class="score-card-header" {
                div class="score-card-player" {
                    (render_player_badge(score))
                    div {
                        @match &score.player {
                            Some(player) => {
                                a class="player-name" href=(paths::player(&player.id)) { (player.full_name()) }
                            }
                            None => { span class="player-name" { "Unknown player" } }
                        }
                        p class="muted" { (holes.len()) " holes played" }
                    }
                }
                div class="score-card-total" {
                    p class="muted" { "Total Strokes" }
                    div class="total-line" {
                        @if let Some(over_par) = over_par {
                            span class="over-par" { (over_par) }
                        }
                        span class="gross" { (score.gross_score) }
                    }
                }
            }
            @for row in holes.chunks(HOLES_PER_ROW) {
                div class="hole-row" {
                    @for hole in row {
                        div class="hole" {
                            div class="hole-label" { "Hole " (hole.hole_number) }
                            (render_hole_score(hole.gross_score, hole.course_hole.as_ref().map(|ch| ch.par)))
                        }
                    }
                }
            }
        }
    }
}

#[must_use]
pub fn render_round_card(round: &Round) -> Markup {
    let mut scores: Vec<&RoundScore> = round.round_scores.iter().collect();
    scores.sort_by_key(|s| s.gross_score);
    let player_count = scores.len();

    html! {
        article class="card round-card" id=(format!("round-{}", round.id)) {
            header class="round-card-header" {
                div {
                    h2 class="course-name" {
                        (round.course.as_ref().map_or("Unknown course", |c| c.name.as_str()))
                    }
                    p class="played-at" { (format_played_date(&round.played_at)) }
                }
                span class="player-count" {
                    (player_count) " Player" @if player_count != 1 { "s" }
                }
            }
            div class="round-card-scores" {
                @for score in scores {
                    (render_score_card(score, round.course.as_ref()))
                }
            }
        }
    }
}

#[must_use]
pub fn render_rounds_list(rounds: &[Round]) -> Markup {
    html! {
        @if rounds.is_empty() {
            (render_no_rounds())
        } @else {
            div class="rounds" {
                @for round in rounds {
                    (render_round_card(round))
                }
            }
        }
    }
}

#[must_use]
pub fn render_rounds_page(rounds: &[Round], session: Option<&Session>) -> Markup {
    let body = html! {
        div class="page-header" {
            h1 { "Rounds" }
            a class="button" href=(paths::CREATE_ROUND) { "New round" }
        }
        (render_rounds_list(rounds))
    };
    render_page("Rounds", session, &body)
}
