use maud::{Markup, html};

use crate::model::{HOLE_SCORE_MAX, player_color};
use crate::mvu::round_form::{Phase, RoundFormModel};
use crate::paths;
use crate::session::Session;
use crate::view::layout::{render_alert, render_page};

fn render_course_picker(model: &RoundFormModel) -> Markup {
    html! {
        section class="card" {
            h2 { "Course" }
            @if let Some(course_id) = model.course_id {
                input type="hidden" name="course_id" value=(course_id);
            }
            div class="course-options" {
                @for course in &model.courses {
                    button.option.selected[model.course_id == Some(course.id)]
                        type="submit" formnovalidate name="action" value=(format!("select_course:{}", course.id)) {
                        span class="course-name" { (course.name) }
                        span class="muted" {
                            (course.course_holes.len()) " holes"
                            @if let Some(par) = course.par { " • Par " (par) }
                        }
                    }
                }
            }
        }
    }
}

fn render_played_at(model: &RoundFormModel) -> Markup {
    html! {
        section class="card" {
            h2 { label for="played_at" { "Date & time" } }
            input id="played_at" type="datetime-local" name="played_at" value=(model.played_at);
        }
    }
}

fn render_roster(model: &RoundFormModel) -> Markup {
    html! {
        section class="card" {
            h2 { "Players" }
            @for draft in &model.round_scores {
                input type="hidden" name="player" value=(draft.player_id);
            }
            div class="player-options" {
                @for player in &model.players {
                    @let (bg, text) = player_color(&player.first_name);
                    button.option.selected[model.is_selected(&player.id)]
                        type="submit" formnovalidate name="action" value=(format!("toggle_player:{}", player.id)) {
                        span class=(format!("badge {bg}")) { span class=(text) { (player.initial()) } }
                        (player.full_name())
                    }
                }
            }
        }
    }
}

/// Hole inputs carry a running `data-hole-index` so the page script can move focus along.
fn render_score_matrix(model: &RoundFormModel) -> Markup {
    let Some(course) = model.selected_course() else {
        return html! {
            section class="card" { p class="muted" { "Select a course to enter scores." } }
        };
    };
    let hole_count = course.course_holes.len();

    html! {
        section class="card score-matrix" {
            h2 { "Scores" }
            table {
                thead {
                    tr {
                        th { "Player" }
                        @for hole in &course.course_holes {
                            th title=(format!("Par {}", hole.par)) { (hole.hole_number) }
                        }
                        th { "Total" }
                    }
                }
                tbody {
                    @for (row, draft) in model.round_scores.iter().enumerate() {
                        @let name = model.players.iter()
                            .find(|p| p.id == draft.player_id)
                            .map_or_else(String::new, |p| p.full_name());
                        tr {
                            th scope="row" { (name) }
                            @for (col, hole) in course.course_holes.iter().enumerate() {
                                @let score = draft.hole_score(hole.hole_number);
                                td {
                                    input type="number" inputmode="numeric"
                                        min="0" max=(HOLE_SCORE_MAX)
                                        name=(format!("score:{}:{}", draft.player_id, hole.hole_number))
                                        value=[(score > 0).then_some(score)]
                                        data-hole-index=(row * hole_count + col);
                                }
                            }
                            td class="total" { (draft.hole_total()) }
                        }
                    }
                }
            }
        }
    }
}

fn render_capture(capture_enabled: bool) -> Markup {
    html! {
        @if capture_enabled {
            section class="card capture" {
                h2 { "Scan a scorecard" }
                p class="muted" { "Upload a photo and review the extracted scores before saving." }
                input id="scorecard-image" type="file" accept="image/*"
                    data-capture-url=(paths::CAPTURE_ROUND);
            }
        }
    }
}

/// The round authoring form body, also swapped in whole after a capture.
#[must_use]
pub fn render_round_form(model: &RoundFormModel, capture_enabled: bool, notice: Option<&str>) -> Markup {
    let submitting = matches!(model.phase, Phase::Submitting);
    html! {
        div id="round-form-container" {
            (render_alert(model.alert.as_deref().or(notice)))
            (render_capture(capture_enabled))
            form id="round-form" method="post" action=(paths::CREATE_ROUND) {
                // default button for implicit submission, re-renders without touching state
                button type="submit" formnovalidate name="action" value="refresh"
                    hidden tabindex="-1" aria-hidden="true" {}
                (render_course_picker(model))
                (render_played_at(model))
                (render_roster(model))
                (render_score_matrix(model))
                div class="form-actions" {
                    a class="button secondary" href=(paths::HOME) { "Cancel" }
                    button type="submit" name="action" value="submit" class="button" disabled[submitting] {
                        "Create Round"
                    }
                }
            }
        }
    }
}

#[must_use]
pub fn render_round_form_page(
    model: &RoundFormModel,
    capture_enabled: bool,
    session: Option<&Session>,
) -> Markup {
    let body = html! {
        div class="page-header" {
            h1 { "New round" }
        }
        (render_round_form(model, capture_enabled, None))
    };
    render_page("New round", session, &body)
}
