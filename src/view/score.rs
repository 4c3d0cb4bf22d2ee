use maud::{Markup, html};

use crate::model::ScoreDisplay;

/// A hole score wrapped in the shape for its result against par:
/// filled circle for a birdie, square for a bogey, double square beyond.
/// Without a par the score is shown bare.
#[must_use]
pub fn render_hole_score(gross_score: i32, hole_par: Option<i32>) -> Markup {
    let display = hole_par.map_or(ScoreDisplay::Plain, |par| {
        ScoreDisplay::classify(gross_score, par)
    });
    html! {
        span class=(format!("hole-score {}", display.css_class())) {
            @if display == ScoreDisplay::DoubleBogeyOrWorse {
                span class="inner" { (gross_score) }
            } @else {
                (gross_score)
            }
        }
    }
}
