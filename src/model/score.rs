use serde::{Deserialize, Serialize};

/// How a single hole score is decorated relative to the hole's par.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreDisplay {
    /// One under par.
    Birdie,
    /// One over par.
    Bogey,
    /// Two or more over par.
    DoubleBogeyOrWorse,
    /// Par, or two or more under: shown as the bare number.
    Plain,
}

impl ScoreDisplay {
    #[must_use]
    pub fn from_delta(delta: i32) -> Self {
        match delta {
            -1 => ScoreDisplay::Birdie,
            1 => ScoreDisplay::Bogey,
            d if d >= 2 => ScoreDisplay::DoubleBogeyOrWorse,
            _ => ScoreDisplay::Plain,
        }
    }

    #[must_use]
    pub fn classify(gross_score: i32, hole_par: i32) -> Self {
        Self::from_delta(gross_score - hole_par)
    }

    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            ScoreDisplay::Birdie => "birdie",
            ScoreDisplay::Bogey => "bogey",
            ScoreDisplay::DoubleBogeyOrWorse => "double-bogey",
            ScoreDisplay::Plain => "plain",
        }
    }
}

/// Over-par label for a round total: `+N` above par, the plain difference otherwise.
/// Courses without a par get no label.
#[must_use]
pub fn format_over_par(course_par: Option<i32>, gross_score: i32) -> Option<String> {
    let over_par = gross_score - course_par?;
    if over_par > 0 {
        Some(format!("+{over_par}"))
    } else {
        Some(over_par.to_string())
    }
}

const PLAYER_COLORS: [(&str, &str); 7] = [
    ("bg-green", "text-green"),
    ("bg-blue", "text-blue"),
    ("bg-yellow", "text-yellow"),
    ("bg-red", "text-red"),
    ("bg-purple", "text-purple"),
    ("bg-pink", "text-pink"),
    ("bg-sky", "text-sky"),
];

/// Badge colours picked from the first letter of a first name.
#[must_use]
pub fn player_color(first_name: &str) -> (&'static str, &'static str) {
    let first_letter = first_name
        .chars()
        .next()
        .and_then(|c| c.to_uppercase().next())
        .unwrap_or('A');
    let offset = i64::from(u32::from(first_letter)) - i64::from(u32::from('A'));
    let len = PLAYER_COLORS.len() as i64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let idx = offset.rem_euclid(len) as usize;
    PLAYER_COLORS[idx]
}
