use ahash::RandomState;
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::model::{Player, PlayerRoundScore};

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct PlayerStats {
    pub total_rounds: usize,
    pub average_score: i32,
    pub best_score: i32,
    pub worst_score: i32,
    pub recent_round: Option<PlayerRoundScore>,
}

#[derive(Serialize, Clone, Debug)]
pub struct PlayerWithStats {
    pub player: Player,
    pub stats: PlayerStats,
}

/// Mean rounded half up, so 72.5 becomes 73.
fn rounded_mean(total: i64, count: usize) -> i32 {
    #[allow(clippy::cast_precision_loss)]
    let mean = total as f64 / count as f64;
    #[allow(clippy::cast_possible_truncation)]
    let rounded = (mean + 0.5).floor() as i32;
    rounded
}

/// The most recently played score. A score without a round sorts as the oldest;
/// on equal dates the earlier entry wins.
#[must_use]
pub fn recent_round(scores: &[PlayerRoundScore]) -> Option<&PlayerRoundScore> {
    let played = |s: &PlayerRoundScore| s.round.as_ref().map(|r| r.played_at);
    let mut iter = scores.iter();
    let first = iter.next()?;
    Some(iter.fold(first, |latest, current| {
        if played(current) > played(latest) {
            current
        } else {
            latest
        }
    }))
}

/// Aggregates one player's scores. No scores gives all zeros and no recent round.
#[must_use]
pub fn compute_player_stats(scores: &[PlayerRoundScore]) -> PlayerStats {
    if scores.is_empty() {
        return PlayerStats::default();
    }
    let total: i64 = scores.iter().map(|s| i64::from(s.gross_score)).sum();
    PlayerStats {
        total_rounds: scores.len(),
        average_score: rounded_mean(total, scores.len()),
        best_score: scores.iter().map(|s| s.gross_score).min().unwrap_or_default(),
        worst_score: scores.iter().map(|s| s.gross_score).max().unwrap_or_default(),
        recent_round: recent_round(scores).cloned(),
    }
}

/// Pairs every player with stats over their own scores, keeping the player order.
#[must_use]
pub fn players_with_stats(
    players: Vec<Player>,
    scores: &[PlayerRoundScore],
) -> Vec<PlayerWithStats> {
    let mut by_player: HashMap<Uuid, Vec<PlayerRoundScore>, RandomState> = HashMap::default();
    for score in scores {
        by_player
            .entry(score.player_id)
            .or_default()
            .push(score.clone());
    }

    players
        .into_iter()
        .map(|player| {
            let stats = by_player
                .get(&player.id)
                .map(|s| compute_player_stats(s))
                .unwrap_or_default();
            PlayerWithStats { player, stats }
        })
        .collect()
}
