use std::cmp::Ordering;

use super::player_aggregators::PlayerWithStats;

/// Leaderboard order: lowest average first, players without rounds last.
/// The sort is stable, so ties keep their incoming order.
pub fn rank_players(players: &mut [PlayerWithStats]) {
    players.sort_by(|a, b| {
        match (a.stats.total_rounds == 0, b.stats.total_rounds == 0) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => a.stats.average_score.cmp(&b.stats.average_score),
        }
    });
}

/// 1-based rank for display; players without rounds are unranked.
#[must_use]
pub fn leaderboard_position(ranked: &[PlayerWithStats], index: usize) -> Option<usize> {
    ranked
        .get(index)
        .filter(|p| p.stats.total_rounds > 0)
        .map(|_| index + 1)
}
