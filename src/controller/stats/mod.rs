pub mod player_aggregators;
pub mod sort_utils;

pub use player_aggregators::{
    PlayerStats, PlayerWithStats, compute_player_stats, players_with_stats, recent_round,
};
pub use sort_utils::{leaderboard_position, rank_players};
