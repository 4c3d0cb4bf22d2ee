use chrono::{NaiveDate, NaiveDateTime};
use rusty_golf_rounds::controller::stats::{
    compute_player_stats, leaderboard_position, players_with_stats, rank_players, recent_round,
};
use rusty_golf_rounds::model::{Player, PlayerRoundScore, RoundRef};
use uuid::Uuid;

fn player(first_name: &str) -> Player {
    Player {
        id: Uuid::new_v4(),
        first_name: first_name.to_string(),
        last_name: "Tester".to_string(),
        birthdate: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        nationality: "Spain".to_string(),
        handicap: None,
        auth_id: None,
    }
}

fn played(date: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(&format!("{date}T10:00:00"), "%Y-%m-%dT%H:%M:%S").unwrap()
}

fn score(player_id: Uuid, gross_score: i32, date: &str) -> PlayerRoundScore {
    PlayerRoundScore {
        round_score_id: Uuid::new_v4(),
        player_id,
        gross_score,
        round: Some(RoundRef {
            id: Uuid::new_v4(),
            played_at: played(date),
            course_name: Some("Club de Campo".to_string()),
        }),
    }
}

#[test]
fn test2_leaderboard_with_and_without_rounds() {
    let a = player("Alice");
    let b = player("Bruno");
    let scores = vec![
        score(a.id, 70, "2024-03-01"),
        score(a.id, 74, "2024-04-01"),
    ];

    // B first in the input to show the ranking moves A ahead
    let mut ranked = players_with_stats(vec![b.clone(), a.clone()], &scores);
    rank_players(&mut ranked);

    assert_eq!(ranked[0].player.id, a.id);
    assert_eq!(ranked[1].player.id, b.id);

    let a_stats = &ranked[0].stats;
    assert_eq!(a_stats.total_rounds, 2);
    assert_eq!(a_stats.average_score, 72);
    assert_eq!(a_stats.best_score, 70);
    assert_eq!(a_stats.worst_score, 74);
    assert_eq!(
        a_stats.recent_round.as_ref().map(|s| s.gross_score),
        Some(74)
    );

    let b_stats = &ranked[1].stats;
    assert_eq!(b_stats.total_rounds, 0);
    assert_eq!(b_stats.average_score, 0);
    assert_eq!(b_stats.best_score, 0);
    assert_eq!(b_stats.worst_score, 0);
    assert!(b_stats.recent_round.is_none());

    assert_eq!(leaderboard_position(&ranked, 0), Some(1));
    assert_eq!(leaderboard_position(&ranked, 1), None);
    assert_eq!(leaderboard_position(&ranked, 5), None);
}

#[test]
fn test2_average_rounds_half_up() {
    let id = Uuid::new_v4();
    let stats = compute_player_stats(&[score(id, 72, "2024-01-01"), score(id, 73, "2024-01-02")]);
    assert_eq!(stats.average_score, 73);

    let stats = compute_player_stats(&[
        score(id, 70, "2024-01-01"),
        score(id, 70, "2024-01-02"),
        score(id, 71, "2024-01-03"),
    ]);
    assert_eq!(stats.average_score, 70);
}

#[test]
fn test2_recent_round_tie_goes_to_first_entry() {
    let id = Uuid::new_v4();
    let scores = vec![
        score(id, 80, "2024-05-01"),
        score(id, 78, "2024-06-01"),
        score(id, 76, "2024-06-01"),
    ];
    let recent = recent_round(&scores).unwrap();
    assert_eq!(recent.gross_score, 78);
    assert_eq!(recent.round_score_id, scores[1].round_score_id);

    let orphan = PlayerRoundScore {
        round: None,
        ..score(id, 90, "2024-01-01")
    };
    let with_orphan = vec![orphan, score(id, 85, "2023-01-01")];
    assert_eq!(recent_round(&with_orphan).unwrap().gross_score, 85);
    assert!(recent_round(&[]).is_none());
}

#[test]
fn test2_equal_averages_keep_incoming_order() {
    let first = player("Carla");
    let second = player("Dario");
    let scores = vec![
        score(second.id, 75, "2024-01-01"),
        score(first.id, 75, "2024-01-02"),
    ];
    let mut ranked = players_with_stats(vec![first.clone(), second.clone()], &scores);
    rank_players(&mut ranked);
    assert_eq!(ranked[0].player.id, first.id);
    assert_eq!(ranked[1].player.id, second.id);
}
