mod common;

use chrono::NaiveDateTime;
use common::{
    ALICE_ACCOUNT_ID, ALICE_EMAIL, ALICE_ID, BRUNO_ID, CAMPO_ID, FIXTURES, GUALTA_ID, count_rows,
    setup_test_context, uuid,
};
use rusty_golf_rounds::controller::catalog_prefill::catalog_prefill;
use rusty_golf_rounds::model::{HOLE_SCORE_MAX, NewRound, NewRoundScore, NewRoundScoreHole, Player};
use rusty_golf_rounds::storage::{Storage, StorageError};
use serde_json::json;
use sql_middleware::middleware::DatabaseType;
use uuid::Uuid;

fn played_at(text: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S").unwrap()
}

fn all_fours(course_id: Uuid, player_id: Uuid) -> NewRoundScore {
    NewRoundScore {
        player_id,
        gross_score: 72,
        round_score_holes: (1..=18)
            .map(|hole_number| NewRoundScoreHole {
                hole_number,
                gross_score: 4,
                course_id,
            })
            .collect(),
    }
}

#[tokio::test]
async fn test4_fixture_reads() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = setup_test_context(FIXTURES).await?;
    let storage = &ctx.storage;

    let courses = storage.list_courses().await?;
    assert_eq!(courses.len(), 2);
    // ordered by name
    assert_eq!(courses[0].name, "Club de Campo");
    let gualta = courses.iter().find(|c| c.id == uuid(GUALTA_ID)).unwrap();
    assert_eq!(gualta.par, Some(54));
    assert_eq!(gualta.course_holes.len(), 18);
    assert!(gualta.course_holes.iter().all(|h| h.par == 3));
    assert_eq!(
        gualta.course_holes.iter().map(|h| h.hole_number).collect::<Vec<_>>(),
        (1..=18).collect::<Vec<_>>()
    );

    let players = storage.list_players().await?;
    assert_eq!(players.len(), 2);
    let alice = storage.get_player(&uuid(ALICE_ID)).await?;
    assert_eq!(alice.full_name(), "Alice Bosch");
    assert_eq!(alice.handicap, Some(12.5));
    assert_eq!(alice.auth_id, Some(uuid(ALICE_ACCOUNT_ID)));

    let missing = storage.get_player(&Uuid::new_v4()).await;
    assert!(matches!(missing, Err(StorageError::NotFound(_))));

    let by_account = storage.get_player_by_account(&uuid(ALICE_ACCOUNT_ID)).await?;
    assert_eq!(by_account.map(|p| p.id), Some(uuid(ALICE_ID)));

    let rounds = storage.list_rounds().await?;
    assert_eq!(rounds.len(), 2);
    // most recently played first
    assert_eq!(rounds[0].played_at, played_at("2024-04-01T10:00:00"));
    assert_eq!(rounds[0].round_scores[0].gross_score, 74);
    assert_eq!(
        rounds[0].course.as_ref().map(|c| c.name.as_str()),
        Some("Club de Campo")
    );
    let score = &rounds[1].round_scores[0];
    assert_eq!(score.player.as_ref().map(|p| p.id), Some(uuid(ALICE_ID)));
    assert_eq!(score.holes.len(), 18);
    assert_eq!(score.holes.iter().map(|h| h.gross_score).sum::<i32>(), 70);
    assert!(score.holes.iter().all(|h| h.course_hole.is_some()));

    let alice_scores = storage.list_player_round_scores(Some(&uuid(ALICE_ID))).await?;
    assert_eq!(
        alice_scores.iter().map(|s| s.gross_score).collect::<Vec<_>>(),
        vec![70, 74]
    );
    assert_eq!(
        alice_scores[0].round.as_ref().and_then(|r| r.course_name.as_deref()),
        Some("Club de Campo")
    );
    let bruno_scores = storage.list_player_round_scores(Some(&uuid(BRUNO_ID))).await?;
    assert!(bruno_scores.is_empty());
    assert_eq!(storage.list_player_round_scores(None).await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test4_create_round_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = setup_test_context(FIXTURES).await?;
    let storage = &ctx.storage;
    let course_id = uuid(GUALTA_ID);

    let new_round = NewRound {
        course_id,
        played_at: played_at("2024-06-01T09:30:00"),
        round_scores: vec![
            all_fours(course_id, uuid(ALICE_ID)),
            all_fours(course_id, uuid(BRUNO_ID)),
        ],
    };
    let round_id = storage.create_round(&new_round).await?;

    let rounds = storage.list_rounds().await?;
    assert_eq!(rounds.len(), 3);
    let created = &rounds[0];
    assert_eq!(created.id, round_id);
    assert_eq!(created.course_id, course_id);
    assert_eq!(created.round_scores.len(), 2);
    for score in &created.round_scores {
        assert_eq!(score.gross_score, 72);
        assert_eq!(score.holes.iter().map(|h| h.gross_score).sum::<i32>(), 72);
    }
    assert_eq!(count_rows(&ctx.config_and_pool, "round_score_holes").await?, 36 + 36);
    Ok(())
}

#[tokio::test]
async fn test4_mismatched_total_is_rejected_before_writing() -> Result<(), Box<dyn std::error::Error>>
{
    let ctx = setup_test_context(FIXTURES).await?;
    let course_id = uuid(GUALTA_ID);
    let mut score = all_fours(course_id, uuid(ALICE_ID));
    score.gross_score = 70;

    let result = ctx
        .storage
        .create_round(&NewRound {
            course_id,
            played_at: played_at("2024-06-01T09:30:00"),
            round_scores: vec![score],
        })
        .await;

    assert!(matches!(result, Err(StorageError::Rejected(_))));
    assert_eq!(count_rows(&ctx.config_and_pool, "rounds").await?, 2);

    let empty = ctx
        .storage
        .create_round(&NewRound {
            course_id,
            played_at: played_at("2024-06-01T09:30:00"),
            round_scores: vec![],
        })
        .await;
    assert!(matches!(empty, Err(StorageError::Rejected(_))));

    let foreign_hole = ctx
        .storage
        .create_round(&NewRound {
            course_id,
            played_at: played_at("2024-06-01T09:30:00"),
            round_scores: vec![all_fours(uuid(CAMPO_ID), uuid(ALICE_ID))],
        })
        .await;
    assert!(matches!(foreign_hole, Err(StorageError::Rejected(_))));
    Ok(())
}

fn with_holes(course_id: Uuid, player_id: Uuid, gross_score: i32, first: &[i32]) -> NewRoundScore {
    let mut score = all_fours(course_id, player_id);
    for hole in &mut score.round_score_holes {
        hole.gross_score = 1;
    }
    for (hole, value) in score.round_score_holes.iter_mut().zip(first) {
        hole.gross_score = *value;
    }
    score.gross_score = gross_score;
    score
}

#[tokio::test]
async fn test4_out_of_range_hole_scores_are_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = setup_test_context(FIXTURES).await?;
    let course_id = uuid(GUALTA_ID);
    let alice = uuid(ALICE_ID);

    let cases = [
        // -5 + 17 ones
        with_holes(course_id, alice, 12, &[-5]),
        with_holes(course_id, alice, 16 + HOLE_SCORE_MAX + 1, &[HOLE_SCORE_MAX + 1]),
        // two i32::MAX holes plus 16 ones wrap around to 14 in i32
        with_holes(course_id, alice, 14, &[i32::MAX, i32::MAX]),
    ];
    for score in cases {
        let result = ctx
            .storage
            .create_round(&NewRound {
                course_id,
                played_at: played_at("2024-06-01T09:30:00"),
                round_scores: vec![score],
            })
            .await;
        assert!(matches!(result, Err(StorageError::Rejected(_))), "{result:?}");
    }
    assert_eq!(count_rows(&ctx.config_and_pool, "rounds").await?, 2);

    // zero on a hole is allowed
    let round_id = ctx
        .storage
        .create_round(&NewRound {
            course_id,
            played_at: played_at("2024-06-01T09:30:00"),
            round_scores: vec![with_holes(course_id, alice, 17, &[0])],
        })
        .await?;
    let rounds = ctx.storage.list_rounds().await?;
    let saved = rounds.iter().find(|r| r.id == round_id).unwrap();
    assert_eq!(saved.round_scores[0].gross_score, 17);
    Ok(())
}

#[tokio::test]
async fn test4_failed_write_leaves_nothing_behind() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = setup_test_context(FIXTURES).await?;
    let course_id = uuid(GUALTA_ID);

    // the second player repeats hole 1, so the hole insert fails after earlier rows exist
    let mut broken = all_fours(course_id, uuid(BRUNO_ID));
    broken.round_score_holes[1].hole_number = 1;
    let new_round = NewRound {
        course_id,
        played_at: played_at("2024-06-01T09:30:00"),
        round_scores: vec![all_fours(course_id, uuid(ALICE_ID)), broken],
    };
    assert!(new_round.check().is_ok());

    let result = ctx.storage.create_round(&new_round).await;
    assert!(matches!(result, Err(StorageError::Db(_))));

    assert_eq!(count_rows(&ctx.config_and_pool, "rounds").await?, 2);
    assert_eq!(count_rows(&ctx.config_and_pool, "round_scores").await?, 2);
    assert_eq!(count_rows(&ctx.config_and_pool, "round_score_holes").await?, 36);
    Ok(())
}

#[tokio::test]
async fn test4_accounts_and_players() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = setup_test_context(FIXTURES).await?;
    let storage = &ctx.storage;

    let existing = storage.find_or_create_account(" Alice@Example.com ").await?;
    assert_eq!(existing.id, uuid(ALICE_ACCOUNT_ID));
    assert_eq!(existing.email, ALICE_EMAIL);

    let fresh = storage.find_or_create_account("carla@example.com").await?;
    let again = storage.find_or_create_account("carla@example.com").await?;
    assert_eq!(fresh.id, again.id);
    assert_eq!(storage.get_account(&fresh.id).await?.email, "carla@example.com");
    assert!(matches!(
        storage.get_account(&Uuid::new_v4()).await,
        Err(StorageError::NotFound(_))
    ));

    let carla = Player {
        id: Uuid::new_v4(),
        first_name: "Carla".to_string(),
        last_name: "Diaz".to_string(),
        birthdate: chrono::NaiveDate::from_ymd_opt(2000, 2, 29).unwrap(),
        nationality: "Spain".to_string(),
        handicap: None,
        auth_id: Some(fresh.id),
    };
    storage.create_player(&carla).await?;
    assert_eq!(storage.get_player(&carla.id).await?, carla);

    let second = Player {
        id: Uuid::new_v4(),
        ..carla.clone()
    };
    assert!(matches!(
        storage.create_player(&second).await,
        Err(StorageError::Rejected(_))
    ));
    Ok(())
}

#[tokio::test]
async fn test4_catalog_prefill_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = setup_test_context("").await?;
    let catalog = json!([
        {
            "name": "Pitch & Putt Gualta Par 3",
            "par": 54,
            "holes": (1..=18).map(|n| json!({
                "hole_number": n, "par": 3, "stroke_index": n, "distance": 60 + n
            })).collect::<Vec<_>>()
        },
        {
            "id": "77777777-7777-4777-8777-777777777777",
            "name": "Nine Hole Links",
            "par": null,
            "picture_url": "https://example.com/links.jpg",
            "holes": (1..=9).rev().map(|n| json!({
                "hole_number": n, "par": 4, "stroke_index": n, "distance": 250
            })).collect::<Vec<_>>()
        }
    ]);

    let inserted = catalog_prefill(&catalog, &ctx.config_and_pool, &DatabaseType::Sqlite).await?;
    assert_eq!(inserted, 2);
    let inserted = catalog_prefill(&catalog, &ctx.config_and_pool, &DatabaseType::Sqlite).await?;
    assert_eq!(inserted, 0);

    let courses = ctx.storage.list_courses().await?;
    assert_eq!(courses.len(), 2);
    let links = courses
        .iter()
        .find(|c| c.id == uuid("77777777-7777-4777-8777-777777777777"))
        .unwrap();
    assert_eq!(links.par, None);
    assert_eq!(links.course_holes.len(), 9);
    assert_eq!(links.course_holes[0].hole_number, 1);

    let bad = json!([{ "name": "No holes" }]);
    assert!(catalog_prefill(&bad, &ctx.config_and_pool, &DatabaseType::Sqlite).await.is_err());
    Ok(())
}
