use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rusty_golf_rounds::cache::QueryCache;
use rusty_golf_rounds::model::{
    Account, Course, CourseHole, NewRound, Player, PlayerRoundScore, Round, hole_sum,
};
use rusty_golf_rounds::mvu::round_form::{
    ALERT_HOLE_OUT_OF_RANGE, ALERT_INVALID_DATE, ALERT_INVALID_SCORES, ALERT_MISSING_SELECTION, ALERT_PERSIST_FAILED,
    Msg, Phase, RoundFormModel, decode_form_pairs,
};
use rusty_golf_rounds::mvu::round_form_effects::Deps;
use rusty_golf_rounds::mvu::runtime::{run_round_form, run_round_form_all};
use rusty_golf_rounds::storage::{Storage, StorageError};
use uuid::Uuid;

/// Serves a fixed catalog and records every round it is asked to create.
struct RecordingStorage {
    courses: Vec<Course>,
    players: Vec<Player>,
    created: Mutex<Vec<NewRound>>,
    fail_create: bool,
}

impl RecordingStorage {
    fn new(fail_create: bool) -> Self {
        let courses = vec![
            course("Pitch & Putt Gualta Par 3", 3),
            course("Club de Campo", 4),
        ];
        let players = ["Alice", "Bruno"]
            .iter()
            .map(|name| Player {
                id: Uuid::new_v4(),
                first_name: (*name).to_string(),
                last_name: "Tester".to_string(),
                birthdate: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
                nationality: "Spain".to_string(),
                handicap: None,
                auth_id: None,
            })
            .collect();
        Self {
            courses,
            players,
            created: Mutex::new(Vec::new()),
            fail_create,
        }
    }

    fn created(&self) -> Vec<NewRound> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl Storage for RecordingStorage {
    async fn list_courses(&self) -> Result<Vec<Course>, StorageError> {
        Ok(self.courses.clone())
    }
    async fn list_players(&self) -> Result<Vec<Player>, StorageError> {
        Ok(self.players.clone())
    }
    async fn get_player(&self, player_id: &Uuid) -> Result<Player, StorageError> {
        self.players
            .iter()
            .find(|p| p.id == *player_id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(player_id.to_string()))
    }
    async fn get_player_by_account(&self, _: &Uuid) -> Result<Option<Player>, StorageError> {
        Ok(None)
    }
    async fn create_player(&self, _: &Player) -> Result<(), StorageError> {
        Ok(())
    }
    async fn list_rounds(&self) -> Result<Vec<Round>, StorageError> {
        Ok(Vec::new())
    }
    async fn list_player_round_scores(
        &self,
        _: Option<&Uuid>,
    ) -> Result<Vec<PlayerRoundScore>, StorageError> {
        Ok(Vec::new())
    }
    async fn create_round(&self, round: &NewRound) -> Result<Uuid, StorageError> {
        self.created.lock().unwrap().push(round.clone());
        if self.fail_create {
            return Err(StorageError::Db("disk full".to_string()));
        }
        Ok(Uuid::new_v4())
    }
    async fn find_or_create_account(&self, email: &str) -> Result<Account, StorageError> {
        Ok(Account {
            id: Uuid::new_v4(),
            email: email.to_string(),
        })
    }
    async fn get_account(&self, account_id: &Uuid) -> Result<Account, StorageError> {
        Err(StorageError::NotFound(account_id.to_string()))
    }
}

fn course(name: &str, hole_par: i32) -> Course {
    let course_id = Uuid::new_v4();
    Course {
        id: course_id,
        name: name.to_string(),
        par: Some(hole_par * 18),
        picture_url: None,
        course_holes: (1..=18)
            .map(|hole_number| CourseHole {
                course_id,
                hole_number,
                par: hole_par,
                stroke_index: hole_number,
                distance: 60 * hole_par,
            })
            .collect(),
    }
}

fn now() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2024-06-01T09:30:00", "%Y-%m-%dT%H:%M:%S").unwrap()
}

async fn loaded_model(deps: Deps<'_>) -> RoundFormModel {
    let mut model = RoundFormModel::new(now());
    run_round_form(&mut model, Msg::PageLoad, deps).await.unwrap();
    model
}

fn fill_holes(player_id: Uuid, score: i32) -> Vec<Msg> {
    (1..=18)
        .map(|hole_number| Msg::SetHoleScore {
            player_id,
            hole_number,
            value: score.to_string(),
        })
        .collect()
}

#[tokio::test]
async fn test3_submit_without_course_is_rejected() {
    let storage = RecordingStorage::new(false);
    let cache = QueryCache::default();
    let deps = Deps {
        storage: &storage,
        cache: &cache,
    };
    let mut model = loaded_model(deps).await;
    assert_eq!(model.courses.len(), 2);
    assert_eq!(model.players.len(), 2);
    assert_eq!(model.played_at, "2024-06-01T09:30");

    let alice = model.players[0].id;
    run_round_form_all(&mut model, vec![Msg::TogglePlayer(alice), Msg::Submit], deps)
        .await
        .unwrap();

    assert_eq!(model.alert.as_deref(), Some(ALERT_MISSING_SELECTION));
    assert_eq!(model.phase, Phase::Editing);
    assert!(storage.created().is_empty());
}

#[tokio::test]
async fn test3_submit_without_players_is_rejected() {
    let storage = RecordingStorage::new(false);
    let cache = QueryCache::default();
    let deps = Deps {
        storage: &storage,
        cache: &cache,
    };
    let mut model = loaded_model(deps).await;
    let course = model.courses[0].id;
    run_round_form_all(&mut model, vec![Msg::SelectCourse(course), Msg::Submit], deps)
        .await
        .unwrap();
    assert_eq!(model.alert.as_deref(), Some(ALERT_MISSING_SELECTION));
    assert!(storage.created().is_empty());
}

#[tokio::test]
async fn test3_missing_hole_scores_are_rejected() {
    let storage = RecordingStorage::new(false);
    let cache = QueryCache::default();
    let deps = Deps {
        storage: &storage,
        cache: &cache,
    };
    let mut model = loaded_model(deps).await;
    let course = model.courses[0].id;
    let (alice, bruno) = (model.players[0].id, model.players[1].id);
    run_round_form_all(
        &mut model,
        vec![
            Msg::SelectCourse(course),
            Msg::TogglePlayer(alice),
            Msg::TogglePlayer(bruno),
        ],
        deps,
    )
    .await
    .unwrap();
    let mut msgs = fill_holes(alice, 4);
    msgs.push(Msg::Submit);
    run_round_form_all(&mut model, msgs, deps).await.unwrap();

    assert_eq!(model.alert.as_deref(), Some(ALERT_INVALID_SCORES));
    assert_eq!(model.draft_for(&alice).unwrap().hole_total(), 72);
    assert_eq!(model.draft_for(&bruno).unwrap().hole_total(), 0);
    assert!(storage.created().is_empty());
}

#[tokio::test]
async fn test3_bad_played_at_is_rejected() {
    let storage = RecordingStorage::new(false);
    let cache = QueryCache::default();
    let deps = Deps {
        storage: &storage,
        cache: &cache,
    };
    let mut model = loaded_model(deps).await;
    let course = model.courses[0].id;
    let alice = model.players[0].id;
    run_round_form_all(
        &mut model,
        vec![Msg::SelectCourse(course), Msg::TogglePlayer(alice)],
        deps,
    )
    .await
    .unwrap();
    let mut msgs = fill_holes(alice, 3);
    msgs.push(Msg::SetPlayedAt("yesterday-ish".to_string()));
    msgs.push(Msg::Submit);
    run_round_form_all(&mut model, msgs, deps).await.unwrap();

    assert_eq!(model.alert.as_deref(), Some(ALERT_INVALID_DATE));
    assert!(storage.created().is_empty());
}

#[tokio::test]
async fn test3_valid_submit_persists_matching_totals() {
    let storage = RecordingStorage::new(false);
    let cache = QueryCache::default();
    let deps = Deps {
        storage: &storage,
        cache: &cache,
    };
    let mut model = loaded_model(deps).await;
    let course = model.courses[0].id;
    let alice = model.players[0].id;
    run_round_form_all(
        &mut model,
        vec![Msg::SelectCourse(course), Msg::TogglePlayer(alice)],
        deps,
    )
    .await
    .unwrap();
    let mut msgs = fill_holes(alice, 4);
    msgs.push(Msg::Submit);
    run_round_form_all(&mut model, msgs, deps).await.unwrap();

    assert!(matches!(model.phase, Phase::Succeeded(_)));
    assert_eq!(model.redirect.as_deref(), Some("/"));
    assert!(model.alert.is_none());

    let created = storage.created();
    assert_eq!(created.len(), 1);
    let round = &created[0];
    assert_eq!(round.course_id, course);
    assert_eq!(round.round_scores.len(), 1);
    let score = &round.round_scores[0];
    assert_eq!(score.gross_score, 72);
    assert_eq!(
        hole_sum(&score.round_score_holes),
        i64::from(score.gross_score)
    );
    assert!(round.check().is_ok());
}

#[tokio::test]
async fn test3_persist_failure_sets_alert() {
    let storage = RecordingStorage::new(true);
    let cache = QueryCache::default();
    let deps = Deps {
        storage: &storage,
        cache: &cache,
    };
    let mut model = loaded_model(deps).await;
    let course = model.courses[0].id;
    let alice = model.players[0].id;
    run_round_form_all(
        &mut model,
        vec![Msg::SelectCourse(course), Msg::TogglePlayer(alice)],
        deps,
    )
    .await
    .unwrap();
    let mut msgs = fill_holes(alice, 4);
    msgs.push(Msg::Submit);
    let result = run_round_form_all(&mut model, msgs, deps).await;

    assert!(result.is_err());
    assert_eq!(model.phase, Phase::Failed);
    assert_eq!(model.alert.as_deref(), Some(ALERT_PERSIST_FAILED));
    assert!(model.redirect.is_none());
    assert_eq!(storage.created().len(), 1);
}

#[tokio::test]
async fn test3_course_switch_clears_scores_and_toggle_removes_player() {
    let storage = RecordingStorage::new(false);
    let cache = QueryCache::default();
    let deps = Deps {
        storage: &storage,
        cache: &cache,
    };
    let mut model = loaded_model(deps).await;
    let course = model.courses[0].id;
    let alice = model.players[0].id;
    run_round_form_all(
        &mut model,
        vec![Msg::SelectCourse(course), Msg::TogglePlayer(alice)],
        deps,
    )
    .await
    .unwrap();
    let msgs = fill_holes(alice, 5);
    run_round_form_all(&mut model, msgs, deps).await.unwrap();
    assert_eq!(model.draft_for(&alice).unwrap().hole_total(), 90);

    // picking the course already in use keeps what was entered
    run_round_form(&mut model, Msg::SelectCourse(course), deps)
        .await
        .unwrap();
    assert_eq!(model.draft_for(&alice).unwrap().hole_total(), 90);

    let other = model.courses[1].id;
    run_round_form(&mut model, Msg::SelectCourse(other), deps)
        .await
        .unwrap();
    let draft = model.draft_for(&alice).unwrap();
    assert_eq!(draft.hole_total(), 0);
    assert_eq!(draft.round_score_holes.len(), 18);
    assert!(draft.round_score_holes.iter().all(|h| h.course_id == other));

    run_round_form(&mut model, Msg::TogglePlayer(alice), deps)
        .await
        .unwrap();
    assert!(!model.is_selected(&alice));

    // unknown ids are ignored
    run_round_form(&mut model, Msg::TogglePlayer(Uuid::new_v4()), deps)
        .await
        .unwrap();
    assert!(model.round_scores.is_empty());
}

async fn submit_with_first_hole(deps: Deps<'_>, first_hole: &str) -> RoundFormModel {
    let mut model = loaded_model(deps).await;
    let course = model.courses[0].id;
    let alice = model.players[0].id;
    let mut msgs = vec![Msg::SelectCourse(course), Msg::TogglePlayer(alice)];
    msgs.extend(fill_holes(alice, 1));
    msgs.push(Msg::SetHoleScore {
        player_id: alice,
        hole_number: 1,
        value: first_hole.to_string(),
    });
    msgs.push(Msg::Submit);
    run_round_form_all(&mut model, msgs, deps).await.unwrap();
    model
}

#[tokio::test]
async fn test3_hole_scores_outside_range_are_rejected() {
    let storage = RecordingStorage::new(false);
    let cache = QueryCache::default();
    let deps = Deps {
        storage: &storage,
        cache: &cache,
    };

    for value in ["-5", "21", "2147483647"] {
        let model = submit_with_first_hole(deps, value).await;
        assert_eq!(model.alert.as_deref(), Some(ALERT_HOLE_OUT_OF_RANGE), "{value}");
        assert_eq!(model.phase, Phase::Editing);
    }
    assert!(storage.created().is_empty());

    // a zero on one hole is fine as long as the round total is positive
    let model = submit_with_first_hole(deps, "0").await;
    assert!(matches!(model.phase, Phase::Succeeded(_)));
    assert_eq!(storage.created()[0].round_scores[0].gross_score, 17);
}

#[tokio::test]
async fn test3_many_huge_hole_scores_do_not_overflow() {
    let storage = RecordingStorage::new(false);
    let cache = QueryCache::default();
    let deps = Deps {
        storage: &storage,
        cache: &cache,
    };
    let mut model = loaded_model(deps).await;
    let course = model.courses[0].id;
    let alice = model.players[0].id;
    let mut msgs = vec![Msg::SelectCourse(course), Msg::TogglePlayer(alice)];
    msgs.extend(fill_holes(alice, i32::MAX));
    run_round_form_all(&mut model, msgs, deps).await.unwrap();
    assert_eq!(
        model.draft_for(&alice).unwrap().hole_total(),
        18 * i64::from(i32::MAX)
    );

    run_round_form(&mut model, Msg::Submit, deps).await.unwrap();
    assert_eq!(model.alert.as_deref(), Some(ALERT_HOLE_OUT_OF_RANGE));
    assert!(storage.created().is_empty());
}

#[test]
fn test3_decode_form_pairs_puts_action_last() {
    let course = Uuid::new_v4();
    let player = Uuid::new_v4();
    let pairs: Vec<(String, String)> = vec![
        ("action".into(), "submit".into()),
        (format!("score:{player}:3"), "4".into()),
        ("player".into(), player.to_string()),
        ("played_at".into(), "2024-06-01T09:30".into()),
        ("course_id".into(), course.to_string()),
        ("score:not-a-uuid:3".into(), "4".into()),
        ("unrelated".into(), "x".into()),
    ];
    let msgs = decode_form_pairs(&pairs);

    assert_eq!(msgs.len(), 5);
    assert!(matches!(msgs[0], Msg::SelectCourse(id) if id == course));
    assert!(matches!(&msgs[1], Msg::SetPlayedAt(at) if at == "2024-06-01T09:30"));
    assert!(matches!(msgs[2], Msg::TogglePlayer(id) if id == player));
    assert!(matches!(
        &msgs[3],
        Msg::SetHoleScore { player_id, hole_number: 3, value } if *player_id == player && value == "4"
    ));
    assert!(matches!(msgs[4], Msg::Submit));

    let toggle = decode_form_pairs(&[("action".to_string(), format!("toggle_player:{player}"))]);
    assert!(matches!(toggle[..], [Msg::TogglePlayer(id)] if id == player));
    let select = decode_form_pairs(&[("action".to_string(), format!("select_course:{course}"))]);
    assert!(matches!(select[..], [Msg::SelectCourse(id)] if id == course));
}
