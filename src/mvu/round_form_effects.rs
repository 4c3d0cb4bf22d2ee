use crate::cache::{CacheTag, QueryCache};
use crate::error::AppError;
use crate::mvu::round_form::{Effect, Msg};
use crate::storage::Storage;

pub const COURSES_KEY: &str = "courses";
pub const PLAYERS_KEY: &str = "players";

#[derive(Clone, Copy)]
pub struct Deps<'a> {
    pub storage: &'a dyn Storage,
    pub cache: &'a QueryCache,
}

pub async fn run_effect(effect: Effect, deps: Deps<'_>) -> Msg {
    match effect {
        Effect::LoadCatalog => {
            let (courses, players) = futures::join!(
                deps.cache
                    .get_or_load(COURSES_KEY, &[CacheTag::Courses], || {
                        deps.storage.list_courses()
                    }),
                deps.cache
                    .get_or_load(PLAYERS_KEY, &[CacheTag::Players], || {
                        deps.storage.list_players()
                    }),
            );
            match (courses, players) {
                (Ok(courses), Ok(players)) => Msg::CatalogLoaded { courses, players },
                (Err(e), _) | (_, Err(e)) => Msg::Failed(AppError::from(e)),
            }
        }
        Effect::Persist(new_round) => match deps.storage.create_round(&new_round).await {
            Ok(round_id) => Msg::Persisted(round_id),
            Err(e) => {
                tracing::error!(error = %e, "round could not be created");
                Msg::Failed(AppError::from(e))
            }
        },
        Effect::InvalidateRounds => {
            deps.cache
                .invalidate(&[CacheTag::Rounds, CacheTag::Players])
                .await;
            Msg::CacheInvalidated
        }
    }
}
