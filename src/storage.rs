use async_trait::async_trait;
use sql_middleware::SqlMiddlewareDbError;
use sql_middleware::middleware::{ConfigAndPool, DatabaseType};
use thiserror::Error;
use uuid::Uuid;

use crate::model::{
    Account, Course, NewRound, Player, PlayerRoundScore, Round, account, course, player, round,
};

#[derive(Error, Debug, Clone)]
pub enum StorageError {
    #[error("database error: {0}")]
    Db(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("rejected: {0}")]
    Rejected(String),
    #[error("round {round_id} may be partially written: {cause}; cleanup failed: {cleanup}")]
    PartialWrite {
        round_id: Uuid,
        cause: String,
        cleanup: String,
    },
}

impl From<SqlMiddlewareDbError> for StorageError {
    fn from(err: SqlMiddlewareDbError) -> Self {
        Self::Db(err.to_string())
    }
}

#[async_trait]
pub trait Storage: Send + Sync {
    async fn list_courses(&self) -> Result<Vec<Course>, StorageError>;
    async fn list_players(&self) -> Result<Vec<Player>, StorageError>;
    async fn get_player(&self, player_id: &Uuid) -> Result<Player, StorageError>;
    async fn get_player_by_account(&self, account_id: &Uuid)
    -> Result<Option<Player>, StorageError>;
    async fn create_player(&self, player: &Player) -> Result<(), StorageError>;
    async fn list_rounds(&self) -> Result<Vec<Round>, StorageError>;
    /// Scores in storage order; `None` lists every player's scores.
    async fn list_player_round_scores(
        &self,
        player_id: Option<&Uuid>,
    ) -> Result<Vec<PlayerRoundScore>, StorageError>;
    /// Writes the round with all of its scores, or nothing.
    async fn create_round(&self, round: &NewRound) -> Result<Uuid, StorageError>;
    async fn find_or_create_account(&self, email: &str) -> Result<Account, StorageError>;
    async fn get_account(&self, account_id: &Uuid) -> Result<Account, StorageError>;
}

#[derive(Clone)]
pub struct SqlStorage {
    config_and_pool: ConfigAndPool,
    db_type: DatabaseType,
}

impl SqlStorage {
    #[must_use]
    pub fn new(config_and_pool: ConfigAndPool, db_type: DatabaseType) -> Self {
        Self {
            config_and_pool,
            db_type,
        }
    }

    #[must_use]
    pub fn config_and_pool(&self) -> &ConfigAndPool {
        &self.config_and_pool
    }

    #[must_use]
    pub fn db_type(&self) -> &DatabaseType {
        &self.db_type
    }

    async fn write_round(&self, round_id: &Uuid, new_round: &NewRound) -> Result<(), StorageError> {
        let (cp, db) = (&self.config_and_pool, &self.db_type);
        round::insert_round(cp, db, round_id, new_round).await?;
        for score in &new_round.round_scores {
            let round_score_id = Uuid::new_v4();
            round::insert_round_score(cp, db, round_id, &round_score_id, score).await?;
            for hole in &score.round_score_holes {
                round::insert_round_score_hole(cp, db, &round_score_id, hole).await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for SqlStorage {
    async fn list_courses(&self) -> Result<Vec<Course>, StorageError> {
        Ok(course::list_courses(&self.config_and_pool, &self.db_type).await?)
    }

    async fn list_players(&self) -> Result<Vec<Player>, StorageError> {
        Ok(player::list_players(&self.config_and_pool, &self.db_type).await?)
    }

    async fn get_player(&self, player_id: &Uuid) -> Result<Player, StorageError> {
        player::get_player(&self.config_and_pool, &self.db_type, player_id)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("player {player_id}")))
    }

    async fn get_player_by_account(
        &self,
        account_id: &Uuid,
    ) -> Result<Option<Player>, StorageError> {
        Ok(player::get_player_by_account(&self.config_and_pool, &self.db_type, account_id).await?)
    }

    async fn create_player(&self, new_player: &Player) -> Result<(), StorageError> {
        if let Some(account_id) = &new_player.auth_id {
            if self.get_player_by_account(account_id).await?.is_some() {
                return Err(StorageError::Rejected(
                    "this account already has a player".to_string(),
                ));
            }
        }
        Ok(player::insert_player(&self.config_and_pool, &self.db_type, new_player).await?)
    }

    async fn list_rounds(&self) -> Result<Vec<Round>, StorageError> {
        Ok(round::list_rounds(&self.config_and_pool, &self.db_type).await?)
    }

    async fn list_player_round_scores(
        &self,
        player_id: Option<&Uuid>,
    ) -> Result<Vec<PlayerRoundScore>, StorageError> {
        Ok(
            round::list_player_round_scores(&self.config_and_pool, &self.db_type, player_id)
                .await?,
        )
    }

    async fn create_round(&self, new_round: &NewRound) -> Result<Uuid, StorageError> {
        new_round.check().map_err(StorageError::Rejected)?;

        let round_id = Uuid::new_v4();
        match self.write_round(&round_id, new_round).await {
            Ok(()) => {
                tracing::info!(%round_id, scores = new_round.round_scores.len(), "round created");
                Ok(round_id)
            }
            Err(cause) => {
                tracing::warn!(%round_id, error = %cause, "round write failed, removing partial rows");
                if let Err(cleanup) =
                    round::delete_round_cascade(&self.config_and_pool, &self.db_type, &round_id)
                        .await
                {
                    tracing::error!(%round_id, error = %cleanup, "partial round could not be removed");
                    return Err(StorageError::PartialWrite {
                        round_id,
                        cause: cause.to_string(),
                        cleanup: cleanup.to_string(),
                    });
                }
                Err(cause)
            }
        }
    }

    async fn find_or_create_account(&self, email: &str) -> Result<Account, StorageError> {
        Ok(account::find_or_create_account(&self.config_and_pool, &self.db_type, email).await?)
    }

    async fn get_account(&self, account_id: &Uuid) -> Result<Account, StorageError> {
        account::get_account(&self.config_and_pool, &self.db_type, account_id)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("account {account_id}")))
    }
}
