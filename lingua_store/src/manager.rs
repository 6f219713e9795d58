use async_trait::async_trait;
use lingua_core::{ChatMessage, Error, MessageStore, Result, Role, TIMESTAMP_FORMAT, Turn};
use lingua_entities::conversations;
use sea_orm::{
    ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait,
    QueryOrder, Set, TransactionTrait,
};
use std::path::Path;
use tracing::{debug, info};

/// Conversation log stored in a single SQLite table.
///
/// Owns one connection for its whole lifetime; call [`close`](Self::close)
/// at shutdown.
pub struct SqliteMessageStore {
    db: DatabaseConnection,
}

impl SqliteMessageStore {
    /// Open (creating if needed) the database file at `db_path` and make the
    /// schema ready.
    pub async fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::storage("create database directory", e))?;
        }

        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
        Self::connect(&db_url).await
    }

    /// Connect to an explicit sea-orm URL and make the schema ready.
    pub async fn connect(db_url: &str) -> Result<Self> {
        info!("Connecting to database: {}", db_url);

        let mut options = ConnectOptions::new(db_url.to_owned());
        options.max_connections(1).min_connections(1).sqlx_logging(false);

        let db = Database::connect(options)
            .await
            .map_err(|e| Error::storage("connect", e))?;

        let store = Self { db };
        store.initialize().await?;

        info!("SqliteMessageStore initialized");
        Ok(store)
    }

    pub async fn close(self) -> Result<()> {
        self.db
            .close()
            .await
            .map_err(|e| Error::storage("close", e))?;
        debug!("Database connection closed");
        Ok(())
    }

    fn now_timestamp() -> String {
        chrono::Local::now()
            .naive_local()
            .format(TIMESTAMP_FORMAT)
            .to_string()
    }

    fn new_row(role: Role, content: &str, timestamp: String) -> conversations::ActiveModel {
        conversations::ActiveModel {
            timestamp: Set(timestamp),
            role: Set(role.as_str().to_owned()),
            content: Set(content.to_owned()),
            ..Default::default()
        }
    }
}

fn to_turn(model: conversations::Model, operation: &'static str) -> Result<Turn> {
    let role = model
        .role
        .parse::<Role>()
        .map_err(|e| Error::storage(operation, e.context(format!("row {}", model.id))))?;
    let timestamp = model
        .timestamp
        .parse::<chrono::NaiveDateTime>()
        .map_err(|e| {
            Error::storage(
                operation,
                anyhow::Error::new(e).context(format!("row {} timestamp", model.id)),
            )
        })?;

    Ok(Turn {
        id: model.id,
        timestamp,
        role,
        content: model.content,
    })
}

#[async_trait]
impl MessageStore for SqliteMessageStore {
    async fn initialize(&self) -> Result<()> {
        self.db
            .execute_unprepared(conversations::CREATE_TABLE)
            .await
            .map_err(|e| Error::storage("initialize", e))?;
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<Turn>> {
        let models = conversations::Entity::find()
            .order_by_asc(conversations::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| Error::storage("load", e))?;

        debug!("Loaded {} turns", models.len());
        models.into_iter().map(|m| to_turn(m, "load")).collect()
    }

    async fn append(&self, role: Role, content: &str) -> Result<Turn> {
        let model = Self::new_row(role, content, Self::now_timestamp())
            .insert(&self.db)
            .await
            .map_err(|e| Error::storage("append", e))?;

        debug!("Appended turn {} ({})", model.id, role);
        to_turn(model, "append")
    }

    async fn append_batch(&self, messages: &[ChatMessage]) -> Result<Vec<Turn>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| Error::storage("append batch", e))?;

        let mut models = Vec::with_capacity(messages.len());
        for message in messages {
            let model = Self::new_row(message.role, &message.content, Self::now_timestamp())
                .insert(&txn)
                .await
                .map_err(|e| Error::storage("append batch", e))?;
            models.push(model);
        }

        txn.commit()
            .await
            .map_err(|e| Error::storage("append batch", e))?;

        debug!("Appended {} turns in one transaction", models.len());
        models
            .into_iter()
            .map(|m| to_turn(m, "append batch"))
            .collect()
    }

    async fn clear_all(&self) -> Result<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| Error::storage("clear", e))?;

        // Dropping the table also drops its sqlite_sequence row, so ids restart at 1.
        txn.execute_unprepared(conversations::DROP_TABLE)
            .await
            .map_err(|e| Error::storage("clear", e))?;
        txn.execute_unprepared(conversations::CREATE_TABLE)
            .await
            .map_err(|e| Error::storage("recreate schema", e))?;

        txn.commit()
            .await
            .map_err(|e| Error::storage("clear", e))?;

        info!("Cleared all conversation data");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_store() -> (tempfile::TempDir, SqliteMessageStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteMessageStore::open(&dir.path().join("lessons.db"))
            .await
            .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn initialize_is_idempotent() {
        let (_dir, store) = temp_store().await;
        store.append(Role::User, "Hello").await.unwrap();

        store.initialize().await.unwrap();
        store.initialize().await.unwrap();

        assert_eq!(store.load_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn append_assigns_increasing_ids() {
        let (_dir, store) = temp_store().await;
        let first = store.append(Role::User, "Hello").await.unwrap();
        let second = store.append(Role::Assistant, "Hi there!").await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(second.timestamp >= first.timestamp);
    }

    #[tokio::test]
    async fn clear_restarts_ids_at_one() {
        let (_dir, store) = temp_store().await;
        store.append(Role::User, "one").await.unwrap();
        store.append(Role::Assistant, "two").await.unwrap();

        store.clear_all().await.unwrap();
        assert!(store.load_all().await.unwrap().is_empty());

        let turn = store.append(Role::User, "again").await.unwrap();
        assert_eq!(turn.id, 1);
    }

    #[tokio::test]
    async fn batch_is_written_in_order() {
        let (_dir, store) = temp_store().await;
        let turns = store
            .append_batch(&[
                ChatMessage::user("instruction"),
                ChatMessage::assistant("ok"),
                ChatMessage::user("Hello"),
            ])
            .await
            .unwrap();

        let ids: Vec<i64> = turns.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(store.load_all().await.unwrap(), turns);
    }

    #[test]
    fn unknown_role_is_a_storage_failure() {
        let model = conversations::Model {
            id: 7,
            timestamp: "2024-01-01T10:00:00.000000".to_string(),
            role: "system".to_string(),
            content: "x".to_string(),
        };
        let err = to_turn(model, "load").unwrap_err();
        assert!(matches!(err, Error::Storage { operation: "load", .. }));
    }
}
