//! Integration tests for durable conversation storage.
//!
//! These tests verify that:
//! - Appended turns survive closing and reopening the database
//! - `append` followed by `load_all` exposes the new turn last

use lingua_core::{ChatMessage, MessageStore, Role};
use lingua_store::SqliteMessageStore;

#[tokio::test]
async fn test_turns_survive_reopen_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("data").join("english_lessons.db");

    let contents: Vec<String> = (0..7).map(|i| format!("message {i}")).collect();
    {
        let store = SqliteMessageStore::open(&db_path).await.unwrap();
        for (i, content) in contents.iter().enumerate() {
            let role = if i % 2 == 0 { Role::User } else { Role::Assistant };
            store.append(role, content).await.unwrap();
        }
        store.close().await.unwrap();
    }

    let store = SqliteMessageStore::open(&db_path).await.unwrap();
    let turns = store.load_all().await.unwrap();

    assert_eq!(turns.len(), contents.len());
    for (turn, expected) in turns.iter().zip(&contents) {
        assert_eq!(&turn.content, expected);
    }
    assert!(turns.windows(2).all(|pair| pair[0].id < pair[1].id));
    assert_eq!(turns[0].role, Role::User);
    assert_eq!(turns[1].role, Role::Assistant);
}

#[tokio::test]
async fn test_append_then_load_shows_new_turn_last() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteMessageStore::open(&dir.path().join("lessons.db"))
        .await
        .unwrap();

    store.append(Role::User, "Hello").await.unwrap();
    let appended = store
        .append(Role::Assistant, "Hi there!\nHow are you today?")
        .await
        .unwrap();

    let turns = store.load_all().await.unwrap();
    let last = turns.last().unwrap();
    assert_eq!(last, &appended);
    assert_eq!(last.role, Role::Assistant);
    assert_eq!(last.content, "Hi there!\nHow are you today?");
}

#[tokio::test]
async fn test_empty_store_loads_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteMessageStore::open(&dir.path().join("lessons.db"))
        .await
        .unwrap();

    assert!(store.load_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_clear_then_reopen_stays_empty() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("lessons.db");
    {
        let store = SqliteMessageStore::open(&db_path).await.unwrap();
        store
            .append_batch(&[ChatMessage::user("Hello"), ChatMessage::assistant("Hi")])
            .await
            .unwrap();
        store.clear_all().await.unwrap();
        store.close().await.unwrap();
    }

    let store = SqliteMessageStore::open(&db_path).await.unwrap();
    assert!(store.load_all().await.unwrap().is_empty());
}
