//! 短语表测试: 最长匹配, 大小写与标点

mod common;

use common::write_phrase_db;
use kb_translate::infrastructure::storage::db::{
    batch_insert_phrases, count_phrases, open_phrase_table, translate_phrases,
};
use kb_translate::TranslateError;
use tokio_rusqlite::Connection;

async fn table(phrases: &[(&str, &str)]) -> (tempfile::TempDir, Connection) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("phrases.db");
    write_phrase_db(&path, phrases).await;
    let conn = open_phrase_table(&path).await.unwrap();
    (dir, conn)
}

#[tokio::test]
async fn test_longest_phrase_wins() {
    let (_dir, db) = table(&[
        ("how", "cum"),
        ("how are you", "ce mai faci"),
        ("are", "sunt"),
        ("you", "tu"),
    ])
    .await;

    assert_eq!(translate_phrases(&db, "how are you").await.unwrap(), "ce mai faci");
    assert_eq!(translate_phrases(&db, "how you").await.unwrap(), "cum tu");
}

#[tokio::test]
async fn test_punctuation_breaks_phrases() {
    let (_dir, db) = table(&[("thank you", "mulțumesc"), ("thank", "mulțumesc"), ("you", "tu")]).await;

    assert_eq!(translate_phrases(&db, "thank you!").await.unwrap(), "mulțumesc!");
    assert_eq!(translate_phrases(&db, "thank, you").await.unwrap(), "mulțumesc, tu");
}

#[tokio::test]
async fn test_unknown_words_and_whitespace_kept() {
    let (_dir, db) = table(&[("cat", "pisică")]).await;

    assert_eq!(
        translate_phrases(&db, "  the cat\tsat 42 ").await.unwrap(),
        "  the pisică\tsat 42 "
    );
}

#[tokio::test]
async fn test_case_follows_source() {
    let (_dir, db) = table(&[("hello", "salut"), ("world", "lume")]).await;

    assert_eq!(translate_phrases(&db, "Hello world").await.unwrap(), "Salut lume");
    assert_eq!(translate_phrases(&db, "HELLO").await.unwrap(), "SALUT");
}

#[tokio::test]
async fn test_phrase_keys_are_normalized() {
    let (_dir, db) = table(&[("  Good   Night ", "noapte bună")]).await;

    assert_eq!(count_phrases(&db).await.unwrap(), 1);
    assert_eq!(translate_phrases(&db, "good night").await.unwrap(), "noapte bună");

    let inserted = batch_insert_phrases(
        &db,
        vec![
            ("good night".to_string(), "noapte bună!".to_string()),
            ("   ".to_string(), "ignored".to_string()),
        ],
    )
    .await
    .unwrap();
    assert_eq!(inserted, 1);
    assert_eq!(count_phrases(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_punctuated_keys_are_not_stored() {
    let (_dir, db) = table(&[]).await;

    let inserted = batch_insert_phrases(
        &db,
        vec![
            ("e-mail".to_string(), "poștă electronică".to_string()),
            ("mr.".to_string(), "dl.".to_string()),
            ("ok".to_string(), "bine".to_string()),
        ],
    )
    .await
    .unwrap();
    assert_eq!(inserted, 1);
    assert_eq!(count_phrases(&db).await.unwrap(), 1);

    assert_eq!(translate_phrases(&db, "e-mail").await.unwrap(), "e-mail");
    assert_eq!(translate_phrases(&db, "mr. ok").await.unwrap(), "mr. bine");
}

#[tokio::test]
async fn test_open_missing_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.db");

    let err = open_phrase_table(&path).await.unwrap_err();
    assert!(matches!(err, TranslateError::ModelMissing(_)));
    assert!(!path.exists(), "opening must not create the file");

    let empty = dir.path().join("empty.db");
    std::fs::write(&empty, b"").unwrap();
    let err = open_phrase_table(&empty).await.unwrap_err();
    assert!(matches!(err, TranslateError::ModelMissing(_)));
}
