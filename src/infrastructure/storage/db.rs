//! Phrase table storage: the on-disk format of an offline model.
//!
//! A model is a SQLite database with a single `phrases` table mapping a
//! lowercased source phrase (words joined by single spaces) to its
//! translation.

use crate::domain::error::TranslateError;
use rusqlite::OptionalExtension;
use std::path::Path;
use tokio_rusqlite::{params, Connection};
use tracing::warn;

/// Longest phrase, in words, looked up in one piece
pub const MAX_PHRASE_WORDS: usize = 4;

pub async fn open_phrase_table(db_path: &Path) -> Result<Connection, TranslateError> {
    // Connection::open would silently create an empty database
    if !tokio::fs::try_exists(db_path).await? {
        return Err(TranslateError::ModelMissing(db_path.display().to_string()));
    }

    let db = Connection::open(db_path.to_path_buf()).await?;
    let exists = db.call(|conn| phrase_table_exists(conn)).await?;
    if !exists {
        return Err(TranslateError::ModelMissing(format!(
            "{} has no phrases table",
            db_path.display()
        )));
    }
    Ok(db)
}

pub async fn create_phrase_table(db: &Connection) -> Result<(), TranslateError> {
    db.call(|conn| {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS phrases (
                source TEXT PRIMARY KEY,
                target TEXT NOT NULL
            )",
        )
    })
    .await?;
    Ok(())
}

/// Insert or replace phrases in one transaction, returning how many were written
///
/// Sources that lookup could never reach (empty, or with punctuation between
/// or around the words) are skipped and not counted.
pub async fn batch_insert_phrases(
    db: &Connection,
    items: Vec<(String, String)>,
) -> Result<usize, TranslateError> {
    let prepared: Vec<(String, String)> = items
        .into_iter()
        .filter_map(|(source, target)| match normalize_key(&source) {
            Some(key) => Some((key, target)),
            None => {
                warn!(%source, "Skipping phrase that cannot be matched");
                None
            }
        })
        .collect();

    if prepared.is_empty() {
        return Ok(0);
    }

    let count = db.call(move |conn| insert_phrases(conn, prepared)).await?;
    Ok(count)
}

pub async fn count_phrases(db: &Connection) -> Result<usize, TranslateError> {
    let count: i64 = db
        .call(|conn| conn.query_row("SELECT COUNT(*) FROM phrases", params![], |row| row.get(0)))
        .await?;
    Ok(count as usize)
}

/// Translate `text` phrase by phrase on the connection thread
pub async fn translate_phrases(db: &Connection, text: &str) -> Result<String, TranslateError> {
    let text = text.to_string();
    let translated = db.call(move |conn| translate_with(conn, &text)).await?;
    Ok(translated)
}

/// Key a phrase the way lookup sees it: lowercased words joined by single spaces
///
/// `None` when the phrase has no words or any non-whitespace gap, since
/// lookup only joins words separated by plain whitespace.
pub fn normalize_key(phrase: &str) -> Option<String> {
    let mut words = Vec::new();
    for token in tokenize(phrase) {
        match token {
            Token::Word(word) => words.push(word.to_lowercase()),
            Token::Gap(gap) if gap.chars().all(char::is_whitespace) => {}
            Token::Gap(_) => return None,
        }
    }
    if words.is_empty() {
        return None;
    }
    Some(words.join(" "))
}

fn phrase_table_exists(conn: &mut rusqlite::Connection) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT exists(SELECT 1 FROM sqlite_master WHERE type='table' AND name='phrases')",
        [],
        |row| row.get(0),
    )
}

fn insert_phrases(
    conn: &mut rusqlite::Connection,
    items: Vec<(String, String)>,
) -> rusqlite::Result<usize> {
    let tx = conn.transaction()?;
    let mut count = 0;
    {
        let mut stmt =
            tx.prepare("INSERT OR REPLACE INTO phrases (source, target) VALUES (?1, ?2)")?;
        for (source, target) in items {
            count += stmt.execute(params![source, target])?;
        }
    }
    tx.commit()?;
    Ok(count)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token<'a> {
    Word(&'a str),
    Gap(&'a str),
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '\'' || c == '\u{2019}'
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_word: Option<bool> = None;

    for (idx, c) in text.char_indices() {
        let word = is_word_char(c);
        match in_word {
            Some(current) if current == word => {}
            Some(current) => {
                tokens.push(make_token(current, &text[start..idx]));
                start = idx;
                in_word = Some(word);
            }
            None => in_word = Some(word),
        }
    }
    if let Some(current) = in_word {
        tokens.push(make_token(current, &text[start..]));
    }
    tokens
}

fn make_token(word: bool, s: &str) -> Token<'_> {
    if word {
        Token::Word(s)
    } else {
        Token::Gap(s)
    }
}

fn translate_with(conn: &mut rusqlite::Connection, text: &str) -> rusqlite::Result<String> {
    let mut stmt = conn.prepare_cached("SELECT target FROM phrases WHERE source = ?1")?;
    let tokens = tokenize(text);
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < tokens.len() {
        let first = match tokens[i] {
            Token::Gap(gap) => {
                out.push_str(gap);
                i += 1;
                continue;
            }
            Token::Word(word) => word,
        };

        // Token indices of the words that may form a phrase starting at `i`.
        // Only plain whitespace may sit between words of one phrase.
        let mut words = vec![i];
        let mut j = i;
        while words.len() < MAX_PHRASE_WORDS {
            match (tokens.get(j + 1), tokens.get(j + 2)) {
                (Some(Token::Gap(gap)), Some(Token::Word(_)))
                    if gap.chars().all(char::is_whitespace) =>
                {
                    j += 2;
                    words.push(j);
                }
                _ => break,
            }
        }

        let mut matched = None;
        for n in (1..=words.len()).rev() {
            let key = words[..n]
                .iter()
                .filter_map(|&k| match tokens[k] {
                    Token::Word(w) => Some(w.to_lowercase()),
                    Token::Gap(_) => None,
                })
                .collect::<Vec<_>>()
                .join(" ");
            let target: Option<String> = stmt
                .query_row(params![key], |row| row.get(0))
                .optional()?;
            if let Some(target) = target {
                matched = Some((n, target));
                break;
            }
        }

        match matched {
            Some((n, target)) => {
                out.push_str(&match_case(first, &target));
                i = words[n - 1] + 1;
            }
            None => {
                out.push_str(first);
                i += 1;
            }
        }
    }

    Ok(out)
}

/// Carry the source word's capitalization over to the translation
fn match_case(source: &str, target: &str) -> String {
    let letters: Vec<char> = source.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.len() > 1 && letters.iter().all(|c| c.is_uppercase()) {
        return target.to_uppercase();
    }

    if source.chars().next().is_some_and(char::is_uppercase) {
        let mut chars = target.chars();
        if let Some(head) = chars.next() {
            return head.to_uppercase().chain(chars).collect();
        }
    }
    target.to_string()
}
