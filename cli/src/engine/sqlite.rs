//! # SQLite Conversational Engine
//!
//! File: cli/src/engine/sqlite.rs
//!
//! ## Overview
//!
//! `SqliteEngine` keeps a knowledge base of statements. Every statement may
//! point at the statement it answers (`in_response_to`), so a trained
//! conversation `[A, B, C]` becomes the rows `A`, `B -> A` and `C -> B`.
//!
//! ## Answering
//!
//! 1. The input is normalised (see [`matcher::normalize`]).
//! 2. It is scored against every prompt that has at least one stored response.
//! 3. The best prompt wins if its score reaches `min_confidence`; otherwise the
//!    configured default response is returned.
//! 4. Among the responses to the winning prompt, the most frequent text is
//!    chosen, with the oldest row breaking ties.
//!
//! ## Learning
//!
//! Unless the engine is read-only, each exchange is written back: the input as
//! a response to the bot's previous reply, and the reply as a response to the
//! input. Default replies are not learned.
//!
use crate::core::config::AppConfig;
use crate::core::error::{ChatError, Result};
use crate::engine::matcher;
use crate::engine::types::{Statement, TrainingExample, Utterance};
use crate::engine::ConversationalEngine;
use crate::storage::Database;
use anyhow::Context;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

/// Conversation label for rows written by the trainers.
pub const TRAINING_CONVERSATION: &str = "training";

/// Tunables for matching and learning.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub bot_name: String,
    pub read_only: bool,
    pub default_response: String,
    pub min_confidence: f64,
    /// Label stored on rows learned during this process.
    pub conversation: String,
}

impl EngineSettings {
    /// Settings for a new chat session; the conversation label is derived from
    /// the current time.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            bot_name: config.bot_name.clone(),
            read_only: config.read_only,
            default_response: config.default_response.clone(),
            min_confidence: config.min_confidence,
            conversation: format!("session-{}", Utc::now().format("%Y%m%dT%H%M%S%.3fZ")),
        }
    }
}

/// Conversational engine over the SQLite knowledge base.
#[derive(Debug)]
pub struct SqliteEngine {
    db: Database,
    settings: EngineSettings,
    last_reply: Option<String>,
}

impl SqliteEngine {
    pub fn new(db: Database, settings: EngineSettings) -> Self {
        Self {
            db,
            settings,
            last_reply: None,
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Every stored statement, oldest first.
    pub fn statements(&self) -> Result<Vec<Statement>> {
        let mut stmt = self
            .db
            .conn()
            .prepare(
                "SELECT text, in_response_to, conversation, persona
                 FROM statements ORDER BY id",
            )
            .map_err(ChatError::from)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Statement {
                    text: row.get(0)?,
                    in_response_to: row.get(1)?,
                    conversation: row.get(2)?,
                    persona: row.get(3)?,
                })
            })
            .map_err(ChatError::from)?;
        let statements = rows
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(ChatError::from)?;
        Ok(statements)
    }

    pub fn statement_count(&self) -> Result<usize> {
        let count: i64 = self
            .db
            .conn()
            .query_row("SELECT COUNT(*) FROM statements", [], |row| row.get(0))
            .map_err(ChatError::from)?;
        Ok(count as usize)
    }

    /// Tag names attached to statements with the given text, sorted.
    pub fn tags_for(&self, text: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .db
            .conn()
            .prepare(
                "SELECT DISTINCT t.name FROM tags t
                 JOIN statement_tags st ON st.tag_id = t.id
                 JOIN statements s ON s.id = st.statement_id
                 WHERE s.text = ?1
                 ORDER BY t.name",
            )
            .map_err(ChatError::from)?;
        let rows = stmt
            .query_map([text], |row| row.get(0))
            .map_err(ChatError::from)?;
        let tags = rows
            .collect::<rusqlite::Result<Vec<String>>>()
            .map_err(ChatError::from)?;
        Ok(tags)
    }

    /// Closest known prompt to `search_text` and its score.
    fn best_match(&self, search_text: &str) -> Result<Option<(String, f64)>> {
        let mut stmt = self
            .db
            .conn()
            .prepare(
                "SELECT search_in_response_to FROM statements
                 WHERE in_response_to IS NOT NULL
                 GROUP BY search_in_response_to
                 ORDER BY MIN(id)",
            )
            .map_err(ChatError::from)?;
        let prompts = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(ChatError::from)?;

        let mut best: Option<(String, f64)> = None;
        for prompt in prompts {
            let prompt = prompt.map_err(ChatError::from)?;
            let score = matcher::similarity(search_text, &prompt);
            if best.as_ref().map_or(true, |(_, top)| score > *top) {
                let exact = score >= 1.0;
                best = Some((prompt, score));
                if exact {
                    break;
                }
            }
        }
        Ok(best)
    }

    /// Most frequent stored response to a normalised prompt.
    fn pick_response(&self, prompt: &str) -> Result<Option<String>> {
        let response = self
            .db
            .conn()
            .query_row(
                "SELECT text FROM statements
                 WHERE in_response_to IS NOT NULL AND search_in_response_to = ?1
                 GROUP BY text
                 ORDER BY COUNT(*) DESC, MIN(id) ASC
                 LIMIT 1",
                [prompt],
                |row| row.get(0),
            )
            .optional()
            .map_err(ChatError::from)?;
        Ok(response)
    }

    fn generate(&self, input: &Utterance) -> Result<(String, bool)> {
        let search_text = matcher::normalize(input.as_str());
        if search_text.is_empty() {
            debug!("Input has no searchable text; using default response.");
            return Ok((self.settings.default_response.clone(), true));
        }
        let Some((prompt, confidence)) = self.best_match(&search_text)? else {
            debug!("Knowledge base has no prompts; using default response.");
            return Ok((self.settings.default_response.clone(), true));
        };
        debug!(
            "Closest prompt for {:?} is {:?} (confidence {:.2})",
            search_text, prompt, confidence
        );
        if confidence < self.settings.min_confidence {
            return Ok((self.settings.default_response.clone(), true));
        }
        match self.pick_response(&prompt)? {
            Some(reply) => Ok((reply, false)),
            None => Ok((self.settings.default_response.clone(), true)),
        }
    }

    fn learn(&mut self, input: &Utterance, reply: &str, is_default: bool) -> Result<()> {
        let conversation = &self.settings.conversation;
        let bot_persona = format!("bot:{}", self.settings.bot_name);
        let tx = self.db.conn_mut().transaction().map_err(ChatError::from)?;
        insert_statement(
            &tx,
            input.as_str(),
            self.last_reply.as_deref(),
            conversation,
            "user",
        )?;
        if !is_default {
            insert_statement(&tx, reply, Some(input.as_str()), conversation, &bot_persona)?;
        }
        tx.commit().map_err(ChatError::from)?;
        Ok(())
    }
}

impl ConversationalEngine for SqliteEngine {
    fn train(&mut self, conversation: &TrainingExample) -> Result<()> {
        self.train_all(std::slice::from_ref(conversation))
    }

    fn respond(&mut self, input: &Utterance) -> Result<Utterance> {
        let (reply, is_default) = self
            .generate(input)
            .with_context(|| ChatError::ResponseGeneration(format!("no reply for {:?}", input.as_str())))?;

        if !self.settings.read_only {
            self.learn(input, &reply, is_default)
                .context("Failed to store the exchange")?;
        }
        // A default reply is never stored, so it cannot be what the next input answers.
        self.last_reply = if is_default { None } else { Some(reply.clone()) };
        Ok(Utterance::new(reply))
    }

    /// All conversations are written in a single transaction.
    fn train_all(&mut self, conversations: &[TrainingExample]) -> Result<()> {
        let tx = self.db.conn_mut().transaction().map_err(ChatError::from)?;
        let mut rows = 0usize;
        for conversation in conversations {
            let mut previous: Option<&str> = None;
            for turn in conversation.turns() {
                let id = insert_statement(&tx, turn.as_str(), previous, TRAINING_CONVERSATION, "")?;
                tag_statement(&tx, id, conversation.tags())?;
                previous = Some(turn.as_str());
                rows += 1;
            }
        }
        tx.commit().map_err(ChatError::from)?;
        info!(
            "Trained on {} conversation(s), {} statement(s) stored.",
            conversations.len(),
            rows
        );
        Ok(())
    }
}

fn insert_statement(
    conn: &Connection,
    text: &str,
    in_response_to: Option<&str>,
    conversation: &str,
    persona: &str,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO statements
            (text, search_text, conversation, persona, in_response_to, search_in_response_to, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            text,
            matcher::normalize(text),
            conversation,
            persona,
            in_response_to,
            in_response_to.map(matcher::normalize).unwrap_or_default(),
            Utc::now().to_rfc3339(),
        ],
    )
    .map_err(ChatError::from)?;
    Ok(conn.last_insert_rowid())
}

fn tag_statement(conn: &Connection, statement_id: i64, tags: &[String]) -> Result<()> {
    for tag in tags {
        conn.execute("INSERT OR IGNORE INTO tags (name) VALUES (?1)", [tag])
            .map_err(ChatError::from)?;
        conn.execute(
            "INSERT OR IGNORE INTO statement_tags (statement_id, tag_id)
             SELECT ?1, id FROM tags WHERE name = ?2",
            params![statement_id, tag],
        )
        .map_err(ChatError::from)?;
    }
    Ok(())
}
