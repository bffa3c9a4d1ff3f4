use async_trait::async_trait;
use chrono::Utc;
use futures_util::StreamExt;
use mongodb::{
    Database,
    bson::{doc, oid::ObjectId},
    options::FindOptions,
};

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{ChatMessage, ChatRole},
};

pub const COLLECTION: &str = "chat_messages";
pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 200;

/// Persistence seam for `chat_messages`.
#[async_trait]
pub trait ChatStore: Send + Sync {
    async fn insert(&self, msg: &ChatMessage) -> AppResult<()>;

    /// Up to `limit` of the user's messages, newest first. Messages sharing a
    /// `created_at` second are ordered by id.
    async fn newest(&self, user_id: ObjectId, session_id: Option<&str>, limit: i64) -> AppResult<Vec<ChatMessage>>;
}

#[derive(Clone)]
pub struct MongoChatStore {
    db: Database,
}

impl MongoChatStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn messages(&self) -> mongodb::Collection<ChatMessage> {
        self.db.collection::<ChatMessage>(COLLECTION)
    }
}

#[async_trait]
impl ChatStore for MongoChatStore {
    async fn insert(&self, msg: &ChatMessage) -> AppResult<()> {
        self.messages().insert_one(msg, None).await?;
        Ok(())
    }

    async fn newest(&self, user_id: ObjectId, session_id: Option<&str>, limit: i64) -> AppResult<Vec<ChatMessage>> {
        let mut filter = doc! { "user_id": user_id };
        if let Some(sid) = session_id {
            filter.insert("session_id", sid);
        }

        let find_opts = FindOptions::builder()
            .sort(doc! { "created_at": -1, "_id": -1 })
            .limit(limit)
            .build();

        let mut cursor = self.messages().find(filter, find_opts).await?;

        let mut out = Vec::new();
        while let Some(res) = cursor.next().await {
            out.push(res?);
        }
        Ok(out)
    }
}

pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

pub async fn append_message(
    state: &AppState,
    user_id: ObjectId,
    session_id: Option<String>,
    role: ChatRole,
    content: &str,
) -> AppResult<ChatMessage> {
    if content.trim().is_empty() {
        return Err(AppError::BadRequest("content must not be empty.".into()));
    }

    let msg = ChatMessage {
        id: ObjectId::new(),
        role,
        content: content.to_string(),
        user_id: Some(user_id),
        session_id: session_id.filter(|s| !s.trim().is_empty()),
        created_at: Utc::now().timestamp(),
    };

    state.chats.insert(&msg).await?;
    Ok(msg)
}

/// The newest `limit` messages, returned oldest first.
pub async fn list_messages(
    state: &AppState,
    user_id: ObjectId,
    session_id: Option<&str>,
    limit: i64,
) -> AppResult<Vec<ChatMessage>> {
    let mut out = state.chats.newest(user_id, session_id, limit).await?;
    out.reverse();
    Ok(out)
}
