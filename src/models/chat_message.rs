use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    System,
}

/// One row of `chat_messages`. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub role: ChatRole,
    pub content: String,

    #[serde(default)]
    pub user_id: Option<ObjectId>,
    #[serde(default)]
    pub session_id: Option<String>,

    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageView {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    pub session_id: Option<String>,
    pub created_at: i64,
}

impl From<ChatMessage> for ChatMessageView {
    fn from(m: ChatMessage) -> Self {
        Self {
            id: m.id.to_hex(),
            role: m.role,
            content: m.content,
            session_id: m.session_id,
            created_at: m.created_at,
        }
    }
}
