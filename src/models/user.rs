use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub email: String,

    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default)]
    pub picture: Option<String>,

    #[serde(default = "default_true")]
    pub email_notifications: bool,

    #[serde(default)]
    pub password_hash: String,

    #[serde(default)]
    pub created_at: i64,
}

/// What API clients get to see of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    pub email_notifications: bool,
}

impl From<User> for UserProfile {
    fn from(u: User) -> Self {
        Self {
            id: u.id.to_hex(),
            email: u.email,
            display_name: u.display_name,
            picture: u.picture,
            email_notifications: u.email_notifications,
        }
    }
}
