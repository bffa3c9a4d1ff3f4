use async_trait::async_trait;
use mongodb::{
    Database,
    bson::{doc, oid::ObjectId},
    options::{FindOneAndUpdateOptions, ReturnDocument},
};

use crate::{error::AppResult, models::User};

/// Persistence seam for user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: ObjectId) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn insert(&self, user: &User) -> AppResult<()>;

    /// Returns the updated record, or `None` if no user has this id.
    async fn set_display_name(&self, id: ObjectId, name: &str) -> AppResult<Option<User>>;

    async fn set_email_notifications(&self, id: ObjectId, enabled: bool) -> AppResult<Option<User>>;
}

#[derive(Clone)]
pub struct MongoUserStore {
    db: Database,
}

impl MongoUserStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn users(&self) -> mongodb::Collection<User> {
        self.db.collection::<User>("users")
    }

    async fn set_field(&self, id: ObjectId, update: mongodb::bson::Document) -> AppResult<Option<User>> {
        let opts = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let updated = self
            .users()
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": update }, opts)
            .await?;

        Ok(updated)
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn find_by_id(&self, id: ObjectId) -> AppResult<Option<User>> {
        Ok(self.users().find_one(doc! { "_id": id }, None).await?)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.users().find_one(doc! { "email": email }, None).await?)
    }

    async fn insert(&self, user: &User) -> AppResult<()> {
        self.users().insert_one(user, None).await?;
        Ok(())
    }

    async fn set_display_name(&self, id: ObjectId, name: &str) -> AppResult<Option<User>> {
        self.set_field(id, doc! { "display_name": name }).await
    }

    async fn set_email_notifications(&self, id: ObjectId, enabled: bool) -> AppResult<Option<User>> {
        self.set_field(id, doc! { "email_notifications": enabled }).await
    }
}
