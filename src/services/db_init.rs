use mongodb::{
    Database, IndexModel,
    bson::{Document, doc},
    options::IndexOptions,
};

use crate::services::{alerts_service, benchmark_service, chat_service};

fn index_model(keys: Document, unique: bool) -> IndexModel {
    let opts = unique.then(|| IndexOptions::builder().unique(true).build());
    IndexModel::builder().keys(keys).options(opts).build()
}

async fn create_index(db: &Database, collection: &str, keys: Document, unique: bool) -> mongodb::error::Result<()> {
    db.collection::<Document>(collection)
        .create_index(index_model(keys, unique), None)
        .await?;
    Ok(())
}

pub async fn ensure_indexes(db: &Database) -> mongodb::error::Result<()> {
    // users: unique email
    create_index(db, "users", doc! { "email": 1 }, true).await?;

    // benchmarks: one row per user
    create_index(db, benchmark_service::COLLECTION, doc! { "user_id": 1 }, true).await?;

    // alerts: listing per user, and the monitor's scan of active alerts
    create_index(db, alerts_service::COLLECTION, doc! { "user_id": 1, "created_at": -1 }, false).await?;
    create_index(db, alerts_service::COLLECTION, doc! { "is_active": 1, "coin_id": 1 }, false).await?;

    // chat: per user/session history in time order
    create_index(
        db,
        chat_service::COLLECTION,
        doc! { "user_id": 1, "session_id": 1, "created_at": -1, "_id": -1 },
        false,
    )
    .await?;

    Ok(())
}
