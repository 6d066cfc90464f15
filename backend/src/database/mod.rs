//! Module for database connection setup and common utilities.
//!
//! This module is responsible for initializing the MongoDB connection,
//! bootstrapping the unique indexes the identity invariants rely on, and
//! providing a central point for database-related helpers.

pub mod models;
pub mod queries;

use mongodb::bson::doc;
use mongodb::options::IndexOptions;
use mongodb::{Client, Database, IndexModel};

use crate::config::AppConfig;
use models::UserDoc;

pub async fn connect(config: &AppConfig) -> Result<Database, mongodb::error::Error> {
    let client = Client::with_uri_str(&config.mongo_uri).await?;
    let db = client.database(&config.mongo_db);
    ensure_indexes(&db).await?;
    tracing::info!(db = %config.mongo_db, "connected to MongoDB");
    Ok(db)
}

/// Usernames and emails are globally unique; the index enforces it even when
/// two registrations race past the application-level check.
async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    let users = db.collection::<UserDoc>(queries::USERS);
    for field in ["username", "email"] {
        let model = IndexModel::builder()
            .keys(doc! { field: 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        users.create_index(model, None).await?;
    }
    Ok(())
}
