//! Shared setup for DB-backed integration tests.
//!
//! These tests are ignored by default and expect `DATABASE_URL` to point at
//! a disposable Postgres database. Run with:
//!
//! ```text
//! DATABASE_URL=postgres://localhost/vereinskasse_test cargo test -- --ignored
//! ```

use sea_orm::{ActiveModelTrait, Set};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;
use vereinskasse_api::{
    db::{self, DbPool},
    entities::{drink, inventory, room},
    events::{process_events, EventSender},
};

pub async fn setup() -> (Arc<DbPool>, EventSender) {
    let url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite::memory:".to_string());
    let pool = db::establish_connection(&url).await.expect("db connect");
    db::run_migrations(&pool).await.expect("migrations");

    let (tx, rx) = mpsc::channel(100);
    tokio::spawn(process_events(rx));

    (Arc::new(pool), EventSender::new(tx))
}

/// Insert a drink with a unique name plus an inventory row holding
/// `quantity` units. Returns (drink_id, inventory_id).
pub async fn seed_drink_with_stock(db: &DbPool, quantity: i32) -> (i32, i32) {
    let drink = drink::ActiveModel {
        name: Set(format!("Testbier {}", Uuid::new_v4())),
        price: Set(rust_decimal_macros::dec!(2.50)),
        price_reduced: Set(None),
        color: Set("#667eea".to_string()),
        sort_order: Set(0),
        active: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert drink");

    let inventory = inventory::ActiveModel {
        drink_id: Set(drink.id),
        quantity: Set(quantity),
        last_count_date: Set(None),
        last_updated: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert inventory");

    (drink.id, inventory.id)
}

/// Insert a room and return its id. The migrations seed three rooms, but
/// tests create their own so they stay independent of seed data.
pub async fn seed_room(db: &DbPool) -> i32 {
    let room = room::ActiveModel {
        name: Set(format!("Testraum {}", Uuid::new_v4())),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert room");
    room.id
}

/// Unique event name so parallel test runs in a shared database never
/// see each other's rows.
pub fn unique_event_name() -> String {
    format!("test-event-{}", Uuid::new_v4())
}
