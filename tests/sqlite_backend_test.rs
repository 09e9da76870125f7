//! Tests against an in-memory SQLite database. The pool is pinned to a
//! single connection so the migrated schema is visible to every query.
//! These run without any external infrastructure.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::mpsc;
use tower::ServiceExt;
use vereinskasse_api::{
    api_routes,
    auth::{AdminGuard, ADMIN_PASSWORD_HEADER},
    config::AppConfig,
    db::{self, DbConfig, DbPool},
    entities::room,
    events::{process_events, EventSender},
    handlers::AppServices,
    queries::StatisticsFilter,
    services::{
        drinks::{DrinkService, NewDrink},
        inventory::InventoryService,
        statistics::StatisticsService,
        tips::TipService,
        transactions::{NewTransactionItem, TransactionService},
    },
    AppState,
};

const ADMIN_PASSWORD: &str = "test_admin_password";

async fn setup() -> (Arc<DbPool>, EventSender) {
    let config = DbConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        ..Default::default()
    };
    let pool = db::establish_connection_with_config(&config)
        .await
        .expect("db connect");
    db::run_migrations(&pool).await.expect("migrations");

    let (tx, rx) = mpsc::channel(100);
    tokio::spawn(process_events(rx));

    (Arc::new(pool), EventSender::new(tx))
}

async fn seed_room(db: &DbPool) -> i32 {
    room::ActiveModel {
        name: Set("Testraum".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert room")
    .id
}

fn event_filter(event_name: &str) -> StatisticsFilter {
    StatisticsFilter {
        start_date: None,
        end_date: None,
        room_id: None,
        event_name: Some(event_name.to_string()),
    }
}

#[tokio::test]
async fn statistics_on_an_empty_set_yield_zeros_not_errors() {
    let (db, _sender) = setup().await;
    let statistics = StatisticsService::new(db.clone());

    let report = statistics
        .get_statistics(event_filter("no-such-event"))
        .await
        .expect("empty filtered set must not error");

    assert!(report.statistics.is_empty());
    assert!(report.tips_per_room.is_empty());
    assert_eq!(report.summary.total_items, 0);
    assert_eq!(report.summary.total_revenue, Decimal::ZERO);
    assert_eq!(report.summary.storno_revenue, Decimal::ZERO);
    assert_eq!(report.summary.total_tips, Decimal::ZERO);
    assert_eq!(report.summary.tip_count, 0);
}

#[tokio::test]
async fn statistics_decode_when_no_storno_rows_exist() {
    let (db, sender) = setup().await;
    let room_id = seed_room(&db).await;
    let drinks = DrinkService::new(db.clone(), sender.clone());
    let transactions = TransactionService::new(db.clone(), sender);
    let statistics = StatisticsService::new(db.clone());

    let drink = drinks
        .create(NewDrink {
            name: "Pils".to_string(),
            price: dec!(2.50),
            price_reduced: None,
            color: None,
        })
        .await
        .expect("create drink");

    transactions
        .record(
            room_id,
            vec![NewTransactionItem {
                drink_id: drink.id,
                quantity: 3,
                total_price: dec!(7.50),
                is_storno: false,
            }],
            Some("Sommerfest".to_string()),
        )
        .await
        .expect("record");

    let report = statistics
        .get_statistics(event_filter("Sommerfest"))
        .await
        .expect("statistics");

    assert_eq!(report.summary.total_items, 3);
    assert_eq!(report.summary.total_revenue, dec!(7.50));
    assert_eq!(report.summary.storno_items, 0);
    assert_eq!(report.summary.storno_revenue, Decimal::ZERO);
    assert_eq!(report.statistics.len(), 1);
    assert_eq!(report.statistics[0].storno_revenue, Decimal::ZERO);
}

#[tokio::test]
async fn created_drink_is_immediately_adjustable() {
    let (db, sender) = setup().await;
    let drinks = DrinkService::new(db.clone(), sender.clone());
    let inventory = InventoryService::new(db.clone(), sender);

    let drink = drinks
        .create(NewDrink {
            name: "Radler".to_string(),
            price: dec!(3.00),
            price_reduced: None,
            color: None,
        })
        .await
        .expect("create drink");

    let rows = inventory.list().await.expect("list");
    let row = rows
        .iter()
        .find(|r| r.drink_id == drink.id)
        .expect("inventory row provisioned with the drink");
    assert_eq!(row.quantity, 0);

    let new_quantity = inventory
        .adjust(drink.id, 5, None)
        .await
        .expect("adjust the fresh drink");
    assert_eq!(new_quantity, 5);
}

#[tokio::test]
async fn writes_succeed_when_the_event_channel_is_closed() {
    let (db, _sender) = setup().await;
    let room_id = seed_room(&db).await;

    // Receiver dropped on purpose: every send fails from here on.
    let (tx, rx) = mpsc::channel(1);
    drop(rx);
    let dead_sender = EventSender::new(tx);

    let tips = TipService::new(db.clone(), dead_sender.clone());
    let tip = tips
        .add(room_id, dec!(1.00), None)
        .await
        .expect("committed write must not fail on a dead event channel");
    assert_eq!(tip.amount, dec!(1.00));

    let drinks = DrinkService::new(db.clone(), dead_sender);
    drinks
        .create(NewDrink {
            name: "Spezi".to_string(),
            price: dec!(2.00),
            price_reduced: None,
            color: None,
        })
        .await
        .expect("create must not fail on a dead event channel");
}

fn app(db: Arc<DbPool>, sender: EventSender) -> Router {
    let services = AppServices::new(db.clone(), sender.clone());
    let config = AppConfig::new(
        "sqlite::memory:".to_string(),
        ADMIN_PASSWORD.to_string(),
        "127.0.0.1".to_string(),
        0,
        "test".to_string(),
    );
    let state = AppState {
        db,
        config,
        event_sender: sender,
        services,
    };
    Router::new()
        .nest("/api", api_routes(AdminGuard::new(ADMIN_PASSWORD)))
        .with_state(state)
}

#[tokio::test]
async fn adjust_endpoint_accepts_the_documented_body() {
    let (db, sender) = setup().await;
    let drinks = DrinkService::new(db.clone(), sender.clone());
    let drink = drinks
        .create(NewDrink {
            name: "Helles".to_string(),
            price: dec!(2.80),
            price_reduced: None,
            color: None,
        })
        .await
        .expect("create drink");

    let request = Request::builder()
        .method("POST")
        .uri("/api/inventory/adjust")
        .header("content-type", "application/json")
        .header(ADMIN_PASSWORD_HEADER, ADMIN_PASSWORD)
        .body(Body::from(
            json!({"drink_id": drink.id, "adjustment": 7}).to_string(),
        ))
        .unwrap();

    let response = app(db, sender).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["new_quantity"], 7);
}
