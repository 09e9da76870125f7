mod common;

use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use vereinskasse_api::{
    entities::transaction,
    errors::ServiceError,
    services::transactions::{NewTransactionItem, TransactionService},
};

fn item(drink_id: i32, quantity: i32) -> NewTransactionItem {
    NewTransactionItem {
        drink_id,
        quantity,
        total_price: dec!(2.50) * rust_decimal::Decimal::from(quantity),
        is_storno: false,
    }
}

#[tokio::test]
#[ignore]
async fn record_inserts_one_row_per_item_sharing_the_event_name() {
    let (db, sender) = common::setup().await;
    let room_id = common::seed_room(&db).await;
    let (drink_a, _) = common::seed_drink_with_stock(&db, 10).await;
    let (drink_b, _) = common::seed_drink_with_stock(&db, 10).await;
    let svc = TransactionService::new(db.clone(), sender);

    let event_name = common::unique_event_name();
    svc.record(
        room_id,
        vec![item(drink_a, 2), item(drink_b, 1), item(drink_a, 3)],
        Some(event_name.clone()),
    )
    .await
    .expect("record");

    let rows = transaction::Entity::find()
        .filter(transaction::Column::EventName.eq(event_name.clone()))
        .all(db.as_ref())
        .await
        .expect("query");
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|row| row.room_id == room_id));
    assert!(rows.iter().all(|row| row.event_name == event_name));
    assert!(rows.iter().all(|row| !row.is_storno));
}

#[tokio::test]
#[ignore]
async fn record_defaults_to_the_house_event_name() {
    let (db, sender) = common::setup().await;
    let room_id = common::seed_room(&db).await;
    let (drink_id, _) = common::seed_drink_with_stock(&db, 10).await;
    let svc = TransactionService::new(db.clone(), sender);

    svc.record(room_id, vec![item(drink_id, 1)], None)
        .await
        .expect("record");

    let rows = transaction::Entity::find()
        .filter(transaction::Column::RoomId.eq(room_id))
        .all(db.as_ref())
        .await
        .expect("query");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].event_name, "Hausintern");
}

#[tokio::test]
#[ignore]
async fn record_rolls_back_fully_when_one_item_fails() {
    let (db, sender) = common::setup().await;
    let room_id = common::seed_room(&db).await;
    let (drink_id, _) = common::seed_drink_with_stock(&db, 10).await;
    let svc = TransactionService::new(db.clone(), sender);

    let event_name = common::unique_event_name();
    // Second item violates the drink FK, so the whole batch must roll back.
    let result = svc
        .record(
            room_id,
            vec![item(drink_id, 1), item(i32::MAX, 1)],
            Some(event_name.clone()),
        )
        .await;
    assert!(result.is_err());

    let rows = transaction::Entity::find()
        .filter(transaction::Column::EventName.eq(event_name))
        .all(db.as_ref())
        .await
        .expect("query");
    assert!(rows.is_empty(), "no partial insert may survive the rollback");
}

#[tokio::test]
#[ignore]
async fn record_rejects_empty_items_and_negative_quantity() {
    let (db, sender) = common::setup().await;
    let room_id = common::seed_room(&db).await;
    let (drink_id, _) = common::seed_drink_with_stock(&db, 10).await;
    let svc = TransactionService::new(db.clone(), sender);

    let err = svc
        .record(room_id, vec![], None)
        .await
        .expect_err("empty items");
    assert!(matches!(err, ServiceError::InvalidInput(_)));

    let err = svc
        .record(room_id, vec![item(drink_id, -1)], None)
        .await
        .expect_err("negative quantity");
    assert!(matches!(err, ServiceError::InvalidInput(_)));
}

#[tokio::test]
#[ignore]
async fn recent_returns_newest_first_with_names() {
    let (db, sender) = common::setup().await;
    let room_id = common::seed_room(&db).await;
    let (drink_id, _) = common::seed_drink_with_stock(&db, 10).await;
    let svc = TransactionService::new(db.clone(), sender);

    let event_name = common::unique_event_name();
    for _ in 0..3 {
        svc.record(room_id, vec![item(drink_id, 1)], Some(event_name.clone()))
            .await
            .expect("record");
    }

    let recent = svc.recent(50).await.expect("recent");
    let ours: Vec<_> = recent
        .iter()
        .filter(|row| row.event_name == event_name)
        .collect();
    assert_eq!(ours.len(), 3);
    assert!(!ours[0].room_name.is_empty());
    assert!(!ours[0].drink_name.is_empty());
    for pair in ours.windows(2) {
        assert!(pair[0].timestamp >= pair[1].timestamp);
    }
}
