mod common;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use vereinskasse_api::{
    queries::StatisticsFilter,
    services::{
        statistics::StatisticsService,
        tips::TipService,
        transactions::{NewTransactionItem, TransactionService},
    },
};

fn item(drink_id: i32, quantity: i32, price: Decimal, is_storno: bool) -> NewTransactionItem {
    NewTransactionItem {
        drink_id,
        quantity,
        total_price: price,
        is_storno,
    }
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
#[ignore]
async fn summary_totals_reconcile_with_the_breakdown() {
    let (db, sender) = common::setup().await;
    let room_id = common::seed_room(&db).await;
    let (drink_a, _) = common::seed_drink_with_stock(&db, 10).await;
    let (drink_b, _) = common::seed_drink_with_stock(&db, 10).await;
    let transactions = TransactionService::new(db.clone(), sender);
    let statistics = StatisticsService::new(db.clone());

    let event_name = common::unique_event_name();
    transactions
        .record(
            room_id,
            vec![
                item(drink_a, 3, dec!(7.50), false),
                item(drink_b, 2, dec!(6.00), false),
                item(drink_a, 1, dec!(2.50), true),
            ],
            Some(event_name.clone()),
        )
        .await
        .expect("record");

    let report = statistics
        .get_statistics(event_filter(&event_name))
        .await
        .expect("statistics");

    let breakdown_quantity: i64 = report
        .statistics
        .iter()
        .map(|row| row.total_quantity)
        .sum();
    let breakdown_revenue: Decimal = report.statistics.iter().map(|row| row.total_revenue).sum();
    let breakdown_storno_quantity: i64 = report
        .statistics
        .iter()
        .map(|row| row.storno_quantity)
        .sum();

    assert_eq!(report.summary.total_items, breakdown_quantity);
    assert_eq!(report.summary.total_revenue, breakdown_revenue);
    assert_eq!(report.summary.storno_items, breakdown_storno_quantity);
    assert_eq!(report.summary.total_items, 5);
    assert_eq!(report.summary.storno_items, 1);
    assert_eq!(report.summary.total_revenue, dec!(13.50));
    assert_eq!(report.summary.storno_revenue, dec!(2.50));
    assert_eq!(report.summary.transaction_count, 3);
    assert!(report.events.contains(&event_name));
}

#[tokio::test]
#[ignore]
async fn tips_default_to_zero_when_nothing_matches() {
    let (db, _sender) = common::setup().await;
    let statistics = StatisticsService::new(db.clone());

    let report = statistics
        .get_statistics(event_filter(&common::unique_event_name()))
        .await
        .expect("statistics");

    assert!(report.statistics.is_empty());
    assert!(report.tips_per_room.is_empty());
    assert_eq!(report.summary.total_items, 0);
    assert_eq!(report.summary.total_revenue, Decimal::ZERO);
    assert_eq!(report.summary.total_tips, Decimal::ZERO);
    assert_eq!(report.summary.tip_count, 0);
}

#[tokio::test]
#[ignore]
async fn tips_are_merged_into_the_summary_and_grouped_per_room() {
    let (db, sender) = common::setup().await;
    let room_id = common::seed_room(&db).await;
    let tips = TipService::new(db.clone(), sender);
    let statistics = StatisticsService::new(db.clone());

    let event_name = common::unique_event_name();
    tips.add(room_id, dec!(1.50), Some(event_name.clone()))
        .await
        .expect("tip");
    tips.add(room_id, dec!(2.00), Some(event_name.clone()))
        .await
        .expect("tip");

    let report = statistics
        .get_statistics(event_filter(&event_name))
        .await
        .expect("statistics");

    assert_eq!(report.summary.total_tips, dec!(3.50));
    assert_eq!(report.summary.tip_count, 2);
    assert_eq!(report.tips_per_room.len(), 1);
    assert_eq!(report.tips_per_room[0].room_id, room_id);
    assert_eq!(report.tips_per_room[0].total_tips, dec!(3.50));
}

#[tokio::test]
#[ignore]
async fn room_filter_excludes_other_rooms() {
    let (db, sender) = common::setup().await;
    let room_a = common::seed_room(&db).await;
    let room_b = common::seed_room(&db).await;
    let (drink_id, _) = common::seed_drink_with_stock(&db, 10).await;
    let transactions = TransactionService::new(db.clone(), sender);
    let statistics = StatisticsService::new(db.clone());

    let event_name = common::unique_event_name();
    transactions
        .record(
            room_a,
            vec![item(drink_id, 2, dec!(5.00), false)],
            Some(event_name.clone()),
        )
        .await
        .expect("record a");
    transactions
        .record(
            room_b,
            vec![item(drink_id, 4, dec!(10.00), false)],
            Some(event_name.clone()),
        )
        .await
        .expect("record b");

    let mut filter = event_filter(&event_name);
    filter.room_id = Some(room_a);
    let report = statistics.get_statistics(filter).await.expect("statistics");

    assert_eq!(report.summary.total_items, 2);
    assert_eq!(report.summary.total_revenue, dec!(5.00));
}
