use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, DatabaseConnection, FromQueryResult, Statement};
use serde::Serialize;
use utoipa::ToSchema;

use crate::errors::ServiceError;

use super::filter::StatisticsFilter;

/// One breakdown group: consumption of one drink in one room at one event.
/// Storno (reversal) rows are summed separately from regular rows.
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize, ToSchema)]
pub struct BreakdownRow {
    pub room_name: String,
    pub drink_name: String,
    pub event_name: String,
    pub total_quantity: i64,
    pub storno_quantity: i64,
    pub total_revenue: Decimal,
    pub storno_revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct SummaryRow {
    pub total_items: i64,
    pub storno_items: i64,
    pub total_revenue: Decimal,
    pub storno_revenue: Decimal,
    pub transaction_count: i64,
}

#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct TipsSummaryRow {
    pub total_tips: Decimal,
    pub tip_count: i64,
}

#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize, ToSchema)]
pub struct TipsPerRoomRow {
    pub room_name: String,
    pub room_id: i32,
    pub event_name: String,
    pub total_tips: Decimal,
}

#[derive(FromQueryResult)]
struct EventRow {
    event_name: String,
}

/// Summary block of the statistics report, tips merged in.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StatisticsSummary {
    pub total_items: i64,
    pub storno_items: i64,
    pub total_revenue: Decimal,
    pub storno_revenue: Decimal,
    pub transaction_count: i64,
    pub total_tips: Decimal,
    pub tip_count: i64,
}

/// Combined statistics report. Empty filtered sets produce zeros and empty
/// lists, never nulls and never an error.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatisticsReport {
    pub statistics: Vec<BreakdownRow>,
    pub summary: StatisticsSummary,
    pub tips_per_room: Vec<TipsPerRoomRow>,
    pub events: Vec<String>,
}

fn stmt(db: &DatabaseConnection, sql: String, params: Vec<sea_orm::Value>) -> Statement {
    Statement::from_sql_and_values(db.get_database_backend(), sql, params)
}

/// Consumption grouped by room, drink and event, ordered by event name, room
/// name, then descending quantity.
pub async fn breakdown(
    db: &DatabaseConnection,
    filter: &StatisticsFilter,
) -> Result<Vec<BreakdownRow>, ServiceError> {
    let predicate = filter.predicate("t");
    // Decimal sums coalesce to 0.0, not 0: SQLite types a bare 0 as INTEGER,
    // which does not decode into a decimal column.
    let sql = format!(
        r#"SELECT
            r.name AS room_name,
            d.name AS drink_name,
            t.event_name,
            COALESCE(SUM(CASE WHEN t.is_storno = FALSE THEN t.quantity ELSE 0 END), 0) AS total_quantity,
            COALESCE(SUM(CASE WHEN t.is_storno = TRUE THEN t.quantity ELSE 0 END), 0) AS storno_quantity,
            COALESCE(SUM(CASE WHEN t.is_storno = FALSE THEN t.total_price ELSE 0.0 END), 0.0) AS total_revenue,
            COALESCE(SUM(CASE WHEN t.is_storno = TRUE THEN t.total_price ELSE 0.0 END), 0.0) AS storno_revenue
        FROM transactions t
        JOIN rooms r ON t.room_id = r.id
        JOIN drinks d ON t.drink_id = d.id
        WHERE {}
        GROUP BY r.name, d.name, t.event_name
        ORDER BY t.event_name, r.name, total_quantity DESC"#,
        predicate.expression
    );

    BreakdownRow::find_by_statement(stmt(db, sql, predicate.params))
        .all(db)
        .await
        .map_err(ServiceError::DatabaseError)
}

/// One-row aggregate across the whole filtered transaction set.
pub async fn summary(
    db: &DatabaseConnection,
    filter: &StatisticsFilter,
) -> Result<SummaryRow, ServiceError> {
    let predicate = filter.predicate("t");
    let sql = format!(
        r#"SELECT
            COALESCE(SUM(CASE WHEN t.is_storno = FALSE THEN t.quantity ELSE 0 END), 0) AS total_items,
            COALESCE(SUM(CASE WHEN t.is_storno = TRUE THEN t.quantity ELSE 0 END), 0) AS storno_items,
            COALESCE(SUM(CASE WHEN t.is_storno = FALSE THEN t.total_price ELSE 0.0 END), 0.0) AS total_revenue,
            COALESCE(SUM(CASE WHEN t.is_storno = TRUE THEN t.total_price ELSE 0.0 END), 0.0) AS storno_revenue,
            COUNT(DISTINCT t.id) AS transaction_count
        FROM transactions t
        WHERE {}"#,
        predicate.expression
    );

    SummaryRow::find_by_statement(stmt(db, sql, predicate.params))
        .one(db)
        .await
        .map_err(ServiceError::DatabaseError)?
        .ok_or_else(|| ServiceError::InternalError("summary query returned no row".to_string()))
}

/// Tip total and count under the filter. The tips table has no drink
/// dimension; the shared filter is simply rendered against the tips alias.
pub async fn tips_summary(
    db: &DatabaseConnection,
    filter: &StatisticsFilter,
) -> Result<TipsSummaryRow, ServiceError> {
    let predicate = filter.predicate("ti");
    let sql = format!(
        r#"SELECT
            COALESCE(SUM(ti.amount), 0.0) AS total_tips,
            COUNT(*) AS tip_count
        FROM tips ti
        WHERE {}"#,
        predicate.expression
    );

    TipsSummaryRow::find_by_statement(stmt(db, sql, predicate.params))
        .one(db)
        .await
        .map_err(ServiceError::DatabaseError)?
        .ok_or_else(|| ServiceError::InternalError("tips query returned no row".to_string()))
}

/// Tip totals grouped by room and event.
pub async fn tips_per_room(
    db: &DatabaseConnection,
    filter: &StatisticsFilter,
) -> Result<Vec<TipsPerRoomRow>, ServiceError> {
    let predicate = filter.predicate("ti");
    let sql = format!(
        r#"SELECT
            r.name AS room_name,
            r.id AS room_id,
            ti.event_name,
            COALESCE(SUM(ti.amount), 0.0) AS total_tips
        FROM tips ti
        JOIN rooms r ON ti.room_id = r.id
        WHERE {}
        GROUP BY r.name, r.id, ti.event_name
        ORDER BY r.name, ti.event_name"#,
        predicate.expression
    );

    TipsPerRoomRow::find_by_statement(stmt(db, sql, predicate.params))
        .all(db)
        .await
        .map_err(ServiceError::DatabaseError)
}

/// Distinct event names seen in transactions, restricted only by the date
/// window so callers can always populate a full event picker.
pub async fn event_names(
    db: &DatabaseConnection,
    filter: &StatisticsFilter,
) -> Result<Vec<String>, ServiceError> {
    let (where_clause, params) = match filter.date_predicate("t") {
        Some(predicate) => (format!("WHERE {}", predicate.expression), predicate.params),
        None => (String::new(), Vec::new()),
    };
    let sql = format!(
        r#"SELECT DISTINCT t.event_name
        FROM transactions t
        {}
        ORDER BY t.event_name"#,
        where_clause
    );

    let rows = EventRow::find_by_statement(stmt(db, sql, params))
        .all(db)
        .await
        .map_err(ServiceError::DatabaseError)?;

    Ok(rows.into_iter().map(|r| r.event_name).collect())
}
