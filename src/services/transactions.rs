use crate::{
    db::DbPool,
    entities::transaction,
    errors::ServiceError,
    events::{Event, EventSender},
    services::HOUSE_EVENT,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, FromQueryResult, Set, Statement, TransactionError,
    TransactionTrait,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{instrument, warn};
use utoipa::ToSchema;

/// One line item of a sale request. The caller supplies the final price;
/// no pricing happens here.
#[derive(Debug, Clone)]
pub struct NewTransactionItem {
    pub drink_id: i32,
    pub quantity: i32,
    pub total_price: Decimal,
    pub is_storno: bool,
}

/// A recent transaction joined with its room and drink names.
#[derive(Debug, Clone, FromQueryResult, Serialize, ToSchema)]
pub struct RecentTransactionRow {
    pub id: i32,
    pub quantity: i32,
    pub total_price: Decimal,
    pub event_name: String,
    pub is_storno: bool,
    pub timestamp: DateTime<Utc>,
    pub room_name: String,
    pub drink_name: String,
}

/// Durable append of sale line items. All rows of one request are committed
/// together or not at all.
#[derive(Clone)]
pub struct TransactionService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl TransactionService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, items), fields(item_count = items.len()))]
    pub async fn record(
        &self,
        room_id: i32,
        items: Vec<NewTransactionItem>,
        event_name: Option<String>,
    ) -> Result<(), ServiceError> {
        if items.is_empty() {
            return Err(ServiceError::InvalidInput(
                "At least one item is required".to_string(),
            ));
        }
        if items.iter().any(|item| item.quantity < 0) {
            return Err(ServiceError::InvalidInput(
                "Item quantity must not be negative".to_string(),
            ));
        }

        let event_name = event_name.unwrap_or_else(|| HOUSE_EVENT.to_string());
        let item_count = items.len();

        let event_label = event_name.clone();
        self.db_pool
            .transaction::<_, (), ServiceError>(move |txn| {
                Box::pin(async move {
                    for item in items {
                        let model = transaction::ActiveModel {
                            room_id: Set(room_id),
                            drink_id: Set(item.drink_id),
                            quantity: Set(item.quantity),
                            total_price: Set(item.total_price),
                            event_name: Set(event_label.clone()),
                            is_storno: Set(item.is_storno),
                            ..Default::default()
                        };
                        model
                            .insert(txn)
                            .await
                            .map_err(ServiceError::DatabaseError)?;
                    }
                    Ok(())
                })
            })
            .await
            .map_err(unwrap_transaction_error)?;

        // The write is committed; a dead event channel is a logging problem,
        // not a request failure.
        if let Err(err) = self
            .event_sender
            .send(Event::TransactionRecorded {
                room_id,
                item_count,
                event_name,
            })
            .await
        {
            warn!(error = %err, room_id, "failed to publish transaction event");
        }

        Ok(())
    }

    /// Most recent transactions with room and drink names, newest first.
    /// Used by the storno UI to pick a sale to reverse.
    pub async fn recent(&self, limit: u64) -> Result<Vec<RecentTransactionRow>, ServiceError> {
        let db = self.db_pool.as_ref();
        // Clamped so an oversized caller limit cannot wrap into a negative
        // LIMIT when bound as i64.
        let limit = limit.min(i64::MAX as u64) as i64;
        let sql = r#"SELECT
                t.id,
                t.quantity,
                t.total_price,
                t.event_name,
                t.is_storno,
                t.timestamp,
                r.name AS room_name,
                d.name AS drink_name
            FROM transactions t
            JOIN rooms r ON t.room_id = r.id
            JOIN drinks d ON t.drink_id = d.id
            ORDER BY t.timestamp DESC
            LIMIT $1"#;

        let stmt =
            Statement::from_sql_and_values(db.get_database_backend(), sql, vec![limit.into()]);

        RecentTransactionRow::find_by_statement(stmt)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }
}

pub(crate) fn unwrap_transaction_error(err: TransactionError<ServiceError>) -> ServiceError {
    match err {
        TransactionError::Connection(db_err) => ServiceError::DatabaseError(db_err),
        TransactionError::Transaction(service_err) => service_err,
    }
}
