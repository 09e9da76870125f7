use crate::{
    db::DbPool,
    entities::{
        drink,
        inventory::{self, Entity as Inventory},
        inventory_history::{self, ChangeType, Entity as InventoryHistory},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::transactions::unwrap_transaction_error,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, DbBackend, EntityTrait,
    FromQueryResult, QueryFilter, QueryOrder, QuerySelect, Select, Set, Statement,
    TransactionTrait,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{instrument, warn};
use utoipa::ToSchema;

/// Stock below this many units counts as "low stock" in the summary.
const LOW_STOCK_THRESHOLD: i32 = 10;

const DEFAULT_COUNT_NOTES: &str = "Manual inventory count";
const DEFAULT_ADJUSTMENT_NOTES: &str = "Manual adjustment";

/// Inventory row joined with its drink's catalog details.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InventoryWithDrink {
    pub id: i32,
    pub drink_id: i32,
    pub quantity: i32,
    pub last_count_date: Option<DateTime<Utc>>,
    pub last_updated: DateTime<Utc>,
    pub drink_name: String,
    pub price: Decimal,
    pub price_reduced: Option<Decimal>,
    pub color: String,
    pub active: bool,
}

/// Audit entry joined with the drink name.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HistoryWithDrink {
    pub id: i32,
    pub drink_id: i32,
    pub change_type: String,
    pub quantity_before: i32,
    pub quantity_after: i32,
    pub quantity_change: i32,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub drink_name: String,
}

#[derive(Debug, Clone, FromQueryResult, Serialize, ToSchema)]
pub struct InventorySummary {
    pub total_drinks: i64,
    pub total_stock: i64,
    pub out_of_stock: i64,
    pub low_stock: i64,
}

/// Stock ledger. Every mutation goes through read-check-write-audit inside
/// one database transaction: the current row is read under a row-level lock,
/// the non-negative invariant is checked against that read, and the new
/// quantity plus exactly one history entry are written before commit.
#[derive(Clone)]
pub struct InventoryService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl InventoryService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// All inventory rows with drink details, in menu order.
    pub async fn list(&self) -> Result<Vec<InventoryWithDrink>, ServiceError> {
        let rows = Inventory::find()
            .find_also_related(drink::Entity)
            .order_by_asc(drink::Column::SortOrder)
            .order_by_asc(drink::Column::Name)
            .all(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?;

        rows.into_iter()
            .map(|(inv, drink)| {
                let drink = drink.ok_or_else(|| {
                    ServiceError::InternalError(format!(
                        "inventory row {} references missing drink {}",
                        inv.id, inv.drink_id
                    ))
                })?;
                Ok(InventoryWithDrink {
                    id: inv.id,
                    drink_id: inv.drink_id,
                    quantity: inv.quantity,
                    last_count_date: inv.last_count_date,
                    last_updated: inv.last_updated,
                    drink_name: drink.name,
                    price: drink.price,
                    price_reduced: drink.price_reduced,
                    color: drink.color,
                    active: drink.active,
                })
            })
            .collect()
    }

    /// Record a full manual recount: set the absolute quantity, stamp the
    /// count date and append a `manual_count` audit entry.
    #[instrument(skip(self, notes))]
    pub async fn set_count(
        &self,
        inventory_id: i32,
        quantity: i32,
        notes: Option<String>,
    ) -> Result<(), ServiceError> {
        if quantity < 0 {
            return Err(ServiceError::InvalidInput(
                "Quantity must not be negative".to_string(),
            ));
        }

        let notes = notes.unwrap_or_else(|| DEFAULT_COUNT_NOTES.to_string());

        let (drink_id, before) = self
            .db_pool
            .transaction::<_, (i32, i32), ServiceError>(move |txn| {
                Box::pin(async move {
                    let current = lock_row(txn, Inventory::find_by_id(inventory_id))
                        .one(txn)
                        .await
                        .map_err(ServiceError::DatabaseError)?
                        .ok_or_else(|| {
                            ServiceError::NotFound("Inventory item not found".to_string())
                        })?;

                    let now = Utc::now();
                    let before = current.quantity;
                    let drink_id = current.drink_id;

                    let mut active: inventory::ActiveModel = current.into();
                    active.quantity = Set(quantity);
                    active.last_count_date = Set(Some(now));
                    active.last_updated = Set(now);
                    active
                        .update(txn)
                        .await
                        .map_err(ServiceError::DatabaseError)?;

                    append_history(
                        txn,
                        drink_id,
                        ChangeType::ManualCount,
                        before,
                        quantity,
                        notes,
                    )
                    .await?;

                    Ok((drink_id, before))
                })
            })
            .await
            .map_err(unwrap_transaction_error)?;

        if let Err(err) = self
            .event_sender
            .send(Event::InventoryCounted {
                drink_id,
                old_quantity: before,
                new_quantity: quantity,
            })
            .await
        {
            warn!(error = %err, drink_id, "failed to publish inventory event");
        }

        Ok(())
    }

    /// Apply a relative stock adjustment (delta may be negative). Rejected
    /// entirely when the result would be negative; no clamping. Returns the
    /// new quantity.
    #[instrument(skip(self, notes))]
    pub async fn adjust(
        &self,
        drink_id: i32,
        delta: i32,
        notes: Option<String>,
    ) -> Result<i32, ServiceError> {
        let notes = notes.unwrap_or_else(|| DEFAULT_ADJUSTMENT_NOTES.to_string());

        let (before, new_quantity) = self
            .db_pool
            .transaction::<_, (i32, i32), ServiceError>(move |txn| {
                Box::pin(async move {
                    let current = lock_row(
                        txn,
                        Inventory::find().filter(inventory::Column::DrinkId.eq(drink_id)),
                    )
                    .one(txn)
                    .await
                    .map_err(ServiceError::DatabaseError)?
                    .ok_or_else(|| {
                        ServiceError::NotFound("Inventory item not found".to_string())
                    })?;

                    let before = current.quantity;
                    let new_quantity = before + delta;
                    if new_quantity < 0 {
                        return Err(ServiceError::InvalidInput(
                            "Adjustment would result in negative inventory".to_string(),
                        ));
                    }

                    let mut active: inventory::ActiveModel = current.into();
                    active.quantity = Set(new_quantity);
                    active.last_updated = Set(Utc::now());
                    active
                        .update(txn)
                        .await
                        .map_err(ServiceError::DatabaseError)?;

                    append_history(
                        txn,
                        drink_id,
                        ChangeType::Adjustment,
                        before,
                        new_quantity,
                        notes,
                    )
                    .await?;

                    Ok((before, new_quantity))
                })
            })
            .await
            .map_err(unwrap_transaction_error)?;

        if let Err(err) = self
            .event_sender
            .send(Event::InventoryAdjusted {
                drink_id,
                old_quantity: before,
                new_quantity,
                change: delta,
            })
            .await
        {
            warn!(error = %err, drink_id, "failed to publish inventory event");
        }

        Ok(new_quantity)
    }

    /// Audit entries for one drink, newest first.
    pub async fn history(
        &self,
        drink_id: i32,
        limit: u64,
    ) -> Result<Vec<HistoryWithDrink>, ServiceError> {
        let rows = InventoryHistory::find()
            .filter(inventory_history::Column::DrinkId.eq(drink_id))
            .find_also_related(drink::Entity)
            .order_by_desc(inventory_history::Column::CreatedAt)
            .limit(limit)
            .all(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?;

        rows.into_iter()
            .map(|(entry, drink)| {
                let drink = drink.ok_or_else(|| {
                    ServiceError::InternalError(format!(
                        "history row {} references missing drink {}",
                        entry.id, entry.drink_id
                    ))
                })?;
                Ok(HistoryWithDrink {
                    id: entry.id,
                    drink_id: entry.drink_id,
                    change_type: entry.change_type,
                    quantity_before: entry.quantity_before,
                    quantity_after: entry.quantity_after,
                    quantity_change: entry.quantity_change,
                    notes: entry.notes,
                    created_at: entry.created_at,
                    drink_name: drink.name,
                })
            })
            .collect()
    }

    /// Stock totals across all drinks.
    pub async fn summary(&self) -> Result<InventorySummary, ServiceError> {
        let db = self.db_pool.as_ref();
        let sql = r#"SELECT
                COUNT(*) AS total_drinks,
                COALESCE(SUM(quantity), 0) AS total_stock,
                COUNT(CASE WHEN quantity = 0 THEN 1 END) AS out_of_stock,
                COUNT(CASE WHEN quantity < $1 THEN 1 END) AS low_stock
            FROM inventory"#;

        let stmt = Statement::from_sql_and_values(
            db.get_database_backend(),
            sql,
            vec![LOW_STOCK_THRESHOLD.into()],
        );

        InventorySummary::find_by_statement(stmt)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::InternalError("inventory summary returned no row".to_string())
            })
    }
}

/// Take a row-level lock on the selected inventory row so concurrent
/// mutations serialize instead of both passing the invariant check against
/// the same stale read. SQLite has no FOR UPDATE; its writes are serialized
/// by the database-level write lock already.
fn lock_row(
    txn: &DatabaseTransaction,
    query: Select<Inventory>,
) -> Select<Inventory> {
    if txn.get_database_backend() == DbBackend::Sqlite {
        query
    } else {
        query.lock_exclusive()
    }
}

async fn append_history(
    txn: &DatabaseTransaction,
    drink_id: i32,
    change_type: ChangeType,
    before: i32,
    after: i32,
    notes: String,
) -> Result<(), ServiceError> {
    let entry = inventory_history::ActiveModel {
        drink_id: Set(drink_id),
        change_type: Set(change_type.as_str().to_string()),
        quantity_before: Set(before),
        quantity_after: Set(after),
        quantity_change: Set(after - before),
        notes: Set(notes),
        ..Default::default()
    };
    entry
        .insert(txn)
        .await
        .map_err(ServiceError::DatabaseError)?;
    Ok(())
}
