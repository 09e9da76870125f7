use crate::{
    db::DbPool,
    entities::{
        drink::{self, Entity as Drink},
        inventory,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::transactions::unwrap_transaction_error,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr,
    TransactionTrait,
};
use std::sync::Arc;
use tracing::{instrument, warn};

const DEFAULT_COLOR: &str = "#667eea";

#[derive(Debug, Clone)]
pub struct NewDrink {
    pub name: String,
    pub price: Decimal,
    pub price_reduced: Option<Decimal>,
    pub color: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DrinkUpdate {
    pub name: String,
    pub price: Decimal,
    pub price_reduced: Option<Decimal>,
    pub active: bool,
    pub color: String,
    pub sort_order: i32,
}

/// Drink catalog management. Drinks referenced by transactions are only ever
/// deactivated, never deleted.
#[derive(Clone)]
pub struct DrinkService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl DrinkService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Active drinks in menu order.
    pub async fn list_active(&self) -> Result<Vec<drink::Model>, ServiceError> {
        Drink::find()
            .filter(drink::Column::Active.eq(true))
            .order_by_asc(drink::Column::SortOrder)
            .order_by_asc(drink::Column::Name)
            .all(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// All drinks including deactivated ones.
    pub async fn list_all(&self) -> Result<Vec<drink::Model>, ServiceError> {
        Drink::find()
            .order_by_asc(drink::Column::SortOrder)
            .order_by_asc(drink::Column::Name)
            .all(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Create a drink, appending it to the end of the menu order. The
    /// drink's inventory row is provisioned in the same transaction, so
    /// every drink is adjustable from the moment it exists.
    #[instrument(skip(self))]
    pub async fn create(&self, new_drink: NewDrink) -> Result<drink::Model, ServiceError> {
        let created = self
            .db_pool
            .transaction::<_, drink::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let max_sort_order = Drink::find()
                        .order_by_desc(drink::Column::SortOrder)
                        .one(txn)
                        .await
                        .map_err(ServiceError::DatabaseError)?
                        .map(|d| d.sort_order)
                        .unwrap_or(0);

                    let model = drink::ActiveModel {
                        name: Set(new_drink.name),
                        price: Set(new_drink.price),
                        price_reduced: Set(new_drink.price_reduced),
                        color: Set(new_drink
                            .color
                            .unwrap_or_else(|| DEFAULT_COLOR.to_string())),
                        active: Set(true),
                        sort_order: Set(max_sort_order + 1),
                        ..Default::default()
                    };
                    let created = model.insert(txn).await.map_err(map_unique_violation)?;

                    inventory::ActiveModel {
                        drink_id: Set(created.id),
                        quantity: Set(0),
                        last_count_date: Set(None),
                        last_updated: Set(Utc::now()),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await
                    .map_err(ServiceError::DatabaseError)?;

                    Ok(created)
                })
            })
            .await
            .map_err(unwrap_transaction_error)?;

        if let Err(err) = self
            .event_sender
            .send(Event::DrinkCreated {
                drink_id: created.id,
                name: created.name.clone(),
            })
            .await
        {
            warn!(error = %err, drink_id = created.id, "failed to publish drink event");
        }

        Ok(created)
    }

    /// Full field replace of an existing drink.
    #[instrument(skip(self))]
    pub async fn update(&self, id: i32, update: DrinkUpdate) -> Result<drink::Model, ServiceError> {
        let db = self.db_pool.as_ref();

        let existing = Drink::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Drink {} not found", id)))?;

        let mut model: drink::ActiveModel = existing.into();
        model.name = Set(update.name);
        model.price = Set(update.price);
        model.price_reduced = Set(update.price_reduced);
        model.active = Set(update.active);
        model.color = Set(update.color);
        model.sort_order = Set(update.sort_order);

        let updated = model.update(db).await.map_err(map_unique_violation)?;

        if let Err(err) = self
            .event_sender
            .send(Event::DrinkUpdated {
                drink_id: updated.id,
            })
            .await
        {
            warn!(error = %err, drink_id = updated.id, "failed to publish drink event");
        }

        Ok(updated)
    }
}

fn map_unique_violation(err: sea_orm::DbErr) -> ServiceError {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        ServiceError::Conflict("Drink with this name already exists".to_string())
    } else {
        ServiceError::DatabaseError(err)
    }
}
