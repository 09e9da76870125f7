use crate::{
    db::DbPool,
    entities::tip,
    errors::ServiceError,
    events::{Event, EventSender},
    services::HOUSE_EVENT,
};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set};
use std::sync::Arc;
use tracing::{instrument, warn};

/// Tip recording. Rows are immutable; timestamps are server-assigned.
#[derive(Clone)]
pub struct TipService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl TipService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self))]
    pub async fn add(
        &self,
        room_id: i32,
        amount: Decimal,
        event_name: Option<String>,
    ) -> Result<tip::Model, ServiceError> {
        if amount < Decimal::ZERO {
            return Err(ServiceError::InvalidInput(
                "Tip amount must not be negative".to_string(),
            ));
        }

        let event_name = event_name.unwrap_or_else(|| HOUSE_EVENT.to_string());

        let model = tip::ActiveModel {
            room_id: Set(room_id),
            amount: Set(amount),
            event_name: Set(event_name),
            ..Default::default()
        };

        let created = model
            .insert(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)?;

        if let Err(err) = self
            .event_sender
            .send(Event::TipRecorded {
                room_id: created.room_id,
                amount: created.amount,
                event_name: created.event_name.clone(),
            })
            .await
        {
            warn!(error = %err, room_id, "failed to publish tip event");
        }

        Ok(created)
    }
}
