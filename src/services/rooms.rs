use crate::{
    db::DbPool,
    entities::room::{self, Entity as Room},
    errors::ServiceError,
};
use sea_orm::{EntityTrait, QueryOrder};
use std::sync::Arc;

/// Read access to the static room catalog.
#[derive(Clone)]
pub struct RoomService {
    db_pool: Arc<DbPool>,
}

impl RoomService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    pub async fn list(&self) -> Result<Vec<room::Model>, ServiceError> {
        Room::find()
            .order_by_asc(room::Column::Id)
            .all(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)
    }
}
