pub mod common;
pub mod drinks;
pub mod inventory;
pub mod rooms;
pub mod statistics;
pub mod tips;
pub mod transactions;

use crate::db::DbPool;
use crate::events::EventSender;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub rooms: Arc<crate::services::rooms::RoomService>,
    pub drinks: Arc<crate::services::drinks::DrinkService>,
    pub tips: Arc<crate::services::tips::TipService>,
    pub transactions: Arc<crate::services::transactions::TransactionService>,
    pub inventory: Arc<crate::services::inventory::InventoryService>,
    pub statistics: Arc<crate::services::statistics::StatisticsService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            rooms: Arc::new(crate::services::rooms::RoomService::new(db_pool.clone())),
            drinks: Arc::new(crate::services::drinks::DrinkService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            tips: Arc::new(crate::services::tips::TipService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            transactions: Arc::new(crate::services::transactions::TransactionService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            inventory: Arc::new(crate::services::inventory::InventoryService::new(
                db_pool.clone(),
                event_sender,
            )),
            statistics: Arc::new(crate::services::statistics::StatisticsService::new(db_pool)),
        }
    }
}
