pub mod drinks;
pub mod inventory;
pub mod rooms;
pub mod statistics;
pub mod tips;
pub mod transactions;

/// Default event label for sales and tips recorded outside a named event.
pub const HOUSE_EVENT: &str = "Hausintern";
