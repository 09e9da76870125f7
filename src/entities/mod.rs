pub mod drink;
pub mod inventory;
pub mod inventory_history;
pub mod room;
pub mod tip;
pub mod transaction;
