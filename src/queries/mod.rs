pub mod filter;
pub mod statistics;

pub use filter::{Predicate, StatisticsFilter};
