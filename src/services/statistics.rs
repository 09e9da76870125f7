use crate::{
    db::DbPool,
    errors::ServiceError,
    queries::{statistics, StatisticsFilter},
};
use std::sync::Arc;
use tracing::instrument;

pub use crate::queries::statistics::{StatisticsReport, StatisticsSummary};

/// Read-only reporting over transactions and tips. The component queries run
/// as independent reads; consistency between them only needs to be "as of
/// approximately the same instant".
#[derive(Clone)]
pub struct StatisticsService {
    db_pool: Arc<DbPool>,
}

impl StatisticsService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn get_statistics(
        &self,
        filter: StatisticsFilter,
    ) -> Result<StatisticsReport, ServiceError> {
        let db = self.db_pool.as_ref();

        let (breakdown, summary, tips, tips_per_room, events) = tokio::try_join!(
            statistics::breakdown(db, &filter),
            statistics::summary(db, &filter),
            statistics::tips_summary(db, &filter),
            statistics::tips_per_room(db, &filter),
            statistics::event_names(db, &filter),
        )?;

        Ok(StatisticsReport {
            statistics: breakdown,
            summary: StatisticsSummary {
                total_items: summary.total_items,
                storno_items: summary.storno_items,
                total_revenue: summary.total_revenue,
                storno_revenue: summary.storno_revenue,
                transaction_count: summary.transaction_count,
                total_tips: tips.total_tips,
                tip_count: tips.tip_count,
            },
            tips_per_room,
            events,
        })
    }
}
