use chrono::NaiveDate;
use sea_orm::Value;

/// A rendered SQL predicate: a boolean expression with `$n` placeholders and
/// the bound values matching them left-to-right. Values never appear in the
/// expression text.
#[derive(Debug, Clone)]
pub struct Predicate {
    pub expression: String,
    pub params: Vec<Value>,
}

/// Optional filters shared by the statistics queries.
///
/// The predicate is rendered per table alias, so the same filter set can be
/// applied to the transactions alias and the tips alias without re-deriving
/// the parameter list. Parameter order is stable: start_date, end_date,
/// room_id, event_name.
#[derive(Debug, Clone, Default)]
pub struct StatisticsFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub room_id: Option<i32>,
    pub event_name: Option<String>,
}

impl StatisticsFilter {
    pub fn is_empty(&self) -> bool {
        self.start_date.is_none()
            && self.end_date.is_none()
            && self.room_id.is_none()
            && self.event_name.is_none()
    }

    /// Render all present filters as one AND-combined expression targeting
    /// `alias`. With no filters present the expression is trivially true.
    ///
    /// Date filters compare on the date portion of the timestamp column,
    /// inclusive on both ends.
    pub fn predicate(&self, alias: &str) -> Predicate {
        let (conditions, params) = self.conditions(alias, true);
        if conditions.is_empty() {
            return Predicate {
                expression: "1=1".to_string(),
                params: Vec::new(),
            };
        }
        Predicate {
            expression: conditions.join(" AND "),
            params,
        }
    }

    /// Render only the date-range part of the filter, or `None` when no date
    /// bound is present. Used by the event-list query, which ignores the
    /// room/event filters so it always returns the full set of candidate
    /// events for the date window.
    pub fn date_predicate(&self, alias: &str) -> Option<Predicate> {
        let (conditions, params) = self.conditions(alias, false);
        if conditions.is_empty() {
            return None;
        }
        Some(Predicate {
            expression: conditions.join(" AND "),
            params,
        })
    }

    fn conditions(&self, alias: &str, include_room_event: bool) -> (Vec<String>, Vec<Value>) {
        let mut conditions = Vec::new();
        let mut params: Vec<Value> = Vec::new();

        if let Some(start) = self.start_date {
            conditions.push(format!(
                "DATE({alias}.timestamp) >= ${}",
                params.len() + 1
            ));
            params.push(start.into());
        }
        if let Some(end) = self.end_date {
            conditions.push(format!(
                "DATE({alias}.timestamp) <= ${}",
                params.len() + 1
            ));
            params.push(end.into());
        }
        if include_room_event {
            if let Some(room_id) = self.room_id {
                conditions.push(format!("{alias}.room_id = ${}", params.len() + 1));
                params.push(room_id.into());
            }
            if let Some(event_name) = &self.event_name {
                conditions.push(format!("{alias}.event_name = ${}", params.len() + 1));
                params.push(event_name.clone().into());
            }
        }

        (conditions, params)
    }
}
