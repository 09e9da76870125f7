use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Current stock level, one row per drink.
///
/// `quantity` is always the `quantity_after` of the drink's most recent
/// inventory_history entry; the two are only ever written together inside
/// one transaction.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "inventory")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub drink_id: i32,
    pub quantity: i32,
    pub last_count_date: Option<DateTime<Utc>>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::drink::Entity",
        from = "Column::DrinkId",
        to = "super::drink::Column::Id"
    )]
    Drink,
}

impl Related<super::drink::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Drink.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
