use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_catalog_tables::Migration),
            Box::new(m20240301_000002_create_transactions_table::Migration),
            Box::new(m20240301_000003_create_tips_table::Migration),
            Box::new(m20240301_000004_create_inventory_tables::Migration),
            Box::new(m20240301_000005_backfill_inventory_rows::Migration),
        ]
    }
}

// Migration implementations

mod m20240301_000001_create_catalog_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000001_create_catalog_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Rooms::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Rooms::Id)
                                .integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Rooms::Name).string().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Drinks::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Drinks::Id)
                                .integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Drinks::Name)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Drinks::Price).decimal().not_null())
                        .col(ColumnDef::new(Drinks::PriceReduced).decimal().null())
                        .col(
                            ColumnDef::new(Drinks::Color)
                                .string()
                                .not_null()
                                .default("#667eea"),
                        )
                        .col(
                            ColumnDef::new(Drinks::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Drinks::SortOrder)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .to_owned(),
                )
                .await?;

            // Reference rooms; the set is static and maintained here.
            let seed = Query::insert()
                .into_table(Rooms::Table)
                .columns([Rooms::Name])
                .values_panic(["Saal".into()])
                .values_panic(["Bar".into()])
                .values_panic(["Keller".into()])
                .to_owned();
            manager.exec_stmt(seed).await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Drinks::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Rooms::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Rooms {
        Table,
        Id,
        Name,
    }

    #[derive(DeriveIden)]
    pub(super) enum Drinks {
        Table,
        Id,
        Name,
        Price,
        PriceReduced,
        Color,
        Active,
        SortOrder,
    }
}

mod m20240301_000002_create_transactions_table {
    use sea_orm_migration::prelude::*;

    use super::m20240301_000001_create_catalog_tables::{Drinks, Rooms};

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000002_create_transactions_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Transactions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Transactions::Id)
                                .integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Transactions::RoomId).integer().not_null())
                        .col(ColumnDef::new(Transactions::DrinkId).integer().not_null())
                        .col(ColumnDef::new(Transactions::Quantity).integer().not_null())
                        .col(
                            ColumnDef::new(Transactions::TotalPrice)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Transactions::EventName)
                                .string()
                                .not_null()
                                .default("Hausintern"),
                        )
                        .col(
                            ColumnDef::new(Transactions::IsStorno)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Transactions::Timestamp)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_transactions_room")
                                .from(Transactions::Table, Transactions::RoomId)
                                .to(Rooms::Table, Rooms::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_transactions_drink")
                                .from(Transactions::Table, Transactions::DrinkId)
                                .to(Drinks::Table, Drinks::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_transactions_timestamp")
                        .table(Transactions::Table)
                        .col(Transactions::Timestamp)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_transactions_event_name")
                        .table(Transactions::Table)
                        .col(Transactions::EventName)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Transactions::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Transactions {
        Table,
        Id,
        RoomId,
        DrinkId,
        Quantity,
        TotalPrice,
        EventName,
        IsStorno,
        Timestamp,
    }
}

mod m20240301_000003_create_tips_table {
    use sea_orm_migration::prelude::*;

    use super::m20240301_000001_create_catalog_tables::Rooms;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000003_create_tips_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Tips::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Tips::Id)
                                .integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Tips::RoomId).integer().not_null())
                        .col(ColumnDef::new(Tips::Amount).decimal().not_null())
                        .col(
                            ColumnDef::new(Tips::EventName)
                                .string()
                                .not_null()
                                .default("Hausintern"),
                        )
                        .col(
                            ColumnDef::new(Tips::Timestamp)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_tips_room")
                                .from(Tips::Table, Tips::RoomId)
                                .to(Rooms::Table, Rooms::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_tips_timestamp")
                        .table(Tips::Table)
                        .col(Tips::Timestamp)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Tips::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Tips {
        Table,
        Id,
        RoomId,
        Amount,
        EventName,
        Timestamp,
    }
}

mod m20240301_000004_create_inventory_tables {
    use sea_orm_migration::prelude::*;

    use super::m20240301_000001_create_catalog_tables::Drinks;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000004_create_inventory_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Inventory::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Inventory::Id)
                                .integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Inventory::DrinkId)
                                .integer()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Inventory::Quantity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Inventory::LastCountDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Inventory::LastUpdated)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_inventory_drink")
                                .from(Inventory::Table, Inventory::DrinkId)
                                .to(Drinks::Table, Drinks::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(InventoryHistory::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryHistory::Id)
                                .integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryHistory::DrinkId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryHistory::ChangeType)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryHistory::QuantityBefore)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryHistory::QuantityAfter)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryHistory::QuantityChange)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InventoryHistory::Notes).string().not_null())
                        .col(
                            ColumnDef::new(InventoryHistory::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_inventory_history_drink")
                                .from(InventoryHistory::Table, InventoryHistory::DrinkId)
                                .to(Drinks::Table, Drinks::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_inventory_history_drink_created")
                        .table(InventoryHistory::Table)
                        .col(InventoryHistory::DrinkId)
                        .col(InventoryHistory::CreatedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InventoryHistory::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Inventory::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Inventory {
        Table,
        Id,
        DrinkId,
        Quantity,
        LastCountDate,
        LastUpdated,
    }

    #[derive(DeriveIden)]
    enum InventoryHistory {
        Table,
        Id,
        DrinkId,
        ChangeType,
        QuantityBefore,
        QuantityAfter,
        QuantityChange,
        Notes,
        CreatedAt,
    }
}

mod m20240301_000005_backfill_inventory_rows {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000005_backfill_inventory_rows"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        // One inventory row per drink. New drinks get theirs at creation
        // time; this covers drinks that predate that behavior.
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .get_connection()
                .execute_unprepared(
                    "INSERT INTO inventory (drink_id, quantity) \
                     SELECT d.id, 0 FROM drinks d \
                     WHERE d.id NOT IN (SELECT i.drink_id FROM inventory i)",
                )
                .await?;
            Ok(())
        }

        async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
            Ok(())
        }
    }
}
