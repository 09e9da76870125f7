use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vereinskasse API",
        version = "0.4.0",
        description = r#"
Point-of-sale backend for club events: drink and room catalog, sale and
storno recording, tips, statistics, and a stock ledger with audit history.

Admin-gated endpoints expect the shared admin password in the
`x-admin-password` header and answer 401 otherwise.
        "#
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development")
    ),
    tags(
        (name = "rooms", description = "Room catalog"),
        (name = "drinks", description = "Drink catalog"),
        (name = "transactions", description = "Sale and storno recording"),
        (name = "tips", description = "Tip recording"),
        (name = "statistics", description = "Aggregated reporting"),
        (name = "inventory", description = "Stock ledger and audit history"),
        (name = "auth", description = "Admin password validation")
    ),
    paths(
        crate::handlers::rooms::list_rooms,
        crate::handlers::drinks::list_active_drinks,
        crate::handlers::drinks::list_all_drinks,
        crate::handlers::drinks::create_drink,
        crate::handlers::drinks::update_drink,
        crate::handlers::transactions::create_transaction,
        crate::handlers::transactions::list_recent_transactions,
        crate::handlers::tips::create_tip,
        crate::handlers::statistics::get_statistics,
        crate::handlers::inventory::list_inventory,
        crate::handlers::inventory::inventory_summary,
        crate::handlers::inventory::inventory_history,
        crate::handlers::inventory::set_count,
        crate::handlers::inventory::adjust_inventory,
        crate::auth::validate_password,
    ),
    components(
        schemas(
            crate::entities::room::Model,
            crate::entities::drink::Model,
            crate::handlers::drinks::CreateDrinkRequest,
            crate::handlers::drinks::UpdateDrinkRequest,
            crate::handlers::transactions::CreateTransactionRequest,
            crate::handlers::transactions::TransactionItemPayload,
            crate::handlers::tips::CreateTipRequest,
            crate::handlers::inventory::SetCountRequest,
            crate::handlers::inventory::AdjustInventoryRequest,
            crate::auth::ValidatePasswordRequest,
            crate::auth::ValidatePasswordResponse,
            crate::services::transactions::RecentTransactionRow,
            crate::services::inventory::InventoryWithDrink,
            crate::services::inventory::HistoryWithDrink,
            crate::services::inventory::InventorySummary,
            crate::queries::statistics::StatisticsReport,
            crate::queries::statistics::StatisticsSummary,
            crate::queries::statistics::BreakdownRow,
            crate::queries::statistics::TipsPerRoomRow,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_generation_includes_core_paths() {
        let openapi = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("Vereinskasse API"));
        assert!(json.contains("/api/transactions"));
        assert!(json.contains("/api/inventory/adjust"));
    }
}
