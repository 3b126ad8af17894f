//! Route definitions for the Retail Inventory Manager

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (register and login are public)
        .nest("/auth", auth_routes(state))
        // Protected routes - inventory records, import and export
        .nest("/inventory", inventory_routes(state))
        // Protected routes - master data
        .nest("/master-data", master_data_routes(state))
        // Protected routes - export templates
        .nest("/export-templates", export_template_routes(state))
}

/// Authentication routes
fn auth_routes(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(handlers::me))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .merge(protected)
}

/// Inventory routes (protected)
fn inventory_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_inventory).post(handlers::create_item))
        .route("/filter-options", get(handlers::get_filter_options))
        .route("/brand-warehouses", get(handlers::get_brand_warehouses))
        .route("/stats/summary", get(handlers::get_stats_summary))
        .route("/variants", post(handlers::create_variants))
        .route("/import", post(handlers::import_inventory))
        .route("/export", post(handlers::export_inventory))
        .route(
            "/:id",
            get(handlers::get_item)
                .put(handlers::update_item)
                .delete(handlers::delete_item),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
}

/// Master data routes (protected)
fn master_data_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_master_data))
        .route(
            "/hierarchy/category",
            post(handlers::add_category).delete(handlers::remove_category),
        )
        .route(
            "/hierarchy/product_name",
            post(handlers::add_product_name).delete(handlers::remove_product_name),
        )
        .route("/:kind", post(handlers::add_value))
        .route(
            "/:kind/:value",
            put(handlers::rename_value).delete(handlers::remove_value),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
}

/// Export template routes (protected)
fn export_template_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_templates).post(handlers::create_template))
        .route("/:id", delete(handlers::delete_template))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
}
