//! HTTP handlers for sales-service.

pub mod clients;
pub mod companies;
pub mod deliveries;
pub mod invoices;
pub mod orders;
pub mod quotes;
pub mod sites;

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::AppState;

/// Assemble the API surface onto one router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Companies
        .route("/companies", post(companies::create_company))
        .route("/companies", get(companies::list_companies))
        .route("/companies/:company_id", get(companies::get_company))
        .route("/companies/:company_id", put(companies::update_company))
        .route("/companies/:company_id", delete(companies::delete_company))
        .route("/companies/:company_id/logo", put(companies::upload_logo))
        // Sites
        .route("/sites", post(sites::create_site))
        .route("/sites", get(sites::list_sites))
        .route("/sites/:site_id", get(sites::get_site))
        .route("/sites/:site_id", put(sites::update_site))
        .route("/sites/:site_id", delete(sites::delete_site))
        .route("/sites/:site_id/footer", get(sites::get_invoice_footer))
        .route("/sites/:site_id/targets", post(sites::create_monthly_target))
        .route("/sites/:site_id/targets", get(sites::list_monthly_targets))
        // Clients
        .route("/clients", post(clients::create_client))
        .route("/clients", get(clients::list_clients))
        .route("/clients/:client_id", get(clients::get_client))
        .route("/clients/:client_id", put(clients::update_client))
        .route("/clients/:client_id", delete(clients::delete_client))
        .route("/clients/:client_id/badge", get(clients::get_badge))
        // Quotes
        .route("/quotes", post(quotes::create_quote))
        .route("/quotes", get(quotes::list_quotes))
        .route("/quotes/:quote_id", get(quotes::get_quote))
        .route("/quotes/:quote_id", put(quotes::update_quote))
        .route("/quotes/:quote_id/lines", post(quotes::add_line))
        .route("/quotes/:quote_id/lines", get(quotes::list_lines))
        .route("/quotes/:quote_id/lines/:line_id", put(quotes::update_line))
        .route(
            "/quotes/:quote_id/lines/:line_id",
            delete(quotes::remove_line),
        )
        // Purchase orders
        .route("/orders", post(orders::create_order))
        .route("/orders", get(orders::list_orders))
        .route("/orders/:order_id", get(orders::get_order))
        .route("/orders/:order_id", put(orders::update_order))
        .route("/orders/:order_id/lines", post(orders::add_line))
        .route("/orders/:order_id/lines", get(orders::list_lines))
        .route("/orders/:order_id/lines/:line_id", put(orders::update_line))
        .route(
            "/orders/:order_id/lines/:line_id",
            delete(orders::remove_line),
        )
        // Delivery notes
        .route("/deliveries", post(deliveries::create_delivery_note))
        .route("/deliveries", get(deliveries::list_delivery_notes))
        .route("/deliveries/:note_id", get(deliveries::get_delivery_note))
        .route("/deliveries/:note_id", put(deliveries::update_delivery_note))
        .route("/deliveries/:note_id/lines", post(deliveries::add_line))
        .route("/deliveries/:note_id/lines", get(deliveries::list_lines))
        .route(
            "/deliveries/:note_id/lines/:line_id",
            put(deliveries::update_line),
        )
        .route(
            "/deliveries/:note_id/lines/:line_id",
            delete(deliveries::remove_line),
        )
        // Invoices
        .route("/invoices", post(invoices::create_invoice))
        .route("/invoices", get(invoices::list_invoices))
        .route("/invoices/:invoice_id", get(invoices::get_invoice))
        .route("/invoices/:invoice_id", put(invoices::update_invoice))
}
