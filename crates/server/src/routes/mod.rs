//! HTTP route handlers for the admin API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /api/products          - List products (optional ?status= filter)
//! POST   /api/products          - Create product (multipart: fields + images)
//! GET    /api/products/{id}     - Fetch product
//! PUT    /api/products/{id}     - Update product (multipart)
//! DELETE /api/products/{id}     - Delete product and its image files
//!
//! GET    /api/categories        - List categories (seed-only, read-only)
//!
//! GET    /api/settings          - Fetch settings singleton
//! PUT    /api/settings          - Shallow-merge settings update
//!
//! GET    /api/orders            - List orders, newest first
//! POST   /api/orders            - Create order (arbitrary JSON fields)
//! PUT    /api/orders/{id}       - Shallow-merge order update
//! DELETE /api/orders/{id}       - Delete order
//!
//! GET    /api/stats             - Dashboard counts
//! ```
//!
//! Status mapping: 200/201 success, 400 validation failure, 404 not found,
//! 500 storage/internal error (see [`crate::error::AppError`]).

pub mod categories;
pub mod orders;
pub mod products;
pub mod settings;
pub mod stats;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;

use crate::assets::{MAX_FILES_PER_REQUEST, MAX_FILE_BYTES};
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::remove),
        )
        // Multipart bodies: room for the per-file cap times the file count,
        // plus the text fields.
        .layer(DefaultBodyLimit::max(
            MAX_FILE_BYTES * (MAX_FILES_PER_REQUEST + 1),
        ))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list).post(orders::create))
        .route("/{id}", axum::routing::put(orders::update).delete(orders::remove))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/products", product_routes())
        .route("/api/categories", get(categories::list))
        .route(
            "/api/settings",
            get(settings::show).put(settings::update),
        )
        .nest("/api/orders", order_routes())
        .route("/api/stats", get(stats::show))
}
