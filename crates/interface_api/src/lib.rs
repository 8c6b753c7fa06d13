//! HTTP API Layer
//!
//! This crate provides the REST API for the school billing ledger using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: CRUD for schools, students, invoices and payments, plus
//!   the student and school statements
//! - **Middleware**: request ids, request logging, Prometheus metrics, tracing, CORS
//! - **Auth**: JWT login for the configured admin; writes require the admin role
//! - **DTOs**: Validated request bodies
//! - **Error Handling**: Consistent `{"error", "message"}` responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let service = BillingService::from_store(Arc::new(PostgresBillingAdapter::new(pool)));
//! let app = create_router(service, config, HttpMetrics::new()?);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod auth;
pub mod metrics;

use std::sync::Arc;

use axum::{
    http::HeaderName,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use domain_billing::BillingService;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{
    auth as login, health, invoices, metrics as scrape, payments, schools, statements, students,
};
use crate::metrics::HttpMetrics;
use crate::middleware::{request_log_middleware, REQUEST_ID_HEADER};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: BillingService,
    pub config: Arc<ApiConfig>,
    pub metrics: HttpMetrics,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `service` - Billing use cases over the chosen store
/// * `config` - API configuration
/// * `metrics` - Registry behind `/metrics`, fed by the request middleware
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(service: BillingService, config: ApiConfig, metrics: HttpMetrics) -> Router {
    let state = AppState {
        service,
        config: Arc::new(config),
        metrics: metrics.clone(),
    };

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/db", get(health::database_check))
        .route("/metrics", get(scrape::metrics));

    let school_routes = Router::new()
        .route("/", post(schools::create_school).get(schools::list_schools))
        .route(
            "/:id",
            get(schools::get_school)
                .patch(schools::update_school)
                .delete(schools::delete_school),
        )
        .route("/:id/students", get(schools::list_school_students))
        .route("/:id/statement", get(statements::school_statement));

    let student_routes = Router::new()
        .route("/", post(students::create_student).get(students::list_students))
        .route(
            "/:id",
            get(students::get_student)
                .patch(students::update_student)
                .delete(students::delete_student),
        )
        .route("/:id/statement", get(statements::student_statement));

    let invoice_routes = Router::new()
        .route("/", post(invoices::create_invoice).get(invoices::list_invoices))
        .route(
            "/:id",
            get(invoices::get_invoice)
                .patch(invoices::update_invoice)
                .delete(invoices::delete_invoice),
        )
        .route("/:id/payments", get(invoices::list_invoice_payments));

    let payment_routes = Router::new()
        .route("/", post(payments::create_payment).get(payments::list_payments))
        .route(
            "/:id",
            get(payments::get_payment)
                .patch(payments::update_payment)
                .delete(payments::delete_payment),
        );

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .merge(health_routes)
        .route("/auth/login", post(login::login))
        .nest("/schools", school_routes)
        .nest("/students", student_routes)
        .nest("/invoices", invoice_routes)
        .nest("/payments", payment_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(axum_middleware::from_fn_with_state(metrics, request_log_middleware))
                .layer(PropagateRequestIdLayer::new(request_id)),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
