// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,

        // --- Orders ---
        handlers::orders::list_orders,
        handlers::orders::create_order,
        handlers::orders::update_order,
        handlers::orders::delete_order,
        handlers::orders::erase_all_orders,

        // --- Export ---
        handlers::export::export_orders,

        // --- Dashboard ---
        handlers::dashboard::get_metrics,
        handlers::dashboard::get_agent_analytics,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Orders ---
            models::orders::OrderStatus,
            models::orders::Order,
            models::orders::CreateOrderPayload,
            models::orders::UpdateOrderPayload,
            models::orders::OrderPage,
            handlers::orders::EraseResponse,
            services::order_filter::SortField,
            services::order_filter::SortDirection,

            // --- Dashboard ---
            models::metrics::DashboardMetrics,
            models::metrics::AgentStats,
            handlers::dashboard::AnalyticsGroupBy,
        )
    ),
    tags(
        (name = "Auth", description = "Authentication and registration"),
        (name = "Users", description = "Current user profile"),
        (name = "Orders", description = "Orders and quotes management"),
        (name = "Export", description = "CSV export"),
        (name = "Dashboard", description = "Metrics and agent analytics")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
