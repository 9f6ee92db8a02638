// src/handlers/dashboard.rs

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::orders::scoped_orders,
    middleware::auth::AuthenticatedUser,
    models::metrics::{AgentStats, DashboardMetrics},
    services::{
        agent_analytics,
        metrics::compute_metrics,
        order_filter::{filter_orders, OrderFilter},
    },
};

// Intervalo inclusivo opcional sobre a data de negócio do pedido
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DateRangeQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

// GET /api/dashboard/metrics
#[utoipa::path(
    get,
    path = "/api/dashboard/metrics",
    tag = "Dashboard",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "KPIs over the visible collection", body = DashboardMetrics),
        (status = 401, description = "Not authenticated")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_metrics(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<DashboardMetrics>, AppError> {
    let orders = scoped_orders(&app_state, &user).await?;

    let filter = OrderFilter {
        from_date: range.from,
        to_date: range.to,
        ..Default::default()
    };
    let in_range = filter_orders(&orders, &filter);

    Ok(Json(compute_metrics(&in_range)))
}

// Chave de agrupamento do desempenho por agente. `name` usa o nome
// desnormalizado (homônimos se fundem); `id` agrupa pela identidade
// estável.
#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticsGroupBy {
    #[default]
    Name,
    Id,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AgentAnalyticsQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub group_by: Option<AnalyticsGroupBy>,
}

// GET /api/dashboard/agents
#[utoipa::path(
    get,
    path = "/api/dashboard/agents",
    tag = "Dashboard",
    params(AgentAnalyticsQuery),
    responses(
        (status = 200, description = "Per-agent stats ranked by revenue", body = Vec<AgentStats>),
        (status = 401, description = "Not authenticated")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_agent_analytics(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(params): Query<AgentAnalyticsQuery>,
) -> Result<Json<Vec<AgentStats>>, AppError> {
    let orders = scoped_orders(&app_state, &user).await?;

    let stats = match params.group_by.unwrap_or_default() {
        AnalyticsGroupBy::Name => agent_analytics::by_agent_name(&orders, params.from, params.to),
        AnalyticsGroupBy::Id => agent_analytics::by_agent_id(&orders, params.from, params.to),
    };

    Ok(Json(stats))
}
