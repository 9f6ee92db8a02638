// src/handlers/export.rs

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::orders::scoped_orders,
    middleware::auth::AuthenticatedUser,
    services::export::{export_filename, orders_to_csv},
};

// GET /api/orders/export
//
// Gera o CSV da coleção visível ao usuário e registra o timestamp da
// exportação, que arma a janela de 24h do erase-all.
#[utoipa::path(
    get,
    path = "/api/orders/export",
    tag = "Export",
    responses(
        (status = 200, description = "CSV file with the visible orders", body = String, content_type = "text/csv"),
        (status = 401, description = "Not authenticated")
    ),
    security(("api_jwt" = []))
)]
pub async fn export_orders(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Response, AppError> {
    let orders = scoped_orders(&app_state, &user).await?;
    let csv = orders_to_csv(&orders);

    let now = Utc::now();
    *app_state.last_export_at.write().await = Some(now);
    tracing::info!("📤 Exportação CSV: {} pedidos por {}", orders.len(), user.email);

    let filename = export_filename(now.date_naive());
    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];

    Ok((headers, csv).into_response())
}
