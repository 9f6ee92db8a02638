// src/handlers/orders.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    db::order_repo::OrderChanges,
    middleware::auth::{AuthenticatedUser, RequireAdmin},
    models::{
        auth::User,
        orders::{parse_money, CreateOrderPayload, Order, OrderPage, OrderStatus, UpdateOrderPayload},
    },
    services::{
        export,
        order_filter::{
            filter_orders, paginate, sort_orders, total_pages, OrderFilter, SortDirection,
            SortField,
        },
    },
};

const DEFAULT_PAGE_SIZE: u32 = 25;

// Admin enxerga a coleção inteira; agente só os próprios pedidos.
pub(crate) async fn scoped_orders(
    app_state: &AppState,
    user: &User,
) -> Result<Vec<Order>, AppError> {
    if user.is_admin() {
        app_state.order_repo.list_all().await
    } else {
        app_state.order_repo.list_by_agent(user.id).await
    }
}

// Parâmetros da listagem. `statuses` e `agents` chegam como listas
// separadas por vírgula; ausentes ou vazias não filtram nada.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct OrderListQuery {
    pub search: Option<String>,
    #[param(example = "quote,in_process")]
    pub statuses: Option<String>,
    #[param(example = "Jane Doe,Bob Roe")]
    pub agents: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub sort_field: Option<SortField>,
    pub sort_dir: Option<SortDirection>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

fn invalid_param(field: &'static str, message: &'static str) -> AppError {
    let mut errors = validator::ValidationErrors::new();
    let mut error = validator::ValidationError::new("invalid");
    error.message = Some(message.into());
    errors.add(field.into(), error);
    AppError::ValidationError(errors)
}

fn parse_status_csv(raw: &str) -> Result<Vec<OrderStatus>, AppError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            OrderStatus::parse(s).ok_or_else(|| invalid_param("statuses", "Unknown order status"))
        })
        .collect()
}

fn parse_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

// GET /api/orders
#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "Orders",
    params(OrderListQuery),
    responses(
        (status = 200, description = "Filtered, sorted, paginated orders", body = OrderPage),
        (status = 401, description = "Not authenticated")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_orders(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(params): Query<OrderListQuery>,
) -> Result<Json<OrderPage>, AppError> {
    let orders = scoped_orders(&app_state, &user).await?;

    let filter = OrderFilter {
        search: params.search,
        statuses: params.statuses.as_deref().map(parse_status_csv).transpose()?.unwrap_or_default(),
        agents: params.agents.as_deref().map(parse_csv).unwrap_or_default(),
        from_date: params.from,
        to_date: params.to,
    };

    let mut filtered = filter_orders(&orders, &filter);

    let field = params.sort_field.unwrap_or(SortField::CreatedAt);
    let direction = params.sort_dir.unwrap_or(SortDirection::Desc);
    sort_orders(&mut filtered, field, direction);

    let page = params.page.unwrap_or(1).max(1);
    let page_size = params.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
    let total = filtered.len();
    let page_orders = paginate(&filtered, page, page_size).to_vec();

    Ok(Json(OrderPage {
        orders: page_orders,
        total: total as u64,
        page,
        page_size,
        total_pages: total_pages(total, page_size),
    }))
}

// POST /api/orders
#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Orders",
    request_body = CreateOrderPayload,
    responses(
        (status = 201, description = "Order created", body = Order),
        (status = 409, description = "Order/Quote ID already in use")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    // Agente sempre cria para si; admin pode criar em nome de outro agente
    let owner_id = if user.is_admin() {
        payload.agent_id.unwrap_or(user.id)
    } else {
        user.id
    };
    let owner = app_state
        .user_repo
        .find_by_id(owner_id)
        .await?
        .ok_or(AppError::UserNotFound)?;

    let order = app_state
        .order_repo
        .create(
            &payload.order_quote_id,
            payload.date,
            payload.status.unwrap_or(OrderStatus::Quote),
            owner.id,
            // Nome capturado na escrita; não acompanha renomeações futuras
            &owner.name,
            required_money(&payload.total_amount)?,
            required_money(&payload.broker_fee)?,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

// A validação já garantiu o parse; isso aqui é só a conversão segura.
fn required_money(raw: &str) -> Result<Decimal, AppError> {
    parse_money(raw)
        .ok_or_else(|| anyhow::anyhow!("Valor monetário inválido após validação: {raw}").into())
}

fn optional_money(raw: Option<&str>) -> Result<Option<Decimal>, AppError> {
    raw.map(required_money).transpose()
}

// PUT /api/orders/{id}
#[utoipa::path(
    put,
    path = "/api/orders/{id}",
    tag = "Orders",
    request_body = UpdateOrderPayload,
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order updated", body = Order),
        (status = 404, description = "Order not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_order(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderPayload>,
) -> Result<Json<Order>, AppError> {
    payload.validate()?;

    let existing = app_state
        .order_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::OrderNotFound)?;

    // Pedido de outro agente responde 404, sem revelar que existe
    if !user.is_admin() && existing.agent_id != user.id {
        return Err(AppError::OrderNotFound);
    }

    // Reatribuição de dono é exclusiva de admin e recaptura o nome
    let (agent_id, agent_name) = match (user.is_admin(), payload.agent_id) {
        (true, Some(new_owner_id)) => {
            let owner = app_state
                .user_repo
                .find_by_id(new_owner_id)
                .await?
                .ok_or(AppError::UserNotFound)?;
            (Some(owner.id), Some(owner.name))
        }
        _ => (None, None),
    };

    let changes = OrderChanges {
        order_quote_id: payload.order_quote_id,
        date: payload.date,
        status: payload.status,
        agent_id,
        agent_name,
        total_amount: optional_money(payload.total_amount.as_deref())?,
        broker_fee: optional_money(payload.broker_fee.as_deref())?,
    };

    let updated = app_state
        .order_repo
        .update(id, changes)
        .await?
        .ok_or(AppError::OrderNotFound)?;

    Ok(Json(updated))
}

// DELETE /api/orders/{id}
#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    tag = "Orders",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 404, description = "Order not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_order(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let existing = app_state
        .order_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::OrderNotFound)?;

    if !user.is_admin() && existing.agent_id != user.id {
        return Err(AppError::OrderNotFound);
    }

    if !app_state.order_repo.delete(id).await? {
        return Err(AppError::OrderNotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EraseResponse {
    pub deleted: u64,
}

// DELETE /api/orders (erase-all, só admin, exige exportação recente)
#[utoipa::path(
    delete,
    path = "/api/orders",
    tag = "Orders",
    responses(
        (status = 200, description = "All orders erased", body = EraseResponse),
        (status = 403, description = "Admin access required"),
        (status = 409, description = "Recent export required")
    ),
    security(("api_jwt" = []))
)]
pub async fn erase_all_orders(
    State(app_state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<EraseResponse>, AppError> {
    let last_export = *app_state.last_export_at.read().await;
    if !export::can_erase(last_export, Utc::now()) {
        return Err(AppError::ExportRequired);
    }

    let deleted = app_state.order_repo.delete_all().await?;
    tracing::info!("🗑️ Erase-all executado: {} pedidos removidos", deleted);

    Ok(Json(EraseResponse { deleted }))
}
