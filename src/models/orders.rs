// src/models/orders.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// --- Enums ---

// Ciclo de vida de um pedido/cotação. Qualquer status pode mudar para
// qualquer outro; não há transições restritas.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "order_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Quote,
    InProcess,
    Dispatched,
    Canceled,
    Completed,
}

impl OrderStatus {
    // Valor cru do enum, como vai para o CSV e para o banco
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Quote => "quote",
            OrderStatus::InProcess => "in_process",
            OrderStatus::Dispatched => "dispatched",
            OrderStatus::Canceled => "canceled",
            OrderStatus::Completed => "completed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "quote" => Some(OrderStatus::Quote),
            "in_process" => Some(OrderStatus::InProcess),
            "dispatched" => Some(OrderStatus::Dispatched),
            "canceled" => Some(OrderStatus::Canceled),
            "completed" => Some(OrderStatus::Completed),
            _ => None,
        }
    }
}

// --- Structs ---

// Um pedido/cotação. Os valores monetários trafegam como strings exatas
// de duas casas (NUMERIC no banco, selecionado com cast ::text); só viram
// `Decimal` na hora da aritmética.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,

    #[schema(example = "Q-1042")]
    pub order_quote_id: String,

    // Instante de negócio (quando o lead/cotação ocorreu); distinto de created_at
    pub date: DateTime<Utc>,

    pub status: OrderStatus,

    pub agent_id: Uuid,

    // Cópia desnormalizada do nome do agente, capturada na escrita.
    // Não acompanha renomeações posteriores do usuário.
    #[schema(example = "Jane Doe")]
    pub agent_name: String,

    #[schema(example = "1500.00")]
    pub total_amount: String,

    #[schema(example = "250.00")]
    pub broker_fee: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    // Valores que não parseiam degradam para zero na agregação,
    // sem erro (risco de precisão conhecido).
    pub fn total_amount_value(&self) -> Decimal {
        parse_money(&self.total_amount).unwrap_or(Decimal::ZERO)
    }

    pub fn broker_fee_value(&self) -> Decimal {
        parse_money(&self.broker_fee).unwrap_or(Decimal::ZERO)
    }
}

pub fn parse_money(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw.trim()).ok()
}

// Valida um campo monetário de entrada: numérico, não negativo,
// no máximo duas casas decimais.
pub fn validate_money(value: &str) -> Result<(), ValidationError> {
    let Some(amount) = parse_money(value) else {
        let mut err = ValidationError::new("money");
        err.message = Some("Must be a numeric amount".into());
        return Err(err);
    };
    if amount.is_sign_negative() {
        let mut err = ValidationError::new("money");
        err.message = Some("Must not be negative".into());
        return Err(err);
    }
    if amount.scale() > 2 {
        let mut err = ValidationError::new("money");
        err.message = Some("At most two decimal places allowed".into());
        return Err(err);
    }
    Ok(())
}

// Payload de criação. O status padrão é `quote`; `agent_id` só é
// respeitado para administradores (agentes sempre criam os próprios).
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    #[validate(length(min = 1, message = "Order/Quote ID is required"))]
    #[schema(example = "Q-1042")]
    pub order_quote_id: String,

    pub date: DateTime<Utc>,

    #[serde(default)]
    pub status: Option<OrderStatus>,

    #[serde(default)]
    pub agent_id: Option<Uuid>,

    #[validate(custom(function = "validate_money"))]
    #[schema(example = "1500.00")]
    pub total_amount: String,

    #[validate(custom(function = "validate_money"))]
    #[schema(example = "250.00")]
    pub broker_fee: String,
}

// Payload de edição: qualquer campo exceto id/created_at
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderPayload {
    #[validate(length(min = 1, message = "Order/Quote ID is required"))]
    pub order_quote_id: Option<String>,

    pub date: Option<DateTime<Utc>>,

    pub status: Option<OrderStatus>,

    pub agent_id: Option<Uuid>,

    #[validate(custom(function = "validate_money"))]
    pub total_amount: Option<String>,

    #[validate(custom(function = "validate_money"))]
    pub broker_fee: Option<String>,
}

// Envelope de página devolvido pela listagem
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}
