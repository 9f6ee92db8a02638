// src/db/order_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::orders::{Order, OrderStatus},
};

// Os valores NUMERIC saem com cast ::text para preservar a representação
// exata de duas casas no modelo (a aritmética parseia depois).
const ORDER_COLUMNS: &str = r#"
    id, order_quote_id, date, status, agent_id, agent_name,
    total_amount::text AS total_amount, broker_fee::text AS broker_fee,
    created_at, updated_at
"#;

// Campos alterados por uma edição; `None` mantém o valor atual.
#[derive(Debug, Default)]
pub struct OrderChanges {
    pub order_quote_id: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub status: Option<OrderStatus>,
    pub agent_id: Option<Uuid>,
    pub agent_name: Option<String>,
    pub total_amount: Option<Decimal>,
    pub broker_fee: Option<Decimal>,
}

#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Coleção completa (visão de admin), mais recente primeiro
    pub async fn list_all(&self) -> Result<Vec<Order>, AppError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    // Coleção restrita aos pedidos do agente
    pub async fn list_by_agent(&self, agent_id: Uuid) -> Result<Vec<Order>, AppError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE agent_id = $1 ORDER BY created_at DESC"
        ))
        .bind(agent_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, AppError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(order)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        order_quote_id: &str,
        date: DateTime<Utc>,
        status: OrderStatus,
        agent_id: Uuid,
        agent_name: &str,
        total_amount: Decimal,
        broker_fee: Decimal,
    ) -> Result<Order, AppError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            INSERT INTO orders (order_quote_id, date, status, agent_id, agent_name, total_amount, broker_fee)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(order_quote_id)
        .bind(date)
        .bind(status)
        .bind(agent_id)
        .bind(agent_name)
        .bind(total_amount)
        .bind(broker_fee)
        .fetch_one(&self.pool)
        .await
        .map_err(unique_quote_id_to_conflict)?;

        Ok(order)
    }

    // Edição parcial: COALESCE mantém as colunas não informadas e o
    // updated_at é sempre renovado. `id` e `created_at` são imutáveis.
    pub async fn update(&self, id: Uuid, changes: OrderChanges) -> Result<Option<Order>, AppError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            UPDATE orders SET
                order_quote_id = COALESCE($2, order_quote_id),
                date           = COALESCE($3, date),
                status         = COALESCE($4, status),
                agent_id       = COALESCE($5, agent_id),
                agent_name     = COALESCE($6, agent_name),
                total_amount   = COALESCE($7, total_amount),
                broker_fee     = COALESCE($8, broker_fee),
                updated_at     = now()
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.order_quote_id)
        .bind(changes.date)
        .bind(changes.status)
        .bind(changes.agent_id)
        .bind(changes.agent_name)
        .bind(changes.total_amount)
        .bind(changes.broker_fee)
        .fetch_optional(&self.pool)
        .await
        .map_err(unique_quote_id_to_conflict)?;

        Ok(order)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // Erase-all do admin; a checagem de exportação recente acontece antes,
    // no handler
    pub async fn delete_all(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM orders").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

fn unique_quote_id_to_conflict(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::OrderQuoteIdAlreadyExists;
        }
    }
    e.into()
}
