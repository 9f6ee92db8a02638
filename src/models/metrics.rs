// src/models/metrics.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

// 1. KPIs do dashboard (os cards do topo)
//
// `total_bookings` = in_process + dispatched + completed (exclui quote e
// canceled). As taxas de despacho e cancelamento usam esse denominador,
// não o total de leads. Os valores de broker fee consideram apenas
// pedidos `dispatched` e saem arredondados para o inteiro mais próximo.
#[derive(Debug, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_quotes: u64,
    pub in_process: u64,
    pub dispatched: u64,
    pub canceled: u64,
    pub completed: u64,
    pub total_leads: u64,
    pub total_bookings: u64,
    pub conversion_rate: f64,
    pub total_broker_fee: i64,
    pub avg_broker_fee: i64,
    pub dispatch_rate: f64,
    pub cancellation_rate: f64,
}

// 2. Desempenho por agente, ranqueado por receita
//
// `agent_id` só vem preenchido no agrupamento estrito por id; o
// agrupamento padrão usa o nome desnormalizado como chave.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgentStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<Uuid>,
    pub agent_name: String,
    pub total_leads: u64,
    pub total_quotes: u64,
    pub in_process_orders: u64,
    pub dispatched_orders: u64,
    pub completed_orders: u64,
    pub canceled_orders: u64,
    pub total_revenue: Decimal,
    pub avg_order_value: Decimal,
    pub conversion_rate: f64,
}
