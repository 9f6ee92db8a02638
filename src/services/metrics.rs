// src/services/metrics.rs

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::metrics::DashboardMetrics;
use crate::models::orders::{Order, OrderStatus};

// Agrega a coleção inteira em KPIs do dashboard. Função pura; coleção
// vazia devolve tudo zerado.
//
// Definições do negócio:
//  - bookings = in_process + dispatched + completed;
//  - broker fee total/médio consideram SÓ pedidos dispatched;
//  - a taxa de cancelamento divide cancelados pelos bookings (que não
//    incluem cancelados); assimetria intencional, não é bug.
pub fn compute_metrics(orders: &[Order]) -> DashboardMetrics {
    if orders.is_empty() {
        return DashboardMetrics::default();
    }

    let count_status =
        |status: OrderStatus| orders.iter().filter(|o| o.status == status).count() as u64;

    let total_quotes = count_status(OrderStatus::Quote);
    let in_process = count_status(OrderStatus::InProcess);
    let dispatched = count_status(OrderStatus::Dispatched);
    let canceled = count_status(OrderStatus::Canceled);
    let completed = count_status(OrderStatus::Completed);

    let total_leads = orders.len() as u64;
    let total_bookings = in_process + dispatched + completed;

    let dispatched_fees: Decimal = orders
        .iter()
        .filter(|o| o.status == OrderStatus::Dispatched)
        .map(|o| o.broker_fee_value())
        .sum();

    let avg_fee = if dispatched > 0 {
        dispatched_fees / Decimal::from(dispatched)
    } else {
        Decimal::ZERO
    };

    let conversion_rate = if total_leads > 0 {
        total_bookings as f64 / total_leads as f64 * 100.0
    } else {
        0.0
    };
    let dispatch_rate = if total_bookings > 0 {
        dispatched as f64 / total_bookings as f64 * 100.0
    } else {
        0.0
    };
    let cancellation_rate = if total_bookings > 0 {
        canceled as f64 / total_bookings as f64 * 100.0
    } else {
        0.0
    };

    DashboardMetrics {
        total_quotes,
        in_process,
        dispatched,
        canceled,
        completed,
        total_leads,
        total_bookings,
        conversion_rate,
        total_broker_fee: round_to_whole(dispatched_fees),
        avg_broker_fee: round_to_whole(avg_fee),
        dispatch_rate,
        cancellation_rate,
    }
}

// Arredonda para o inteiro mais próximo, meio termo para longe de zero.
fn round_to_whole(amount: Decimal) -> i64 {
    amount
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn order(status: OrderStatus, fee: &str) -> Order {
        let date = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        Order {
            id: Uuid::new_v4(),
            order_quote_id: Uuid::new_v4().to_string(),
            date,
            status,
            agent_id: Uuid::new_v4(),
            agent_name: "Jane".to_string(),
            total_amount: "0.00".to_string(),
            broker_fee: fee.to_string(),
            created_at: date,
            updated_at: date,
        }
    }

    #[test]
    fn empty_collection_yields_all_zero_metrics() {
        assert_eq!(compute_metrics(&[]), DashboardMetrics::default());
    }

    #[test]
    fn mixed_statuses_compute_the_expected_kpis() {
        // quote/100, dispatched/200, completed/50, canceled/999
        let orders = vec![
            order(OrderStatus::Quote, "100.00"),
            order(OrderStatus::Dispatched, "200.00"),
            order(OrderStatus::Completed, "50.00"),
            order(OrderStatus::Canceled, "999.00"),
        ];
        let metrics = compute_metrics(&orders);

        assert_eq!(metrics.total_leads, 4);
        assert_eq!(metrics.total_bookings, 2);
        assert_eq!(metrics.total_broker_fee, 200);
        assert_eq!(metrics.avg_broker_fee, 200);
        assert_eq!(metrics.conversion_rate, 50.0);
        assert_eq!(metrics.dispatch_rate, 50.0);
        // cancelados ficam fora do denominador de bookings
        assert_eq!(metrics.cancellation_rate, 50.0);
    }

    #[test]
    fn status_counts_partition_the_collection() {
        let orders = vec![
            order(OrderStatus::Quote, "1.00"),
            order(OrderStatus::Quote, "1.00"),
            order(OrderStatus::InProcess, "1.00"),
            order(OrderStatus::Dispatched, "1.00"),
            order(OrderStatus::Canceled, "1.00"),
            order(OrderStatus::Completed, "1.00"),
        ];
        let m = compute_metrics(&orders);
        assert_eq!(
            m.total_quotes + m.in_process + m.dispatched + m.canceled + m.completed,
            m.total_leads
        );
        assert_eq!(m.total_leads, orders.len() as u64);
        assert!(m.conversion_rate >= 0.0 && m.conversion_rate <= 100.0);
    }

    #[test]
    fn broker_fee_only_counts_dispatched_orders() {
        let orders = vec![
            order(OrderStatus::Dispatched, "100.50"),
            order(OrderStatus::Dispatched, "100.00"),
            order(OrderStatus::Completed, "500.00"),
            order(OrderStatus::InProcess, "500.00"),
        ];
        let m = compute_metrics(&orders);
        // 200.50 arredonda para 201 (meio termo para cima)
        assert_eq!(m.total_broker_fee, 201);
        assert_eq!(m.avg_broker_fee, 100);
    }

    #[test]
    fn unparsable_fee_strings_degrade_to_zero() {
        let orders = vec![
            order(OrderStatus::Dispatched, "not-a-number"),
            order(OrderStatus::Dispatched, "100.00"),
        ];
        let m = compute_metrics(&orders);
        assert_eq!(m.total_broker_fee, 100);
        assert_eq!(m.avg_broker_fee, 50);
    }
}
