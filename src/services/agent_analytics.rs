// src/services/agent_analytics.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::hash::Hash;
use uuid::Uuid;

use crate::models::metrics::AgentStats;
use crate::models::orders::{Order, OrderStatus};
use crate::services::order_filter::in_date_range;

// Agrupamento padrão do dashboard: a chave é o nome desnormalizado do
// agente. Dois agentes que um dia compartilhem o mesmo nome de exibição
// são fundidos. Para a visão estrita por identidade use `by_agent_id`.
pub fn by_agent_name(
    orders: &[Order],
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Vec<AgentStats> {
    ranked(orders, from, to, |o| o.agent_name.clone(), |_| None)
}

// Agrupamento estrito pelo id estável do agente; o nome exibido é o
// primeiro visto na coleção.
pub fn by_agent_id(
    orders: &[Order],
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Vec<AgentStats> {
    ranked(orders, from, to, |o| o.agent_id, |o| Some(o.agent_id))
}

fn ranked<K, KeyFn, IdFn>(
    orders: &[Order],
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
    key_of: KeyFn,
    id_of: IdFn,
) -> Vec<AgentStats>
where
    K: Eq + Hash + Clone,
    KeyFn: Fn(&Order) -> K,
    IdFn: Fn(&Order) -> Option<Uuid>,
{
    let in_range: Vec<&Order> = orders
        .iter()
        .filter(|o| in_date_range(o.date, from, to))
        .collect();

    // Grupos na ordem do primeiro encontro, para um ranking determinístico
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<Vec<&Order>> = Vec::new();
    for order in in_range {
        let key = key_of(order);
        match index.get(&key) {
            Some(&slot) => groups[slot].push(order),
            None => {
                index.insert(key, groups.len());
                groups.push(vec![order]);
            }
        }
    }

    let mut stats: Vec<AgentStats> = groups
        .iter()
        .map(|group| stats_for(id_of(group[0]), &group[0].agent_name, group))
        .collect();

    // Ranking decrescente por receita; empates mantêm a ordem de
    // agrupamento (sort estável).
    stats.sort_by(|a, b| b.total_revenue.cmp(&a.total_revenue));
    stats
}

fn stats_for(agent_id: Option<Uuid>, agent_name: &str, orders: &[&Order]) -> AgentStats {
    let count_status =
        |status: OrderStatus| orders.iter().filter(|o| o.status == status).count() as u64;

    let total_leads = orders.len() as u64;
    let total_quotes = count_status(OrderStatus::Quote);
    let in_process_orders = count_status(OrderStatus::InProcess);
    let dispatched_orders = count_status(OrderStatus::Dispatched);
    let completed_orders = count_status(OrderStatus::Completed);
    let canceled_orders = count_status(OrderStatus::Canceled);

    // Receita exclui pedidos cancelados
    let revenue_count = (total_leads - canceled_orders) as i64;
    let total_revenue: Decimal = orders
        .iter()
        .filter(|o| o.status != OrderStatus::Canceled)
        .map(|o| o.broker_fee_value())
        .sum();
    let avg_order_value = if revenue_count > 0 {
        total_revenue / Decimal::from(revenue_count)
    } else {
        Decimal::ZERO
    };

    let total_bookings = in_process_orders + dispatched_orders + completed_orders;
    let conversion_rate = if total_leads > 0 {
        total_bookings as f64 / total_leads as f64 * 100.0
    } else {
        0.0
    };

    AgentStats {
        agent_id,
        agent_name: agent_name.to_string(),
        total_leads,
        total_quotes,
        in_process_orders,
        dispatched_orders,
        completed_orders,
        canceled_orders,
        total_revenue,
        avg_order_value,
        conversion_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn order(agent_id: Uuid, agent: &str, status: OrderStatus, fee: &str, day: u32) -> Order {
        let date = Utc.with_ymd_and_hms(2025, 6, day, 12, 0, 0).unwrap();
        Order {
            id: Uuid::new_v4(),
            order_quote_id: Uuid::new_v4().to_string(),
            date,
            status,
            agent_id,
            agent_name: agent.to_string(),
            total_amount: "0.00".to_string(),
            broker_fee: fee.to_string(),
            created_at: date,
            updated_at: date,
        }
    }

    #[test]
    fn canceled_orders_are_excluded_from_revenue_and_average() {
        // Duas "Jane": fees 300 (cancelado) e 700
        let id = Uuid::new_v4();
        let orders = vec![
            order(id, "Jane", OrderStatus::Canceled, "300.00", 1),
            order(id, "Jane", OrderStatus::Completed, "700.00", 2),
        ];
        let stats = by_agent_name(&orders, None, None);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].total_revenue, Decimal::from(700));
        assert_eq!(stats[0].avg_order_value, Decimal::from(700));
        assert_eq!(stats[0].total_leads, 2);
        assert_eq!(stats[0].canceled_orders, 1);
    }

    #[test]
    fn agents_are_ranked_by_descending_revenue() {
        let orders = vec![
            order(Uuid::new_v4(), "Low", OrderStatus::Completed, "10.00", 1),
            order(Uuid::new_v4(), "High", OrderStatus::Completed, "900.00", 2),
            order(Uuid::new_v4(), "Mid", OrderStatus::Completed, "500.00", 3),
        ];
        let stats = by_agent_name(&orders, None, None);
        let names: Vec<&str> = stats.iter().map(|s| s.agent_name.as_str()).collect();
        assert_eq!(names, vec!["High", "Mid", "Low"]);
        assert!(stats.windows(2).all(|w| w[0].total_revenue >= w[1].total_revenue));
    }

    #[test]
    fn revenue_ties_keep_first_encounter_order() {
        let orders = vec![
            order(Uuid::new_v4(), "First", OrderStatus::Completed, "100.00", 1),
            order(Uuid::new_v4(), "Second", OrderStatus::Completed, "100.00", 2),
        ];
        let stats = by_agent_name(&orders, None, None);
        assert_eq!(stats[0].agent_name, "First");
        assert_eq!(stats[1].agent_name, "Second");
    }

    #[test]
    fn date_range_filter_is_inclusive() {
        let id = Uuid::new_v4();
        let orders = vec![
            order(id, "Jane", OrderStatus::Completed, "100.00", 1),
            order(id, "Jane", OrderStatus::Completed, "100.00", 15),
            order(id, "Jane", OrderStatus::Completed, "100.00", 30),
        ];
        let from = Some(orders[1].date);
        let to = Some(orders[1].date);
        let stats = by_agent_name(&orders, from, to);
        assert_eq!(stats[0].total_leads, 1);
    }

    #[test]
    fn name_grouping_merges_homonyms_id_grouping_does_not() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let orders = vec![
            order(first, "Jane", OrderStatus::Completed, "100.00", 1),
            order(second, "Jane", OrderStatus::Completed, "200.00", 2),
        ];

        let by_name = by_agent_name(&orders, None, None);
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].total_revenue, Decimal::from(300));
        assert_eq!(by_name[0].agent_id, None);

        let by_id = by_agent_id(&orders, None, None);
        assert_eq!(by_id.len(), 2);
        assert_eq!(by_id[0].agent_id, Some(second));
        assert_eq!(by_id[0].total_revenue, Decimal::from(200));
    }

    #[test]
    fn empty_collection_yields_no_groups() {
        assert!(by_agent_name(&[], None, None).is_empty());
        assert!(by_agent_id(&[], None, None).is_empty());
    }

    #[test]
    fn per_group_conversion_counts_bookings_over_leads() {
        let id = Uuid::new_v4();
        let orders = vec![
            order(id, "Jane", OrderStatus::Quote, "0.00", 1),
            order(id, "Jane", OrderStatus::InProcess, "10.00", 2),
            order(id, "Jane", OrderStatus::Dispatched, "10.00", 3),
            order(id, "Jane", OrderStatus::Completed, "10.00", 4),
        ];
        let stats = by_agent_name(&orders, None, None);
        assert_eq!(stats[0].conversion_rate, 75.0);
    }
}
