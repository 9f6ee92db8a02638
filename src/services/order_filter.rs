// src/services/order_filter.rs

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::cmp::Ordering;
use utoipa::ToSchema;

use crate::models::orders::{Order, OrderStatus};

// --- Filtro ---

// Predicados da listagem. Conjuntos vazios significam "sem filtro"
// (casam com tudo), nunca "não casa com nada". Todos os predicados
// ativos combinam com AND.
#[derive(Debug, Default, Clone)]
pub struct OrderFilter {
    pub search: Option<String>,
    pub statuses: Vec<OrderStatus>,
    pub agents: Vec<String>,
    pub from_date: Option<DateTime<Utc>>,
    pub to_date: Option<DateTime<Utc>>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        let matches_search = match self.search.as_deref() {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                order.order_quote_id.to_lowercase().contains(&term)
                    || order.agent_name.to_lowercase().contains(&term)
            }
        };

        let matches_status =
            self.statuses.is_empty() || self.statuses.contains(&order.status);

        let matches_agent =
            self.agents.is_empty() || self.agents.iter().any(|a| a == &order.agent_name);

        matches_search
            && matches_status
            && matches_agent
            && in_date_range(order.date, self.from_date, self.to_date)
    }
}

// Intervalo inclusivo nas duas pontas, comparado contra `date`
// (não `created_at`); ponta ausente fica irrestrita.
pub fn in_date_range(
    date: DateTime<Utc>,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> bool {
    from.is_none_or(|f| date >= f) && to.is_none_or(|t| date <= t)
}

pub fn filter_orders(orders: &[Order], filter: &OrderFilter) -> Vec<Order> {
    orders.iter().filter(|o| filter.matches(o)).cloned().collect()
}

// --- Ordenação ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    OrderQuoteId,
    Date,
    Status,
    AgentName,
    TotalAmount,
    BrokerFee,
    CreatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

// Campos de data comparam como instantes; monetários como Decimal
// (nunca lexicográfico); o resto na ordem natural do campo.
fn compare_by(field: SortField, a: &Order, b: &Order) -> Ordering {
    match field {
        SortField::OrderQuoteId => a.order_quote_id.cmp(&b.order_quote_id),
        SortField::Date => a.date.cmp(&b.date),
        SortField::Status => a.status.cmp(&b.status),
        SortField::AgentName => a.agent_name.cmp(&b.agent_name),
        SortField::TotalAmount => a.total_amount_value().cmp(&b.total_amount_value()),
        SortField::BrokerFee => a.broker_fee_value().cmp(&b.broker_fee_value()),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
    }
}

// Ordenação estável: elementos iguais mantêm a ordem relativa de entrada.
pub fn sort_orders(orders: &mut [Order], field: SortField, direction: SortDirection) {
    orders.sort_by(|a, b| {
        let ordering = compare_by(field, a, b);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

// Estado de ordenação da tabela: clicar no mesmo campo inverte a direção,
// escolher um campo novo volta para ascendente.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self { field: SortField::CreatedAt, direction: SortDirection::Desc }
    }
}

impl SortState {
    pub fn toggle(&mut self, field: SortField) {
        if self.field == field {
            self.direction = match self.direction {
                SortDirection::Asc => SortDirection::Desc,
                SortDirection::Desc => SortDirection::Asc,
            };
        } else {
            self.field = field;
            self.direction = SortDirection::Asc;
        }
    }
}

// --- Paginação ---

// Passo separado e componível: página 1-based, fatia contígua.
// Página fora do intervalo devolve fatia vazia.
pub fn paginate<T>(items: &[T], page: u32, page_size: u32) -> &[T] {
    if page_size == 0 {
        return &[];
    }
    let start = (page.max(1) as usize - 1) * page_size as usize;
    if start >= items.len() {
        return &[];
    }
    let end = (start + page_size as usize).min(items.len());
    &items[start..end]
}

pub fn total_pages(total: usize, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size as usize) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn order(quote_id: &str, agent: &str, status: OrderStatus, day: u32) -> Order {
        let date = Utc.with_ymd_and_hms(2025, 6, day, 12, 0, 0).unwrap();
        Order {
            id: Uuid::new_v4(),
            order_quote_id: quote_id.to_string(),
            date,
            status,
            agent_id: Uuid::new_v4(),
            agent_name: agent.to_string(),
            total_amount: "100.00".to_string(),
            broker_fee: "10.00".to_string(),
            created_at: date,
            updated_at: date,
        }
    }

    #[test]
    fn search_matches_quote_id_or_agent_name_case_insensitively() {
        let orders = vec![
            order("Q-1", "Jane", OrderStatus::Quote, 1),
            order("Q-2", "Bob", OrderStatus::Quote, 2),
        ];
        let filter = OrderFilter { search: Some("jAnE".into()), ..Default::default() };
        let hits = filter_orders(&orders, &filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].order_quote_id, "Q-1");

        let filter = OrderFilter { search: Some("q-2".into()), ..Default::default() };
        assert_eq!(filter_orders(&orders, &filter).len(), 1);
    }

    #[test]
    fn empty_sets_match_everything() {
        let orders = vec![
            order("Q-1", "Jane", OrderStatus::Quote, 1),
            order("Q-2", "Bob", OrderStatus::Canceled, 2),
        ];
        assert_eq!(filter_orders(&orders, &OrderFilter::default()).len(), 2);
    }

    #[test]
    fn predicates_combine_with_and() {
        let orders = vec![
            order("Q-1", "Jane", OrderStatus::Quote, 1),
            order("Q-2", "Jane", OrderStatus::Canceled, 2),
            order("Q-3", "Bob", OrderStatus::Quote, 3),
        ];
        let filter = OrderFilter {
            statuses: vec![OrderStatus::Quote],
            agents: vec!["Jane".into()],
            ..Default::default()
        };
        let hits = filter_orders(&orders, &filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].order_quote_id, "Q-1");
    }

    #[test]
    fn date_range_is_inclusive_on_both_ends() {
        let orders = vec![order("Q-1", "Jane", OrderStatus::Quote, 15)];
        let exact = orders[0].date;
        let filter = OrderFilter {
            from_date: Some(exact),
            to_date: Some(exact),
            ..Default::default()
        };
        assert_eq!(filter_orders(&orders, &filter).len(), 1);
    }

    #[test]
    fn filtering_is_idempotent() {
        let orders = vec![
            order("Q-1", "Jane", OrderStatus::Quote, 1),
            order("Q-2", "Bob", OrderStatus::Canceled, 2),
        ];
        let filter = OrderFilter { statuses: vec![OrderStatus::Quote], ..Default::default() };
        let once = filter_orders(&orders, &filter);
        let twice = filter_orders(&once, &filter);
        assert_eq!(once.len(), twice.len());
        assert_eq!(once[0].id, twice[0].id);
    }

    #[test]
    fn monetary_sort_compares_numerically_not_lexicographically() {
        let mut a = order("Q-1", "Jane", OrderStatus::Quote, 1);
        let mut b = order("Q-2", "Jane", OrderStatus::Quote, 2);
        a.total_amount = "9.00".to_string();
        b.total_amount = "10.00".to_string();
        let mut orders = vec![b, a];
        sort_orders(&mut orders, SortField::TotalAmount, SortDirection::Asc);
        assert_eq!(orders[0].total_amount, "9.00");
        assert_eq!(orders[1].total_amount, "10.00");
    }

    #[test]
    fn sort_is_stable_on_constant_keys() {
        let mut orders = vec![
            order("Q-1", "Jane", OrderStatus::Quote, 1),
            order("Q-2", "Jane", OrderStatus::Quote, 2),
            order("Q-3", "Jane", OrderStatus::Quote, 3),
        ];
        sort_orders(&mut orders, SortField::AgentName, SortDirection::Asc);
        let ids: Vec<&str> = orders.iter().map(|o| o.order_quote_id.as_str()).collect();
        assert_eq!(ids, vec!["Q-1", "Q-2", "Q-3"]);

        sort_orders(&mut orders, SortField::AgentName, SortDirection::Desc);
        let ids: Vec<&str> = orders.iter().map(|o| o.order_quote_id.as_str()).collect();
        assert_eq!(ids, vec!["Q-1", "Q-2", "Q-3"]);
    }

    #[test]
    fn unparsable_money_sorts_as_zero() {
        let mut a = order("Q-1", "Jane", OrderStatus::Quote, 1);
        a.total_amount = "garbage".to_string();
        let b = order("Q-2", "Jane", OrderStatus::Quote, 2);
        let mut orders = vec![b, a];
        sort_orders(&mut orders, SortField::TotalAmount, SortDirection::Asc);
        assert_eq!(orders[0].order_quote_id, "Q-1");
    }

    #[test]
    fn toggling_same_field_flips_direction_new_field_resets_ascending() {
        let mut state = SortState::default();
        assert_eq!(state.field, SortField::CreatedAt);
        assert_eq!(state.direction, SortDirection::Desc);

        state.toggle(SortField::CreatedAt);
        assert_eq!(state.direction, SortDirection::Asc);

        state.toggle(SortField::BrokerFee);
        assert_eq!(state.field, SortField::BrokerFee);
        assert_eq!(state.direction, SortDirection::Asc);

        state.toggle(SortField::BrokerFee);
        assert_eq!(state.direction, SortDirection::Desc);
    }

    #[test]
    fn pagination_slices_one_based_pages() {
        let items: Vec<u32> = (1..=7).collect();
        assert_eq!(paginate(&items, 1, 3), &[1, 2, 3]);
        assert_eq!(paginate(&items, 2, 3), &[4, 5, 6]);
        assert_eq!(paginate(&items, 3, 3), &[7]);
        assert!(paginate(&items, 4, 3).is_empty());
        assert_eq!(total_pages(7, 3), 3);
        assert_eq!(total_pages(0, 3), 0);
    }
}
