// src/services/export.rs

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::models::orders::Order;
use crate::services::timezone;

const CSV_HEADER: &str =
    "Order/Quote ID,Date (Central Time),Status,Agent Name,Total Amount,Broker Fee,Created At";

// Serializa a coleção em CSV: cabeçalho + uma linha por pedido, na ordem
// de entrada (quem quiser ordem específica ordena antes). Datas saem no
// fuso do negócio; status como valor cru do enum; valores monetários como
// as strings armazenadas, sem arredondar.
pub fn orders_to_csv(orders: &[Order]) -> String {
    let mut lines = Vec::with_capacity(orders.len() + 1);
    lines.push(CSV_HEADER.to_string());

    for order in orders {
        let row = [
            csv_field(&order.order_quote_id),
            csv_field(&timezone::format_display(order.date)),
            csv_field(order.status.as_str()),
            csv_field(&order.agent_name),
            csv_field(&order.total_amount),
            csv_field(&order.broker_fee),
            csv_field(&timezone::format_display(order.created_at)),
        ]
        .join(",");
        lines.push(row);
    }

    lines.join("\n")
}

// Todo campo sai entre aspas duplas; aspas internas são dobradas (RFC 4180).
fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

// Nome de arquivo sugerido para o download
pub fn export_filename(date: NaiveDate) -> String {
    format!("sales-data-{}.csv", date.format("%Y-%m-%d"))
}

pub const ERASE_WINDOW_HOURS: i64 = 24;

// O erase-all só libera com uma exportação bem-sucedida nas últimas 24h.
// Guarda branda contra perda acidental de dados, não é fronteira de
// segurança: o timestamp vive no estado do processo, sem corroboração.
pub fn can_erase(last_export: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    last_export
        .is_some_and(|at| now.signed_duration_since(at) <= Duration::hours(ERASE_WINDOW_HOURS))
}
