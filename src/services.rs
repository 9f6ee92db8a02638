pub mod agent_analytics;
pub mod auth;
pub mod export;
pub mod metrics;
pub mod order_filter;
pub mod timezone;
