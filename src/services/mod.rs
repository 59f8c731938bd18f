pub mod aggregate;
pub mod coercion;
pub mod config_service;
pub mod dashboards;
pub mod export_service;
pub mod loader_service;
