pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod table;
