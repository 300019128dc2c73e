pub mod adapter;
pub mod config_manager;
pub mod models;
pub mod observability;
pub mod query;
