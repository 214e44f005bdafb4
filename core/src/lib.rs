//! churnlens core: heuristic churn risk scoring for a subscriber
//! portfolio, plus the directory, metrics, persistence and reporting
//! built around it.

pub mod config;
pub mod customer;
pub mod directory;
pub mod error;
pub mod metrics;
pub mod portfolio;
pub mod prediction;
pub mod report;
pub mod scorer;
pub mod service;
pub mod store;
pub mod types;
