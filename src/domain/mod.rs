//! Core domain types and logic. Everything here is pure and synchronous.

pub mod account;
pub mod activity;
pub mod browse;
pub mod config_validation;
pub mod deal;
pub mod deal_profile;
pub mod error;
pub mod format;
pub mod lenient;
pub mod metrics;
pub mod payouts;
pub mod rounding;
pub mod submission;
