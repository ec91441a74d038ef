//! Core library for the defi-tracker dashboard.
//!
//! A wallet address goes in; token balances, prices and the native ETH
//! balance are combined into a `PositionSnapshot` with simple risk metrics.

pub mod config;
pub mod dashboard;
pub mod errors;
pub mod models;
pub mod position;
pub mod providers;
pub mod render;
pub mod utils;
