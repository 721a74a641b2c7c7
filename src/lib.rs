//! Derived spending, trend and budget views over a bank transaction feed.

pub mod aggregate;
pub mod browse;
pub mod budget;
pub mod categorize;
pub mod config;
pub mod db;
pub mod error;
pub mod feed;
pub mod models;
pub mod session;
pub mod view;
