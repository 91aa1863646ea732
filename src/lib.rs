//! breaker-footprint library: circuit breaker coverage analysis for request handlers.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
