//! HTTP surface over the grabdock core pipeline.

pub mod api;
pub mod metrics;
pub mod state;
