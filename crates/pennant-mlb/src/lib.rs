// MLB Stats API implementation of the pennant-core provider traits.

pub mod client;
pub mod parse;

pub use client::MlbStatsClient;
