// Library root for the rating engine: season rules, roster validation,
// player valuation, stat aggregation, team ratings and standings.

pub mod aggregate;
pub mod config;
pub mod directory;
pub mod model;
pub mod progress;
pub mod provider;
pub mod rating;
pub mod roster;
pub mod standings;
pub mod valuation;
