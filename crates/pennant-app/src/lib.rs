// Command-line front end for the pennant rating engine.

pub mod app;
pub mod cli;
pub mod report;
