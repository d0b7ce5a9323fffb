//! `kuznets-curves` library crate.
//!
//! The binary (`kz`) is a thin wrapper around this library so that:
//!
//! - the fetch -> merge -> fit -> chart pipeline is testable without the network
//! - the TUI and the one-shot CLI share one implementation
//! - chart descriptions can be consumed by other front-ends

pub mod app;
pub mod chart;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod merge;
pub mod plot;
pub mod report;
pub mod tui;
