//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - indicator/country constants and series identifiers (`Indicator`, `SeriesId`)
//! - fetched and cleaned tables (`RawObservation`, `IndicatorTable`)
//! - per-country merge outputs (`MergedTable`, `MergedTables`)

pub mod types;

pub use types::*;
