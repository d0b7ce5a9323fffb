//! Input/output helpers.
//!
//! - merged table CSV exports (`export`)
//! - chart JSON read/write (`chart`)

pub mod chart;
pub mod export;

pub use chart::*;
pub use export::*;
