//! Terminal plotting for the non-interactive CLI.

pub mod ascii;

pub use ascii::render_chart_ascii;
