//! Data acquisition: the DBnomics client and indicator table construction.

pub mod dbnomics;
pub mod loader;

#[cfg(test)]
pub(crate) mod testing;

pub use dbnomics::{DbnomicsClient, SeriesProvider};
pub use loader::*;
