//! Curve fitting.
//!
//! Responsibilities:
//!
//! - build the polynomial design matrix on standardized GDP values
//! - solve the least-squares problem and report fit quality
//! - sample the trend line over the observed GDP range

pub mod polynomial;

pub use polynomial::*;
