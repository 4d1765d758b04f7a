//! # Procura Math
//!
//! Numeric building blocks for price modeling.
//! This crate provides ordinary least-squares regression, causal rolling
//! statistics and a bootstrap random forest of regression trees.

use thiserror::Error;

pub mod forest;
pub mod regression;
pub mod rolling;
pub mod tree;

/// Errors that can occur in numeric calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for numeric operations
pub type Result<T> = std::result::Result<T, MathError>;
