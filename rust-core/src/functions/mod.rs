//! Window functions for apodization

pub mod expr;
pub mod window;
pub mod registry;

pub use expr::Expr;
pub use window::{Bounds, Domain, Parameter, WindowFunction};
pub use registry::FunctionRegistry;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FunctionError {
    #[error("Failed to parse expression: {0}")]
    Parse(String),

    #[error("Unknown function '{0}'")]
    UnknownFunction(String),

    #[error("Unknown symbol '{0}'")]
    UnknownSymbol(String),

    #[error("Parameter {symbol} = {value} is not admissible (expected {expected})")]
    InvalidParameter {
        symbol: String,
        value: f64,
        expected: String,
    },
}
