//! Apodization window functions
//! 
//! Each window evaluates a pulse-amplitude envelope `f(x)` over its domain.
//! The FID and Gaussian windows have closed forms; custom windows carry a parsed expression.

use std::collections::HashMap;
use std::f64::consts::PI;

use super::expr::{BinaryOp, Builtin, Expr};
use super::FunctionError;

/// Admissible values for a function parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bounds {
    /// Any finite value
    Any,
    /// Strictly greater than zero
    Positive,
    /// Zero or greater
    NonNegative,
    /// Inclusive range [min, max]
    Between(f64, f64),
}

impl Bounds {
    /// Check whether `value` is admissible
    pub fn contains(&self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        match *self {
            Bounds::Any => true,
            Bounds::Positive => value > 0.0,
            Bounds::NonNegative => value >= 0.0,
            Bounds::Between(min, max) => value >= min && value <= max,
        }
    }

    pub fn describe(&self) -> String {
        match *self {
            Bounds::Any => "any finite value".to_string(),
            Bounds::Positive => "> 0".to_string(),
            Bounds::NonNegative => ">= 0".to_string(),
            Bounds::Between(min, max) => format!("between {} and {}", min, max),
        }
    }
}

/// Named numeric parameter of a window function
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Human readable name, e.g. "T2star (microseconds)"
    pub name: String,

    /// Symbol used in the expression, e.g. "T2star"
    pub symbol: String,

    /// Current value
    pub value: f64,

    /// Value used when the function is reset
    pub default: f64,

    pub bounds: Bounds,
}

impl Parameter {
    pub fn new(name: &str, symbol: &str, default: f64, bounds: Bounds) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            value: default,
            default,
            bounds,
        }
    }

    /// Check the current value against the admissible range
    pub fn validate(&self) -> Result<(), FunctionError> {
        if self.bounds.contains(self.value) {
            Ok(())
        } else {
            Err(FunctionError::InvalidParameter {
                symbol: self.symbol.clone(),
                value: self.value,
                expected: self.bounds.describe(),
            })
        }
    }
}

/// Interval the pulse duration is mapped onto
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Domain {
    /// `x` is the elapsed time in microseconds, spanning [0, duration]
    Time,
    /// The pulse duration is mapped linearly onto [start_x, end_x]
    Interval { start_x: f64, end_x: f64 },
}

impl Domain {
    /// Endpoints of the domain for a pulse of `duration_s` seconds
    pub fn endpoints(&self, duration_s: f64) -> (f64, f64) {
        match *self {
            Domain::Time => (0.0, duration_s * 1e6),
            Domain::Interval { start_x, end_x } => (start_x, end_x),
        }
    }
}

/// Window function used for apodization
#[derive(Debug, Clone, PartialEq)]
pub enum WindowFunction {
    /// Exponential free-induction decay: exp(-x / T2star), x in microseconds
    Fid { t2star: Parameter },

    /// Gaussian: exp(-0.5 * ((x - mu) / sigma)^2)
    Gaussian { mu: Parameter, sigma: Parameter },

    /// User-supplied expression in `x`
    Custom {
        source: String,
        expr: Expr,
        parameters: Vec<Parameter>,
        domain: Domain,
    },
}

impl WindowFunction {
    /// FID window with the default T2* of 10 µs
    pub fn fid() -> Self {
        WindowFunction::Fid {
            t2star: Parameter::new("T2star (microseconds)", "T2star", 10.0, Bounds::Positive),
        }
    }

    /// FID window with the given T2* in microseconds
    pub fn fid_with(t2star_us: f64) -> Self {
        let mut f = Self::fid();
        if let WindowFunction::Fid { t2star } = &mut f {
            t2star.value = t2star_us;
        }
        f
    }

    /// Gaussian window centred at 0 with unit width
    pub fn gaussian() -> Self {
        WindowFunction::Gaussian {
            mu: Parameter::new("Center", "mu", 0.0, Bounds::Any),
            sigma: Parameter::new("Width", "sigma", 1.0, Bounds::Positive),
        }
    }

    /// Default custom window `exp(-x^2)` over [-π, π]
    pub fn custom_default() -> Self {
        // Built directly so construction cannot fail
        WindowFunction::Custom {
            source: "exp(-x^2)".to_string(),
            expr: Expr::Call(
                Builtin::Exp,
                Box::new(Expr::Neg(Box::new(Expr::Binary(
                    BinaryOp::Pow,
                    Box::new(Expr::Var("x".to_string())),
                    Box::new(Expr::Number(2.0)),
                )))),
            ),
            parameters: Vec::new(),
            domain: Domain::Interval {
                start_x: -PI,
                end_x: PI,
            },
        }
    }

    /// Parse a custom window
    /// 
    /// Every free symbol other than `x`, `pi` and `e` becomes a parameter with
    /// default value 1 and no bounds unless given in `defaults`.
    /// 
    /// # Arguments
    /// * `source` - Expression text
    /// * `defaults` - Initial values by symbol
    /// * `domain` - Interval the pulse duration maps onto
    pub fn custom(
        source: &str,
        defaults: &[(&str, f64)],
        domain: Domain,
    ) -> Result<Self, FunctionError> {
        let expr = Expr::parse(source)?;
        let parameters = expr
            .free_symbols()
            .into_iter()
            .map(|symbol| {
                let value = defaults
                    .iter()
                    .find(|(s, _)| *s == symbol)
                    .map(|(_, v)| *v)
                    .unwrap_or(1.0);
                Parameter::new(&symbol, &symbol, value, Bounds::Any)
            })
            .collect();

        Ok(WindowFunction::Custom {
            source: source.to_string(),
            expr,
            parameters,
            domain,
        })
    }

    /// Display name, also the registry key for the built-in functions
    pub fn name(&self) -> &str {
        match self {
            WindowFunction::Fid { .. } => "FID",
            WindowFunction::Gaussian { .. } => "Gaussian",
            WindowFunction::Custom { .. } => "Custom",
        }
    }

    /// Human readable expression
    pub fn expression(&self) -> String {
        match self {
            WindowFunction::Fid { .. } => "exp(-x / T2star)".to_string(),
            WindowFunction::Gaussian { .. } => "exp(-0.5 * ((x - mu) / sigma)^2)".to_string(),
            WindowFunction::Custom { source, .. } => source.clone(),
        }
    }

    pub fn domain(&self) -> Domain {
        match self {
            WindowFunction::Fid { .. } => Domain::Time,
            WindowFunction::Gaussian { .. } => Domain::Interval {
                start_x: -PI,
                end_x: PI,
            },
            WindowFunction::Custom { domain, .. } => *domain,
        }
    }

    pub fn parameters(&self) -> Vec<&Parameter> {
        match self {
            WindowFunction::Fid { t2star } => vec![t2star],
            WindowFunction::Gaussian { mu, sigma } => vec![mu, sigma],
            WindowFunction::Custom { parameters, .. } => parameters.iter().collect(),
        }
    }

    fn parameters_mut(&mut self) -> Vec<&mut Parameter> {
        match self {
            WindowFunction::Fid { t2star } => vec![t2star],
            WindowFunction::Gaussian { mu, sigma } => vec![mu, sigma],
            WindowFunction::Custom { parameters, .. } => parameters.iter_mut().collect(),
        }
    }

    /// Set a parameter by symbol
    /// 
    /// The value is stored even if out of bounds; `validate` reports it.
    pub fn set_parameter(&mut self, symbol: &str, value: f64) -> Result<(), FunctionError> {
        let param = self
            .parameters_mut()
            .into_iter()
            .find(|p| p.symbol == symbol)
            .ok_or_else(|| FunctionError::UnknownSymbol(symbol.to_string()))?;
        param.value = value;
        Ok(())
    }

    /// Restore every parameter to its default
    pub fn reset_parameters(&mut self) {
        for p in self.parameters_mut() {
            p.value = p.default;
        }
    }

    /// Check every parameter against its admissible range
    pub fn validate(&self) -> Result<(), FunctionError> {
        for p in self.parameters() {
            p.validate()?;
        }
        Ok(())
    }

    /// Evaluate the envelope at `x`
    pub fn evaluate(&self, x: f64) -> Result<f64, FunctionError> {
        match self {
            WindowFunction::Fid { t2star } => Ok((-x / t2star.value).exp()),
            WindowFunction::Gaussian { mu, sigma } => {
                let z = (x - mu.value) / sigma.value;
                Ok((-0.5 * z * z).exp())
            }
            WindowFunction::Custom {
                expr, parameters, ..
            } => {
                let values: HashMap<String, f64> = parameters
                    .iter()
                    .map(|p| (p.symbol.clone(), p.value))
                    .collect();
                expr.eval(x, &values)
            }
        }
    }

    /// Evaluate the envelope at `n` evenly spaced points over the domain
    /// 
    /// Both domain endpoints are included (n >= 2), so the last point of a
    /// `Time` domain lands exactly on the pulse duration.
    /// 
    /// # Arguments
    /// * `duration_s` - Pulse duration in seconds
    /// * `n` - Number of points
    pub fn pulse_amplitude(&self, duration_s: f64, n: usize) -> Result<Vec<f64>, FunctionError> {
        let (start, end) = self.domain().endpoints(duration_s);
        let step = if n > 1 {
            (end - start) / (n - 1) as f64
        } else {
            0.0
        };

        let values = match self {
            // Custom expressions build the parameter table once
            WindowFunction::Custom {
                expr, parameters, ..
            } => {
                let values: HashMap<String, f64> = parameters
                    .iter()
                    .map(|p| (p.symbol.clone(), p.value))
                    .collect();
                (0..n)
                    .map(|k| expr.eval(start + step * k as f64, &values))
                    .collect::<Result<Vec<f64>, _>>()?
            }
            _ => (0..n)
                .map(|k| self.evaluate(start + step * k as f64))
                .collect::<Result<Vec<f64>, _>>()?,
        };

        Ok(values)
    }
}
