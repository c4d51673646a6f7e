use thiserror::Error;

/// Error type for invalid operations.
#[derive(Error, Debug)]
pub enum RSEBError {
    #[error("{0}")]
    Error(String),
    #[error("Expected {order} order polynomial with {expected} coefficients, got {got}")]
    WrongDegree {
        order: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("No real positive root at step {step}. Previous temperature={previous_temperature} K, flux={flux} W/m^2. Check the flux sign convention and material parameters")]
    NoPhysicalRoot {
        step: usize,
        previous_temperature: f64,
        flux: f64,
    },
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: String, reason: String },
    #[error("Shape mismatch. Expected {expected}, got {got}")]
    ShapeMismatch { expected: String, got: String },
    #[error("Could not parse configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Series {series}: {source}")]
    Series {
        series: usize,
        #[source]
        source: Box<RSEBError>,
    },
}

impl RSEBError {
    /// Attach the index of the series that produced this error.
    pub fn in_series(self, series: usize) -> Self {
        RSEBError::Series {
            series,
            source: Box::new(self),
        }
    }
}

/// Convenience type for `Result<T, RSEBError>`.
pub type RSEBResult<T> = Result<T, RSEBError>;
