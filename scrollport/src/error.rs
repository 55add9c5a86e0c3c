use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// Errors surfaced by public [`crate::ScrollViewer`] entry points.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// A numeric input was NaN/infinite, or an enumerated value was out of range.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The operation conflicts with the current state of the control.
    #[error("invalid operation: {message}")]
    InvalidOperation { message: String },

    /// The requested combination of settings is not supported.
    #[error("not supported: {message}")]
    NotSupported { message: String },
}

impl Error {
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_supported(message: impl Into<String>) -> Self {
        Self::NotSupported {
            message: message.into(),
        }
    }
}

/// Rejects NaN and infinite offsets.
pub(crate) fn check_offset(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::invalid_argument(format!("{name} must be finite (got {value})")))
    }
}

/// Rejects NaN, infinite and non-positive zoom factors.
pub(crate) fn check_zoom(name: &str, value: f32) -> Result<f32> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::invalid_argument(format!(
            "{name} must be a finite positive zoom factor (got {value})"
        )))
    }
}
