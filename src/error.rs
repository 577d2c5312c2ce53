//! Error handling for the tessera library
//!
//! Argument errors are reported before any mutation takes place, so a failed
//! call never leaves a container in a partially modified state.

use thiserror::Error;

/// Main error type for the tessera library
#[derive(Error, Debug)]
pub enum TesseraError {
    /// Invalid construction or configuration parameters
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the rejected parameter
        message: String,
    },

    /// Index out of bounds for a positional operation
    #[error("Out of bounds: index {index}, size {size}")]
    OutOfBounds {
        /// The invalid index
        index: usize,
        /// The valid size/length
        size: usize,
    },

    /// An operation that requires at least one element ran on an empty container
    #[error("Container is empty: {operation}")]
    Empty {
        /// The operation that needed an element
        operation: &'static str,
    },

    /// An operation that requires an empty container ran on a populated one
    #[error("Container is not empty: {operation}")]
    NotEmpty {
        /// The operation that needed an empty container
        operation: &'static str,
    },

    /// A key rename would collide with a different key already present
    #[error("Key collision: {message}")]
    KeyCollision {
        /// Description of the colliding keys
        message: String,
    },
}

impl TesseraError {
    /// Create an invalid configuration error
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an out of bounds error
    pub fn out_of_bounds(index: usize, size: usize) -> Self {
        Self::OutOfBounds { index, size }
    }

    /// Create an empty-container error
    pub fn empty(operation: &'static str) -> Self {
        Self::Empty { operation }
    }

    /// Create a not-empty error
    pub fn not_empty(operation: &'static str) -> Self {
        Self::NotEmpty { operation }
    }

    /// Create a key collision error
    pub fn key_collision<S: Into<String>>(message: S) -> Self {
        Self::KeyCollision {
            message: message.into(),
        }
    }
}

/// Result type alias for tessera operations
pub type Result<T> = std::result::Result<T, TesseraError>;

/// Check that an index is within bounds, returning an error if not
#[inline]
pub fn check_index(index: usize, size: usize) -> Result<()> {
    if index < size {
        Ok(())
    } else {
        Err(TesseraError::out_of_bounds(index, size))
    }
}

/// Check that a load factor lies in the valid (0, 1] range
#[inline]
pub fn check_load_factor(load_factor: f64) -> Result<()> {
    if load_factor.is_finite() && load_factor > 0.0 && load_factor <= 1.0 {
        Ok(())
    } else {
        Err(TesseraError::invalid_config(format!(
            "load factor {} outside (0, 1]",
            load_factor
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TesseraError::out_of_bounds(5, 3);
        assert_eq!(err.to_string(), "Out of bounds: index 5, size 3");

        let err = TesseraError::empty("first");
        assert_eq!(err.to_string(), "Container is empty: first");

        let err = TesseraError::invalid_config("load factor 0 outside (0, 1]");
        assert!(err.to_string().contains("load factor"));
    }

    #[test]
    fn test_check_index() {
        assert!(check_index(0, 1).is_ok());
        assert!(check_index(2, 3).is_ok());
        assert!(check_index(3, 3).is_err());
        assert!(check_index(0, 0).is_err());
    }

    #[test]
    fn test_check_load_factor() {
        assert!(check_load_factor(0.5).is_ok());
        assert!(check_load_factor(1.0).is_ok());
        assert!(check_load_factor(0.0).is_err());
        assert!(check_load_factor(-0.1).is_err());
        assert!(check_load_factor(1.1).is_err());
        assert!(check_load_factor(f64::NAN).is_err());
        assert!(check_load_factor(f64::INFINITY).is_err());
    }
}
