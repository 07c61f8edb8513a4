//! Error types for the Vista core types.

use thiserror::Error;

/// A specialized Result type for Vista core operations.
pub type VistaResult<T> = Result<T, VistaError>;

/// The main error type for Vista core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VistaError {
    /// A dimension code outside the column's domain.
    #[error("Invalid {dimension} code: {code}")]
    InvalidCode {
        /// Column the code was given for.
        dimension: &'static str,
        /// The rejected code.
        code: i64,
    },

    /// A column name that is not part of the fact schema.
    #[error("Unknown column: {name}")]
    UnknownColumn {
        /// The rejected column name.
        name: String,
    },

    /// A value that could not be parsed for a column.
    #[error("Invalid value for {column}: {value}")]
    InvalidValue {
        /// Column the value was given for.
        column: String,
        /// The raw value.
        value: String,
    },

    /// Error in date parsing or an invalid date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// Two rows share the same full dimension tuple.
    #[error("Duplicate fact for {key}")]
    DuplicateFact {
        /// Display form of the duplicated key.
        key: String,
    },

    /// A row does not fit the table's schema.
    #[error("Schema mismatch: {reason}")]
    SchemaMismatch {
        /// What was wrong with the row.
        reason: String,
    },
}

impl VistaError {
    /// Creates an invalid code error.
    pub fn invalid_code(dimension: &'static str, code: impl Into<i64>) -> Self {
        Self::InvalidCode {
            dimension,
            code: code.into(),
        }
    }

    /// Creates an unknown column error.
    pub fn unknown_column(name: impl Into<String>) -> Self {
        Self::UnknownColumn { name: name.into() }
    }

    /// Creates an invalid value error.
    pub fn invalid_value(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Creates an invalid date error.
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates a schema mismatch error.
    pub fn schema_mismatch(reason: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            reason: reason.into(),
        }
    }
}
