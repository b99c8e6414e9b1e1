//! Error type for index construction, matching, joining and table I/O.
//!
//! | Variant | Raised when |
//! |---------|-------------|
//! | [`EmptyInput`](XMatchError::EmptyInput) | An index or match call received zero rows |
//! | [`InvalidParameter`](XMatchError::InvalidParameter) | Bad radius/threshold, unknown column, invalid coordinate |
//! | [`ColumnCollision`](XMatchError::ColumnCollision) | A join or schema would clobber a column name |
//! | [`Schema`](XMatchError::Schema) | A row does not conform to its table's schema |
//! | [`Parse`](XMatchError::Parse) | Malformed delimited text or configuration |
//! | [`Io`](XMatchError::Io) | Reading or writing a file failed |
//!
//! None of these are retried internally, and no operation returns a partial
//! result alongside an error.

use celestial_core::SkyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum XMatchError {
    #[error("Empty input: {context} received zero rows")]
    EmptyInput { context: String },

    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    #[error("Column collision: '{column}' {message}")]
    ColumnCollision { column: String, message: String },

    #[error("Schema violation at row {row}: {message}")]
    Schema { row: usize, message: String },

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type XMatchResult<T> = Result<T, XMatchError>;

impl XMatchError {
    pub fn empty_input(context: impl Into<String>) -> Self {
        Self::EmptyInput {
            context: context.into(),
        }
    }

    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    pub fn column_collision(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ColumnCollision {
            column: column.into(),
            message: message.into(),
        }
    }

    pub fn schema(row: usize, message: impl Into<String>) -> Self {
        Self::Schema {
            row,
            message: message.into(),
        }
    }

    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

impl From<SkyError> for XMatchError {
    fn from(error: SkyError) -> Self {
        Self::invalid_parameter(error.to_string())
    }
}

impl From<serde_json::Error> for XMatchError {
    fn from(error: serde_json::Error) -> Self {
        Self::parse(error.line(), error.to_string())
    }
}
