//! Column classification.

use std::fmt;

use polars::prelude::DataType;
use serde::{Deserialize, Serialize};

/// Logical type of a column, as seen by the cleaning stages.
///
/// Derived from the column's current dtype each time a stage needs it,
/// since earlier stages may have converted the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Numeric,
    Text,
    Datetime,
    Boolean,
    Categorical,
}

impl ColumnType {
    /// Classify a dtype. Returns `None` for nested or binary dtypes,
    /// which no stage touches.
    pub fn from_dtype(dtype: &DataType) -> Option<Self> {
        match dtype {
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64 => Some(Self::Numeric),
            DataType::Date | DataType::Datetime(_, _) => Some(Self::Datetime),
            DataType::Boolean => Some(Self::Boolean),
            DataType::Categorical(_, _) | DataType::Enum(_, _) => Some(Self::Categorical),
            DataType::String | DataType::Null => Some(Self::Text),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Text => "text",
            Self::Datetime => "datetime",
            Self::Boolean => "boolean",
            Self::Categorical => "categorical",
        }
    }

    /// Text and categorical columns hold free-form string values.
    pub fn is_textual(self) -> bool {
        matches!(self, Self::Text | Self::Categorical)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
