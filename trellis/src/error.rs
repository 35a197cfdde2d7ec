//! Error types for the layout core.

use thiserror::Error;

use crate::widget::{WidgetId, WidgetKind};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("layout nesting exceeded (max {max})")]
    NestingExceeded { max: usize },

    #[error("sizing stack exceeded (max {max})")]
    SizingExceeded { max: usize },

    #[error("no open layout")]
    NoOpenLayout,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StyleError {
    #[error("unknown style property: {0}")]
    UnknownProperty(String),

    #[error("invalid value for {property}: {value}")]
    InvalidValue { property: String, value: String },

    #[error("malformed style declaration: {0}")]
    Malformed(String),
}

impl StyleError {
    pub(crate) fn invalid(property: &str, value: &str) -> Self {
        StyleError::InvalidValue {
            property: property.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WidgetError {
    #[error("unknown widget: {0}")]
    UnknownWidget(WidgetId),

    #[error("widget {id} is not a {expected:?}")]
    KindMismatch { id: WidgetId, expected: WidgetKind },
}
