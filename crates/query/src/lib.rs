//! Query engine for client-side task collections.
//!
//! Two filter layers are kept apart: a structured predicate tree
//! ([`FilterNode`]) driven by per-column controls, and [`Overlays`] driven by
//! a search box and a status dropdown. Both feed [`compute_view`] together
//! with a single-column [`SortSpec`] and a [`PageRequest`].

#![warn(missing_docs)]

pub mod filter;
pub mod overlay;
pub mod sort;
pub mod page;
pub mod view;
mod parse;

pub use filter::{Condition, Field, FieldKind, FilterNode, FilterValue, Logic, Operator};
pub use overlay::Overlays;
pub use sort::{sort_rows, Direction, SortSpec};
pub use page::{PageRequest, DEFAULT_PAGE_SIZE};
pub use view::{compute_view, filter_tasks, QueryState, View};

/// Errors building filters or sort specs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// Operator does not apply to the field's type
    #[error("operator '{operator}' cannot be used on field '{field}'")]
    UnsupportedOperator {
        /// Filtered field
        field: Field,
        /// Rejected operator
        operator: Operator,
    },

    /// Value does not fit the field's type
    #[error("invalid value '{value}' for field '{field}'")]
    InvalidValue {
        /// Filtered field
        field: Field,
        /// Rejected value
        value: String,
    },

    /// Unrecognized field name
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// Unrecognized operator
    #[error("unknown operator: {0}")]
    UnknownOperator(String),

    /// Text does not have the expected shape
    #[error("malformed expression: {0}")]
    Malformed(String),
}
