//! Error types shared by the diagram manager, the compiler and the reducers.

use crate::reference::Ref;

/// Errors reported by `lqm-rs` operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A diagram was built over a variable the manager does not know.
    #[error("unknown variable: {0}")]
    UnknownVariable(String),

    /// A leaf or assigned value lies outside the allowed range.
    #[error("invalid value {value} (allowed range is 0..={max})")]
    InvalidValue { value: u32, max: u32 },

    /// The number of children does not match the variable's domain.
    #[error("variable '{variable}' expects {expected} children, got {actual}")]
    ArityMismatch {
        variable: String,
        expected: usize,
        actual: usize,
    },

    /// A child node tests a variable that does not come after its parent.
    #[error("child of '{variable}' breaks the variable order")]
    OrderViolation { variable: String },

    /// `leaf_value` was called on an internal node.
    #[error("{0} is not a leaf")]
    NotALeaf(Ref),

    /// An expression refers to a name that cannot be resolved.
    #[error("unknown identifier: {0}")]
    UnknownIdentifier(String),

    /// The expression stack did not reduce to a single value.
    #[error("malformed expression: {0}")]
    MalformedExpression(String),

    /// The component is not part of the model core.
    #[error("unknown component: {0}")]
    UnknownComponent(String),

    /// The same id appears twice in a model.
    #[error("duplicate component: {0}")]
    DuplicateComponent(String),

    /// The maximal value of a component can only be raised.
    #[error("cannot lower max value of '{id}' from {current} to {requested}")]
    LoweredMaxValue {
        id: String,
        current: u32,
        requested: u32,
    },

    /// A model needs exactly one function per core component.
    #[error("{components} core components but {functions} functions")]
    FunctionCountMismatch { components: usize, functions: usize },

    /// A component index is out of range.
    #[error("index {index} out of range (size is {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// The component was already removed by the reducer.
    #[error("component '{0}' was already removed")]
    AlreadyRemoved(String),

    /// The component to eliminate regulates itself.
    #[error("cannot eliminate self-regulated component '{0}'")]
    CyclicElimination(String),

    /// A fixed-point loop did not converge within its bound.
    #[error("no fixed point reached after {0} iterations")]
    IterationLimit(usize),
}

/// Result type alias for `lqm-rs` operations.
pub type Result<T> = std::result::Result<T, Error>;
