use thiserror::Error;

/// Input errors raised by the numerical core.
///
/// These are terminal for the operation that raised them: a bad corpus or
/// an out-of-range cluster count is never retried.
#[derive(Debug, Error)]
pub enum Error {
    /// The corpus contains no documents.
    #[error("empty corpus")]
    EmptyCorpus,

    /// A vector does not match the corpus dimension.
    #[error("dimension mismatch for {id}: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Offending document id (or `"query"`).
        id: String,
        /// Corpus dimension.
        expected: usize,
        /// Dimension of the offending vector.
        found: usize,
    },

    /// A vector component is NaN or infinite.
    #[error("non-finite value in vector for {id} at position {position}")]
    NonFiniteValue { id: String, position: usize },

    /// Two documents share an id.
    #[error("duplicate document id: {0}")]
    DuplicateId(String),

    /// Requested cluster count is incompatible with the corpus.
    #[error("invalid cluster count: requested {requested}, but corpus has {n_items} documents")]
    InvalidClusterCount { requested: usize, n_items: usize },

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        name: &'static str,
        message: &'static str,
    },
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
