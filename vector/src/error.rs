// Copyright 2019-2020 PolkaX Authors. Licensed under GPL-3.0.

/// Alias for a `Result` with the default error type `VectorError`.
pub type Result<T, E = VectorError> = std::result::Result<T, E>;

/// The `List` error.
#[derive(Debug, thiserror::Error)]
pub enum VectorError {
    /// An index fell outside the permitted range for the operation.
    #[error("index {index} out of range for a list of length {length}")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// The length of the list the index was applied to.
        length: usize,
    },
}
