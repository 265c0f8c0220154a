// Copyright 2019-2020 PolkaX Authors. Licensed under GPL-3.0.

pub use immutable_capability::CapabilityError as SortedMapError;

/// Alias for a `Result` with the default error type `SortedMapError`.
pub type Result<T, E = SortedMapError> = std::result::Result<T, E>;
