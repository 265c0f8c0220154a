// Copyright 2019-2020 PolkaX Authors. Licensed under GPL-3.0.

pub use immutable_capability::CapabilityError as HamtError;

/// Alias for a `Result` with the default error type `HamtError`.
pub type Result<T, E = HamtError> = std::result::Result<T, E>;
