// Copyright 2019-2020 PolkaX Authors. Licensed under GPL-3.0.

/// Alias for a `Result` with the default error type `CapabilityError`.
pub type Result<T, E = CapabilityError> = std::result::Result<T, E>;

/// Errors raised while resolving or using a `Hasher`/`Comparer` capability.
#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    /// No capability was supplied and the key domain has no built-in default.
    #[error("no hasher/comparer capability available for this key domain")]
    NoCapability,
}
