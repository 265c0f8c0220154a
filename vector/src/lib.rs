// Copyright 2019-2020 PolkaX Authors. Licensed under GPL-3.0.

//! A persistent, immutable, indexed sequence (`List`) backed by a
//! radix-balanced trie of branching factor 32.
//!
//! See the [ideal hash trees](https://infoscience.epfl.ch/record/64398/files/idealhashtrees.pdf)
//! family of data structures for the general technique; this is the vector
//! variant, addressed by index rather than by key hash.

#![deny(missing_docs)]

mod error;
mod iter;
mod list;
mod node;

pub use self::error::VectorError;
pub use self::iter::Iter;
pub use self::list::List;
