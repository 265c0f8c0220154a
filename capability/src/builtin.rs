// Copyright 2019-2020 PolkaX Authors. Licensed under GPL-3.0.

use std::rc::Rc;

use crate::compare::{BytesComparer, Comparer, IntegerComparer, StringComparer};
use crate::hash::{BytesHasher, Hasher, IntegerHasher, StringHasher};

/// A key domain with a built-in `Hasher` and `Comparer`, selected when a
/// collection is constructed without an explicit capability. Implemented
/// only for the three domains named in the capability contract: integers,
/// UTF-8 strings, and raw byte sequences.
pub trait BuiltinKey: Sized + 'static {
    /// Resolve the built-in hasher for this key domain.
    fn builtin_hasher() -> Rc<dyn Hasher<Self>>;

    /// Resolve the built-in comparer for this key domain.
    fn builtin_comparer() -> Rc<dyn Comparer<Self>>;
}

impl BuiltinKey for i64 {
    fn builtin_hasher() -> Rc<dyn Hasher<i64>> {
        Rc::new(IntegerHasher)
    }

    fn builtin_comparer() -> Rc<dyn Comparer<i64>> {
        Rc::new(IntegerComparer)
    }
}

impl BuiltinKey for String {
    fn builtin_hasher() -> Rc<dyn Hasher<String>> {
        Rc::new(StringHasher)
    }

    fn builtin_comparer() -> Rc<dyn Comparer<String>> {
        Rc::new(StringComparer)
    }
}

impl BuiltinKey for Vec<u8> {
    fn builtin_hasher() -> Rc<dyn Hasher<Vec<u8>>> {
        Rc::new(BytesHasher)
    }

    fn builtin_comparer() -> Rc<dyn Comparer<Vec<u8>>> {
        Rc::new(BytesComparer)
    }
}
