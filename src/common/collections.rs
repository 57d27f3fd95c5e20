//! Hash collections keyed with FxHash. Keys here are short strings and small
//! tuples, so DoS resistance is not needed.

pub type HashSet<T> = rustc_hash::FxHashSet<T>;
