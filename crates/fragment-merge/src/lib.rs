//! Deep-merge engine for bundler configuration fragments.
//!
//! A fragment is a JSON object tree. Fragments are combined left to right by
//! a [`Composer`]:
//! - Objects: deep-merge by key
//! - Arrays: concatenate (left first) or replace, per [`ArrayMerge`]
//! - Scalars: override (last wins)
//!
//! The smart variant additionally coalesces rule entries that share the same
//! literal `test` pattern, appending the right rule's loaders onto the
//! existing one.

mod composer;
mod error;
mod fragment;

pub use composer::{ArrayMerge, Composer, ConflictPolicy, MergeStrategy, RuleMerge};
pub use error::{MergeError, ValueKind};
pub use fragment::Fragment;
