//! # Engine Module
//!
//! The expansion engine binds one [`MethodDescriptor`](crate::core::method::descriptor::MethodDescriptor)
//! to one template family and emits the declaration/implementation pair.
//!
//! ## Overview
//!
//! An expansion runs in a fixed order and produces no text until every check
//! has passed:
//!
//! 1. Every placeholder the family declares must be bound by the descriptor
//! 2. The parameter schema is computed once and shared by both skeletons
//! 3. Include directives are merged (template, then system, then user)
//! 4. Both skeletons are filled in a single pass over an immutable binding map
//!
//! ## Key Components
//!
//! - [`expansion`] - `expand`, `expand_family` and the batch entry point `expand_all`
//! - [`artifacts`] - The emitted pair and its metadata
//! - [`error`] - The error taxonomy reported to callers
//!
//! Expansions share nothing but the read-only registry, so callers may run
//! them on as many threads as they like; `expand_all` does so with `rayon`
//! when the `parallel` feature is enabled.

pub mod artifacts;
pub(crate) mod bindings;
pub mod error;
pub mod expansion;
