//! # Templates Module
//!
//! The fixed catalog of C++ skeleton pairs a method can be expanded into.
//!
//! ## Overview
//!
//! A [`family::TemplateFamily`] pairs a declaration skeleton with an
//! implementation skeleton and records the placeholders both reference and
//! the include directives the implementation starts with. Families are
//! selected by a [`family::FamilyKey`] along three axes:
//!
//! - **Back-end** - the numeric strategy wrapped around the code fragment
//!   (`dense-solve`, `iterative`, `index-copy`, `trivial-loop`)
//! - **Linkage** - compiled into the host program or exported from a plugin
//! - **Feature support** - whether the base exposes a requirements accessor
//!
//! ## Key Components
//!
//! - [`family`] - Keys, placeholders, include directives and the family type
//! - [`registry`] - The compile-time registry and its lookup functions
//! - [`skeleton`] - Single-pass brace placeholder scanning and rendering

pub mod family;
pub mod registry;
pub mod skeleton;
