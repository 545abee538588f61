//! # Core Module
//!
//! Stateless building blocks of the generator: the description of a charge
//! calculation method, the derived parameter and feature renderings, and the
//! template family catalog.
//!
//! ## Architecture
//!
//! - **Method Descriptions** ([`method`]) - `MethodDescriptor`, identifier rules and definition files
//! - **Parameter Schema** ([`schema`]) - Ordered `common`/`atom`/`bond` enumerations
//! - **Feature Requirements** ([`features`]) - De-duplicated `RequiredFeatures` lists
//! - **Template Families** ([`templates`]) - Skeleton pairs, placeholders and the registry
//!
//! Nothing in this module holds state between calls; the registry is built at
//! compile time and only ever read.

pub mod features;
pub mod method;
pub mod schema;
pub mod templates;
