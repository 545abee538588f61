//! # cclgen
//!
//! Generates C++ sources for charge calculation methods from structured method
//! descriptions.
//!
//! A method is described by its name, its parameters (method-wide, per-atom and
//! per-bond), the capabilities it requires from the input molecule, and the
//! numeric code fragment that computes the charges. The generator expands that
//! description into a class declaration and its implementation, both deriving
//! from the host program's `Method` interface and overriding
//! `calculate_charges`.
//!
//! ## Architectural Philosophy
//!
//! - **[`core`]: The Foundation.** Method descriptors, the parameter schema,
//!   feature requirement rendering and the compile-time registry of template
//!   families. Everything here is stateless.
//!
//! - **[`engine`]: The Expansion Engine.** Validates a descriptor against a
//!   family, computes the shared bindings once and fills both skeletons in a
//!   single pass, returning the pair or an error and never half of it.
//!
//! ## Example
//!
//! ```
//! use cclgen::core::method::descriptor::MethodDescriptor;
//! use cclgen::core::templates::family::FamilyKey;
//! use cclgen::engine::expansion::expand;
//!
//! let descriptor = MethodDescriptor::new("Equal")
//!     .required_features(Vec::<String>::new())
//!     .code("    for (int i = 0; i < n; i++) q[i] = 1.0 / n;");
//! let key = FamilyKey::parse("trivial-loop", "static", true)?;
//!
//! let artifacts = expand(&descriptor, &key)?;
//! assert!(artifacts.declaration().contents().contains("class Equal : public Method"));
//! assert!(artifacts.implementation().contents().contains("return q;"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod core;
pub mod engine;
