//! Method descriptions consumed by the expansion engine.

pub mod definition;
pub mod descriptor;
pub mod identifiers;
