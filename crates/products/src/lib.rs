//! Products domain module.
//!
//! This crate contains the product document model and the payload rules
//! applied before anything reaches storage, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod product;
pub mod validation;

pub use product::{NewProduct, Product, ProductId, ProductPatch};
pub use validation::{ValidationMode, ValidationReport, Violation, validate};
