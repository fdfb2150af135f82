//! Concrete registered document classes.
//!
//! Each class module bundles its contract shape, domain gate, guidance
//! text and typed record views over the generic [`DocumentResult`].
//!
//! [`DocumentResult`]: crate::contract::DocumentResult

pub mod gas;
pub mod lng;
