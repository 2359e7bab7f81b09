//! Derive macros for Sanduq, re-exported by the `sanduq` crate.

pub use sanduq_macros::Tagged;
