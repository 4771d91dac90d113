//! Domain types for the logo studio.
//!
//! Holds the in-memory logo gallery, the generation request model, the
//! backend job status variants, and the pure state machine that drives a
//! single logo's video conversion. No I/O happens in this crate.

pub mod error;
pub mod lifecycle;
pub mod logo;
pub mod request;
pub mod status;
pub mod store;
pub mod types;
