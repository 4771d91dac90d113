//! Client library for the logo generation backend.
//!
//! Provides the HTTP API wrapper, the backend traits the session is
//! written against, the spawned status-poll task that drives a video
//! conversion, and the [`studio::Studio`] session that ties the gallery
//! store to both.

pub mod api;
pub mod backend;
pub mod config;
pub mod conversion;
pub mod studio;
