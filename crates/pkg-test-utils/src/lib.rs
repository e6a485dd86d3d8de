//! Shared test utilities for the package loader workspace.
//!
//! This crate provides standardised fixtures for on-disk package layouts.
//! It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`metadata`] - `composer.json` documents for common scenarios
//! - [`site`] - [`TestSite`] builder for roots, packages and a public dir

pub mod metadata;
pub mod site;

pub use site::TestSite;
