//! # Storefront Smoke Client
//!
//! Seeds running order, product and customer services with generated
//! records and verifies each one reads back unchanged.
//!
//! ## Features
//!
//! - Reproducible record generation from a seed
//! - Create / read-back / compare round trips per service
//! - Optional trigger of the order export

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod client;
pub mod generator;

pub use client::{ServiceClient, SmokeError, mismatched_fields};
pub use generator::RecordGenerator;
