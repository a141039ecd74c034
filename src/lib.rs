//! FRF - FreightForward Terminal Client
//!
//! A terminal client for submitting freight-shipping requests to the
//! FreightForward marketplace, built in Rust.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
