//! Application layer managing state and business workflows.
//!
//! This module coordinates between the domain layer and presentation layer,
//! managing application state, identity gating and the submission flow.

pub mod state;

pub use state::*;
