//! Async onboarding workflow over a persistence backend.
//!
//! [`controller::WorkflowController`] drives one wizard session using the
//! pure logic in `signage-core`; [`persistence::IntakePersistence`] is the
//! seam to the backend.

pub mod controller;
pub mod loader;
pub mod persistence;
pub mod uniqueness;
