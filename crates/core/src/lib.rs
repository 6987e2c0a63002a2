//! Pure logic for the screen-onboarding intake workflow.
//!
//! Field keys, the intake record and its edit reducer, derived fields,
//! per-step validation, the access policy and the wizard step table. Nothing
//! in this crate performs I/O.

pub mod error;
pub mod intake;
pub mod types;
pub mod validation;
pub mod wizard;
