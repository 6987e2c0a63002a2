//! REST client for the screens backend.
//!
//! [`api::ScreenApi`] implements the onboarding persistence interface over
//! HTTP; [`config::ClientConfig`] reads its settings from the environment.

pub mod api;
pub mod config;
pub mod multipart;
