//! The intake record and everything that reads or rewrites it without I/O.

pub mod access;
pub mod derived;
pub mod fields;
pub mod payload;
pub mod record;
pub mod status;
pub mod store;
