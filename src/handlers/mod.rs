//! Request handlers.

pub mod entity;
pub mod reports;
