//! Core business logic module

pub mod callback;
pub mod error;
pub mod manager;
pub mod types;
