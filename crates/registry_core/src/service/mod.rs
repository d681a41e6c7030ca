//! Core use-case services.
//!
//! # Responsibility
//! - Turn raw form input into entities and drive repository calls.
//! - Keep CLI/UI layers decoupled from storage details.

pub mod device_service;
pub mod user_service;
