//! Command handlers.

pub mod replay;
pub mod resolve;
pub mod settings;
