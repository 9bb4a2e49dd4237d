//! Data-transfer types crossing the HTTP and WebSocket boundaries.

pub mod health;
pub mod room;
pub mod validation;
pub mod ws;
