/// OpenAPI documentation generation.
pub mod documentation;
/// Builders for room-wide event broadcasts.
pub mod room_events;
/// Session coordination for game rooms.
pub mod room_service;
/// WebSocket connection and message handling service.
pub mod socket_service;
