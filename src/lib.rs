// HTTP and WebSocket server modules
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;

// Session/room store and moderation
pub mod moderation;
pub mod prompt;
pub mod store;

// Room-scoped signaling relay
pub mod relay;

// Text completion collaborator
pub mod completion;
