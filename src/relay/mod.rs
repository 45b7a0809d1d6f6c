//! Room-scoped signaling relay

pub mod dispatch;
pub mod envelope;
pub mod registry;
pub mod socket;

pub use dispatch::Relay;
pub use envelope::{ClientEnvelope, MalformedMessage, ServerEnvelope, SignalKind};
pub use registry::{ConnectionId, ConnectionRegistry, JoinOutcome};
pub use socket::serve_socket;
