pub mod message;
pub mod registry;

pub use message::{parse_incoming, IncomingMessage, MessageError, OutgoingMessage, TextMessage};
pub use registry::{SessionRegistry, TrackedSynthesis};
