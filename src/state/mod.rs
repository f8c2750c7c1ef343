//! Conversation state management

pub mod flow;
pub mod session;

pub use flow::{EventKind, Flow, FlowState};
pub use session::{Session, SessionStore};
