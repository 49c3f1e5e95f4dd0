//! Shared plumbing for Maelstrom workload nodes.
//!
//! A node binary defines its payload enum and a [`node::Node`] implementation, then hands
//! stdin/stdout to [`runtime::Runtime::start`], which decodes one message per line and drives
//! the node until input ends.

pub mod error;
pub mod logging;
pub mod message;
pub mod node;
pub mod runtime;
pub mod sender;
