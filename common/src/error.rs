use thiserror::Error;

use crate::node::NodeId;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("message body is missing required field `{0}`")]
    MissingField(&'static str),
    #[error("node has not received an init message yet")]
    Uninitialized,
    #[error("node {0} does not appear in the topology")]
    UnknownNode(NodeId),
    #[error("output writer has shut down")]
    Disconnected,
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("writer task failed: {0}")]
    Writer(#[from] tokio::task::JoinError),
}
