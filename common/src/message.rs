use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::node::NodeId;

pub type MessageId = u64;

/// A single line on the wire.
///
/// `id` is the sender's outbound sequence number. It is always present on messages this node
/// emits and is ignored on messages it receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message<P> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MessageId>,
    pub src: NodeId,
    pub dest: NodeId,
    pub body: MessageBody<P>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageBody<P> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg_id: Option<MessageId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_reply_to: Option<MessageId>,
    #[serde(flatten)]
    pub payload: P,
}

impl<P> MessageBody<P> {
    /// A body carrying neither `msg_id` nor `in_reply_to`.
    pub fn new(payload: P) -> Self {
        Self {
            msg_id: None,
            in_reply_to: None,
            payload,
        }
    }

    pub fn reply(in_reply_to: MessageId, payload: P) -> Self {
        Self {
            msg_id: None,
            in_reply_to: Some(in_reply_to),
            payload,
        }
    }

    /// The request's `msg_id`, for message types where the protocol requires one.
    pub fn require_msg_id(&self) -> Result<MessageId> {
        self.msg_id.ok_or(Error::MissingField("msg_id"))
    }
}
