use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::message::Message;
use crate::sender::Sender;

pub type NodeId = String;

/// What a node did with a message it managed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handling {
    Processed,
    /// The message type needs no action from this node. Nothing was sent.
    Ignored(&'static str),
}

pub trait Node: Default {
    type Payload: Serialize + DeserializeOwned + Send + 'static;

    /// Applies one inbound message. Any replies or forwards go out through `sender`, which also
    /// owns this node's identity and outbound id counter.
    fn handle_message(
        &mut self,
        message: Message<Self::Payload>,
        sender: &mut Sender<Self::Payload>,
    ) -> Result<Handling>;
}
