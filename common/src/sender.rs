use tokio::sync::mpsc::UnboundedSender;

use crate::error::{Error, Result};
use crate::message::{Message, MessageBody, MessageId};
use crate::node::NodeId;

/// Outbound half of a node.
///
/// Holds the node's identity (unset until init) and the outbound id counter. Every successful
/// [`Sender::send`] stamps the envelope with the current counter and then advances it by one, so
/// the Nth message out of a node carries `id = N`.
#[derive(Debug)]
pub struct Sender<P> {
    node_id: Option<NodeId>,
    next_id: MessageId,
    tx: UnboundedSender<Message<P>>,
}

impl<P> Sender<P> {
    pub fn new(tx: UnboundedSender<Message<P>>) -> Self {
        Self {
            node_id: None,
            next_id: 0,
            tx,
        }
    }

    pub fn node_id(&self) -> Result<&NodeId> {
        self.node_id.as_ref().ok_or(Error::Uninitialized)
    }

    /// Returns the previous id, if the node had already been initialized.
    pub fn set_node_id(&mut self, node_id: NodeId) -> Option<NodeId> {
        self.node_id.replace(node_id)
    }

    /// The id the next outbound message will carry.
    pub fn next_id(&self) -> MessageId {
        self.next_id
    }

    pub fn send(&mut self, dest: NodeId, body: MessageBody<P>) -> Result<()> {
        let message = Message {
            id: Some(self.next_id),
            src: self.node_id()?.clone(),
            dest,
            body,
        };

        self.tx.send(message).map_err(|_| Error::Disconnected)?;
        self.next_id = self.next_id.checked_add(1).expect("ids exhausted");
        Ok(())
    }

    pub fn reply(&mut self, dest: NodeId, in_reply_to: MessageId, payload: P) -> Result<()> {
        self.send(dest, MessageBody::reply(in_reply_to, payload))
    }
}
