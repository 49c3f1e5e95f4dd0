use std::collections::HashMap;

use common::error::{Error, Result};
use common::message::{Message, MessageBody};
use common::node::{Handling, Node, NodeId};
use common::runtime::Runtime;
use common::sender::Sender;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
enum MessagePayload {
    Init {
        node_id: NodeId,
        #[serde(default)]
        node_ids: Vec<NodeId>,
    },
    InitOk,
    Echo {
        #[serde(flatten)]
        fields: Map<String, Value>,
    },
    EchoOk {
        #[serde(flatten)]
        fields: Map<String, Value>,
    },
    Topology {
        topology: HashMap<NodeId, Vec<NodeId>>,
    },
    TopologyOk,
    Broadcast {
        message: Value,
    },
    BroadcastOk,
    Read,
    ReadOk {
        messages: Vec<Value>,
    },
    #[serde(other)]
    Unknown,
}

/// Floods every broadcast value to its neighbours and remembers it, duplicates included.
///
/// Values already seen are not suppressed and a forward may go straight back to the node it came
/// from, so the flood only terminates when the neighbour graph has no cycles. Two nodes listing
/// each other already form one.
#[derive(Debug, Default)]
struct BroadcastNode {
    neighbours: Vec<NodeId>,
    messages: Vec<Value>,
}

impl Node for BroadcastNode {
    type Payload = MessagePayload;

    fn handle_message(
        &mut self,
        message: Message<MessagePayload>,
        sender: &mut Sender<MessagePayload>,
    ) -> Result<Handling> {
        let Message { src, body, .. } = message;
        let msg_id = body.require_msg_id();

        match body.payload {
            MessagePayload::Init { node_id, node_ids } => {
                let msg_id = msg_id?;
                if let Some(previous) = sender.set_node_id(node_id.clone()) {
                    tracing::warn!(%previous, %node_id, "node re-initialized");
                }
                tracing::info!(%node_id, cluster_size = node_ids.len(), "initialized node");

                sender.reply(src, msg_id, MessagePayload::InitOk)?;
            }
            MessagePayload::Echo { fields } => {
                let msg_id = msg_id?;

                sender.send(
                    src,
                    MessageBody {
                        msg_id: Some(msg_id),
                        in_reply_to: Some(msg_id),
                        payload: MessagePayload::EchoOk { fields },
                    },
                )?;
            }
            MessagePayload::Topology { mut topology } => {
                let msg_id = msg_id?;
                let node_id = sender.node_id()?.clone();
                let neighbours = topology
                    .remove(&node_id)
                    .ok_or(Error::UnknownNode(node_id))?;
                tracing::info!(?neighbours, "neighbours set");
                self.neighbours = neighbours;

                sender.reply(src, msg_id, MessagePayload::TopologyOk)?;
            }
            MessagePayload::Broadcast { message } => {
                // Forwards from peers carry no msg_id and get no reply.
                sender.node_id()?;
                self.messages.push(message.clone());

                for neighbour in &self.neighbours {
                    sender.send(
                        neighbour.clone(),
                        MessageBody::new(MessagePayload::Broadcast {
                            message: message.clone(),
                        }),
                    )?;
                }

                if let Ok(msg_id) = msg_id {
                    sender.reply(src, msg_id, MessagePayload::BroadcastOk)?;
                }
            }
            MessagePayload::Read => {
                let msg_id = msg_id?;

                sender.reply(
                    src,
                    msg_id,
                    MessagePayload::ReadOk {
                        messages: self.messages.clone(),
                    },
                )?;
            }
            MessagePayload::InitOk
            | MessagePayload::EchoOk { .. }
            | MessagePayload::TopologyOk
            | MessagePayload::BroadcastOk
            | MessagePayload::ReadOk { .. } => return Ok(Handling::Ignored("reply")),
            MessagePayload::Unknown => return Ok(Handling::Ignored("unknown")),
        }

        Ok(Handling::Processed)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    common::logging::init();
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    Runtime::start::<BroadcastNode, _, _>(stdin, stdout).await?;
    Ok(())
}
