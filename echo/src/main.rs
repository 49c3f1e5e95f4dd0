use common::error::Result;
use common::message::{Message, MessageBody};
use common::node::{Handling, Node, NodeId};
use common::runtime::Runtime;
use common::sender::Sender;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
enum MessagePayload {
    Init {
        node_id: NodeId,
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
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Default)]
struct EchoNode;

impl Node for EchoNode {
    type Payload = MessagePayload;

    fn handle_message(
        &mut self,
        message: Message<Self::Payload>,
        sender: &mut Sender<Self::Payload>,
    ) -> Result<Handling> {
        let msg_id = message.body.require_msg_id();

        match message.body.payload {
            Self::Payload::Init { node_id } => {
                let msg_id = msg_id?;
                tracing::info!(%node_id, "initialized node");
                sender.set_node_id(node_id);
                sender.reply(message.src, msg_id, Self::Payload::InitOk)?;
            }
            Self::Payload::Echo { fields } => {
                let msg_id = msg_id?;
                sender.send(
                    message.src,
                    MessageBody {
                        msg_id: Some(msg_id),
                        in_reply_to: Some(msg_id),
                        payload: Self::Payload::EchoOk { fields },
                    },
                )?;
            }
            Self::Payload::InitOk | Self::Payload::EchoOk { .. } => {
                return Ok(Handling::Ignored("reply"))
            }
            Self::Payload::Unknown => return Ok(Handling::Ignored("unknown")),
        }

        Ok(Handling::Processed)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    common::logging::init();
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    Runtime::start::<EchoNode, _, _>(stdin, stdout).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn run(lines: &[&str]) -> Vec<Value> {
        let input = lines.join("\n");
        let output = Runtime::start::<EchoNode, _, _>(input.as_bytes(), Vec::new())
            .await
            .unwrap();
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn init_then_echo() {
        let replies = run(&[
            r#"{"src":"c1","dest":"n1","body":{"type":"init","node_id":"n1","node_ids":["n1"],"msg_id":1}}"#,
            r#"{"src":"c1","dest":"n1","body":{"type":"echo","msg_id":2,"echo":"hi"}}"#,
        ])
        .await;

        assert_eq!(
            replies,
            vec![
                json!({"id": 0, "src": "n1", "dest": "c1", "body": {"type": "init_ok", "in_reply_to": 1}}),
                json!({"id": 1, "src": "n1", "dest": "c1", "body": {"type": "echo_ok", "in_reply_to": 2, "echo": "hi", "msg_id": 2}}),
            ]
        );
    }

    #[tokio::test]
    async fn echo_before_init_is_dropped() {
        let replies = run(&[
            r#"{"src":"c1","dest":"n1","body":{"type":"echo","msg_id":1,"echo":"early"}}"#,
            r#"{"src":"c2","dest":"n4","body":{"type":"init","node_id":"n4","msg_id":2}}"#,
            r#"{"src":"c2","dest":"n4","body":{"type":"generate","msg_id":3}}"#,
            r#"{"src":"c2","dest":"n4","body":{"type":"echo","msg_id":4,"echo":[1,null]}}"#,
        ])
        .await;

        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0]["body"]["type"], json!("init_ok"));
        assert_eq!(replies[1]["id"], json!(1));
        assert_eq!(replies[1]["src"], json!("n4"));
        assert_eq!(replies[1]["body"]["echo"], json!([1, null]));
    }
}
