use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::error::{Error, Result};
use crate::message::Message;
use crate::node::{Handling, Node};
use crate::sender::Sender;

pub struct Runtime;

/// Result of feeding one input line to a node.
#[derive(Debug)]
pub enum LineOutcome {
    Handled,
    Ignored(&'static str),
    /// The line did not decode into a message.
    Malformed(Error),
    /// The message decoded but its handler gave up. Nothing was replied.
    Failed(Error),
}

impl Runtime {
    /// Feeds every line of `reader` to a fresh `N`, one at a time, writing whatever it sends to
    /// `writer`. Returns the writer once input has ended and every queued message is flushed.
    pub async fn start<N, R, W>(reader: R, writer: W) -> Result<W>
    where
        N: Node,
        R: AsyncRead + Unpin,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<Message<N::Payload>>();
        let write_task = tokio::spawn(write_loop(writer, rx));

        let mut node = N::default();
        let mut sender = Sender::new(tx);
        let mut lines = BufReader::new(reader).split(b'\n');

        loop {
            let line = match lines.next_segment().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(error) => {
                    tracing::error!(%error, "failed reading from input stream");
                    break;
                }
            };

            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            match Self::process_line(&mut node, &mut sender, &line) {
                LineOutcome::Handled => {}
                LineOutcome::Ignored(kind) => {
                    tracing::debug!(kind, "dropping message that needs no handling");
                }
                LineOutcome::Malformed(error) => {
                    tracing::warn!(
                        %error,
                        line = %String::from_utf8_lossy(&line),
                        "skipping malformed input line"
                    );
                }
                LineOutcome::Failed(error) => {
                    tracing::warn!(%error, "failed handling message");
                }
            }
        }

        tracing::debug!(sent = sender.next_id(), "input closed, draining output");
        drop(sender);
        write_task.await?
    }

    /// Decodes and handles a single line.
    pub fn process_line<N: Node>(
        node: &mut N,
        sender: &mut Sender<N::Payload>,
        line: &[u8],
    ) -> LineOutcome {
        let message: Message<N::Payload> = match serde_json::from_slice(line) {
            Ok(message) => message,
            Err(error) => return LineOutcome::Malformed(error.into()),
        };
        tracing::debug!(src = %message.src, msg_id = ?message.body.msg_id, "received message");

        match node.handle_message(message, sender) {
            Ok(Handling::Processed) => LineOutcome::Handled,
            Ok(Handling::Ignored(kind)) => LineOutcome::Ignored(kind),
            Err(error) => LineOutcome::Failed(error),
        }
    }
}

async fn write_loop<W, T>(mut writer: W, mut rx: UnboundedReceiver<T>) -> Result<W>
where
    T: Serialize,
    W: AsyncWrite + Unpin,
{
    while let Some(message) = rx.recv().await {
        let mut bytes = serde_json::to_vec(&message)?;
        bytes.push(b'\n');
        writer.write_all(&bytes).await?;
        writer.flush().await?;
    }

    Ok(writer)
}
