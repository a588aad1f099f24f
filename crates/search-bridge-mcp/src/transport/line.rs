//! Newline-delimited JSON-RPC over any async byte stream.

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::types::{
    JsonRpcMessage, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, LogLevel,
    LogMessageParams, McpError, McpResult, RequestId, LOG_MESSAGE,
};

use super::{framing, Transport};

/// Longest line accepted from a tool server, newline included.
pub const MAX_LINE_BYTES: usize = 4 * 1024 * 1024;

/// Client end of a line-framed JSON-RPC stream.
///
/// Requests are answered strictly in order: the transport reads until it
/// sees the response carrying its id, handling anything else on the way.
pub struct LineTransport<R, W> {
    reader: R,
    writer: W,
    next_id: i64,
    line: String,
}

impl<R, W> LineTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            next_id: 1,
            line: String::new(),
        }
    }

    async fn write(&mut self, value: &impl serde::Serialize) -> McpResult<()> {
        let framed = framing::frame_message(value)?;
        self.writer.write_all(framed.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }

    async fn read_message(&mut self) -> McpResult<JsonRpcMessage> {
        loop {
            self.line.clear();
            let bytes_read = (&mut self.reader)
                .take(MAX_LINE_BYTES as u64)
                .read_line(&mut self.line)
                .await?;
            if bytes_read == 0 {
                return Err(McpError::Closed);
            }
            if bytes_read == MAX_LINE_BYTES && !self.line.ends_with('\n') {
                return Err(McpError::Transport(format!(
                    "line from tool server exceeds {MAX_LINE_BYTES} bytes"
                )));
            }

            let trimmed = self.line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match framing::parse_message(trimmed) {
                Ok(msg) => return Ok(msg),
                // Launchers like npx sometimes print banners on stdout.
                Err(e) => tracing::debug!("Skipping non-protocol line: {e}"),
            }
        }
    }

    /// Answer a request the server sent us while we wait on our own.
    async fn answer_server_request(&mut self, request: JsonRpcRequest) -> McpResult<()> {
        if request.method == "ping" {
            let pong = JsonRpcResponse::new(request.id, Value::Object(serde_json::Map::new()));
            return self.write(&pong).await;
        }

        tracing::debug!("Rejecting server request '{}'", request.method);
        let err = McpError::MethodNotFound(request.method).to_json_rpc_error(request.id);
        self.write(&err).await
    }
}

fn log_server_notification(notification: &JsonRpcNotification) {
    if notification.method != LOG_MESSAGE {
        tracing::debug!("Ignoring notification '{}'", notification.method);
        return;
    }

    let Some(params) = notification
        .params
        .clone()
        .and_then(|p| serde_json::from_value::<LogMessageParams>(p).ok())
    else {
        return;
    };

    let logger = params.logger.as_deref().unwrap_or("tool");
    match params.level {
        LogLevel::Debug => tracing::debug!("[{logger}] {}", params.data),
        LogLevel::Info | LogLevel::Notice => tracing::info!("[{logger}] {}", params.data),
        LogLevel::Warning => tracing::warn!("[{logger}] {}", params.data),
        _ => tracing::error!("[{logger}] {}", params.data),
    }
}

#[async_trait]
impl<R, W> Transport for LineTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn request(&mut self, method: &str, params: Option<Value>) -> McpResult<Value> {
        let id = self.next_id;
        self.next_id += 1;
        let expected = RequestId::Number(id);

        tracing::debug!("-> {method} (id {id})");
        self.write(&JsonRpcRequest::new(id, method, params)).await?;

        loop {
            match self.read_message().await? {
                JsonRpcMessage::Response(resp) if resp.id == expected => return Ok(resp.result),
                JsonRpcMessage::Error(err) if err.id == expected => return Err(err.error.into()),
                JsonRpcMessage::Request(req) => self.answer_server_request(req).await?,
                JsonRpcMessage::Notification(n) => log_server_notification(&n),
                other => {
                    let stray = other.id().map(ToString::to_string).unwrap_or_default();
                    tracing::debug!("Skipping message for id {stray} while waiting on {id}");
                }
            }
        }
    }

    async fn notify(&mut self, method: &str, params: Option<Value>) -> McpResult<()> {
        tracing::debug!("-> {method} (notification)");
        self.write(&JsonRpcNotification::new(method, params)).await
    }

    async fn close(&mut self) -> McpResult<()> {
        self.writer.shutdown().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{BufReader, DuplexStream, ReadHalf, WriteHalf};

    type TestTransport = LineTransport<BufReader<ReadHalf<DuplexStream>>, WriteHalf<DuplexStream>>;

    fn pair() -> (TestTransport, DuplexStream) {
        let (client_io, server_io) = tokio::io::duplex(64 * 1024);
        let (read, write) = tokio::io::split(client_io);
        (LineTransport::new(BufReader::new(read), write), server_io)
    }

    #[tokio::test]
    async fn test_oversized_line_is_transport_error() {
        let (mut transport, mut server) = pair();

        // One endless line with no newline.
        tokio::spawn(async move {
            let chunk = vec![b'a'; 64 * 1024];
            while server.write_all(&chunk).await.is_ok() {}
        });

        let err = transport.request("tools/list", None).await.unwrap_err();
        assert!(matches!(err, McpError::Transport(ref m) if m.contains("exceeds")), "got: {err}");
    }

    #[tokio::test]
    async fn test_final_line_without_newline_is_read() {
        let (mut transport, server) = pair();

        tokio::spawn(async move {
            let (read, mut write) = tokio::io::split(server);
            let mut request = String::new();
            BufReader::new(read).read_line(&mut request).await.unwrap();
            write
                .write_all(br#"{"jsonrpc":"2.0","id":1,"result":{"ok":true}}"#)
                .await
                .unwrap();
        });

        let result = transport.request("ping", None).await.unwrap();
        assert_eq!(result["ok"], true);
    }
}
