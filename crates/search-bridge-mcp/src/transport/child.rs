//! Child-process transport: spawns a tool server and speaks to its stdio.

use std::process::Stdio;

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::BufReader;
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

use crate::types::{McpError, McpResult};

use super::{LineTransport, Transport};

/// A tool server running as a subprocess.
///
/// stdin/stdout carry the protocol; stderr is passed through to ours.
pub struct ChildProcessTransport {
    command: String,
    child: Child,
    io: LineTransport<BufReader<ChildStdout>, ChildStdin>,
}

impl ChildProcessTransport {
    pub fn spawn(command: &str, args: &[String]) -> McpResult<Self> {
        tracing::info!("Launching tool server: {command} {}", args.join(" "));

        let mut child = Command::new(command)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| McpError::Spawn {
                command: command.to_string(),
                source,
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| McpError::Transport("child stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| McpError::Transport("child stdout unavailable".to_string()))?;

        Ok(Self {
            command: command.to_string(),
            child,
            io: LineTransport::new(BufReader::new(stdout), stdin),
        })
    }

    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }
}

#[async_trait]
impl Transport for ChildProcessTransport {
    async fn request(&mut self, method: &str, params: Option<Value>) -> McpResult<Value> {
        self.io.request(method, params).await
    }

    async fn notify(&mut self, method: &str, params: Option<Value>) -> McpResult<()> {
        self.io.notify(method, params).await
    }

    async fn close(&mut self) -> McpResult<()> {
        // A server that already exited leaves a broken pipe behind; that is fine.
        if let Err(e) = self.io.close().await {
            tracing::debug!("Closing stdin of {}: {e}", self.command);
        }

        if self.child.try_wait()?.is_none() {
            self.child.start_kill()?;
        }
        let status = self.child.wait().await?;
        tracing::debug!("Tool server {} exited with {status}", self.command);
        Ok(())
    }
}
