//! Provider subprocess protocol.
//!
//! Events come from external provider binaries (e.g.
//! `calnotify-provider-google`) speaking JSON over stdin/stdout. Any
//! executable that speaks the protocol can be a provider; providers manage
//! their own credentials.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use log::debug;
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

use super::protocol::{ProviderCommand, Request, Response};
use crate::error::{CalNotifyError, CalNotifyResult};

const PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug)]
pub struct Provider(String);

impl Provider {
    pub fn from_name(name: &str) -> Self {
        Provider(name.to_string())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn binary_name(&self) -> String {
        format!("calnotify-provider-{}", self.0)
    }

    fn binary_path(&self) -> CalNotifyResult<PathBuf> {
        let binary_name = self.binary_name();
        which::which(&binary_name).map_err(|_| CalNotifyError::ProviderNotInstalled(binary_name))
    }

    /// Run the provider with `cmd`, giving up after `PROVIDER_TIMEOUT`.
    pub async fn call<C: ProviderCommand>(&self, cmd: C) -> CalNotifyResult<C::Response> {
        let request = Request {
            command: C::command(),
            params: serde_json::to_value(cmd).map_err(|e| CalNotifyError::Serialization(e.to_string()))?,
        };

        let stdout = timeout(PROVIDER_TIMEOUT, self.exchange(&request))
            .await
            .map_err(|_| CalNotifyError::ProviderTimeout(PROVIDER_TIMEOUT.as_secs()))??;

        parse_response(&stdout)
    }

    /// Write one request line to the provider and collect its stdout.
    ///
    /// The provider's stderr is forwarded to the debug log; its last line is
    /// used as the error message when the provider exits unsuccessfully.
    async fn exchange(&self, request: &Request) -> CalNotifyResult<String> {
        let mut line =
            serde_json::to_vec(request).map_err(|e| CalNotifyError::Serialization(e.to_string()))?;
        line.push(b'\n');

        let binary_path = self.binary_path()?;
        debug!("Calling {} with {:?}", binary_path.display(), request.command);

        let mut child = TokioCommand::new(&binary_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| CalNotifyError::Provider(format!("Failed to spawn {}: {e}", self.binary_name())))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&line).await?;
        }

        let output = child.wait_with_output().await?;
        let stderr = String::from_utf8_lossy(&output.stderr);
        for message in stderr.lines() {
            debug!("[{}] {}", self.name(), message);
        }

        if !output.status.success() {
            let reason = stderr
                .lines()
                .rev()
                .find(|message| !message.trim().is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("exited with {}", output.status));
            return Err(CalNotifyError::Provider(format!("{}: {reason}", self.binary_name())));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn parse_response<R: DeserializeOwned>(stdout: &str) -> CalNotifyResult<R> {
    if stdout.trim().is_empty() {
        return Err(CalNotifyError::Provider("Provider returned no response".into()));
    }

    let response: Response<R> = serde_json::from_str(stdout)
        .map_err(|e| CalNotifyError::Provider(format!("Failed to parse response: {e}")))?;

    match response {
        Response::Success { data } => Ok(data),
        Response::Error { error } => Err(CalNotifyError::Provider(error)),
    }
}
