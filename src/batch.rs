use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::fs;
use tokio::io::{self, AsyncRead, AsyncReadExt};
use tracing::{debug, warn};

use crate::cli::BatchArgs;
use crate::login::normalize_login;
use crate::serial::{LoginPolicy, calculate_serial_with};

#[derive(Debug, Serialize)]
pub struct BatchSummary {
    pub policy: LoginPolicy,
    pub total: usize,
    pub generated: usize,
    pub rejected: usize,
    pub entries: Vec<BatchEntry>,
}

/// Outcome for one input line. Exactly one of `serial` and `error` is set.
#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub line: usize,
    pub login: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub async fn run(args: BatchArgs) -> Result<BatchSummary> {
    let raw = read_input(&args.input).await?;
    Ok(summarize(&raw, args.policy))
}

async fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path == Path::new("-") {
        return read_stream(&mut io::stdin()).await;
    }
    fs::read(path)
        .await
        .with_context(|| format!("failed to read logins from {}", path.display()))
}

async fn read_stream<R>(reader: &mut R) -> Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut raw = Vec::new();
    reader
        .read_to_end(&mut raw)
        .await
        .context("failed to read logins from stdin")?;
    Ok(raw)
}

/// Compute a serial for every non-empty line of `raw`. Rejected logins are
/// recorded and never abort the batch.
pub fn summarize(raw: &[u8], policy: LoginPolicy) -> BatchSummary {
    let mut entries = Vec::new();
    let mut generated = 0usize;
    let mut rejected = 0usize;

    for (idx, line) in raw.split(|&b| b == b'\n').enumerate() {
        let login = normalize_login(line);
        if login.is_empty() {
            continue;
        }
        let rendered = String::from_utf8_lossy(login).into_owned();
        let entry = match calculate_serial_with(login, policy) {
            Ok(serial) => {
                debug!(line = idx + 1, serial, "computed serial");
                generated += 1;
                BatchEntry {
                    line: idx + 1,
                    login: rendered,
                    serial: Some(serial),
                    error: None,
                }
            }
            Err(err) => {
                warn!(line = idx + 1, error = %err, "rejected login");
                rejected += 1;
                BatchEntry {
                    line: idx + 1,
                    login: rendered,
                    serial: None,
                    error: Some(err.to_string()),
                }
            }
        };
        entries.push(entry);
    }

    BatchSummary {
        policy,
        total: entries.len(),
        generated,
        rejected,
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_accepted_and_rejected_lines() {
        let summary = summarize(b"abcd\nabc\n\nlevelsix\n", LoginPolicy::Relaxed);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.generated, 2);
        assert_eq!(summary.rejected, 1);

        let lines: Vec<usize> = summary.entries.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![1, 2, 4]);
        assert_eq!(summary.entries[0].serial, Some(6_230_372));
        assert_eq!(
            summary.entries[1].error.as_deref(),
            Some("login must be at least 4 characters")
        );
        assert_eq!(summary.entries[2].serial, Some(6_234_482));
    }

    #[tokio::test]
    async fn reads_whole_stream() {
        let mut input: &[u8] = b"abcd\nxxxx\n";
        let raw = read_stream(&mut input).await.expect("read stream");
        let summary = summarize(&raw, LoginPolicy::Relaxed);
        assert_eq!(summary.generated, 2);
        assert!(input.is_empty());
    }

    #[test]
    fn binary_policy_applies_to_each_line() {
        let summary = summarize(b"abcd\nlevelsix", LoginPolicy::Binary);
        assert_eq!(summary.generated, 1);
        assert_eq!(summary.rejected, 1);
        assert!(summary.entries[0].serial.is_none());
    }
}
