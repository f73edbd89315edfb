//! External document parser invocation.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use anyhow::Context;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use flytax_core::models::config::ParserConfig;

/// Run the configured parser on `document` and return what it printed.
///
/// Stdout is preferred; when it is empty, stderr is returned instead so that
/// parsers reporting on the wrong stream still feed the resolver.
pub async fn run_parser(config: &ParserConfig, document: &Path) -> anyhow::Result<String> {
    let mut command = Command::new(&config.program);
    command
        .args(&config.args)
        .arg(document)
        .stdin(Stdio::null())
        .kill_on_drop(true);

    debug!(
        "Running parser: {} {} {}",
        config.program,
        config.args.join(" "),
        document.display()
    );

    let output = timeout(Duration::from_secs(config.timeout_secs), command.output())
        .await
        .map_err(|_| {
            anyhow::anyhow!(
                "Parser '{}' timed out after {}s",
                config.program,
                config.timeout_secs
            )
        })?
        .with_context(|| format!("Failed to run parser '{}'", config.program))?;

    if !output.status.success() {
        warn!("Parser exited with {}", output.status);
    }

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if !stdout.is_empty() {
        return Ok(stdout);
    }

    Ok(String::from_utf8_lossy(&output.stderr).trim().to_string())
}
