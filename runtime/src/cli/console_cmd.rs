//! `paperflow console <url>`: print what a page logs to its console.

use anyhow::Result;
use std::time::Duration;

use super::output::{is_json, print_json, say};
use crate::acquisition::console::{format_call, hook_script, CaptureMode, READ_LOGS_SCRIPT};
use crate::config::Config;
use crate::renderer::chromium::ChromiumRenderer;
use crate::renderer::Renderer;

/// Run the console command.
pub async fn run(url: &str, wait_secs: u64) -> Result<()> {
    let config = Config::load();
    let renderer = ChromiumRenderer::launch(config.chromium_path.as_ref()).await?;
    let mut ctx = renderer.new_context().await?;

    let result = async {
        say(format!("Opening {url}..."));
        ctx.navigate(url, 30_000).await?;
        ctx.wait_until_ready(Duration::from_secs(10)).await?;
        ctx.execute_js(hook_script(CaptureMode::All)).await?;
        tokio::time::sleep(Duration::from_secs(wait_secs)).await;
        ctx.execute_js(READ_LOGS_SCRIPT).await
    }
    .await;

    let _ = ctx.close().await;
    let _ = renderer.shutdown().await;
    let logs = result?;

    if is_json() {
        print_json(&logs);
        return Ok(());
    }
    match logs.as_array() {
        Some(calls) if !calls.is_empty() => {
            for call in calls {
                println!("[LOG] {}", format_call(call));
            }
        }
        _ => say("No console output captured."),
    }
    Ok(())
}
