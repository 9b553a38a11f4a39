//! Handler for the `server` command.

use anyhow::Result;

/// Run the language server until the client disconnects.
///
/// Stdio is the default transport; `--port` switches to TCP for debugging.
pub fn handle_server(port: Option<u16>, stdio: bool) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;

    runtime.block_on(async {
        match port {
            Some(port) if !stdio => mdlink::lsp::start_tcp_server(port).await,
            _ => mdlink::lsp::start_server().await,
        }
    })
}
