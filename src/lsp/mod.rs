//! Language Server Protocol front end for mdlink
//!
//! Exposes markdown link-target completion to editors over LSP. Built into
//! the main mdlink binary and started with `mdlink server`.

pub mod server;
pub mod types;
pub mod workspace;

pub use server::MdlinkLanguageServer;
pub use types::MdlinkLspConfig;
pub use workspace::ServerWorkspace;

use anyhow::Result;
use tokio::net::TcpListener;
use tower_lsp::{LspService, Server};

#[cfg(test)]
mod tests;

/// Start the Language Server Protocol server on stdio
/// This is the main entry point for `mdlink server`
pub async fn start_server() -> Result<()> {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(MdlinkLanguageServer::new);

    log::info!("Starting mdlink Language Server Protocol server");

    Server::new(stdin, stdout, socket).serve(service).await;

    Ok(())
}

/// Start the LSP server over TCP (useful for debugging)
pub async fn start_tcp_server(port: u16) -> Result<()> {
    let listener = TcpListener::bind(format!("127.0.0.1:{port}")).await?;
    log::info!("mdlink LSP server listening on 127.0.0.1:{port}");

    loop {
        let (stream, _) = listener.accept().await?;
        let (service, socket) = LspService::new(MdlinkLanguageServer::new);

        tokio::spawn(async move {
            let (read, write) = tokio::io::split(stream);
            Server::new(read, write, socket).serve(service).await;
        });
    }
}
