use anyhow::Result;
use std::path::Path;

pub fn run(root: &Path, port: Option<u16>, open_browser: bool) -> Result<()> {
    let config = super::config_or_default(root)?;
    let port = port.unwrap_or(config.server.port);

    let rt = tokio::runtime::Runtime::new()?;
    let root_buf = root.to_path_buf();

    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
        let actual_port = listener.local_addr()?.port();
        println!("readiness server → http://localhost:{actual_port}  (PID {})", std::process::id());

        tokio::select! {
            res = readiness_server::serve_on(root_buf, listener, open_browser) => res,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                Ok(())
            }
        }
    })
}
