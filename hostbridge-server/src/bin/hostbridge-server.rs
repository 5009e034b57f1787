use anyhow::Context;
use hostbridge_server::{
    init_console_logging, init_logging, DesktopFileSystem, DesktopOs, Server, ServerConfig,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?;

    match &config.log_dir {
        Some(dir) => init_logging(dir, "hostbridge-server", &config.log_filter)?,
        None => init_console_logging(&config.log_filter)?,
    }

    tracing::info!(
        namespace = %config.namespace,
        api_version = %config.api_version,
        "starting hostbridge server"
    );

    let server = Server::new(config);
    let bridges = server.mount_standard_bridges();

    bridges.os.set_delegate(Arc::new(DesktopOs));
    let file_system = DesktopFileSystem::from_current_dir("hostbridge")
        .context("failed to resolve the application folder")?;
    bridges.file_system.set_delegate(Arc::new(file_system));

    server.run().await
}
