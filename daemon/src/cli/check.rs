use anyhow::Result;
use common::config::ServiceConfig;
use log::{error, info};
use postgres::wrapper::{check_tools, REQUIRED_TOOLS};
use postgres::ProcessInvoker;

pub async fn execute(config: &ServiceConfig) -> Result<()> {
    info!("Checking for {}", REQUIRED_TOOLS.join(", "));
    let runner = ProcessInvoker::new(config.command_timeout());
    if let Err(e) = check_tools(&runner).await {
        error!("{e}");
        return Err(e.into());
    }
    info!("All PostgreSQL client tools are available");
    Ok(())
}
