pub mod backup;
pub mod check;
pub mod config;
pub mod restore;
pub mod run;

use anyhow::{bail, Result};

use crate::response::{ActionReply, Status};

/// Prints a one-shot reply the way the HTTP endpoint would send it.
fn report(reply: ActionReply) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&reply.body)?);
    match reply.body.status {
        Status::Ok | Status::Skipped => Ok(()),
        Status::Error => bail!(
            "{} failed: {}",
            reply.body.action,
            reply.body.message.unwrap_or_default()
        ),
    }
}
