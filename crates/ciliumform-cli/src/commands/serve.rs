//! Serve command

use clap::Args;
use tokio::io::BufReader;
use tracing::info;

use super::provider;
use crate::Result;

#[derive(Args, Debug)]
pub struct ServeArgs {}

pub async fn run(_args: ServeArgs) -> Result<()> {
    let provider = provider()?;
    info!("serving requests on stdin");
    ciliumform_provider::protocol::serve(
        &provider,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await?;
    Ok(())
}
