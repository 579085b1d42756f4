use anyhow::Result;
use clap::Parser;

use crate::deploy::{deploy_cmd, DeployArgs};

mod deploy;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
enum Args {
    /// Build the deployable archive database
    Deploy(DeployArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    match args {
        Args::Deploy(args) => deploy_cmd(args).await,
    }
}
