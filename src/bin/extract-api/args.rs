use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "extract-api",
    about = "Serve GET /api/extract: fetch a document and return its article text as JSON"
)]
pub struct CliArgs {
    /// Path to the TOML config file
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,
    /// Listen address, overrides `server.bind`
    #[arg(long, short = 'b')]
    pub bind: Option<String>,
}
