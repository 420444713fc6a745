use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sheetstash")]
#[command(author, version, about = "Telegram bot that collects account records into per-user spreadsheets", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot
    Run {
        /// Override the data directory (defaults to DATA_DIR env or "data_sps")
        #[arg(long)]
        data_dir: Option<String>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
