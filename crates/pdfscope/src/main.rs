use crate::prelude::*;
use clap::Parser;

mod error;
mod outline;
mod prelude;
mod rank;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Heading outlines and persona-driven section ranking for PDF documents"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "PDFSCOPE_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Extract the title and H1/H2/H3 heading outline of PDF files
    Outline(crate::outline::OutlineArgs),

    /// Rank document sections by relevance to a persona and task
    Rank(crate::rank::RankArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let app = App::parse();

    let level = if app.global.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    color_eyre::install()?;

    match app.command {
        SubCommands::Outline(args) => crate::outline::run(args, app.global).await,
        SubCommands::Rank(args) => crate::rank::run(args, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
