use crate::prelude::*;
use clap::Parser;

mod error;
mod prelude;
mod report;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Sorted report of call number, title and extent from a catalog search export.\n\n\
                  Prints the report to the console and optionally writes it to a CSV file."
)]
pub struct App {
    #[clap(flatten)]
    pub options: crate::report::ReportOptions,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "SOLR_REPORT_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    color_eyre::install()?;

    let app = App::parse();

    crate::report::run(app.options, app.global)
}
