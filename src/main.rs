mod app;
mod market;
mod sim;
mod util;

use std::path::PathBuf;

use clap::Parser;

use crate::market::DataSource;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON file with the instrument records
    #[arg(long, conflicts_with = "data_command")]
    data_file: Option<PathBuf>,
    /// Shell command printing the instrument records as JSON
    #[arg(long)]
    data_command: Option<String>,
    /// Seed for bubble placement and initial velocities
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn data_source(&self) -> DataSource {
        if let Some(path) = &self.data_file {
            DataSource::File(path.clone())
        } else if let Some(command) = &self.data_command {
            DataSource::Command(command.clone())
        } else {
            DataSource::Fallback
        }
    }
}

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let source = args.data_source();
    let seed = args.seed;
    log::info!("starting market-bubbles with {} data", source.label());

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 820.0]),
        ..Default::default()
    };

    eframe::run_native(
        "B3 Market Physics",
        options,
        Box::new(move |cc| Ok(Box::new(app::MarketBubblesApp::new(cc, source.clone(), seed)))),
    )
}
