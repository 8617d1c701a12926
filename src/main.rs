mod app;
mod scenario;
mod util;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to the scenario JSON file to edit.
    #[arg(long, default_value = "scenario.json")]
    scenario: String,
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "fronteira",
        options,
        Box::new(move |cc| Ok(Box::new(app::FronteiraApp::new(cc, args.scenario.clone())))),
    )
}
