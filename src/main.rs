use std::path::PathBuf;

use clap::Parser;
use ytgrid::ui;

#[derive(Parser, Debug)]
#[command(about = "Browse youtubeGrid blocks of a markdown document")]
struct Args {
    /// Markdown document to open at startup
    document: Option<PathBuf>,

    /// Vault root (defaults to the nearest folder holding .obsidian)
    #[arg(long, value_name = "DIR")]
    vault: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();
    ytgrid::logging::init(args.verbose);

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1100.0, 720.0])
        .with_min_inner_size([520.0, 400.0]);
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        "ytgrid",
        native_options,
        Box::new(move |cc| Ok(Box::new(ui::AppState::new(cc, args.document, args.vault)))),
    )
}
