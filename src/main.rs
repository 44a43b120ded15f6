mod app;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Mind map file, loaded at start and written on save.
    #[arg(long, default_value = "mindmap.json")]
    graph: PathBuf,
    /// Center word for a fresh map when no saved map exists.
    #[arg(long, default_value = "light")]
    seed: String,
    /// Word list used to expand nodes.
    #[arg(long, default_value = "assets/lexicon.json")]
    lexicon: PathBuf,
    /// Engine tunables as JSON; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory for exported snapshots.
    #[arg(long, default_value = "exports")]
    export_dir: PathBuf,
}

fn main() -> eframe::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let launch = app::Launch {
        graph_path: args.graph,
        seed: args.seed,
        lexicon_path: args.lexicon,
        config_path: args.config,
        export_dir: args.export_dir,
    };
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "word-orbit",
        options,
        Box::new(move |cc| Ok(Box::new(app::MindMapApp::new(cc, launch)))),
    )
}
