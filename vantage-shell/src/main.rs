//! vantage CLI binary
//!
//! Usage: vantage <path-to-model> [--ground-texture <path>] [--title <title>]

use clap::Parser;

#[derive(Parser)]
#[command(name = "vantage")]
#[command(about = "View a glTF model on a textured ground plane", long_about = None)]
struct Cli {
    /// Path to the glTF/GLB model to view
    model: String,

    /// Image tiled across the ground plane
    #[arg(long, default_value = "textures/grass.jpg")]
    ground_texture: String,

    /// Window title
    #[arg(long, default_value = "vantage")]
    title: String,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = vantage_shell::run(&cli.model, &cli.ground_texture, &cli.title) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
