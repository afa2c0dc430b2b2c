//! # Ventes Dashboard Entry Point
//!
//! ## Usage
//! ```bash
//! cargo run -p ventes-dashboard
//!
//! # Explicit config file
//! cargo run -p ventes-dashboard -- --config ./ventes.toml
//! ```

use std::env;
use std::path::PathBuf;

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Usage: ventes-dashboard [--config <path>]");
                return;
            }
            _ => {}
        }
        i += 1;
    }

    if let Err(e) = ventes_dashboard::run(config_path).await {
        eprintln!("ventes-dashboard: {e}");
        std::process::exit(1);
    }
}
