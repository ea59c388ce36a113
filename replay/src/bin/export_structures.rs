use std::fs;
use std::path::PathBuf;

use chanlun::{ChanAnalyzer, ChanConfig, init_logging, load_bars_csv};
use replay::build_payload;
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!(
            "usage: cargo run -p replay --bin export_structures -- <csv_path> [config.yaml|config.json] [output_json]"
        );
        std::process::exit(2);
    }

    let csv_path = PathBuf::from(&args[1]);
    let config = match args.get(2) {
        Some(path) => ChanConfig::from_file(path)?,
        None => ChanConfig::default(),
    };
    let output = match args.get(3) {
        Some(path) => PathBuf::from(path),
        None => {
            let stem = csv_path
                .file_stem()
                .and_then(|x| x.to_str())
                .unwrap_or("bars");
            PathBuf::from(format!("replay/structures-{}.json", stem))
        }
    };

    let sbars = load_bars_csv(&csv_path)?;
    info!(path = %csv_path.display(), bars = sbars.len(), "loaded bars");

    let analysis = ChanAnalyzer::new(config).analyze(&sbars);
    let payload = build_payload(&sbars, &analysis);

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output, serde_json::to_vec_pretty(&payload)?)?;

    println!(
        "exported {} bars to {} (cbar={}, stroke={}, segment={}, pivot={}, signal={}, trend={})",
        payload.candles.len(),
        output.display(),
        payload.cbar_candles.len(),
        payload.strokes.len(),
        payload.segments.len(),
        payload.pivots.len(),
        payload.signals.len(),
        payload.trend,
    );

    Ok(())
}
