/// facemorph terminal viewer - synthesise faces and explore them
///
/// Usage: facemorph-terminal [--settings FILE] [ID=WEIGHT ...]
///
/// Each identity (e.g. `001`) is parsed against the average face; several
/// identities are blended with their weights. Without identities the first
/// three are blended equally.
///
/// Controls:
///   - Arrow keys / PageUp / PageDown: Rotate the face
///   - W/S: Zoom (focal distance in perspective mode)
///   - O/P: Orthographic / perspective projection
///   - D/F: Directional / point light
///   - M: Toggle lighting
///   - Q/ESC: Quit

use std::env;
use std::io;
use std::path::PathBuf;

use facemorph_core::{Face, ModelAssets, MorphError, Settings};
use facemorph_terminal::TerminalApp;
use log::{info, warn};

const DEFAULT_IDENTITIES: [&str; 3] = ["001", "002", "003"];

fn invalid_data(e: MorphError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e.to_string())
}

fn invalid_input(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, message)
}

fn parse_args(args: &[String]) -> io::Result<(Option<PathBuf>, Vec<(String, f64)>)> {
    let mut settings = None;
    let mut identities = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--settings" {
            let path = iter
                .next()
                .ok_or_else(|| invalid_input("--settings needs a file".to_string()))?;
            settings = Some(PathBuf::from(path));
            continue;
        }
        let (id, weight) = arg
            .split_once('=')
            .ok_or_else(|| invalid_input(format!("expected ID=WEIGHT, got {:?}", arg)))?;
        let weight: f64 = weight
            .parse()
            .map_err(|_| invalid_input(format!("weight {:?} is not a number", weight)))?;
        identities.push((id.to_string(), weight));
    }
    if identities.is_empty() {
        let w = 1.0 / DEFAULT_IDENTITIES.len() as f64;
        identities = DEFAULT_IDENTITIES.iter().map(|id| (id.to_string(), w)).collect();
    }
    Ok((settings, identities))
}

fn build_face(
    assets: &ModelAssets,
    settings: &Settings,
    identities: &[(String, f64)],
) -> Result<Face, MorphError> {
    let faces = identities
        .iter()
        .map(|(id, _)| assets.load_identity(settings, id))
        .collect::<Result<Vec<_>, _>>()?;
    if let [face] = faces.as_slice() {
        return Ok(face.clone());
    }

    let weights: Vec<f64> = identities.iter().map(|(_, w)| *w).collect();
    let total: f64 = weights.iter().sum();
    if (total - 1.0).abs() > 1e-6 {
        warn!("synthesis weights sum to {}, not 1", total);
    }
    let refs: Vec<&Face> = faces.iter().collect();
    Face::synthesise(&refs, &weights)
}

fn main() -> io::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (settings_path, identities) = parse_args(&args)?;

    let settings = match settings_path {
        Some(path) => Settings::load(&path).map_err(invalid_data)?,
        None => Settings::default(),
    };

    println!("facemorph - Loading model...");
    let assets = ModelAssets::load(&settings).map_err(invalid_data)?;
    let face = build_face(&assets, &settings, &identities).map_err(invalid_data)?;

    let description: Vec<String> = identities
        .iter()
        .map(|(id, w)| format!("{:.2}*{}", w, id))
        .collect();
    info!("synthesised {}", description.join(" + "));
    println!("Showing {} (press Q to quit)...", description.join(" + "));
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(face, settings)?;
    app.run()?;

    Ok(())
}
