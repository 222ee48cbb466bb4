//! CLI tool for xlinteract - replays an input script headlessly and outputs JSON
//!
//! Usage:
//!   xlinteract_replay <script.json>              # Output JSON to stdout
//!   xlinteract_replay <script.json> -o out.json  # Output JSON to file
//!   xlinteract_replay - < script.json            # Read the script from stdin
//!
//! A script is `{ "sheet": {...}, "config": {...}, "canvas": [w, h], "events": [...] }`;
//! only `sheet` is required. Set `RUST_LOG=xlinteract=debug` to trace the
//! engine on stderr.

use std::collections::VecDeque;
use std::env;
use std::fs;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::EnvFilter;
use xlinteract::{
    ActiveSelection, Drawings, EngineConfig, InputEvent, InteractError, InteractionEngine,
    InteractiveObject, MemorySheet, Mutation, Preview, RecordingNotifier, RecordingSink,
    SheetSetup, ViewportWindow,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Script {
    sheet: SheetSetup,
    #[serde(default)]
    config: EngineConfig,
    /// Canvas size in physical pixels
    #[serde(default)]
    canvas: Option<(f32, f32)>,
    #[serde(default)]
    events: Vec<InputEvent>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    events: usize,
    selection: &'a ActiveSelection,
    viewport: &'a ViewportWindow,
    zoom: f32,
    preview: Option<Preview>,
    history: &'a [Mutation],
    objects: &'a [InteractiveObject],
    full_redraws: usize,
    overlay_redraws: usize,
    toasts: &'a [String],
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let Some(input_path) = args.get(1) else {
        eprintln!("Usage: xlinteract_replay <script.json|-> [-o output.json]");
        return ExitCode::FAILURE;
    };
    let output_path = match (args.get(2), args.get(3)) {
        (Some(flag), Some(path)) if flag == "-o" => Some(path.as_str()),
        _ => None,
    };

    match run(input_path, output_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(input_path: &str, output_path: Option<&str>) -> Result<(), InteractError> {
    let text = if input_path == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        text
    } else {
        fs::read_to_string(input_path)?
    };
    let script: Script = serde_json::from_str(&text)?;

    let sheet = MemorySheet::from_setup(&script.sheet)?;
    let mut engine = InteractionEngine::new(
        sheet,
        RecordingSink::new(),
        RecordingNotifier::new(),
        script.config,
    )?;
    if let Some((width, height)) = script.canvas {
        engine.resize(width, height);
    }
    let mut events: VecDeque<InputEvent> = script.events.into_iter().collect();
    let count = engine.run(&mut events);
    info!(events = count, "replay finished");

    let report = Report {
        events: count,
        selection: engine.selection(),
        viewport: engine.viewport(),
        zoom: engine.zoom(),
        preview: engine.preview(),
        history: engine.sheet().history(),
        objects: engine.sheet().objects(),
        full_redraws: engine.sink().full_count(),
        overlay_redraws: engine.sink().overlay_count(),
        toasts: &engine.notifier().messages,
    };
    let json = serde_json::to_string_pretty(&report)?;

    match output_path {
        Some(path) => {
            fs::write(path, &json)?;
            eprintln!("Written: {path}");
        }
        None => {
            let mut stdout = io::stdout();
            stdout.write_all(json.as_bytes())?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}
