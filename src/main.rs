// src/main.rs

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use log::{debug, info};

use pico_canvas::{
    assets::Assets,
    color::DisplayPalette,
    config::{Config, OutputFormat},
    host::Host,
    record::{FrameSink, GifRecorder, PpmSequence},
    replay::{self, DrawScript, ScriptedGame},
};

const USAGE: &str = "usage: pico-canvas <script.json> [-c config.json] [-a actions] \
[-p preactions] [-o output] [--format gif|ppm] [--assets pack.json] [--scale n]";

/// Command-line arguments. Anything given here overrides the config file.
#[derive(Debug, Default)]
struct Args {
    script: PathBuf,
    config: Option<PathBuf>,
    actions: Option<String>,
    preactions: Option<String>,
    output: Option<PathBuf>,
    format: Option<OutputFormat>,
    assets: Option<PathBuf>,
    scale: Option<u32>,
}

impl Args {
    fn parse<I: Iterator<Item = String>>(mut argv: I) -> anyhow::Result<Self> {
        let mut args = Args::default();
        let mut script = None;
        while let Some(arg) = argv.next() {
            let mut value = |flag: &str| {
                argv.next()
                    .with_context(|| format!("{} expects a value\n{}", flag, USAGE))
            };
            match arg.as_str() {
                "-c" | "--config" => args.config = Some(value(&arg)?.into()),
                "-a" | "--action" => args.actions = Some(value(&arg)?),
                "-p" | "--preact" => args.preactions = Some(value(&arg)?),
                "-o" | "--output" => args.output = Some(value(&arg)?.into()),
                "--format" => {
                    args.format = Some(match value(&arg)?.as_str() {
                        "gif" => OutputFormat::Gif,
                        "ppm" => OutputFormat::Ppm,
                        other => bail!("unknown output format {:?}\n{}", other, USAGE),
                    });
                }
                "--assets" => args.assets = Some(value(&arg)?.into()),
                "--scale" => {
                    let raw = value(&arg)?;
                    args.scale = Some(raw.parse().with_context(|| format!("invalid scale {:?}", raw))?);
                }
                "-h" | "--help" => bail!("{}", USAGE),
                _ if arg.starts_with('-') => bail!("unknown option {}\n{}", arg, USAGE),
                _ if script.is_none() => script = Some(PathBuf::from(&arg)),
                _ => bail!("unexpected argument {}\n{}", arg, USAGE),
            }
        }
        args.script = script.with_context(|| format!("missing draw script\n{}", USAGE))?;
        Ok(args)
    }

    fn apply(self, config: &mut Config) -> PathBuf {
        if let Some(actions) = self.actions {
            config.replay.actions = actions;
        }
        if let Some(preactions) = self.preactions {
            config.replay.preactions = preactions;
        }
        if let Some(output) = self.output {
            config.replay.output = output;
        }
        if let Some(format) = self.format {
            config.replay.format = format;
        }
        if let Some(scale) = self.scale {
            config.replay.scale = scale;
        }
        if self.assets.is_some() {
            config.assets.path = self.assets;
        }
        self.script
    }
}

/// Opens the configured frame destination, creating directories as needed.
fn open_sink(
    format: OutputFormat,
    output: &Path,
    palette: &DisplayPalette,
    scale: u32,
) -> anyhow::Result<Box<dyn FrameSink>> {
    match format {
        OutputFormat::Gif => {
            if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating output directory {}", parent.display()))?;
            }
            let file = File::create(output).with_context(|| format!("creating {}", output.display()))?;
            Ok(Box::new(GifRecorder::new(BufWriter::new(file), palette, scale)?))
        }
        OutputFormat::Ppm => {
            fs::create_dir_all(output)
                .with_context(|| format!("creating output directory {}", output.display()))?;
            Ok(Box::new(PpmSequence::new(output.to_path_buf(), palette.clone(), scale)?))
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let args = Args::parse(std::env::args().skip(1))?;

    // --- Configuration ---
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let script_path = args.apply(&mut config);
    debug!("Effective config: {:?}", config.replay);

    // --- Inputs ---
    let assets = match &config.assets.path {
        Some(path) => Assets::load(path)?,
        None => {
            info!("No asset pack given; sprite, text and map calls draw nothing.");
            Assets::default()
        }
    };
    let script = DrawScript::load(&script_path)?;
    let preactions = replay::parse_actions(&config.replay.preactions).context("parsing preactions")?;
    let actions = replay::parse_actions(&config.replay.actions).context("parsing actions")?;

    let output = &config.replay.output;
    let mut sink = open_sink(config.replay.format, output, &config.display.palette, config.replay.scale)?;

    // --- Replay ---
    let mut host = Host::new(assets);
    let mut game = ScriptedGame::new(script);
    host.start(&mut game);

    let written = replay::run(&mut host, &mut game, &preactions, &actions, |_, frame| {
        sink.record(frame)
    })?;
    sink.finish()?;

    info!("Wrote {} frames to {}", written, output.display());
    Ok(())
}
