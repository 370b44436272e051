//! `hangboard-gesture` - replay a landmark script through the gesture pipeline
//!
//! Prints one JSON gesture event per line on stdout and exits once the stream has been
//! quiet for a moment.

use anyhow::{Context, Result, bail};
use hangboard_gesture::{
    config::ConfigManager,
    error::get_user_friendly_error,
    pipeline::Pipeline,
    source::{LandmarkScript, ReplayCamera, ReplayModelLoader},
    utils,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, mpsc};
use std::time::Duration;
use tracing::{error, info};

/// How long the event stream may stay silent before the replay is considered finished
const QUIET_PERIOD: Duration = Duration::from_secs(2);

const USAGE: &str = "Usage: hangboard-gesture <script.jsonl> [--front | --back]";

/// Command line arguments
#[derive(Debug)]
struct CliArgs {
    script: PathBuf,
    /// `None` uses the configured camera
    front_camera: Option<bool>,
}

impl CliArgs {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut script = None;
        let mut front_camera = None;

        for arg in args {
            match arg.as_str() {
                "--front" => front_camera = Some(true),
                "--back" => front_camera = Some(false),
                "-h" | "--help" => {
                    println!("{USAGE}");
                    std::process::exit(0);
                }
                flag if flag.starts_with('-') => bail!("Unknown option {flag}\n{USAGE}"),
                path => {
                    if script.replace(PathBuf::from(path)).is_some() {
                        bail!("Only one script may be given\n{USAGE}");
                    }
                }
            }
        }

        let Some(script) = script else {
            bail!("{USAGE}");
        };
        Ok(Self {
            script,
            front_camera,
        })
    }
}

fn main() -> Result<()> {
    let args = CliArgs::parse(std::env::args().skip(1))?;

    let home = ConfigManager::ensure_home_dir().context("Failed to create data directory")?;
    let config = ConfigManager::load().context("Failed to load configuration")?;
    utils::init_logging(&home, &config.logging).context("Failed to initialize logging system")?;

    let script = LandmarkScript::load(&args.script)
        .with_context(|| format!("Failed to read landmark script {}", args.script.display()))?;
    info!(
        "Replaying {} frames from {}",
        script.len(),
        args.script.display()
    );
    let script = Arc::new(script);

    let front_camera = args.front_camera.unwrap_or(config.camera.front_camera);
    let camera = ReplayCamera::for_script(&script, config.camera.replay_fps);
    let loader = ReplayModelLoader::new(Arc::clone(&script));
    let mut pipeline = Pipeline::new(config, Box::new(camera), Box::new(loader))
        .context("Failed to create gesture pipeline")?;

    let (events_tx, events) = mpsc::channel();
    if let Err(e) = pipeline.start(front_camera, events_tx) {
        error!("Failed to start gesture session: {e}");
        eprintln!("{}", get_user_friendly_error(&e));
        return Err(e).context("Failed to start gesture session");
    }

    let mut stdout = io::stdout().lock();
    while let Ok(event) = events.recv_timeout(QUIET_PERIOD) {
        serde_json::to_writer(&mut stdout, &event)?;
        writeln!(stdout)?;
    }
    stdout.flush()?;

    pipeline.stop();
    let stats = pipeline.stats();
    info!(
        "Replay finished: {} admitted, {} rejected, {} processed, {} failed",
        stats.admitted, stats.rejected, stats.processed, stats.failed
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_parse_script_only() {
        let parsed = CliArgs::parse(args(&["run.jsonl"])).unwrap();
        assert_eq!(parsed.script, PathBuf::from("run.jsonl"));
        assert_eq!(parsed.front_camera, None);
    }

    #[test]
    fn test_parse_camera_flag() {
        let parsed = CliArgs::parse(args(&["--back", "run.jsonl"])).unwrap();
        assert_eq!(parsed.front_camera, Some(false));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(CliArgs::parse(args(&[])).is_err());
        assert!(CliArgs::parse(args(&["a.jsonl", "b.jsonl"])).is_err());
        assert!(CliArgs::parse(args(&["--fast", "a.jsonl"])).is_err());
    }
}
