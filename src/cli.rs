//! Command line handling for the `blockfall` binary.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

use crate::core::EngineConfig;

pub const USAGE: &str = "usage: blockfall [--config <path.json>] [--seed <u64>]";

/// What the runner was asked to do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunConfig {
    /// JSON rule set; defaults apply when absent.
    pub config_path: Option<PathBuf>,
    /// Fixed bag seed for a reproducible piece sequence.
    pub seed: Option<u64>,
    pub help: bool,
}

impl RunConfig {
    /// Parse arguments (without the program name).
    pub fn parse(args: &[String]) -> Result<Self> {
        let mut run = Self::default();
        let mut i = 0usize;
        while i < args.len() {
            match args[i].as_str() {
                "--config" | "-c" => {
                    i += 1;
                    let v = args
                        .get(i)
                        .ok_or_else(|| anyhow!("missing value for --config"))?;
                    run.config_path = Some(PathBuf::from(v));
                }
                "--seed" => {
                    i += 1;
                    let v = args
                        .get(i)
                        .ok_or_else(|| anyhow!("missing value for --seed"))?;
                    run.seed = Some(
                        v.parse::<u64>()
                            .map_err(|_| anyhow!("invalid --seed value: {}", v))?,
                    );
                }
                "--help" | "-h" => run.help = true,
                other => {
                    return Err(anyhow!("unknown argument: {}\n{}", other, USAGE));
                }
            }
            i += 1;
        }
        Ok(run)
    }

    /// Load the engine rules this run should use.
    pub fn engine_config(&self) -> Result<EngineConfig> {
        let Some(path) = &self.config_path else {
            return Ok(EngineConfig::default());
        };
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = EngineConfig::from_json_str(&json)
            .with_context(|| format!("loading config {}", path.display()))?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }
}
