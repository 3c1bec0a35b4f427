use crate::Cli;
use anyhow::{Context, Result};
use derivative::Derivative;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Derivative)]
#[derivative(Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    #[derivative(Default(value = "7"))]
    pub kernel_size: u32,

    #[derivative(Default(value = "30"))]
    pub grid_step: u32,

    #[derivative(Default(value = "20"))]
    pub circle_size: u32,

    #[derivative(Default(value = "50"))]
    pub crack_count: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    #[derivative(Default(value = "PathBuf::from(\"inputRainyNightImage.png\")"))]
    pub input: PathBuf,

    #[derivative(Default(value = "PathBuf::from(\"EDITEDinputRainyNightImage.png\")"))]
    pub output: PathBuf,
}

impl Config {
    /// Read a TOML settings file. Missing keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config file {} failed", path.display()))?;

        let config = toml::from_str::<Config>(&text)
            .with_context(|| format!("parse config file {} failed", path.display()))?;

        log::info!("loaded settings from {}", path.display());
        Ok(config)
    }

    /// Flags given on the command line win over the file.
    pub fn merge_cli(mut self, cli: &Cli) -> Self {
        if let Some(input) = &cli.input {
            self.input = input.clone();
        }
        if let Some(output) = &cli.output {
            self.output = output.clone();
        }
        if let Some(kernel_size) = cli.kernel_size {
            self.kernel_size = kernel_size;
        }
        if let Some(grid_step) = cli.grid_step {
            self.grid_step = grid_step;
        }
        if let Some(circle_size) = cli.circle_size {
            self.circle_size = circle_size;
        }
        if let Some(crack_count) = cli.crack_count {
            self.crack_count = crack_count;
        }
        if cli.seed.is_some() {
            self.seed = cli.seed;
        }

        self
    }
}
