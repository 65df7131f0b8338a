//! Worker configuration from environment variables and command-line flags

use std::env;
use std::path::PathBuf;

use style_features::{ExtractorConfig, KingPressureBonus};

use crate::error::WorkerError;

const DEFAULT_OPENING_LENGTH: u32 = 16;

/// Flags given on the command line. They take precedence over the environment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub pgn_path: Option<PathBuf>,
    pub opening_length: Option<String>,
}

impl CliArgs {
    /// Parse `--pgn <path>` and `--opening-length <plies>`; anything else is ignored.
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Self {
        let mut parsed = CliArgs::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--pgn" => parsed.pgn_path = args.next().map(PathBuf::from),
                "--opening-length" => parsed.opening_length = args.next(),
                _ => {}
            }
        }
        parsed
    }
}

#[derive(Clone, Debug)]
pub struct WorkerConfig {
    /// PGN file holding the games to profile
    pub pgn_path: PathBuf,

    /// Opening window length in plies
    pub opening_length: u32,

    /// Same king-pressure capture bonus for both colours, if set
    pub symmetric_king_bonus: Option<u32>,

    /// Games profiled concurrently
    pub max_workers: usize,
}

impl WorkerConfig {
    /// Load configuration from the process environment, overridden by `args`.
    pub fn load(args: &CliArgs) -> Result<Self, WorkerError> {
        Self::from_lookup(args, |key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(args: &CliArgs, lookup: F) -> Result<Self, WorkerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pgn_path = args
            .pgn_path
            .clone()
            .or_else(|| lookup("PGN_PATH").map(PathBuf::from))
            .ok_or(WorkerError::Config("PGN_PATH not set and no --pgn given"))?;

        let opening_length = match args.opening_length.clone().or_else(|| lookup("OPENING_LENGTH")) {
            Some(raw) => raw.trim().parse().map_err(|_| WorkerError::InvalidSetting {
                name: "OPENING_LENGTH",
                value: raw,
            })?,
            None => DEFAULT_OPENING_LENGTH,
        };

        let symmetric_king_bonus = match lookup("SYMMETRIC_KING_BONUS") {
            Some(raw) => Some(raw.trim().parse().map_err(|_| WorkerError::InvalidSetting {
                name: "SYMMETRIC_KING_BONUS",
                value: raw,
            })?),
            None => None,
        };

        let max_workers = lookup("MAX_WORKERS")
            .and_then(|v| v.parse().ok())
            .filter(|&n: &usize| n > 0)
            .unwrap_or_else(num_cpus::get);

        Ok(Self {
            pgn_path,
            opening_length,
            symmetric_king_bonus,
            max_workers,
        })
    }

    /// Validated extractor settings for every game in the batch.
    pub fn extractor_config(&self) -> Result<ExtractorConfig, WorkerError> {
        let config = ExtractorConfig::new(self.opening_length)?;
        Ok(match self.symmetric_king_bonus {
            Some(bonus) => config.with_king_pressure_bonus(KingPressureBonus::symmetric(bonus)),
            None => config,
        })
    }
}
