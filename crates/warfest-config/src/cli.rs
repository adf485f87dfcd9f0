//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Warfest mesher command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "warfest", about = "Greedy voxel mesher demo")]
pub struct CliArgs {
    /// Number of meshing worker threads.
    #[arg(long)]
    pub workers: Option<usize>,

    /// Maximum number of chunks meshing at once.
    #[arg(long)]
    pub budget: Option<usize>,

    /// Color atlas side length in texels.
    #[arg(long)]
    pub atlas_size: Option<u32>,

    /// Write the color atlas PNG to this path.
    #[arg(long)]
    pub export_atlas: Option<PathBuf>,

    /// Number of demo chunks to generate.
    #[arg(long)]
    pub chunks: Option<u32>,

    /// World generation seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(workers) = args.workers {
            self.mesher.worker_count = workers;
        }
        if let Some(budget) = args.budget {
            self.mesher.task_budget = budget;
        }
        if let Some(size) = args.atlas_size {
            self.atlas.size = size;
        }
        if let Some(ref path) = args.export_atlas {
            self.atlas.export_path = Some(path.clone());
        }
        if let Some(chunks) = args.chunks {
            self.demo.chunk_count = chunks;
        }
        if let Some(seed) = args.seed {
            self.demo.seed = seed;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            workers: Some(8),
            export_atlas: Some(PathBuf::from("out/atlas.png")),
            seed: Some(1234),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.mesher.worker_count, 8);
        assert_eq!(config.atlas.export_path, Some(PathBuf::from("out/atlas.png")));
        assert_eq!(config.demo.seed, 1234);
        // Non-overridden fields retain defaults
        assert_eq!(config.mesher.task_budget, 16);
        assert_eq!(config.demo.chunk_count, 8);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::parse_from([
            "warfest",
            "--workers",
            "2",
            "--atlas-size",
            "8",
            "--chunks",
            "3",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.workers, Some(2));
        assert_eq!(args.atlas_size, Some(8));
        assert_eq!(args.chunks, Some(3));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(args.config.is_none());
    }
}
