use std::path::PathBuf;

use clap::{Parser, Subcommand};
use voxplay::config::capped;
use voxplay::Settings;

#[derive(Debug, Parser)]
#[command(name = "voxplay", version, about = "Voice-controlled learning quiz and maze game")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Maze rows
    #[arg(long, global = true)]
    pub rows: Option<usize>,

    /// Maze columns
    #[arg(long, global = true)]
    pub cols: Option<usize>,

    /// Seed for a reproducible maze
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Quiz question bank (JSON)
    #[arg(long, global = true)]
    pub quiz_bank: Option<PathBuf>,

    /// Learning-mode question bank (JSON)
    #[arg(long, global = true)]
    pub learning_bank: Option<PathBuf>,

    /// Directory for voxplay.log
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum Command {
    /// Typed menu (default)
    Menu,
    /// Voice quiz
    Quiz,
    /// Voice maze
    Maze,
    /// Prompt/listen learning mode
    Learn,
}

impl Cli {
    pub fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(rows) = self.rows.filter(|v| *v > 0) {
            settings.rows = capped(rows);
        }
        if let Some(cols) = self.cols.filter(|v| *v > 0) {
            settings.cols = capped(cols);
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        if let Some(path) = &self.quiz_bank {
            settings.quiz_bank = path.clone();
        }
        if let Some(path) = &self.learning_bank {
            settings.learning_bank = path.clone();
        }
        if let Some(dir) = &self.log_dir {
            settings.log_dir = dir.clone();
        }
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_settings() {
        let cli = Cli::parse_from(["voxplay", "maze", "--rows", "20", "--seed", "4"]);
        assert!(matches!(cli.command, Some(Command::Maze)));
        let settings = cli.apply(Settings::default());
        assert_eq!(settings.rows, 20);
        assert_eq!(settings.cols, 12);
        assert_eq!(settings.seed, Some(4));
    }

    #[test]
    fn no_subcommand_means_menu() {
        let cli = Cli::parse_from(["voxplay"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.apply(Settings::default()), Settings::default());
    }

    #[test]
    fn oversized_maze_is_capped() {
        let cli = Cli::parse_from(["voxplay", "maze", "--cols", "33000", "--rows", "1"]);
        let settings = cli.apply(Settings::default());
        assert_eq!(settings.cols, voxplay::config::MAX_SIDE);
        assert_eq!(settings.rows, 1);
    }
}
