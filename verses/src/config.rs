//! Command-line options and validated application settings

use crate::content::{self, Chapter};
use crate::error::{VerseError, VerseResult};
use clap::Parser;

/// Smallest GPU instance buffer the renderer accepts
pub const MIN_CAPACITY: usize = 1024;

#[derive(Parser, Debug, Clone)]
#[command(name = "quantum_verses", version, about = "Quantum visualizations of Madhyamaka verses")]
pub struct Cli {
    /// Chapter of the first verse to show.
    #[arg(long, default_value_t = 1)]
    pub chapter: u32,

    /// Verse number within the chapter.
    #[arg(long, default_value_t = 1)]
    pub verse: u32,

    /// Window width in pixels.
    #[arg(long, default_value_t = 1600)]
    pub width: u32,

    /// Window height in pixels.
    #[arg(long, default_value_t = 900)]
    pub height: u32,

    /// Point instances the renderer can draw per frame.
    #[arg(long, default_value_t = 16384)]
    pub max_points: usize,

    /// Line segments the renderer can draw per frame.
    #[arg(long, default_value_t = 65536)]
    pub max_lines: usize,

    /// Start with animation paused.
    #[arg(long, default_value_t = false)]
    pub paused: bool,

    /// Seed verse randomness for reproducible runs.
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Position of the first verse in the flattened catalogue
    pub start_index: usize,
    pub width: u32,
    pub height: u32,
    pub max_points: usize,
    pub max_lines: usize,
    pub paused: bool,
    pub seed: Option<u64>,
}

impl AppConfig {
    pub fn from_cli(cli: &Cli, catalogue: &'static [Chapter]) -> VerseResult<Self> {
        if cli.width == 0 || cli.height == 0 {
            return Err(VerseError::invalid_config(format!(
                "window size must be non-zero, got {}x{}",
                cli.width, cli.height
            )));
        }
        if cli.max_points < MIN_CAPACITY || cli.max_lines < MIN_CAPACITY {
            return Err(VerseError::invalid_config(format!(
                "--max-points and --max-lines must be at least {}",
                MIN_CAPACITY
            )));
        }
        let start_index = content::flatten(catalogue)
            .iter()
            .position(|v| v.chapter == cli.chapter && v.number == cli.verse)
            .ok_or(VerseError::UnknownVerse {
                chapter: cli.chapter,
                verse: cli.verse,
            })?;

        Ok(Self {
            start_index,
            width: cli.width,
            height: cli.height,
            max_points: cli.max_points,
            max_lines: cli.max_lines,
            paused: cli.paused,
            seed: cli.seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::CATALOGUE;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("quantum_verses").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_start_at_first_verse() {
        let config = AppConfig::from_cli(&parse(&[]), CATALOGUE).unwrap();
        assert_eq!(config.start_index, 0);
        assert!(!config.paused);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn chapter_and_verse_select_start() {
        let cli = parse(&["--chapter", "24", "--verse", "19"]);
        let config = AppConfig::from_cli(&cli, CATALOGUE).unwrap();
        assert_eq!(config.start_index, 9);
    }

    #[test]
    fn unknown_verse_is_rejected() {
        let err = AppConfig::from_cli(&parse(&["--chapter", "2"]), CATALOGUE).unwrap_err();
        assert!(matches!(err, VerseError::UnknownVerse { chapter: 2, verse: 1 }));
    }

    #[test]
    fn tiny_buffers_are_rejected() {
        let err = AppConfig::from_cli(&parse(&["--max-points", "10"]), CATALOGUE).unwrap_err();
        assert!(matches!(err, VerseError::InvalidConfig(_)));
        let err = AppConfig::from_cli(&parse(&["--width", "0"]), CATALOGUE).unwrap_err();
        assert!(matches!(err, VerseError::InvalidConfig(_)));
    }
}
