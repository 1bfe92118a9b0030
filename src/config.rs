use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::maze::{DEFAULT_COLS, DEFAULT_ROWS};
use crate::movement::DEFAULT_CELL_SIZE;

/// Largest maze side. The board is drawn two columns per tile, so this keeps
/// it well inside the terminal's 16-bit coordinates.
pub const MAX_SIDE: usize = 250;

const DEFAULT_TICK_HZ: u64 = 60;
const DEFAULT_SPEECH_RATE: u32 = 170;
const DEFAULT_QUIZ_BANK: &str = "data/quiz_questions.json";
const DEFAULT_LEARNING_BANK: &str = "data/questions.json";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub rows: usize,
    pub cols: usize,
    pub cell_size: i32,
    pub tick_hz: u64,
    pub seed: Option<u64>,
    pub quiz_bank: PathBuf,
    pub learning_bank: PathBuf,
    pub log_dir: PathBuf,
    pub stt_command: Option<String>,
    pub tts_command: Option<String>,
    pub speech_rate: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            cell_size: DEFAULT_CELL_SIZE,
            tick_hz: DEFAULT_TICK_HZ,
            seed: None,
            quiz_bank: PathBuf::from(DEFAULT_QUIZ_BANK),
            learning_bank: PathBuf::from(DEFAULT_LEARNING_BANK),
            log_dir: PathBuf::from("."),
            stt_command: None,
            tts_command: None,
            speech_rate: DEFAULT_SPEECH_RATE,
        }
    }
}

impl Settings {
    /// Defaults overridden by `VOXPLAY_*` variables. Unparseable or zero
    /// numbers keep the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        let text = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            rows: positive(text("VOXPLAY_ROWS")).map(capped).unwrap_or(d.rows),
            cols: positive(text("VOXPLAY_COLS")).map(capped).unwrap_or(d.cols),
            cell_size: positive(text("VOXPLAY_CELL_SIZE")).unwrap_or(d.cell_size),
            tick_hz: positive(text("VOXPLAY_TICK_HZ")).unwrap_or(d.tick_hz),
            seed: text("VOXPLAY_SEED").and_then(|v| v.parse().ok()),
            quiz_bank: text("VOXPLAY_QUIZ_BANK").map(PathBuf::from).unwrap_or(d.quiz_bank),
            learning_bank: text("VOXPLAY_LEARNING_BANK")
                .map(PathBuf::from)
                .unwrap_or(d.learning_bank),
            log_dir: text("VOXPLAY_LOG_DIR").map(PathBuf::from).unwrap_or(d.log_dir),
            stt_command: text("VOXPLAY_STT_CMD"),
            tts_command: text("VOXPLAY_TTS_CMD"),
            speech_rate: positive(text("VOXPLAY_TTS_RATE")).unwrap_or(d.speech_rate),
        }
    }

    pub fn frame_time(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.tick_hz.max(1))
    }
}

pub fn capped(side: usize) -> usize {
    side.min(MAX_SIDE)
}

fn positive<T>(value: Option<String>) -> Option<T>
where
    T: FromStr + PartialOrd + Default,
{
    value
        .and_then(|v| v.trim().parse::<T>().ok())
        .filter(|v| *v > T::default())
}
