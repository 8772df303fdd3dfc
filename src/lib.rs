//! Math Challenge - a multiple-choice arithmetic quiz game
//!
//! Core modules:
//! - `game`: Deterministic quiz core (question generation, answer sets, session state machine)
//! - `settings`: Player preferences (difficulty, sound toggle)
//! - `scores`: Best-score persistence
//! - `audio`: Procedural Web Audio sound cues (wasm only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod game;
pub mod scores;
pub mod settings;

pub use game::{Difficulty, GameEvent, Mode, OpSet, Question, Session};
pub use scores::BestScore;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Countdown duration for timed mode, in seconds
    pub const TIMED_DURATION_SECS: u32 = 60;
    /// Lives granted at the start of a survival run
    pub const SURVIVAL_LIVES: u8 = 3;
    /// Feedback window between answering and the next question, in milliseconds
    pub const ROUND_FEEDBACK_MS: i32 = 900;
    /// Answers shown per question: one correct, three distractors
    pub const CHOICE_COUNT: usize = 4;
    /// Largest factor in the learn-view multiplication table
    pub const LEARN_TABLE_MAX: u32 = 12;
}
