//! Player preferences
//!
//! Difficulty and the sound toggle persist across visits under separate
//! LocalStorage keys, read once at startup. Defaults: medium difficulty,
//! sound on.

use crate::game::Difficulty;

/// Game settings/preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Operand range for generated questions
    pub difficulty: Difficulty,
    /// Sound cues on answers and session end
    pub sound_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            sound_enabled: true,
        }
    }
}

impl Settings {
    /// LocalStorage keys (used only in wasm32)
    #[allow(dead_code)]
    const DIFFICULTY_KEY: &'static str = "mc_difficulty";
    #[allow(dead_code)]
    const SOUND_KEY: &'static str = "mc_sound";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        let Some(storage) = storage else {
            log::info!("Using default settings");
            return Self::default();
        };

        let mut settings = Self::default();
        if let Ok(Some(value)) = storage.get_item(Self::DIFFICULTY_KEY) {
            if let Some(difficulty) = Difficulty::from_str(&value) {
                settings.difficulty = difficulty;
            }
        }
        if let Ok(Some(value)) = storage.get_item(Self::SOUND_KEY) {
            settings.sound_enabled = value != "0";
        }
        log::info!(
            "Loaded settings: difficulty={}, sound={}",
            settings.difficulty.as_str(),
            settings.sound_enabled
        );
        settings
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            let _ = storage.set_item(Self::DIFFICULTY_KEY, self.difficulty.as_str());
            let _ = storage.set_item(Self::SOUND_KEY, if self.sound_enabled { "1" } else { "0" });
            log::info!("Settings saved");
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.difficulty, Difficulty::Medium);
        assert!(settings.sound_enabled);
    }
}
