//! Best-score persistence
//!
//! A single monotonically non-decreasing value in LocalStorage. Not
//! versioned, not namespaced beyond its one key.

use serde::{Deserialize, Serialize};

/// Durable best score across sessions
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BestScore {
    pub score: u32,
}

impl BestScore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "mc_best_score_v1";

    pub fn new() -> Self {
        Self { score: 0 }
    }

    /// Record a finished run. The stored value only moves on strict
    /// improvement; ties leave it untouched. Returns whether a new best
    /// was set.
    pub fn record(&mut self, score: u32) -> bool {
        if score > self.score {
            self.score = score;
            true
        } else {
            false
        }
    }

    /// Load the best score from LocalStorage (WASM only); 0 when absent
    /// or unparsable.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(best) = serde_json::from_str::<BestScore>(&json) {
                    log::info!("Loaded best score: {}", best.score);
                    return best;
                }
            }
        }

        log::info!("No best score found, starting fresh");
        Self::new()
    }

    /// Save the best score to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Best score saved ({})", self.score);
            }
        }
    }

    /// Remove the stored best score (reset button)
    #[cfg(target_arch = "wasm32")]
    pub fn reset() {
        if let Some(storage) = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
        {
            let _ = storage.remove_item(Self::STORAGE_KEY);
            log::info!("Best score cleared");
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn reset() {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_strict_improvement_only() {
        let mut best = BestScore::new();
        assert_eq!(best.score, 0);

        assert!(best.record(5));
        assert_eq!(best.score, 5);

        // Lower score leaves the best unchanged
        assert!(!best.record(3));
        assert_eq!(best.score, 5);

        // Ties do not update
        assert!(!best.record(5));
        assert_eq!(best.score, 5);

        assert!(best.record(6));
        assert_eq!(best.score, 6);
    }

    #[test]
    fn test_zero_never_improves() {
        let mut best = BestScore::new();
        assert!(!best.record(0));
        assert_eq!(best.score, 0);
    }
}
