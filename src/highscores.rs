//! Persistent best score
//!
//! Stored as a decimal string so the browser build reads values written by
//! earlier versions of the page.

use crate::error::StorageError;
use crate::persistence::KeyValueStore;

/// Best score seen across sessions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    pub const STORAGE_KEY: &'static str = "asteroidShooterHighScore";

    pub fn new(best: u64) -> Self {
        Self { best }
    }

    /// Read from `store`; missing, unreadable or malformed values read as 0
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(raw)) => match raw.trim().parse::<u64>() {
                Ok(best) => {
                    log::info!("Loaded high score {}", best);
                    Self { best }
                }
                Err(_) => {
                    log::warn!("Ignoring malformed high score '{}'", raw);
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                Self::default()
            }
            Err(e) => {
                log::warn!("High score unreadable: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        store.set(Self::STORAGE_KEY, &self.best.to_string())?;
        log::debug!("High score saved ({})", self.best);
        Ok(())
    }

    /// Raise the best score; true if `score` beat it
    pub fn record(&mut self, score: u64) -> bool {
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }
}
