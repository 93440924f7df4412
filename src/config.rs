use std::fs;
use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::error::Result;

pub const DEFAULT_ROUND_CAP: usize = 1000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // turns played before the game is called off and everyone alive wins
    pub round_cap: usize,
    pub starting_coins: u8,
    pub shuffle_seats: bool,
    pub random_starter: bool,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            round_cap: DEFAULT_ROUND_CAP,
            starting_coins: 0,
            shuffle_seats: true,
            random_starter: true,
            seed: None,
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Fixed seating, first seat starts, seeded. What tests want.
    pub fn deterministic(seed: u64) -> Self {
        Self {
            shuffle_seats: false,
            random_starter: false,
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn with_seed(&self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self.clone()
        }
    }
}
