//! Engine options
//!
//! Runtime options read from an rc-style file:
//!
//! ```text
//! # comment
//! OPTIONS=view_radius:10,base_seed:42
//! OPTIONS=max_floor:5
//! ```

use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{DEFAULT_SIGHT_RANGE, MAX_FLOOR, MAX_MAP_DIMENSION, MAX_SIGHT_RANGE, NORMAL_SPEED};

/// Options parsing error
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unknown option: {0}")]
    UnknownOption(String),
    #[error("Invalid value '{1}' for option '{0}'")]
    InvalidValue(String, String),
    #[error("Missing value for option '{0}'")]
    MissingValue(String),
}

/// Options for a game session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameOptions {
    /// Player sight radius in tiles
    pub view_radius: i32,
    /// Seed floors are derived from; 0 draws one from entropy
    pub base_seed: u64,
    pub map_width: i32,
    pub map_height: i32,
    /// Deepest floor reachable by stairs
    pub max_floor: i32,
    pub player_speed: i32,
    pub player_hp: i32,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            view_radius: DEFAULT_SIGHT_RANGE,
            base_seed: 0,
            map_width: 80,
            map_height: 40,
            max_floor: MAX_FLOOR,
            player_speed: NORMAL_SPEED,
            player_hp: 30,
        }
    }
}

impl GameOptions {
    /// Load options from a config file. A `.json` file is read as JSON,
    /// anything else as OPTIONS= lines.
    pub fn load_from_file(path: &Path) -> Result<Self, OptionsError> {
        let contents = std::fs::read_to_string(path)?;
        if path.extension().is_some_and(|ext| ext == "json") {
            let options: Self = serde_json::from_str(&contents)?;
            options.validate()?;
            return Ok(options);
        }
        Self::parse_config(&contents)
    }

    /// Check every numeric field against the range the rc parser accepts
    pub fn validate(&self) -> Result<(), OptionsError> {
        let checks = [
            ("view_radius", self.view_radius, 0..=MAX_SIGHT_RANGE),
            ("map_width", self.map_width, 1..=MAX_MAP_DIMENSION),
            ("map_height", self.map_height, 1..=MAX_MAP_DIMENSION),
            ("max_floor", self.max_floor, 1..=i32::MAX),
            ("player_speed", self.player_speed, 1..=i32::MAX),
            ("player_hp", self.player_hp, 1..=i32::MAX),
        ];
        for (name, value, range) in checks {
            if !range.contains(&value) {
                return Err(OptionsError::InvalidValue(
                    name.to_string(),
                    value.to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Save options to a config file
    pub fn save_to_file(&self, path: &Path) -> Result<(), OptionsError> {
        std::fs::write(path, self.to_config_string())?;
        Ok(())
    }

    /// Parse options from config file contents, starting from the defaults
    pub fn parse_config(contents: &str) -> Result<Self, OptionsError> {
        let mut options = Self::default();

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(opts) = line.strip_prefix("OPTIONS=") {
                for opt in opts.split(',') {
                    let opt = opt.trim();
                    if !opt.is_empty() {
                        options.parse_option(opt)?;
                    }
                }
            }
        }

        Ok(options)
    }

    fn parse_option(&mut self, opt: &str) -> Result<(), OptionsError> {
        let (key, value) = match opt.split_once(':').or_else(|| opt.split_once('=')) {
            Some((k, v)) => (k.trim(), Some(v.trim())),
            None => (opt, None),
        };
        self.set_option(key, value)
    }

    fn set_option(&mut self, name: &str, value: Option<&str>) -> Result<(), OptionsError> {
        match name {
            "view_radius" | "radius" => {
                self.view_radius = parse_in_range(name, value, 0..=MAX_SIGHT_RANGE)?
            }
            "base_seed" | "seed" => self.base_seed = parse_value(name, value)?,
            "map_width" | "width" => {
                self.map_width = parse_in_range(name, value, 1..=MAX_MAP_DIMENSION)?
            }
            "map_height" | "height" => {
                self.map_height = parse_in_range(name, value, 1..=MAX_MAP_DIMENSION)?
            }
            "max_floor" => self.max_floor = parse_positive(name, value)?,
            "player_speed" => self.player_speed = parse_positive(name, value)?,
            "player_hp" => self.player_hp = parse_positive(name, value)?,
            _ => return Err(OptionsError::UnknownOption(name.to_string())),
        }
        Ok(())
    }

    /// Convert options to config file format
    pub fn to_config_string(&self) -> String {
        let mut lines = Vec::new();
        lines.push("# delve configuration file".to_string());
        lines.push(String::new());

        lines.push("# Map".to_string());
        lines.push(format!(
            "OPTIONS=map_width:{},map_height:{}",
            self.map_width, self.map_height
        ));
        lines.push(format!("OPTIONS=base_seed:{}", self.base_seed));
        lines.push(format!("OPTIONS=max_floor:{}", self.max_floor));

        lines.push(String::new());
        lines.push("# Player".to_string());
        lines.push(format!("OPTIONS=view_radius:{}", self.view_radius));
        lines.push(format!(
            "OPTIONS=player_speed:{},player_hp:{}",
            self.player_speed, self.player_hp
        ));

        lines.join("\n")
    }
}

fn parse_value<T: std::str::FromStr>(name: &str, value: Option<&str>) -> Result<T, OptionsError> {
    let value = value.ok_or_else(|| OptionsError::MissingValue(name.to_string()))?;
    value
        .parse()
        .map_err(|_| OptionsError::InvalidValue(name.to_string(), value.to_string()))
}

fn parse_positive(name: &str, value: Option<&str>) -> Result<i32, OptionsError> {
    parse_in_range(name, value, 1..=i32::MAX)
}

fn parse_in_range(
    name: &str,
    value: Option<&str>,
    range: RangeInclusive<i32>,
) -> Result<i32, OptionsError> {
    let parsed: i32 = parse_value(name, value)?;
    if !range.contains(&parsed) {
        return Err(OptionsError::InvalidValue(
            name.to_string(),
            parsed.to_string(),
        ));
    }
    Ok(parsed)
}
