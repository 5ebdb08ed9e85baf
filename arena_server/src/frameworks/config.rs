use crate::domain::{ArenaMap, MapError};
use std::{
    env, fmt, fs,
    path::{Path, PathBuf},
    time::Duration,
};

// Runtime/server constants (not gameplay tuning).

pub const INPUT_CHANNEL_CAPACITY: usize = 1024;
pub const OUTBOX_CAPACITY: usize = 256;

pub fn http_port() -> u16 {
    env::var("ARENA_SERVER_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000)
}

fn millis_from_env(key: &str, default: Duration) -> Duration {
    env::var(key)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(default)
}

pub fn respawn_delay(default: Duration) -> Duration {
    millis_from_env("RESPAWN_DELAY_MS", default)
}

pub fn projectile_life_time(default: Duration) -> Duration {
    millis_from_env("PROJECTILE_LIFETIME_MS", default)
}

pub fn arena_map_path() -> Option<PathBuf> {
    env::var_os("ARENA_MAP_PATH")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

#[derive(Debug)]
pub enum MapLoadError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(MapError),
}

impl fmt::Display for MapLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapLoadError::Io(e) => write!(f, "failed to read map file: {e}"),
            MapLoadError::Parse(e) => write!(f, "failed to parse map file: {e}"),
            MapLoadError::Invalid(e) => write!(f, "invalid map: {e}"),
        }
    }
}

impl std::error::Error for MapLoadError {}

pub fn parse_arena_map(text: &str, player_radius: f64) -> Result<ArenaMap, MapLoadError> {
    let map: ArenaMap = toml::from_str(text).map_err(MapLoadError::Parse)?;
    map.validate(player_radius).map_err(MapLoadError::Invalid)?;
    Ok(map)
}

/// Reads the map at `path`, or returns the stock arena when no path is configured.
pub fn load_arena_map(path: Option<&Path>, player_radius: f64) -> Result<ArenaMap, MapLoadError> {
    let Some(path) = path else {
        return Ok(ArenaMap::default());
    };
    let text = fs::read_to_string(path).map_err(MapLoadError::Io)?;
    parse_arena_map(&text, player_radius)
}
