// Static arena layout: bounds plus rectangular terrain.

use serde::Deserialize;

/// Axis-aligned terrain rectangle. `kind` is only a rendering hint for clients.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Obstacle {
    pub fn new(x: f64, y: f64, width: f64, height: f64, kind: impl Into<String>) -> Self {
        Self {
            x,
            y,
            width,
            height,
            kind: kind.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArenaMap {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapError {
    InvalidDimensions,
    TooSmallForPlayer,
    InvalidObstacle { index: usize },
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapError::InvalidDimensions => write!(f, "map width and height must be positive"),
            MapError::TooSmallForPlayer => write!(f, "map is smaller than one player footprint"),
            MapError::InvalidObstacle { index } => {
                write!(f, "obstacle {index} has a non-finite or negative extent")
            }
        }
    }
}

impl std::error::Error for MapError {}

impl ArenaMap {
    pub fn center(&self) -> crate::domain::Position {
        crate::domain::Position::new(self.width / 2.0, self.height / 2.0)
    }

    /// Checks the layout can hold a player of `player_radius`.
    pub fn validate(&self, player_radius: f64) -> Result<(), MapError> {
        if !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
        {
            return Err(MapError::InvalidDimensions);
        }
        if self.width < player_radius * 2.0 || self.height < player_radius * 2.0 {
            return Err(MapError::TooSmallForPlayer);
        }
        for (index, o) in self.obstacles.iter().enumerate() {
            let finite = [o.x, o.y, o.width, o.height].iter().all(|v| v.is_finite());
            if !finite || o.width < 0.0 || o.height < 0.0 {
                return Err(MapError::InvalidObstacle { index });
            }
        }
        Ok(())
    }
}

impl Default for ArenaMap {
    /// The stock 1600x1200 arena.
    fn default() -> Self {
        Self {
            width: 1600.0,
            height: 1200.0,
            obstacles: vec![
                Obstacle::new(400.0, 150.0, 715.0, 338.0, "bigHome"),
                Obstacle::new(100.0, 1000.0, 360.0, 259.0, "home"),
                Obstacle::new(1050.0, 750.0, 409.0, 406.0, "pond"),
            ],
        }
    }
}
