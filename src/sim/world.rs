//! Level tile grid
//!
//! The grid is mostly decoration, but its width decides how many columns
//! meteorites and power-ups can spawn in. Level files are JSON:
//!
//! ```json
//! { "rows": [["Empty", "Empty"], ["Grass", "Grass"]] }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Tile kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Empty,
    Grass,
    Dirt,
}

/// Tile grid, row-major from the top of the screen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "LevelFile")]
pub struct World {
    rows: Vec<Vec<Tile>>,
}

/// On-disk shape of a level, validated into a `World`
#[derive(Deserialize)]
struct LevelFile {
    rows: Vec<Vec<Tile>>,
}

impl TryFrom<LevelFile> for World {
    type Error = GameError;

    fn try_from(level: LevelFile) -> Result<Self, Self::Error> {
        World::new(level.rows)
    }
}

impl World {
    /// Build a world, rejecting grids that would leave nowhere to spawn.
    pub fn new(rows: Vec<Vec<Tile>>) -> Result<Self, GameError> {
        match rows.first() {
            Some(first) if !first.is_empty() => Ok(Self { rows }),
            _ => Err(GameError::EmptyWorld),
        }
    }

    /// Read a level file
    pub fn load(path: &Path) -> Result<Self, GameError> {
        let json = fs::read_to_string(path).map_err(|source| GameError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let world: World = serde_json::from_str(&json).map_err(|source| GameError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!(
            "Loaded level {} ({} columns)",
            path.display(),
            world.columns()
        );
        Ok(world)
    }

    /// Number of spawn columns (width of the top row, always >= 1)
    pub fn columns(&self) -> usize {
        self.rows.first().map_or(1, Vec::len)
    }

    pub fn rows(&self) -> &[Vec<Tile>] {
        &self.rows
    }
}

impl Default for World {
    /// Ten empty rows over a grass row and a dirt row, 16 columns wide
    fn default() -> Self {
        const WIDTH: usize = 16;
        let mut rows = vec![vec![Tile::Empty; WIDTH]; 10];
        rows.push(vec![Tile::Grass; WIDTH]);
        rows.push(vec![Tile::Dirt; WIDTH]);
        Self { rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_world() {
        let world = World::default();
        assert_eq!(world.columns(), 16);
        assert_eq!(world.rows().len(), 12);
        assert_eq!(world.rows()[10][0], Tile::Grass);
        assert_eq!(world.rows()[11][15], Tile::Dirt);
    }

    #[test]
    fn test_empty_world_rejected() {
        assert!(matches!(World::new(vec![]), Err(GameError::EmptyWorld)));
        assert!(matches!(
            World::new(vec![vec![], vec![Tile::Dirt]]),
            Err(GameError::EmptyWorld)
        ));
    }

    #[test]
    fn test_deserialize_rejects_empty_grid() {
        assert!(serde_json::from_str::<World>(r#"{"rows":[]}"#).is_err());
        assert!(serde_json::from_str::<World>(r#"{"rows":[[]]}"#).is_err());

        let world: World =
            serde_json::from_str(r#"{"rows":[["Empty","Empty"],["Grass","Dirt"]]}"#).unwrap();
        assert_eq!(world.columns(), 2);
        assert_eq!(world.rows()[1][1], Tile::Dirt);
    }

    #[test]
    fn test_load_level_file() {
        let path = std::env::temp_dir()
            .join(format!("meteor_dodge_level_{}.json", std::process::id()));
        std::fs::write(&path, serde_json::to_string(&World::default()).unwrap()).unwrap();
        assert_eq!(World::load(&path).unwrap().columns(), 16);

        std::fs::write(&path, r#"{"rows":[]}"#).unwrap();
        assert!(matches!(World::load(&path), Err(GameError::Json { .. })));
        let _ = std::fs::remove_file(&path);

        assert!(matches!(World::load(&path), Err(GameError::Io { .. })));
    }

    #[test]
    fn test_single_column_world() {
        let world = World::new(vec![vec![Tile::Grass]]).unwrap();
        assert_eq!(world.columns(), 1);
    }
}
