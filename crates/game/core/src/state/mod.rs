//! Authoritative world state.
//!
//! One [`World`] exists per loaded level. It is created from an encoded map,
//! mutated in place by the engine, and replaced wholesale on a level
//! transition.
mod common;
mod dice;
mod fog;
mod grid;
mod runner;

pub use common::{Direction, Position};
pub use dice::{DiceFaces, DicePool, DieSlot, InsufficientMovement};
pub use fog::{FogGrid, FogMask};
pub use grid::{MapDimensions, TileGrid, TileSymbol, Variant};
pub use runner::{BounceState, CarriedStats, FlashTimers, Runner};

use crate::codec;
use crate::config::GameConfig;
use crate::env::{TileBehavior, TileOracle};

/// Whether play can continue.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WorldStatus {
    #[default]
    Playing,
    /// Hearts ran out. Carries the death message of the last damage source.
    GameOver { reason: Option<String> },
}

impl WorldStatus {
    pub fn is_over(&self) -> bool {
        matches!(self, WorldStatus::GameOver { .. })
    }
}

/// Grid, runner, dice and fog of one level.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct World {
    /// Session seed; with `roll_count` it determines every roll.
    pub game_seed: u64,
    pub roll_count: u64,
    pub config: GameConfig,
    pub grid: TileGrid,
    pub runner: Runner,
    pub dice: DicePool,
    /// `None` while fog is disabled.
    pub fog: Option<FogGrid>,
    pub status: WorldStatus,
    /// Destination key that produced this level, `default` for the boot map.
    pub level_key: String,
}

impl World {
    /// Decodes `encoded` and places the runner on the spawn tile.
    ///
    /// The last `R` in row-major order is the spawn and becomes air; without
    /// one the runner starts at [`GameConfig::fallback_spawn`].
    pub fn load(
        encoded: &str,
        config: GameConfig,
        tiles: &dyn TileOracle,
        carried: CarriedStats,
        game_seed: u64,
    ) -> Self {
        let mut grid = codec::decode(encoded, config.dimensions(), tiles);
        let spawn = match grid.positions_of(TileSymbol::SPAWN).last().copied() {
            Some(position) => {
                grid.clear(position);
                position
            }
            None => config.fallback_spawn(),
        };

        let fog = config.fog_enabled.then(|| {
            let mut fog = FogGrid::new(grid.dimensions(), FogMask::disk(config.fog_radius));
            fog.reveal_around(spawn);
            fog
        });

        Self {
            game_seed,
            roll_count: 0,
            config,
            grid,
            runner: Runner::new(spawn, carried),
            dice: DicePool::default(),
            fog,
            status: WorldStatus::Playing,
            level_key: crate::env::VariantText::DEFAULT_KEY.to_owned(),
        }
    }

    pub fn with_level_key(mut self, key: impl Into<String>) -> Self {
        self.level_key = key.into();
        self
    }

    /// Behavior of the cell at `position`; outside the map is a solid wall.
    pub fn behavior_at<'t>(&self, tiles: &'t dyn TileOracle, position: Position) -> &'t TileBehavior {
        if self.grid.contains(position) {
            tiles.behavior(self.grid.symbol(position))
        } else {
            tiles.boundary()
        }
    }

    pub fn is_over(&self) -> bool {
        self.status.is_over()
    }

    /// Sign text shown when the runner bumps into `position`.
    pub fn sign_at(&self, tiles: &dyn TileOracle, position: Position) -> Option<String> {
        self.behavior_at(tiles, position)
            .sign_for(self.grid.variant(position))
            .map(str::to_owned)
    }

    /// Inspection hint for `position`.
    pub fn hint_at(&self, tiles: &dyn TileOracle, position: Position) -> Option<String> {
        self.behavior_at(tiles, position)
            .hint_for(self.grid.variant(position))
            .map(str::to_owned)
    }

    /// Whether fog hides `position`. Always false while fog is disabled.
    pub fn is_fogged(&self, position: Position) -> bool {
        self.fog.as_ref().is_some_and(|fog| fog.is_covered(position))
    }

    /// Drops the fog bitset entirely or starts a fresh one.
    pub fn set_fog(&mut self, enabled: bool) {
        self.config.fog_enabled = enabled;
        self.fog = enabled.then(|| {
            let mut fog = FogGrid::new(
                self.grid.dimensions(),
                FogMask::disk(self.config.fog_radius),
            );
            fog.reveal_around(self.runner.position);
            fog
        });
    }

    /// Stats to hand to the next level.
    pub fn carried(&self) -> CarriedStats {
        self.runner.carried()
    }

    pub fn encoded_map(&self) -> String {
        codec::encode(&self.grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::TileTable;

    #[test]
    fn last_spawn_wins_and_becomes_air() {
        let tiles = TileTable::minimal();
        let config = GameConfig::new().with_dimensions(2, 4);
        let world = World::load("R1A3~A2R1X1", config, &tiles, CarriedStats::default(), 1);
        assert_eq!(world.runner.position, Position::new(2, 1));
        assert_eq!(world.grid.symbol(Position::new(2, 1)), TileSymbol::AIR);
        assert_eq!(world.grid.symbol(Position::new(0, 0)), TileSymbol::SPAWN);
    }

    #[test]
    fn missing_spawn_uses_fallback() {
        let tiles = TileTable::minimal();
        let config = GameConfig::new();
        let world = World::load("X25", config, &tiles, CarriedStats::default(), 1);
        assert_eq!(world.runner.position, Position::new(1, 14));
        assert_eq!(world.runner.hearts, CarriedStats::DEFAULT_HEARTS);
    }

    #[test]
    fn outside_cells_behave_as_walls() {
        let tiles = TileTable::minimal();
        let world = World::load("A25", GameConfig::new(), &tiles, CarriedStats::default(), 1);
        assert!(world.behavior_at(&tiles, Position::new(-1, 3)).solid);
        assert!(world.behavior_at(&tiles, Position::new(3, 15)).solid);
        assert!(!world.behavior_at(&tiles, Position::new(3, 0)).solid);
    }

    #[test]
    fn fog_toggle_discards_bitset() {
        let tiles = TileTable::minimal();
        let config = GameConfig::new().with_fog(true);
        let mut world = World::load("A25", config, &tiles, CarriedStats::default(), 1);
        assert!(!world.is_fogged(world.runner.position));
        assert!(world.is_fogged(Position::new(24, 0)));
        world.set_fog(false);
        assert!(world.fog.is_none());
        assert!(!world.is_fogged(Position::new(24, 0)));
    }
}
