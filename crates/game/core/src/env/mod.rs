//! Read-only collaborators of the engine.
//!
//! The tile table resolves every symbol's behavior once at load time; the
//! [`Env`] aggregate bundles it with the dice source so the engine never
//! depends on concrete implementations.
mod error;
mod rng;
mod tiles;

use std::collections::BTreeMap;

pub use error::TableError;
pub use rng::{PcgRng, RngOracle, compute_seed};
pub use tiles::{
    Bounce, DamageSpec, FallDamage, PickupKind, RawDamage, RawMonster, Slope,
    TileBehavior, TileDefinition, TileKind, VariantText,
};

use crate::state::{TileSymbol, Variant};

/// Lookup of tile behavior by symbol.
pub trait TileOracle: Send + Sync {
    /// Behavior for `symbol`. Unknown symbols get a permissive default.
    fn behavior(&self, symbol: TileSymbol) -> &TileBehavior;

    /// Behavior of cells outside the map.
    fn boundary(&self) -> &TileBehavior;
}

/// Resolved tile table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileTable {
    tiles: BTreeMap<TileSymbol, TileBehavior>,
    fallback: TileBehavior,
    boundary: TileBehavior,
}

impl TileTable {
    /// Builds a table from raw definitions.
    ///
    /// Records that fail validation are dropped and returned alongside the
    /// table; a bad rule never discards the rest of its tile.
    pub fn from_definitions<I>(definitions: I) -> (Self, Vec<(TileSymbol, TableError)>)
    where
        I: IntoIterator<Item = (TileSymbol, TileDefinition)>,
    {
        let mut tiles = BTreeMap::new();
        let mut rejected = Vec::new();
        for (symbol, def) in definitions {
            let symbol = symbol.normalized();
            let mut errors = Vec::new();
            let behavior = TileBehavior::resolve_with(symbol, &def, &mut errors);
            rejected.extend(errors.into_iter().map(|err| (symbol, err)));
            tiles.insert(symbol, behavior);
        }
        tiles.entry(TileSymbol::AIR).or_insert_with(TileBehavior::air);

        (
            Self {
                tiles,
                fallback: TileBehavior::permissive(),
                boundary: TileBehavior::boundary(),
            },
            rejected,
        )
    }

    /// Last-resort table: `X` is a solid wall, `.` is air.
    pub fn minimal() -> Self {
        let wall = TileDefinition {
            solid: Some(true),
            ..TileDefinition::default()
        };
        Self::from_definitions([(TileSymbol::BOUNDARY, wall)]).0
    }

    pub fn get(&self, symbol: TileSymbol) -> &TileBehavior {
        self.tiles
            .get(&symbol.normalized())
            .unwrap_or(&self.fallback)
    }

    pub fn contains(&self, symbol: TileSymbol) -> bool {
        self.tiles.contains_key(&symbol.normalized())
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn symbols(&self) -> impl Iterator<Item = TileSymbol> + '_ {
        self.tiles.keys().copied()
    }

    /// Map the game starts on: the exit tile's `default` destination.
    pub fn boot_map(&self) -> Option<&str> {
        self.tiles
            .get(&TileSymbol::EXIT)
            .and_then(|exit| exit.destination(VariantText::DEFAULT_KEY))
    }

    /// Hit points for a monster cell emitted during decode.
    pub fn initial_hp(&self, symbol: TileSymbol, variant: Option<Variant>) -> i32 {
        self.get(symbol).initial_hp(variant)
    }
}

impl Default for TileTable {
    fn default() -> Self {
        Self::minimal()
    }
}

impl TileOracle for TileTable {
    fn behavior(&self, symbol: TileSymbol) -> &TileBehavior {
        self.get(symbol)
    }

    fn boundary(&self) -> &TileBehavior {
        &self.boundary
    }
}

/// Read-only collaborators handed to the engine for one command.
#[derive(Clone, Copy)]
pub struct Env<'a> {
    pub tiles: &'a dyn TileOracle,
    pub rng: &'a dyn RngOracle,
}

impl<'a> Env<'a> {
    pub fn new(tiles: &'a dyn TileOracle, rng: &'a dyn RngOracle) -> Self {
        Self { tiles, rng }
    }
}

impl std::fmt::Debug for Env<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Env").finish_non_exhaustive()
    }
}
