use std::fmt;

use arrayvec::ArrayString;

use crate::config::GameConfig;

use super::Position;

/// Single-character tile symbol as it appears in the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileSymbol(pub char);

impl TileSymbol {
    /// Canonical empty cell.
    pub const AIR: Self = Self('.');
    /// Legacy letter used for air inside encoded maps.
    pub const AIR_ALIAS: Self = Self('A');
    pub const SPAWN: Self = Self('R');
    pub const EXIT: Self = Self('E');
    pub const LOCK: Self = Self('K');
    pub const MONSTER: Self = Self('M');
    /// Marker left behind by a defeated monster.
    pub const DEFEATED: Self = Self('C');
    /// Symbol reported for cells outside the map.
    pub const BOUNDARY: Self = Self('X');

    /// Maps the air alias back to canonical air.
    pub fn normalized(self) -> Self {
        if self == Self::AIR_ALIAS { Self::AIR } else { self }
    }

    pub fn is_air(self) -> bool {
        self == Self::AIR || self == Self::AIR_ALIAS
    }

    pub fn as_char(self) -> char {
        self.0
    }
}

impl From<char> for TileSymbol {
    fn from(value: char) -> Self {
        Self(value)
    }
}

impl fmt::Display for TileSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Short identifier selecting a sub-variant of a tile's behavior.
///
/// Always lowercase `[a-z0-9_-]`, 1 to [`GameConfig::MAX_VARIANT_LEN`] chars.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variant(ArrayString<{ GameConfig::MAX_VARIANT_LEN }>);

impl Variant {
    /// Variant name that marks an adjacent monster as unable to attack.
    pub const DEAD: &'static str = "dead";

    /// Cleans a raw identifier; returns `None` when nothing usable is left.
    pub fn sanitize(raw: &str) -> Option<Self> {
        let mut out = ArrayString::new();
        for ch in raw.trim().chars().flat_map(char::to_lowercase) {
            if !(ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_' || ch == '-') {
                continue;
            }
            if out.try_push(ch).is_err() {
                break;
            }
        }
        if out.is_empty() { None } else { Some(Self(out)) }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Variant({:?})", self.0.as_str())
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Variant {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Variant {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        Variant::sanitize(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid variant '{raw}'")))
    }
}

/// Width and height of a loaded map, in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
}

impl MapDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    fn index(&self, position: Position) -> Option<usize> {
        self.contains(position)
            .then(|| position.y as usize * self.width as usize + position.x as usize)
    }
}

/// The mutable playfield: tile symbols plus the parallel variant overlay and
/// monster hit-point map, all row-major with identical dimensions.
///
/// Writes go through [`TileGrid::set`] / [`TileGrid::clear`] so that air never
/// keeps a variant or hit points.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileGrid {
    dimensions: MapDimensions,
    symbols: Vec<TileSymbol>,
    variants: Vec<Option<Variant>>,
    monster_hp: Vec<Option<i32>>,
}

impl TileGrid {
    /// Creates a grid filled with air.
    pub fn new(dimensions: MapDimensions) -> Self {
        let cells = dimensions.cell_count();
        Self {
            dimensions,
            symbols: vec![TileSymbol::AIR; cells],
            variants: vec![None; cells],
            monster_hp: vec![None; cells],
        }
    }

    pub fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    pub fn contains(&self, position: Position) -> bool {
        self.dimensions.contains(position)
    }

    /// Symbol at `position`; cells outside the map read as a solid boundary.
    pub fn symbol(&self, position: Position) -> TileSymbol {
        self.dimensions
            .index(position)
            .map(|idx| self.symbols[idx])
            .unwrap_or(TileSymbol::BOUNDARY)
    }

    pub fn variant(&self, position: Position) -> Option<Variant> {
        self.dimensions
            .index(position)
            .and_then(|idx| self.variants[idx])
    }

    pub fn monster_hp(&self, position: Position) -> Option<i32> {
        self.dimensions
            .index(position)
            .and_then(|idx| self.monster_hp[idx])
    }

    /// Writes a cell. Hit points are reset; air drops the variant.
    pub fn set(&mut self, position: Position, symbol: TileSymbol, variant: Option<Variant>) {
        let Some(idx) = self.dimensions.index(position) else {
            return;
        };
        let symbol = symbol.normalized();
        self.symbols[idx] = symbol;
        self.variants[idx] = if symbol.is_air() { None } else { variant };
        self.monster_hp[idx] = None;
    }

    /// Turns a cell into plain air.
    pub fn clear(&mut self, position: Position) {
        self.set(position, TileSymbol::AIR, None);
    }

    /// Sets the hit-point counter of a monster cell. Ignored on air.
    pub fn set_monster_hp(&mut self, position: Position, hp: Option<i32>) {
        let Some(idx) = self.dimensions.index(position) else {
            return;
        };
        if self.symbols[idx].is_air() {
            return;
        }
        self.monster_hp[idx] = hp;
    }

    /// Iterates every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Position, TileSymbol, Option<Variant>)> + '_ {
        let width = self.dimensions.width as usize;
        self.symbols
            .iter()
            .zip(self.variants.iter())
            .enumerate()
            .map(move |(idx, (symbol, variant))| {
                let position = Position::new((idx % width) as i32, (idx / width) as i32);
                (position, *symbol, *variant)
            })
    }

    /// One row of symbols and variants.
    pub fn row(&self, y: u32) -> impl Iterator<Item = (TileSymbol, Option<Variant>)> + '_ {
        let width = self.dimensions.width as usize;
        let start = (y as usize * width).min(self.symbols.len());
        let end = (start + width).min(self.symbols.len());
        self.symbols[start..end]
            .iter()
            .copied()
            .zip(self.variants[start..end].iter().copied())
    }

    /// Finds every position holding `symbol`.
    pub fn positions_of(&self, symbol: TileSymbol) -> Vec<Position> {
        self.cells()
            .filter(|(_, s, _)| *s == symbol)
            .map(|(position, _, _)| position)
            .collect()
    }

    /// Same symbols and variants, ignoring hit points.
    pub fn same_layout(&self, other: &TileGrid) -> bool {
        self.dimensions == other.dimensions
            && self.symbols == other.symbols
            && self.variants == other.variants
    }
}
