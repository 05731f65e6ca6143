use crate::state::Position;

/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Number of grid rows every decoded map is padded or truncated to.
    pub rows: u32,
    /// Number of grid columns every decoded row is padded or truncated to.
    pub cols: u32,
    /// Whether the fog-of-war grid is tracked at all.
    pub fog_enabled: bool,
    /// Reveal radius around the runner, in cells.
    pub fog_radius: u32,
    /// Starting cell when the map has no spawn tile.
    /// `None` means column 1 of the bottom row.
    pub default_spawn: Option<Position>,
}

impl GameConfig {
    // ===== compile-time constants =====
    pub const DEFAULT_ROWS: u32 = 15;
    pub const DEFAULT_COLS: u32 = 25;
    pub const DEFAULT_FOG_RADIUS: u32 = 5;

    /// Longest variant identifier kept after sanitizing.
    pub const MAX_VARIANT_LEN: usize = 12;
    /// Jump credits granted on landing or rolling.
    pub const MAX_JUMP_CREDITS: u8 = 2;
    /// Jump credits available while swimming.
    pub const FLUID_JUMP_CREDITS: u8 = 1;
    /// Frames a visual flash stays lit.
    pub const FLASH_FRAMES: u8 = 10;
    /// Movement points charged for a diagonal ascent.
    pub const DIAGONAL_COST: u32 = 2;
    /// Movement points charged for a whole turbo expansion.
    pub const TURBO_COST: u32 = 1;
    /// Damage dealt when rolling while submerged.
    pub const DROWNING_DAMAGE: u32 = 1;
    /// Number of faces on each die.
    pub const DIE_SIDES: u32 = 6;

    pub fn new() -> Self {
        Self {
            rows: Self::DEFAULT_ROWS,
            cols: Self::DEFAULT_COLS,
            fog_enabled: false,
            fog_radius: Self::DEFAULT_FOG_RADIUS,
            default_spawn: None,
        }
    }

    pub fn with_fog(mut self, enabled: bool) -> Self {
        self.fog_enabled = enabled;
        self
    }

    pub fn with_dimensions(mut self, rows: u32, cols: u32) -> Self {
        self.rows = rows.max(1);
        self.cols = cols.max(1);
        self
    }

    pub fn dimensions(&self) -> crate::state::MapDimensions {
        crate::state::MapDimensions::new(self.cols, self.rows)
    }

    /// Spawn cell used when the decoded map carries no spawn tile.
    pub fn fallback_spawn(&self) -> Position {
        self.default_spawn
            .unwrap_or_else(|| Position::new(1, self.rows as i32 - 1))
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
