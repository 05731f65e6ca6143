use std::fmt;

/// Discrete grid position expressed in tile coordinates.
///
/// `x` is the column, `y` is the row; rows grow downward so "up" is `y - 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub const fn above(self) -> Self {
        self.offset(0, -1)
    }

    pub const fn below(self) -> Self {
        self.offset(0, 1)
    }

    /// Chebyshev distance (diagonal steps count as one).
    pub fn chebyshev(self, other: Position) -> u32 {
        let dx = (self.x - other.x).unsigned_abs();
        let dy = (self.y - other.y).unsigned_abs();
        dx.max(dy)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Movement directions a runner can be commanded in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
    /// Diagonal ascent to the left.
    UpLeft,
    /// Diagonal ascent to the right.
    UpRight,
}

impl Direction {
    /// Order in which neighbouring monsters get a counter-attack roll.
    pub const ADJACENT_SCAN: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::UpLeft => (-1, -1),
            Direction::UpRight => (1, -1),
        }
    }

    pub const fn is_diagonal(self) -> bool {
        matches!(self, Direction::UpLeft | Direction::UpRight)
    }

    pub const fn is_ascent(self) -> bool {
        matches!(self, Direction::Up | Direction::UpLeft | Direction::UpRight)
    }

    /// Horizontal and upward commands expand to two steps under turbo.
    pub const fn turbo_eligible(self) -> bool {
        !matches!(self, Direction::Down)
    }
}
