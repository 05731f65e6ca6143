//! Fog-of-war visibility grid.
//!
//! A bit is set while its cell is still covered. Reveals only ever clear bits.

use super::{MapDimensions, Position};

/// Disk of `(dx, dy)` offsets within a radius, computed once and reused.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FogMask {
    radius: u32,
    offsets: Vec<(i32, i32)>,
}

impl FogMask {
    pub fn disk(radius: u32) -> Self {
        let r = radius as i32;
        let r2 = r * r;
        let mut offsets = Vec::new();
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r2 {
                    offsets.push((dx, dy));
                }
            }
        }
        Self { radius, offsets }
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn offsets(&self) -> &[(i32, i32)] {
        &self.offsets
    }
}

/// Covered/revealed bitset sized to the loaded map.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FogGrid {
    dimensions: MapDimensions,
    covered: Vec<u64>,
    mask: FogMask,
}

impl FogGrid {
    /// All cells start covered.
    pub fn new(dimensions: MapDimensions, mask: FogMask) -> Self {
        let words = dimensions.cell_count().div_ceil(64);
        let mut covered = vec![u64::MAX; words];
        let tail = dimensions.cell_count() % 64;
        if tail != 0 {
            if let Some(last) = covered.last_mut() {
                *last = (1u64 << tail) - 1;
            }
        }
        Self {
            dimensions,
            covered,
            mask,
        }
    }

    /// Out-of-map cells always read as covered.
    pub fn is_covered(&self, position: Position) -> bool {
        match self.bit(position) {
            Some((word, bit)) => self.covered[word] & (1 << bit) != 0,
            None => true,
        }
    }

    /// Uncovers every in-bounds cell of the mask around `center`.
    pub fn reveal_around(&mut self, center: Position) {
        for &(dx, dy) in self.mask.offsets() {
            if let Some((word, bit)) = self.bit(center.offset(dx, dy)) {
                self.covered[word] &= !(1 << bit);
            }
        }
    }

    pub fn covered_count(&self) -> usize {
        self.covered.iter().map(|word| word.count_ones() as usize).sum()
    }

    fn bit(&self, position: Position) -> Option<(usize, u32)> {
        if !self.dimensions.contains(position) {
            return None;
        }
        let idx = position.y as usize * self.dimensions.width as usize + position.x as usize;
        Some((idx / 64, (idx % 64) as u32))
    }
}
