//! Dice pool: the spendable movement budget plus the faces rule checks read.

/// Which of the two counters is drained first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DieSlot {
    #[default]
    A,
    B,
}

impl DieSlot {
    pub const fn other(self) -> Self {
        match self {
            DieSlot::A => DieSlot::B,
            DieSlot::B => DieSlot::A,
        }
    }
}

/// Face values from the most recent roll. Rule evaluation reads these, never
/// the remaining pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiceFaces {
    pub a: u32,
    pub b: u32,
}

impl DiceFaces {
    pub const fn new(a: u32, b: u32) -> Self {
        Self { a, b }
    }

    pub const fn sum(self) -> u32 {
        self.a + self.b
    }

    /// Faces in ascending order.
    pub fn sorted(self) -> (u32, u32) {
        if self.a <= self.b {
            (self.a, self.b)
        } else {
            (self.b, self.a)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("need {needed} movement points, only {available} left")]
pub struct InsufficientMovement {
    pub needed: u32,
    pub available: u32,
}

/// Two independent movement counters refilled by a roll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DicePool {
    remaining_a: u32,
    remaining_b: u32,
    selected: Option<DieSlot>,
    faces: DiceFaces,
}

impl DicePool {
    /// Replaces both counters and faces with a fresh roll.
    pub fn roll(&mut self, faces: DiceFaces) {
        self.faces = faces;
        self.remaining_a = faces.a;
        self.remaining_b = faces.b;
    }

    pub fn faces(&self) -> DiceFaces {
        self.faces
    }

    pub fn remaining(&self, slot: DieSlot) -> u32 {
        match slot {
            DieSlot::A => self.remaining_a,
            DieSlot::B => self.remaining_b,
        }
    }

    pub fn total(&self) -> u32 {
        self.remaining_a + self.remaining_b
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn selected(&self) -> Option<DieSlot> {
        self.selected
    }

    /// Toggles the selected counter; selecting the current one clears it.
    pub fn select(&mut self, slot: DieSlot) {
        self.selected = if self.selected == Some(slot) {
            None
        } else {
            Some(slot)
        };
    }

    /// Spends `cost` points, draining the selected counter first and
    /// switching when it runs dry. Fails without touching the pool when the
    /// combined total is too small.
    pub fn spend(&mut self, cost: u32) -> Result<(), InsufficientMovement> {
        let available = self.total();
        if available < cost {
            return Err(InsufficientMovement {
                needed: cost,
                available,
            });
        }
        for _ in 0..cost {
            let slot = self.selected.unwrap_or_default();
            let slot = if self.remaining(slot) > 0 {
                slot
            } else {
                slot.other()
            };
            self.selected = Some(slot);
            match slot {
                DieSlot::A => self.remaining_a -= 1,
                DieSlot::B => self.remaining_b -= 1,
            }
        }
        Ok(())
    }

    /// Empties both counters and forgets the faces (game over).
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rolled(a: u32, b: u32) -> DicePool {
        let mut pool = DicePool::default();
        pool.roll(DiceFaces::new(a, b));
        pool
    }

    #[test]
    fn spend_switches_to_other_counter() {
        let mut pool = rolled(1, 3);
        pool.spend(2).expect("enough points");
        assert_eq!(pool.remaining(DieSlot::A), 0);
        assert_eq!(pool.remaining(DieSlot::B), 2);
        assert_eq!(pool.selected(), Some(DieSlot::B));
    }

    #[test]
    fn spend_is_atomic_when_short() {
        let mut pool = rolled(1, 1);
        let before = pool;
        let err = pool.spend(3).unwrap_err();
        assert_eq!(err.needed, 3);
        assert_eq!(err.available, 2);
        assert_eq!(pool, before);
    }

    #[test]
    fn selected_counter_drains_first() {
        let mut pool = rolled(4, 4);
        pool.select(DieSlot::B);
        pool.spend(3).expect("enough points");
        assert_eq!(pool.remaining(DieSlot::A), 4);
        assert_eq!(pool.remaining(DieSlot::B), 1);
    }

    #[test]
    fn faces_survive_spending() {
        let mut pool = rolled(6, 2);
        pool.spend(5).expect("enough points");
        assert_eq!(pool.faces(), DiceFaces::new(6, 2));
        assert_eq!(pool.total(), 3);
    }
}
