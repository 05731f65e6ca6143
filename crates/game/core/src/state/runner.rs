use crate::config::GameConfig;

use super::Position;

/// Stats that survive a level transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarriedStats {
    pub hearts: u32,
    pub score: u32,
    pub kills: u32,
    pub turbo: bool,
    pub turbo_multiplier: u32,
}

impl CarriedStats {
    pub const DEFAULT_HEARTS: u32 = 5;
    pub const DEFAULT_TURBO_MULTIPLIER: u32 = 2;
}

impl Default for CarriedStats {
    fn default() -> Self {
        Self {
            hearts: Self::DEFAULT_HEARTS,
            score: 0,
            kills: 0,
            turbo: false,
            turbo_multiplier: Self::DEFAULT_TURBO_MULTIPLIER,
        }
    }
}

/// Frame counters driving the renderer's flash effects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlashTimers {
    pub damage: u8,
    pub diamond: u8,
    pub turbo: u8,
    pub heart: u8,
}

impl FlashTimers {
    /// Counts every active timer down by one frame.
    pub fn decay(&mut self) {
        for timer in [
            &mut self.damage,
            &mut self.diamond,
            &mut self.turbo,
            &mut self.heart,
        ] {
            *timer = timer.saturating_sub(1);
        }
    }
}

/// Pending upward bounce, advanced one cell per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BounceState {
    pub pending: bool,
    pub remaining: u32,
}

/// The controllable runner.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Runner {
    pub position: Position,
    pub hearts: u32,
    pub score: u32,
    pub kills: u32,
    pub jump_credits: u8,
    pub turbo: bool,
    pub turbo_multiplier: u32,
    /// Consecutive unsupported cells traversed since the last support.
    pub fall_distance: u32,
    pub flash: FlashTimers,
    pub bounce: BounceState,
    pub facing_left: bool,
    pub dead: bool,
}

impl Runner {
    pub fn new(position: Position, carried: CarriedStats) -> Self {
        Self {
            position,
            hearts: carried.hearts,
            score: carried.score,
            kills: carried.kills,
            jump_credits: 0,
            turbo: carried.turbo,
            turbo_multiplier: carried.turbo_multiplier.max(1),
            fall_distance: 0,
            flash: FlashTimers::default(),
            bounce: BounceState::default(),
            facing_left: false,
            dead: false,
        }
    }

    pub fn carried(&self) -> CarriedStats {
        CarriedStats {
            hearts: self.hearts,
            score: self.score,
            kills: self.kills,
            turbo: self.turbo,
            turbo_multiplier: self.turbo_multiplier,
        }
    }

    /// Removes hearts and lights the damage flash. Returns true when the
    /// runner has no hearts left.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        self.hearts = self.hearts.saturating_sub(amount);
        self.flash.damage = GameConfig::FLASH_FRAMES;
        self.hearts == 0
    }

    pub fn refill_jumps(&mut self) {
        self.jump_credits = GameConfig::MAX_JUMP_CREDITS;
    }

    /// Swimming: no fall accumulation and a single jump credit.
    pub fn enter_fluid(&mut self) {
        self.fall_distance = 0;
        self.jump_credits = GameConfig::FLUID_JUMP_CREDITS;
    }

    pub fn end_turbo(&mut self) {
        self.turbo = false;
        self.flash.turbo = 0;
    }
}
