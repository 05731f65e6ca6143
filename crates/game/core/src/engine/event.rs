//! Events emitted while a command resolves.
//!
//! The engine never logs; callers render or log these instead.

use crate::env::PickupKind;
use crate::state::{DiceFaces, DieSlot, Direction, Position};

/// What dealt damage to the runner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum DamageSource {
    /// On-entry damage of the cell the runner moved into.
    Inside,
    /// On-standing damage of the surface under the runner.
    Top,
    Fall,
    Drowning,
    Monster,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameEvent {
    Rolled {
        faces: DiceFaces,
    },
    DieSelected {
        slot: Option<DieSlot>,
    },
    Moved {
        from: Position,
        to: Position,
        direction: Direction,
    },
    SlopeClimbed {
        at: Position,
    },
    /// Bumped into a solid cell. Carries the cell's sign text, if any.
    Blocked {
        at: Position,
        sign: Option<String>,
    },
    Falling {
        at: Position,
        fall_distance: u32,
    },
    /// Support found after a fall; the distance is the one landing resolves.
    Landed {
        at: Position,
        fall_distance: u32,
    },
    /// A fall ended in fluid.
    FallBroken {
        at: Position,
    },
    /// Stepped down from dry ground into fluid.
    Splash {
        at: Position,
    },
    Swimming {
        at: Position,
    },
    Damaged {
        amount: u32,
        source: DamageSource,
        hearts_left: u32,
    },
    BounceStarted {
        height: u32,
    },
    BounceStep {
        at: Position,
        remaining: u32,
    },
    BounceEnded,
    PickedUp {
        kind: PickupKind,
        at: Position,
        message: Option<String>,
    },
    LockOpened {
        at: Position,
        message: String,
    },
    LockFailed {
        at: Position,
        message: String,
    },
    MonsterHit {
        at: Position,
        damage: u32,
        hp_left: i32,
        message: String,
    },
    MonsterMissed {
        at: Position,
        message: String,
    },
    /// A monster's attack landed on the runner.
    MonsterStruck {
        at: Position,
        damage: u32,
        message: String,
    },
    MonsterBlocks {
        at: Position,
        message: String,
    },
    MonsterDefeated {
        at: Position,
        name: String,
    },
    TurboStarted,
    TurboEnded,
    ExitReached {
        key: String,
    },
    /// The exit has no map for its key; play continues in place.
    ExitUnwired {
        key: String,
    },
    GameOver {
        reason: Option<String>,
    },
}

impl GameEvent {
    /// Short player-facing line, when the event has one.
    pub fn message(&self) -> Option<String> {
        match self {
            GameEvent::Rolled { faces } => Some(format!(
                "Rolled {}+{} = {}",
                faces.a,
                faces.b,
                faces.sum()
            )),
            GameEvent::Blocked { sign, .. } => {
                Some(sign.clone().unwrap_or_else(|| "Blocked".to_owned()))
            }
            GameEvent::FallBroken { .. } => Some("Fall was broken.".to_owned()),
            GameEvent::Splash { .. } => Some("Splash! You're in water.".to_owned()),
            GameEvent::Damaged {
                amount,
                source: DamageSource::Fall,
                ..
            } => Some(format!("Ouch that was a hard fall. Fall damage -{amount}")),
            GameEvent::Damaged {
                source: DamageSource::Drowning,
                ..
            } => Some("Drowning, took damage".to_owned()),
            GameEvent::Damaged {
                source: DamageSource::Top,
                ..
            } => Some("Hazard underfoot".to_owned()),
            GameEvent::BounceStarted { .. } => Some("Bounce".to_owned()),
            GameEvent::PickedUp { message, .. } => message.clone(),
            GameEvent::LockOpened { message, .. }
            | GameEvent::LockFailed { message, .. }
            | GameEvent::MonsterHit { message, .. }
            | GameEvent::MonsterMissed { message, .. }
            | GameEvent::MonsterStruck { message, .. }
            | GameEvent::MonsterBlocks { message, .. } => Some(message.clone()),
            GameEvent::MonsterDefeated { name, .. } => Some(format!("{name} defeated.")),
            GameEvent::ExitReached { key } => Some(format!("Entering {key}...")),
            GameEvent::ExitUnwired { key } => Some(format!("Exit {key} is not wired")),
            GameEvent::GameOver { reason } => {
                Some(reason.clone().unwrap_or_else(|| "Game over".to_owned()))
            }
            _ => None,
        }
    }
}
