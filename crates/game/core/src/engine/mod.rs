//! Command execution.
//!
//! [`GameEngine`] is the only writer of a [`World`]. Each call to
//! [`GameEngine::execute`] runs one command to completion and returns the
//! events it produced, plus a level transition when an exit fired.

mod combat;
mod errors;
mod event;
mod movement;
mod physics;
mod settle;

use std::ops::ControlFlow;

pub use errors::CommandError;
pub use event::{DamageSource, GameEvent};
pub use physics::PhysicsState;

use crate::codec;
use crate::env::{Env, TileBehavior};
use crate::state::{DieSlot, Direction, Position, World, WorldStatus};

/// `Break` stops the rest of the current resolution (game over or exit).
pub(crate) type Flow = ControlFlow<()>;

/// Player and frame inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    Move(Direction),
    Roll,
    SelectDie(DieSlot),
    /// One render frame: timers, bounce step, fog.
    Tick,
}

/// Hand-off produced when the runner enters a wired exit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelTransition {
    /// Destination key: the exit cell's variant, or `default`.
    pub key: String,
    /// Encoded map for the next level.
    pub map: String,
    /// Carried-stats string for the next level.
    pub stats: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Outcome {
    pub events: Vec<GameEvent>,
    pub transition: Option<LevelTransition>,
}

/// Marks a two-step turbo move in progress so its steps never expand again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TurboExpansion {
    #[default]
    Idle,
    Expanding {
        /// The single gravity correction between the two steps was spent.
        gravity_used: bool,
    },
}

impl TurboExpansion {
    pub const fn is_active(self) -> bool {
        matches!(self, TurboExpansion::Expanding { .. })
    }
}

pub struct GameEngine<'a> {
    world: &'a mut World,
}

impl<'a> GameEngine<'a> {
    pub fn new(world: &'a mut World) -> Self {
        Self { world }
    }

    /// Runs one command against the world.
    ///
    /// Rejected commands return an error and leave the world as it was.
    pub fn execute(&mut self, env: Env<'_>, command: Command) -> Result<Outcome, CommandError> {
        if self.world.is_over() && command != Command::Tick {
            return Err(CommandError::GameOver);
        }

        let mut resolution = Resolution::new(self.world, env);
        match command {
            Command::Move(direction) => resolution.command_move(direction)?,
            Command::Roll => resolution.roll(),
            Command::SelectDie(slot) => {
                resolution.world.dice.select(slot);
                let slot = resolution.world.dice.selected();
                resolution.emit(GameEvent::DieSelected { slot });
            }
            Command::Tick => resolution.tick(),
        }
        resolution.reveal_fog();
        Ok(resolution.finish())
    }

    pub fn world(&self) -> &World {
        self.world
    }
}

/// Working context for a single command.
pub(crate) struct Resolution<'a> {
    world: &'a mut World,
    env: Env<'a>,
    events: Vec<GameEvent>,
    transition: Option<LevelTransition>,
    expansion: TurboExpansion,
    /// Standing damage already dealt during this command.
    standing_resolved: bool,
    death_reason: Option<String>,
}

impl<'a> Resolution<'a> {
    fn new(world: &'a mut World, env: Env<'a>) -> Self {
        Self {
            world,
            env,
            events: Vec::new(),
            transition: None,
            expansion: TurboExpansion::Idle,
            standing_resolved: false,
            death_reason: None,
        }
    }

    fn finish(self) -> Outcome {
        Outcome {
            events: self.events,
            transition: self.transition,
        }
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Behavior lookup that does not borrow the world.
    pub(crate) fn behavior(&self, position: Position) -> &'a TileBehavior {
        let tiles = self.env.tiles;
        self.world.behavior_at(tiles, position)
    }

    pub(crate) fn here(&self) -> &'a TileBehavior {
        self.behavior(self.world.runner.position)
    }

    pub(crate) fn below(&self) -> &'a TileBehavior {
        self.behavior(self.world.runner.position.below())
    }

    pub(crate) fn in_fluid(&self) -> bool {
        self.here().is_fluid()
    }

    /// Deals damage to the runner; ends the game when hearts run out.
    pub(crate) fn damage(
        &mut self,
        amount: u32,
        source: DamageSource,
        death_message: Option<&str>,
    ) -> Flow {
        if amount == 0 {
            return ControlFlow::Continue(());
        }
        let dead = self.world.runner.take_damage(amount);
        self.death_reason = death_message.map(str::to_owned);
        self.emit(GameEvent::Damaged {
            amount,
            source,
            hearts_left: self.world.runner.hearts,
        });
        if dead {
            self.game_over();
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    }

    fn game_over(&mut self) {
        let reason = self.death_reason.take();
        self.world.runner.dead = true;
        self.world.dice.clear();
        self.world.status = WorldStatus::GameOver {
            reason: reason.clone(),
        };
        self.emit(GameEvent::GameOver { reason });
    }

    /// Runner stands on an exit. Always stops further resolution.
    pub(crate) fn handle_exit(&mut self) -> Flow {
        let position = self.world.runner.position;
        let key = self
            .world
            .grid
            .variant(position)
            .map(|v| v.as_str().to_owned())
            .unwrap_or_else(|| crate::env::VariantText::DEFAULT_KEY.to_owned());

        match self.behavior(position).destination(&key) {
            Some(map) => {
                self.transition = Some(LevelTransition {
                    key: key.clone(),
                    map: map.to_owned(),
                    stats: codec::encode_stats(&self.world.carried()),
                });
                self.emit(GameEvent::ExitReached { key });
            }
            None => self.emit(GameEvent::ExitUnwired { key }),
        }
        ControlFlow::Break(())
    }

    /// Turns turbo off once the runner is swimming or out of points.
    fn settle_turbo(&mut self) {
        if self.world.runner.turbo && (self.in_fluid() || self.world.dice.is_empty()) {
            self.world.runner.end_turbo();
            self.emit(GameEvent::TurboEnded);
        }
    }

    fn reveal_fog(&mut self) {
        let position = self.world.runner.position;
        if let Some(fog) = self.world.fog.as_mut() {
            fog.reveal_around(position);
        }
    }

    fn tick(&mut self) {
        self.world.runner.flash.decay();
        if self.world.runner.bounce.pending && !self.world.is_over() {
            let _ = self.bounce_step();
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Small world builder shared by the engine tests.

    use super::*;
    use crate::config::GameConfig;
    use crate::env::{PcgRng, RawDamage, TileDefinition, TileTable};
    use crate::rules::RawDiceRule;
    use crate::state::{CarriedStats, DiceFaces, TileSymbol};

    pub fn wall() -> TileDefinition {
        TileDefinition {
            solid: Some(true),
            ..TileDefinition::default()
        }
    }

    /// `P` wall, `W` water, `S` spikes underfoot, `L` lava inside,
    /// `B` fixed bounce 2, `J` dynamic bounce, `D` diamond, `T` turbo,
    /// `E` exit, `K` lock (a: sum 7), `M` monster (a: hp 2, hit on 6),
    /// `/` right slope.
    pub fn tiles() -> TileTable {
        let mut defs = vec![
            (TileSymbol('P'), wall()),
            (
                TileSymbol('W'),
                TileDefinition {
                    gravity: Some(false),
                    move_cost_inside: Some(2),
                    ..TileDefinition::default()
                },
            ),
            (
                TileSymbol('S'),
                TileDefinition {
                    top_damage: Some(RawDamage {
                        amount: 1,
                        when: Some("stand".into()),
                    }),
                    death_message: Some("Spiked.".into()),
                    ..wall()
                },
            ),
            (
                TileSymbol('L'),
                TileDefinition {
                    inside_damage: Some(RawDamage {
                        amount: 1,
                        when: None,
                    }),
                    death_message: Some("Burned.".into()),
                    ..TileDefinition::default()
                },
            ),
            (
                TileSymbol('B'),
                TileDefinition {
                    bounce: Some(2),
                    ..wall()
                },
            ),
            (
                TileSymbol('J'),
                TileDefinition {
                    bounce: Some(0),
                    ..wall()
                },
            ),
            (
                TileSymbol('D'),
                TileDefinition {
                    pickup_type: Some("diamond".into()),
                    pickup_message: Some("Shiny!".into()),
                    ..TileDefinition::default()
                },
            ),
            (
                TileSymbol('T'),
                TileDefinition {
                    pickup_type: Some("turbo".into()),
                    ..TileDefinition::default()
                },
            ),
            (
                TileSymbol('Z'),
                TileDefinition {
                    slope: Some("right".into()),
                    ..wall()
                },
            ),
        ];

        let mut exit = TileDefinition {
            exit: true,
            ..TileDefinition::default()
        };
        exit.destinations.insert("default".into(), "P25".into());
        defs.push((TileSymbol::EXIT, exit));

        let mut lock = wall();
        lock.lock.insert(
            "a".into(),
            RawDiceRule {
                dice: 2,
                sum: Some(7),
                ..RawDiceRule::default()
            },
        );
        defs.push((TileSymbol::LOCK, lock));

        let mut monster = wall();
        monster.monster.insert(
            "a".into(),
            crate::env::RawMonster {
                name: Some("Goblin".into()),
                hp: Some(2),
                player_hit: Some(RawDiceRule {
                    dice: 1,
                    value: Some(6),
                    damage: Some(1),
                    ..RawDiceRule::default()
                }),
                monster_hit: Some(RawDiceRule {
                    dice: 1,
                    value: Some(1),
                    damage: Some(1),
                    message_hit: Some("Clawed.".into()),
                    ..RawDiceRule::default()
                }),
                ..crate::env::RawMonster::default()
            },
        );
        defs.push((TileSymbol::MONSTER, monster));

        TileTable::from_definitions(defs).0
    }

    /// Loads a small map; rows are given top to bottom.
    pub fn world(rows: &[&str], tiles: &TileTable) -> World {
        let cols = 8;
        let config = GameConfig::new().with_dimensions(rows.len() as u32, cols);
        World::load(&rows.join("~"), config, tiles, CarriedStats::default(), 9)
    }

    pub fn set_dice(world: &mut World, a: u32, b: u32) {
        world.dice.roll(DiceFaces::new(a, b));
    }

    pub fn run(world: &mut World, tiles: &TileTable, command: Command) -> Result<Outcome, CommandError> {
        let rng = PcgRng;
        GameEngine::new(world).execute(Env::new(tiles, &rng), command)
    }
}
