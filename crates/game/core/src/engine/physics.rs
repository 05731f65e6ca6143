//! Gravity, landing, bounce and swimming.

use std::ops::ControlFlow;

use super::{DamageSource, Flow, GameEvent, Resolution};
use crate::env::TileOracle;
use crate::state::World;

/// Physical state of the runner, derived from the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PhysicsState {
    Grounded,
    Falling,
    Swimming,
    Bouncing,
}

impl PhysicsState {
    pub fn of(world: &World, tiles: &dyn TileOracle) -> Self {
        let position = world.runner.position;
        if world.runner.bounce.pending {
            PhysicsState::Bouncing
        } else if world.behavior_at(tiles, position).is_fluid() {
            PhysicsState::Swimming
        } else if world.behavior_at(tiles, position.below()).solid {
            PhysicsState::Grounded
        } else {
            PhysicsState::Falling
        }
    }
}

impl Resolution<'_> {
    /// Falls until supported or in fluid, then resolves the landing.
    pub(crate) fn apply_full_gravity(&mut self) -> Flow {
        let mut fell = false;
        loop {
            if self.in_fluid() {
                self.world.runner.fall_distance = 0;
                break;
            }
            if self.below().solid {
                break;
            }

            let at = self.world.runner.position.below();
            self.world.runner.position = at;
            fell = true;
            let entered = self.here();

            if !entered.gravity {
                self.world.runner.enter_fluid();
                self.emit(GameEvent::FallBroken { at });
                self.damage(
                    entered.inside_damage.amount,
                    DamageSource::Inside,
                    entered.death_message.as_deref(),
                )?;
                break;
            }

            self.world.runner.fall_distance += 1;
            let fall_distance = self.world.runner.fall_distance;
            self.emit(GameEvent::Falling { at, fall_distance });
            self.damage(
                entered.inside_damage.amount,
                DamageSource::Inside,
                entered.death_message.as_deref(),
            )?;
            if entered.exit {
                return self.handle_exit();
            }
        }

        if !fell {
            return ControlFlow::Continue(());
        }

        if self.here().gravity {
            self.resolve_landing()?;
        } else {
            self.world.runner.fall_distance = 0;
        }

        if self.here().exit {
            return self.handle_exit();
        }
        self.collect_pickup();
        if self.here().exit {
            return self.handle_exit();
        }
        ControlFlow::Continue(())
    }

    /// Gravity after an ordinary move: one forced step while points remain,
    /// a full fall otherwise.
    pub(crate) fn apply_gravity_after_move(&mut self) -> Flow {
        if self.in_fluid() {
            self.world.runner.fall_distance = 0;
            return self.check_standing_hazard();
        }
        if self.below().solid {
            return self.check_standing_hazard();
        }

        if self.world.dice.is_empty() {
            self.apply_full_gravity()?;
            return self.check_standing_hazard();
        }

        let at = self.world.runner.position.below();
        self.world.runner.position = at;
        let entered = self.here();
        if entered.gravity {
            self.world.runner.fall_distance += 1;
            let fall_distance = self.world.runner.fall_distance;
            self.emit(GameEvent::Falling { at, fall_distance });
        } else {
            self.world.runner.fall_distance = 0;
        }

        self.damage(
            entered.inside_damage.amount,
            DamageSource::Inside,
            entered.death_message.as_deref(),
        )?;
        if entered.exit {
            return self.handle_exit();
        }
        self.collect_pickup();
        if self.here().exit {
            return self.handle_exit();
        }

        if self.below().solid && entered.gravity {
            self.resolve_landing()?;
        }
        self.check_standing_hazard()
    }

    /// Landing on the solid cell under the runner.
    ///
    /// A bounce surface never deals fall or standing damage on the landing
    /// itself; any other surface deals fall damage past its threshold and its
    /// standing damage.
    pub(crate) fn resolve_landing(&mut self) -> Flow {
        let at = self.world.runner.position;
        let surface = self.below();
        let fall_distance = self.world.runner.fall_distance;
        self.emit(GameEvent::Landed { at, fall_distance });
        self.world.runner.fall_distance = 0;
        self.standing_resolved = true;
        if !self.in_fluid() {
            self.world.runner.refill_jumps();
        }

        match surface.bounce.height_for(fall_distance) {
            Some(height) => {
                self.start_bounce(height);
                ControlFlow::Continue(())
            }
            None => {
                if !self.in_fluid() {
                    if let Some(amount) = surface.fall_damage.damage_for(fall_distance) {
                        self.damage(amount, DamageSource::Fall, surface.death_message.as_deref())?;
                    }
                }
                self.damage(
                    surface.top_damage.amount,
                    DamageSource::Top,
                    surface.death_message.as_deref(),
                )
            }
        }
    }

    fn start_bounce(&mut self, height: u32) {
        if height == 0 {
            return;
        }
        let runner = &mut self.world.runner;
        runner.bounce.pending = true;
        runner.bounce.remaining = height;
        runner.fall_distance = 0;
        self.emit(GameEvent::BounceStarted { height });
    }

    /// Standing damage from the surface underfoot, once per command.
    pub(crate) fn check_standing_hazard(&mut self) -> Flow {
        if self.in_fluid() {
            self.world.runner.enter_fluid();
            return ControlFlow::Continue(());
        }
        if self.standing_resolved {
            return ControlFlow::Continue(());
        }
        let surface = self.below();
        if !surface.solid {
            return ControlFlow::Continue(());
        }
        self.standing_resolved = true;
        self.damage(
            surface.top_damage.amount,
            DamageSource::Top,
            surface.death_message.as_deref(),
        )
    }

    /// One frame of an active bounce.
    pub(crate) fn bounce_step(&mut self) -> Flow {
        if self.world.runner.bounce.remaining == 0 {
            self.world.runner.bounce.pending = false;
            self.emit(GameEvent::BounceEnded);
            return ControlFlow::Continue(());
        }

        let above = self.behavior(self.world.runner.position.above());
        if above.solid || above.inside_damage.is_harmful() {
            self.world.runner.bounce.pending = false;
            self.emit(GameEvent::BounceEnded);
            return self.damage(
                above.inside_damage.amount,
                DamageSource::Inside,
                above.death_message.as_deref(),
            );
        }

        let at = self.world.runner.position.above();
        self.world.runner.position = at;
        self.world.runner.bounce.remaining -= 1;
        let remaining = self.world.runner.bounce.remaining;
        self.emit(GameEvent::BounceStep { at, remaining });

        self.collect_pickup();
        if self.here().exit {
            return self.handle_exit();
        }
        self.adjacent_attacks()
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{run, set_dice, tiles, world};
    use super::super::{Command, GameEvent};
    use super::*;
    use crate::state::{Direction, Position};

    #[test]
    fn inside_damage_hits_on_entry_whatever_when_says() {
        use super::super::testing::wall;
        use crate::env::{RawDamage, TileDefinition, TileTable};
        use crate::state::TileSymbol;

        let fire = TileDefinition {
            inside_damage: Some(RawDamage {
                amount: 1,
                when: Some("stand".into()),
            }),
            ..TileDefinition::default()
        };
        let tiles =
            TileTable::from_definitions([(TileSymbol('P'), wall()), (TileSymbol('F'), fire)]).0;
        let mut w = world(&["A1R1F1A5", "P8"], &tiles);
        set_dice(&mut w, 2, 0);

        run(&mut w, &tiles, Command::Move(Direction::Right)).expect("move");
        assert_eq!(w.runner.position, Position::new(2, 0));
        assert_eq!(w.runner.hearts, 4);
    }

    fn landed(events: &[GameEvent]) -> Option<u32> {
        events.iter().find_map(|e| match e {
            GameEvent::Landed { fall_distance, .. } => Some(*fall_distance),
            _ => None,
        })
    }

    #[test]
    fn full_gravity_counts_cells_then_resets() {
        let tiles = tiles();
        // Runner at the top of column 1, four open cells, then a floor.
        let mut w = world(&["A1R1A6", "A8", "A8", "A8", "A8", "P8"], &tiles);
        w.runner.fall_distance = 0;
        let out = run(&mut w, &tiles, Command::Roll).expect("roll");
        assert_eq!(landed(&out.events), Some(4));
        assert_eq!(w.runner.fall_distance, 0);
        assert_eq!(w.runner.position, Position::new(1, 4));
        // Threshold 3 with multiplier 1 on the default wall.
        assert_eq!(w.runner.hearts, 4);
    }

    #[test]
    fn fixed_bounce_ignores_fall_damage() {
        let tiles = tiles();
        let mut w = world(&["A1R1A6", "A8", "A8", "A8", "B8"], &tiles);
        run(&mut w, &tiles, Command::Roll).expect("roll");
        assert!(w.runner.bounce.pending);
        assert_eq!(w.runner.bounce.remaining, 2);
        assert_eq!(w.runner.hearts, 5);
        assert_eq!(PhysicsState::of(&w, &tiles), PhysicsState::Bouncing);
    }

    #[test]
    fn dynamic_bounce_height_is_fall_minus_one() {
        let tiles = tiles();
        let mut w = world(&["A1R1A6", "A8", "A8", "A8", "J8"], &tiles);
        run(&mut w, &tiles, Command::Roll).expect("roll");
        assert!(w.runner.bounce.pending);
        assert_eq!(w.runner.bounce.remaining, 2);

        let mut short = world(&["A1R1A6", "A8", "J8"], &tiles);
        run(&mut short, &tiles, Command::Roll).expect("roll");
        assert!(!short.runner.bounce.pending);

        let mut flat = world(&["A1R1A6", "J8"], &tiles);
        run(&mut flat, &tiles, Command::Roll).expect("roll");
        assert!(!flat.runner.bounce.pending);
    }

    #[test]
    fn bounce_rises_each_tick_then_ends() {
        let tiles = tiles();
        let mut w = world(&["A8", "A8", "A8", "A1R1A6", "B8"], &tiles);
        w.runner.bounce.pending = true;
        w.runner.bounce.remaining = 2;

        run(&mut w, &tiles, Command::Tick).expect("tick");
        assert_eq!(w.runner.position, Position::new(1, 2));
        run(&mut w, &tiles, Command::Tick).expect("tick");
        assert_eq!(w.runner.position, Position::new(1, 1));
        run(&mut w, &tiles, Command::Tick).expect("tick");
        assert!(!w.runner.bounce.pending);
        assert_eq!(w.runner.position, Position::new(1, 1));
    }

    #[test]
    fn bounce_stops_under_ceiling() {
        let tiles = tiles();
        let mut w = world(&["A8", "P8", "A1R1A6", "B8"], &tiles);
        w.runner.bounce.pending = true;
        w.runner.bounce.remaining = 3;
        run(&mut w, &tiles, Command::Tick).expect("tick");
        assert!(!w.runner.bounce.pending);
        assert_eq!(w.runner.position, Position::new(1, 2));
    }

    #[test]
    fn falling_into_water_breaks_the_fall() {
        let tiles = tiles();
        let mut w = world(&["A1R1A6", "A8", "A8", "A8", "W8", "P8"], &tiles);
        let out = run(&mut w, &tiles, Command::Roll).expect("roll");
        assert!(
            out.events
                .iter()
                .any(|e| matches!(e, GameEvent::FallBroken { .. }))
        );
        assert_eq!(w.runner.position, Position::new(1, 4));
        assert_eq!(w.runner.fall_distance, 0);
        assert_eq!(w.runner.jump_credits, 1);
        assert_eq!(w.runner.hearts, 5);
        assert_eq!(PhysicsState::of(&w, &tiles), PhysicsState::Swimming);
    }

    #[test]
    fn step_gravity_moves_one_cell_while_points_remain() {
        let tiles = tiles();
        let mut w = world(&["A1R1A6", "P2A6", "A8", "A8", "P8"], &tiles);
        set_dice(&mut w, 3, 3);
        run(&mut w, &tiles, Command::Move(Direction::Right)).expect("move");
        assert_eq!(w.runner.position, Position::new(2, 1));
        assert_eq!(w.runner.fall_distance, 1);
        assert_eq!(PhysicsState::of(&w, &tiles), PhysicsState::Falling);
    }

    #[test]
    fn empty_pool_falls_all_the_way() {
        let tiles = tiles();
        let mut w = world(&["A1R1A6", "P2A6", "A8", "A8", "P8"], &tiles);
        set_dice(&mut w, 1, 0);
        run(&mut w, &tiles, Command::Move(Direction::Right)).expect("move");
        assert_eq!(w.runner.position, Position::new(2, 3));
        assert_eq!(w.runner.fall_distance, 0);
        assert_eq!(PhysicsState::of(&w, &tiles), PhysicsState::Grounded);
    }

    #[test]
    fn standing_damage_applies_once_per_landing() {
        let tiles = tiles();
        let mut w = world(&["A1R1A6", "A8", "S8"], &tiles);
        run(&mut w, &tiles, Command::Roll).expect("roll");
        // Fell one cell: below threshold, so only the spikes hurt.
        assert_eq!(w.runner.hearts, 4);
    }
}
