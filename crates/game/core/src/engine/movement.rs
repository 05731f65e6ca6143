//! Movement commands, turbo expansion and dice rolls.

use std::ops::ControlFlow;

use super::combat::LockAttempt;
use super::{CommandError, DamageSource, Flow, GameEvent, Resolution, TurboExpansion};
use crate::config::GameConfig;
use crate::state::{Direction, Position};

/// Where a step would end.
enum Target {
    Open(Position),
    Blocked(Position),
}

/// Result of one turbo sub-step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StepOutcome {
    Moved,
    Blocked,
    /// Exit or game over; nothing else may run.
    Halted,
}

impl Resolution<'_> {
    pub(crate) fn command_move(&mut self, direction: Direction) -> Result<(), CommandError> {
        if self.world.dice.is_empty() {
            return Err(CommandError::NoMovementPoints);
        }

        if direction == Direction::Down {
            self.force_down()?;
        } else if self.world.runner.turbo
            && direction.turbo_eligible()
            && !self.expansion.is_active()
        {
            self.turbo_move(direction)?;
        } else {
            self.single_move(direction)?;
        }

        if !self.world.is_over() {
            self.settle_turbo();
        }
        Ok(())
    }

    /// Slope redirect and solidity check for a step from the runner's cell.
    fn resolve_target(&mut self, dx: i32, dy: i32) -> Target {
        let to = self.world.runner.position.offset(dx, dy);
        let target = self.behavior(to);
        if !target.solid {
            return Target::Open(to);
        }
        match target.slope {
            Some(slope) if slope.climbable_with(dx) && !self.behavior(to.above()).solid => {
                self.emit(GameEvent::SlopeClimbed { at: to });
                Target::Open(to.above())
            }
            _ => Target::Blocked(to),
        }
    }

    /// Bumping a solid cell: locks and monsters resolve, anything else
    /// reports the block.
    fn bump(&mut self, at: Position) -> Flow {
        use crate::env::TileKind;
        match self.behavior(at).kind {
            TileKind::Lock => {
                if self.try_unlock(at) == LockAttempt::NoRule {
                    self.report_blocked(at);
                }
                ControlFlow::Continue(())
            }
            TileKind::Monster => self.fight(at),
            _ => {
                self.report_blocked(at);
                ControlFlow::Continue(())
            }
        }
    }

    pub(crate) fn report_blocked(&mut self, at: Position) {
        let sign = self.world.sign_at(self.env.tiles, at);
        self.emit(GameEvent::Blocked { at, sign });
    }

    fn single_move(&mut self, direction: Direction) -> Result<(), CommandError> {
        let (dx, dy) = direction.delta();
        let from = self.world.runner.position;
        let here = self.here();

        let to = match self.resolve_target(dx, dy) {
            Target::Open(to) => to,
            Target::Blocked(at) => {
                let _ = self.bump(at);
                return Ok(());
            }
        };
        let target = self.behavior(to);

        let grounded = self.below().solid && !here.is_fluid();
        let credits = if grounded {
            GameConfig::MAX_JUMP_CREDITS
        } else {
            self.world.runner.jump_credits
        };
        if direction.is_ascent() && !here.is_fluid() && credits == 0 {
            return Err(CommandError::NoJumpCredit);
        }

        let cost = if direction.is_diagonal() {
            GameConfig::DIAGONAL_COST
        } else if here.is_fluid() {
            target.cost_inside
        } else {
            target.cost_top
        };
        self.world.dice.spend(cost)?;

        if grounded {
            self.world.runner.refill_jumps();
        }
        if dx != 0 {
            self.world.runner.facing_left = dx < 0;
        }

        self.world.runner.position = to;
        self.emit(GameEvent::Moved {
            from,
            to,
            direction,
        });

        let _ = self.after_single_move(direction, target.is_fluid());
        Ok(())
    }

    fn after_single_move(&mut self, direction: Direction, entered_fluid: bool) -> Flow {
        if self.world.runner.fall_distance > 0 && self.below().solid {
            self.resolve_landing()?;
        }
        if entered_fluid {
            self.world.runner.enter_fluid();
        } else if direction.is_ascent() {
            let runner = &mut self.world.runner;
            runner.jump_credits = runner.jump_credits.saturating_sub(1);
        }

        self.collect_pickup();
        if self.here().exit {
            return self.handle_exit();
        }

        let here = self.here();
        self.damage(
            here.inside_damage.amount,
            DamageSource::Inside,
            here.death_message.as_deref(),
        )?;

        if here.is_fluid() {
            self.world.runner.fall_distance = 0;
            let at = self.world.runner.position;
            self.emit(GameEvent::Swimming { at });
        } else if direction.is_ascent() {
            // No gravity right after a jump, or step gravity would undo it.
            self.world.runner.fall_distance = 0;
        } else {
            self.apply_gravity_after_move()?;
        }

        self.adjacent_attacks()
    }

    /// Two steps for one point. Only the first step may be followed by a
    /// gravity correction, and only for horizontal moves.
    fn turbo_move(&mut self, direction: Direction) -> Result<(), CommandError> {
        let ascent = direction.is_ascent();
        let swimming = self.in_fluid();
        if ascent && !swimming && self.world.runner.jump_credits == 0 {
            return Err(CommandError::NoJumpCredit);
        }
        self.world.dice.spend(GameConfig::TURBO_COST)?;
        if ascent && !swimming {
            self.world.runner.jump_credits -= 1;
        }

        self.expansion = TurboExpansion::Expanding {
            gravity_used: false,
        };
        self.emit(GameEvent::TurboStarted);
        let _ = self.turbo_sequence(direction);
        self.expansion = TurboExpansion::Idle;
        Ok(())
    }

    fn turbo_sequence(&mut self, direction: Direction) -> Flow {
        match self.attempt_step(direction) {
            StepOutcome::Moved => {}
            StepOutcome::Blocked | StepOutcome::Halted => return ControlFlow::Break(()),
        }

        let (_, dy) = direction.delta();
        if dy == 0
            && self.expansion
                == (TurboExpansion::Expanding {
                    gravity_used: false,
                })
        {
            self.expansion = TurboExpansion::Expanding { gravity_used: true };
            self.apply_gravity_after_move()?;
        }

        if self.attempt_step(direction) == StepOutcome::Halted {
            return ControlFlow::Break(());
        }
        self.adjacent_attacks()
    }

    /// One cell of a turbo move: no cost, no jump gating, no gravity.
    fn attempt_step(&mut self, direction: Direction) -> StepOutcome {
        let (dx, dy) = direction.delta();
        let from = self.world.runner.position;
        let to = match self.resolve_target(dx, dy) {
            Target::Open(to) => to,
            Target::Blocked(at) => {
                return match self.bump(at) {
                    ControlFlow::Continue(()) => StepOutcome::Blocked,
                    ControlFlow::Break(()) => StepOutcome::Halted,
                };
            }
        };

        let was_supported = self.below().solid;
        self.world.runner.position = to;
        if dx != 0 {
            self.world.runner.facing_left = dx < 0;
        }
        self.emit(GameEvent::Moved {
            from,
            to,
            direction,
        });
        if !was_supported && self.below().solid {
            self.world.runner.fall_distance = 0;
        }

        if self.here().exit {
            let _ = self.handle_exit();
            return StepOutcome::Halted;
        }
        self.collect_pickup();
        StepOutcome::Moved
    }

    /// Manual descent. Costs points only while swimming; stomps a monster or
    /// tries a lock directly below before moving.
    fn force_down(&mut self) -> Result<(), CommandError> {
        let here = self.here();
        if !here.gravity {
            self.world.dice.spend(here.cost_inside)?;
        }
        let _ = self.descend(here.is_fluid());
        Ok(())
    }

    fn descend(&mut self, was_in_fluid: bool) -> Flow {
        use crate::env::TileKind;

        let from = self.world.runner.position;
        let target = from.below();
        match self.behavior(target).kind {
            TileKind::Monster => {
                self.fight(target)?;
                if self.behavior(target).solid {
                    return ControlFlow::Continue(());
                }
            }
            TileKind::Lock => {
                let attempt = self.try_unlock(target);
                if attempt != LockAttempt::Opened && self.behavior(target).solid {
                    if attempt == LockAttempt::NoRule {
                        self.report_blocked(target);
                    }
                    return ControlFlow::Continue(());
                }
            }
            _ => {}
        }
        if self.behavior(target).solid {
            self.report_blocked(target);
            return ControlFlow::Continue(());
        }

        self.world.runner.position = target;
        self.emit(GameEvent::Moved {
            from,
            to: target,
            direction: Direction::Down,
        });

        let entered = self.here();
        if entered.gravity {
            self.world.runner.fall_distance += 1;
        } else {
            self.world.runner.enter_fluid();
            if !was_in_fluid {
                self.emit(GameEvent::Splash { at: target });
            }
        }
        if entered.exit {
            return self.handle_exit();
        }
        self.damage(
            entered.inside_damage.amount,
            DamageSource::Inside,
            entered.death_message.as_deref(),
        )?;
        self.collect_pickup();

        if self.below().solid && entered.gravity {
            self.resolve_landing()?;
        }
        self.adjacent_attacks()
    }

    /// Refills the pool. Rolling ends turbo and hurts while submerged.
    pub(crate) fn roll(&mut self) {
        if self.world.runner.turbo {
            self.world.runner.end_turbo();
            self.emit(GameEvent::TurboEnded);
        }

        if self.in_fluid() {
            let here = self.here();
            if self
                .damage(
                    GameConfig::DROWNING_DAMAGE,
                    DamageSource::Drowning,
                    here.death_message.as_deref(),
                )
                .is_break()
            {
                return;
            }
        }

        self.world.roll_count += 1;
        let faces = self
            .env
            .rng
            .roll_pair(self.world.game_seed, self.world.roll_count);
        self.world.dice.roll(faces);
        self.emit(GameEvent::Rolled { faces });

        self.world.runner.refill_jumps();
        if self.in_fluid() {
            self.world.runner.enter_fluid();
        } else if !self.below().solid {
            let _ = self.apply_full_gravity();
        }
    }
}
