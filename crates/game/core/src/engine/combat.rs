//! Dice-gated locks and monster fights.
//!
//! Every check reads the faces of the last roll, not the points left to
//! spend, so a fight or lock can be retried with the same roll.

use std::ops::ControlFlow;

use super::{DamageSource, Flow, GameEvent, Resolution};
use crate::rules::{LockRule, MonsterSpec};
use crate::state::{Direction, Position, TileSymbol, Variant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LockAttempt {
    Opened,
    Failed,
    /// No rule for this cell's variant.
    NoRule,
}

impl Resolution<'_> {
    pub(crate) fn try_unlock(&mut self, at: Position) -> LockAttempt {
        let variant = self.world.grid.variant(at);
        let Some(lock) = self.behavior(at).lock(variant) else {
            return LockAttempt::NoRule;
        };

        if lock.rule.matches(self.world.dice.faces()) {
            self.world.grid.clear(at);
            let message = lock
                .rule
                .message_hit
                .clone()
                .unwrap_or_else(|| LockRule::OPENED_MESSAGE.to_owned());
            self.emit(GameEvent::LockOpened { at, message });
            LockAttempt::Opened
        } else {
            let message = lock.fail_message().to_owned();
            self.emit(GameEvent::LockFailed { at, message });
            LockAttempt::Failed
        }
    }

    /// Runner attacks the monster at `at`; a surviving monster may strike
    /// back once.
    pub(crate) fn fight(&mut self, at: Position) -> Flow {
        let variant = self.world.grid.variant(at);
        let Some(spec) = self.behavior(at).monster(variant) else {
            self.report_blocked(at);
            return ControlFlow::Continue(());
        };
        let faces = self.world.dice.faces();
        let mut hp = self.world.grid.monster_hp(at).unwrap_or(spec.hp);

        if let Some(attack) = &spec.player_hit {
            if !attack.matches(faces) {
                let message = attack
                    .message_fail
                    .as_deref()
                    .or(spec.message_fail.as_deref())
                    .unwrap_or(MonsterSpec::MISS_MESSAGE)
                    .to_owned();
                self.emit(GameEvent::MonsterMissed { at, message });
                return ControlFlow::Continue(());
            }
            hp = hp.saturating_sub(i32::try_from(attack.damage).unwrap_or(i32::MAX));
            self.world.grid.set_monster_hp(at, Some(hp));
            let message = attack
                .message_hit
                .clone()
                .unwrap_or_else(|| MonsterSpec::HIT_MESSAGE.to_owned());
            self.emit(GameEvent::MonsterHit {
                at,
                damage: attack.damage,
                hp_left: hp,
                message,
            });
        }

        if hp > 0 && spec.monster_hit.as_ref().is_some_and(|hit| hit.matches(faces)) {
            self.strike(at, spec)?;
        }

        if hp <= 0 {
            self.world.grid.set(at, TileSymbol::DEFEATED, None);
            self.world.runner.kills += 1;
            self.emit(GameEvent::MonsterDefeated {
                at,
                name: spec.name.clone(),
            });
            return ControlFlow::Continue(());
        }

        let message = spec
            .message_fail
            .clone()
            .unwrap_or_else(|| MonsterSpec::BLOCKS_MESSAGE.to_owned());
        self.emit(GameEvent::MonsterBlocks { at, message });
        ControlFlow::Continue(())
    }

    /// First live monster next to the runner whose attack matches the last
    /// roll strikes. At most one strike per check.
    pub(crate) fn adjacent_attacks(&mut self) -> Flow {
        if self.world.is_over() {
            return ControlFlow::Break(());
        }
        let faces = self.world.dice.faces();
        let origin = self.world.runner.position;

        for direction in Direction::ADJACENT_SCAN {
            let (dx, dy) = direction.delta();
            let at = origin.offset(dx, dy);
            if self.world.grid.symbol(at) != TileSymbol::MONSTER {
                continue;
            }
            let variant = self.world.grid.variant(at);
            if variant.is_some_and(|v| v.as_str() == Variant::DEAD) {
                continue;
            }
            let Some(spec) = self.behavior(at).monster(variant) else {
                continue;
            };
            if spec.monster_hit.as_ref().is_some_and(|hit| hit.matches(faces)) {
                return self.strike(at, spec);
            }
        }
        ControlFlow::Continue(())
    }

    fn strike(&mut self, at: Position, spec: &MonsterSpec) -> Flow {
        let Some(hit) = &spec.monster_hit else {
            return ControlFlow::Continue(());
        };
        let message = hit
            .message_hit
            .clone()
            .unwrap_or_else(|| MonsterSpec::STRIKE_MESSAGE.to_owned());
        self.emit(GameEvent::MonsterStruck {
            at,
            damage: hit.damage,
            message,
        });
        self.damage(hit.damage, DamageSource::Monster, hit.message_hit.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{run, set_dice, tiles, wall, world};
    use super::super::{Command, GameEvent};
    use crate::env::{RawMonster, TileTable};
    use crate::rules::RawDiceRule;
    use crate::state::{Direction, Position, TileSymbol};

    #[test]
    fn lock_opens_on_sum_seven() {
        let tiles = tiles();
        let mut w = world(&["A1R1K{a}1A5", "P8"], &tiles);
        set_dice(&mut w, 3, 3);
        let out = run(&mut w, &tiles, Command::Move(Direction::Right)).expect("bump");
        assert!(out.events.iter().any(|e| matches!(e, GameEvent::LockFailed { .. })));
        assert_eq!(w.grid.symbol(Position::new(2, 0)), TileSymbol::LOCK);
        assert_eq!(w.runner.position, Position::new(1, 0));

        set_dice(&mut w, 3, 4);
        let out = run(&mut w, &tiles, Command::Move(Direction::Right)).expect("bump");
        assert!(out.events.iter().any(|e| matches!(e, GameEvent::LockOpened { .. })));
        assert!(w.grid.symbol(Position::new(2, 0)).is_air());
        // Bumping never moves or spends.
        assert_eq!(w.runner.position, Position::new(1, 0));
        assert_eq!(w.dice.total(), 7);
    }

    #[test]
    fn lock_without_rule_just_blocks() {
        let tiles = tiles();
        let mut w = world(&["A1R1K1A5", "P8"], &tiles);
        set_dice(&mut w, 3, 4);
        let out = run(&mut w, &tiles, Command::Move(Direction::Right)).expect("bump");
        assert!(out.events.iter().any(|e| matches!(e, GameEvent::Blocked { .. })));
        assert_eq!(w.grid.symbol(Position::new(2, 0)), TileSymbol::LOCK);
    }

    #[test]
    fn monster_dies_after_two_hits() {
        let tiles = tiles();
        let mut w = world(&["A1R1M{a}1A5", "P8"], &tiles);
        set_dice(&mut w, 6, 2);

        run(&mut w, &tiles, Command::Move(Direction::Right)).expect("hit");
        assert_eq!(w.grid.monster_hp(Position::new(2, 0)), Some(1));

        let out = run(&mut w, &tiles, Command::Move(Direction::Right)).expect("hit");
        assert!(
            out.events
                .iter()
                .any(|e| matches!(e, GameEvent::MonsterDefeated { name, .. } if name == "Goblin"))
        );
        assert_eq!(w.grid.symbol(Position::new(2, 0)), TileSymbol::DEFEATED);
        assert_eq!(w.grid.variant(Position::new(2, 0)), None);
        assert_eq!(w.runner.kills, 1);
        assert_eq!(w.runner.hearts, 5);
    }

    #[test]
    fn huge_damage_defeats_instead_of_wrapping() {
        let mut monster = wall();
        monster.monster.insert(
            "a".into(),
            RawMonster {
                hp: Some(2),
                player_hit: Some(RawDiceRule {
                    dice: 1,
                    value: Some(6),
                    damage: Some(u32::MAX),
                    ..RawDiceRule::default()
                }),
                ..RawMonster::default()
            },
        );
        let tiles =
            TileTable::from_definitions([(TileSymbol('P'), wall()), (TileSymbol::MONSTER, monster)]).0;
        let mut w = world(&["A1R1M{a}1A5", "P8"], &tiles);
        set_dice(&mut w, 6, 2);

        let out = run(&mut w, &tiles, Command::Move(Direction::Right)).expect("hit");
        let hp_left = out.events.iter().find_map(|e| match e {
            GameEvent::MonsterHit { hp_left, .. } => Some(*hp_left),
            _ => None,
        });
        assert!(hp_left.is_some_and(|hp| hp <= 0), "{hp_left:?}");
        assert_eq!(w.grid.symbol(Position::new(2, 0)), TileSymbol::DEFEATED);
        assert_eq!(w.runner.kills, 1);
    }

    #[test]
    fn missed_attack_leaves_hp() {
        let tiles = tiles();
        let mut w = world(&["A1R1M{a}1A5", "P8"], &tiles);
        set_dice(&mut w, 2, 3);
        let out = run(&mut w, &tiles, Command::Move(Direction::Right)).expect("miss");
        assert!(out.events.iter().any(|e| matches!(e, GameEvent::MonsterMissed { .. })));
        assert_eq!(w.grid.monster_hp(Position::new(2, 0)), Some(2));
    }

    #[test]
    fn surviving_monster_strikes_back() {
        let tiles = tiles();
        let mut w = world(&["A1R1M{a}1A5", "P8"], &tiles);
        set_dice(&mut w, 6, 1);
        let out = run(&mut w, &tiles, Command::Move(Direction::Right)).expect("hit");
        assert!(out.events.iter().any(|e| matches!(e, GameEvent::MonsterStruck { .. })));
        assert!(out.events.iter().any(|e| matches!(e, GameEvent::MonsterBlocks { .. })));
        assert_eq!(w.runner.hearts, 4);
    }

    #[test]
    fn adjacent_monster_strikes_once_per_check() {
        let tiles = tiles();
        let mut w = world(&["A8", "M{a}1A1M{a}1A5", "P8"], &tiles);
        w.runner.position = Position::new(1, 0);
        set_dice(&mut w, 1, 1);
        let out = run(&mut w, &tiles, Command::Move(Direction::Down)).expect("down");
        assert_eq!(w.runner.position, Position::new(1, 1));
        let strikes = out
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::MonsterStruck { .. }))
            .count();
        assert_eq!(strikes, 1);
        assert_eq!(w.runner.hearts, 4);
    }
}
