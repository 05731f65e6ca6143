//! Pickups collected where the runner comes to rest.

use super::{GameEvent, Resolution};
use crate::config::GameConfig;
use crate::env::PickupKind;
use crate::state::CarriedStats;

impl Resolution<'_> {
    /// Applies and removes the pickup in the runner's cell, if any.
    pub(crate) fn collect_pickup(&mut self) {
        let at = self.world.runner.position;
        let behavior = self.here();
        let Some(kind) = behavior.pickup else {
            return;
        };

        let runner = &mut self.world.runner;
        match kind {
            PickupKind::Diamond => {
                runner.score += 1;
                runner.flash.diamond = GameConfig::FLASH_FRAMES;
            }
            PickupKind::Turbo => {
                runner.turbo = true;
                runner.turbo_multiplier = CarriedStats::DEFAULT_TURBO_MULTIPLIER;
                runner.flash.turbo = GameConfig::FLASH_FRAMES;
            }
            PickupKind::Heart => {
                runner.hearts += 1;
                runner.flash.heart = GameConfig::FLASH_FRAMES;
            }
            PickupKind::Dead => runner.kills += 1,
        }

        self.world.grid.clear(at);
        let message = behavior
            .pickup_message
            .clone()
            .or_else(|| behavior.death_message.clone());
        self.emit(GameEvent::PickedUp { kind, at, message });
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{run, set_dice, tiles, world};
    use super::super::{Command, GameEvent};
    use crate::codec;
    use crate::state::{Direction, Position};

    #[test]
    fn diamond_scores_and_clears_cell() {
        let tiles = tiles();
        let mut w = world(&["A1R1D1A5", "P8"], &tiles);
        set_dice(&mut w, 2, 0);
        let out = run(&mut w, &tiles, Command::Move(Direction::Right)).expect("move");
        assert_eq!(w.runner.score, 1);
        assert_eq!(w.runner.flash.diamond, 10);
        assert!(w.grid.symbol(Position::new(2, 0)).is_air());
        assert!(out.events.iter().any(|e| matches!(
            e,
            GameEvent::PickedUp { message: Some(m), .. } if m == "Shiny!"
        )));

        run(&mut w, &tiles, Command::Tick).expect("tick");
        assert_eq!(w.runner.flash.diamond, 9);
    }

    #[test]
    fn turbo_pickup_arms_turbo() {
        let tiles = tiles();
        let mut w = world(&["A1R1T1A5", "P8"], &tiles);
        set_dice(&mut w, 2, 0);
        run(&mut w, &tiles, Command::Move(Direction::Right)).expect("move");
        assert!(w.runner.turbo);
        assert_eq!(w.runner.turbo_multiplier, 2);
    }

    #[test]
    fn wired_exit_hands_off_map_and_stats() {
        let tiles = tiles();
        let mut w = world(&["A1R1E1A5", "P8"], &tiles);
        w.runner.score = 3;
        set_dice(&mut w, 2, 0);
        let out = run(&mut w, &tiles, Command::Move(Direction::Right)).expect("move");
        let transition = out.transition.expect("transition");
        assert_eq!(transition.key, "default");
        assert_eq!(transition.map, "P25");
        let carried = codec::decode_stats(&transition.stats);
        assert_eq!(carried.score, 3);
        assert!(out.events.iter().any(|e| matches!(e, GameEvent::ExitReached { .. })));
    }

    #[test]
    fn unwired_exit_keeps_playing() {
        let tiles = tiles();
        let mut w = world(&["A1R1E{north}1A5", "P8"], &tiles);
        set_dice(&mut w, 2, 0);
        let out = run(&mut w, &tiles, Command::Move(Direction::Right)).expect("move");
        assert!(out.transition.is_none());
        assert!(out.events.contains(&GameEvent::ExitUnwired {
            key: "north".into()
        }));
        assert_eq!(w.runner.position, Position::new(2, 0));
        assert!(!w.is_over());
    }

    #[test]
    fn dying_clears_dice_and_blocks_commands() {
        let tiles = tiles();
        let mut w = world(&["A1R1L1A5", "P8"], &tiles);
        w.runner.hearts = 1;
        set_dice(&mut w, 2, 2);
        let out = run(&mut w, &tiles, Command::Move(Direction::Right)).expect("move");
        assert!(w.is_over());
        assert!(w.runner.dead);
        assert!(w.dice.is_empty());
        assert!(out.events.contains(&GameEvent::GameOver {
            reason: Some("Burned.".into())
        }));

        let err = run(&mut w, &tiles, Command::Roll).unwrap_err();
        assert_eq!(err, super::super::CommandError::GameOver);
        run(&mut w, &tiles, Command::Tick).expect("tick still runs");
    }
}
