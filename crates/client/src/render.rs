//! Plain-text rendering of a world snapshot.

use std::fmt::Write;

use game_core::{Position, TileSymbol, World};

const RUNNER: char = '@';
const FOG: char = '?';

/// Draws the grid row by row. Air is `.`, the runner `@`, fog `?`.
pub fn render_map(world: &World) -> String {
    let dimensions = world.grid.dimensions();
    let mut out = String::with_capacity(dimensions.cell_count() + dimensions.height as usize);
    for y in 0..dimensions.height {
        for (x, (symbol, _)) in world.grid.row(y).enumerate() {
            let at = Position::new(x as i32, y as i32);
            let ch = if at == world.runner.position {
                RUNNER
            } else if world.is_fogged(at) {
                FOG
            } else if symbol.is_air() {
                TileSymbol::AIR.as_char()
            } else {
                symbol.as_char()
            };
            out.push(ch);
        }
        out.push('\n');
    }
    out
}

pub fn status_line(world: &World) -> String {
    let runner = &world.runner;
    let mut line = format!(
        "level {} | hearts {} | score {} | kills {} | dice {}+{} ({} left)",
        world.level_key,
        runner.hearts,
        runner.score,
        runner.kills,
        world.dice.remaining(game_core::DieSlot::A),
        world.dice.remaining(game_core::DieSlot::B),
        world.dice.total(),
    );
    if runner.turbo {
        let _ = write!(line, " | turbo x{}", runner.turbo_multiplier);
    }
    if world.is_over() {
        line.push_str(" | GAME OVER");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{CarriedStats, GameConfig, TileTable};

    fn world(encoded: &str, fog: bool) -> World {
        let config = GameConfig::new().with_dimensions(2, 4).with_fog(fog);
        World::load(encoded, config, &TileTable::minimal(), CarriedStats::default(), 1)
    }

    #[test]
    fn map_marks_runner_and_normalizes_air() {
        let w = world("A1R1A2~X4", false);
        assert_eq!(render_map(&w), ".@..\nXXXX\n");
    }

    #[test]
    fn status_reports_dice_and_stats() {
        let w = world("R1A3~X4", false);
        let line = status_line(&w);
        assert!(line.starts_with("level default | hearts 5 | score 0"));
        assert!(line.contains("dice 0+0 (0 left)"));
        assert!(!line.contains("turbo"));
    }
}
