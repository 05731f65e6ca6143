//! Generated-input checks for the map codec and fog of war.

use proptest::prelude::*;

use game_core::codec::{decode, encode};
use game_core::state::FogMask;
use game_core::{FogGrid, MapDimensions, Position, TileGrid, TileSymbol, TileTable, Variant};

type Cell = (char, Option<String>);

fn cell() -> impl Strategy<Value = Cell> {
    (
        prop::char::range('A', 'Z'),
        prop::option::of("[a-z0-9_-]{1,12}"),
    )
}

fn grid_input() -> impl Strategy<Value = (u32, u32, Vec<Cell>)> {
    (1u32..8, 1u32..12).prop_flat_map(|(height, width)| {
        (
            Just(height),
            Just(width),
            prop::collection::vec(cell(), (height * width) as usize),
        )
    })
}

fn build_grid(height: u32, width: u32, cells: &[Cell]) -> TileGrid {
    let mut grid = TileGrid::new(MapDimensions::new(width, height));
    for (idx, (symbol, variant)) in cells.iter().enumerate() {
        let at = Position::new(idx as i32 % width as i32, idx as i32 / width as i32);
        let variant = variant.as_deref().and_then(Variant::sanitize);
        grid.set(at, TileSymbol(*symbol), variant);
    }
    grid
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// Symbols and variants survive an encode/decode cycle unchanged.
    #[test]
    fn prop_codec_round_trips((height, width, cells) in grid_input()) {
        let grid = build_grid(height, width, &cells);
        let encoded = encode(&grid);
        let decoded = decode(&encoded, grid.dimensions(), &TileTable::minimal());

        let before: Vec<_> = grid.cells().collect();
        let after: Vec<_> = decoded.cells().collect();
        prop_assert_eq!(before, after, "encoded as {}", encoded);
    }

    /// Revealing never covers a cell again, wherever the runner goes.
    #[test]
    fn prop_fog_reveal_is_monotone(
        height in 1u32..16,
        width in 1u32..26,
        radius in 0u32..7,
        path in prop::collection::vec((-3i32..30, -3i32..20), 1..40),
    ) {
        let dimensions = MapDimensions::new(width, height);
        let mut fog = FogGrid::new(dimensions, FogMask::disk(radius));
        let all: Vec<Position> = (0..height as i32)
            .flat_map(|y| (0..width as i32).map(move |x| Position::new(x, y)))
            .collect();
        prop_assert_eq!(fog.covered_count(), all.len());

        for (x, y) in path {
            let revealed: Vec<Position> =
                all.iter().copied().filter(|at| !fog.is_covered(*at)).collect();
            let covered_before = fog.covered_count();

            let center = Position::new(x, y);
            fog.reveal_around(center);

            prop_assert!(fog.covered_count() <= covered_before);
            for at in revealed {
                prop_assert!(!fog.is_covered(at));
            }
            if dimensions.contains(center) {
                prop_assert!(!fog.is_covered(center));
            }
        }
    }
}
