//! Run-length map encoding.
//!
//! Rows are joined by `~`; each row is a list of `Symbol[{variant}]Count`
//! groups with air written as `A`. Decoding also accepts the legacy
//! `SymbolVariantCount` form, `.` as a single air cell, and `.` as a row
//! separator when no `~` is present.

use std::fmt::Write as _;

use crate::env::{TileKind, TileOracle};
use crate::state::{MapDimensions, Position, TileGrid, TileSymbol, Variant};

pub const ROW_SEPARATOR: char = '~';
pub const FALLBACK_ROW_SEPARATOR: char = '.';

/// Encodes symbols and variants. Hit points are not part of the format.
pub fn encode(grid: &TileGrid) -> String {
    let height = grid.dimensions().height;
    let mut out = String::new();
    for y in 0..height {
        if y > 0 {
            out.push(ROW_SEPARATOR);
        }
        encode_row(grid, y, &mut out);
    }
    out
}

fn encode_row(grid: &TileGrid, y: u32, out: &mut String) {
    let mut run: Option<(TileSymbol, Option<Variant>, usize)> = None;
    for (symbol, variant) in grid.row(y) {
        let variant = if symbol.is_air() { None } else { variant };
        match &mut run {
            Some((s, v, count)) if *s == symbol && *v == variant => *count += 1,
            _ => {
                if let Some(group) = run.take() {
                    push_group(out, group);
                }
                run = Some((symbol, variant, 1));
            }
        }
    }
    if let Some(group) = run {
        push_group(out, group);
    }
}

fn push_group(out: &mut String, (symbol, variant, count): (TileSymbol, Option<Variant>, usize)) {
    let letter = if symbol.is_air() {
        TileSymbol::AIR_ALIAS.as_char()
    } else {
        symbol.as_char()
    };
    // Writing into a String cannot fail.
    let _ = match variant {
        Some(v) => write!(out, "{letter}{{{v}}}{count}"),
        None => write!(out, "{letter}{count}"),
    };
}

/// Decodes an encoded map into a grid of exactly `dimensions`.
///
/// Never fails: malformed tokens are salvaged, short rows are padded with air
/// and long rows truncated. Monster cells get their starting hit points from
/// `tiles` as they are emitted.
pub fn decode(encoded: &str, dimensions: MapDimensions, tiles: &dyn TileOracle) -> TileGrid {
    let mut grid = TileGrid::new(dimensions);
    let rows: Vec<&str> = if encoded.contains(ROW_SEPARATOR) {
        encoded.split(ROW_SEPARATOR).collect()
    } else if encoded.contains(FALLBACK_ROW_SEPARATOR) {
        encoded.split(FALLBACK_ROW_SEPARATOR).collect()
    } else {
        vec![encoded]
    };

    for (y, row) in rows.iter().take(dimensions.height as usize).enumerate() {
        decode_row(row, y as i32, &mut grid, tiles);
    }
    grid
}

fn decode_row(row: &str, y: i32, grid: &mut TileGrid, tiles: &dyn TileOracle) {
    let width = grid.dimensions().width as usize;
    let chars: Vec<char> = row.chars().collect();
    let mut x = 0usize;
    let mut i = 0usize;

    while i < chars.len() && x < width {
        let ch = chars[i];
        if ch == TileSymbol::AIR.as_char() {
            x += 1;
            i += 1;
            continue;
        }
        if !ch.is_ascii_alphabetic() {
            i += 1;
            continue;
        }

        let symbol = TileSymbol(ch).normalized();
        let mut variant = None;
        i += 1;

        if chars.get(i) == Some(&'{') {
            match chars[i + 1..].iter().position(|c| *c == '}') {
                Some(len) => {
                    let raw: String = chars[i + 1..i + 1 + len].iter().collect();
                    variant = Variant::sanitize(&raw);
                    i += len + 2;
                }
                // Unterminated brace: the letter stands alone.
                None => {
                    emit(grid, tiles, Position::new(x as i32, y), symbol, None);
                    x += 1;
                    continue;
                }
            }
        } else if ch.is_ascii_uppercase()
            && chars.get(i).is_some_and(|next| next.is_ascii_lowercase())
        {
            variant = Variant::sanitize(&chars[i].to_string());
            i += 1;
        }

        let (count, consumed) = read_count(&chars[i..]);
        i += consumed;
        for _ in 0..count {
            if x >= width {
                break;
            }
            emit(grid, tiles, Position::new(x as i32, y), symbol, variant);
            x += 1;
        }
    }
}

/// Leading decimal run; absent or zero means 1.
fn read_count(chars: &[char]) -> (usize, usize) {
    let digits = chars.iter().take_while(|c| c.is_ascii_digit()).count();
    let count = chars[..digits].iter().fold(0usize, |acc, c| {
        acc.saturating_mul(10)
            .saturating_add(c.to_digit(10).unwrap_or(0) as usize)
    });
    (count.max(1), digits)
}

fn emit(
    grid: &mut TileGrid,
    tiles: &dyn TileOracle,
    position: Position,
    symbol: TileSymbol,
    variant: Option<Variant>,
) {
    grid.set(position, symbol, variant);
    let behavior = tiles.behavior(symbol);
    if behavior.kind == TileKind::Monster {
        grid.set_monster_hp(position, Some(behavior.initial_hp(variant)));
    }
}
