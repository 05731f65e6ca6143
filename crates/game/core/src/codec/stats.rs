//! Carried-stats transport string: `v1.h<b36>.s<b36>.k<b36>.t<b36>.m<b36>`.

use crate::state::CarriedStats;

pub const STATS_VERSION: &str = "v1";

pub fn encode_stats(stats: &CarriedStats) -> String {
    format!(
        "{STATS_VERSION}.h{}.s{}.k{}.t{}.m{}",
        to_base36(stats.hearts as u64),
        to_base36(stats.score as u64),
        to_base36(stats.kills as u64),
        to_base36(stats.turbo as u64),
        to_base36(stats.turbo_multiplier as u64),
    )
}

/// Decodes a stats string, falling back to defaults field by field.
///
/// A wrong version tag yields all defaults. Unknown or unparsable tokens are
/// skipped; a zero value keeps the default like an absent one. Counters are
/// clamped to `>= 0` and the multiplier to `>= 1`.
pub fn decode_stats(raw: &str) -> CarriedStats {
    let mut out = CarriedStats::default();
    let mut parts = raw.trim().split('.');
    if parts.next() != Some(STATS_VERSION) {
        return out;
    }

    for token in parts {
        let mut chars = token.chars();
        let Some(tag) = chars.next() else {
            continue;
        };
        let Some(value) = i64::from_str_radix(chars.as_str(), 36)
            .ok()
            .filter(|v| *v != 0)
        else {
            if tag == 't' {
                out.turbo = false;
            }
            continue;
        };
        match tag {
            'h' => out.hearts = clamp_count(value),
            's' => out.score = clamp_count(value),
            'k' => out.kills = clamp_count(value),
            't' => out.turbo = value == 1,
            'm' => out.turbo_multiplier = clamp_count(value).max(1),
            _ => {}
        }
    }
    out
}

fn clamp_count(value: i64) -> u32 {
    value.clamp(0, u32::MAX as i64) as u32
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_owned();
    }
    let mut buf = Vec::new();
    while value > 0 {
        buf.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    buf.reverse();
    String::from_utf8(buf).unwrap_or_default()
}
