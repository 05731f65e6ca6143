//! Text formats exchanged with the outside world: encoded maps and the
//! carried-stats string handed across level transitions.
mod map;
mod stats;

pub use map::{FALLBACK_ROW_SEPARATOR, ROW_SEPARATOR, decode, encode};
pub use stats::{STATS_VERSION, decode_stats, encode_stats};
