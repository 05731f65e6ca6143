//! Tile-table validation errors.
//!
//! Raised while a raw definition set is turned into a [`super::TileTable`].
//! Loaders log and drop the offending record instead of failing the table.

use crate::error::{ErrorSeverity, GameError};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// Tile keys must be exactly one character.
    #[error("tile key '{0}' is not a single character")]
    InvalidSymbol(String),

    #[error("rule with {dice} dice is missing '{field}'")]
    MissingRuleField { dice: u8, field: &'static str },

    #[error("rules use 1 or 2 dice, got {0}")]
    UnsupportedDiceCount(u8),

    #[error("parity must be 'even' or 'odd', got '{0}'")]
    InvalidParity(String),

    #[error("exact pair needs 2 values, got {0}")]
    InvalidExactPair(usize),

    #[error("variant key '{0}' is empty after sanitizing")]
    InvalidVariant(String),

    #[error("unknown slope '{0}'")]
    InvalidSlope(String),

    #[error("unknown pickup type '{0}'")]
    InvalidPickup(String),
}

impl GameError for TableError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use TableError::*;
        match self {
            InvalidSymbol(_) => "TABLE_INVALID_SYMBOL",
            MissingRuleField { .. } => "TABLE_MISSING_RULE_FIELD",
            UnsupportedDiceCount(_) => "TABLE_UNSUPPORTED_DICE_COUNT",
            InvalidParity(_) => "TABLE_INVALID_PARITY",
            InvalidExactPair(_) => "TABLE_INVALID_EXACT_PAIR",
            InvalidVariant(_) => "TABLE_INVALID_VARIANT",
            InvalidSlope(_) => "TABLE_INVALID_SLOPE",
            InvalidPickup(_) => "TABLE_INVALID_PICKUP",
        }
    }
}
