//! Dice-rule matching for locks and monsters.
//!
//! Rules are validated once when the tile table is built ([`RawDiceRule`] →
//! [`DiceRule`]) and evaluated against the faces of the most recent roll.

use crate::env::TableError;
use crate::state::DiceFaces;

/// Sum parity requirement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Parity {
    Even,
    Odd,
}

/// Match predicate over the two die faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiceCheck {
    /// Either die shows `value`.
    Single { value: u32 },
    /// Faces add up to `sum`.
    Sum { sum: u32 },
    /// Sum is even or odd.
    Parity { parity: Parity },
    /// Faces equal the pair in any order.
    Exact { pair: (u32, u32) },
}

impl DiceCheck {
    pub fn matches(&self, faces: DiceFaces) -> bool {
        match *self {
            DiceCheck::Single { value } => faces.a == value || faces.b == value,
            DiceCheck::Sum { sum } => faces.sum() == sum,
            DiceCheck::Parity { parity } => {
                let even = faces.sum() % 2 == 0;
                match parity {
                    Parity::Even => even,
                    Parity::Odd => !even,
                }
            }
            DiceCheck::Exact { pair } => {
                let (lo, hi) = if pair.0 <= pair.1 {
                    pair
                } else {
                    (pair.1, pair.0)
                };
                faces.sorted() == (lo, hi)
            }
        }
    }
}

/// A validated rule with its damage and log messages.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiceRule {
    pub check: DiceCheck,
    pub damage: u32,
    pub message_hit: Option<String>,
    pub message_fail: Option<String>,
}

impl DiceRule {
    pub fn new(check: DiceCheck) -> Self {
        Self {
            check,
            damage: 0,
            message_hit: None,
            message_fail: None,
        }
    }

    pub fn with_damage(mut self, damage: u32) -> Self {
        self.damage = damage;
        self
    }

    pub fn matches(&self, faces: DiceFaces) -> bool {
        self.check.matches(faces)
    }
}

/// Rule record as it appears in tile tables:
/// `{ "dice": 1, "value": 6 }` or `{ "dice": 2, "sum" | "parity" | "exact": ... }`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct RawDiceRule {
    pub dice: u8,
    pub value: Option<u32>,
    pub sum: Option<u32>,
    pub parity: Option<String>,
    pub exact: Option<Vec<u32>>,
    pub damage: Option<u32>,
    pub message_hit: Option<String>,
    pub message_fail: Option<String>,
}

impl TryFrom<RawDiceRule> for DiceRule {
    type Error = TableError;

    fn try_from(raw: RawDiceRule) -> Result<Self, Self::Error> {
        let check = match raw.dice {
            1 => DiceCheck::Single {
                value: raw.value.ok_or(TableError::MissingRuleField {
                    dice: 1,
                    field: "value",
                })?,
            },
            2 => {
                if let Some(sum) = raw.sum {
                    DiceCheck::Sum { sum }
                } else if let Some(parity) = raw.parity.as_deref() {
                    let parity = parity
                        .parse::<Parity>()
                        .map_err(|_| TableError::InvalidParity(parity.to_owned()))?;
                    DiceCheck::Parity { parity }
                } else if let Some(exact) = raw.exact.as_deref() {
                    match *exact {
                        [a, b] => DiceCheck::Exact { pair: (a, b) },
                        _ => return Err(TableError::InvalidExactPair(exact.len())),
                    }
                } else {
                    return Err(TableError::MissingRuleField {
                        dice: 2,
                        field: "sum|parity|exact",
                    });
                }
            }
            other => return Err(TableError::UnsupportedDiceCount(other)),
        };

        Ok(DiceRule {
            check,
            damage: raw.damage.unwrap_or(0),
            message_hit: raw.message_hit,
            message_fail: raw.message_fail,
        })
    }
}

/// Lock bound to one variant.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LockRule {
    pub rule: DiceRule,
}

impl LockRule {
    pub const OPENED_MESSAGE: &'static str = "The lock clicks open.";
    pub const FAIL_MESSAGE: &'static str = "The lock will not open.";

    pub fn fail_message(&self) -> &str {
        self.rule
            .message_fail
            .as_deref()
            .unwrap_or(Self::FAIL_MESSAGE)
    }
}

/// Monster bound to one variant.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterSpec {
    pub name: String,
    pub hp: i32,
    /// Runner's attack. `None` means the runner can never hurt it.
    pub player_hit: Option<DiceRule>,
    /// Monster's counter-attack, also used for adjacency strikes.
    pub monster_hit: Option<DiceRule>,
    pub message_fail: Option<String>,
    pub hint: Option<String>,
}

impl MonsterSpec {
    pub const DEFAULT_HP: i32 = 1;
    pub const DEFAULT_NAME: &'static str = "Monster";
    pub const BLOCKS_MESSAGE: &'static str = "The monster blocks you.";
    pub const MISS_MESSAGE: &'static str = "You cannot hurt the monster.";
    pub const HIT_MESSAGE: &'static str = "You hit the monster.";
    pub const STRIKE_MESSAGE: &'static str = "The monster strikes you!";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn faces(a: u32, b: u32) -> DiceFaces {
        DiceFaces::new(a, b)
    }

    #[test]
    fn sum_seven_opens_on_matching_faces_only() {
        let rule = DiceCheck::Sum { sum: 7 };
        assert!(rule.matches(faces(3, 4)));
        assert!(rule.matches(faces(5, 2)));
        assert!(!rule.matches(faces(3, 3)));
    }

    #[test]
    fn single_matches_either_die() {
        let rule = DiceCheck::Single { value: 6 };
        assert!(rule.matches(faces(6, 1)));
        assert!(rule.matches(faces(2, 6)));
        assert!(!rule.matches(faces(5, 5)));
    }

    #[test]
    fn exact_pair_is_unordered() {
        let rule = DiceCheck::Exact { pair: (5, 2) };
        assert!(rule.matches(faces(2, 5)));
        assert!(rule.matches(faces(5, 2)));
        assert!(!rule.matches(faces(5, 5)));
    }

    #[test]
    fn parity_reads_sum() {
        let even = DiceCheck::Parity {
            parity: Parity::Even,
        };
        assert!(even.matches(faces(1, 3)));
        assert!(!even.matches(faces(1, 2)));
    }

    #[test]
    fn raw_rules_convert() {
        let raw = RawDiceRule {
            dice: 2,
            parity: Some("Odd".into()),
            damage: Some(2),
            ..RawDiceRule::default()
        };
        let rule = DiceRule::try_from(raw).expect("valid rule");
        assert_eq!(
            rule.check,
            DiceCheck::Parity {
                parity: Parity::Odd
            }
        );
        assert_eq!(rule.damage, 2);
    }

    #[test]
    fn malformed_raw_rules_are_rejected() {
        let missing = RawDiceRule {
            dice: 1,
            ..RawDiceRule::default()
        };
        assert!(matches!(
            DiceRule::try_from(missing),
            Err(TableError::MissingRuleField { dice: 1, .. })
        ));

        let bad_pair = RawDiceRule {
            dice: 2,
            exact: Some(vec![1, 2, 3]),
            ..RawDiceRule::default()
        };
        assert!(matches!(
            DiceRule::try_from(bad_pair),
            Err(TableError::InvalidExactPair(3))
        ));

        let three = RawDiceRule {
            dice: 3,
            ..RawDiceRule::default()
        };
        assert!(matches!(
            DiceRule::try_from(three),
            Err(TableError::UnsupportedDiceCount(3))
        ));
    }
}
