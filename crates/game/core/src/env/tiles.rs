//! Raw tile definitions and the behavior descriptors resolved from them.

use std::collections::BTreeMap;

use crate::rules::{DiceRule, LockRule, MonsterSpec, RawDiceRule};
use crate::state::{TileSymbol, Variant};

use super::TableError;

/// Damage record as written in tile tables: `{ "amount": 1, "when": "stand" }`.
///
/// `when` is accepted for table compatibility but never changes timing: the
/// slot decides it. `insideDamage` hits on entry, `topDamage` while standing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RawDamage {
    pub amount: u32,
    pub when: Option<String>,
}

/// Plain text, or text keyed by variant.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum VariantText {
    Plain(String),
    ByVariant(BTreeMap<String, String>),
}

impl VariantText {
    pub const DEFAULT_KEY: &'static str = "default";

    /// Plain text, or the entry for `variant`.
    pub fn get(&self, variant: Option<Variant>) -> Option<&str> {
        match self {
            VariantText::Plain(text) => Some(text.as_str()),
            VariantText::ByVariant(map) => {
                variant.and_then(|v| map.get(v.as_str()).map(String::as_str))
            }
        }
    }

    /// Like [`VariantText::get`] but falls back to the `default` entry.
    pub fn get_or_default(&self, variant: Option<Variant>) -> Option<&str> {
        self.get(variant).or_else(|| match self {
            VariantText::ByVariant(map) => map.get(Self::DEFAULT_KEY).map(String::as_str),
            VariantText::Plain(_) => None,
        })
    }
}

/// Monster record keyed by variant inside a tile's `monster` table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct RawMonster {
    pub name: Option<String>,
    pub hp: Option<i32>,
    pub player_hit: Option<RawDiceRule>,
    pub monster_hit: Option<RawDiceRule>,
    pub message_fail: Option<String>,
    pub hint: Option<String>,
}

/// Loosely typed tile record, one per symbol, as supplied by a tile source.
///
/// Every field is optional; [`TileBehavior::resolve`] applies the defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct TileDefinition {
    pub name: Option<String>,
    pub solid: Option<bool>,
    pub gravity: Option<bool>,
    pub move_cost: Option<u32>,
    pub move_cost_top: Option<u32>,
    pub move_cost_inside: Option<u32>,
    pub inside_move_cost: Option<u32>,
    pub inside_damage: Option<RawDamage>,
    pub top_damage: Option<RawDamage>,
    pub bounce: Option<i32>,
    pub slope: Option<String>,
    pub pickup_type: Option<String>,
    pub pickup_message: Option<String>,
    pub death_message: Option<String>,
    pub sign_message: Option<VariantText>,
    pub hint: Option<VariantText>,
    pub exit: bool,
    /// Destination key → encoded map, only meaningful on exit tiles.
    pub destinations: BTreeMap<String, String>,
    pub fall_damage_threshold: Option<u32>,
    pub fall_damage_multiplier: Option<u32>,
    pub fall_damage_cancel: Option<bool>,
    pub lock: BTreeMap<String, RawDiceRule>,
    pub monster: BTreeMap<String, RawMonster>,
}

/// Closed classification of a tile symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TileKind {
    Air,
    Terrain,
    Exit,
    Lock,
    Monster,
    Pickup,
    Spawn,
    Defeated,
    Boundary,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageSpec {
    pub amount: u32,
}

impl DamageSpec {
    pub const fn is_harmful(&self) -> bool {
        self.amount > 0
    }

    fn resolve(raw: Option<&RawDamage>) -> Self {
        DamageSpec {
            amount: raw.map_or(0, |raw| raw.amount),
        }
    }
}

/// Bounce behavior of a landing surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Bounce {
    #[default]
    None,
    /// Height derived from the fall distance at landing.
    Dynamic,
    Fixed(u32),
}

impl Bounce {
    fn from_raw(raw: Option<i32>) -> Self {
        match raw {
            Some(0) => Bounce::Dynamic,
            Some(h) if h > 0 => Bounce::Fixed(h as u32),
            _ => Bounce::None,
        }
    }

    /// Bounce height for a landing after `fall_distance` cells, or `None` on a
    /// surface that never bounces.
    pub fn height_for(self, fall_distance: u32) -> Option<u32> {
        match self {
            Bounce::None => None,
            Bounce::Dynamic => Some(fall_distance.saturating_sub(1)),
            Bounce::Fixed(h) => Some(h),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Slope {
    /// Climbable while moving left.
    Left,
    /// Climbable while moving right.
    Right,
}

impl Slope {
    pub const fn climbable_with(self, dx: i32) -> bool {
        match self {
            Slope::Left => dx == -1,
            Slope::Right => dx == 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PickupKind {
    Diamond,
    Heart,
    Turbo,
    /// Collectible skull; counts as a kill.
    Dead,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FallDamage {
    pub threshold: u32,
    pub multiplier: u32,
    pub cancel: bool,
}

impl FallDamage {
    pub const DEFAULT_THRESHOLD: u32 = 3;
    pub const DEFAULT_MULTIPLIER: u32 = 1;

    /// Damage for landing here after `fall_distance` cells, if any.
    pub fn damage_for(&self, fall_distance: u32) -> Option<u32> {
        (!self.cancel && self.multiplier > 0 && fall_distance >= self.threshold)
            .then_some(self.multiplier)
    }
}

/// Fixed-shape behavior of one tile symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileBehavior {
    pub kind: TileKind,
    pub name: Option<String>,
    pub solid: bool,
    pub gravity: bool,
    /// Cost to move onto the top of this tile.
    pub cost_top: u32,
    /// Cost to move through this tile while swimming.
    pub cost_inside: u32,
    pub inside_damage: DamageSpec,
    pub top_damage: DamageSpec,
    pub bounce: Bounce,
    pub slope: Option<Slope>,
    pub pickup: Option<PickupKind>,
    pub pickup_message: Option<String>,
    pub death_message: Option<String>,
    pub sign: Option<VariantText>,
    pub hint: Option<VariantText>,
    pub exit: bool,
    pub destinations: BTreeMap<String, String>,
    pub fall_damage: FallDamage,
    pub locks: BTreeMap<Variant, LockRule>,
    pub monsters: BTreeMap<Variant, MonsterSpec>,
}

impl TileBehavior {
    /// Resolves a raw definition, dropping rule records that do not validate.
    pub fn resolve(symbol: TileSymbol, def: &TileDefinition) -> Self {
        Self::resolve_with(symbol, def, &mut Vec::new())
    }

    /// Resolves a raw definition, collecting every rejected record in
    /// `rejected`.
    pub fn resolve_with(
        symbol: TileSymbol,
        def: &TileDefinition,
        rejected: &mut Vec<TableError>,
    ) -> Self {
        let exit = def.exit;
        let solid = def.solid == Some(true) && !exit;
        let gravity = def.gravity != Some(false);

        let generic_cost = def.move_cost.filter(|c| *c > 0).unwrap_or(1);
        let cost_top = def.move_cost_top.unwrap_or(generic_cost);
        let cost_inside = def
            .move_cost_inside
            .or(def.inside_move_cost.filter(|c| *c > 0))
            .unwrap_or(generic_cost);

        let slope = def.slope.as_deref().and_then(|raw| {
            raw.parse::<Slope>()
                .map_err(|_| rejected.push(TableError::InvalidSlope(raw.to_owned())))
                .ok()
        });
        let pickup = def.pickup_type.as_deref().and_then(|raw| {
            raw.parse::<PickupKind>()
                .map_err(|_| rejected.push(TableError::InvalidPickup(raw.to_owned())))
                .ok()
        });

        let mut locks = BTreeMap::new();
        for (key, raw) in &def.lock {
            let Some(variant) = Variant::sanitize(key) else {
                rejected.push(TableError::InvalidVariant(key.clone()));
                continue;
            };
            match DiceRule::try_from(raw.clone()) {
                Ok(rule) => {
                    locks.insert(variant, LockRule { rule });
                }
                Err(err) => rejected.push(err),
            }
        }

        let mut monsters = BTreeMap::new();
        for (key, raw) in &def.monster {
            let Some(variant) = Variant::sanitize(key) else {
                rejected.push(TableError::InvalidVariant(key.clone()));
                continue;
            };
            let mut convert = |rule: &Option<RawDiceRule>| {
                rule.clone()
                    .and_then(|raw| DiceRule::try_from(raw).map_err(|e| rejected.push(e)).ok())
            };
            let spec = MonsterSpec {
                name: raw
                    .name
                    .clone()
                    .unwrap_or_else(|| MonsterSpec::DEFAULT_NAME.to_owned()),
                hp: raw.hp.unwrap_or(MonsterSpec::DEFAULT_HP),
                player_hit: convert(&raw.player_hit),
                monster_hit: convert(&raw.monster_hit),
                message_fail: raw.message_fail.clone(),
                hint: raw.hint.clone(),
            };
            monsters.insert(variant, spec);
        }

        let kind = if symbol.is_air() {
            TileKind::Air
        } else if exit {
            TileKind::Exit
        } else if !locks.is_empty() || symbol == TileSymbol::LOCK {
            TileKind::Lock
        } else if !monsters.is_empty() || symbol == TileSymbol::MONSTER {
            TileKind::Monster
        } else if pickup.is_some() {
            TileKind::Pickup
        } else if symbol == TileSymbol::SPAWN {
            TileKind::Spawn
        } else if symbol == TileSymbol::DEFEATED {
            TileKind::Defeated
        } else {
            TileKind::Terrain
        };

        Self {
            kind,
            name: def.name.clone(),
            solid,
            gravity,
            cost_top,
            cost_inside,
            inside_damage: DamageSpec::resolve(def.inside_damage.as_ref()),
            top_damage: DamageSpec::resolve(def.top_damage.as_ref()),
            bounce: Bounce::from_raw(def.bounce),
            slope,
            pickup,
            pickup_message: def.pickup_message.clone(),
            death_message: def.death_message.clone(),
            sign: def.sign_message.clone(),
            hint: def.hint.clone(),
            exit,
            destinations: if exit {
                def.destinations.clone()
            } else {
                BTreeMap::new()
            },
            fall_damage: FallDamage {
                threshold: def
                    .fall_damage_threshold
                    .unwrap_or(FallDamage::DEFAULT_THRESHOLD),
                multiplier: def
                    .fall_damage_multiplier
                    .unwrap_or(FallDamage::DEFAULT_MULTIPLIER),
                cancel: def.fall_damage_cancel.unwrap_or(!solid && !gravity),
            },
            locks,
            monsters,
        }
    }

    /// Behavior used for symbols missing from the table: walk-through, falls,
    /// never hurts.
    pub fn permissive() -> Self {
        Self::resolve(TileSymbol('?'), &TileDefinition::default())
    }

    pub fn air() -> Self {
        Self::resolve(TileSymbol::AIR, &TileDefinition::default())
    }

    /// Solid wall reported for cells outside the map.
    pub fn boundary() -> Self {
        let mut behavior = Self::resolve(
            TileSymbol::BOUNDARY,
            &TileDefinition {
                solid: Some(true),
                ..TileDefinition::default()
            },
        );
        behavior.kind = TileKind::Boundary;
        behavior
    }

    /// Gravity disabled and passable.
    pub const fn is_fluid(&self) -> bool {
        !self.solid && !self.gravity
    }

    pub fn lock(&self, variant: Option<Variant>) -> Option<&LockRule> {
        variant.and_then(|v| self.locks.get(&v))
    }

    pub fn monster(&self, variant: Option<Variant>) -> Option<&MonsterSpec> {
        variant.and_then(|v| self.monsters.get(&v))
    }

    /// Hit points a freshly decoded monster cell starts with.
    pub fn initial_hp(&self, variant: Option<Variant>) -> i32 {
        self.monster(variant)
            .map(|spec| spec.hp)
            .unwrap_or(MonsterSpec::DEFAULT_HP)
    }

    pub fn sign_for(&self, variant: Option<Variant>) -> Option<&str> {
        self.sign.as_ref().and_then(|text| text.get(variant))
    }

    /// Inspection hint: monster hint first, then the tile's own hint.
    pub fn hint_for(&self, variant: Option<Variant>) -> Option<&str> {
        self.monster(variant)
            .and_then(|spec| spec.hint.as_deref())
            .or_else(|| {
                self.hint
                    .as_ref()
                    .and_then(|text| text.get_or_default(variant))
            })
    }

    /// Encoded map wired to `key`, ignoring blank entries.
    pub fn destination(&self, key: &str) -> Option<&str> {
        self.destinations
            .get(key)
            .map(String::as_str)
            .filter(|map| !map.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(c: char) -> TileSymbol {
        TileSymbol(c)
    }

    #[test]
    fn defaults_are_permissive() {
        let b = TileBehavior::resolve(sym('P'), &TileDefinition::default());
        assert!(!b.solid);
        assert!(b.gravity);
        assert_eq!(b.cost_top, 1);
        assert_eq!(b.cost_inside, 1);
        assert_eq!(b.bounce, Bounce::None);
        assert_eq!(b.fall_damage.threshold, 3);
        assert_eq!(b.fall_damage.multiplier, 1);
        assert!(!b.fall_damage.cancel);
        assert_eq!(b.kind, TileKind::Terrain);
    }

    #[test]
    fn exit_is_never_solid() {
        let def = TileDefinition {
            solid: Some(true),
            exit: true,
            ..TileDefinition::default()
        };
        let b = TileBehavior::resolve(TileSymbol::EXIT, &def);
        assert!(!b.solid);
        assert_eq!(b.kind, TileKind::Exit);
    }

    #[test]
    fn fluid_cancels_fall_damage_by_default() {
        let def = TileDefinition {
            gravity: Some(false),
            ..TileDefinition::default()
        };
        let b = TileBehavior::resolve(sym('W'), &def);
        assert!(b.is_fluid());
        assert!(b.fall_damage.cancel);
        assert_eq!(b.fall_damage.damage_for(10), None);
    }

    #[test]
    fn costs_fall_back_through_generic() {
        let def = TileDefinition {
            move_cost: Some(3),
            inside_move_cost: Some(2),
            ..TileDefinition::default()
        };
        let b = TileBehavior::resolve(sym('S'), &def);
        assert_eq!(b.cost_top, 3);
        assert_eq!(b.cost_inside, 2);

        let def = TileDefinition {
            move_cost: Some(3),
            ..TileDefinition::default()
        };
        assert_eq!(TileBehavior::resolve(sym('S'), &def).cost_inside, 3);
    }

    #[test]
    fn bounce_is_tri_state() {
        assert_eq!(Bounce::from_raw(None), Bounce::None);
        assert_eq!(Bounce::from_raw(Some(-2)), Bounce::None);
        assert_eq!(Bounce::from_raw(Some(0)), Bounce::Dynamic);
        assert_eq!(Bounce::from_raw(Some(4)), Bounce::Fixed(4));

        assert_eq!(Bounce::Dynamic.height_for(3), Some(2));
        assert_eq!(Bounce::Dynamic.height_for(0), Some(0));
        assert_eq!(Bounce::Fixed(4).height_for(0), Some(4));
    }

    #[test]
    fn damage_amounts_ignore_when() {
        let def = TileDefinition {
            inside_damage: Some(RawDamage {
                amount: 1,
                when: Some("stand".into()),
            }),
            top_damage: Some(RawDamage {
                amount: 2,
                when: None,
            }),
            ..TileDefinition::default()
        };
        let b = TileBehavior::resolve(sym('L'), &def);
        assert_eq!(b.inside_damage, DamageSpec { amount: 1 });
        assert_eq!(b.top_damage, DamageSpec { amount: 2 });
        assert!(!TileBehavior::resolve(sym('A'), &TileDefinition::default())
            .top_damage
            .is_harmful());
    }

    #[test]
    fn bad_records_are_rejected_not_fatal() {
        let mut def = TileDefinition {
            slope: Some("sideways".into()),
            ..TileDefinition::default()
        };
        def.lock.insert(
            "a".into(),
            RawDiceRule {
                dice: 2,
                sum: Some(7),
                ..RawDiceRule::default()
            },
        );
        def.lock.insert(
            "b".into(),
            RawDiceRule {
                dice: 4,
                ..RawDiceRule::default()
            },
        );

        let mut rejected = Vec::new();
        let b = TileBehavior::resolve_with(TileSymbol::LOCK, &def, &mut rejected);
        assert_eq!(b.slope, None);
        assert_eq!(b.locks.len(), 1);
        assert_eq!(b.kind, TileKind::Lock);
        assert_eq!(rejected.len(), 2);
    }

    #[test]
    fn hints_prefer_monster_then_variant_then_default() {
        let mut def = TileDefinition::default();
        let mut hints = BTreeMap::new();
        hints.insert("default".to_owned(), "generic".to_owned());
        hints.insert("b".to_owned(), "bee".to_owned());
        def.hint = Some(VariantText::ByVariant(hints));
        def.monster.insert(
            "a".into(),
            RawMonster {
                hint: Some("angry".into()),
                ..RawMonster::default()
            },
        );
        let b = TileBehavior::resolve(TileSymbol::MONSTER, &def);

        assert_eq!(b.hint_for(Variant::sanitize("a")), Some("angry"));
        assert_eq!(b.hint_for(Variant::sanitize("b")), Some("bee"));
        assert_eq!(b.hint_for(None), Some("generic"));
        assert_eq!(b.initial_hp(Variant::sanitize("a")), 1);
    }
}
