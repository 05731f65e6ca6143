//! Tile-definition table loader.
//!
//! Two formats are accepted:
//! - JSON keyed by tile symbol, as published for the web build. Exit tiles
//!   may carry their destinations as plain string fields (`"default"`,
//!   `"Level-2"`) next to the regular attributes.
//! - RON with the same records under a `tiles` map.
//!
//! A record that fails to parse or validate is dropped with a warning; the
//! rest of the table still loads.

use std::collections::BTreeMap;
use std::path::Path;

use game_core::{TableError, TileDefinition, TileSymbol, TileTable};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::loaders::{LoadResult, read_file};

/// Attribute names that hold text but are never exit destinations.
const TEXT_ATTRIBUTES: &[&str] = &[
    "name",
    "slope",
    "pickupType",
    "pickupMessage",
    "deathMessage",
    "signMessage",
    "hint",
    "svg",
    "img",
    "color",
    "logKind",
];

/// Loaded table plus the records that were dropped on the way.
#[derive(Debug)]
pub struct TileTableReport {
    pub table: TileTable,
    pub warnings: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TileTableRon {
    tiles: BTreeMap<char, TileDefinition>,
}

/// Loader for tile-definition tables.
pub struct TileTableLoader;

impl TileTableLoader {
    /// Loads a table from disk, picking the format from the file extension.
    pub fn load(path: &Path) -> LoadResult<TileTableReport> {
        let content = read_file(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("ron") => Self::from_ron_str(&content),
            _ => Self::from_json_str(&content),
        }
    }

    /// Parses the JSON form. Only a malformed document is an error.
    pub fn from_json_str(content: &str) -> LoadResult<TileTableReport> {
        let root: Map<String, Value> = serde_json::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse tile table JSON: {}", e))?;

        let mut warnings = Vec::new();
        let mut definitions = Vec::with_capacity(root.len());
        for (key, value) in root {
            let symbol = match parse_symbol(&key) {
                Ok(symbol) => symbol,
                Err(err) => {
                    warnings.push(err.to_string());
                    continue;
                }
            };
            match json_definition(value) {
                Ok(def) => definitions.push((symbol, def)),
                Err(err) => warnings.push(format!("tile '{}': {}", key, err)),
            }
        }

        Ok(Self::build(definitions, warnings))
    }

    /// Parses the RON form.
    pub fn from_ron_str(content: &str) -> LoadResult<TileTableReport> {
        let data: TileTableRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse tile table RON: {}", e))?;
        let definitions = data
            .tiles
            .into_iter()
            .map(|(ch, def)| (TileSymbol(ch), def))
            .collect();
        Ok(Self::build(definitions, Vec::new()))
    }

    fn build(
        mut definitions: Vec<(TileSymbol, TileDefinition)>,
        mut warnings: Vec<String>,
    ) -> TileTableReport {
        // The boundary wall is always available, as in the built-in table.
        if !definitions.iter().any(|(s, _)| *s == TileSymbol::BOUNDARY) {
            definitions.push((
                TileSymbol::BOUNDARY,
                TileDefinition {
                    solid: Some(true),
                    ..TileDefinition::default()
                },
            ));
        }

        let (table, rejected) = TileTable::from_definitions(definitions);
        warnings.extend(
            rejected
                .into_iter()
                .map(|(symbol, err)| format!("tile '{}': {}", symbol, err)),
        );
        TileTableReport { table, warnings }
    }
}

fn parse_symbol(key: &str) -> Result<TileSymbol, TableError> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(TileSymbol(ch)),
        _ => Err(TableError::InvalidSymbol(key.to_owned())),
    }
}

fn json_definition(value: Value) -> Result<TileDefinition, serde_json::Error> {
    let destinations = match &value {
        Value::Object(fields) => loose_destinations(fields),
        _ => BTreeMap::new(),
    };
    let mut def: TileDefinition = serde_json::from_value(value)?;
    if def.exit {
        for (key, map) in destinations {
            def.destinations.entry(key).or_insert(map);
        }
    }
    Ok(def)
}

fn loose_destinations(fields: &Map<String, Value>) -> BTreeMap<String, String> {
    fields
        .iter()
        .filter(|(key, _)| !TEXT_ATTRIBUTES.contains(&key.as_str()))
        .filter_map(|(key, value)| value.as_str().map(|map| (key.clone(), map.to_owned())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{TileKind, TileOracle};

    const TABLE: &str = r#"{
        "P": { "name": "Platform", "solid": true, "svg": "<svg/>" },
        "W": { "gravity": false, "moveCostInside": 2 },
        "E": { "exit": true, "default": "P25~A25", "Level-2": "X25", "name": "Door" },
        "K": { "solid": true, "lock": { "a": { "dice": 2, "sum": 7, "messageFail": "Nope." } } },
        "M": { "solid": true, "monster": { "a": { "name": "Bat", "hp": 3 } } },
        "Q": { "slope": "sideways" },
        "bad": { "solid": true },
        "Y": { "solid": "very" }
    }"#;

    #[test]
    fn json_table_reads_attributes_and_destinations() {
        let report = TileTableLoader::from_json_str(TABLE).expect("json");
        let table = &report.table;

        assert!(table.behavior(TileSymbol('P')).solid);
        assert!(table.behavior(TileSymbol('W')).is_fluid());
        assert_eq!(table.behavior(TileSymbol('W')).cost_inside, 2);

        let exit = table.behavior(TileSymbol::EXIT);
        assert_eq!(exit.kind, TileKind::Exit);
        assert_eq!(exit.destination("default"), Some("P25~A25"));
        assert_eq!(exit.destination("Level-2"), Some("X25"));
        assert_eq!(exit.destination("name"), None);
        assert_eq!(table.boot_map(), Some("P25~A25"));

        assert_eq!(table.behavior(TileSymbol::LOCK).kind, TileKind::Lock);
        assert_eq!(table.initial_hp(TileSymbol::MONSTER, game_core::Variant::sanitize("a")), 3);
        assert!(table.behavior(TileSymbol::BOUNDARY).solid);
    }

    #[test]
    fn bad_records_become_warnings() {
        let report = TileTableLoader::from_json_str(TABLE).expect("json");
        assert_eq!(report.warnings.len(), 3, "{:?}", report.warnings);
        assert!(!report.table.contains(TileSymbol('Y')));
        // A bad slope drops only the slope.
        assert!(report.table.contains(TileSymbol('Q')));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(TileTableLoader::from_json_str("[1, 2").is_err());
    }

    #[test]
    fn ron_table_loads() {
        let ron = r#"(
            tiles: {
                'P': (solid: Some(true)),
                'B': (solid: Some(true), bounce: Some(0)),
            },
        )"#;
        let report = TileTableLoader::from_ron_str(ron).expect("ron");
        assert!(report.warnings.is_empty());
        assert!(report.table.behavior(TileSymbol('B')).solid);
    }

    #[test]
    fn load_picks_format_by_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tiles.json");
        std::fs::write(&path, r#"{ "P": { "solid": true } }"#).expect("write");
        let report = TileTableLoader::load(&path).expect("load");
        assert!(report.table.behavior(TileSymbol('P')).solid);

        assert!(TileTableLoader::load(&dir.path().join("missing.json")).is_err());
    }
}
