//! Build an [IndexSet] from a dataset directory of row-shaped JSON fixtures.
//! Each file is one table; rows are aggregated into the denormalized indexes the engine reads.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::info;

use crate::config::Settings;
use crate::data::indexes::{
    IndexSet, MachineMoveIndex, MoveIndex, PokemonIndex, StatIndex, TypeIndex, TypeMatchupIndex,
};
use crate::data::model::{
    LearnMethod, LearnMethods, PokemonRecord, Quintiles, Stat, StatRecord, StatSpreadSummary,
};

pub const POKEMON_FILE: &str = "pokemon.json";
pub const POKEMON_MOVE_FILE: &str = "pokemon_move.json";
pub const POKEMON_STATS_FILE: &str = "pokemon_stats.json";
pub const STAT_SPREADS_FILE: &str = "stat_spreads.json";
pub const POKEMON_TYPE_FILE: &str = "pokemon_type.json";
pub const TYPE_MATCHUPS_FILE: &str = "type_matchups.json";
pub const TM_FILE: &str = "tm.json";

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown learn method '{method}' for {pokemon} / {move_name}")]
    UnknownLearnMethod {
        pokemon: String,
        move_name: String,
        method: String,
    },
    #[error("level-up row for {pokemon} / {move_name} has no level")]
    MissingLevel { pokemon: String, move_name: String },
    #[error("unknown stat '{stat}' in stat spreads")]
    UnknownStat { stat: String },
}

#[derive(Debug, Deserialize)]
struct PokemonMoveRow {
    pokemon: String,
    move_name: String,
    learn_method: String,
    #[serde(default)]
    level: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct PokemonStatsRow {
    pokemon: String,
    #[serde(flatten)]
    stats: StatRecord,
}

#[derive(Debug, Deserialize)]
struct StatSpreadRow {
    stat_name: String,
    percentile_20: u32,
    percentile_40: u32,
    percentile_60: u32,
    percentile_80: u32,
    percentile_100: u32,
    median: u32,
}

#[derive(Debug, Deserialize)]
struct PokemonTypeRow {
    pokemon: String,
    type_name: String,
}

#[derive(Debug, Deserialize)]
struct TypeMatchupRow {
    defender: String,
    attacker: String,
    multiplier: f64,
}

#[derive(Debug, Deserialize)]
struct TmRow {
    name: String,
    #[serde(default)]
    machine_id: Option<String>,
}

/// Load the dataset configured in `settings`.
pub fn load_configured(settings: &Settings) -> Result<IndexSet, LoadError> {
    load_dataset(settings.fixtures_dir())
}

/// Load every index from `dir`. The machine-move file is optional.
pub fn load_dataset(dir: impl AsRef<Path>) -> Result<IndexSet, LoadError> {
    let dir = dir.as_ref();

    let pokemon = build_pokemon_index(read_rows(&dir.join(POKEMON_FILE))?);
    info!(pokemon_count = pokemon.len(), "pokemon info index created");

    let moves = build_move_index(read_rows(&dir.join(POKEMON_MOVE_FILE))?)?;
    info!(move_count = moves.len(), "move index created");

    let stats = build_stat_index(read_rows(&dir.join(POKEMON_STATS_FILE))?);
    info!(stat_count = stats.len(), "stat index created");

    let stat_spread = build_stat_spread(read_rows(&dir.join(STAT_SPREADS_FILE))?)?;
    info!(stat_spread_count = stat_spread.medians.len(), "stat spread index created");

    let types = build_type_index(read_rows(&dir.join(POKEMON_TYPE_FILE))?);
    info!(type_count = types.len(), "type index created");

    let type_matchups = build_type_matchup_index(read_rows(&dir.join(TYPE_MATCHUPS_FILE))?);
    info!(matchup_count = type_matchups.len(), "type matchup index created");

    let tm_path = dir.join(TM_FILE);
    let machine_moves = if tm_path.exists() {
        build_machine_moves_index(read_rows(&tm_path)?)
    } else {
        MachineMoveIndex::new()
    };
    info!(machine_moves_count = machine_moves.len(), "machine moves index created");

    Ok(IndexSet {
        pokemon,
        moves,
        stats,
        stat_spread,
        types,
        type_matchups,
        machine_moves,
    })
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, LoadError> {
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn build_pokemon_index(rows: Vec<PokemonRecord>) -> PokemonIndex {
    rows.into_iter()
        .map(|record| (record.name.clone(), record))
        .collect()
}

fn build_move_index(rows: Vec<PokemonMoveRow>) -> Result<MoveIndex, LoadError> {
    let mut index = MoveIndex::new();
    for row in rows {
        let method = match LearnMethod::from_parts(&row.learn_method, row.level) {
            Some(method) => method,
            None if row.learn_method == LearnMethod::LEVEL_UP => {
                return Err(LoadError::MissingLevel {
                    pokemon: row.pokemon,
                    move_name: row.move_name,
                });
            }
            None => {
                return Err(LoadError::UnknownLearnMethod {
                    pokemon: row.pokemon,
                    move_name: row.move_name,
                    method: row.learn_method,
                });
            }
        };
        index
            .entry(row.move_name)
            .or_default()
            .entry(row.pokemon)
            .or_insert_with(LearnMethods::new)
            .push(method);
    }
    Ok(index)
}

fn build_stat_index(rows: Vec<PokemonStatsRow>) -> StatIndex {
    rows.into_iter().map(|row| (row.pokemon, row.stats)).collect()
}

fn build_stat_spread(rows: Vec<StatSpreadRow>) -> Result<StatSpreadSummary, LoadError> {
    let mut summary = StatSpreadSummary::default();
    for row in rows {
        let stat: Stat = row
            .stat_name
            .parse()
            .map_err(|_| LoadError::UnknownStat {
                stat: row.stat_name.clone(),
            })?;
        summary.medians.insert(stat, row.median);
        summary.quintiles.insert(
            stat,
            Quintiles {
                p20: row.percentile_20,
                p40: row.percentile_40,
                p60: row.percentile_60,
                p80: row.percentile_80,
                p100: row.percentile_100,
            },
        );
    }
    Ok(summary)
}

fn build_type_index(rows: Vec<PokemonTypeRow>) -> TypeIndex {
    let mut index = TypeIndex::new();
    for row in rows {
        index.entry(row.type_name).or_default().insert(row.pokemon);
    }
    index
}

fn build_type_matchup_index(rows: Vec<TypeMatchupRow>) -> TypeMatchupIndex {
    let mut index = TypeMatchupIndex::new();
    for row in rows {
        let matchup = index.entry(row.defender).or_default();
        if row.multiplier == 0.0 {
            matchup.no_damage_from.insert(row.attacker);
        } else if row.multiplier == 0.5 {
            matchup.half_damage_from.insert(row.attacker);
        } else if row.multiplier == 2.0 || row.multiplier == 4.0 {
            matchup.double_damage_from.insert(row.attacker);
        }
    }
    index
}

fn build_machine_moves_index(rows: Vec<TmRow>) -> MachineMoveIndex {
    rows.into_iter()
        .filter_map(|row| row.machine_id.map(|id| (row.name, id)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn move_row(pokemon: &str, move_name: &str, method: &str, level: Option<u32>) -> PokemonMoveRow {
        PokemonMoveRow {
            pokemon: pokemon.to_string(),
            move_name: move_name.to_string(),
            learn_method: method.to_string(),
            level,
        }
    }

    #[test]
    fn move_rows_accumulate_per_pokemon() {
        let index = build_move_index(vec![
            move_row("pikachu", "thunderbolt", "level-up", Some(36)),
            move_row("pikachu", "thunderbolt", "machine", Some(0)),
            move_row("raichu", "thunderbolt", "machine", None),
        ])
        .expect("rows are valid");

        let learners = &index["thunderbolt"];
        assert_eq!(learners.len(), 2);
        assert_eq!(learners["pikachu"].level(), Some(36));
        assert!(learners["pikachu"].contains(LearnMethod::Machine));
        assert!(learners["raichu"].contains(LearnMethod::Machine));
    }

    #[test]
    fn unknown_learn_method_is_rejected() {
        let err = build_move_index(vec![move_row("mew", "transform", "sketch", None)])
            .expect_err("sketch is not a learn method");
        assert!(matches!(err, LoadError::UnknownLearnMethod { .. }));
    }

    #[test]
    fn level_up_without_level_is_rejected() {
        let err = build_move_index(vec![move_row("mew", "pound", "level-up", None)])
            .expect_err("level is required");
        assert!(matches!(err, LoadError::MissingLevel { .. }));
    }

    #[test]
    fn matchup_rows_are_categorized_by_multiplier() {
        let rows = vec![
            TypeMatchupRow { defender: "fire".into(), attacker: "water".into(), multiplier: 2.0 },
            TypeMatchupRow { defender: "fire".into(), attacker: "grass".into(), multiplier: 0.5 },
            TypeMatchupRow { defender: "fire".into(), attacker: "normal".into(), multiplier: 1.0 },
            TypeMatchupRow { defender: "ghost".into(), attacker: "normal".into(), multiplier: 0.0 },
        ];
        let index = build_type_matchup_index(rows);
        let fire = &index["fire"];
        assert!(fire.double_damage_from.contains("water"));
        assert!(fire.half_damage_from.contains("grass"));
        assert!(!fire.double_damage_from.contains("normal"));
        assert!(!fire.half_damage_from.contains("normal"));
        assert!(index["ghost"].no_damage_from.contains("normal"));
    }

    #[test]
    fn tm_rows_without_machine_id_are_skipped() {
        let index = build_machine_moves_index(vec![
            TmRow { name: "thunderbolt".into(), machine_id: Some("TM24".into()) },
            TmRow { name: "hypnosis".into(), machine_id: None },
        ]);
        assert_eq!(index.get("thunderbolt").map(String::as_str), Some("TM24"));
        assert!(!index.contains_key("hypnosis"));
    }
}
