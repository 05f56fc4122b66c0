//! Untyped (JSON) queries and their shaped results.
//!
//! Transports parse their input into a [`QueryRequest`] and hand it to
//! [`QueryEngine::execute`], which runs exactly one operation.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::data::{LearnMethods, PokemonRecord};
use crate::engine::error::{QueryError, QueryResult};
use crate::engine::filter::SpeciesFilter;
use crate::engine::matchup::TypeEffectiveness;
use crate::engine::ranking::{RankedCandidates, StatQuery};
use crate::engine::{split_type_combo, QueryEngine, StatProfile};

pub const FLAG_LEGENDARY: &str = "include_legendary";
pub const FLAG_MYTHICAL: &str = "include_mythical";
pub const FLAG_ULTRA_BEAST: &str = "include_ultra_beasts";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryRequest {
    Lookup { name: String },
    Move { move_name: String, filter: SpeciesFilter },
    Types { types: Vec<String>, filter: SpeciesFilter },
    Stats(StatQuery),
    Matchup { types: Vec<String> },
    Profile { name: String },
}

/// JSON kind name used in mismatch messages.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(field: impl Into<String>, expected: &'static str, found: &Value) -> QueryError {
    QueryError::TypeMismatch {
        field: field.into(),
        expected,
        found: json_kind(found),
    }
}

fn required_str<'v>(obj: &'v Map<String, Value>, field: &str) -> QueryResult<&'v str> {
    match obj.get(field) {
        None | Some(Value::Null) => Err(QueryError::InvalidArgument(format!(
            "Missing required field '{field}'"
        ))),
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(other) => Err(mismatch(field, "string", other)),
    }
}

fn optional_bool(obj: &Map<String, Value>, field: &str) -> QueryResult<bool> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(mismatch(field, "boolean", other)),
    }
}

fn optional_u32(obj: &Map<String, Value>, field: &str) -> QueryResult<Option<u32>> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .map(Some)
            .ok_or_else(|| {
                QueryError::InvalidArgument(format!("'{field}' must be a non-negative integer, got {n}"))
            }),
        Some(other) => Err(mismatch(field, "integer", other)),
    }
}

/// `"fire-flying"` or `["fire", "flying"]`.
fn type_list(obj: &Map<String, Value>, field: &str) -> QueryResult<Vec<String>> {
    match obj.get(field) {
        None | Some(Value::Null) => Err(QueryError::InvalidArgument(format!(
            "Missing required field '{field}'"
        ))),
        Some(Value::String(combo)) => Ok(split_type_combo(combo)),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::String(s) => Ok(s.trim().to_lowercase()),
                other => Err(mismatch(format!("{field}[{i}]"), "string", other)),
            })
            .collect(),
        Some(other) => Err(mismatch(field, "string or array of strings", other)),
    }
}

fn species_filter(obj: &Map<String, Value>) -> QueryResult<SpeciesFilter> {
    Ok(SpeciesFilter::new(
        optional_bool(obj, FLAG_LEGENDARY)?,
        optional_bool(obj, FLAG_MYTHICAL)?,
        optional_bool(obj, FLAG_ULTRA_BEAST)?,
    ))
}

impl QueryRequest {
    /// Parse `{"op": "...", ...}`. Wrong JSON kinds are `TypeMismatch`, missing or
    /// unknown fields are `InvalidArgument`.
    pub fn from_json(value: &Value) -> QueryResult<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| mismatch("request", "object", value))?;
        let op = required_str(obj, "op")?;

        let request = match op {
            "lookup" => Self::Lookup {
                name: required_str(obj, "name")?.to_string(),
            },
            "move" => Self::Move {
                move_name: required_str(obj, "move")?.to_string(),
                filter: species_filter(obj)?,
            },
            "types" => Self::Types {
                types: type_list(obj, "types")?,
                filter: species_filter(obj)?,
            },
            "stats" => {
                let mut query = StatQuery::new(
                    required_str(obj, "primary_stat")?,
                    required_str(obj, "secondary_stat")?,
                )
                .filter(species_filter(obj)?);
                query.min_primary = optional_u32(obj, "min_primary")?.unwrap_or(0);
                query.min_secondary = optional_u32(obj, "min_secondary")?;
                query.min_speed = optional_u32(obj, "min_speed")?;
                Self::Stats(query)
            }
            "matchup" => Self::Matchup {
                types: type_list(obj, "types")?,
            },
            "profile" => Self::Profile {
                name: required_str(obj, "name")?.to_string(),
            },
            other => {
                return Err(QueryError::InvalidArgument(format!(
                    "Unknown op '{other}'. Valid ops: lookup, move, types, stats, matchup, profile"
                )))
            }
        };
        Ok(request)
    }

    pub fn op(&self) -> &'static str {
        match self {
            Self::Lookup { .. } => "lookup",
            Self::Move { .. } => "move",
            Self::Types { .. } => "types",
            Self::Stats(_) => "stats",
            Self::Matchup { .. } => "matchup",
            Self::Profile { .. } => "profile",
        }
    }
}

/// Lookup response. `types` is split out of the display string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PokemonInfo {
    pub name: String,
    pub display_name: String,
    pub number: u32,
    pub types: Vec<String>,
    pub height: f64,
    pub weight: f64,
    pub sprite_url: String,
    pub description: String,
    pub genus: String,
}

impl From<&PokemonRecord> for PokemonInfo {
    fn from(record: &PokemonRecord) -> Self {
        Self {
            name: record.name.clone(),
            display_name: record.display_name.clone(),
            number: record.number,
            types: record.types(),
            height: record.height,
            weight: record.weight,
            sprite_url: record.sprite_url.clone(),
            description: record.description.clone(),
            genus: record.genus.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveLearners<'a> {
    pub move_name: String,
    pub machine_id: Option<&'a str>,
    pub pokemon_list: BTreeMap<&'a str, &'a LearnMethods>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeMembers<'a> {
    pub type_combo: String,
    pub pokemon_list: BTreeSet<&'a str>,
}

/// Result of one executed request, borrowing from the engine's indexes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryOutcome<'a> {
    Pokemon(PokemonInfo),
    Move(MoveLearners<'a>),
    Types(TypeMembers<'a>),
    Stats(RankedCandidates),
    Matchup(TypeEffectiveness),
    Profile(StatProfile),
}

impl QueryEngine {
    pub fn execute(&self, request: &QueryRequest) -> QueryResult<QueryOutcome<'_>> {
        debug!(op = request.op(), "executing query request");
        let outcome = match request {
            QueryRequest::Lookup { name } => {
                QueryOutcome::Pokemon(PokemonInfo::from(self.lookup_by_name(name)?))
            }
            QueryRequest::Move { move_name, filter } => QueryOutcome::Move(MoveLearners {
                pokemon_list: self.find_by_move(move_name, *filter)?,
                machine_id: self.machine_for_move(move_name),
                move_name: move_name.clone(),
            }),
            QueryRequest::Types { types, filter } => QueryOutcome::Types(TypeMembers {
                pokemon_list: self.find_by_type(types, *filter)?,
                type_combo: types.join("-"),
            }),
            QueryRequest::Stats(query) => {
                QueryOutcome::Stats(RankedCandidates(self.find_by_stats(query)?))
            }
            QueryRequest::Matchup { types } => QueryOutcome::Matchup(self.type_effectiveness(types)?),
            QueryRequest::Profile { name } => QueryOutcome::Profile(self.stat_profile(name)?),
        };
        Ok(outcome)
    }
}
