//! Defensive type charts: how hard every attacking type hits one or two defending types.

use std::collections::{BTreeMap, BTreeSet};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::{debug, info};

use crate::data::TypeMatchup;
use crate::engine::error::QueryResult;
use crate::engine::{check_type_list, QueryEngine};

/// Bucket labels in presentation order.
pub const STANDARD_LABELS: [&str; 6] = ["4x", "2x", "1x", "0.5x", "0.25x", "0x"];

/// Multiplier of one attacking type against the defenders.
/// Immunity from any defender short-circuits to zero.
pub fn attack_multiplier<'a, I>(attacking_type: &str, defenders: I) -> f64
where
    I: IntoIterator<Item = &'a TypeMatchup>,
{
    let mut multiplier = 1.0;
    for matchup in defenders {
        if matchup.no_damage_from.contains(attacking_type) {
            return 0.0;
        } else if matchup.double_damage_from.contains(attacking_type) {
            multiplier *= 2.0;
        } else if matchup.half_damage_from.contains(attacking_type) {
            multiplier *= 0.5;
        }
    }
    multiplier
}

/// Label for a multiplier. Products of 0, 0.5 and 2 are exact in binary floating point.
pub fn multiplier_label(multiplier: f64) -> String {
    if multiplier == 4.0 {
        "4x".to_string()
    } else if multiplier == 2.0 {
        "2x".to_string()
    } else if multiplier == 1.0 {
        "1x".to_string()
    } else if multiplier == 0.5 {
        "0.5x".to_string()
    } else if multiplier == 0.25 {
        "0.25x".to_string()
    } else if multiplier == 0.0 {
        "0x".to_string()
    } else {
        format!("{multiplier}x")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectivenessBucket {
    pub label: String,
    pub multiplier: f64,
    pub attacking_types: BTreeSet<String>,
}

/// Non-empty buckets, strongest first. Serializes as an ordered object of label -> types.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeEffectiveness {
    pub buckets: Vec<EffectivenessBucket>,
}

impl TypeEffectiveness {
    /// Order the standard labels first, then anything else.
    pub fn from_multipliers<I>(multipliers: I) -> Self
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let mut grouped: BTreeMap<String, EffectivenessBucket> = BTreeMap::new();
        for (attacking_type, multiplier) in multipliers {
            let label = multiplier_label(multiplier);
            grouped
                .entry(label.clone())
                .or_insert_with(|| EffectivenessBucket {
                    label,
                    multiplier,
                    attacking_types: BTreeSet::new(),
                })
                .attacking_types
                .insert(attacking_type);
        }

        let mut buckets: Vec<EffectivenessBucket> = STANDARD_LABELS
            .iter()
            .filter_map(|label| grouped.remove(*label))
            .collect();
        buckets.extend(grouped.into_values());

        Self { buckets }
    }

    pub fn get(&self, label: &str) -> Option<&BTreeSet<String>> {
        self.buckets
            .iter()
            .find(|bucket| bucket.label == label)
            .map(|bucket| &bucket.attacking_types)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.buckets.iter().map(|b| b.label.as_str()).collect()
    }

    /// Label of the bucket holding `attacking_type`.
    pub fn label_of(&self, attacking_type: &str) -> Option<&str> {
        self.buckets
            .iter()
            .find(|bucket| bucket.attacking_types.contains(attacking_type))
            .map(|bucket| bucket.label.as_str())
    }
}

impl Serialize for TypeEffectiveness {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for bucket in &self.buckets {
            map.serialize_entry(&bucket.label, &bucket.attacking_types)?;
        }
        map.end()
    }
}

impl QueryEngine {
    /// Effectiveness of every known attacking type against one or two defending types.
    pub fn type_effectiveness<S: AsRef<str>>(&self, types: &[S]) -> QueryResult<TypeEffectiveness> {
        let types: Vec<&str> = types.iter().map(AsRef::as_ref).collect();
        debug!(types = ?types, "searching type matchups");

        let known = &self.indexes.type_matchups;
        check_type_list(&types, known)?;

        let defenders: Vec<&TypeMatchup> = types.iter().filter_map(|t| known.get(*t)).collect();
        let multipliers = known.keys().map(|attacking_type| {
            let multiplier = attack_multiplier(attacking_type, defenders.iter().copied());
            (attacking_type.clone(), multiplier)
        });

        let effectiveness = TypeEffectiveness::from_multipliers(multipliers);
        info!(types = ?types, count = effectiveness.buckets.len(), "found type matchups");
        Ok(effectiveness)
    }
}
