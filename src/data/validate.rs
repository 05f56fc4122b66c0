//! Integrity checks over a loaded [IndexSet]: cross-index name references,
//! matchup category disjointness, and stat-spread coverage.

use std::fmt;

use crate::data::indexes::{IndexKind, IndexSet};
use crate::data::model::Stat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }
}

pub fn validate_indexes(indexes: &IndexSet) -> ValidationReport {
    let mut report = ValidationReport::default();

    for kind in IndexKind::REQUIRED {
        if indexes.is_empty(kind) {
            report.push(
                ValidationSeverity::Error,
                format!("{kind} index"),
                "index is empty",
            );
        }
    }

    check_move_learners(indexes, &mut report);
    check_type_members(indexes, &mut report);
    check_stat_entries(indexes, &mut report);
    check_matchups(indexes, &mut report);
    check_stat_spread(indexes, &mut report);
    check_machine_moves(indexes, &mut report);

    report
}

fn check_move_learners(indexes: &IndexSet, report: &mut ValidationReport) {
    let mut moves: Vec<_> = indexes.moves.iter().collect();
    moves.sort_by(|a, b| a.0.cmp(b.0));
    for (move_name, learners) in moves {
        for name in learners.keys() {
            if !indexes.pokemon.contains_key(name) {
                report.push(
                    ValidationSeverity::Error,
                    format!("move '{move_name}'"),
                    format!("learner '{name}' has no pokemon record"),
                );
            }
        }
    }
}

fn check_type_members(indexes: &IndexSet, report: &mut ValidationReport) {
    let mut types: Vec<_> = indexes.types.iter().collect();
    types.sort_by(|a, b| a.0.cmp(b.0));
    for (type_name, members) in types {
        let mut missing: Vec<&String> = members
            .iter()
            .filter(|name| !indexes.pokemon.contains_key(*name))
            .collect();
        missing.sort();
        for name in missing {
            report.push(
                ValidationSeverity::Error,
                format!("type '{type_name}'"),
                format!("member '{name}' has no pokemon record"),
            );
        }
    }
}

fn check_stat_entries(indexes: &IndexSet, report: &mut ValidationReport) {
    for name in indexes.stats.keys() {
        if !indexes.pokemon.contains_key(name) {
            report.push(
                ValidationSeverity::Error,
                format!("stats '{name}'"),
                "stat record has no pokemon record",
            );
        }
    }
}

fn check_matchups(indexes: &IndexSet, report: &mut ValidationReport) {
    let mut matchups: Vec<_> = indexes.type_matchups.iter().collect();
    matchups.sort_by(|a, b| a.0.cmp(b.0));
    for (defender, matchup) in matchups {
        let overlapping = matchup.overlapping();
        if !overlapping.is_empty() {
            report.push(
                ValidationSeverity::Error,
                format!("matchup '{defender}'"),
                format!(
                    "attacking types in more than one category: {}",
                    overlapping.join(", ")
                ),
            );
        }
    }
}

fn check_stat_spread(indexes: &IndexSet, report: &mut ValidationReport) {
    let spread = &indexes.stat_spread;
    if spread.is_empty() {
        return;
    }
    for stat in Stat::ALL {
        if !spread.medians.contains_key(&stat) {
            report.push(
                ValidationSeverity::Error,
                format!("stat spread '{stat}'"),
                "missing median",
            );
        }
        match spread.quintiles.get(&stat) {
            None => report.push(
                ValidationSeverity::Error,
                format!("stat spread '{stat}'"),
                "missing quintiles",
            ),
            Some(quintiles) if !quintiles.is_ordered() => report.push(
                ValidationSeverity::Warning,
                format!("stat spread '{stat}'"),
                format!("quintile boundaries out of order: {:?}", quintiles.boundaries()),
            ),
            Some(_) => {}
        }
    }
}

fn check_machine_moves(indexes: &IndexSet, report: &mut ValidationReport) {
    let mut machines: Vec<_> = indexes.machine_moves.iter().collect();
    machines.sort();
    for (move_name, machine_id) in machines {
        if !indexes.moves.contains_key(move_name) {
            report.push(
                ValidationSeverity::Warning,
                format!("machine '{machine_id}'"),
                format!("teaches '{move_name}', which no pokemon learns"),
            );
        }
    }
}
