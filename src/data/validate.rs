use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;

use crate::data::game_data::GameData;
use crate::data::member::{ChemistryCondition, ChemistryEffect};
use crate::data::plan::{load_plan, parse_recruit_key, ChemistryField, PlanFile};
use crate::data::stats::{Attribute, MAX_LEVEL, MIN_LEVEL};
use crate::error::Result;
use crate::squad::chemistry::SQUAD_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
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

#[derive(Debug, Clone, Default, Serialize)]
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

pub fn validate_plan_file(path: impl AsRef<Path>, data: &GameData) -> Result<ValidationReport> {
    let plan = load_plan(path)?;
    Ok(validate_plan(&plan, data))
}

/// Checks a plan before any squad is searched. Structural problems are
/// errors; data that only degrades results (unknown class, unreadable
/// chemistry, a pool that does not fill the capacity) is a warning.
pub fn validate_plan(plan: &PlanFile, data: &GameData) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut seen_ids = HashSet::new();
    let mut active = 0usize;

    for (key, entry) in &plan.recruits {
        let context = format!("recruits[{key}]");
        let id = match parse_recruit_key(key) {
            Ok(id) => id,
            Err(err) => {
                report.push(ValidationSeverity::Error, context, err.to_string());
                continue;
            }
        };
        if !seen_ids.insert(id) {
            report.push(
                ValidationSeverity::Error,
                context.clone(),
                format!("duplicate recruit id {id}"),
            );
        }
        if !entry.used {
            continue;
        }
        active += 1;

        if !(MIN_LEVEL..=MAX_LEVEL).contains(&entry.level) {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.level"),
                format!("level {} is outside {MIN_LEVEL}..={MAX_LEVEL}", entry.level),
            );
        }
        if data.stat_table().canonical_class(&entry.class).is_none() {
            report.push(
                ValidationSeverity::Warning,
                format!("{context}.class"),
                format!("unknown class '{}'; stats will be zero", entry.class),
            );
        }
        validate_chemistry(&mut report, &context, entry.chemistry.as_ref());
    }

    if active < SQUAD_SIZE {
        report.push(
            ValidationSeverity::Error,
            "recruits",
            format!("{active} active recruit(s); at least {SQUAD_SIZE} are needed"),
        );
    }

    match plan.resolve_capacity(data) {
        Ok(capacity) => validate_pool(&mut report, plan, capacity),
        Err(err) => report.push(ValidationSeverity::Error, "rank", err.to_string()),
    }

    if plan.mission.requirement.sum() == 0 {
        report.push(
            ValidationSeverity::Info,
            "mission.requirement",
            "requirement is zero; every squad matches without training",
        );
    }

    report
}

fn validate_chemistry(
    report: &mut ValidationReport,
    context: &str,
    chemistry: Option<&ChemistryField>,
) {
    let entry = match chemistry {
        Some(ChemistryField::Rule(entry)) => entry,
        Some(ChemistryField::Legacy(_)) => {
            report.push(
                ValidationSeverity::Info,
                format!("{context}.chemistry"),
                "legacy chemistry format is ignored",
            );
            return;
        }
        None => return,
    };
    if entry.condition.trim().is_empty() && entry.effect.trim().is_empty() {
        return;
    }

    let condition = ChemistryCondition::from(entry.condition.as_str());
    if !condition.is_known() {
        report.push(
            ValidationSeverity::Warning,
            format!("{context}.chemistry.condition"),
            format!("unknown condition '{}'; the rule never activates", entry.condition),
        );
    }
    if let Err(err) = ChemistryEffect::from_str(&entry.effect) {
        report.push(
            ValidationSeverity::Warning,
            format!("{context}.chemistry.effect"),
            err,
        );
    }
    if entry.value == 0 {
        report.push(
            ValidationSeverity::Info,
            format!("{context}.chemistry.value"),
            "percentage is zero",
        );
    }
}

fn validate_pool(report: &mut ValidationReport, plan: &PlanFile, capacity: u32) {
    let pool = plan.training;
    for attribute in Attribute::ALL {
        let value = pool.get(attribute);
        if value > capacity {
            report.push(
                ValidationSeverity::Error,
                format!("training.{attribute}"),
                format!("{value} exceeds capacity {capacity}"),
            );
        }
    }
    let sum = pool.sum();
    if sum > capacity {
        report.push(
            ValidationSeverity::Error,
            "training",
            format!("pool sum {sum} exceeds capacity {capacity}"),
        );
    } else if sum != capacity {
        report.push(
            ValidationSeverity::Warning,
            "training",
            format!(
                "pool sum {sum} does not equal capacity {capacity}; only gains apply until it fills"
            ),
        );
    }
}
