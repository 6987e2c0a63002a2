//! Step validator: pure logic, no I/O.
//!
//! Evaluates a step's rule table against the record and stops at the first
//! failing rule. Fields belonging to other steps are never looked at.

use regex::Regex;
use serde_json::Value;
use validator::Validate;

use super::rules::{
    step_rules, Check, Condition, FieldViolation, StepRule, StepViolation, ValidationSeverity,
};
use crate::intake::fields;
use crate::intake::record::IntakeRecord;
use crate::wizard::MIN_STEP;

/// GSTIN: state code, PAN, entity number, `Z`, checksum.
const GSTIN_PATTERN: &str = r"^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z][1-9A-Z]Z[0-9A-Z]$";

/// Indian postal code: six digits, not starting with zero.
const PINCODE_PATTERN: &str = r"^[1-9][0-9]{5}$";

/// One seasonal-pricing row.
#[derive(Debug, Clone, Validate)]
pub struct SeasonalPricingRow {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub adjustment_type: String,
    #[validate(range(min = 0.0, max = 100.0))]
    pub percentage: f64,
}

impl SeasonalPricingRow {
    /// Read a row as stored in the record:
    /// `{ "name": .., "type": .., "percentage": .. }`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let text = |key: &str| {
            obj.get(key)
                .and_then(Value::as_str)
                .map(|s| s.trim().to_string())
                .unwrap_or_default()
        };
        let percentage = match obj.get("percentage")? {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse().ok()?,
            _ => return None,
        };
        Some(Self {
            name: text("name"),
            adjustment_type: text("type"),
            percentage,
        })
    }
}

/// Validate one step. Returns the first failing rule as a human-readable
/// violation; steps without rules always pass.
pub fn validate_step(step: u8, record: &IntakeRecord) -> Result<(), StepViolation> {
    match step_rules(step)
        .iter()
        .find(|rule| applies(rule, record) && !passes(rule, record))
    {
        Some(rule) => Err(StepViolation {
            step,
            field: rule.field.to_string(),
            message: rule.message.to_string(),
        }),
        None => Ok(()),
    }
}

/// Validate steps `1..=last` in order, returning the first violation.
pub fn validate_through(last: u8, record: &IntakeRecord) -> Result<(), StepViolation> {
    (MIN_STEP..=last).try_for_each(|step| validate_step(step, record))
}

fn applies(rule: &StepRule, record: &IntakeRecord) -> bool {
    match rule.when {
        Condition::Always => true,
        Condition::NotEquals(key, expected) => record.str_value(key) != Some(expected),
        Condition::Enabled(key) => record.bool_value(key),
    }
}

fn passes(rule: &StepRule, record: &IntakeRecord) -> bool {
    match rule.check {
        Check::Required => record.is_set(rule.field),
        Check::NonEmptyList => !record.list_value(rule.field).is_empty(),
        Check::IsTrue => record.get(rule.field) == Some(&Value::Bool(true)),
        Check::NotRaised => !record.bool_value(rule.field),
        Check::LessThan(other) => {
            match (record.f64_value(rule.field), record.f64_value(other)) {
                (Some(value), Some(limit)) => value < limit,
                _ => true,
            }
        }
        Check::AttachmentPresent => record.has_attachment(rule.field),
        Check::WellFormedSeasons => record.list_value(rule.field).iter().all(|row| {
            SeasonalPricingRow::from_value(row).is_some_and(|row| row.validate().is_ok())
        }),
    }
}

// ---------------------------------------------------------------------------
// Advisories
// ---------------------------------------------------------------------------

/// Non-blocking findings for a step. These never gate navigation.
pub fn advisories(step: u8, record: &IntakeRecord) -> Vec<FieldViolation> {
    let mut found = Vec::new();
    match step {
        1 => {
            if let Some(v) = pattern_mismatch(
                record,
                fields::PINCODE,
                PINCODE_PATTERN,
                "Pincode does not look like a 6-digit Indian postal code",
            ) {
                found.push(v);
            }
        }
        6 => {
            if let Some(v) = pattern_mismatch(
                record,
                fields::GST_NUMBER,
                GSTIN_PATTERN,
                "GST number does not match the 15-character GSTIN format",
            ) {
                found.push(v);
            }
        }
        _ => {}
    }
    found
}

fn pattern_mismatch(
    record: &IntakeRecord,
    key: &str,
    pattern: &str,
    message: &str,
) -> Option<FieldViolation> {
    let value = record.str_value(key)?;
    match Regex::new(pattern) {
        Ok(re) if re.is_match(&value.to_ascii_uppercase()) => None,
        Ok(_) => Some(FieldViolation {
            field: key.to_string(),
            rule_type: "regex_pattern".to_string(),
            message: message.to_string(),
            severity: ValidationSeverity::Warning,
            value: Some(Value::from(value)),
        }),
        Err(_) => None,
    }
}
