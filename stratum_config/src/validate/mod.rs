//! Validation of resolved values.
//!
//! Runs in two passes. The first checks `enum` membership and, when
//! requested, that every field without a default received a value. The
//! second evaluates each field's `validate` expression against the
//! [`Validator`]'s rules. Messages from both passes are reported together.

mod expr;
mod rules;

use tracing::debug;

use crate::error::{ConfigError, ConfigResult, FieldViolation};
use crate::params::ParamSet;
use crate::schema::{Flow, Schema, walk};
use crate::types::FieldValue;

pub use rules::{RuleContext, RuleOutcome, Validator};

use expr::{Constraint, RuleCall};

/// Resolved state of one field, as seen by the validator.
#[derive(Debug, Clone)]
pub(crate) struct FieldCheck {
    name: String,
    value: FieldValue,
    choices: Vec<String>,
    constraints: Option<String>,
    has_default: bool,
    changed: bool,
    required_constraint: bool,
    config_file: bool,
}

/// Snapshot every field of `schema` after values were applied.
pub(crate) fn collect(schema: &mut dyn Schema, params: &ParamSet) -> ConfigResult<Vec<FieldCheck>> {
    let mut checks = Vec::new();
    walk(schema, &mut |field, slot| {
        let Some(param) = params.lookup_field(&field.name) else {
            return Ok(Flow::Continue);
        };
        let value = slot
            .current()
            .map_or(FieldValue::Absent, |current| param.handler().inspect(current));
        checks.push(FieldCheck {
            name: field.name.clone(),
            value,
            choices: field.choices.clone(),
            constraints: field.constraints.clone(),
            has_default: field.default.is_some(),
            changed: param.is_changed(),
            required_constraint: field.has_required_constraint(),
            config_file: field.is_config_file(),
        });
        Ok(Flow::Continue)
    })?;
    Ok(checks)
}

/// Run both passes over `checks`.
///
/// # Errors
///
/// Returns [`ConfigError::Validation`] listing every violation, or
/// [`ConfigError::InvalidConstraint`] when an expression is malformed or
/// names an unknown rule.
pub(crate) fn validate(
    checks: &[FieldCheck],
    validator: &Validator,
    require_no_defaults: bool,
) -> ConfigResult<()> {
    let mut violations = Vec::new();
    for check in checks {
        check_choices(check, &mut violations);
        if require_no_defaults
            && !check.has_default
            && !check.changed
            && !check.required_constraint
            && !check.config_file
        {
            violations.push(FieldViolation::new(
                &check.name,
                format!("{} is required", check.name),
            ));
        }
    }
    for check in checks {
        if let Some(expr) = &check.constraints {
            let constraint = Constraint::parse(&check.name, expr)?;
            apply_constraint(validator, check, &constraint, &mut violations)?;
        }
    }
    debug!(fields = checks.len(), violations = violations.len(), "validated configuration");
    ConfigError::validation(violations).map_or(Ok(()), Err)
}

fn check_choices(check: &FieldCheck, violations: &mut Vec<FieldViolation>) {
    if check.choices.is_empty() || matches!(check.value, FieldValue::Absent) {
        return;
    }
    let text = check.value.display_text();
    if !check.choices.iter().any(|choice| *choice == text) {
        violations.push(FieldViolation::new(
            &check.name,
            format!("{} must be one of {}", check.name, check.choices.join(", ")),
        ));
    }
}

fn apply_constraint(
    validator: &Validator,
    check: &FieldCheck,
    constraint: &Constraint,
    violations: &mut Vec<FieldViolation>,
) -> ConfigResult<()> {
    if !run_rules(validator, &check.name, &check.name, &check.value, &constraint.field, violations)? {
        return Ok(());
    }
    let Some(element_rules) = &constraint.elements else {
        return Ok(());
    };
    match &check.value {
        FieldValue::List(items) => {
            for (i, item) in items.iter().enumerate() {
                let key = format!("{}[{i}]", check.name);
                run_rules(validator, &check.name, &key, item, element_rules, violations)?;
            }
        }
        FieldValue::Map(entries) => {
            for (entry_key, item) in entries {
                let key = format!("{}[{entry_key}]", check.name);
                run_rules(validator, &check.name, &key, item, element_rules, violations)?;
            }
        }
        FieldValue::Absent => {}
        _ => {
            return Err(ConfigError::InvalidConstraint {
                field: check.name.clone(),
                reason: "dive applies only to lists and maps".to_owned(),
            });
        }
    }
    Ok(())
}

/// Apply `calls` in order, stopping at the first failure.
///
/// Returns `false` when a rule failed.
fn run_rules(
    validator: &Validator,
    field: &str,
    key: &str,
    value: &FieldValue,
    calls: &[RuleCall],
    violations: &mut Vec<FieldViolation>,
) -> ConfigResult<bool> {
    for call in calls {
        if call.name == "omitempty" {
            if value.is_zero() {
                return Ok(true);
            }
            continue;
        }
        let rule = validator
            .rule(&call.name)
            .ok_or_else(|| ConfigError::InvalidConstraint {
                field: field.to_owned(),
                reason: format!("undefined validation rule: {}", call.name),
            })?;
        let ctx = RuleContext {
            field: key,
            value,
            param: call.param.as_deref(),
        };
        match rule(&ctx).map_err(|err| ConfigError::InvalidConstraint {
            field: field.to_owned(),
            reason: err.to_string(),
        })? {
            RuleOutcome::Pass => {}
            RuleOutcome::Fail(message) => {
                violations.push(FieldViolation::new(key, message));
                return Ok(false);
            }
        }
    }
    Ok(true)
}
