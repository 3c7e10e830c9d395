//! Parsing of `validate` expressions such as `required,gte=1,dive,lt=200`.
//!
//! Rules are separated by commas; a literal comma inside a parameter is
//! written `0x2C`.

use crate::error::{ConfigError, ConfigResult};

/// One rule invocation with its optional parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RuleCall {
    pub(crate) name: String,
    pub(crate) param: Option<String>,
}

/// Rules for the field itself and, after `dive`, for each element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Constraint {
    pub(crate) field: Vec<RuleCall>,
    pub(crate) elements: Option<Vec<RuleCall>>,
}

impl Constraint {
    pub(crate) fn parse(field: &str, expr: &str) -> ConfigResult<Self> {
        let mut constraint = Self::default();
        for token in expr.split(',').map(str::trim) {
            if token.is_empty() {
                return Err(ConfigError::InvalidConstraint {
                    field: field.to_owned(),
                    reason: format!("empty rule in {expr:?}"),
                });
            }
            if token == "dive" {
                if constraint.elements.is_some() {
                    return Err(ConfigError::InvalidConstraint {
                        field: field.to_owned(),
                        reason: "nested dive is not supported".to_owned(),
                    });
                }
                constraint.elements = Some(Vec::new());
                continue;
            }
            let call = match token.split_once('=') {
                Some((name, param)) => RuleCall {
                    name: name.to_owned(),
                    param: Some(param.replace("0x2C", ",")),
                },
                None => RuleCall {
                    name: token.to_owned(),
                    param: None,
                },
            };
            match constraint.elements.as_mut() {
                Some(elements) => elements.push(call),
                None => constraint.field.push(call),
            }
        }
        Ok(constraint)
    }
}

#[cfg(test)]
mod tests {
    use super::{Constraint, RuleCall};

    fn call(name: &str, param: Option<&str>) -> RuleCall {
        RuleCall {
            name: name.to_owned(),
            param: param.map(str::to_owned),
        }
    }

    #[test]
    fn splits_field_and_element_rules() {
        let constraint = Constraint::parse("ports", "required,dive,gt=5,lt=200").expect("parses");
        assert_eq!(constraint.field, vec![call("required", None)]);
        assert_eq!(
            constraint.elements,
            Some(vec![call("gt", Some("5")), call("lt", Some("200"))])
        );
    }

    #[test]
    fn keeps_equals_inside_parameters() {
        let constraint = Constraint::parse("name", "regex=^a=b$").expect("parses");
        assert_eq!(constraint.field, vec![call("regex", Some("^a=b$"))]);
    }

    #[test]
    fn rejects_empty_rules_and_double_dive() {
        assert!(Constraint::parse("x", "required,,gt=1").is_err());
        assert!(Constraint::parse("x", "dive,dive").is_err());
    }
}
