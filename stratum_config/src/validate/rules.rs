//! Rule registry and the builtin rules.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use regex::Regex;

use crate::types::{FieldValue, ValueError, parse_duration};

/// Input handed to a rule.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Name reported in messages, such as `port` or `ports[2]`.
    pub field: &'a str,
    /// Value under test.
    pub value: &'a FieldValue,
    /// Parameter after `=`, if any.
    pub param: Option<&'a str>,
}

impl RuleContext<'_> {
    /// Parameter, or an error naming the rule when it is missing.
    ///
    /// # Errors
    ///
    /// Returns a [`ValueError`] when the rule was written without `=`.
    pub fn require_param(&self, rule: &str) -> Result<&str, ValueError> {
        self.param
            .ok_or_else(|| ValueError::new(format!("rule {rule} requires a parameter")))
    }
}

/// Result of applying a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    /// The value satisfies the rule.
    Pass,
    /// The value violates the rule; the message is reported verbatim.
    Fail(String),
}

type RuleFn = dyn Fn(&RuleContext<'_>) -> Result<RuleOutcome, ValueError> + Send + Sync;

/// Named validation rules.
///
/// [`Validator::new`] installs `required`, `not_blank`, `gt`, `gte`, `lt`,
/// `lte`, `min`, `max`, `len`, `oneof`, `regex`, `url`, `file`, `dir`,
/// `starts_with`, `ends_with`, `alpha` and `alphanum`. `omitempty` and
/// `dive` are part of the expression syntax rather than rules.
///
/// ```
/// use stratum_config::{RuleOutcome, Validator};
///
/// let mut validator = Validator::new();
/// validator.register("even", |ctx| {
///     Ok(match ctx.value.display_text().parse::<i64>() {
///         Ok(n) if n % 2 == 0 => RuleOutcome::Pass,
///         _ => RuleOutcome::Fail(format!("{} must be even", ctx.field)),
///     })
/// });
/// assert!(validator.has_rule("even"));
/// ```
#[derive(Clone)]
pub struct Validator {
    rules: HashMap<String, Arc<RuleFn>>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Validator").field("rules", &names).finish()
    }
}

impl Validator {
    /// Validator with the builtin rules.
    #[must_use]
    pub fn new() -> Self {
        let mut validator = Self::empty();
        install_builtin(&mut validator);
        validator
    }

    /// Validator with no rules.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Add or replace the rule called `name`.
    pub fn register<F>(&mut self, name: &str, rule: F) -> &mut Self
    where
        F: Fn(&RuleContext<'_>) -> Result<RuleOutcome, ValueError> + Send + Sync + 'static,
    {
        self.rules.insert(name.to_owned(), Arc::new(rule));
        self
    }

    /// Returns `true` when a rule called `name` exists.
    #[must_use]
    pub fn has_rule(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub(crate) fn rule(&self, name: &str) -> Option<&RuleFn> {
        self.rules.get(name).map(Arc::as_ref)
    }
}

/// What a numeric rule compares against.
enum Measure {
    Number(f64),
    Chars(usize),
    Items(usize),
    Span(Duration),
}

impl Measure {
    #[expect(clippy::cast_precision_loss, reason = "bounds compare at f64 precision")]
    fn of(value: &FieldValue) -> Option<Self> {
        Some(match value {
            FieldValue::Integer(i) => Self::Number(*i as f64),
            FieldValue::Float(f) => Self::Number(*f),
            FieldValue::Text(s) => Self::Chars(s.chars().count()),
            FieldValue::List(items) => Self::Items(items.len()),
            FieldValue::Map(entries) => Self::Items(entries.len()),
            FieldValue::Duration(d) => Self::Span(*d),
            FieldValue::Absent | FieldValue::Bool(_) => return None,
        })
    }

    /// Compare against the rule parameter.
    #[expect(clippy::cast_precision_loss, reason = "lengths stay far below 2^52")]
    fn compare(&self, param: &str) -> Result<std::cmp::Ordering, ValueError> {
        let number = || {
            param
                .parse::<f64>()
                .map_err(|_| ValueError::new(format!("{param:?} is not a number")))
        };
        let ordering = match self {
            Self::Number(n) => n.partial_cmp(&number()?),
            Self::Chars(n) | Self::Items(n) => (*n as f64).partial_cmp(&number()?),
            Self::Span(d) => Some(d.cmp(&parse_duration(param)?)),
        };
        ordering.ok_or_else(|| ValueError::new("value is not comparable"))
    }
}

fn plural(param: &str, one: &str, many: &str) -> String {
    if param == "1" {
        one.to_owned()
    } else {
        many.to_owned()
    }
}

#[derive(Clone, Copy)]
enum Bound {
    Gt,
    Gte,
    Lt,
    Lte,
    Eq,
}

impl Bound {
    const fn accepts(self, ordering: std::cmp::Ordering) -> bool {
        match self {
            Self::Gt => ordering.is_gt(),
            Self::Gte => ordering.is_ge(),
            Self::Lt => ordering.is_lt(),
            Self::Lte => ordering.is_le(),
            Self::Eq => ordering.is_eq(),
        }
    }

    fn message(self, field: &str, param: &str, measure: &Measure) -> String {
        let chars = plural(param, "character", "characters");
        let items = plural(param, "item", "items");
        match (self, measure) {
            (Self::Gt, Measure::Chars(_)) => {
                format!("{field} must be greater than {param} {chars} in length")
            }
            (Self::Gt, Measure::Items(_)) => format!("{field} must contain more than {param} {items}"),
            (Self::Gt, _) => format!("{field} must be greater than {param}"),
            (Self::Gte, Measure::Chars(_)) => {
                format!("{field} must be at least {param} {chars} in length")
            }
            (Self::Gte, Measure::Items(_)) => format!("{field} must contain at least {param} {items}"),
            (Self::Gte, _) => format!("{field} must be {param} or greater"),
            (Self::Lt, Measure::Chars(_)) => {
                format!("{field} must be less than {param} {chars} in length")
            }
            (Self::Lt, Measure::Items(_)) => format!("{field} must contain less than {param} {items}"),
            (Self::Lt, _) => format!("{field} must be less than {param}"),
            (Self::Lte, Measure::Chars(_)) => {
                format!("{field} must be at maximum {param} {chars} in length")
            }
            (Self::Lte, Measure::Items(_)) => {
                format!("{field} must contain at maximum {param} {items}")
            }
            (Self::Lte, _) => format!("{field} must be {param} or less"),
            (Self::Eq, Measure::Chars(_)) => format!("{field} must be {param} {chars} in length"),
            (Self::Eq, Measure::Items(_)) => format!("{field} must contain {param} {items}"),
            (Self::Eq, _) => format!("{field} must be equal to {param}"),
        }
    }
}

fn bound_rule(
    name: &'static str,
    bound: Bound,
) -> impl Fn(&RuleContext<'_>) -> Result<RuleOutcome, ValueError> + Send + Sync + 'static {
    move |ctx: &RuleContext<'_>| {
        let param = ctx.require_param(name)?;
        if matches!(ctx.value, FieldValue::Absent) {
            return Ok(RuleOutcome::Pass);
        }
        let measure = Measure::of(ctx.value)
            .ok_or_else(|| ValueError::new(format!("rule {name} does not apply to this type")))?;
        Ok(if bound.accepts(measure.compare(param)?) {
            RuleOutcome::Pass
        } else {
            RuleOutcome::Fail(bound.message(ctx.field, param, &measure))
        })
    }
}

/// Apply `check` to text values; absent values pass and other shapes are
/// a misuse of the rule.
fn text_rule<F>(
    name: &'static str,
    check: F,
) -> impl Fn(&RuleContext<'_>) -> Result<RuleOutcome, ValueError> + Send + Sync + 'static
where
    F: Fn(&RuleContext<'_>, &str) -> Result<RuleOutcome, ValueError> + Send + Sync + 'static,
{
    move |ctx: &RuleContext<'_>| match ctx.value {
        FieldValue::Absent => Ok(RuleOutcome::Pass),
        FieldValue::Text(text) => check(ctx, text),
        _ => Err(ValueError::new(format!("rule {name} applies only to text"))),
    }
}

fn outcome(pass: bool, message: impl FnOnce() -> String) -> RuleOutcome {
    if pass {
        RuleOutcome::Pass
    } else {
        RuleOutcome::Fail(message())
    }
}

fn install_builtin(validator: &mut Validator) {
    validator.register("required", |ctx| {
        Ok(outcome(!ctx.value.is_zero(), || format!("{} is required", ctx.field)))
    });
    validator.register("not_blank", |ctx| {
        let pass = match ctx.value {
            FieldValue::Text(text) => !text.trim().is_empty(),
            FieldValue::List(items) => !items.is_empty(),
            FieldValue::Map(entries) => !entries.is_empty(),
            FieldValue::Absent => false,
            _ => true,
        };
        Ok(outcome(pass, || {
            format!("{} must contain at least 1 non-whitespace character", ctx.field)
        }))
    });
    validator.register("gt", bound_rule("gt", Bound::Gt));
    validator.register("gte", bound_rule("gte", Bound::Gte));
    validator.register("min", bound_rule("min", Bound::Gte));
    validator.register("lt", bound_rule("lt", Bound::Lt));
    validator.register("lte", bound_rule("lte", Bound::Lte));
    validator.register("max", bound_rule("max", Bound::Lte));
    validator.register("len", bound_rule("len", Bound::Eq));
    validator.register("oneof", |ctx| {
        let param = ctx.require_param("oneof")?;
        if matches!(ctx.value, FieldValue::Absent) {
            return Ok(RuleOutcome::Pass);
        }
        let text = ctx.value.display_text();
        Ok(outcome(param.split_whitespace().any(|choice| choice == text), || {
            format!("{} must be one of [{param}]", ctx.field)
        }))
    });
    validator.register(
        "regex",
        text_rule("regex", |ctx, text| {
            let param = ctx.require_param("regex")?;
            let pattern = Regex::new(param)
                .map_err(|err| ValueError::new(format!("invalid pattern {param:?}: {err}")))?;
            Ok(outcome(pattern.is_match(text), || {
                format!("{} {text} does not match pattern {param}", ctx.field)
            }))
        }),
    );
    validator.register(
        "url",
        text_rule("url", |ctx, text| {
            Ok(outcome(url::Url::parse(text).is_ok(), || {
                format!("{} must be a valid URL", ctx.field)
            }))
        }),
    );
    validator.register(
        "file",
        text_rule("file", |ctx, text| {
            Ok(outcome(Path::new(text).is_file(), || {
                format!("{} {text} does not exist, is not a file, or is not accessible", ctx.field)
            }))
        }),
    );
    validator.register(
        "dir",
        text_rule("dir", |ctx, text| {
            Ok(outcome(Path::new(text).is_dir(), || {
                format!("{} {text} does not exist or is not a directory", ctx.field)
            }))
        }),
    );
    validator.register(
        "starts_with",
        text_rule("starts_with", |ctx, text| {
            let param = ctx.require_param("starts_with")?;
            Ok(outcome(text.starts_with(param), || {
                format!("{} must start with text '{param}'", ctx.field)
            }))
        }),
    );
    validator.register(
        "ends_with",
        text_rule("ends_with", |ctx, text| {
            let param = ctx.require_param("ends_with")?;
            Ok(outcome(text.ends_with(param), || {
                format!("{} must end with text '{param}'", ctx.field)
            }))
        }),
    );
    validator.register(
        "alpha",
        text_rule("alpha", |ctx, text| {
            let pass = !text.is_empty() && text.chars().all(|c| c.is_ascii_alphabetic());
            Ok(outcome(pass, || {
                format!("{} can only contain alphabetic characters", ctx.field)
            }))
        }),
    );
    validator.register(
        "alphanum",
        text_rule("alphanum", |ctx, text| {
            let pass = !text.is_empty() && text.chars().all(|c| c.is_ascii_alphanumeric());
            Ok(outcome(pass, || {
                format!("{} can only contain alphanumeric characters", ctx.field)
            }))
        }),
    );
}
