//! Single-value validation against one schema element.
//!
//! Entirely data-driven from the registry: no field name is hardcoded, so
//! the same checks certify any schema version.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use tracing::warn;

use ilr_model::{IssueKind, ValidationIssue};
use ilr_schema::{BaseType, Constraints, SchemaElement};

/// Where the value came from, carried through onto every issue.
#[derive(Debug, Clone, Default)]
pub struct ValueContext {
    pub row_index: Option<usize>,
    pub source_field: Option<String>,
}

/// Runtime kind of a value that passed its type check, used to decide
/// which facet family applies.
enum TypedValue<'a> {
    Text(&'a str),
    Number(f64),
    Bool,
}

/// Validates one raw value against one element's recovered constraints.
///
/// `None`, empty, and whitespace-only are all "absent". An absent value on
/// a required element yields exactly one `Required` issue; on an optional
/// element, nothing. A type failure yields one `Type` issue and suppresses
/// facet checks, so constraints never run against a value of the wrong
/// shape. Every violated facet on a well-typed value is reported.
#[must_use]
pub fn validate_value(
    value: Option<&str>,
    element: &SchemaElement,
    ctx: &ValueContext,
) -> Vec<ValidationIssue> {
    let trimmed = value.map(str::trim).filter(|v| !v.is_empty());

    let Some(trimmed) = trimmed else {
        if element.is_required() {
            return vec![finish(
                ValidationIssue::error(
                    IssueKind::Required,
                    &element.path,
                    format!("{} is required but no value was supplied", element.name),
                ),
                ctx,
            )];
        }
        return Vec::new();
    };

    let typed = match check_type(trimmed, element.base_type) {
        Ok(typed) => typed,
        Err(()) => {
            return vec![finish(
                ValidationIssue::error(
                    IssueKind::Type,
                    &element.path,
                    format!(
                        "{} must be a valid {}, got {trimmed:?}",
                        element.name, element.base_type
                    ),
                )
                .with_value(trimmed)
                .with_constraint(format!("type={}", element.base_type)),
                ctx,
            )];
        }
    };

    let mut issues = Vec::new();
    match typed {
        TypedValue::Text(text) => check_string_facets(text, element, &mut issues),
        TypedValue::Number(number) => check_numeric_facets(trimmed, number, element, &mut issues),
        TypedValue::Bool => {}
    }
    issues.into_iter().map(|issue| finish(issue, ctx)).collect()
}

fn finish(mut issue: ValidationIssue, ctx: &ValueContext) -> ValidationIssue {
    issue.row_index = ctx.row_index;
    issue.source_field = ctx.source_field.clone();
    issue
}

/// Strict `YYYY-MM-DD` shape; chrono alone accepts unpadded components.
fn is_iso_date_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit())
}

fn check_type(trimmed: &str, base_type: BaseType) -> Result<TypedValue<'_>, ()> {
    match base_type {
        BaseType::String => Ok(TypedValue::Text(trimmed)),
        BaseType::Int | BaseType::Integer | BaseType::Long => {
            // The parse must round-trip to the exact input, rejecting
            // non-canonical numerals such as "007" or "+5".
            match trimmed.parse::<i64>() {
                Ok(parsed) if parsed.to_string() == trimmed => {
                    // i64 → f64 is lossy above 2^53; submission values are
                    // far below that.
                    #[allow(clippy::cast_precision_loss)]
                    Ok(TypedValue::Number(parsed as f64))
                }
                _ => Err(()),
            }
        }
        BaseType::Decimal => match trimmed.parse::<f64>() {
            Ok(parsed) if parsed.is_finite() => Ok(TypedValue::Number(parsed)),
            _ => Err(()),
        },
        BaseType::Boolean => {
            let lower = trimmed.to_ascii_lowercase();
            if matches!(lower.as_str(), "true" | "false" | "1" | "0") {
                Ok(TypedValue::Bool)
            } else {
                Err(())
            }
        }
        BaseType::Date => {
            if is_iso_date_shape(trimmed)
                && NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").is_ok()
            {
                Ok(TypedValue::Text(trimmed))
            } else {
                Err(())
            }
        }
        BaseType::DateTime => {
            let parseable = DateTime::parse_from_rfc3339(trimmed).is_ok()
                || NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S").is_ok()
                || NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S").is_ok();
            if parseable {
                Ok(TypedValue::Text(trimmed))
            } else {
                Err(())
            }
        }
    }
}

fn check_string_facets(text: &str, element: &SchemaElement, issues: &mut Vec<ValidationIssue>) {
    let Constraints {
        pattern,
        min_length,
        max_length,
        enumeration,
        ..
    } = &element.constraints;

    if let Some(pattern) = pattern {
        match Regex::new(&format!("^(?:{pattern})$")) {
            Ok(regex) => {
                if !regex.is_match(text) {
                    issues.push(
                        ValidationIssue::error(
                            IssueKind::Pattern,
                            &element.path,
                            format!("{} does not match the required pattern", element.name),
                        )
                        .with_value(text)
                        .with_constraint(format!("pattern={pattern}")),
                    );
                }
            }
            Err(err) => {
                warn!(pattern, %err, "unsupported pattern facet, skipping");
            }
        }
    }

    let length = text.chars().count();
    if let Some(min) = min_length {
        if length < *min {
            issues.push(
                ValidationIssue::error(
                    IssueKind::MinLength,
                    &element.path,
                    format!("{} is shorter than {min} characters", element.name),
                )
                .with_value(text)
                .with_constraint(format!("minLength={min}")),
            );
        }
    }
    if let Some(max) = max_length {
        if length > *max {
            issues.push(
                ValidationIssue::error(
                    IssueKind::MaxLength,
                    &element.path,
                    format!("{} is longer than {max} characters", element.name),
                )
                .with_value(text)
                .with_constraint(format!("maxLength={max}")),
            );
        }
    }

    if !enumeration.is_empty() && !enumeration.iter().any(|allowed| allowed == text) {
        issues.push(
            ValidationIssue::error(
                IssueKind::Enumeration,
                &element.path,
                format!("{} is not one of the allowed values", element.name),
            )
            .with_value(text)
            .with_constraint(format!("enumeration={}", enumeration.join("|"))),
        );
    }
}

fn check_numeric_facets(
    raw: &str,
    number: f64,
    element: &SchemaElement,
    issues: &mut Vec<ValidationIssue>,
) {
    let constraints = &element.constraints;
    let mut bound_issue = |kind: IssueKind, bound: f64, description: &str| {
        issues.push(
            ValidationIssue::error(
                kind,
                &element.path,
                format!("{} must be {description} {bound}", element.name),
            )
            .with_value(raw)
            .with_constraint(format!("{}={bound}", facet_name(kind))),
        );
    };

    if let Some(min) = constraints.min_inclusive {
        if number < min {
            bound_issue(IssueKind::MinInclusive, min, "at least");
        }
    }
    if let Some(max) = constraints.max_inclusive {
        if number > max {
            bound_issue(IssueKind::MaxInclusive, max, "at most");
        }
    }
    if let Some(min) = constraints.min_exclusive {
        if number <= min {
            bound_issue(IssueKind::MinExclusive, min, "greater than");
        }
    }
    if let Some(max) = constraints.max_exclusive {
        if number >= max {
            bound_issue(IssueKind::MaxExclusive, max, "less than");
        }
    }
}

fn facet_name(kind: IssueKind) -> &'static str {
    match kind {
        IssueKind::MinInclusive => "minInclusive",
        IssueKind::MaxInclusive => "maxInclusive",
        IssueKind::MinExclusive => "minExclusive",
        IssueKind::MaxExclusive => "maxExclusive",
        _ => "constraint",
    }
}
