use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Error,
    Warning,
}

/// Category of a validation finding, mirroring the constraint facets the
/// schema can declare plus the structural categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IssueKind {
    Required,
    Type,
    Pattern,
    MinLength,
    MaxLength,
    MinInclusive,
    MaxInclusive,
    MinExclusive,
    MaxExclusive,
    Enumeration,
    Cardinality,
    Unexpected,
    Ordering,
}

impl IssueKind {
    /// Stable machine-readable code for downstream reporting.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Required => "REQUIRED",
            Self::Type => "TYPE_MISMATCH",
            Self::Pattern => "PATTERN",
            Self::MinLength => "MIN_LENGTH",
            Self::MaxLength => "MAX_LENGTH",
            Self::MinInclusive => "MIN_INCLUSIVE",
            Self::MaxInclusive => "MAX_INCLUSIVE",
            Self::MinExclusive => "MIN_EXCLUSIVE",
            Self::MaxExclusive => "MAX_EXCLUSIVE",
            Self::Enumeration => "ENUMERATION",
            Self::Cardinality => "CARDINALITY",
            Self::Unexpected => "UNEXPECTED",
            Self::Ordering => "ORDERING",
        }
    }
}

/// A single validation finding against one element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Severity level.
    pub severity: IssueSeverity,
    /// Finding category.
    pub kind: IssueKind,
    /// Schema path of the element the value was checked against.
    pub element_path: String,
    /// Human-readable message describing the issue.
    pub message: String,
    /// Stable code (e.g. "PATTERN").
    pub code: String,
    /// The offending value, if there was one.
    pub actual_value: Option<String>,
    /// The violated constraint, rendered for display (e.g. "maxLength=8").
    pub constraint: Option<String>,
    /// Zero-based source row, for batch validation.
    pub row_index: Option<usize>,
    /// Source CSV column the value came from.
    pub source_field: Option<String>,
}

impl ValidationIssue {
    /// Creates an error-severity issue with the given kind, path and message.
    #[must_use]
    pub fn error(kind: IssueKind, element_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Error,
            kind,
            element_path: element_path.into(),
            message: message.into(),
            code: kind.code().to_string(),
            actual_value: None,
            constraint: None,
            row_index: None,
            source_field: None,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.actual_value = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraint = Some(constraint.into());
        self
    }

    #[must_use]
    pub fn at_row(mut self, row_index: usize) -> Self {
        self.row_index = Some(row_index);
        self
    }

    #[must_use]
    pub fn from_field(mut self, field: impl Into<String>) -> Self {
        self.source_field = Some(field.into());
        self
    }
}

/// Aggregated findings from a validation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
    /// Number of rows inspected, for batch runs.
    pub rows_checked: usize,
}

impl ValidationReport {
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == IssueSeverity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == IssueSeverity::Warning)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Issues attributed to one source row.
    pub fn issues_for_row(&self, row_index: usize) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(move |issue| issue.row_index == Some(row_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_builder_sets_code_from_kind() {
        let issue = ValidationIssue::error(IssueKind::MaxLength, "Message.Learner.FamilyName", "too long")
            .with_value("ABCDEFGHIJK")
            .with_constraint("maxLength=100");
        assert_eq!(issue.code, "MAX_LENGTH");
        assert_eq!(issue.actual_value.as_deref(), Some("ABCDEFGHIJK"));
    }

    #[test]
    fn report_counts_by_severity() {
        let mut report = ValidationReport::default();
        report
            .issues
            .push(ValidationIssue::error(IssueKind::Required, "A", "missing"));
        let mut warning = ValidationIssue::error(IssueKind::Cardinality, "B", "extra");
        warning.severity = IssueSeverity::Warning;
        report.issues.push(warning);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 1);
        assert!(report.has_errors());
    }

    #[test]
    fn issues_for_row_filters_by_index() {
        let mut report = ValidationReport::default();
        report
            .issues
            .push(ValidationIssue::error(IssueKind::Required, "A", "missing").at_row(3));
        report
            .issues
            .push(ValidationIssue::error(IssueKind::Pattern, "B", "bad").at_row(7));
        assert_eq!(report.issues_for_row(3).count(), 1);
        assert_eq!(report.issues_for_row(4).count(), 0);
    }
}
