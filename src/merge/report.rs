//! Merge diagnostics.
//!
//! None of these issues stop a merge. They exist so that a row silently
//! written with an empty derived value can be told apart from a region that
//! genuinely has no partner.

use std::fmt;

use serde::Serialize;

/// Summary of one merge.
#[derive(Clone, Debug, Default, Serialize)]
pub struct MergeReport {
    /// The table that was merged.
    pub source: String,
    /// Name of the appended column.
    pub derived_field: String,
    /// Number of data rows.
    pub rows: usize,
    /// Rows whose key was found in the correspondence view.
    pub matched: usize,
    /// All issues found during the merge.
    pub issues: Vec<MergeIssue>,
}

impl MergeReport {
    /// Creates an empty report for a table.
    pub fn new(source: impl Into<String>, derived_field: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            derived_field: derived_field.into(),
            ..Default::default()
        }
    }

    /// Adds an issue to the report.
    pub fn add(&mut self, issue: MergeIssue) {
        self.issues.push(issue);
    }

    /// Returns the number of issues with the given code.
    pub fn count(&self, code: MergeIssueCode) -> usize {
        self.issues.iter().filter(|i| i.code == code).count()
    }

    /// Rows whose key has no correspondence entry.
    pub fn missing_count(&self) -> usize {
        self.count(MergeIssueCode::MissingCorrespondence)
    }

    /// Correspondence entries with no row.
    pub fn unmatched_count(&self) -> usize {
        self.count(MergeIssueCode::UnmatchedCorrespondence)
    }

    /// Returns true if there are no issues at all.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

impl fmt::Display for MergeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {} row(s), {} matched, '{}' appended",
            self.source, self.rows, self.matched, self.derived_field
        )?;

        if self.issues.is_empty() {
            return Ok(());
        }

        writeln!(f, "  {} diagnostic(s):", self.issues.len())?;
        for issue in &self.issues {
            writeln!(f, "    {}", issue)?;
        }
        Ok(())
    }
}

/// A single merge diagnostic.
#[derive(Clone, Debug, Serialize)]
pub struct MergeIssue {
    pub code: MergeIssueCode,
    pub message: String,
    pub context: MergeContext,
}

impl MergeIssue {
    pub fn new(code: MergeIssueCode, message: impl Into<String>, context: MergeContext) -> Self {
        Self {
            code,
            message: message.into(),
            context,
        }
    }
}

impl fmt::Display for MergeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[WARN ] {:?} in {}: {}", self.code, self.context, self.message)
    }
}

/// A stable code identifying the kind of merge diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum MergeIssueCode {
    /// A row's key has no entry in the correspondence.
    MissingCorrespondence,
    /// A correspondence entry matches no row.
    UnmatchedCorrespondence,
    /// A row has more values than the header has fields.
    RaggedRow,
    /// The derived field name already exists in the header.
    DuplicateField,
}

/// Where a merge diagnostic occurred.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MergeContext {
    /// The table header.
    Header,
    /// A data row (zero-based) and its raw key.
    Row { index: usize, key: String },
    /// A correspondence label.
    Label { label: String },
}

impl fmt::Display for MergeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeContext::Header => write!(f, "header"),
            MergeContext::Row { index, key } => write!(f, "row {} ('{}')", index + 1, key),
            MergeContext::Label { label } => write!(f, "label '{}'", label),
        }
    }
}
