pub mod limits;
pub mod report;
pub mod rules;

pub use report::{ExportIssue, ExportReport, IssueCategory, IssueCode, IssueSeverity};
