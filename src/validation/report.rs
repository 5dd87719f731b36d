use serde::{Deserialize, Serialize};

/// Severity level for an export issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    /// A node was skipped.
    Warning,
    /// Content that is recognised but deliberately not exported.
    Info,
}

/// Which part of the map an issue belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    Entity,
    BoxOccluder,
    ModelOccluder,
    CarGenerator,
    Map,
}

/// Machine-readable reason a node was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    /// A group member has the wrong classification.
    ChildTypeMismatch,
    /// A group member carries no classification at all.
    UnclassifiedNode,
    /// A model occluder mesh exceeds the vertex ceiling.
    OccluderVertexLimit,
    /// A node's data could not be turned into a record.
    MalformedNode,
    /// A recognised group whose content this exporter does not write.
    GroupNotExported,
}

/// A single export finding. Every finding names the object it concerns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportIssue {
    pub code: IssueCode,
    /// Name of the offending scene object.
    pub object: String,
    /// Human-readable description.
    pub message: String,
    pub severity: IssueSeverity,
    pub category: IssueCategory,
}

/// Everything that was recovered from locally during one export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportReport {
    pub items: Vec<ExportIssue>,
    pub warning_count: u32,
    pub info_count: u32,
}

impl ExportReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an issue and update counts.
    pub fn add(&mut self, item: ExportIssue) {
        match item.severity {
            IssueSeverity::Warning => self.warning_count += 1,
            IssueSeverity::Info => self.info_count += 1,
        }
        self.items.push(item);
    }

    /// Merge another report into this one, keeping item order.
    pub fn merge(&mut self, other: ExportReport) {
        for item in other.items {
            self.add(item);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ExportIssue> {
        self.items
            .iter()
            .filter(|i| i.severity == IssueSeverity::Warning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(severity: IssueSeverity) -> ExportIssue {
        ExportIssue {
            code: IssueCode::ChildTypeMismatch,
            object: "Cube".to_string(),
            message: "skipped".to_string(),
            severity,
            category: IssueCategory::Entity,
        }
    }

    #[test]
    fn add_updates_counts() {
        let mut report = ExportReport::new();
        assert!(report.is_empty());
        report.add(issue(IssueSeverity::Warning));
        report.add(issue(IssueSeverity::Info));
        assert_eq!(report.warning_count, 1);
        assert_eq!(report.info_count, 1);
        assert_eq!(report.warnings().count(), 1);
    }

    #[test]
    fn merge_keeps_order() {
        let mut a = ExportReport::new();
        a.add(issue(IssueSeverity::Warning));
        let mut b = ExportReport::new();
        let mut second = issue(IssueSeverity::Info);
        second.object = "Plane".to_string();
        b.add(second);
        b.add(issue(IssueSeverity::Warning));

        a.merge(b);
        assert_eq!(a.items.len(), 3);
        assert_eq!(a.items[1].object, "Plane");
        assert_eq!((a.warning_count, a.info_count), (2, 1));
    }

    #[test]
    fn codes_serialize_screaming() {
        let json = serde_json::to_string(&IssueCode::OccluderVertexLimit).unwrap();
        assert_eq!(json, "\"OCCLUDER_VERTEX_LIMIT\"");
    }
}
