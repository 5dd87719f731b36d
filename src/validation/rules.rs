use super::limits::*;
use super::report::*;
use crate::scene::{SceneNode, SollumType};

/// Check that a group member has the classification its group expects.
pub fn validate_group_member(
    node: &SceneNode,
    expected: SollumType,
    category: IssueCategory,
) -> Option<ExportIssue> {
    if node.sollum_type == expected {
        return None;
    }

    let code = match node.sollum_type {
        SollumType::None | SollumType::Unknown => IssueCode::UnclassifiedNode,
        _ => IssueCode::ChildTypeMismatch,
    };

    Some(ExportIssue {
        code,
        object: node.name.clone(),
        message: format!(
            "Object {} will be skipped because it is not a {} type.",
            node.name,
            expected.ui_name()
        ),
        severity: IssueSeverity::Warning,
        category,
    })
}

/// Validate a model occluder's vertex count against the engine limit.
pub fn validate_occluder_vertex_count(node: &SceneNode) -> Option<ExportIssue> {
    if node.vertex_count() > MAX_OCCLUDER_VERTICES {
        Some(ExportIssue {
            code: IssueCode::OccluderVertexLimit,
            object: node.name.clone(),
            message: format!(
                "Object {} has too many vertices and will be skipped. It can not have more than {} vertices.",
                node.name, MAX_OCCLUDER_VERTICES
            ),
            severity: IssueSeverity::Warning,
            category: IssueCategory::ModelOccluder,
        })
    } else {
        None
    }
}

/// A node whose data could not be converted into a record.
pub fn malformed_node(node: &SceneNode, category: IssueCategory, reason: &str) -> ExportIssue {
    ExportIssue {
        code: IssueCode::MalformedNode,
        object: node.name.clone(),
        message: format!("Object {} will be skipped: {}", node.name, reason),
        severity: IssueSeverity::Warning,
        category,
    }
}

/// A group that is recognised but whose content is not written.
pub fn group_not_exported(map: &SceneNode, group: &SceneNode) -> ExportIssue {
    ExportIssue {
        code: IssueCode::GroupNotExported,
        object: group.name.clone(),
        message: format!(
            "Group {} ({}) in map {} is not exported.",
            group.name,
            group.sollum_type.ui_name(),
            map.name
        ),
        severity: IssueSeverity::Info,
        category: IssueCategory::Map,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Mesh;

    fn occluder_with_vertices(count: usize) -> SceneNode {
        let mut node = SceneNode::new("occl", SollumType::YmapModelOccluder);
        node.mesh = Some(Mesh {
            vertices: vec![[0.0; 3]; count],
            polygons: vec![],
        });
        node
    }

    #[test]
    fn matching_member_passes() {
        let node = SceneNode::new("prop", SollumType::Drawable);
        assert!(validate_group_member(&node, SollumType::Drawable, IssueCategory::Entity).is_none());
    }

    #[test]
    fn wrong_member_is_named_in_warning() {
        let node = SceneNode::new("Cube.001", SollumType::YmapBoxOccluder);
        let item =
            validate_group_member(&node, SollumType::Drawable, IssueCategory::Entity).unwrap();
        assert_eq!(item.code, IssueCode::ChildTypeMismatch);
        assert_eq!(item.object, "Cube.001");
        assert_eq!(
            item.message,
            "Object Cube.001 will be skipped because it is not a Drawable type."
        );
    }

    #[test]
    fn unclassified_member_gets_its_own_code() {
        let node = SceneNode::new("Empty", SollumType::None);
        let item = validate_group_member(
            &node,
            SollumType::YmapCarGenerator,
            IssueCategory::CarGenerator,
        )
        .unwrap();
        assert_eq!(item.code, IssueCode::UnclassifiedNode);
        assert_eq!(item.severity, IssueSeverity::Warning);
    }

    #[test]
    fn skipped_group_is_informational() {
        let map = SceneNode::new("hills", SollumType::Ymap);
        let grass = SceneNode::new("Grass", SollumType::YmapGrassInstancedData);
        let item = group_not_exported(&map, &grass);
        assert_eq!(item.code, IssueCode::GroupNotExported);
        assert_eq!(item.severity, IssueSeverity::Info);
        assert_eq!(item.object, "Grass");
    }

    #[test]
    fn vertex_ceiling_is_inclusive() {
        assert!(validate_occluder_vertex_count(&occluder_with_vertices(256)).is_none());
        let item = validate_occluder_vertex_count(&occluder_with_vertices(257)).unwrap();
        assert_eq!(item.code, IssueCode::OccluderVertexLimit);
    }
}
