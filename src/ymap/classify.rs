use std::borrow::Cow;

use crate::scene::{
    CarGeneratorProperties, EntityProperties, ModelOccluderProperties, SceneNode, SollumType,
};
use crate::validation::rules::{malformed_node, validate_group_member};
use crate::validation::{ExportIssue, IssueCategory};

/// Kinds of content a map root groups its children by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Entity,
    BoxOccluder,
    ModelOccluder,
    CarGenerator,
    Grass,
}

impl ContentKind {
    /// Kind of content held by a group node, if it is a group at all.
    pub fn from_group(sollum_type: SollumType) -> Option<ContentKind> {
        match sollum_type {
            SollumType::YmapEntityGroup => Some(ContentKind::Entity),
            SollumType::YmapBoxOccluderGroup => Some(ContentKind::BoxOccluder),
            SollumType::YmapModelOccluderGroup => Some(ContentKind::ModelOccluder),
            SollumType::YmapCarGeneratorGroup => Some(ContentKind::CarGenerator),
            SollumType::YmapGrassInstancedData => Some(ContentKind::Grass),
            _ => None,
        }
    }

    /// Classification every member of this kind's group must carry.
    /// Grass batches are not exported member by member.
    pub fn member_type(&self) -> Option<SollumType> {
        match self {
            ContentKind::Entity => Some(SollumType::Drawable),
            ContentKind::BoxOccluder => Some(SollumType::YmapBoxOccluder),
            ContentKind::ModelOccluder => Some(SollumType::YmapModelOccluder),
            ContentKind::CarGenerator => Some(SollumType::YmapCarGenerator),
            ContentKind::Grass => None,
        }
    }

    pub fn category(&self) -> IssueCategory {
        match self {
            ContentKind::Entity => IssueCategory::Entity,
            ContentKind::BoxOccluder => IssueCategory::BoxOccluder,
            ContentKind::ModelOccluder => IssueCategory::ModelOccluder,
            ContentKind::CarGenerator => IssueCategory::CarGenerator,
            ContentKind::Grass => IssueCategory::Map,
        }
    }
}

/// A group member that passed classification, with its property block
/// resolved once.
#[derive(Debug, Clone)]
pub enum ClassifiedNode<'a> {
    Entity {
        node: &'a SceneNode,
        props: Cow<'a, EntityProperties>,
    },
    BoxOccluder {
        node: &'a SceneNode,
    },
    ModelOccluder {
        node: &'a SceneNode,
        props: Cow<'a, ModelOccluderProperties>,
    },
    CarGenerator {
        node: &'a SceneNode,
        props: Cow<'a, CarGeneratorProperties>,
    },
}

/// Decide whether `node` belongs in a group of `kind`.
///
/// A mismatch is returned as the issue to report; the caller skips the node
/// and carries on with its siblings.
pub fn classify_member(kind: ContentKind, node: &SceneNode) -> Result<ClassifiedNode<'_>, ExportIssue> {
    if let Some(expected) = kind.member_type() {
        if let Some(issue) = validate_group_member(node, expected, kind.category()) {
            return Err(issue);
        }
    }

    Ok(match kind {
        ContentKind::Entity => ClassifiedNode::Entity {
            node,
            props: node.entity_properties(),
        },
        ContentKind::BoxOccluder => ClassifiedNode::BoxOccluder { node },
        ContentKind::ModelOccluder => ClassifiedNode::ModelOccluder {
            node,
            props: node.model_occluder_properties(),
        },
        ContentKind::CarGenerator => ClassifiedNode::CarGenerator {
            node,
            props: node.car_generator_properties(),
        },
        ContentKind::Grass => {
            return Err(malformed_node(
                node,
                kind.category(),
                "grass batches are not exported",
            ))
        }
    })
}
