//! Read-only snapshot of the editor scene that a map export walks.
//!
//! The editor owns the live object graph; exports operate on an owned
//! `SceneNode` tree captured from it (or loaded from a JSON snapshot).

pub mod mesh;
pub mod names;
pub mod tree;

use std::borrow::Cow;
use std::path::Path;

use cgmath::{Matrix4, SquareMatrix, Vector3};
use serde::{Deserialize, Serialize};

use crate::math::{bound_box, box_corners, transform_point, trs_matrix};
use crate::ymap::{EntityType, LodLevel, PriorityLevel};

pub use mesh::{FanTriangulator, Mesh, Triangulator};

/// Classification tag stored on every scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SollumType {
    #[default]
    None,
    Ymap,
    YmapEntityGroup,
    Drawable,
    DrawableModel,
    DrawableGeometry,
    Fragment,
    YmapBoxOccluderGroup,
    YmapBoxOccluder,
    YmapModelOccluderGroup,
    YmapModelOccluder,
    YmapCarGeneratorGroup,
    YmapCarGenerator,
    YmapGrassInstancedData,
    /// Any tag this exporter does not know about.
    #[serde(other)]
    Unknown,
}

impl SollumType {
    /// Label shown to users in warnings.
    pub fn ui_name(&self) -> &'static str {
        match self {
            SollumType::None => "None",
            SollumType::Ymap => "Ymap",
            SollumType::YmapEntityGroup => "Entities",
            SollumType::Drawable => "Drawable",
            SollumType::DrawableModel => "Drawable Model",
            SollumType::DrawableGeometry => "Drawable Geometry",
            SollumType::Fragment => "Fragment",
            SollumType::YmapBoxOccluderGroup => "Box Occluders",
            SollumType::YmapBoxOccluder => "Box Occluder",
            SollumType::YmapModelOccluderGroup => "Model Occluders",
            SollumType::YmapModelOccluder => "Model Occluder",
            SollumType::YmapCarGeneratorGroup => "Car Generators",
            SollumType::YmapCarGenerator => "Car Generator",
            SollumType::YmapGrassInstancedData => "Grass",
            SollumType::Unknown => "Unknown",
        }
    }
}

/// Local transform. Rotation is an XYZ Euler triple in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub location: [f32; 3],
    pub rotation_euler: [f32; 3],
    pub scale: [f32; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            location: [0.0; 3],
            rotation_euler: [0.0; 3],
            scale: [1.0; 3],
        }
    }
}

impl Transform {
    pub fn matrix(&self) -> Matrix4<f32> {
        trs_matrix(self.location, self.rotation_euler, self.scale)
    }

    pub fn location(&self) -> Vector3<f32> {
        Vector3::from(self.location)
    }
}

// ============================================================================
// Per-kind property blocks
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockProperties {
    pub version: u32,
    pub flags: u32,
    pub name: String,
    pub exported_by: String,
    pub owner: String,
    pub time: String,
}

impl Default for BlockProperties {
    fn default() -> Self {
        Self {
            version: 0,
            flags: 0,
            name: String::new(),
            exported_by: "Sollumz".to_string(),
            owner: String::new(),
            time: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapProperties {
    pub parent: String,
    pub script_loaded: bool,
    pub block: BlockProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityProperties {
    pub entity_type: EntityType,
    pub flags: u32,
    pub guid: u32,
    pub parent_index: i32,
    pub lod_dist: f32,
    pub child_lod_dist: f32,
    pub lod_level: LodLevel,
    pub num_children: u32,
    pub priority_level: PriorityLevel,
    pub ambient_occlusion_multiplier: i32,
    pub artificial_ambient_occlusion: i32,
    pub tint_value: i32,
}

impl Default for EntityProperties {
    fn default() -> Self {
        Self {
            entity_type: EntityType::default(),
            flags: 0,
            guid: 0,
            parent_index: -1,
            lod_dist: 0.0,
            child_lod_dist: 0.0,
            lod_level: LodLevel::default(),
            num_children: 0,
            priority_level: PriorityLevel::default(),
            ambient_occlusion_multiplier: 255,
            artificial_ambient_occlusion: 255,
            tint_value: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelOccluderProperties {
    pub flags: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarGeneratorProperties {
    pub car_model: String,
    pub flags: u32,
    pub pop_group: String,
    pub perpendicular_length: f32,
    pub body_color_remap_1: i32,
    pub body_color_remap_2: i32,
    pub body_color_remap_3: i32,
    pub body_color_remap_4: i32,
    pub livery: i32,
}

impl Default for CarGeneratorProperties {
    fn default() -> Self {
        Self {
            car_model: "panto".to_string(),
            flags: 0,
            pop_group: String::new(),
            perpendicular_length: 2.3,
            body_color_remap_1: -1,
            body_color_remap_2: -1,
            body_color_remap_3: -1,
            body_color_remap_4: -1,
            livery: -1,
        }
    }
}

/// Kind-specific properties. Only the block matching the node's
/// classification is ever read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeProperties {
    #[default]
    None,
    Map(MapProperties),
    Entity(EntityProperties),
    ModelOccluder(ModelOccluderProperties),
    CarGenerator(CarGeneratorProperties),
}

// ============================================================================
// Scene node
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub name: String,
    #[serde(default)]
    pub sollum_type: SollumType,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default)]
    pub mesh: Option<Mesh>,
    #[serde(default)]
    pub properties: NodeProperties,
    #[serde(default)]
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>, sollum_type: SollumType) -> Self {
        Self {
            name: name.into(),
            sollum_type,
            ..Default::default()
        }
    }

    pub fn map_properties(&self) -> Cow<'_, MapProperties> {
        match &self.properties {
            NodeProperties::Map(p) => Cow::Borrowed(p),
            _ => Cow::Owned(MapProperties::default()),
        }
    }

    pub fn entity_properties(&self) -> Cow<'_, EntityProperties> {
        match &self.properties {
            NodeProperties::Entity(p) => Cow::Borrowed(p),
            _ => Cow::Owned(EntityProperties::default()),
        }
    }

    pub fn model_occluder_properties(&self) -> Cow<'_, ModelOccluderProperties> {
        match &self.properties {
            NodeProperties::ModelOccluder(p) => Cow::Borrowed(p),
            _ => Cow::Owned(ModelOccluderProperties::default()),
        }
    }

    pub fn car_generator_properties(&self) -> Cow<'_, CarGeneratorProperties> {
        match &self.properties {
            NodeProperties::CarGenerator(p) => Cow::Borrowed(p),
            _ => Cow::Owned(CarGeneratorProperties::default()),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.as_ref().map_or(0, |m| m.vertices.len())
    }

    /// Bounds of the mesh in local space, `None` for mesh-less nodes.
    pub fn local_bound_box(&self) -> Option<(Vector3<f32>, Vector3<f32>)> {
        self.mesh
            .as_ref()
            .and_then(|m| bound_box(m.vertices.iter().map(|&v| Vector3::from(v))))
    }

    /// Local bound size multiplied by the node's scale.
    pub fn dimensions(&self) -> Vector3<f32> {
        let scale = self.transform.scale;
        match self.local_bound_box() {
            Some((min, max)) => {
                let size = max - min;
                Vector3::new(size.x * scale[0], size.y * scale[1], size.z * scale[2])
            }
            None => Vector3::new(0.0, 0.0, 0.0),
        }
    }

    /// World-space box of the transformed local bound box corners.
    pub fn world_bound_box(&self, world: &Matrix4<f32>) -> Option<(Vector3<f32>, Vector3<f32>)> {
        let (min, max) = self.local_bound_box()?;
        bound_box(box_corners(min, max).iter().map(|&c| transform_point(world, c)))
    }

    /// World-space bounds of this node and every mesh-bearing descendant.
    pub fn combined_world_bound_box(
        &self,
        world: &Matrix4<f32>,
    ) -> Option<(Vector3<f32>, Vector3<f32>)> {
        self.children.iter().fold(self.world_bound_box(world), |acc, child| {
            let child_world = *world * child.transform.matrix();
            crate::math::union_box(acc, child.combined_world_bound_box(&child_world))
        })
    }
}

/// World matrix of a node whose parent sits at `parent_world`.
pub fn world_matrix(parent_world: &Matrix4<f32>, node: &SceneNode) -> Matrix4<f32> {
    *parent_world * node.transform.matrix()
}

pub fn identity() -> Matrix4<f32> {
    Matrix4::identity()
}

/// Load a scene snapshot from a JSON file.
pub fn load_snapshot(path: &Path) -> crate::ymap::Result<SceneNode> {
    let data = std::fs::read_to_string(path)?;
    parse_snapshot(&data)
}

pub fn parse_snapshot(json: &str) -> crate::ymap::Result<SceneNode> {
    serde_json::from_str(json).map_err(|e| crate::ymap::MapExportError::Snapshot(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(half: f32) -> Mesh {
        Mesh::cuboid(Vector3::new(-half, -half, -half), Vector3::new(half, half, half))
    }

    #[test]
    fn snapshot_defaults_fill_missing_fields() {
        let node = parse_snapshot(
            r#"{
                "name": "cargen",
                "sollum_type": "ymap_car_generator",
                "properties": { "car_generator": { "car_model": "blista" } }
            }"#,
        )
        .unwrap();

        assert_eq!(node.sollum_type, SollumType::YmapCarGenerator);
        assert_eq!(node.transform.scale, [1.0; 3]);
        let props = node.car_generator_properties();
        assert_eq!(props.car_model, "blista");
        assert_eq!(props.livery, -1);
        assert!((props.perpendicular_length - 2.3).abs() < 1e-6);
    }

    #[test]
    fn unknown_tag_deserializes_as_unknown() {
        let node = parse_snapshot(r#"{ "name": "light", "sollum_type": "sollumz_light" }"#).unwrap();
        assert_eq!(node.sollum_type, SollumType::Unknown);
    }

    #[test]
    fn malformed_snapshot_is_reported() {
        assert!(matches!(
            parse_snapshot("{ not json"),
            Err(crate::ymap::MapExportError::Snapshot(_))
        ));
    }

    #[test]
    fn mismatched_property_block_falls_back_to_defaults() {
        let mut node = SceneNode::new("e", SollumType::Drawable);
        node.properties = NodeProperties::CarGenerator(CarGeneratorProperties::default());
        assert_eq!(node.entity_properties().parent_index, -1);
    }

    #[test]
    fn dimensions_apply_scale() {
        let mut node = SceneNode::new("box", SollumType::YmapBoxOccluder);
        node.mesh = Some(cube(1.0));
        node.transform.scale = [2.0, 1.0, 0.5];
        assert_eq!(node.dimensions(), Vector3::new(4.0, 2.0, 1.0));
    }

    #[test]
    fn combined_bounds_include_descendants() {
        let mut root = SceneNode::new("prop", SollumType::Drawable);
        root.transform.location = [10.0, 0.0, 0.0];

        let mut model = SceneNode::new("prop.model", SollumType::DrawableModel);
        model.mesh = Some(cube(1.0));
        model.transform.location = [0.0, 5.0, 0.0];
        root.children.push(model);

        let world = world_matrix(&identity(), &root);
        let (min, max) = root.combined_world_bound_box(&world).unwrap();
        assert_eq!(min, Vector3::new(9.0, 4.0, -1.0));
        assert_eq!(max, Vector3::new(11.0, 6.0, 1.0));
    }

    #[test]
    fn meshless_tree_has_no_bounds() {
        let root = SceneNode::new("empty", SollumType::Drawable);
        assert!(root.combined_world_bound_box(&identity()).is_none());
    }
}
