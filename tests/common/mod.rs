// Common scene-building helpers for the export tests
#![allow(dead_code)]

use cgmath::Vector3;
use ymap_tools_lib::scene::{
    CarGeneratorProperties, EntityProperties, MapProperties, Mesh, NodeProperties, SceneNode,
    SollumType,
};
use ymap_tools_lib::ymap::{LodLevel, MapDocument};

pub const SENTINEL: f64 = 2147483647.0;

/// Axis-aligned cube mesh of the given half size around the origin.
pub fn cube_mesh(half: f32) -> Mesh {
    Mesh::cuboid(
        Vector3::new(-half, -half, -half),
        Vector3::new(half, half, half),
    )
}

/// Mesh with `count` vertices spread along X and a single triangle.
pub fn mesh_with_vertices(count: usize) -> Mesh {
    Mesh {
        vertices: (0..count).map(|i| [i as f32, 0.0, (i % 2) as f32]).collect(),
        polygons: vec![vec![0, 1, 2]],
    }
}

pub fn map_root(name: &str) -> SceneNode {
    SceneNode::new(name, SollumType::Ymap)
}

pub fn script_loaded_map(name: &str) -> SceneNode {
    let mut root = map_root(name);
    root.properties = NodeProperties::Map(MapProperties {
        script_loaded: true,
        ..Default::default()
    });
    root
}

pub fn group(sollum_type: SollumType, children: Vec<SceneNode>) -> SceneNode {
    let mut node = SceneNode::new(sollum_type.ui_name(), sollum_type);
    node.children = children;
    node
}

pub fn drawable(name: &str, location: [f32; 3]) -> SceneNode {
    let mut node = SceneNode::new(name, SollumType::Drawable);
    node.transform.location = location;
    node.mesh = Some(cube_mesh(1.0));
    node
}

pub fn drawable_with_lod(name: &str, lod_level: LodLevel, lod_dist: f32) -> SceneNode {
    let mut node = drawable(name, [0.0; 3]);
    node.properties = NodeProperties::Entity(EntityProperties {
        lod_level,
        lod_dist,
        ..Default::default()
    });
    node
}

pub fn box_occluder(name: &str, location: [f32; 3]) -> SceneNode {
    let mut node = SceneNode::new(name, SollumType::YmapBoxOccluder);
    node.transform.location = location;
    node.mesh = Some(cube_mesh(1.0));
    node
}

pub fn model_occluder(name: &str, mesh: Mesh) -> SceneNode {
    let mut node = SceneNode::new(name, SollumType::YmapModelOccluder);
    node.mesh = Some(mesh);
    node
}

pub fn car_generator(name: &str, location: [f32; 3], perpendicular_length: f32) -> SceneNode {
    let mut node = SceneNode::new(name, SollumType::YmapCarGenerator);
    node.transform.location = location;
    node.properties = NodeProperties::CarGenerator(CarGeneratorProperties {
        perpendicular_length,
        ..Default::default()
    });
    node
}

/// A map holding one member of every exported kind.
pub fn mixed_map() -> SceneNode {
    let mut root = map_root("mixed_map.001");
    root.children = vec![
        group(
            SollumType::YmapEntityGroup,
            vec![
                drawable("prop_bench_01", [0.0, 0.0, 0.0]),
                drawable("prop_bench_01.001", [20.0, 0.0, 0.0]),
            ],
        ),
        group(
            SollumType::YmapBoxOccluderGroup,
            vec![box_occluder("box", [-10.0, 0.0, 0.0])],
        ),
        group(
            SollumType::YmapModelOccluderGroup,
            vec![model_occluder("occl", cube_mesh(2.0))],
        ),
        group(
            SollumType::YmapCarGeneratorGroup,
            vec![car_generator("cargen", [0.0, 30.0, 0.0], 2.5)],
        ),
    ];
    root
}

pub fn assert_at_sentinel(doc: &MapDocument) {
    let min = Vector3::new(SENTINEL, SENTINEL, SENTINEL);
    assert_eq!(doc.entities_extents_min, min);
    assert_eq!(doc.entities_extents_max, -min);
    assert_eq!(doc.streaming_extents_min, min);
    assert_eq!(doc.streaming_extents_max, -min);
}
