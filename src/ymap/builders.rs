//! One builder per record kind. Each reads a classified node once and
//! returns an owned record; nothing keeps a reference to the node.

use std::io::Cursor;

use binrw::BinWrite;
use cgmath::{Matrix4, Vector3};

use super::{
    BoxOccluder, CarGenerator, Entity, EntityType, MapExportError, OccludeModel, Result,
    OCCLUDER_VERTEX_SIZE,
};
use crate::math::{
    bound_center, euler_xyz_to_matrix3, euler_xyz_to_quaternion, transform_point, LwVector3,
};
use crate::scene::names::archetype_name;
use crate::scene::{CarGeneratorProperties, EntityProperties, ModelOccluderProperties, SceneNode};
use crate::validation::limits::{MAX_OCCLUDER_VERTICES, OCCLUDER_TRI_COUNT_BIAS};

/// Box occluder coordinates are stored in quarter units.
const BOX_OCCLUDER_UNIT_SCALE: f32 = 4.0;

/// Scale for the packed occluder orientation components.
const BOX_OCCLUDER_ROTATION_SCALE: f32 = 32767.0;

/// Car generator orientation vectors have this length.
const CARGEN_ORIENT_LENGTH: f32 = 5.0;

fn world_origin(world: &Matrix4<f32>) -> Vector3<f32> {
    transform_point(world, Vector3::new(0.0, 0.0, 0.0))
}

/// World-space bounds of a node, or the degenerate box at its origin.
pub(crate) fn world_bounds_or_origin(
    node: &SceneNode,
    world: &Matrix4<f32>,
) -> (Vector3<f32>, Vector3<f32>) {
    node.world_bound_box(world).unwrap_or_else(|| {
        let origin = world_origin(world);
        (origin, origin)
    })
}

fn malformed(node: &SceneNode, reason: impl Into<String>) -> MapExportError {
    MapExportError::MalformedNode {
        object: node.name.clone(),
        reason: reason.into(),
    }
}

// ============================================================================
// Entity
// ============================================================================

pub fn entity_from_node(node: &SceneNode, props: &EntityProperties) -> Entity {
    let transform = &node.transform;

    let mut rotation = euler_xyz_to_quaternion(transform.rotation_euler);
    if props.entity_type != EntityType::MloInstanceDef {
        rotation = rotation.conjugate();
    }

    Entity {
        entity_type: props.entity_type,
        archetype_name: archetype_name(&node.name),
        flags: props.flags,
        guid: props.guid,
        position: transform.location(),
        rotation,
        scale_xy: transform.scale[0],
        scale_z: transform.scale[2],
        parent_index: props.parent_index,
        lod_dist: props.lod_dist,
        child_lod_dist: props.child_lod_dist,
        lod_level: props.lod_level,
        num_children: props.num_children,
        priority_level: props.priority_level,
        ambient_occlusion_multiplier: props.ambient_occlusion_multiplier,
        artificial_ambient_occlusion: props.artificial_ambient_occlusion,
        tint_value: props.tint_value,
    }
}

// ============================================================================
// Box occluder
// ============================================================================

fn to_fixed(v: f32) -> i32 {
    (v * BOX_OCCLUDER_UNIT_SCALE).round() as i32
}

pub fn box_from_node(node: &SceneNode, world: &Matrix4<f32>) -> BoxOccluder {
    let (bbmin, bbmax) = world_bounds_or_origin(node, world);
    let center = bound_center(bbmin, bbmax);
    let dimensions = node.dimensions();

    // Half-length direction of the box's local X axis. The engine stores its
    // X component in `sin_z` and its Y component in `cos_z`.
    let dir = euler_xyz_to_matrix3(node.transform.rotation_euler) * Vector3::unit_x() * 0.5;

    BoxOccluder {
        center_x: to_fixed(center.x),
        center_y: to_fixed(center.y),
        center_z: to_fixed(center.z),
        length: to_fixed(dimensions.x),
        width: to_fixed(dimensions.y),
        height: to_fixed(dimensions.z),
        sin_z: (dir.x * BOX_OCCLUDER_ROTATION_SCALE).round() as i16,
        cos_z: (dir.y * BOX_OCCLUDER_ROTATION_SCALE).round() as i16,
    }
}

// ============================================================================
// Model occluder
// ============================================================================

/// Build an occlude model from an already triangulated node.
///
/// The caller runs the `Triangulator` over the node's mesh first; a mesh
/// that still holds non-triangle polygons is rejected. The vertex ceiling is
/// enforced by `validate_occluder_vertex_count` before triangulation.
pub fn model_from_node(
    node: &SceneNode,
    world: &Matrix4<f32>,
    props: &ModelOccluderProperties,
) -> Result<OccludeModel> {
    let mesh = node
        .mesh
        .as_ref()
        .ok_or_else(|| malformed(node, "model occluder has no mesh"))?;

    debug_assert!(
        mesh.vertices.len() <= MAX_OCCLUDER_VERTICES,
        "{} reached the builder above the vertex ceiling",
        node.name
    );
    if !mesh.is_triangulated() {
        return Err(malformed(node, "mesh is not triangulated"));
    }
    if let Some(index) = mesh.find_invalid_polygon() {
        return Err(malformed(
            node,
            format!("polygon {} references a missing vertex", index),
        ));
    }

    let (bmin, bmax) = world_bounds_or_origin(node, world);

    let vertex_count = mesh.vertices.len() as u32;
    let face_count = mesh.polygons.len() as u32;
    let num_verts_in_bytes = vertex_count * OCCLUDER_VERTEX_SIZE;
    let data_size = num_verts_in_bytes + face_count * 3;

    let mut cursor = Cursor::new(Vec::with_capacity(data_size as usize));
    for &v in &mesh.vertices {
        let p = transform_point(world, Vector3::from(v));
        LwVector3(p).write_le(&mut cursor)?;
    }
    for polygon in &mesh.polygons {
        for &index in polygon {
            // Bounded by the vertex ceiling checked above.
            (index as u8).write_le(&mut cursor)?;
        }
    }

    Ok(OccludeModel {
        bmin,
        bmax,
        verts: cursor.into_inner(),
        num_verts_in_bytes,
        num_tris: face_count + OCCLUDER_TRI_COUNT_BIAS,
        data_size,
        flags: props.flags,
    })
}

// ============================================================================
// Car generator
// ============================================================================

pub fn cargen_from_node(node: &SceneNode, props: &CarGeneratorProperties) -> CarGenerator {
    // The engine measures heading the other way round.
    let angle = -node.transform.rotation_euler[2];

    CarGenerator {
        position: node.transform.location(),
        orient_x: CARGEN_ORIENT_LENGTH * angle.sin(),
        orient_y: CARGEN_ORIENT_LENGTH * angle.cos(),
        perpendicular_length: props.perpendicular_length,
        car_model: props.car_model.clone(),
        flags: props.flags,
        body_color_remap_1: props.body_color_remap_1,
        body_color_remap_2: props.body_color_remap_2,
        body_color_remap_3: props.body_color_remap_3,
        body_color_remap_4: props.body_color_remap_4,
        pop_group: props.pop_group.clone(),
        livery: props.livery,
    }
}
