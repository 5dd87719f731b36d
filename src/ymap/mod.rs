//! Map placement documents (`CMapData`) and the export pipeline that builds
//! them from a scene snapshot.

pub mod builders;
pub mod classify;
pub mod error;
pub mod export;
pub mod extents;
pub mod flags;
pub mod xml_writer;

use cgmath::{Quaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::validation::limits::EXTENTS_SENTINEL;

pub use error::{MapExportError, Result};
pub use export::{
    assemble_map, export_many, export_ymap, write_document, ExportOptions, MapExport, OutputFormat,
};

// ============================================================================
// Enumerations
// ============================================================================

/// Level-of-detail tier of a placed entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LodLevel {
    #[default]
    #[serde(rename = "LODTYPES_DEPTH_HD", alias = "sollumz_lodtypes_depth_hd")]
    Hd,
    #[serde(rename = "LODTYPES_DEPTH_ORPHANHD", alias = "sollumz_lodtypes_depth_orphanhd")]
    OrphanHd,
    #[serde(rename = "LODTYPES_DEPTH_LOD", alias = "sollumz_lodtypes_depth_lod")]
    Lod,
    #[serde(rename = "LODTYPES_DEPTH_SLOD1", alias = "sollumz_lodtypes_depth_slod1")]
    Slod1,
    #[serde(rename = "LODTYPES_DEPTH_SLOD2", alias = "sollumz_lodtypes_depth_slod2")]
    Slod2,
    #[serde(rename = "LODTYPES_DEPTH_SLOD3", alias = "sollumz_lodtypes_depth_slod3")]
    Slod3,
    #[serde(rename = "LODTYPES_DEPTH_SLOD4", alias = "sollumz_lodtypes_depth_slod4")]
    Slod4,
}

impl LodLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LodLevel::Hd => "LODTYPES_DEPTH_HD",
            LodLevel::OrphanHd => "LODTYPES_DEPTH_ORPHANHD",
            LodLevel::Lod => "LODTYPES_DEPTH_LOD",
            LodLevel::Slod1 => "LODTYPES_DEPTH_SLOD1",
            LodLevel::Slod2 => "LODTYPES_DEPTH_SLOD2",
            LodLevel::Slod3 => "LODTYPES_DEPTH_SLOD3",
            LodLevel::Slod4 => "LODTYPES_DEPTH_SLOD4",
        }
    }
}

/// Streaming priority of a placed entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PriorityLevel {
    #[default]
    #[serde(rename = "PRI_REQUIRED", alias = "sollumz_pri_required")]
    Required,
    #[serde(rename = "PRI_OPTIONAL_HIGH", alias = "sollumz_pri_optional_high")]
    OptionalHigh,
    #[serde(rename = "PRI_OPTIONAL_MEDIUM", alias = "sollumz_pri_optional_medium")]
    OptionalMedium,
    #[serde(rename = "PRI_OPTIONAL_LOW", alias = "sollumz_pri_optional_low")]
    OptionalLow,
}

impl PriorityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityLevel::Required => "PRI_REQUIRED",
            PriorityLevel::OptionalHigh => "PRI_OPTIONAL_HIGH",
            PriorityLevel::OptionalMedium => "PRI_OPTIONAL_MEDIUM",
            PriorityLevel::OptionalLow => "PRI_OPTIONAL_LOW",
        }
    }
}

/// Class of an entity definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EntityType {
    #[default]
    #[serde(rename = "CEntityDef")]
    EntityDef,
    /// Interior instance; its rotation is stored without inversion.
    #[serde(rename = "CMloInstanceDef")]
    MloInstanceDef,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::EntityDef => "CEntityDef",
            EntityType::MloInstanceDef => "CMloInstanceDef",
        }
    }
}

// ============================================================================
// Records
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub entity_type: EntityType,
    pub archetype_name: String,
    pub flags: u32,
    pub guid: u32,
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale_xy: f32,
    pub scale_z: f32,
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

/// Axis-aligned occluder box in fixed point (quarter units).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxOccluder {
    pub center_x: i32,
    pub center_y: i32,
    pub center_z: i32,
    pub length: i32,
    pub width: i32,
    pub height: i32,
    pub sin_z: i16,
    pub cos_z: i16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccludeModel {
    pub bmin: Vector3<f32>,
    pub bmax: Vector3<f32>,
    /// World-space vertex positions (LE f32 triples) then triangle indices (u8).
    pub verts: Vec<u8>,
    pub num_verts_in_bytes: u32,
    /// Triangle count biased by 32768.
    pub num_tris: u32,
    pub data_size: u32,
    pub flags: u32,
}

/// Size of one packed occluder vertex (three f32).
pub const OCCLUDER_VERTEX_SIZE: u32 = 12;

impl OccludeModel {
    /// Decode the packed world-space vertex positions.
    pub fn vertices(&self) -> Vec<Vector3<f32>> {
        let end = (self.num_verts_in_bytes as usize).min(self.verts.len());
        self.verts[..end]
            .chunks_exact(OCCLUDER_VERTEX_SIZE as usize)
            .map(|c| {
                let f = |i: usize| f32::from_le_bytes([c[i], c[i + 1], c[i + 2], c[i + 3]]);
                Vector3::new(f(0), f(4), f(8))
            })
            .collect()
    }

    /// Triangle vertex indices, three per triangle.
    pub fn triangle_indices(&self) -> &[u8] {
        let start = (self.num_verts_in_bytes as usize).min(self.verts.len());
        &self.verts[start..]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarGenerator {
    pub position: Vector3<f32>,
    pub orient_x: f32,
    pub orient_y: f32,
    pub perpendicular_length: f32,
    pub car_model: String,
    pub flags: u32,
    pub body_color_remap_1: i32,
    pub body_color_remap_2: i32,
    pub body_color_remap_3: i32,
    pub body_color_remap_4: i32,
    pub pop_group: String,
    pub livery: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataBlock {
    pub version: u32,
    pub flags: u32,
    pub name: String,
    pub exported_by: String,
    pub owner: String,
    pub time: String,
}

/// A complete map placement document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDocument {
    pub name: String,
    pub parent: String,
    pub flags: u32,
    pub content_flags: u32,
    pub streaming_extents_min: Vector3<f64>,
    pub streaming_extents_max: Vector3<f64>,
    pub entities_extents_min: Vector3<f64>,
    pub entities_extents_max: Vector3<f64>,
    pub entities: Vec<Entity>,
    pub box_occluders: Vec<BoxOccluder>,
    pub occlude_models: Vec<OccludeModel>,
    pub car_generators: Vec<CarGenerator>,
    pub block: MetadataBlock,
}

impl Default for MapDocument {
    /// Empty document with extents at the "nothing contributed" sentinel.
    fn default() -> Self {
        let min = Vector3::new(EXTENTS_SENTINEL, EXTENTS_SENTINEL, EXTENTS_SENTINEL);
        let max = -min;
        Self {
            name: String::new(),
            parent: String::new(),
            flags: 0,
            content_flags: 0,
            streaming_extents_min: min,
            streaming_extents_max: max,
            entities_extents_min: min,
            entities_extents_max: max,
            entities: vec![],
            box_occluders: vec![],
            occlude_models: vec![],
            car_generators: vec![],
            block: MetadataBlock::default(),
        }
    }
}
