//! Map document assembly and file export.
//!
//! Assembly walks the map root's groups one content kind at a time:
//!
//! ```text
//! Init -> CollectEntities -> CollectBoxOccluders -> CollectModelOccluders
//!      -> CollectCarGenerators -> Finalize -> Done
//! ```
//!
//! Members that fail classification or validation are reported and skipped;
//! they never abort the rest of the map.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use cgmath::Matrix4;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::builders::{box_from_node, cargen_from_node, entity_from_node, model_from_node};
use super::classify::{classify_member, ClassifiedNode, ContentKind};
use super::extents::{accumulate, ExtentContribution};
use super::flags::derive_flags;
use super::xml_writer::{write_ymap_json, write_ymap_xml};
use super::{MapDocument, MetadataBlock, Result};
use crate::scene::names::remove_number_suffix;
use crate::scene::{SceneNode, SollumType, Triangulator};
use crate::validation::rules::{group_not_exported, malformed_node, validate_occluder_vertex_count};
use crate::validation::{ExportIssue, ExportReport};

// ============================================================================
// Options
// ============================================================================

/// Which record kinds to leave out of the exported map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub exclude_entities: bool,
    pub exclude_box_occluders: bool,
    pub exclude_model_occluders: bool,
    pub exclude_car_generators: bool,
}

impl ExportOptions {
    pub fn excludes(&self, kind: ContentKind) -> bool {
        match kind {
            ContentKind::Entity => self.exclude_entities,
            ContentKind::BoxOccluder => self.exclude_box_occluders,
            ContentKind::ModelOccluder => self.exclude_model_occluders,
            ContentKind::CarGenerator => self.exclude_car_generators,
            ContentKind::Grass => true,
        }
    }
}

/// On-disk encoding of an exported map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Xml,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xml => "ymap.xml",
            OutputFormat::Json => "ymap.json",
        }
    }
}

/// A finished document together with everything skipped while building it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapExport {
    pub document: MapDocument,
    pub report: ExportReport,
}

// ============================================================================
// Assembler
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyPhase {
    Init,
    CollectEntities,
    CollectBoxOccluders,
    CollectModelOccluders,
    CollectCarGenerators,
    Finalize,
    Done,
}

impl AssemblyPhase {
    pub fn next(self) -> AssemblyPhase {
        match self {
            AssemblyPhase::Init => AssemblyPhase::CollectEntities,
            AssemblyPhase::CollectEntities => AssemblyPhase::CollectBoxOccluders,
            AssemblyPhase::CollectBoxOccluders => AssemblyPhase::CollectModelOccluders,
            AssemblyPhase::CollectModelOccluders => AssemblyPhase::CollectCarGenerators,
            AssemblyPhase::CollectCarGenerators => AssemblyPhase::Finalize,
            AssemblyPhase::Finalize | AssemblyPhase::Done => AssemblyPhase::Done,
        }
    }

    /// Content kind gathered during this phase, if it is a collect phase.
    pub fn content_kind(self) -> Option<ContentKind> {
        match self {
            AssemblyPhase::CollectEntities => Some(ContentKind::Entity),
            AssemblyPhase::CollectBoxOccluders => Some(ContentKind::BoxOccluder),
            AssemblyPhase::CollectModelOccluders => Some(ContentKind::ModelOccluder),
            AssemblyPhase::CollectCarGenerators => Some(ContentKind::CarGenerator),
            _ => None,
        }
    }
}

struct MapAssembler<'a> {
    options: &'a ExportOptions,
    triangulator: &'a dyn Triangulator,
    document: MapDocument,
    report: ExportReport,
    phase: AssemblyPhase,
}

impl<'a> MapAssembler<'a> {
    fn new(options: &'a ExportOptions, triangulator: &'a dyn Triangulator) -> Self {
        Self {
            options,
            triangulator,
            document: MapDocument::default(),
            report: ExportReport::new(),
            phase: AssemblyPhase::Init,
        }
    }

    fn run(mut self, root: &mut SceneNode) -> MapExport {
        while self.phase != AssemblyPhase::Done {
            log::debug!("{}: {:?}", root.name, self.phase);
            match self.phase {
                AssemblyPhase::Init => self.note_ignored_groups(root),
                AssemblyPhase::Finalize => self.finalize(root),
                AssemblyPhase::Done => {}
                phase => {
                    if let Some(kind) = phase.content_kind() {
                        if self.options.excludes(kind) {
                            log::debug!("{}: {:?} excluded", root.name, kind);
                        } else {
                            self.collect(root, kind);
                        }
                    }
                }
            }
            self.phase = self.phase.next();
        }

        MapExport {
            document: self.document,
            report: self.report,
        }
    }

    fn note_ignored_groups(&mut self, root: &SceneNode) {
        for group in &root.children {
            if group.sollum_type == SollumType::YmapGrassInstancedData {
                let issue = group_not_exported(root, group);
                log::info!("{}", issue.message);
                self.report.add(issue);
            }
        }
    }

    fn skip(&mut self, issue: ExportIssue) {
        log::warn!("{}", issue.message);
        self.report.add(issue);
    }

    /// Gather every member of every group of `kind`, in child order.
    fn collect(&mut self, root: &mut SceneNode, kind: ContentKind) {
        let root_world = root.transform.matrix();

        for group in root
            .children
            .iter_mut()
            .filter(|g| ContentKind::from_group(g.sollum_type) == Some(kind))
        {
            let group_world = root_world * group.transform.matrix();
            for member in group.children.iter_mut() {
                let world = group_world * member.transform.matrix();

                if kind == ContentKind::ModelOccluder
                    && member.sollum_type == SollumType::YmapModelOccluder
                    && !self.prepare_occluder_mesh(member)
                {
                    continue;
                }

                self.add_member(kind, member, &world);
            }
        }
    }

    /// Enforce the vertex ceiling, then triangulate the occluder mesh in
    /// place. Returns false if the node must be skipped.
    fn prepare_occluder_mesh(&mut self, node: &mut SceneNode) -> bool {
        if let Some(issue) = validate_occluder_vertex_count(node) {
            self.skip(issue);
            return false;
        }
        if let Some(mesh) = node.mesh.as_mut() {
            self.triangulator.triangulate(mesh);
        }
        true
    }

    fn add_member(&mut self, kind: ContentKind, node: &SceneNode, world: &Matrix4<f32>) {
        let classified = match classify_member(kind, node) {
            Ok(classified) => classified,
            Err(issue) => return self.skip(issue),
        };

        match &classified {
            ClassifiedNode::Entity { node, props } => {
                self.document.entities.push(entity_from_node(node, props));
            }
            ClassifiedNode::BoxOccluder { node } => {
                self.document.box_occluders.push(box_from_node(node, world));
            }
            ClassifiedNode::ModelOccluder { node, props } => {
                match model_from_node(node, world, props) {
                    Ok(model) => self.document.occlude_models.push(model),
                    Err(e) => {
                        return self.skip(malformed_node(node, kind.category(), &e.to_string()));
                    }
                }
            }
            ClassifiedNode::CarGenerator { node, props } => {
                self.document.car_generators.push(cargen_from_node(node, props));
            }
        }

        accumulate(
            &mut self.document,
            &ExtentContribution::for_node(&classified, world),
        );
    }

    fn finalize(&mut self, root: &SceneNode) {
        let props = root.map_properties();

        let (flags, content_flags) = derive_flags(&self.document.entities, props.script_loaded);
        self.document.flags = flags;
        self.document.content_flags = content_flags;

        self.document.name = remove_number_suffix(&root.name).to_string();
        self.document.parent = props.parent.clone();

        let block = &props.block;
        self.document.block = MetadataBlock {
            version: block.version,
            flags: block.flags,
            name: block.name.clone(),
            exported_by: block.exported_by.clone(),
            owner: block.owner.clone(),
            time: block.time.clone(),
        };

        log::info!(
            "Assembled map {}: {} entities, {} box occluders, {} occlude models, {} car generators, {} skipped",
            self.document.name,
            self.document.entities.len(),
            self.document.box_occluders.len(),
            self.document.occlude_models.len(),
            self.document.car_generators.len(),
            self.report.warning_count
        );
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// Build the map document for one map root.
///
/// Model occluder meshes under `root` are triangulated in place; nothing
/// else in the tree is modified.
pub fn assemble_map(
    root: &mut SceneNode,
    options: &ExportOptions,
    triangulator: &dyn Triangulator,
) -> MapExport {
    MapAssembler::new(options, triangulator).run(root)
}

/// Encode a finished document to `path`.
pub fn write_document(document: &MapDocument, path: &Path, format: OutputFormat) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    match format {
        OutputFormat::Xml => write_ymap_xml(document, &mut writer)?,
        OutputFormat::Json => write_ymap_json(document, &mut writer)?,
    }
    writer.flush()?;
    Ok(())
}

/// Assemble `root` and write it to `path`.
///
/// A write failure fails the whole export; the returned report is only
/// available once the file is complete.
pub fn export_ymap(
    root: &mut SceneNode,
    path: &Path,
    options: &ExportOptions,
    format: OutputFormat,
    triangulator: &dyn Triangulator,
) -> Result<MapExport> {
    let export = assemble_map(root, options, triangulator);
    write_document(&export.document, path, format)?;
    log::info!("Wrote {}", path.display());
    Ok(export)
}

/// Assemble several independent map roots in parallel, sharing one
/// triangulator across the worker threads.
pub fn export_many(
    roots: &mut [SceneNode],
    options: &ExportOptions,
    triangulator: &(dyn Triangulator + Sync),
) -> Vec<MapExport> {
    roots
        .par_iter_mut()
        .map(|root| assemble_map(root, options, triangulator))
        .collect()
}
