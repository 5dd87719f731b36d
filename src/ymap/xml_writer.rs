//! Text encodings of a finished map document: CodeWalker-style `CMapData`
//! XML and a JSON dump of the document model.

use std::fmt::Display;
use std::io::{self, Write};

use cgmath::{Quaternion, Vector3};

use super::{BoxOccluder, CarGenerator, Entity, MapDocument, MetadataBlock, OccludeModel};
use crate::validation::limits::EXTENTS_SENTINEL;

const INDENT: &str = "  ";

/// Minimal indenting element writer.
struct XmlWriter<W: Write> {
    out: W,
    depth: usize,
}

impl<W: Write> XmlWriter<W> {
    fn new(out: W) -> Self {
        Self { out, depth: 0 }
    }

    fn indent(&mut self) -> io::Result<()> {
        for _ in 0..self.depth {
            self.out.write_all(INDENT.as_bytes())?;
        }
        Ok(())
    }

    fn open(&mut self, tag: &str) -> io::Result<()> {
        self.indent()?;
        writeln!(self.out, "<{}>", tag)?;
        self.depth += 1;
        Ok(())
    }

    fn open_with_type(&mut self, tag: &str, type_name: &str) -> io::Result<()> {
        self.indent()?;
        writeln!(self.out, "<{} type=\"{}\">", tag, escape(type_name))?;
        self.depth += 1;
        Ok(())
    }

    fn close(&mut self, tag: &str) -> io::Result<()> {
        self.depth = self.depth.saturating_sub(1);
        self.indent()?;
        writeln!(self.out, "</{}>", tag)
    }

    fn empty(&mut self, tag: &str) -> io::Result<()> {
        self.indent()?;
        writeln!(self.out, "<{} />", tag)
    }

    /// `<tag>text</tag>`, or `<tag />` when the text is empty.
    fn text(&mut self, tag: &str, text: &str) -> io::Result<()> {
        if text.is_empty() {
            return self.empty(tag);
        }
        self.indent()?;
        writeln!(self.out, "<{}>{}</{}>", tag, escape(text), tag)
    }

    fn value(&mut self, tag: &str, value: impl Display) -> io::Result<()> {
        self.indent()?;
        writeln!(self.out, "<{} value=\"{}\" />", tag, value)
    }

    fn float(&mut self, tag: &str, value: f32) -> io::Result<()> {
        self.value(tag, unsigned_zero(value))
    }

    fn vector(&mut self, tag: &str, v: Vector3<f32>) -> io::Result<()> {
        let v = v.map(unsigned_zero);
        self.indent()?;
        writeln!(self.out, "<{} x=\"{}\" y=\"{}\" z=\"{}\" />", tag, v.x, v.y, v.z)
    }

    /// Map extents. Real bounds print with `f32` precision, the empty
    /// sentinel prints as the exact integer.
    fn extents(&mut self, tag: &str, v: Vector3<f64>) -> io::Result<()> {
        let (x, y, z) = (extent(v.x), extent(v.y), extent(v.z));
        self.indent()?;
        writeln!(self.out, "<{} x=\"{}\" y=\"{}\" z=\"{}\" />", tag, x, y, z)
    }

    fn quaternion(&mut self, tag: &str, q: Quaternion<f32>) -> io::Result<()> {
        let (v, s) = (q.v.map(unsigned_zero), unsigned_zero(q.s));
        self.indent()?;
        writeln!(
            self.out,
            "<{} x=\"{}\" y=\"{}\" z=\"{}\" w=\"{}\" />",
            tag, v.x, v.y, v.z, s
        )
    }

    /// Write `items` under `tag`, or `<tag />` if there are none.
    fn list<T>(
        &mut self,
        tag: &str,
        items: &[T],
        mut item: impl FnMut(&mut Self, &T) -> io::Result<()>,
    ) -> io::Result<()> {
        if items.is_empty() {
            return self.empty(tag);
        }
        self.open(tag)?;
        for i in items {
            item(self, i)?;
        }
        self.close(tag)
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// `-0` prints as "-0"; the engine tools expect "0".
fn unsigned_zero(v: f32) -> f32 {
    if v == 0.0 {
        0.0
    } else {
        v
    }
}

fn extent(v: f64) -> String {
    if v.abs() >= EXTENTS_SENTINEL {
        v.to_string()
    } else {
        unsigned_zero(v as f32).to_string()
    }
}

fn hex_upper(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}

// ============================================================================
// Records
// ============================================================================

fn write_entity<W: Write>(xml: &mut XmlWriter<W>, e: &Entity) -> io::Result<()> {
    xml.open_with_type("Item", e.entity_type.as_str())?;
    xml.text("archetypeName", &e.archetype_name)?;
    xml.value("flags", e.flags)?;
    xml.value("guid", e.guid)?;
    xml.vector("position", e.position)?;
    xml.quaternion("rotation", e.rotation)?;
    xml.float("scaleXY", e.scale_xy)?;
    xml.float("scaleZ", e.scale_z)?;
    xml.value("parentIndex", e.parent_index)?;
    xml.float("lodDist", e.lod_dist)?;
    xml.float("childLodDist", e.child_lod_dist)?;
    xml.text("lodLevel", e.lod_level.as_str())?;
    xml.value("numChildren", e.num_children)?;
    xml.text("priorityLevel", e.priority_level.as_str())?;
    xml.empty("extensions")?;
    xml.value("ambientOcclusionMultiplier", e.ambient_occlusion_multiplier)?;
    xml.value("artificialAmbientOcclusion", e.artificial_ambient_occlusion)?;
    xml.value("tintValue", e.tint_value)?;
    xml.close("Item")
}

fn write_box_occluder<W: Write>(xml: &mut XmlWriter<W>, b: &BoxOccluder) -> io::Result<()> {
    xml.open("Item")?;
    xml.value("iCenterX", b.center_x)?;
    xml.value("iCenterY", b.center_y)?;
    xml.value("iCenterZ", b.center_z)?;
    xml.value("iCosZ", b.cos_z)?;
    xml.value("iLength", b.length)?;
    xml.value("iWidth", b.width)?;
    xml.value("iHeight", b.height)?;
    xml.value("iSinZ", b.sin_z)?;
    xml.close("Item")
}

fn write_occlude_model<W: Write>(xml: &mut XmlWriter<W>, m: &OccludeModel) -> io::Result<()> {
    xml.open("Item")?;
    xml.vector("bmin", m.bmin)?;
    xml.vector("bmax", m.bmax)?;
    xml.value("dataSize", m.data_size)?;
    xml.text("verts", &hex_upper(&m.verts))?;
    xml.value("numVertsInBytes", m.num_verts_in_bytes)?;
    xml.value("numTris", m.num_tris)?;
    xml.value("flags", m.flags)?;
    xml.close("Item")
}

fn write_car_generator<W: Write>(xml: &mut XmlWriter<W>, c: &CarGenerator) -> io::Result<()> {
    xml.open("Item")?;
    xml.vector("position", c.position)?;
    xml.float("orientX", c.orient_x)?;
    xml.float("orientY", c.orient_y)?;
    xml.float("perpendicularLength", c.perpendicular_length)?;
    xml.text("carModel", &c.car_model)?;
    xml.value("flags", c.flags)?;
    xml.value("bodyColorRemap1", c.body_color_remap_1)?;
    xml.value("bodyColorRemap2", c.body_color_remap_2)?;
    xml.value("bodyColorRemap3", c.body_color_remap_3)?;
    xml.value("bodyColorRemap4", c.body_color_remap_4)?;
    xml.text("popGroup", &c.pop_group)?;
    xml.value("livery", c.livery)?;
    xml.close("Item")
}

fn write_block<W: Write>(xml: &mut XmlWriter<W>, block: &MetadataBlock) -> io::Result<()> {
    xml.open("block")?;
    xml.value("version", block.version)?;
    xml.value("flags", block.flags)?;
    xml.text("name", &block.name)?;
    xml.text("exportedBy", &block.exported_by)?;
    xml.text("owner", &block.owner)?;
    xml.text("time", &block.time)?;
    xml.close("block")
}

// ============================================================================
// Documents
// ============================================================================

/// Write `doc` as a `CMapData` XML document.
pub fn write_ymap_xml<W: Write>(doc: &MapDocument, out: W) -> io::Result<()> {
    let mut xml = XmlWriter::new(out);
    writeln!(xml.out, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;

    xml.open("CMapData")?;
    xml.text("name", &doc.name)?;
    xml.text("parent", &doc.parent)?;
    xml.value("flags", doc.flags)?;
    xml.value("contentFlags", doc.content_flags)?;
    xml.extents("streamingExtentsMin", doc.streaming_extents_min)?;
    xml.extents("streamingExtentsMax", doc.streaming_extents_max)?;
    xml.extents("entitiesExtentsMin", doc.entities_extents_min)?;
    xml.extents("entitiesExtentsMax", doc.entities_extents_max)?;
    xml.list("entities", &doc.entities, write_entity)?;
    xml.empty("containerLods")?;
    xml.list("boxOccluders", &doc.box_occluders, write_box_occluder)?;
    xml.list("occludeModels", &doc.occlude_models, write_occlude_model)?;
    xml.list("carGenerators", &doc.car_generators, write_car_generator)?;
    write_block(&mut xml, &doc.block)?;
    xml.close("CMapData")?;

    xml.out.flush()
}

/// Write `doc` as pretty-printed JSON.
pub fn write_ymap_json<W: Write>(doc: &MapDocument, out: W) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(out, doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(doc: &MapDocument) -> String {
        let mut buf = Vec::new();
        write_ymap_xml(doc, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn empty_lists_are_self_closing() {
        let xml = render(&MapDocument::default());
        assert!(xml.contains("  <entities />\n"));
        assert!(xml.contains("  <boxOccluders />\n"));
        assert!(xml.contains("  <parent />\n"));
        assert!(xml.ends_with("</CMapData>\n"));
    }

    /// An empty map writes the sentinel as exact integers, not a rounded float
    #[test]
    fn empty_extents_write_exact_sentinel() {
        let xml = render(&MapDocument::default());
        assert!(xml.contains(
            "  <streamingExtentsMin x=\"2147483647\" y=\"2147483647\" z=\"2147483647\" />\n"
        ));
        assert!(xml.contains(
            "  <entitiesExtentsMax x=\"-2147483647\" y=\"-2147483647\" z=\"-2147483647\" />\n"
        ));
        assert!(!xml.contains("2147483600"));
        assert!(!xml.contains("2147483648"));
    }

    #[test]
    fn partial_extents_keep_float_text() {
        let doc = MapDocument {
            entities_extents_min: Vector3::new(-0.0, 0.1f32 as f64, 12.5),
            ..Default::default()
        };
        let xml = render(&doc);
        assert!(xml.contains("<entitiesExtentsMin x=\"0\" y=\"0.1\" z=\"12.5\" />"));
        assert!(xml.contains("<entitiesExtentsMax x=\"-2147483647\""));
    }

    #[test]
    fn json_keeps_exact_sentinel() {
        let mut buf = Vec::new();
        write_ymap_json(&MapDocument::default(), &mut buf).unwrap();
        let json = String::from_utf8(buf).unwrap();
        assert!(json.contains("2147483647.0"));
        assert!(json.contains("-2147483647.0"));
        assert!(!json.contains("2147483648"));
    }

    #[test]
    fn text_is_escaped() {
        let doc = MapDocument {
            name: "a<b>&\"c\"".to_string(),
            ..Default::default()
        };
        assert!(render(&doc).contains("<name>a&lt;b&gt;&amp;&quot;c&quot;</name>"));
    }

    #[test]
    fn verts_are_upper_hex() {
        assert_eq!(hex_upper(&[0x00, 0xab, 0x10, 0xff]), "00AB10FF");
    }

    #[test]
    fn json_round_trips_document() {
        let mut doc = MapDocument::default();
        doc.name = "hills".to_string();
        let mut buf = Vec::new();
        write_ymap_json(&doc, &mut buf).unwrap();
        let back: MapDocument = serde_json::from_slice(&buf).unwrap();
        assert_eq!(back, doc);
    }
}
