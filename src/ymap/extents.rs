use cgmath::{Matrix4, Vector3};

use super::builders::world_bounds_or_origin;
use super::classify::ClassifiedNode;
use super::MapDocument;
use crate::math::{max_vector, min_vector, splat};

/// Box occluder extents treat the packed quarter-unit length as a radius.
const BOX_OCCLUDER_EXTENT_SCALE: f32 = 4.0;

/// Visual and streaming bounds one node adds to its map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtentContribution {
    pub bbmin: Vector3<f32>,
    pub bbmax: Vector3<f32>,
    pub smin: Vector3<f32>,
    pub smax: Vector3<f32>,
}

impl ExtentContribution {
    /// Combined bounds of the drawable, streamed in `lod_dist` further out.
    pub fn entity(node: &crate::scene::SceneNode, world: &Matrix4<f32>, lod_dist: f32) -> Self {
        let (bbmin, bbmax) = node
            .combined_world_bound_box(world)
            .unwrap_or_else(|| world_bounds_or_origin(node, world));
        let lod = splat(lod_dist);
        Self {
            bbmin,
            bbmax,
            smin: bbmin - lod,
            smax: bbmax + lod,
        }
    }

    pub fn car_generator(location: Vector3<f32>, perpendicular_length: f32) -> Self {
        let len = splat(perpendicular_length);
        let streaming = splat(perpendicular_length * 2.0);
        Self {
            bbmin: location - len,
            bbmax: location + len,
            smin: location - streaming,
            smax: location + streaming,
        }
    }

    pub fn box_occluder(location: Vector3<f32>, dimensions: Vector3<f32>) -> Self {
        let size = splat((dimensions.x * BOX_OCCLUDER_EXTENT_SCALE).round() * 0.5);
        let bbmin = location - size;
        let bbmax = location + size;
        Self {
            bbmin,
            bbmax,
            smin: bbmin,
            smax: bbmax,
        }
    }

    pub fn model_occluder(bmin: Vector3<f32>, bmax: Vector3<f32>) -> Self {
        Self {
            bbmin: bmin,
            bbmax: bmax,
            smin: bmin,
            smax: bmax,
        }
    }

    /// Contribution of a classified node placed at `world`.
    pub fn for_node(classified: &ClassifiedNode<'_>, world: &Matrix4<f32>) -> Self {
        match classified {
            ClassifiedNode::Entity { node, props } => Self::entity(node, world, props.lod_dist),
            ClassifiedNode::BoxOccluder { node } => {
                Self::box_occluder(node.transform.location(), node.dimensions())
            }
            ClassifiedNode::ModelOccluder { node, .. } => {
                let (bmin, bmax) = world_bounds_or_origin(node, world);
                Self::model_occluder(bmin, bmax)
            }
            ClassifiedNode::CarGenerator { node, props } => {
                Self::car_generator(node.transform.location(), props.perpendicular_length)
            }
        }
    }
}

/// Fold one contribution into the document's running extents.
pub fn accumulate(doc: &mut MapDocument, c: &ExtentContribution) {
    let widen = |v: Vector3<f32>| v.map(f64::from);
    doc.entities_extents_min = min_vector(doc.entities_extents_min, widen(c.bbmin));
    doc.entities_extents_max = max_vector(doc.entities_extents_max, widen(c.bbmax));
    doc.streaming_extents_min = min_vector(doc.streaming_extents_min, widen(c.smin));
    doc.streaming_extents_max = max_vector(doc.streaming_extents_max, widen(c.smax));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{identity, Mesh, SceneNode, SollumType};

    fn sample() -> Vec<ExtentContribution> {
        vec![
            ExtentContribution::car_generator(Vector3::new(10.0, 0.0, 0.0), 2.0),
            ExtentContribution::box_occluder(Vector3::new(-5.0, 3.0, 1.0), Vector3::new(2.0, 2.0, 2.0)),
            ExtentContribution::model_occluder(Vector3::new(0.0, -8.0, 0.0), Vector3::new(1.0, -7.0, 4.0)),
        ]
    }

    fn fold(contributions: &[ExtentContribution]) -> MapDocument {
        let mut doc = MapDocument::default();
        for c in contributions {
            accumulate(&mut doc, c);
        }
        doc
    }

    #[test]
    fn untouched_document_keeps_sentinel() {
        let doc = fold(&[]);
        let sentinel = Vector3::new(2147483647.0, 2147483647.0, 2147483647.0);
        assert_eq!(doc.entities_extents_min, sentinel);
        assert_eq!(doc.streaming_extents_max, -sentinel);
    }

    /// A single small contribution replaces the sentinel exactly
    #[test]
    fn first_contribution_replaces_sentinel() {
        let doc = fold(&[ExtentContribution::car_generator(Vector3::new(0.0, 0.0, 0.0), 0.5)]);
        assert_eq!(doc.entities_extents_min, Vector3::new(-0.5, -0.5, -0.5));
        assert_eq!(doc.streaming_extents_max, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn cargen_streaming_is_twice_the_length() {
        let c = ExtentContribution::car_generator(Vector3::new(1.0, 2.0, 3.0), 2.5);
        assert_eq!(c.bbmin, Vector3::new(-1.5, -0.5, 0.5));
        assert_eq!(c.smax, Vector3::new(6.0, 7.0, 8.0));
    }

    #[test]
    fn box_occluder_uses_rounded_quarter_length() {
        // round(2 * 4) * 0.5 = 4
        let c = ExtentContribution::box_occluder(Vector3::new(0.0, 0.0, 0.0), Vector3::new(2.0, 9.0, 9.0));
        assert_eq!(c.bbmin, splat(-4.0));
        assert_eq!(c.bbmax, splat(4.0));
        assert_eq!(c.smin, c.bbmin);
    }

    #[test]
    fn entity_streaming_grows_by_lod_distance() {
        let mut node = SceneNode::new("prop", SollumType::Drawable);
        node.mesh = Some(Mesh::cuboid(splat(-1.0), splat(1.0)));
        let c = ExtentContribution::entity(&node, &identity(), 100.0);
        assert_eq!(c.bbmin, splat(-1.0));
        assert_eq!(c.smin, splat(-101.0));
        assert_eq!(c.smax, splat(101.0));
    }

    #[test]
    fn meshless_entity_contributes_its_position() {
        let mut node = SceneNode::new("prop", SollumType::Drawable);
        node.transform.location = [3.0, 4.0, 5.0];
        let world = node.transform.matrix();
        let c = ExtentContribution::entity(&node, &world, 0.0);
        assert_eq!(c.bbmin, Vector3::new(3.0, 4.0, 5.0));
        assert_eq!(c.bbmax, c.bbmin);
    }

    #[test]
    fn accumulation_is_monotonic() {
        let contributions = sample();
        let mut doc = MapDocument::default();
        for c in &contributions {
            let before = doc.clone();
            accumulate(&mut doc, c);
            assert!(doc.entities_extents_min.x <= before.entities_extents_min.x);
            assert!(doc.entities_extents_min.y <= before.entities_extents_min.y);
            assert!(doc.entities_extents_min.z <= before.entities_extents_min.z);
            assert!(doc.entities_extents_max.x >= before.entities_extents_max.x);
            assert!(doc.entities_extents_max.y >= before.entities_extents_max.y);
            assert!(doc.entities_extents_max.z >= before.entities_extents_max.z);
        }
        assert_eq!(doc.entities_extents_min, Vector3::new(-9.0, -8.0, -3.0));
        assert_eq!(doc.entities_extents_max, Vector3::new(12.0, 7.0, 5.0));
        assert_eq!(doc.streaming_extents_max, Vector3::new(14.0, 7.0, 5.0));
    }

    #[test]
    fn accumulation_is_order_independent() {
        let contributions = sample();
        let expected = fold(&contributions);

        let orders = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
        for order in orders {
            let permuted: Vec<_> = order.iter().map(|&i| contributions[i]).collect();
            assert_eq!(fold(&permuted), expected);
        }
    }
}
