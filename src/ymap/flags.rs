use super::{Entity, LodLevel};

/// Map flags: the map carries script-loaded content.
pub const FLAG_SCRIPT_LOADED: u32 = 1 << 0;
/// Map flags: the map contains LOD-tier entities.
pub const FLAG_HAS_LOD: u32 = 1 << 1;

pub const CONTENT_HD: u32 = 1 << 0;
pub const CONTENT_LOD: u32 = 1 << 1;
pub const CONTENT_SLOD2_PLUS: u32 = 1 << 2;
pub const CONTENT_ANY_SLOD: u32 = 1 << 4;

/// Map and content flag bits one entity's LOD tier sets.
fn lod_level_bits(level: LodLevel) -> (u32, u32) {
    match level {
        LodLevel::Hd | LodLevel::OrphanHd => (0, CONTENT_HD),
        LodLevel::Lod => (FLAG_HAS_LOD, CONTENT_LOD),
        LodLevel::Slod1 => (FLAG_HAS_LOD, CONTENT_ANY_SLOD),
        LodLevel::Slod2 | LodLevel::Slod3 | LodLevel::Slod4 => {
            (FLAG_HAS_LOD, CONTENT_SLOD2_PLUS | CONTENT_ANY_SLOD)
        }
    }
}

/// Derive `(flags, content_flags)` from the emitted entities.
///
/// Both words are recomputed from scratch; whatever the editor stored is
/// ignored.
pub fn derive_flags(entities: &[Entity], script_loaded: bool) -> (u32, u32) {
    let mut flags = if script_loaded { FLAG_SCRIPT_LOADED } else { 0 };
    let mut content_flags = 0;

    for entity in entities {
        let (f, c) = lod_level_bits(entity.lod_level);
        flags |= f;
        content_flags |= c;
    }

    (flags, content_flags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::EntityProperties;
    use crate::scene::{SceneNode, SollumType};
    use crate::ymap::builders::entity_from_node;

    fn entities(levels: &[LodLevel]) -> Vec<Entity> {
        let node = SceneNode::new("prop", SollumType::Drawable);
        levels
            .iter()
            .map(|&lod_level| {
                entity_from_node(
                    &node,
                    &EntityProperties {
                        lod_level,
                        ..Default::default()
                    },
                )
            })
            .collect()
    }

    #[test]
    fn hd_and_slod2() {
        let (flags, content) = derive_flags(&entities(&[LodLevel::Hd, LodLevel::Slod2]), false);
        assert_eq!(flags, 2);
        assert_eq!(content, 21);
    }

    #[test]
    fn lod_only_with_script() {
        let (flags, content) = derive_flags(&entities(&[LodLevel::Lod]), true);
        assert_eq!(flags, 3);
        assert_eq!(content, 2);
    }

    #[test]
    fn orphan_hd_matches_hd() {
        let (flags, content) = derive_flags(&entities(&[LodLevel::OrphanHd]), false);
        assert_eq!(flags, 0);
        assert_eq!(content, 1);
    }

    #[test]
    fn slod1_sets_any_slod_only() {
        let (flags, content) = derive_flags(&entities(&[LodLevel::Slod1]), false);
        assert_eq!(flags, 2);
        assert_eq!(content, 16);
    }

    #[test]
    fn no_entities() {
        assert_eq!(derive_flags(&[], false), (0, 0));
        assert_eq!(derive_flags(&[], true), (1, 0));
    }

    #[test]
    fn order_does_not_matter() {
        let a = derive_flags(&entities(&[LodLevel::Slod4, LodLevel::Lod, LodLevel::Hd]), false);
        let b = derive_flags(&entities(&[LodLevel::Hd, LodLevel::Slod4, LodLevel::Lod]), false);
        assert_eq!(a, b);
        assert_eq!(a, (2, 23));
    }
}
