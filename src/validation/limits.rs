//! Engine-enforced limits for map content.

/// Maximum number of vertices in a model occluder. Triangle indices are
/// stored as single bytes.
pub const MAX_OCCLUDER_VERTICES: usize = 256;

/// Sentinel magnitude for empty map extents (`2^31 - 1`). Not representable
/// as `f32`, so document extents are kept in `f64`.
pub const EXTENTS_SENTINEL: f64 = i32::MAX as f64;

/// Bias added to the stored occluder triangle count.
pub const OCCLUDER_TRI_COUNT_BIAS: u32 = 32768;
