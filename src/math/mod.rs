use binrw::binrw;
use cgmath::{BaseFloat, Matrix3, Matrix4, Quaternion, Rad, Rotation3, Vector3, Vector4};

/// Little-endian `f32` triple as stored in packed occluder data.
#[binrw]
#[derive(Debug, Clone, Copy, PartialEq)]
#[br(little)]
pub struct LwVector3(
    #[br(map = |raw: [f32; 3]| Vector3::new(raw[0], raw[1], raw[2]))]
    #[bw(map = |v: &Vector3<f32>| [v.x, v.y, v.z])]
    pub Vector3<f32>,
);

/// Component-wise minimum of two vectors.
pub fn min_vector<S: BaseFloat>(a: Vector3<S>, b: Vector3<S>) -> Vector3<S> {
    Vector3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z))
}

/// Component-wise maximum of two vectors.
pub fn max_vector<S: BaseFloat>(a: Vector3<S>, b: Vector3<S>) -> Vector3<S> {
    Vector3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z))
}

/// Splat a scalar into all three components.
pub fn splat(v: f32) -> Vector3<f32> {
    Vector3::new(v, v, v)
}

/// Axis-aligned bounds of a point set, `None` when the set is empty.
pub fn bound_box<I>(points: I) -> Option<(Vector3<f32>, Vector3<f32>)>
where
    I: IntoIterator<Item = Vector3<f32>>,
{
    let mut iter = points.into_iter();
    let first = iter.next()?;
    Some(iter.fold((first, first), |(min, max), p| {
        (min_vector(min, p), max_vector(max, p))
    }))
}

/// Merge two optional boxes into one covering both.
pub fn union_box(
    a: Option<(Vector3<f32>, Vector3<f32>)>,
    b: Option<(Vector3<f32>, Vector3<f32>)>,
) -> Option<(Vector3<f32>, Vector3<f32>)> {
    match (a, b) {
        (Some((amin, amax)), Some((bmin, bmax))) => {
            Some((min_vector(amin, bmin), max_vector(amax, bmax)))
        }
        (Some(a), None) => Some(a),
        (None, b) => b,
    }
}

/// Center of the box spanned by `min`/`max`.
pub fn bound_center(min: Vector3<f32>, max: Vector3<f32>) -> Vector3<f32> {
    (min + max) * 0.5
}

/// The eight corners of an axis-aligned box.
pub fn box_corners(min: Vector3<f32>, max: Vector3<f32>) -> [Vector3<f32>; 8] {
    [
        Vector3::new(min.x, min.y, min.z),
        Vector3::new(min.x, min.y, max.z),
        Vector3::new(min.x, max.y, min.z),
        Vector3::new(min.x, max.y, max.z),
        Vector3::new(max.x, min.y, min.z),
        Vector3::new(max.x, min.y, max.z),
        Vector3::new(max.x, max.y, min.z),
        Vector3::new(max.x, max.y, max.z),
    ]
}

// ============================================================================
// Euler rotations (XYZ order, as the editor stores them)
// ============================================================================

/// Rotation matrix for an XYZ Euler triple: `Rz * Ry * Rx`.
pub fn euler_xyz_to_matrix3(euler: [f32; 3]) -> Matrix3<f32> {
    Matrix3::from_angle_z(Rad(euler[2]))
        * Matrix3::from_angle_y(Rad(euler[1]))
        * Matrix3::from_angle_x(Rad(euler[0]))
}

/// Quaternion for an XYZ Euler triple.
///
/// cgmath's `From<Euler>` composes in the opposite order, so the axis
/// rotations are multiplied out explicitly.
pub fn euler_xyz_to_quaternion(euler: [f32; 3]) -> Quaternion<f32> {
    Quaternion::from_angle_z(Rad(euler[2]))
        * Quaternion::from_angle_y(Rad(euler[1]))
        * Quaternion::from_angle_x(Rad(euler[0]))
}

/// Compose translation, XYZ Euler rotation and non-uniform scale.
pub fn trs_matrix(location: [f32; 3], euler: [f32; 3], scale: [f32; 3]) -> Matrix4<f32> {
    let translation = Matrix4::from_translation(Vector3::from(location));
    let rotation = Matrix4::from(euler_xyz_to_matrix3(euler));
    let scale = Matrix4::from_nonuniform_scale(scale[0], scale[1], scale[2]);
    translation * rotation * scale
}

pub fn transform_point(m: &Matrix4<f32>, p: Vector3<f32>) -> Vector3<f32> {
    let v = *m * Vector4::new(p.x, p.y, p.z, 1.0);
    Vector3::new(v.x, v.y, v.z)
}
