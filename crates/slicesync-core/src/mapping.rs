//! Slice index mapping between a 3-D volume camera and a 2-D image stack.
//!
//! A camera pose determines a continuous position along the view-plane
//! normal; the stack shows one of `count` discrete images. Both are
//! normalized to a relative position in [0, 1] and cross-mapped by nearest
//! index, never by interpolation.

use crate::geometry::{dot, sub, CameraPose, Point3, VolumeGeometry};

/// Signed distance of the camera focal point from the volume origin along
/// the view-plane normal.
pub fn distance_along_normal(geometry: &VolumeGeometry, camera: &CameraPose) -> f64 {
    let normal: Point3 = geometry.view_plane_normal();
    dot(sub(camera.focal_point, geometry.origin), normal)
}

/// Volume slice index under the camera, unclamped.
///
/// Negative or >= nz when the camera has drifted outside the volume extent
/// (free-form pan tools can do this).
pub fn volume_slice_from_camera(geometry: &VolumeGeometry, camera: &CameraPose) -> i64 {
    (distance_along_normal(geometry, camera) / geometry.slice_spacing()).round() as i64
}

pub fn clamp_slice(slice: i64, count: usize) -> i64 {
    if count == 0 {
        return 0;
    }
    slice.clamp(0, count as i64 - 1)
}

/// Position of `index` within a `count`-long range, normalized to [0, 1].
/// A single-element range collapses to 0.
pub fn relative_position(index: i64, count: usize) -> f64 {
    if count <= 1 {
        return 0.0;
    }
    clamp_slice(index, count) as f64 / (count - 1) as f64
}

/// Nearest index in a `count`-long range at relative position `rel`.
pub fn index_at_relative(rel: f64, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    let index = (rel * (count - 1) as f64).round() as i64;
    clamp_slice(index, count) as usize
}

/// Stack index showing the same anatomy as the volume camera.
pub fn stack_index_for_camera(
    geometry: &VolumeGeometry,
    camera: &CameraPose,
    image_count: usize,
) -> usize {
    let slice_count = geometry.slice_count();
    let slice = clamp_slice(volume_slice_from_camera(geometry, camera), slice_count);
    index_at_relative(relative_position(slice, slice_count), image_count)
}

/// Inverse mapping: volume slice showing the same anatomy as stack `index`.
pub fn volume_slice_for_index(index: usize, image_count: usize, slice_count: usize) -> i64 {
    let rel = relative_position(index as i64, image_count);
    clamp_slice(
        (rel * slice_count.saturating_sub(1) as f64).round() as i64,
        slice_count,
    )
}
