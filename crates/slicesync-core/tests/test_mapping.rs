use approx::assert_relative_eq;

use slicesync_core::geometry::{CameraPose, Point3, VolumeGeometry};
use slicesync_core::mapping::{
    clamp_slice, distance_along_normal, index_at_relative, relative_position,
    stack_index_for_camera, volume_slice_for_index, volume_slice_from_camera,
};

fn axial_geometry(nz: usize, sz: f64) -> VolumeGeometry {
    VolumeGeometry::axial((512, 512, nz), (0.7, 0.7, sz), [0.0, 0.0, 0.0]).unwrap()
}

fn camera_at(focal_point: Point3) -> CameraPose {
    CameraPose {
        position: [focal_point[0], focal_point[1], focal_point[2] - 100.0],
        focal_point,
        view_up: [0.0, -1.0, 0.0],
        parallel_scale: 150.0,
    }
}

// ---------------------------------------------------------------------------
// Camera projection
// ---------------------------------------------------------------------------

#[test]
fn test_distance_along_normal_identity_direction() {
    let geometry = axial_geometry(10, 2.0);
    let camera = camera_at([5.0, -3.0, 8.0]);
    assert_relative_eq!(distance_along_normal(&geometry, &camera), 8.0);
}

#[test]
fn test_distance_along_normal_offset_origin() {
    let mut geometry = axial_geometry(10, 2.0);
    geometry.origin = [10.0, 20.0, 30.0];
    let camera = camera_at([0.0, 0.0, 34.0]);
    assert_relative_eq!(distance_along_normal(&geometry, &camera), 4.0);
}

#[test]
fn test_distance_along_normal_flipped_direction() {
    // Normal pointing along -Z: moving the focal point up in Z decreases
    // the projected distance.
    let geometry = VolumeGeometry::new(
        (64, 64, 20),
        (1.0, 1.0, 1.5),
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, -1.0],
    )
    .unwrap();
    let camera = camera_at([0.0, 0.0, 6.0]);
    assert_relative_eq!(distance_along_normal(&geometry, &camera), -6.0);
}

#[test]
fn test_volume_slice_rounds_to_nearest() {
    let geometry = axial_geometry(10, 2.0);
    assert_eq!(volume_slice_from_camera(&geometry, &camera_at([0.0, 0.0, 4.9])), 2);
    assert_eq!(volume_slice_from_camera(&geometry, &camera_at([0.0, 0.0, 5.1])), 3);
}

#[test]
fn test_volume_slice_can_be_negative() {
    let geometry = axial_geometry(10, 2.0);
    let camera = camera_at([0.0, 0.0, -6.0]);
    assert_eq!(volume_slice_from_camera(&geometry, &camera), -3);
}

// ---------------------------------------------------------------------------
// Relative-position mapping
// ---------------------------------------------------------------------------

#[test]
fn test_round_trip_when_counts_match() {
    // nz = 10 and imageCount = 10: the mapping is 1:1 both ways.
    for k in 0..10 {
        let rel = relative_position(k, 10);
        let stack = index_at_relative(rel, 10);
        assert_eq!(stack as i64, k);
        assert_eq!(volume_slice_for_index(stack, 10, 10), k);
    }
}

#[test]
fn test_proportional_mapping() {
    // Volume slice 50 of 100 maps to round(50/99 * 9) = 5 of 10.
    let rel = relative_position(50, 100);
    assert_eq!(index_at_relative(rel, 10), 5);
}

#[test]
fn test_rounding_is_half_away_from_zero() {
    // rel * (count - 1) = 0.5 * 5 = 2.5 rounds up to 3, not to even.
    assert_eq!(index_at_relative(0.5, 6), 3);
}

#[test]
fn test_relative_position_clamps_out_of_range_slice() {
    assert_relative_eq!(relative_position(-5, 10), 0.0);
    assert_relative_eq!(relative_position(25, 10), 1.0);
}

#[test]
fn test_single_slice_volume_collapses_to_zero() {
    assert_relative_eq!(relative_position(0, 1), 0.0);
    assert_relative_eq!(relative_position(7, 1), 0.0);
    for index in [0, 3, 9] {
        assert_eq!(volume_slice_for_index(index, 10, 1), 0);
    }
}

#[test]
fn test_single_image_stack_always_index_zero() {
    for slice in [0, 4, 9] {
        assert_eq!(index_at_relative(relative_position(slice, 10), 1), 0);
    }
}

#[test]
fn test_empty_ranges_map_to_zero() {
    assert_eq!(index_at_relative(0.8, 0), 0);
    assert_eq!(clamp_slice(5, 0), 0);
    assert_eq!(volume_slice_for_index(0, 0, 10), 0);
}

// ---------------------------------------------------------------------------
// End-to-end camera-to-stack mapping
// ---------------------------------------------------------------------------

#[test]
fn test_stack_index_for_camera_mid_volume() {
    let geometry = axial_geometry(100, 1.0);
    let camera = camera_at([0.0, 0.0, 50.0]);
    assert_eq!(stack_index_for_camera(&geometry, &camera, 10), 5);
}

#[test]
fn test_stack_index_for_drifted_camera_clamps() {
    let geometry = axial_geometry(10, 2.0);
    let below = camera_at([0.0, 0.0, -40.0]);
    let above = camera_at([0.0, 0.0, 400.0]);
    assert_eq!(stack_index_for_camera(&geometry, &below, 10), 0);
    assert_eq!(stack_index_for_camera(&geometry, &above, 10), 9);
}

#[test]
fn test_inverse_mapping_upsamples_stack_to_volume() {
    // 10-image stack against a 100-slice volume: index 5 lands on
    // round(5/9 * 99) = 55.
    assert_eq!(volume_slice_for_index(5, 10, 100), 55);
    assert_eq!(volume_slice_for_index(0, 10, 100), 0);
    assert_eq!(volume_slice_for_index(9, 10, 100), 99);
}
