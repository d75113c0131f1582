use crate::error::{Result, SyncError};

/// A position or direction in patient space, in physical units (mm).
pub type Point3 = [f64; 3];

pub fn dot(a: Point3, b: Point3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn sub(a: Point3, b: Point3) -> Point3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// `p + t * dir`
pub fn add_scaled(p: Point3, dir: Point3, t: f64) -> Point3 {
    [p[0] + t * dir[0], p[1] + t * dir[1], p[2] + t * dir[2]]
}

/// Physical layout of a loaded volume.
///
/// Immutable once built; a newly loaded volume replaces it wholesale.
#[derive(Clone, Debug, PartialEq)]
pub struct VolumeGeometry {
    /// Voxel counts (nx, ny, nz).
    pub dimensions: (usize, usize, usize),
    /// Physical units per voxel (sx, sy, sz).
    pub spacing: (f64, f64, f64),
    /// Patient-space position of voxel (0, 0, 0).
    pub origin: Point3,
    /// Row-major 3x3 direction-cosine matrix mapping voxel axes to
    /// patient axes.
    pub direction: [f64; 9],
}

impl VolumeGeometry {
    pub fn new(
        dimensions: (usize, usize, usize),
        spacing: (f64, f64, f64),
        origin: Point3,
        direction: [f64; 9],
    ) -> Result<Self> {
        let (nx, ny, nz) = dimensions;
        if nz == 0 {
            return Err(SyncError::InvalidDimensions { nx, ny, nz });
        }
        if spacing.2 <= 0.0 {
            return Err(SyncError::InvalidSpacing(spacing.2));
        }
        Ok(Self {
            dimensions,
            spacing,
            origin,
            direction,
        })
    }

    /// Axis-aligned geometry with an identity direction matrix, the common
    /// case for axial acquisitions.
    pub fn axial(
        dimensions: (usize, usize, usize),
        spacing: (f64, f64, f64),
        origin: Point3,
    ) -> Result<Self> {
        Self::new(
            dimensions,
            spacing,
            origin,
            [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
        )
    }

    /// Number of slices along the view-plane normal.
    pub fn slice_count(&self) -> usize {
        self.dimensions.2
    }

    /// Physical distance between adjacent slices.
    pub fn slice_spacing(&self) -> f64 {
        self.spacing.2
    }

    /// Unit vector perpendicular to the displayed slice plane: the third
    /// column of the direction-cosine matrix.
    pub fn view_plane_normal(&self) -> Point3 {
        [self.direction[2], self.direction[5], self.direction[8]]
    }
}

/// Current view of the volume viewport.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraPose {
    /// Eye position.
    pub position: Point3,
    pub focal_point: Point3,
    pub view_up: Point3,
    pub parallel_scale: f64,
}

impl CameraPose {
    /// Pose translated by `distance` along `normal`. View-up and zoom are
    /// preserved, so pan and orientation survive slice changes.
    pub fn shifted_along(&self, normal: Point3, distance: f64) -> Self {
        Self {
            position: add_scaled(self.position, normal, distance),
            focal_point: add_scaled(self.focal_point, normal, distance),
            view_up: self.view_up,
            parallel_scale: self.parallel_scale,
        }
    }
}
