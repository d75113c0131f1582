//! Scripted viewport implementations backed by plain cells.

use std::cell::{Cell, RefCell};

use slicesync_core::error::{Result, SyncError};
use slicesync_core::geometry::{add_scaled, CameraPose, VolumeGeometry};
use slicesync_core::viewport::{StackViewport, VolumeViewport};

/// Camera parked over `slice`, looking down the volume's view-plane normal
/// with the eye 100 units behind the slice plane.
pub fn camera_at_slice(geometry: &VolumeGeometry, slice: usize) -> CameraPose {
    let normal = geometry.view_plane_normal();
    let focal_point = add_scaled(
        geometry.origin,
        normal,
        slice as f64 * geometry.slice_spacing(),
    );
    CameraPose {
        position: add_scaled(focal_point, normal, -100.0),
        focal_point,
        view_up: [0.0, -1.0, 0.0],
        parallel_scale: 150.0,
    }
}

/// In-memory volume viewport with a scriptable geometry slot.
pub struct ScriptedVolumeViewport {
    geometry: RefCell<Option<VolumeGeometry>>,
    poisoned: Cell<bool>,
    camera: RefCell<CameraPose>,
    renders: Cell<usize>,
}

impl ScriptedVolumeViewport {
    /// Viewport showing `geometry` with the camera parked over slice 0.
    pub fn new(geometry: VolumeGeometry) -> Self {
        let camera = camera_at_slice(&geometry, 0);
        Self {
            geometry: RefCell::new(Some(geometry)),
            poisoned: Cell::new(false),
            camera: RefCell::new(camera),
            renders: Cell::new(0),
        }
    }

    /// Viewport before any volume has been loaded.
    pub fn unloaded() -> Self {
        Self {
            geometry: RefCell::new(None),
            poisoned: Cell::new(false),
            camera: RefCell::new(CameraPose {
                position: [0.0, 0.0, -100.0],
                focal_point: [0.0; 3],
                view_up: [0.0, -1.0, 0.0],
                parallel_scale: 150.0,
            }),
            renders: Cell::new(0),
        }
    }

    /// Makes the geometry accessor fail until [`Self::heal`] is called.
    pub fn poison(&self) {
        self.poisoned.set(true);
    }

    pub fn heal(&self) {
        self.poisoned.set(false);
    }

    pub fn render_count(&self) -> usize {
        self.renders.get()
    }

    pub fn camera_pose(&self) -> CameraPose {
        self.camera.borrow().clone()
    }

    /// Moves the camera directly, bypassing the synchronizer, the way an
    /// external pan or jump tool would.
    pub fn jump_camera_to(&self, camera: CameraPose) {
        *self.camera.borrow_mut() = camera;
    }
}

impl VolumeViewport for ScriptedVolumeViewport {
    fn geometry(&self) -> Result<VolumeGeometry> {
        if self.poisoned.get() {
            return Err(SyncError::MissingGeometry);
        }
        self.geometry
            .borrow()
            .clone()
            .ok_or(SyncError::MissingGeometry)
    }

    fn camera(&self) -> CameraPose {
        self.camera.borrow().clone()
    }

    fn set_camera(&self, camera: &CameraPose) {
        *self.camera.borrow_mut() = camera.clone();
    }

    fn render(&self) {
        self.renders.set(self.renders.get() + 1);
    }
}

/// In-memory stack viewport.
///
/// `set_index` fires the optional `on_new_image` hook synchronously, the
/// way the rendering toolkit emits its "new image displayed" notification
/// during the index write.
pub struct ScriptedStackViewport {
    image_count: Cell<usize>,
    index: Cell<usize>,
    renders: Cell<usize>,
    index_writes: Cell<usize>,
    on_new_image: RefCell<Option<Box<dyn Fn()>>>,
}

impl ScriptedStackViewport {
    pub fn new(image_count: usize) -> Self {
        Self {
            image_count: Cell::new(image_count),
            index: Cell::new(0),
            renders: Cell::new(0),
            index_writes: Cell::new(0),
            on_new_image: RefCell::new(None),
        }
    }

    /// Registers a hook fired synchronously from inside `set_index`.
    pub fn set_on_new_image(&self, hook: impl Fn() + 'static) {
        *self.on_new_image.borrow_mut() = Some(Box::new(hook));
    }

    pub fn render_count(&self) -> usize {
        self.renders.get()
    }

    /// Number of `set_index` calls, including writes of the same value.
    pub fn index_write_count(&self) -> usize {
        self.index_writes.get()
    }

    /// Moves the index directly, bypassing the synchronizer.
    pub fn jump_to_index(&self, index: usize) {
        self.index.set(index);
    }
}

impl StackViewport for ScriptedStackViewport {
    fn image_count(&self) -> usize {
        self.image_count.get()
    }

    fn current_index(&self) -> usize {
        self.index.get()
    }

    fn set_index(&self, index: usize) {
        self.index.set(index);
        self.index_writes.set(self.index_writes.get() + 1);
        if let Some(hook) = self.on_new_image.borrow().as_ref() {
            hook();
        }
    }

    fn render(&self) {
        self.renders.set(self.renders.get() + 1);
    }
}
