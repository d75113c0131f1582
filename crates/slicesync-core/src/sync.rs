//! Bidirectional slice synchronization between a 3-D volume viewport and a
//! 2-D image-stack viewport.
//!
//! Either side can be scrolled independently; the synchronizer keeps both
//! on the same anatomical slice via the relative-position mapping in
//! [`crate::mapping`], clamps at the volume boundaries, and uses a
//! re-entrancy guard so its own writes never trigger a second pass.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::event::{ViewportEvent, ViewportSide};
use crate::mapping;
use crate::tick::TickQueue;
use crate::viewport::{StackViewport, VolumeViewport};

/// Behavior switches for a synchronized viewport pair.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Align the stack to the volume camera as soon as the pair is wired.
    #[serde(default = "default_initial_sync")]
    pub initial_sync: bool,

    /// Reverse the wheel direction (scroll down moves toward slice 0).
    #[serde(default)]
    pub invert_wheel: bool,
}

fn default_initial_sync() -> bool {
    true
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            initial_sync: true,
            invert_wheel: false,
        }
    }
}

/// Result of one synchronization pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// A camera or index write happened and the affected viewport rendered.
    Applied,
    /// Both sides already showed the same slice.
    Unchanged,
    /// Nothing happened: another pass was in flight, no data was loaded, or
    /// the geometry accessor failed.
    Skipped,
}

/// Result of a wheel gesture delivered to [`SliceSynchronizer::handle_wheel`].
///
/// The host consumes the native gesture in every case; the outcome only
/// reports what the engine did with it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WheelOutcome {
    /// One-slice step applied locally; the cross-sync runs next tick.
    Applied,
    /// Step rejected: it would leave the valid slice range.
    AtBoundary,
    /// Gesture dropped: a pass was in flight, the delta was zero, or no
    /// data was loaded.
    Ignored,
}

/// Re-entrancy guard for one synchronized pair.
///
/// Owned by the synchronizer instance rather than module state, so
/// independent viewport pairs on the same page cannot interfere. The RAII
/// hold releases on every exit path, errors included, so one failed pass
/// cannot lock out future scroll input.
#[derive(Default)]
struct SyncGuard {
    active: Cell<bool>,
}

impl SyncGuard {
    fn try_hold(&self) -> Option<GuardHold<'_>> {
        if self.active.get() {
            return None;
        }
        self.active.set(true);
        Some(GuardHold { guard: self })
    }

    fn is_held(&self) -> bool {
        self.active.get()
    }
}

struct GuardHold<'a> {
    guard: &'a SyncGuard,
}

impl Drop for GuardHold<'_> {
    fn drop(&mut self) {
        self.guard.active.set(false);
    }
}

/// Keeps a volume/stack viewport pair showing the same slice.
pub struct SliceSynchronizer {
    volume: Rc<dyn VolumeViewport>,
    stack: Rc<dyn StackViewport>,
    queue: Rc<TickQueue>,
    guard: SyncGuard,
    config: SyncConfig,
    // Handle to ourselves for the deferred cross-sync closures.
    self_ref: Weak<Self>,
}

impl SliceSynchronizer {
    /// Wires a viewport pair together. The host forwards viewport
    /// notifications and wheel gestures to the returned synchronizer and
    /// drains `queue` once per frame.
    pub fn wire(
        volume: Rc<dyn VolumeViewport>,
        stack: Rc<dyn StackViewport>,
        queue: Rc<TickQueue>,
        config: SyncConfig,
    ) -> Rc<Self> {
        let initial_sync = config.initial_sync;
        let sync = Rc::new_cyclic(|self_ref| Self {
            volume,
            stack,
            queue,
            guard: SyncGuard::default(),
            config,
            self_ref: self_ref.clone(),
        });
        if initial_sync {
            sync.sync_volume_to_stack();
        }
        sync
    }

    /// True while a synchronization pass is in flight.
    pub fn is_syncing(&self) -> bool {
        self.guard.is_held()
    }

    /// Dispatches a typed host event to the matching entry point.
    pub fn handle_event(&self, event: ViewportEvent) {
        match event {
            ViewportEvent::CameraModified => self.on_camera_modified(),
            ViewportEvent::StackNewImage => self.on_stack_new_image(),
            ViewportEvent::Wheel { delta_y, side } => {
                self.handle_wheel(delta_y, side);
            }
        }
    }

    /// Passive listener for camera changes from tools this engine did not
    /// drive. No-op while a pass is in flight: that change was our own
    /// write, and reacting to it would loop.
    pub fn on_camera_modified(&self) {
        if self.guard.is_held() {
            return;
        }
        let Some(sync) = self.self_ref.upgrade() else {
            return;
        };
        self.queue.schedule(move || {
            sync.sync_volume_to_stack();
        });
    }

    /// Passive listener for "new image displayed" notifications from the
    /// stack side. Same guard discipline as [`Self::on_camera_modified`].
    pub fn on_stack_new_image(&self) {
        if self.guard.is_held() {
            return;
        }
        let Some(sync) = self.self_ref.upgrade() else {
            return;
        };
        self.queue.schedule(move || {
            sync.sync_stack_to_volume();
        });
    }

    /// Aligns the stack index to the slice under the volume camera.
    ///
    /// The current volume slice is recomputed from the camera on every call
    /// rather than tracked incrementally, so drift from external tools can
    /// never desynchronize the boundary check. A camera past the volume
    /// extent is first pulled back to the nearest valid slice.
    pub fn sync_volume_to_stack(&self) -> SyncOutcome {
        let Some(_hold) = self.guard.try_hold() else {
            return SyncOutcome::Skipped;
        };
        match self.volume_to_stack_pass() {
            Ok(outcome) => outcome,
            Err(err) => {
                debug!(error = %err, "volume-to-stack sync skipped");
                SyncOutcome::Skipped
            }
        }
    }

    fn volume_to_stack_pass(&self) -> Result<SyncOutcome> {
        let geometry = self.volume.geometry()?;
        let image_count = self.stack.image_count();
        if image_count == 0 {
            return Ok(SyncOutcome::Skipped);
        }

        let camera = self.volume.camera();
        let slice_count = geometry.slice_count();
        let current = mapping::volume_slice_from_camera(&geometry, &camera);
        let clamped = mapping::clamp_slice(current, slice_count);

        let mut applied = false;
        if clamped != current {
            let correction = (clamped - current) as f64 * geometry.slice_spacing();
            let corrected = camera.shifted_along(geometry.view_plane_normal(), correction);
            debug!(
                drifted_slice = current,
                corrected_slice = clamped,
                "camera outside volume extent, pulling back"
            );
            self.volume.set_camera(&corrected);
            self.volume.render();
            applied = true;
        }

        let target =
            mapping::index_at_relative(mapping::relative_position(clamped, slice_count), image_count);
        if target != self.stack.current_index() {
            self.stack.set_index(target);
            self.stack.render();
            applied = true;
        }

        Ok(if applied {
            SyncOutcome::Applied
        } else {
            SyncOutcome::Unchanged
        })
    }

    /// Moves the volume camera to the slice matching the current stack
    /// index, preserving view-up, zoom, and in-plane pan.
    pub fn sync_stack_to_volume(&self) -> SyncOutcome {
        let Some(_hold) = self.guard.try_hold() else {
            return SyncOutcome::Skipped;
        };
        match self.stack_to_volume_pass() {
            Ok(outcome) => outcome,
            Err(err) => {
                debug!(error = %err, "stack-to-volume sync skipped");
                SyncOutcome::Skipped
            }
        }
    }

    fn stack_to_volume_pass(&self) -> Result<SyncOutcome> {
        let geometry = self.volume.geometry()?;
        let image_count = self.stack.image_count();
        if image_count == 0 {
            return Ok(SyncOutcome::Skipped);
        }

        let slice_count = geometry.slice_count();
        let target =
            mapping::volume_slice_for_index(self.stack.current_index(), image_count, slice_count);

        let camera = self.volume.camera();
        let current = mapping::volume_slice_from_camera(&geometry, &camera);
        if current == target {
            return Ok(SyncOutcome::Unchanged);
        }

        let distance = (target - current) as f64 * geometry.slice_spacing();
        let moved = camera.shifted_along(geometry.view_plane_normal(), distance);
        self.volume.set_camera(&moved);
        self.volume.render();
        Ok(SyncOutcome::Applied)
    }

    /// Handles a native wheel gesture on either viewport element.
    ///
    /// The step is one slice in the wheel direction, applied on the side
    /// being scrolled; the matching cross-sync is deferred to the next tick
    /// so the local render completes first. Steps that would leave the
    /// valid range are rejected without any render side effect.
    pub fn handle_wheel(&self, delta_y: f64, side: ViewportSide) -> WheelOutcome {
        let Some(_hold) = self.guard.try_hold() else {
            return WheelOutcome::Ignored;
        };

        let step = wheel_step(delta_y, self.config.invert_wheel);
        if step == 0 {
            return WheelOutcome::Ignored;
        }

        let outcome = match side {
            ViewportSide::Volume => self.wheel_volume(step),
            ViewportSide::Stack => self.wheel_stack(step),
        };
        match outcome {
            Ok(outcome) => outcome,
            Err(err) => {
                debug!(error = %err, ?side, "wheel step skipped");
                WheelOutcome::Ignored
            }
        }
    }

    fn wheel_volume(&self, step: i64) -> Result<WheelOutcome> {
        let geometry = self.volume.geometry()?;
        let camera = self.volume.camera();
        let slice_count = geometry.slice_count() as i64;

        let current = mapping::volume_slice_from_camera(&geometry, &camera);
        let target = current + step;
        if target < 0 || target >= slice_count {
            return Ok(WheelOutcome::AtBoundary);
        }

        let moved = camera.shifted_along(
            geometry.view_plane_normal(),
            step as f64 * geometry.slice_spacing(),
        );
        self.volume.set_camera(&moved);
        self.volume.render();
        debug!(slice = target, "volume wheel step");

        if let Some(sync) = self.self_ref.upgrade() {
            self.queue.schedule(move || {
                sync.sync_volume_to_stack();
            });
        }
        Ok(WheelOutcome::Applied)
    }

    fn wheel_stack(&self, step: i64) -> Result<WheelOutcome> {
        let image_count = self.stack.image_count() as i64;
        if image_count == 0 {
            return Ok(WheelOutcome::Ignored);
        }

        let target = self.stack.current_index() as i64 + step;
        if target < 0 || target >= image_count {
            return Ok(WheelOutcome::AtBoundary);
        }

        self.stack.set_index(target as usize);
        self.stack.render();
        debug!(index = target, "stack wheel step");

        if let Some(sync) = self.self_ref.upgrade() {
            self.queue.schedule(move || {
                sync.sync_stack_to_volume();
            });
        }
        Ok(WheelOutcome::Applied)
    }
}

/// Maps a raw wheel delta to a one-slice step: positive delta scrolls
/// forward, negative backward, zero is dropped.
fn wheel_step(delta_y: f64, invert: bool) -> i64 {
    let step = if delta_y > 0.0 {
        1
    } else if delta_y < 0.0 {
        -1
    } else {
        0
    };
    if invert {
        -step
    } else {
        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wheel_step_sign() {
        assert_eq!(wheel_step(120.0, false), 1);
        assert_eq!(wheel_step(-3.5, false), -1);
        assert_eq!(wheel_step(0.0, false), 0);
    }

    #[test]
    fn test_wheel_step_inverted() {
        assert_eq!(wheel_step(120.0, true), -1);
        assert_eq!(wheel_step(-120.0, true), 1);
        assert_eq!(wheel_step(0.0, true), 0);
    }

    #[test]
    fn test_guard_blocks_nested_hold() {
        let guard = SyncGuard::default();
        let hold = guard.try_hold();
        assert!(hold.is_some());
        assert!(guard.is_held());
        assert!(guard.try_hold().is_none());
        drop(hold);
        assert!(!guard.is_held());
        assert!(guard.try_hold().is_some());
    }

    #[test]
    fn test_guard_releases_on_panic() {
        let guard = SyncGuard::default();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _hold = guard.try_hold();
            panic!("pass failed");
        }));
        assert!(result.is_err());
        assert!(!guard.is_held());
    }
}
