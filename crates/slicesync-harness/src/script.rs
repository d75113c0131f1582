//! A wired viewport pair driven by scripted input instead of a browser
//! event loop.

use std::rc::Rc;

use tracing::debug;

use slicesync_core::error::Result;
use slicesync_core::event::{ViewportEvent, ViewportSide};
use slicesync_core::mapping;
use slicesync_core::sync::{SliceSynchronizer, SyncConfig, WheelOutcome};
use slicesync_core::tick::TickQueue;
use slicesync_core::viewport::{StackViewport, VolumeViewport};

use crate::viewport::{camera_at_slice, ScriptedStackViewport, ScriptedVolumeViewport};

/// One synchronized viewing session: both scripted viewports, the tick
/// queue playing the host's frame loop, and the wired synchronizer.
pub struct SessionScript {
    pub volume: Rc<ScriptedVolumeViewport>,
    pub stack: Rc<ScriptedStackViewport>,
    pub queue: Rc<TickQueue>,
    pub sync: Rc<SliceSynchronizer>,
}

impl SessionScript {
    pub fn new(
        volume: ScriptedVolumeViewport,
        stack: ScriptedStackViewport,
        config: SyncConfig,
    ) -> Self {
        let volume = Rc::new(volume);
        let stack = Rc::new(stack);
        let queue = Rc::new(TickQueue::new());
        let sync = SliceSynchronizer::wire(
            Rc::clone(&volume) as Rc<dyn VolumeViewport>,
            Rc::clone(&stack) as Rc<dyn StackViewport>,
            Rc::clone(&queue),
            config,
        );
        Self {
            volume,
            stack,
            queue,
            sync,
        }
    }

    /// One wheel notch on the volume viewport, then one frame.
    pub fn wheel_volume(&self, delta_y: f64) -> WheelOutcome {
        let outcome = self.sync.handle_wheel(delta_y, ViewportSide::Volume);
        debug!(?outcome, "volume wheel");
        self.queue.run_tick();
        outcome
    }

    /// One wheel notch on the stack viewport, then one frame.
    pub fn wheel_stack(&self, delta_y: f64) -> WheelOutcome {
        let outcome = self.sync.handle_wheel(delta_y, ViewportSide::Stack);
        debug!(?outcome, "stack wheel");
        self.queue.run_tick();
        outcome
    }

    /// Delivers a host notification, then runs one frame.
    pub fn notify(&self, event: ViewportEvent) {
        self.sync.handle_event(event);
        self.queue.run_tick();
    }

    /// Runs frames until no deferred work remains.
    pub fn settle(&self) {
        while !self.queue.is_idle() {
            self.queue.run_tick();
        }
    }

    /// Parks the volume camera over `slice`, the way an external jump tool
    /// would, without notifying the synchronizer.
    pub fn jump_volume_to_slice(&self, slice: usize) {
        let geometry = self
            .volume
            .geometry()
            .expect("scripted volume has geometry");
        self.volume.jump_camera_to(camera_at_slice(&geometry, slice));
    }

    /// Volume slice currently under the camera, unclamped.
    pub fn volume_slice(&self) -> Result<i64> {
        let geometry = self.volume.geometry()?;
        Ok(mapping::volume_slice_from_camera(
            &geometry,
            &self.volume.camera(),
        ))
    }

    pub fn stack_index(&self) -> usize {
        self.stack.current_index()
    }
}
