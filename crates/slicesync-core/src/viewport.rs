//! Narrow capability traits for the two viewport kinds the synchronizer
//! depends on. The rendering toolkit behind them is out of scope; these are
//! the whole contract.

use crate::error::Result;
use crate::geometry::{CameraPose, VolumeGeometry};

/// Camera side of a 3-D volume viewport.
pub trait VolumeViewport {
    /// Geometry of the loaded volume. Fails while no volume is loaded,
    /// which is a normal transient state early in a session.
    fn geometry(&self) -> Result<VolumeGeometry>;

    fn camera(&self) -> CameraPose;

    fn set_camera(&self, camera: &CameraPose);

    /// Flush pending drawing for this viewport.
    fn render(&self);
}

/// Index side of a 2-D image-stack viewport.
pub trait StackViewport {
    /// Number of images in the stack; 0 while nothing is loaded.
    fn image_count(&self) -> usize;

    fn current_index(&self) -> usize;

    fn set_index(&self, index: usize);

    fn render(&self);
}
