/// Which of the paired viewports an event originated from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewportSide {
    Volume,
    Stack,
}

/// Typed notifications delivered by the host UI layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewportEvent {
    /// The volume camera changed, by any tool, including ones this engine
    /// did not drive.
    CameraModified,

    /// The stack viewport displayed a new image.
    StackNewImage,

    /// A native wheel gesture on one of the viewport elements. The host is
    /// expected to suppress the toolkit's default scroll handling and
    /// forward the raw delta here.
    Wheel { delta_y: f64, side: ViewportSide },
}
