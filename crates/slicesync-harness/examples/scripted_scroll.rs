//! Scrolls a synthetic 100-slice volume against a 10-image stack and
//! prints the slice alignment after every gesture.
//!
//! The engine's tracing output is shown at debug level by default; set
//! `RUST_LOG` to override.

use slicesync_core::geometry::VolumeGeometry;
use slicesync_core::sync::SyncConfig;
use slicesync_harness::script::SessionScript;
use slicesync_harness::viewport::{ScriptedStackViewport, ScriptedVolumeViewport};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let geometry = VolumeGeometry::axial((512, 512, 100), (0.7, 0.7, 2.5), [0.0; 3])
        .expect("valid geometry");
    let session = SessionScript::new(
        ScriptedVolumeViewport::new(geometry),
        ScriptedStackViewport::new(10),
        SyncConfig::default(),
    );

    println!("{:>22}  {:>12}  {:>11}", "gesture", "volume slice", "stack index");
    report(&session, "(wired)");

    for _ in 0..12 {
        session.wheel_volume(120.0);
        report(&session, "wheel down on volume");
    }

    for _ in 0..2 {
        session.wheel_stack(120.0);
        report(&session, "wheel down on stack");
    }

    session.jump_volume_to_slice(97);
    session.sync.sync_volume_to_stack();
    report(&session, "external jump to 97");

    // Three notches forward: two land on 98 and 99, the third is clamped.
    for _ in 0..3 {
        session.wheel_volume(120.0);
        report(&session, "wheel down on volume");
    }
}

fn report(session: &SessionScript, gesture: &str) {
    println!(
        "{:>22}  {:>12}  {:>11}",
        gesture,
        session.volume_slice().expect("volume loaded"),
        session.stack_index()
    );
}
