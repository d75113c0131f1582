pub mod error;
pub mod event;
pub mod geometry;
pub mod mapping;
pub mod sync;
pub mod tick;
pub mod viewport;
