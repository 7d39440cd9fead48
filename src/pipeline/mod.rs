//! Pipeline: terminal state, input, the mounted render loop, and headless
//! snapshots.

pub mod input;
pub mod mount;
pub mod snapshot;
pub mod terminal;

pub use input::Action;
pub use mount::{MountHandle, MountOptions, mount, mount_with, run, tick};
pub use snapshot::{snapshot, snapshot_frame};
pub use terminal::{RenderMode, set_terminal_size, terminal_height, terminal_width};
