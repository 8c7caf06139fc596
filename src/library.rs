//! Media library: track model, media index queries and the read-access gate.

mod access;
mod index;
mod model;

pub use access::{DirectoryAccess, Permission, PermissionGate};
pub use index::{DirectoryIndex, LibraryError, MediaIndex};
pub use model::{Locator, MediaItem, Track};
