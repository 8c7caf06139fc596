use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::warn;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// Answers whether the player may read the media library.
pub trait PermissionGate {
    fn check(&self) -> Permission;
}

/// Denies access only when the OS refuses to list the library root.
///
/// Any other failure (missing root, root is a file) is granted so the index
/// query reports it and the player shows an empty library.
pub struct DirectoryAccess {
    root: PathBuf,
}

impl DirectoryAccess {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl PermissionGate for DirectoryAccess {
    fn check(&self) -> Permission {
        match fs::read_dir(&self.root) {
            Ok(_) => Permission::Granted,
            Err(err) if err.kind() == ErrorKind::PermissionDenied => {
                warn!(root = %self.root.display(), "library root is not readable");
                Permission::Denied
            }
            Err(err) => {
                warn!(root = %self.root.display(), error = %err, "cannot open library root");
                Permission::Granted
            }
        }
    }
}
