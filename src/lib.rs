//! Reading systemd `os-release` files.
//!
//! This crate parses the `os-release(5)` format into an [`OsRelease`] describing the identity of
//! an operating system.  The format is a small subset of shell variable assignments; see the
//! [`parser`] module for the exact grammar.  Parsing is strict: anything outside of the grammar,
//! including `$VAR` references, is an error rather than being passed through or expanded.
//!
//! ```
//! let osrel = osrel::parse_string("ID=centos\nID_LIKE=\"rhel fedora\"").unwrap();
//! assert!(osrel.is_like("fedora"));
//! assert_eq!(osrel.name(), "Linux");
//! ```
//!
//! Use [`current()`] to read the file describing the running system.

#![forbid(unsafe_code)]
#![deny(missing_debug_implementations)]

mod error;
pub mod os_release;
pub mod parser;

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use log::debug;

pub use crate::{
    error::{Error, Origin, Result},
    os_release::{OsRelease, Urls},
};

/// The locations of the os-release file, in the order they're checked.
pub const KNOWN_PATHS: [&str; 2] = ["/etc/os-release", "/usr/lib/os-release"];

/// Parses the contents of an os-release file.
pub fn parse_string(text: &str) -> Result<OsRelease> {
    let assignments = parser::parse(text).map_err(|source| Error::Parse {
        origin: Origin::string(text),
        source,
    })?;
    Ok(OsRelease::from_assignments(assignments))
}

/// Reads and parses the os-release file at `path`.
///
/// Returns [`Error::NotFound`] if the file doesn't exist.
pub fn read(path: impl AsRef<Path>) -> Result<OsRelease> {
    let path = path.as_ref();
    debug!("reading {path:?}");

    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(Error::NotFound {
                paths: vec![path.to_path_buf()],
            })
        }
        Err(source) => {
            return Err(Error::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let assignments = parser::parse(&text).map_err(|source| Error::Parse {
        origin: Origin::File(path.to_path_buf()),
        source,
    })?;
    Ok(OsRelease::from_assignments(assignments))
}

/// Reads the first of `paths` which exists.
///
/// Only missing files are skipped: if a file exists but can't be read or parsed, that error is
/// returned without looking any further.  If none of the files exist, the error lists all of
/// them.
pub fn current_from<P: AsRef<Path>>(paths: &[P]) -> Result<OsRelease> {
    for path in paths {
        match read(path) {
            Err(Error::NotFound { .. }) => debug!("{:?} doesn't exist", path.as_ref()),
            result => return result,
        }
    }

    Err(Error::NotFound {
        paths: paths.iter().map(|p| p.as_ref().to_path_buf()).collect(),
    })
}

/// Reads the os-release file of the running system.
///
/// This tries `/etc/os-release` and then `/usr/lib/os-release`.
pub fn current() -> Result<OsRelease> {
    current_from(&KNOWN_PATHS)
}

/// Reads the os-release file of the system image rooted at `root`.
///
/// The [`KNOWN_PATHS`] are looked up relative to `root`, which is useful for inspecting a
/// mounted image or a sysroot.
pub fn current_in(root: impl AsRef<Path>) -> Result<OsRelease> {
    let root = root.as_ref();
    let paths: Vec<PathBuf> = KNOWN_PATHS
        .iter()
        .map(|p| root.join(p.trim_start_matches('/')))
        .collect();
    current_from(&paths)
}

/// Returns true if `id` is the [`OsRelease::id()`] of `osrel` or one of its
/// [`OsRelease::id_like()`] entries.
pub fn is_like(osrel: &OsRelease, id: &str) -> bool {
    osrel.is_like(id)
}
