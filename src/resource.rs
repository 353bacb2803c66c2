// Template resource loading
//
//  Copyright (C) 2014-2022 Ryan Specialty Group, LLC.
//
//  This file is part of uibinder.
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Template resource loading.
//!
//! Templates are located by logical path,
//!   relative to the root of the host's source tree
//!     (e.g. `com/example/MyWidget.ui.xml`).
//! The host decides how those paths map onto storage;
//!   the compiler requires only [`ResourceOracle`].
//!
//!   - [`FsResourceOracle`] resolves paths against a directory on the
//!       filesystem; and
//!   - [`MemoryResourceOracle`] serves paths from memory,
//!       for hosts that have already loaded their sources.

use fxhash::FxHashMap;
use std::{
    error::Error,
    fmt::{self, Display},
    fs::File,
    io::{self, BufReader, Read},
    path::PathBuf,
};

/// Provider of template text by logical path.
pub trait ResourceOracle {
    fn load(&self, path: &str) -> Result<String, ResourceError>;
}

/// Resolves logical paths relative to a root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsResourceOracle {
    root: PathBuf,
}

impl FsResourceOracle {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }
}

impl ResourceOracle for FsResourceOracle {
    fn load(&self, path: &str) -> Result<String, ResourceError> {
        let full = self.root.join(path);
        let mut src = String::new();

        let file = File::open(&full).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ResourceError::NotFound(path.into()),
            _ => ResourceError::Io(path.into(), e),
        })?;

        BufReader::new(file)
            .read_to_string(&mut src)
            .map_err(|e| ResourceError::Io(path.into(), e))?;

        log::trace!("loaded {} bytes from {}", src.len(), full.display());

        Ok(src)
    }
}

/// Serves logical paths from memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryResourceOracle {
    files: FxHashMap<String, String>,
}

impl MemoryResourceOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<P: Into<String>, S: Into<String>>(
        &mut self,
        path: P,
        src: S,
    ) -> &mut Self {
        self.files.insert(path.into(), src.into());
        self
    }
}

impl ResourceOracle for MemoryResourceOracle {
    fn load(&self, path: &str) -> Result<String, ResourceError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound(path.into()))
    }
}

#[derive(Debug)]
pub enum ResourceError {
    /// No resource exists at the given path.
    NotFound(String),

    /// The resource exists but could not be read.
    Io(String, io::Error),
}

impl PartialEq for ResourceError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Io(a, e), Self::Io(b, f)) => a == b && e.kind() == f.kind(),
            _ => false,
        }
    }
}

impl Eq for ResourceError {}

impl Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "unable to find resource {path}"),
            Self::Io(path, e) => write!(f, "unable to read resource {path}: {e}"),
        }
    }
}

impl Error for ResourceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io(_, e) => Some(e),
        }
    }
}
