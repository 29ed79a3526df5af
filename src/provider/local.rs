//! Local-directory provider.

use std::path::{Path, PathBuf};

use super::{ResourceProvider, STATIC_PREFIX};
use crate::serve::PrefixServer;

/// Create a resource provider that serves static resources from a local
/// directory located at the given path.
///
/// The directory does not need to exist at construction time; it is read on
/// every request the handler fulfills.
pub fn local_dir(dir: impl Into<PathBuf>) -> LocalDir {
    let dir = dir.into();
    LocalDir {
        handler: PrefixServer::new(STATIC_PREFIX, &dir),
        dir,
    }
}

/// Provider backed by a local directory.
///
/// Both resource roots are empty: app resources are served from the
/// conventional root of the host, and static assets are reachable under
/// `/web` through the bundled [`PrefixServer`] rather than by URL rewriting.
pub struct LocalDir {
    dir: PathBuf,
    handler: PrefixServer,
}

impl LocalDir {
    /// The configured static-resource directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The request handler serving `/web/...` from the configured directory.
    ///
    /// Kept separate from the locator queries: the handler owns the
    /// path-stripping-then-serving concern, nothing else.
    pub fn handler(&self) -> &PrefixServer {
        &self.handler
    }
}

impl ResourceProvider for LocalDir {
    fn app_resources(&self) -> &str {
        ""
    }

    fn static_resources(&self) -> &str {
        ""
    }
}
