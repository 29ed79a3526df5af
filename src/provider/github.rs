//! GitHub Pages provider.

use super::ResourceProvider;

/// Create a resource provider for a site hosted on GitHub Pages under the
/// given repository name.
///
/// A leading `/` is prepended when missing, yielding the canonical project
/// subpath. Use this provider only when generating a fully static,
/// pre-rendered site: GitHub Pages serves everything, app resources
/// included, from that fixed subpath, and there is no live request-handling
/// path behind it.
pub fn github_pages(repo: impl Into<String>) -> GitHubPages {
    let repo = repo.into();
    let repo = if repo.starts_with('/') {
        repo
    } else {
        format!("/{repo}")
    };
    GitHubPages { repo }
}

/// Provider backed by a GitHub Pages project subpath.
pub struct GitHubPages {
    repo: String,
}

impl ResourceProvider for GitHubPages {
    fn app_resources(&self) -> &str {
        &self.repo
    }

    fn static_resources(&self) -> &str {
        &self.repo
    }
}
