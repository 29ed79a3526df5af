//! URL to filesystem path resolution.

use std::path::{Path, PathBuf};

/// Resolve a request URL under `prefix` to a file below `root`, handling
/// index.html for directories.
///
/// Returns `None` when the URL does not carry the prefix as a whole
/// segment, when the path escapes the root, or when no file exists.
pub fn resolve(url: &str, prefix: &str, root: &Path) -> Option<PathBuf> {
    let clean = normalize_url(url);

    let rest = clean.strip_prefix(prefix)?;
    if !(rest.is_empty() || rest.starts_with('/')) {
        // "/website.png" must not match a "/web" prefix
        return None;
    }
    let rel = rest.trim_matches('/');

    // Reject paths with suspicious patterns early
    if rel.contains("..") {
        return None;
    }

    let local = root.join(rel);

    // Canonicalize to resolve symlinks and verify the path is under root.
    // This prevents traversal via symlinks or encoded sequences.
    let canonical = local.canonicalize().ok()?;
    let root_canonical = root.canonicalize().ok()?;

    if !canonical.starts_with(&root_canonical) {
        return None;
    }

    if canonical.is_file() {
        return Some(canonical);
    }

    if canonical.is_dir() {
        let index = canonical.join("index.html");
        if index.is_file() {
            return Some(index);
        }
    }

    None
}

/// Normalize URL: decode percent-encoding, strip query string and fragment,
/// ensure a leading slash.
fn normalize_url(url: &str) -> String {
    use percent_encoding::percent_decode_str;

    let path = url.split(['?', '#']).next().unwrap_or(url);
    let decoded = percent_decode_str(path)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_else(|_| path.to_string());

    if decoded.starts_with('/') {
        decoded
    } else {
        format!("/{decoded}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn setup() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("app.wasm"), b"\0asm").unwrap();
        fs::write(tmp.path().join("index.html"), b"<html></html>").unwrap();
        fs::create_dir(tmp.path().join("img")).unwrap();
        fs::write(tmp.path().join("img").join("logo file.png"), b"png").unwrap();
        tmp
    }

    #[test]
    fn test_resolve_file() {
        let tmp = setup();
        let path = resolve("/web/app.wasm", "/web", tmp.path()).unwrap();
        assert!(path.ends_with("app.wasm"));
    }

    #[test]
    fn test_resolve_missing_file() {
        let tmp = setup();
        assert!(resolve("/web/missing.txt", "/web", tmp.path()).is_none());
    }

    #[test]
    fn test_resolve_without_prefix() {
        let tmp = setup();
        assert!(resolve("/app.wasm", "/web", tmp.path()).is_none());
        assert!(resolve("/website.png", "/web", tmp.path()).is_none());
    }

    #[test]
    fn test_resolve_directory_index() {
        let tmp = setup();
        let path = resolve("/web/", "/web", tmp.path()).unwrap();
        assert!(path.ends_with("index.html"));

        let path = resolve("/web", "/web", tmp.path()).unwrap();
        assert!(path.ends_with("index.html"));
    }

    #[test]
    fn test_resolve_strips_query_string() {
        let tmp = setup();
        let path = resolve("/web/app.wasm?v=2", "/web", tmp.path()).unwrap();
        assert!(path.ends_with("app.wasm"));
    }

    #[test]
    fn test_resolve_percent_decoding() {
        let tmp = setup();
        let path = resolve("/web/img/logo%20file.png", "/web", tmp.path()).unwrap();
        assert!(path.ends_with("logo file.png"));
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let tmp = setup();
        fs::write(tmp.path().parent().unwrap().join("secret.txt"), b"x").ok();
        assert!(resolve("/web/../secret.txt", "/web", tmp.path()).is_none());
        assert!(resolve("/web/%2e%2e/secret.txt", "/web", tmp.path()).is_none());
    }
}
