//! Remote-bucket provider.

use super::{ResourceProvider, STATIC_PREFIX};

/// Create a resource provider that serves static resources from a remote
/// bucket such as Amazon S3 or Google Cloud Storage.
///
/// The URL is normalized at construction: one trailing `/` is removed, then
/// one trailing `/web` segment. Passing the bucket root or its `/web`
/// subpath therefore yields identical behavior.
pub fn remote_bucket(url: impl Into<String>) -> RemoteBucket {
    let mut url = url.into();
    if url.ends_with('/') {
        url.pop();
    }
    if url.ends_with(STATIC_PREFIX) {
        url.truncate(url.len() - STATIC_PREFIX.len());
    }
    RemoteBucket { url }
}

/// Provider backed by a remote object-storage bucket.
///
/// Pure path algebra: byte delivery is the bucket's responsibility, and app
/// resources stay on the conventional root of the serving host.
pub struct RemoteBucket {
    url: String,
}

impl ResourceProvider for RemoteBucket {
    fn app_resources(&self) -> &str {
        ""
    }

    fn static_resources(&self) -> &str {
        &self.url
    }
}
