//! Resource providers - where a web app's resources live and how their URLs form.
//!
//! App resources are the mandatory files a web-app runtime expects at fixed
//! root-relative paths. Eg:
//! ```text
//! /manifest.webmanifest
//! /app-loader.js
//! ```
//!
//! Static resources are the assets the application itself ships, such as the
//! wasm binary, styles, scripts, or images. They can live in a local
//! directory or on a remote bucket. To avoid collisions with app-resource
//! paths, static-resource URL paths are always prefixed by `/web`. Eg:
//! ```text
//! /web/app.wasm
//! /web/main.css
//! /web/background.jpg
//! ```
//!
//! Three providers exist, chosen at startup and immutable afterwards:
//! [`LocalDir`], [`RemoteBucket`], and [`GitHubPages`]. The [`LocalDir`]
//! provider additionally carries a request handler that serves `/web/...`
//! requests from disk (see [`LocalDir::handler`]).

mod github;
mod local;
mod remote;

pub use github::{GitHubPages, github_pages};
pub use local::{LocalDir, local_dir};
pub use remote::{RemoteBucket, remote_bucket};

/// Reserved path segment under which all static resources are addressed.
pub const STATIC_PREFIX: &str = "/web";

/// Well-known file name of the application's wasm binary.
pub const APP_WASM: &str = "app.wasm";

/// Well-known file name of the crawler-directives file.
pub const ROBOTS_TXT: &str = "robots.txt";

/// Well-known file name of the ads-declaration file.
pub const ADS_TXT: &str = "ads.txt";

/// Describes a provider for app and static resources.
///
/// All queries are pure functions of the provider's construction-time
/// configuration; none can fail and none observe the filesystem. The three
/// derived URLs are provided methods so they stay syntactically consistent
/// with [`static_resources`](ResourceProvider::static_resources) for every
/// implementation: always that root, then [`STATIC_PREFIX`], then the fixed
/// file name.
pub trait ResourceProvider: Send + Sync {
    /// Path to the root under which app resources are accessible. Empty when
    /// they are served from the conventional root.
    fn app_resources(&self) -> &str;

    /// Path or URL of the directory that contains static resources. Empty
    /// when they are served from the conventional root.
    fn static_resources(&self) -> &str;

    /// URL of the wasm binary: `static_resources() + "/web/app.wasm"`.
    fn app_wasm(&self) -> String {
        self.static_url(APP_WASM)
    }

    /// URL of the robots.txt file: `static_resources() + "/web/robots.txt"`.
    fn robots_txt(&self) -> String {
        self.static_url(ROBOTS_TXT)
    }

    /// URL of the ads.txt file: `static_resources() + "/web/ads.txt"`.
    fn ads_txt(&self) -> String {
        self.static_url(ADS_TXT)
    }

    /// Resolve a file name under the reserved static-resource prefix.
    fn static_url(&self, file: &str) -> String {
        format!("{}{}/{}", self.static_resources(), STATIC_PREFIX, file)
    }
}
