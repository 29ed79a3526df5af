//! webroot - resource location and static serving for wasm web-app runtimes.
//!
//! A web application's runtime needs two classes of files:
//!
//! - *App resources*: files the runtime requires at fixed root-relative
//!   paths (the manifest, the loader script).
//! - *Static resources*: application-supplied assets (the wasm binary,
//!   styles, scripts, images), always addressed under the reserved `/web`
//!   prefix so they never collide with app routes.
//!
//! The [`provider`] module answers where both classes live for a given
//! deployment (local directory, remote bucket, GitHub Pages). The [`serve`]
//! module backs the local-directory variant with an HTTP handler that maps
//! `/web/...` requests onto disk.

pub mod cli;
pub mod config;
pub mod logger;
pub mod mime;
pub mod provider;
pub mod serve;

pub use provider::{
    GitHubPages, LocalDir, RemoteBucket, ResourceProvider, github_pages, local_dir, remote_bucket,
};
