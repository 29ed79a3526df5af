//! Command-line interface definitions and command implementations.

use std::net::IpAddr;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{ColorChoice, Parser, Subcommand};

use crate::config::Config;
use crate::provider::{self, ResourceProvider};
use crate::{log, serve};

/// webroot dev server and resource-URL resolver
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (default: webroot.toml)
    #[arg(short = 'C', long, default_value = "webroot.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve a local static-resource directory under /web
    #[command(visible_alias = "s")]
    Serve {
        /// Directory holding static resources (default: ./web)
        #[arg(value_hint = clap::ValueHint::DirPath)]
        dir: Option<PathBuf>,

        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the resolved resource URLs for a provider
    #[command(visible_alias = "u")]
    Urls {
        #[command(flatten)]
        args: UrlsArgs,
    },
}

/// Provider selection for the urls command.
#[derive(clap::Args, Debug, Clone)]
pub struct UrlsArgs {
    /// Remote bucket URL (e.g., https://storage.googleapis.com/myapp)
    #[arg(long, conflicts_with = "github_pages")]
    pub bucket: Option<String>,

    /// GitHub Pages repository name (e.g., my-app or /my-app)
    #[arg(long)]
    pub github_pages: Option<String>,
}

/// Execute the serve command: mount a local-directory provider and block on
/// the request loop until Ctrl+C.
pub fn run_serve(config: &Config) -> Result<()> {
    let dir = &config.serve.dir;
    if !dir.is_dir() {
        bail!(
            "static resource directory `{}` not found (pass a directory or set [serve] dir)",
            dir.display()
        );
    }

    let provider = provider::local_dir(dir);
    let bound = serve::bind_server(config.serve.interface, config.serve.port)?;
    log!(
        "serve";
        "{} mounted at {}",
        dir.display(),
        provider::STATIC_PREFIX
    );
    bound.run(provider)
}

/// Execute the urls command: print the five provider queries.
pub fn run_urls(args: &UrlsArgs, config: &Config) -> Result<()> {
    let provider: Box<dyn ResourceProvider> = if let Some(bucket) = &args.bucket {
        url::Url::parse(bucket).with_context(|| format!("invalid bucket URL `{bucket}`"))?;
        Box::new(provider::remote_bucket(bucket.clone()))
    } else if let Some(repo) = &args.github_pages {
        Box::new(provider::github_pages(repo.clone()))
    } else {
        Box::new(provider::local_dir(&config.serve.dir))
    };

    println!("app resources:    {}", display_root(provider.app_resources()));
    println!("static resources: {}", display_root(provider.static_resources()));
    println!("app.wasm:         {}", provider.app_wasm());
    println!("robots.txt:       {}", provider.robots_txt());
    println!("ads.txt:          {}", provider.ads_txt());
    Ok(())
}

/// Empty roots mean the conventional host root.
fn display_root(root: &str) -> &str {
    if root.is_empty() { "/" } else { root }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_root() {
        assert_eq!(display_root(""), "/");
        assert_eq!(display_root("/my-repo"), "/my-repo");
        assert_eq!(display_root("https://cdn.example.com"), "https://cdn.example.com");
    }

    #[test]
    fn test_cli_parses_serve_flags() {
        let cli = Cli::parse_from(["webroot", "serve", "assets", "-p", "9000", "-i", "0.0.0.0"]);
        match cli.command {
            Commands::Serve {
                dir,
                interface,
                port,
            } => {
                assert_eq!(dir, Some(PathBuf::from("assets")));
                assert_eq!(port, Some(9000));
                assert_eq!(interface, Some("0.0.0.0".parse().unwrap()));
            }
            _ => panic!("expected serve command"),
        }
    }

    #[test]
    fn test_cli_rejects_conflicting_providers() {
        let result = Cli::try_parse_from([
            "webroot",
            "urls",
            "--bucket",
            "https://cdn.example.com",
            "--github-pages",
            "my-repo",
        ]);
        assert!(result.is_err());
    }
}
