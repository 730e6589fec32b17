use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Log at debug level when `RUST_LOG` is not set.
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server.
    Serve(ServeArgs),
    /// Render one site path (e.g. `/id/about`) to stdout.
    Render(RenderArgs),
    /// Print the normalized JSON of a CMS resource.
    Fetch(FetchArgs),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Serve(_) => "serve",
            Self::Render(_) => "render",
            Self::Fetch(_) => "fetch",
        }
    }
}

#[derive(Clone, Args)]
pub struct CmsArgs {
    /// CMS base URL (must be http/https).
    #[arg(long, env = "CMS_URL")]
    pub cms_url: String,

    /// CMS API token sent as a bearer token.
    #[arg(long, env = "CMS_API_TOKEN", hide_env_values = true)]
    pub cms_token: Option<String>,
}

// Hand-written so tokens never reach the debug log.
impl std::fmt::Debug for CmsArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CmsArgs")
            .field("cms_url", &self.cms_url)
            .field("cms_token", &self.cms_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Clone, Args)]
pub struct SearchArgs {
    /// Search service host.
    #[arg(long, env = "SEARCH_HOST")]
    pub search_host: Option<String>,

    /// Search service API key.
    #[arg(long, env = "SEARCH_API_KEY", hide_env_values = true)]
    pub search_api_key: Option<String>,
}

impl std::fmt::Debug for SearchArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchArgs")
            .field("search_host", &self.search_host)
            .field(
                "search_api_key",
                &self.search_api_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

#[derive(Debug, Clone, Args)]
pub struct SiteArgs {
    #[command(flatten)]
    pub cms: CmsArgs,

    #[command(flatten)]
    pub search: SearchArgs,

    /// Accessibility widget token (widget is omitted when unset).
    #[arg(long, env = "ACCESSIBILITY_TOKEN")]
    pub accessibility_token: Option<String>,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    #[command(flatten)]
    pub site: SiteArgs,

    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:3000")]
    pub addr: SocketAddr,

    /// Static assets directory, served under `/assets` when it exists.
    #[arg(long, env = "ASSETS_DIR", default_value = "public")]
    pub assets_dir: PathBuf,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub site: SiteArgs,

    /// Site path including the locale prefix.
    #[arg(long, default_value = "/id")]
    pub path: String,
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    #[command(flatten)]
    pub cms: CmsArgs,

    /// Resource path below `/api`, e.g. `/pages`.
    #[arg(long)]
    pub path: String,

    /// Query parameters as a JSON object (nested filters/populate/sort/pagination).
    #[arg(long, default_value = "{}")]
    pub query: String,

    /// Print the response as returned, without normalizing entity shapes.
    #[arg(long)]
    pub raw: bool,
}
