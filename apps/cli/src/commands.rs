//! CLI command definitions, routing, and tracing setup.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use clinicsite_content::{ConfiguredSource, Resolver};
use clinicsite_core::{
    BuildResult, NOT_FOUND, ProgressReporter, ROUTES, SiteContext, build_site, render_route,
    router, validate_routes,
};
use clinicsite_shared::{AppConfig, init_config, load_config, load_config_from};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// clinicsite: SEO-complete pages for the clinic, with optional CMS content.
#[derive(Parser)]
#[command(
    name = "clinicsite",
    version,
    about = "Render, build, and serve the clinic website with optional WordPress content.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to ~/.clinicsite/clinicsite.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Render every route to a static directory.
    Build {
        /// Output directory.
        #[arg(short, long, default_value = "dist")]
        out: PathBuf,
    },

    /// Print one rendered page.
    Render {
        /// Route path, e.g. /faq.
        path: String,
    },

    /// Print a page's meta tags and JSON-LD as JSON.
    Meta {
        /// Route path, e.g. /faq.
        path: String,
    },

    /// Serve pages over HTTP, rendering each request.
    Serve {
        /// Address to bind.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on.
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "clinicsite=info",
        1 => "clinicsite=debug",
        _ => "clinicsite=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr so `render` and `meta` output stays pipeable.
    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Command::Build { out } => cmd_build(config_path, &out).await,
        Command::Render { path } => cmd_render(config_path, &path).await,
        Command::Meta { path } => cmd_meta(config_path, &path).await,
        Command::Serve { host, port } => cmd_serve(config_path, &host, port).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show(config_path).await,
        },
    }
}

/// Load config, apply env overrides.
fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let mut config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    config.apply_env();
    Ok(config)
}

/// Everything a render needs, validated. Any error here is fatal.
fn prepare(path: Option<&Path>) -> Result<(Resolver<ConfiguredSource>, SiteContext)> {
    validate_routes(ROUTES)?;
    validate_routes(std::slice::from_ref(&NOT_FOUND))?;

    let config = resolve_config(path)?;
    let site = SiteContext::from_config(&config)?;
    let source = ConfiguredSource::from_config(&config.content)?;
    let resolver = Resolver::new(source, config.content.timeout());

    Ok((resolver, site))
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_build(config_path: Option<&Path>, out: &Path) -> Result<()> {
    let (resolver, site) = prepare(config_path)?;

    info!(out = %out.display(), origin = %site.origin, "building site");

    let reporter = CliProgress::new();
    let result = build_site(&resolver, &site, out, &reporter).await?;

    println!();
    println!("  Site built successfully!");
    println!("  Pages:    {}", result.page_count);
    println!("  Enriched: {}", result.enriched_count);
    println!("  Path:     {}", result.out_dir.display());
    println!("  Time:     {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

async fn cmd_render(config_path: Option<&Path>, path: &str) -> Result<()> {
    let (resolver, site) = prepare(config_path)?;
    let page = render_route(&resolver, &site, path).await;
    print!("{}", page.html);
    Ok(())
}

async fn cmd_meta(config_path: Option<&Path>, path: &str) -> Result<()> {
    let (resolver, site) = prepare(config_path)?;
    let page = render_route(&resolver, &site, path).await;

    println!("{}", serde_json::to_string_pretty(&page.meta_json())?);
    Ok(())
}

async fn cmd_serve(config_path: Option<&Path>, host: &str, port: u16) -> Result<()> {
    let (resolver, site) = prepare(config_path)?;

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| eyre!("invalid listen address '{host}:{port}': {e}"))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| eyre!("failed to bind {addr}: {e}"))?;

    info!(%addr, "serving site");
    println!("Serving on http://{addr}");

    axum::serve(listener, router(resolver, site))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;

    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn page_rendered(&self, path: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Rendering [{current}/{total}] {path}"));
    }

    fn done(&self, _result: &BuildResult) {
        self.spinner.finish_and_clear();
    }
}
