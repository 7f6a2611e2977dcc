//! press - Terminal admin console for WordPress posts and Instagram imports

mod app;
mod csv_template;
mod feedback;
mod handlers;
mod repl;
mod transcript;
mod viewer;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use press_client::models::PostStatus;
use press_client::Config;
use std::path::PathBuf;

use app::App;
use handlers::{cache, chat, instagram, posts, refreshing, settled, site, Job, Outcome};
use transcript::Transcript;

#[derive(Parser, Debug)]
#[command(name = "press")]
#[command(about = "Terminal admin console for WordPress posts and Instagram imports", long_about = None)]
#[command(version)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    debug: bool,

    /// Backend API root (overrides the config file)
    #[arg(long)]
    base_url: Option<String>,

    /// Answer yes to every confirmation
    #[arg(short, long, default_value_t = false)]
    yes: bool,

    /// Subcommands (default: interactive chat)
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Interactive chat with the assistant
    Repl,
    /// Send one chat message
    Chat {
        /// Message text
        #[arg(required = true)]
        message: Vec<String>,
    },
    /// Site health check
    Health,
    /// List posts
    Posts {
        /// Only posts with this status
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },
    /// Search posts
    Search {
        query: String,
    },
    /// Create a post
    Create {
        /// Post title
        title: String,
        /// Post body
        content: String,
        /// Optional excerpt
        #[arg(long)]
        excerpt: Option<String>,
        /// Initial status
        #[arg(long, value_enum, default_value = "draft")]
        status: StatusArg,
    },
    /// Publish a draft
    Publish {
        id: u64,
    },
    /// Permanently delete a post
    Delete {
        id: u64,
    },
    /// List installed plugins
    Plugins,
    /// List users
    Users,
    /// Upload media from a URL
    Upload {
        url: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        alt: Option<String>,
    },
    /// Generate an AI image
    AiImage {
        /// Image description
        prompt: Vec<String>,
    },
    /// Check the Apify integration
    ApifyStatus,
    /// Scrape a user's recent posts
    ScrapeUser {
        username: String,
        /// Number of posts (default from config)
        #[arg(long)]
        limit: Option<u32>,
        /// Import the scraped posts as drafts when done
        #[arg(long, default_value_t = false)]
        import: bool,
    },
    /// Scrape a user and import the posts as drafts
    BulkImport {
        username: String,
        /// Number of posts (default from config)
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Scrape individual post URLs
    ScrapeUrls {
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// Import post URLs as drafts
    ImportUrls {
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// Look up an Instagram profile
    Profile {
        username: String,
    },
    /// Apify response cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
    /// Server-side image cache
    ImageCache {
        #[command(subcommand)]
        action: ImageCacheAction,
    },
    /// Write instagram_import_template.csv
    CsvTemplate {
        /// Target directory (default: current directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set the backend API root
    SetBaseUrl {
        url: String,
    },
    /// Set the request timeout in seconds (0 disables)
    SetTimeout {
        seconds: u64,
    },
}

#[derive(Subcommand, Debug)]
enum CacheAction {
    /// Show cache statistics
    Stats,
    /// Remove expired entries
    ClearExpired,
    /// Remove every entry for one user
    ClearUser { username: String },
    /// Remove every entry
    ClearAll,
}

#[derive(Subcommand, Debug)]
enum ImageCacheAction {
    /// Show image cache statistics
    Stats,
    /// Delete every cached image
    Clear,
    /// Cache one image and print its URL
    Resolve { url: String },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StatusArg {
    Draft,
    Publish,
    Pending,
    Private,
}

impl From<StatusArg> for PostStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Draft => PostStatus::Draft,
            StatusArg::Publish => PostStatus::Publish,
            StatusArg::Pending => PostStatus::Pending,
            StatusArg::Private => PostStatus::Private,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Some(Commands::Config { action }) = &args.command {
        return handle_config_command(action);
    }

    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.trim_end_matches('/').to_string();
    }
    log::debug!("Using backend {}", config.base_url);

    let mut app = App::new(config, Transcript::terminal());
    if args.yes {
        app = app.assume_yes();
    }

    let command = args.command.unwrap_or(Commands::Repl);
    if let Commands::Repl = command {
        return repl::run(&app).await;
    }

    let (outcome, job) = run_command(&app, command).await?;
    if let Some(job) = job {
        job.await.context("Background job failed")?;
    }
    app.tracker.stop_all();

    if outcome.is_failed() {
        std::process::exit(1);
    }
    Ok(())
}

/// Run one non-interactive command
async fn run_command(app: &App, command: Commands) -> Result<(Outcome, Option<Job>)> {
    let done = |outcome: Outcome| -> (Outcome, Option<Job>) { (outcome, None) };

    let result = match command {
        Commands::Config { .. } | Commands::Repl => done(Outcome::Unchanged),
        Commands::Chat { message } => done(chat::send_message(app, &message.join(" ")).await),
        Commands::Health => done(site::site_health(app).await),
        Commands::Posts { status } => match status {
            Some(status) => done(posts::load_by_status(app, status.into()).await),
            None => done(posts::load_posts(app).await),
        },
        Commands::Search { query } => done(posts::search_posts(app, &query).await),
        Commands::Create {
            title,
            content,
            excerpt,
            status,
        } => done(
            refreshing(
                app,
                posts::create_post(app, &title, &content, excerpt.as_deref(), status.into()),
            )
            .await,
        ),
        Commands::Publish { id } => done(refreshing(app, posts::publish_post(app, id)).await),
        Commands::Delete { id } => done(refreshing(app, posts::delete_post(app, id)).await),
        Commands::Plugins => done(site::list_plugins(app).await),
        Commands::Users => done(site::list_users(app).await),
        Commands::Upload { url, title, alt } => {
            done(site::upload_media(app, &url, title.as_deref(), alt.as_deref()).await)
        }
        Commands::AiImage { prompt } => done(site::generate_ai_image(app, &prompt.join(" ")).await),
        Commands::ApifyStatus => done(instagram::apify_status(app).await),
        Commands::ScrapeUser {
            username,
            limit,
            import,
        } => {
            let limit = limit.unwrap_or(app.config.scrape_limit);
            let (outcome, job) = instagram::scrape_user(app, &username, limit).await;
            if let Some(job) = job {
                job.await.context("Scrape job failed")?;
            }
            if import && !outcome.is_failed() {
                done(refreshing(app, instagram::import_all(app)).await)
            } else {
                (outcome, None)
            }
        }
        Commands::BulkImport { username, limit } => {
            let limit = limit.unwrap_or(app.config.bulk_import_limit);
            instagram::bulk_import(app, &username, limit).await
        }
        Commands::ScrapeUrls { urls } => {
            let (outcome, prefetch) = instagram::scrape_urls(app, &urls).await;
            (outcome, prefetch.map(settled))
        }
        Commands::ImportUrls { urls } => done(refreshing(app, instagram::import_urls(app, &urls)).await),
        Commands::Profile { username } => done(instagram::profile(app, &username).await),
        Commands::Cache { action } => done(match action {
            CacheAction::Stats => cache::apify_cache_stats(app).await,
            CacheAction::ClearExpired => cache::clear_expired_cache(app).await,
            CacheAction::ClearUser { username } => cache::clear_user_cache(app, &username).await,
            CacheAction::ClearAll => cache::clear_all_cache(app).await,
        }),
        Commands::ImageCache { action } => done(match action {
            ImageCacheAction::Stats => cache::image_cache_stats(app).await,
            ImageCacheAction::Clear => cache::clear_image_cache(app).await,
            ImageCacheAction::Resolve { url } => cache::resolve_image(app, &url).await,
        }),
        Commands::CsvTemplate { dir } => {
            let dir = match dir {
                Some(dir) => dir,
                None => std::env::current_dir().context("Failed to read current directory")?,
            };
            let path = csv_template::write_template(&dir)?;
            println!("CSV template written to {}", path.display());
            done(Outcome::Unchanged)
        }
    };
    Ok(result)
}

fn handle_config_command(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("Configuration file: {:?}", Config::config_path()?);
            println!();
            println!("base_url = \"{}\"", config.base_url);
            match config.request_timeout() {
                Some(timeout) => println!("request_timeout_secs = {}", timeout.as_secs()),
                None => println!("request_timeout_secs = 0 (disabled)"),
            }
            println!("prefetch_batch_size = {}", config.prefetch_batch_size);
            println!("prefetch_pause_ms = {}", config.prefetch_pause_ms);
            println!("scrape_limit = {}", config.scrape_limit);
            println!("bulk_import_limit = {}", config.bulk_import_limit);
            println!("post_list_limit = {}", config.post_list_limit);
            println!("search_limit = {}", config.search_limit);
        }
        ConfigAction::SetBaseUrl { url } => {
            let mut config = Config::load()?;
            config.base_url = url.trim_end_matches('/').to_string();
            config.save()?;
            println!("Backend URL set to: {}", config.base_url);
        }
        ConfigAction::SetTimeout { seconds } => {
            let mut config = Config::load()?;
            config.request_timeout_secs = *seconds;
            config.save()?;
            match config.request_timeout() {
                Some(_) => println!("Request timeout set to: {}s", seconds),
                None => println!("Request timeout disabled"),
            }
        }
    }
    Ok(())
}
