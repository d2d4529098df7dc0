//! `blog-client` command-line front end.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use blog_client::app::{App, AppEvent, ArticleFilters, Navigation};
use blog_client::config::ClientConfig;
use blog_client::debug::{self, LogConfig};
use blog_client::services::storage::FileStorage;
use blog_client::{AppError, Result};
use shared::{truncate_text, ArticleStatus, ArticleSummary, Notification};

#[derive(Parser)]
#[command(name = "blog-client")]
#[command(version)]
#[command(about = "Command-line client for the blog platform")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API root (e.g. http://127.0.0.1:8080/api)
    #[arg(long, env = "BLOG_API_URL", global = true)]
    api_url: Option<String>,

    /// Directory holding the saved session
    #[arg(long, env = "BLOG_CLIENT_HOME", global = true)]
    home: Option<PathBuf>,

    /// Mirror logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and save the session
    Login {
        username: String,
        #[arg(long, env = "BLOG_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account, then log in
    Register {
        username: String,
        #[arg(long, env = "BLOG_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        email: Option<String>,
    },
    /// End the session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Ask the server who the saved token belongs to
    Validate,
    /// Upload a new avatar image
    Avatar { file: PathBuf },
    /// List articles
    Articles {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        size: Option<u32>,
        /// PUBLISHED or DRAFT
        #[arg(long, conflicts_with_all = ["tag", "keyword"])]
        status: Option<ArticleStatus>,
        /// Repeat to require several tags
        #[arg(long, conflicts_with = "keyword")]
        tag: Vec<String>,
        #[arg(long)]
        keyword: Option<String>,
        #[arg(long)]
        author: Option<i64>,
    },
    /// List all tags
    Tags,
    /// Show one article with its comments
    Article { id: i64 },
    /// Like or unlike an article
    Like { id: i64 },
    /// Comment on an article
    Comment {
        id: i64,
        text: String,
        /// Reply to this comment id
        #[arg(long)]
        reply_to: Option<i64>,
    },
    /// Delete one of your articles
    Delete { id: i64 },
    /// List notifications
    Notifications {
        #[arg(long)]
        unread: bool,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Mark a notification read
    Read { id: i64 },
    /// Mark every notification read
    ReadAll,
    /// Poll notifications until Ctrl-C
    Watch {
        /// Poll interval in seconds
        #[arg(long)]
        interval: Option<u64>,
    },
    /// Check whether a front-end path may be opened
    Route { path: String },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env();
    log_config.log_to_stderr |= cli.verbose;
    let _log_guard = debug::init_logger(&log_config);

    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }
    if let Some(home) = cli.home {
        config.home_dir = home;
    }

    let storage = Arc::new(FileStorage::open_in(&config.home_dir)?);
    let app = App::new(&config, storage);

    match cli.command {
        Commands::Login { username, password } => {
            let user = app.session.login(&username, &password).await?;
            println!("Logged in as {}", user.display_name());
        }
        Commands::Register {
            username,
            password,
            email,
        } => {
            let user = app.session.register(&username, &password, email.as_deref()).await?;
            println!("Registered and logged in as {}", user.display_name());
        }
        Commands::Logout => {
            app.session.logout(false).await;
            println!("Logged out");
        }
        Commands::Whoami => {
            require_login(&app)?;
            let user = match app.session.fetch_profile().await {
                Some(user) => user,
                None => app.session.user().unwrap_or_default(),
            };
            println!("{} (id {})", user.display_name(), user.id.map_or("?".to_string(), |id| id.to_string()));
            if let Some(email) = &user.email {
                println!("  email:  {}", email);
            }
            if let Some(bio) = &user.bio {
                println!("  bio:    {}", bio);
            }
            if let Some(avatar) = &user.avatar_url {
                println!("  avatar: {}", avatar);
            }
        }
        Commands::Validate => {
            require_login(&app)?;
            let username = app.session.validate().await?;
            println!("Token valid for {}", username);
        }
        Commands::Avatar { file } => {
            require_login(&app)?;
            let bytes = std::fs::read(&file)
                .map_err(|e| AppError::Validation(format!("Cannot read {}: {}", file.display(), e)))?;
            let file_name = file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "avatar".to_string());
            let user = app.session.update_avatar(&file_name, bytes).await?;
            println!("Avatar updated: {}", user.avatar_url.unwrap_or_default());
        }
        Commands::Articles {
            page,
            size,
            status,
            tag,
            keyword,
            author,
        } => {
            let filters = ArticleFilters {
                status,
                tags: tag,
                keyword,
                author_id: author,
            };
            app.articles
                .fetch(page, size.unwrap_or(config.page_size), filters)
                .await?;
            let state = app.articles.state();
            for article in &state.items {
                print_article_line(article);
            }
            println!(
                "Page {}/{} ({} articles)",
                state.page,
                state.total_pages.max(1),
                state.total_count
            );
        }
        Commands::Tags => {
            app.articles.fetch_tags().await;
            let names: Vec<String> = app.articles.state().available_tags.into_iter().map(|t| t.name).collect();
            println!("{}", names.join(", "));
        }
        Commands::Article { id } => {
            let article = app.article.load(id).await?;
            let state = app.article.state();
            println!("# {}", article.title);
            if let Some(author) = article.author.as_ref().and_then(|a| a.username.as_deref()) {
                println!("by {}", author);
            }
            println!(
                "{} likes{}, {} views",
                article.like_count.unwrap_or(0),
                if state.liked { " (liked)" } else { "" },
                article.view_count.unwrap_or(0)
            );
            if let Some(content) = &article.content {
                println!("\n{}\n", content);
            }
            println!("Comments ({}):", state.comment_total);
            for comment in &state.comments {
                print_comment(comment, 1);
            }
        }
        Commands::Like { id } => {
            require_login(&app)?;
            app.article.load(id).await?;
            let liked = app.article.toggle_like().await?;
            println!("{}", if liked { "Liked" } else { "Unliked" });
        }
        Commands::Comment { id, text, reply_to } => {
            require_login(&app)?;
            app.article.load(id).await?;
            let comment = app.article.add_comment(&text, reply_to).await?;
            println!("Comment {} posted", comment.id);
        }
        Commands::Delete { id } => {
            require_login(&app)?;
            app.articles.delete_article(id).await?;
            println!("Article {} deleted", id);
        }
        Commands::Notifications { unread, limit } => {
            require_login(&app)?;
            app.notifications
                .fetch(limit.unwrap_or(config.notification_limit), unread)
                .await?;
            let state = app.notifications.state();
            for notification in &state.items {
                print_notification(notification);
            }
            println!("{} unread", state.unread_count());
        }
        Commands::Read { id } => {
            require_login(&app)?;
            app.notifications.mark_read(id).await?;
            println!("Notification {} marked read", id);
        }
        Commands::ReadAll => {
            require_login(&app)?;
            app.notifications.mark_all_read().await?;
            println!("All notifications marked read");
        }
        Commands::Watch { interval } => {
            require_login(&app)?;
            watch(&app, &config, interval.map(Duration::from_secs)).await?;
        }
        Commands::Route { path } => match app.router.before_navigate(&path) {
            Navigation::Proceed => println!("{}: allowed", path),
            nav @ Navigation::Redirect { .. } => {
                println!("{}: login required, redirect to {}", path, nav.location().unwrap_or_default())
            }
            Navigation::Cancel => println!("{}: login required", path),
        },
    }

    Ok(())
}

fn require_login(app: &App) -> Result<()> {
    if app.session.is_authenticated() {
        Ok(())
    } else {
        Err(AppError::Validation(
            "Not logged in, run `blog-client login <username>` first".to_string(),
        ))
    }
}

async fn watch(app: &App, config: &ClientConfig, interval: Option<Duration>) -> Result<()> {
    let interval = interval.unwrap_or(config.poll_interval);
    let notifications = &app.notifications;

    notifications.fetch(config.notification_limit, false).await?;
    let mut seen: std::collections::HashSet<i64> = notifications.state().items.iter().map(|n| n.id).collect();
    for notification in notifications.state().items.iter().rev() {
        print_notification(notification);
    }

    notifications.start_polling(interval);
    println!("Watching notifications every {}s, Ctrl-C to stop", interval.as_secs());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = app.events.recv() => match event {
                Ok(AppEvent::NotificationsUpdated) => {
                    for notification in notifications.state().items.iter().rev() {
                        if seen.insert(notification.id) {
                            print_notification(notification);
                        }
                    }
                }
                Ok(AppEvent::SessionExpired { message }) => {
                    notifications.stop_polling();
                    return Err(AppError::Validation(message));
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
    }

    notifications.stop_polling();
    Ok(())
}

fn print_article_line(article: &ArticleSummary) {
    let tags: Vec<&str> = article.tags.iter().map(|t| t.name.as_str()).collect();
    println!(
        "{:>6}  {:<40}  [{}]",
        article.id,
        truncate_text(&article.title, 40),
        tags.join(", ")
    );
}

fn print_comment(comment: &shared::Comment, depth: usize) {
    let author = comment
        .author
        .as_ref()
        .and_then(|a| a.username.as_deref())
        .unwrap_or("anonymous");
    println!("{}#{} {}: {}", "  ".repeat(depth), comment.id, author, comment.content);
    for reply in &comment.replies {
        print_comment(reply, depth + 1);
    }
}

fn print_notification(notification: &Notification) {
    let when = notification
        .created_at
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    println!(
        "{} {:>6} {:<16} {}",
        if notification.read { " " } else { "*" },
        notification.id,
        when,
        notification.content.as_deref().unwrap_or_default()
    );
}
