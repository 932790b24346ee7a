use std::path::PathBuf;
use std::sync::Arc;

use blogclient::config::{ApiLayout, DEFAULT_API_URL};
use blogclient::net::types::{Comment, Post, PostDraft, RegisterRequest};
use blogclient::state::auth::AuthState;
use blogclient::state::feed::{PostFeed, excerpt};
use blogclient::util::auth::{can_modify, should_redirect_unauth};
use blogclient::util::forms::{FieldErrors, validate_comment, validate_post, validate_registration};
use blogclient::util::navigation::LogNavigator;
use blogclient::{ApiError, BlogClient, ClientConfig, ConfigError, FileStore, TransportError};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Transport(#[from] TransportError),
    #[error("api request failed ({code}): {err}", code = .0.code(), err = .0)]
    Api(#[from] ApiError),
    #[error("not signed in; run `blog-cli login` first")]
    NotSignedIn,
    #[error("post {0} belongs to another user")]
    NotAuthor(i64),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("{0}")]
    Feed(String),
    #[error("no config directory; pass --session-file or set BLOG_SESSION_FILE")]
    NoConfigDir,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "blog-cli", about = "Blog API client with persistent sign-in")]
struct Cli {
    #[arg(long, env = "BLOG_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    #[arg(long, env = "BLOG_API_LAYOUT", default_value = "posts", help = "Endpoint layout: posts or blogs")]
    layout: String,

    #[arg(long, env = "BLOG_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        email: String,
        #[arg(long, env = "BLOG_PASSWORD")]
        password: String,
    },
    Register(RegisterArgs),
    Logout,
    Whoami,
    Profile {
        username: String,
    },
    Posts(PostsCommand),
    Comments(CommentsCommand),
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    email: String,
    #[arg(long, env = "BLOG_PASSWORD")]
    password: String,
    #[arg(long, help = "Defaults to --password")]
    password_confirm: Option<String>,
}

#[derive(Args, Debug)]
struct PostsCommand {
    #[command(subcommand)]
    command: PostsSubcommand,
}

#[derive(Subcommand, Debug)]
enum PostsSubcommand {
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = false, help = "Follow pages until the feed ends")]
        all: bool,
    },
    Show {
        id: i64,
    },
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    Delete {
        id: i64,
    },
    ByAuthor {
        username: String,
    },
}

#[derive(Args, Debug)]
struct CommentsCommand {
    #[command(subcommand)]
    command: CommentsSubcommand,
}

#[derive(Subcommand, Debug)]
enum CommentsSubcommand {
    List {
        post_id: i64,
    },
    Add {
        post_id: i64,
        #[arg(long)]
        content: String,
    },
    Edit {
        id: i64,
        #[arg(long)]
        content: String,
    },
    Delete {
        id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = connect(&cli)?;

    match cli.command {
        Command::Login { email, password } => {
            let user = client.auth.login(&email, &password).await?;
            println!("signed in as {}", user.username);
            Ok(())
        }
        Command::Register(args) => run_register(&client, args).await,
        Command::Logout => {
            client.auth.logout();
            println!("signed out");
            Ok(())
        }
        Command::Whoami => {
            let state = require_session(&client).await?;
            print_json(&state.user)
        }
        Command::Profile { username } => print_json(&client.api.user_profile(&username).await?),
        Command::Posts(posts) => run_posts(&client, posts).await,
        Command::Comments(comments) => run_comments(&client, comments).await,
    }
}

fn connect(cli: &Cli) -> Result<BlogClient, CliError> {
    let config = ClientConfig::new(&cli.api_url)
        .with_layout(ApiLayout::parse(Some(cli.layout.as_str()))?)
        .with_env_session();
    let path = match &cli.session_file {
        Some(path) => path.clone(),
        None => default_session_file().ok_or(CliError::NoConfigDir)?,
    };
    tracing::debug!(session_file = %path.display(), "using session file");

    let store = Arc::new(FileStore::new(path));
    Ok(BlogClient::connect(config, store, Arc::new(LogNavigator))?)
}

fn default_session_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("blog-cli").join("session.json"))
}

/// Load the signed-in user, failing when there is no usable session.
async fn require_session(client: &BlogClient) -> Result<AuthState, CliError> {
    let state = AuthState::bootstrap(&client.auth).await;
    if should_redirect_unauth(&state) {
        return Err(CliError::NotSignedIn);
    }
    Ok(state)
}

async fn run_register(client: &BlogClient, args: RegisterArgs) -> Result<(), CliError> {
    let form = RegisterRequest {
        username: args.username,
        email: args.email,
        password_confirm: args.password_confirm.unwrap_or_else(|| args.password.clone()),
        password: args.password,
    };
    check(&validate_registration(&form))?;
    client.auth.register(&form).await?;
    println!("registered {}; run `blog-cli login` to sign in", form.username);
    Ok(())
}

async fn run_posts(client: &BlogClient, posts: PostsCommand) -> Result<(), CliError> {
    match posts.command {
        PostsSubcommand::List { page, all: false } => {
            let listing = client.api.list_posts(page).await?;
            print_summaries(&listing.results);
            if listing.has_next() {
                println!("(more: --page {})", page + 1);
            }
            Ok(())
        }
        PostsSubcommand::List { all: true, .. } => {
            let mut feed = PostFeed::new();
            while feed.can_load_more() {
                feed.load_next(&client.api).await;
                if let Some(message) = feed.error.take() {
                    return Err(CliError::Feed(message));
                }
            }
            print_summaries(&feed.posts);
            Ok(())
        }
        PostsSubcommand::Show { id } => {
            let post = client.api.get_post(id).await?;
            let comments = client.api.comments_for_post(id).await?;
            print_json(&serde_json::json!({ "post": post, "comments": comments }))
        }
        PostsSubcommand::Create { title, content } => {
            require_session(client).await?;
            let draft = PostDraft { title, content };
            check(&validate_post(&draft))?;
            print_json(&client.api.create_post(&draft).await?)
        }
        PostsSubcommand::Edit { id, title, content } => {
            let post = owned_post(client, id).await?;
            let draft = PostDraft {
                title: title.unwrap_or(post.title),
                content: content.unwrap_or(post.content),
            };
            check(&validate_post(&draft))?;
            print_json(&client.api.update_post(id, &draft).await?)
        }
        PostsSubcommand::Delete { id } => {
            owned_post(client, id).await?;
            client.api.delete_post(id).await?;
            println!("deleted post {id}");
            Ok(())
        }
        PostsSubcommand::ByAuthor { username } => {
            print_summaries(&client.api.posts_by_author(&username).await?);
            Ok(())
        }
    }
}

async fn run_comments(client: &BlogClient, comments: CommentsCommand) -> Result<(), CliError> {
    match comments.command {
        CommentsSubcommand::List { post_id } => {
            for comment in client.api.comments_for_post(post_id).await? {
                println!("{}", comment_line(&comment));
            }
            Ok(())
        }
        CommentsSubcommand::Add { post_id, content } => {
            require_session(client).await?;
            check(&validate_comment(&content))?;
            print_json(&client.api.create_comment(post_id, &content).await?)
        }
        CommentsSubcommand::Edit { id, content } => {
            check(&validate_comment(&content))?;
            print_json(&client.api.update_comment(id, &content).await?)
        }
        CommentsSubcommand::Delete { id } => {
            client.api.delete_comment(id).await?;
            println!("deleted comment {id}");
            Ok(())
        }
    }
}

/// Fetch a post and confirm the signed-in user wrote it.
async fn owned_post(client: &BlogClient, id: i64) -> Result<Post, CliError> {
    let state = require_session(client).await?;
    let post = client.api.get_post(id).await?;
    if !can_modify(state.user.as_ref(), &post.author) {
        return Err(CliError::NotAuthor(id));
    }
    Ok(post)
}

fn check(errors: &FieldErrors) -> Result<(), CliError> {
    if errors.is_empty() {
        return Ok(());
    }
    let joined = errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ");
    Err(CliError::Invalid(joined))
}

fn print_summaries(posts: &[Post]) {
    if posts.is_empty() {
        println!("no posts");
    }
    for post in posts {
        println!("{}", post_line(post));
    }
}

fn post_line(post: &Post) -> String {
    format!(
        "#{} {} (by {}, {})\n    {}",
        post.id,
        post.title,
        post.author.username,
        post.created_at,
        excerpt(&post.content).replace('\n', " ")
    )
}

fn comment_line(comment: &Comment) -> String {
    format!("#{} {}: {}", comment.id, comment.user.username, comment.content)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
