//! Interactive chat loop
//!
//! Lines starting with `/` are console commands; anything else is sent to the
//! chat endpoint.

use anyhow::{Context, Result};
use press_client::models::PostStatus;
use std::io::{BufRead, Write};

use crate::app::App;
use crate::handlers::{cache, chat, instagram, posts, refreshing, site, Job};

pub const HELP: &str = "\
Commands:
  /posts /drafts /published       list posts
  /search <text>                  search posts
  /publish <id>  /delete <id>     change a post
  /health /plugins /users         site information
  /show /next /prev               Instagram post viewer
  /import /import-all             import the current or every viewed post
  /open                           print the current post's link
  /images                         pre-fetch images of the viewed posts
  /do <n>                         run action n of the last reply
  /sessions                       list tracked progress sessions
  /help  /quit
Anything else is sent to the assistant.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Chat(String),
    Posts,
    Drafts,
    Published,
    Search(String),
    Publish(u64),
    Delete(u64),
    Health,
    Plugins,
    Users,
    Show,
    Next,
    Previous,
    ImportCurrent,
    ImportAll,
    Open,
    Prefetch,
    Action(usize),
    Sessions,
    Help,
    Quit,
    /// Unknown command or bad argument, with the message to show
    Invalid(String),
}

/// Parse one input line; `None` for a blank line
pub fn parse(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Some(Command::Chat(line.to_string()));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    let command = match name {
        "posts" => Command::Posts,
        "drafts" => Command::Drafts,
        "published" => Command::Published,
        "search" => Command::Search(arg.to_string()),
        "publish" => id_arg(arg).map_or_else(Command::Invalid, Command::Publish),
        "delete" => id_arg(arg).map_or_else(Command::Invalid, Command::Delete),
        "health" => Command::Health,
        "plugins" => Command::Plugins,
        "users" => Command::Users,
        "show" => Command::Show,
        "next" => Command::Next,
        "prev" | "previous" => Command::Previous,
        "import" => Command::ImportCurrent,
        "import-all" => Command::ImportAll,
        "open" => Command::Open,
        "images" => Command::Prefetch,
        "do" => match arg.parse::<usize>() {
            Ok(n) if n > 0 => Command::Action(n),
            _ => Command::Invalid("Usage: /do <action number>".to_string()),
        },
        "sessions" => Command::Sessions,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => Command::Invalid(format!("Unknown command /{}. Type /help for commands.", other)),
    };
    Some(command)
}

fn id_arg(arg: &str) -> std::result::Result<u64, String> {
    arg.parse()
        .map_err(|_| "Usage: /publish <id> or /delete <id>".to_string())
}

/// Run one command; returns follow-up work it left running
pub async fn execute(app: &App, command: Command) -> Option<Job> {
    match command {
        Command::Chat(message) => {
            chat::send_message(app, &message).await;
        }
        Command::Posts => {
            posts::load_posts(app).await;
        }
        Command::Drafts => {
            posts::load_by_status(app, PostStatus::Draft).await;
        }
        Command::Published => {
            posts::load_by_status(app, PostStatus::Publish).await;
        }
        Command::Search(query) => {
            posts::search_posts(app, &query).await;
        }
        Command::Publish(id) => {
            refreshing(app, posts::publish_post(app, id)).await;
        }
        Command::Delete(id) => {
            refreshing(app, posts::delete_post(app, id)).await;
        }
        Command::Health => {
            site::site_health(app).await;
        }
        Command::Plugins => {
            site::list_plugins(app).await;
        }
        Command::Users => {
            site::list_users(app).await;
        }
        Command::Show => {
            instagram::show_current(app).await;
        }
        Command::Next => {
            instagram::next_post(app).await;
        }
        Command::Previous => {
            instagram::previous_post(app).await;
        }
        Command::ImportCurrent => {
            refreshing(app, instagram::import_current(app)).await;
        }
        Command::ImportAll => {
            refreshing(app, instagram::import_all(app)).await;
        }
        Command::Open => {
            instagram::open_current(app);
        }
        Command::Prefetch => {
            cache::prefetch_viewer_images(app).await;
        }
        Command::Action(n) => return chat::run_action(app, n).await.1,
        Command::Sessions => {
            let sessions = app.tracker.active_sessions();
            if sessions.is_empty() {
                app.transcript.info("No active progress sessions");
            } else {
                app.transcript
                    .info(format!("Active sessions: {}", sessions.join(", ")));
            }
        }
        Command::Help => app.transcript.info(HELP),
        Command::Invalid(message) => app.transcript.error(message),
        Command::Quit => {}
    }
    None
}

/// Read one line from stdin off the async workers; `None` at end of input
async fn read_line() -> Result<Option<String>> {
    tokio::task::spawn_blocking(|| {
        print!("> ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        let read = std::io::stdin().lock().read_line(&mut line)?;
        Ok::<_, std::io::Error>((read > 0).then_some(line))
    })
    .await
    .context("Input reader stopped")?
    .context("Failed to read input")
}

/// Run the chat loop until `/quit` or end of input
pub async fn run(app: &App) -> Result<()> {
    site::check_connection(app).await;
    app.transcript
        .info("Type a message for the assistant, or /help for commands.");

    while let Some(line) = read_line().await? {
        let Some(command) = parse(&line) else {
            continue;
        };
        if command == Command::Quit {
            break;
        }
        // Follow-up jobs keep running in the background and render when done
        let _ = execute(app, command).await;
    }

    let open = app.tracker.active_sessions();
    if !open.is_empty() {
        log::info!("Closing {} progress sessions", open.len());
    }
    app.tracker.stop_all();
    Ok(())
}
