use clap::{Parser, Subcommand};
use sqlite_adapter::SqlitePostStore;
use stardate_core::application::StardateServiceImpl;
use stardate_core::calculator::{calculate_now, calculate_str};
use stardate_core::config::Settings;
use stardate_core::domain::{PostId, StardateStyle};
use stardate_core::ports::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI tool to render dates as stardates and keep the stardate terms of a
/// content database current
#[derive(Parser, Debug)]
#[command(name = "stardate")]
#[command(about = "Converts dates to stardates and attaches them to posts in SQLite")]
struct Cli {
    /// Path to a YAML settings file
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<String>,

    /// Path to the SQLite content database
    #[arg(short = 'd', long = "db", global = true)]
    db: Option<String>,

    /// Stardate style: Classic, XI, XI_wikipedia or SOL
    #[arg(short = 's', long = "style", global = true)]
    style: Option<StardateStyle>,

    /// Text placed before every stardate
    #[arg(short = 'p', long = "prefix", global = true)]
    prefix: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the stardate for a date
    Calc { date: String },
    /// Print the current stardate
    Now,
    /// Create the content tables if they are missing
    InitDb,
    /// Recalculate the stardate of every post
    AssociateAll,
    /// Recalculate the stardate of one post
    Associate { id: PostId },
    /// Print a post's stardate, attaching one if it has none
    Show {
        id: PostId,
        /// Print the URL slug instead, `unknown` for posts without a date
        #[arg(long = "slug")]
        slug: bool,
    },
    /// Remove stardates from all posts and delete the terms
    Clear,
}

/// Initialize tracing with the STARDATE_LOG environment variable, defaulting to "info"
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("STARDATE_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        settings.storage.path = db;
    }
    if let Some(style) = cli.style {
        settings.stardate.style = style;
    }
    if let Some(prefix) = cli.prefix {
        settings.stardate.prefix = prefix;
    }

    match cli.command {
        Command::Calc { date } => println!("{}", calculate_str(&date, &settings.stardate)?),
        Command::Now => println!("{}", calculate_now(&settings.stardate)),
        Command::InitDb => {
            SqlitePostStore::new(settings.storage.path.clone()).init_schema()?;
            println!("Initialized {}", settings.storage.path);
        }
        command => {
            // Instantiate the store once for both ports
            let store = SqlitePostStore::new(settings.storage.path.clone());
            let service = StardateServiceImpl::new(
                Box::new(store.clone()),
                Box::new(store),
                settings.stardate,
            );
            run_store_command(&service, command)?;
        }
    }
    Ok(())
}

fn run_store_command(service: &StardateServiceImpl, command: Command) -> Result<()> {
    match command {
        Command::AssociateAll => {
            let outcome = service.associate_all_posts()?;
            println!(
                "Associated {} posts, {} failed",
                outcome.succeeded.len(),
                outcome.failed.len()
            );
            if !outcome.is_clean() {
                let ids: Vec<String> = outcome.failed.iter().map(ToString::to_string).collect();
                println!("Failed post ids: {}", ids.join(", "));
            }
        }
        Command::Associate { id } => match service.associate_post(id)? {
            Some(stardate) => println!("{stardate}"),
            None => println!("Post {id} has no date"),
        },
        Command::Show { id, slug: true } => println!("{}", service.slug_for_post(id)?),
        Command::Show { id, slug: false } => match service.stardate_for_post(id)? {
            Some(stardate) => println!("{stardate}"),
            None => println!("unknown"),
        },
        Command::Clear => {
            let cleared = service.clear_all()?;
            println!(
                "Cleared {} posts, deleted {} terms",
                cleared.posts_cleared, cleared.terms_deleted
            );
        }
        Command::Calc { .. } | Command::Now | Command::InitDb => {}
    }
    Ok(())
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
