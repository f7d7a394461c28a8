use clap::{Parser, Subcommand};
use moviefinder::{
    config::Config,
    logging::{self, LogTarget},
    prelude::*,
};
use std::num::NonZeroUsize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "moviefinder")]
#[command(about = "Search movies and manage your favorites", long_about = None)]
struct Args {
    /// Config file (defaults to the per-user config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Movie service URL, overriding the config
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search the catalog by title
    Search { title: String },
    /// List your favorites
    Favorites,
    /// Add a movie to your favorites
    Add {
        imdb_id: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        year: String,
        #[arg(long, default_value = "N/A")]
        poster: String,
    },
    /// Search, then add the result at INDEX (1-based) to your favorites
    AddResult { title: String, index: NonZeroUsize },
    /// Remove a movie from your favorites
    Remove { imdb_id: String },
    /// Create an account
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log in
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the session state and service URL
    Status,
}

fn load_config(args: &Args) -> moviefinder::Result<Config> {
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.clone();
        config.validate()?;
    }
    if args.verbose {
        config.log_level = "debug".to_string();
    }
    Ok(config)
}

fn print_results(results: &[SearchResult]) {
    for (i, movie) in results.iter().enumerate() {
        println!("{:>3}. {} ({}) [{}]", i + 1, movie.title, movie.year, movie.imdb_id);
    }
}

fn print_favorites(favorites: &[FavoriteEntry]) {
    if favorites.is_empty() {
        println!("No favorites yet.");
    }
    for favorite in favorites {
        println!("{} ({}) [{}]", favorite.title, favorite.year, favorite.imdb_id);
    }
}

fn print_status(app: &MovieFinder) {
    if let Some(status) = &app.state().status {
        println!("{}", status.message);
    }
}

async fn run(app: &mut MovieFinder, command: Command, config: &Config) {
    match command {
        Command::Search { title } => {
            app.search(&title).await;
            print_results(&app.state().results);
            print_status(app);
        }
        Command::Favorites => {
            if let FavoritesOutcome::Updated(favorites) = app.refresh_favorites().await {
                print_favorites(&favorites);
            }
            print_status(app);
        }
        Command::Add {
            imdb_id,
            title,
            year,
            poster,
        } => {
            let entry = FavoriteEntry {
                imdb_id,
                title,
                year,
                poster_url: poster,
            };
            app.add_favorite(&entry).await;
            print_status(app);
        }
        Command::AddResult { title, index } => {
            app.search(&title).await;
            if app.state().results.is_empty() {
                print_status(app);
                return;
            }
            app.add_result(index.get() - 1).await;
            print_status(app);
        }
        Command::Remove { imdb_id } => {
            app.remove_favorite(&imdb_id).await;
            print_status(app);
        }
        Command::Register {
            username,
            email,
            password,
        } => {
            app.register(&username, &email, &password).await;
            print_status(app);
        }
        Command::Login { email, password } => {
            app.login(&email, &password).await;
            print_status(app);
        }
        Command::Logout => {
            app.logout();
            print_status(app);
        }
        Command::Status => {
            println!("Service: {}", config.base_url);
            println!("Session: {}", config.session_path().display());
            if app.is_logged_in() {
                println!("Logged in.");
            } else {
                println!("Not logged in.");
            }
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = logging::init(&config.log_level, LogTarget::Stderr) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let mut app = match MovieFinder::from_config(&config) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    run(&mut app, args.command, &config).await;
}
