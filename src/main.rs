use clap::{Args, Parser, Subcommand};
use school_locator::store::{JsonFileStore, MemoryStore, SchoolStore};
use school_locator::{Coordinates, Registry, SchoolDraft};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// School Locator: register schools and list them by distance.
///
/// Examples:
///   schools serve --port 8080
///   schools --persist add --name "Lincoln Middle" --address "1 Main St" --lat 39.8 --lon -89.6
///   schools --persist list --lat 39.8026 --lon -89.6437
#[derive(Parser)]
#[command(name = "schools", version, about, long_about = None)]
struct Cli {
    /// Keep schools in this JSON file instead of in memory.
    #[arg(long, global = true, env = "SCHOOLS_DATA")]
    data: Option<PathBuf>,

    /// Keep schools in ~/.school-locator/schools.json.
    #[arg(long, global = true, conflicts_with = "data")]
    persist: bool,

    #[command(flatten)]
    serve: ServeArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve,

    /// Print every school as JSON, nearest first.
    List {
        /// Latitude (-90 to 90).
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude (-180 to 180).
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },

    /// Register a school and print it as JSON.
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        address: String,

        /// Latitude (-90 to 90).
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude (-180 to 180).
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
}

#[derive(Args)]
struct ServeArgs {
    /// Address to bind.
    #[arg(long, global = true, env = "SCHOOLS_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on.
    #[arg(long, short = 'p', global = true, env = "PORT", default_value_t = 5000)]
    port: u16,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("school_locator=info,tower_http=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let registry = open_registry(&cli).unwrap_or_else(|e| {
        tracing::error!("{}", e);
        std::process::exit(1);
    });

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&cli.serve, registry),
        Command::List { lat, lon } => {
            let origin = Coordinates::new(lat, lon).unwrap_or_else(|e| {
                tracing::error!("{}", e);
                std::process::exit(1);
            });
            print_json(&registry.list_by_proximity(origin));
        }
        Command::Add {
            name,
            address,
            lat,
            lon,
        } => {
            let mut registry = registry;
            let school = registry
                .register(&SchoolDraft::new(name, address, lat, lon))
                .unwrap_or_else(|e| {
                    tracing::error!("{}", e);
                    std::process::exit(1);
                });
            print_json(&school);
        }
    }
}

fn open_registry(cli: &Cli) -> Result<Registry, school_locator::RegistryError> {
    let path = match (&cli.data, cli.persist) {
        (Some(path), _) => Some(path.clone()),
        (None, true) => Some(JsonFileStore::default_path()),
        (None, false) => None,
    };

    let store: Box<dyn SchoolStore> = match path {
        Some(path) => {
            let store = JsonFileStore::open(path)?;
            tracing::info!(path = %store.path().display(), "using file-backed school data");
            Box::new(store)
        }
        None => Box::new(MemoryStore::new()),
    };
    Registry::open(store)
}

fn serve(args: &ServeArgs, registry: Registry) {
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        tracing::error!("cannot start runtime: {}", e);
        std::process::exit(1);
    });
    if let Err(e) = runtime.block_on(school_locator::server::start(&args.host, args.port, registry)) {
        tracing::error!("server error on {}:{}: {}", args.host, args.port, e);
        std::process::exit(1);
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            tracing::error!("cannot encode output: {}", e);
            std::process::exit(1);
        }
    }
}
