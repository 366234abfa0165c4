//! Pokédex: GraphQL API over a static Pokémon dataset.

use std::path::PathBuf;
use std::sync::Arc;

use pokedex_server::{build_router, validate, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn resolve_data_file() -> PathBuf {
    std::env::var("POKEDEX_DATA_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let exe_dir = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()));
            if let Some(dir) = exe_dir {
                let parent_data = dir.join("../data/pokemon.json");
                if parent_data.exists() {
                    return parent_data;
                }
            }
            PathBuf::from("data/pokemon.json")
        })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "serve" => {}
            "--validate" | "validate" => {
                let data_file = if args.len() > 2 {
                    PathBuf::from(&args[2])
                } else {
                    resolve_data_file()
                };
                let report = validate::validate(&data_file);
                validate::print_report(&report);
                std::process::exit(if report.valid { 0 } else { 1 });
            }
            "--help" | "-h" | "help" => {
                println!("Pokedex: GraphQL API over a Pokémon dataset");
                println!();
                println!("Usage: pokedex [command]");
                println!();
                println!("Commands:");
                println!("  (none) | serve           Start the server");
                println!("  validate [data-file]     Check a dataset file and print a report");
                println!("  help                     Show this help message");
                println!();
                println!("Environment:");
                println!("  PORT                     Listen port (default 4000)");
                println!("  POKEDEX_DATA_FILE        Dataset path (default data/pokemon.json)");
                println!("  POKEDEX_SEARCH_POLICY    substring | fuzzy (default substring)");
                println!("  POKEDEX_FUZZY_THRESHOLD  Fuzzy match threshold in [0, 1] (default 0.6)");
                println!("  POKEDEX_MIN_MATCH_LEN    Shortest fuzzy term (default 3)");
                println!("  POKEDEX_DEFAULT_LIMIT    Page size when no limit is given (default 999)");
                println!("  POKEDEX_MAX_QUERY_DEPTH  Deepest query nesting accepted (default 10)");
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'pokedex help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    let data_file = resolve_data_file();
    info!("Data file: {}", data_file.display());

    let config = pokedex_core::PokedexConfig::from_env(&data_file)?;
    let port = config.port;
    info!("Search policy: {}", config.search_policy);

    // A dataset that fails to load stops startup before the listener binds.
    let dataset = pokedex_store::Dataset::load(&config.data_file)
        .map_err(|e| anyhow::anyhow!("Failed to load dataset: {}", e))?;

    let state = Arc::new(AppState::new(config, dataset));
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Pokedex server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
