//! Implementation of the fructcheck commands.

use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::ProgressBar;

use crate::cache::SearchCache;
use crate::evaluator::NutrientEvaluator;
use crate::types::config::{Config, APP_ID_ENV, APP_KEY_ENV};
use crate::types::responses::SearchSummary;
use crate::FructResult;

const DATA_DIR: &str = ".fructcheck";

/// Evaluates a query and prints the answer.
///
/// A query that matches no food prints a hint and returns the `NotFound`
/// error so the process exits non-zero.
pub async fn search(
    words: &[String],
    json: bool,
    no_cache_write: bool,
    config: &Config,
) -> FructResult<()> {
    let query = words.join(" ");
    let evaluator = NutrientEvaluator::from_config(config)?;
    let cache = open_cache(config)?;
    let write_back = config.cache.write_back && !no_cache_write;

    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!("Looking up '{}'...", query.trim()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let outcome = evaluator.evaluate(&query, cache.as_ref(), write_back).await;
    spinner.finish_and_clear();

    let result = match outcome {
        Ok(result) => result,
        Err(e) if e.is_not_found() => {
            println!("No results for '{}', try another search.", query.trim());
            return Err(e);
        }
        Err(e) => return Err(e),
    };

    let summary = SearchSummary::from_result(&result);
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", summary.describe(evaluator.limit().grams));
        tracing::debug!(origin = %summary.origin, "answer source");
    }

    Ok(())
}

/// Opens the configured cache, or `None` when caching is disabled.
fn open_cache(config: &Config) -> FructResult<Option<SearchCache>> {
    if !config.cache.enabled {
        return Ok(None);
    }

    SearchCache::open(&config.cache.db_path).map(Some)
}

/// Lists recent cached searches.
pub async fn history(limit: usize, config: &Config) -> FructResult<()> {
    if !config.cache.enabled {
        println!("The search cache is disabled in the configuration.");
        return Ok(());
    }

    let db_path = &config.cache.db_path;
    if !db_path.exists() {
        println!("No searches cached yet.");
        println!("Run 'fructcheck search <food>' to start.");
        return Ok(());
    }

    let cache = SearchCache::open(db_path)?;
    let searches = cache.recent(limit)?;

    if searches.is_empty() {
        println!("No searches cached yet.");
        return Ok(());
    }

    println!("Recent searches ({} stored)\n", cache.count()?);
    for search in searches {
        let fmt = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{v}"));
        println!(
            "  #{:<4} {}  {}",
            search.id,
            search.timestamp.format("%Y-%m-%d %H:%M"),
            search.query
        );
        println!(
            "        {} ({} g, {} {})  fructose {} g, glucose {} g, sucrose {} g",
            search.name.as_deref().unwrap_or("?"),
            fmt(search.serving_size_grams),
            fmt(search.quantity),
            search.serving_unit.as_deref().unwrap_or(""),
            fmt(search.fructose),
            fmt(search.glucose),
            fmt(search.sucrose),
        );
    }

    Ok(())
}

/// Creates `fructcheck.toml` and the data directory.
pub async fn init(path: Option<PathBuf>) -> FructResult<()> {
    let target_dir = path.unwrap_or_else(|| PathBuf::from("."));

    if !target_dir.exists() {
        std::fs::create_dir_all(&target_dir)?;
        tracing::info!("created directory {}", target_dir.display());
    }

    let config_path = target_dir.join("fructcheck.toml");
    if config_path.exists() {
        println!("Configuration already exists at: {}", config_path.display());
        println!("Use 'fructcheck config' to modify it.");
        return Ok(());
    }

    let data_dir = target_dir.join(DATA_DIR);
    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)?;
        tracing::info!("created {}/", DATA_DIR);
    }

    update_gitignore(&target_dir)?;
    Config::default_config().save(&config_path)?;

    println!("fructcheck initialized.");
    println!("Configuration created at: {}", config_path.display());
    println!("Data directory: {}/", DATA_DIR);
    println!();
    println!("Next steps:");
    println!("  1. Export {} and {}", APP_ID_ENV, APP_KEY_ENV);
    println!("     (or put them in a .env file)");
    println!("  2. Check the setup: fructcheck doctor");
    println!("  3. Ask away: fructcheck search 1 cup of strawberries");

    Ok(())
}

/// Adds the data directory to `.gitignore`, creating the file if needed.
fn update_gitignore(target_dir: &Path) -> FructResult<()> {
    let gitignore_path = target_dir.join(".gitignore");
    let entry = format!("{}/", DATA_DIR);
    let comment = "# fructcheck - local search cache";

    if !gitignore_path.exists() {
        std::fs::write(&gitignore_path, format!("{}\n{}\n", comment, entry))?;
        println!(".gitignore created with {}", entry);
        return Ok(());
    }

    let content = std::fs::read_to_string(&gitignore_path)?;
    if content
        .lines()
        .any(|line| line.trim() == entry || line.trim() == DATA_DIR)
    {
        tracing::debug!(".gitignore already lists {}", entry);
        return Ok(());
    }

    let mut updated = content.trim_end().to_string();
    if !updated.is_empty() {
        updated.push_str("\n\n");
    }
    updated.push_str(comment);
    updated.push('\n');
    updated.push_str(&entry);
    updated.push('\n');

    std::fs::write(&gitignore_path, updated)?;
    println!(".gitignore updated with {}", entry);
    Ok(())
}

/// Runs the stdio tool server until stdin closes.
pub async fn serve(config: &Config) -> FructResult<()> {
    use crate::mcp::McpServer;

    tracing::debug!(
        endpoint = %config.api.endpoint,
        limit = config.limits.fructose_grams,
        "starting tool server"
    );

    let mut server = McpServer::new(config)?;
    server.run().await
}

/// Edits the configuration interactively.
pub async fn config_cmd(config_path: &Path) -> FructResult<()> {
    use super::interactive::{run_interactive_config, show_config_summary};

    if config_path.exists() {
        show_config_summary(&Config::load(config_path)?);
    }

    run_interactive_config(config_path)
}

/// Reports problems with the configuration, credentials and cache.
pub async fn doctor(config: &Config) -> FructResult<()> {
    println!("Checking fructcheck setup...\n");

    let mut issues: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    match config.validate() {
        Ok(()) => println!("✓ Configuration is valid"),
        Err(e) => issues.push(e.to_string()),
    }

    match config.credentials() {
        Ok(credentials) => println!("✓ Nutritionix credentials found (app id {})", credentials.app_id),
        Err(e) => issues.push(e.to_string()),
    }

    println!("✓ Endpoint: {}", config.api.endpoint);
    println!("✓ Fructose limit: {} g", config.limits.fructose_grams);

    if config.cache.enabled {
        let db_path = &config.cache.db_path;
        if db_path.exists() {
            match SearchCache::open(db_path).and_then(|cache| cache.count()) {
                Ok(count) => println!(
                    "✓ Cache database {} ({} searches)",
                    db_path.display(),
                    count
                ),
                Err(e) => issues.push(format!("Cache database {} is unusable: {}", db_path.display(), e)),
            }
        } else {
            warnings.push(format!(
                "Cache database {} does not exist yet (created on first search)",
                db_path.display()
            ));
        }
        if !config.cache.write_back {
            warnings.push("cache.write_back is off, searches will not be cached".to_string());
        }
    } else {
        warnings.push("Search cache is disabled, every search calls the API".to_string());
    }

    println!();
    if issues.is_empty() && warnings.is_empty() {
        println!("✓ All good, fructcheck is ready.");
        return Ok(());
    }

    if !warnings.is_empty() {
        println!("Warnings:");
        for warning in warnings {
            println!("  ⚠ {}", warning);
        }
    }
    if !issues.is_empty() {
        println!("Problems:");
        for issue in issues {
            println!("  ✗ {}", issue);
        }
    }

    Ok(())
}

pub fn version() {
    println!("fructcheck {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Per-serving fructose checks backed by Nutritionix");
}
