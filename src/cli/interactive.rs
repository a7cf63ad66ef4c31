//! Interactive configuration editor built on dialoguer.

use std::path::{Path, PathBuf};

use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

use crate::types::config::Config;
use crate::FructResult;

/// Runs the configuration menu until the user saves or quits.
pub fn run_interactive_config(config_path: &Path) -> FructResult<()> {
    let theme = ColorfulTheme::default();

    println!("\nfructcheck configuration\n");

    let mut config = if config_path.exists() {
        Config::load(config_path)?
    } else {
        println!("Creating a new configuration...\n");
        Config::default_config()
    };

    loop {
        let options = [
            "General",
            "Nutritionix API",
            "Fructose limit",
            "Search cache",
            "Save and exit",
            "Exit without saving",
        ];

        let selection = Select::with_theme(&theme)
            .with_prompt("What do you want to configure?")
            .items(&options)
            .default(0)
            .interact()?;

        match selection {
            0 => configure_general(&theme, &mut config)?,
            1 => configure_api(&theme, &mut config)?,
            2 => configure_limits(&theme, &mut config)?,
            3 => configure_cache(&theme, &mut config)?,
            4 => match config.validate() {
                Ok(()) => {
                    config.save(config_path)?;
                    println!("\n✓ Configuration saved to: {}\n", config_path.display());
                    break;
                }
                Err(e) => println!("\n✗ {}\n", e),
            },
            5 => {
                if Confirm::with_theme(&theme)
                    .with_prompt("Discard all changes?")
                    .default(false)
                    .interact()?
                {
                    println!("\nExiting without saving.\n");
                    break;
                }
            }
            _ => {}
        }
    }

    Ok(())
}

fn configure_general(theme: &ColorfulTheme, config: &mut Config) -> FructResult<()> {
    let log_levels = ["error", "warn", "info", "debug", "trace"];
    let current = log_levels
        .iter()
        .position(|&l| l == config.general.log_level)
        .unwrap_or(2);

    let level = Select::with_theme(theme)
        .with_prompt("Log level")
        .items(&log_levels)
        .default(current)
        .interact()?;
    config.general.log_level = log_levels[level].to_string();

    let log_formats = ["text", "json"];
    let current = log_formats
        .iter()
        .position(|&f| f == config.general.log_format)
        .unwrap_or(0);

    let format = Select::with_theme(theme)
        .with_prompt("Log format")
        .items(&log_formats)
        .default(current)
        .interact()?;
    config.general.log_format = log_formats[format].to_string();

    Ok(())
}

fn configure_api(theme: &ColorfulTheme, config: &mut Config) -> FructResult<()> {
    config.api.endpoint = Input::with_theme(theme)
        .with_prompt("Endpoint")
        .default(config.api.endpoint.clone())
        .interact_text()?;

    let timeout: u64 = Input::with_theme(theme)
        .with_prompt("Request timeout (seconds)")
        .default(config.api.timeout_secs)
        .interact_text()?;
    config.api.timeout_secs = timeout.max(1);

    // Credentials in the file are optional; the environment wins anyway.
    let app_id: String = Input::with_theme(theme)
        .with_prompt("App id (empty to use the environment)")
        .default(config.api.app_id.clone().unwrap_or_default())
        .allow_empty(true)
        .interact_text()?;
    config.api.app_id = Some(app_id).filter(|v| !v.trim().is_empty());

    if Confirm::with_theme(theme)
        .with_prompt("Store an app key in the file?")
        .default(config.api.app_key.is_some())
        .interact()?
    {
        let app_key: String = Input::with_theme(theme)
            .with_prompt("App key")
            .interact_text()?;
        config.api.app_key = Some(app_key).filter(|v| !v.trim().is_empty());
    } else {
        config.api.app_key = None;
    }

    Ok(())
}

fn configure_limits(theme: &ColorfulTheme, config: &mut Config) -> FructResult<()> {
    let grams: f64 = Input::with_theme(theme)
        .with_prompt("Fructose limit per serving (grams)")
        .default(config.limits.fructose_grams)
        .validate_with(|v: &f64| {
            if v.is_finite() && *v > 0.0 {
                Ok(())
            } else {
                Err("must be a positive number")
            }
        })
        .interact_text()?;
    config.limits.fructose_grams = grams;

    Ok(())
}

fn configure_cache(theme: &ColorfulTheme, config: &mut Config) -> FructResult<()> {
    config.cache.enabled = Confirm::with_theme(theme)
        .with_prompt("Use the search cache?")
        .default(config.cache.enabled)
        .interact()?;

    if !config.cache.enabled {
        return Ok(());
    }

    let db_path: String = Input::with_theme(theme)
        .with_prompt("Database path")
        .default(config.cache.db_path.display().to_string())
        .interact_text()?;
    config.cache.db_path = PathBuf::from(db_path);

    config.cache.write_back = Confirm::with_theme(theme)
        .with_prompt("Store new searches in the cache?")
        .default(config.cache.write_back)
        .interact()?;

    Ok(())
}

/// Prints the current configuration as a table.
pub fn show_config_summary(config: &Config) {
    let yes_no = |b: bool| if b { "yes" } else { "no" };
    let credential = |v: &Option<String>| if v.is_some() { "in file" } else { "from environment" };

    println!("\nCurrent configuration\n");
    println!("┌─────────────────────────────────────────┐");
    println!("│ General                                 │");
    println!("├─────────────────────────────────────────┤");
    println!("│ Log level: {:<28} │", config.general.log_level);
    println!("│ Log format: {:<27} │", config.general.log_format);
    println!("├─────────────────────────────────────────┤");
    println!("│ Nutritionix                             │");
    println!("├─────────────────────────────────────────┤");
    println!("│ Timeout: {:<29}s │", config.api.timeout_secs);
    println!("│ App id: {:<31} │", credential(&config.api.app_id));
    println!("│ App key: {:<30} │", credential(&config.api.app_key));
    println!("├─────────────────────────────────────────┤");
    println!("│ Fructose limit: {:<21} g │", config.limits.fructose_grams);
    println!("├─────────────────────────────────────────┤");
    println!("│ Cache enabled: {:<24} │", yes_no(config.cache.enabled));
    if config.cache.enabled {
        println!("│ Write back: {:<27} │", yes_no(config.cache.write_back));
        println!("│ Path: {:<33} │", config.cache.db_path.display().to_string());
    }
    println!("└─────────────────────────────────────────┘");
    println!();
}
