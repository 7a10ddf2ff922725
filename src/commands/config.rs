//! `config show|get|set`.

use owo_colors::OwoColorize;
use serde_json::json;

use crate::cli::OutputOptions;
use crate::config::{CONFIG_KEYS, Config};
use crate::display::print_json;
use crate::error::Result;

pub fn cmd_config_show(output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    if output.json {
        return print_json(&json!({
            "path": Config::config_path()?,
            "effectiveApiBaseUrl": config.api_base_url(),
            "config": config,
        }));
    }
    println!("{}", Config::config_path()?.display().to_string().dimmed());
    for key in CONFIG_KEYS {
        let value = config.get(key)?;
        let shown = if value.is_empty() {
            "(not set)".dimmed().to_string()
        } else {
            value
        };
        println!("{}: {}", key.cyan(), shown);
    }
    let effective = config.api_base_url();
    if effective != config.api_base_url {
        println!(
            "{}",
            format!("api_base_url overridden by environment: {effective}").yellow()
        );
    }
    Ok(())
}

pub fn cmd_config_get(key: &str, output: OutputOptions) -> Result<()> {
    let value = Config::load()?.get(key)?;
    if output.json {
        return print_json(&json!({ "key": key, "value": value }));
    }
    println!("{value}");
    Ok(())
}

pub fn cmd_config_set(key: &str, value: &str, output: OutputOptions) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;
    let stored = config.get(key)?;
    if output.json {
        return print_json(&json!({ "key": key, "value": stored }));
    }
    println!("Set {} = {}", key.cyan(), stored);
    Ok(())
}
