use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use cstools_core::{get_config_dir, CsToolsConfig};

#[derive(Subcommand)]
pub enum ConfigCommand {
    #[command(about = "Show the effective configuration")]
    Show,
}

pub fn handle_config_command(action: Option<ConfigCommand>, config: &CsToolsConfig) -> Result<()> {
    match action {
        Some(ConfigCommand::Show) | None => cmd_config_show(config),
    }
}

fn cmd_config_show(config: &CsToolsConfig) -> Result<()> {
    let ts = &config.thoughtspot;

    println!("{}", "CS Tools Configuration".cyan().bold());
    println!("{}", "═".repeat(40).dimmed());

    println!("  {}", "ThoughtSpot".yellow().bold());
    println!("    {:<24} {}", "url:", display_or_unset(&ts.url));
    println!(
        "    {:<24} {}",
        "username:",
        ts.username.as_deref().map(display_or_unset).unwrap_or_else(unset)
    );
    println!(
        "    {:<24} {}",
        "password:",
        ts.password.as_deref().map(mask_secret).unwrap_or_else(unset)
    );
    println!("    {:<24} {}", "disable_ssl:", ts.disable_ssl);
    println!("    {:<24} {}s", "timeout:", ts.timeout_secs);
    println!();

    println!("  {}", "Fetch".yellow().bold());
    println!("    {:<24} {}", "page_size:", config.fetch.page_size);
    println!("    {:<24} {}", "columns_chunksize:", config.fetch.columns_chunksize);
    println!(
        "    {:<24} {}",
        "permissions_chunksize:", config.fetch.permissions_chunksize
    );
    println!(
        "    {:<24} {}",
        "dependents_chunksize:", config.fetch.dependents_chunksize
    );
    println!();

    println!("  {}", "Logging".yellow().bold());
    println!("    {:<24} {}", "level:", config.logging.level);
    println!("    {:<24} {}", "json_format:", config.logging.json_format);
    println!();

    println!("  {}", "Display".yellow().bold());
    println!("    {:<24} {}", "color:", config.display.color);
    println!("    {:<24} {}", "table_width:", config.display.table_width);
    println!("    {:<24} {}", "live:", config.display.live);

    if let Some(dir) = get_config_dir() {
        println!();
        println!(
            "  {} {}",
            "Config directory:".dimmed(),
            dir.join("config.toml").display()
        );
    }

    Ok(())
}

fn unset() -> String {
    "(not set)".dimmed().to_string()
}

fn display_or_unset(value: &str) -> String {
    if value.is_empty() {
        unset()
    } else {
        value.to_string()
    }
}

pub fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        String::new()
    } else {
        "****".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("hunter2"), "****");
        assert_eq!(mask_secret(""), "");
    }

    #[test]
    fn test_display_or_unset() {
        assert_eq!(display_or_unset("https://ts.example.com"), "https://ts.example.com");
        assert!(display_or_unset("").contains("not set"));
    }
}
