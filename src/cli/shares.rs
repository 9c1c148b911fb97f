//! Listing of the configured shares

use console::style;

use crate::config::AppConfig;
use crate::share::ShareRegistry;
use crate::utils::truncate;

pub fn print(config: &AppConfig, registry: &ShareRegistry) {
    println!();
    println!(
        "  {} {}",
        style("Shares from").dim(),
        style(config.shares_path.display()).cyan()
    );
    println!();

    if registry.is_empty() {
        println!("  {}", style("No shares configured").dim());
        println!();
        return;
    }

    println!(
        "  {:<12} {:<28} {:<36} {}",
        style("Key").bold(),
        style("Name").bold(),
        style("Share").bold(),
        style("Mount Point").bold()
    );
    println!("  {}", style("─".repeat(100)).dim());

    for share in registry.iter() {
        println!(
            "  {:<12} {:<28} {:<36} {}",
            style(&share.key).green(),
            truncate(&share.display_name, 26),
            truncate(&share.share_path, 34),
            share.mount_point
        );
    }
    println!();
}
