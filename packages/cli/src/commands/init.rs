use crate::config::config_path;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use folio_editor::{EditorConfig, DEFAULT_CONFIG_NAME};
use std::fs;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Maximum number of transactions kept for undo (0 = unlimited)
    #[arg(short, long, default_value_t = 0)]
    pub max_history: usize,

    /// Variant used to fill sections inserted without components
    #[arg(short, long)]
    pub default_variant: Option<String>,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let path = config_path(cwd);

    if path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    let mut config = EditorConfig {
        max_history: args.max_history,
        ..EditorConfig::default()
    };
    if let Some(variant) = args.default_variant {
        config.default_variant = variant;
    }

    fs::write(&path, serde_json::to_string_pretty(&config)?)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("Next steps:");
    println!("  1. Record a script of {{ \"steps\": [...] }}");
    println!("  2. Run: folio replay <snapshot.json> <script.json>");

    Ok(())
}
