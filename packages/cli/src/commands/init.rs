use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use vitae_editor::{EditorConfig, DEFAULT_CONFIG_NAME};

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Start with scroll sync switched off
    #[arg(long)]
    pub no_sync: bool,

    /// Start with focus mode on
    #[arg(long)]
    pub focus: bool,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Writing editor config...".bright_blue().bold());

    let config = EditorConfig {
        sync_enabled: !args.no_sync,
        focus_mode: args.focus,
        ..Default::default()
    };

    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("Next steps:");
    println!("  1. Adjust delays or the sectionTabs table in {}", DEFAULT_CONFIG_NAME);
    println!("  2. Run: vitae check --resume resume.json");
    println!("  3. Run: vitae replay --resume resume.json --script session.json");

    Ok(())
}
