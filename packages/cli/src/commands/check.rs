use super::load_config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use vitae_document::{DocumentStore, SectionId};
use vitae_editor::{EditorConfig, PreviewTabId};

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Resume JSON file to load
    #[arg(short, long)]
    pub resume: Option<PathBuf>,

    /// Editor config file (defaults to vitae.config.json in the current directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub fn check(args: CheckArgs, cwd: &str) -> Result<()> {
    println!("🔍 {} Vitae check", "Starting".green().bold());
    println!();

    let config = load_config(args.config.as_deref(), cwd)?;
    let mut problems = 0;

    match config.validate() {
        Ok(()) => println!("  {} Editor config is valid", "✓".green()),
        Err(err) => {
            problems += 1;
            println!("  {} {}", "✗".red(), err);
            println!("    Scroll sync would run disabled with this config");
        }
    }
    print_timings(&config);

    let counts = match &args.resume {
        Some(path) => {
            let store = DocumentStore::load(path)
                .with_context(|| format!("Failed to load resume {}", path.display()))?;
            let document = store.current();
            println!("  {} Loaded {}", "✓".green(), path.display());
            Some(SectionId::ALL.map(|section| document.section_len(section)))
        }
        None => None,
    };

    println!();
    println!("  {:<16} {:<12} {}", "Section".bold(), "Tab".bold(), "Entries".bold());
    for (index, section) in SectionId::ALL.iter().enumerate() {
        let tab = config.section_tabs.tab_for(*section);
        let entries = counts
            .map(|counts| counts[index].to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("  {:<16} {:<12} {}", section.as_str(), tab.as_str(), entries);
    }

    let empty_tabs: Vec<&str> = PreviewTabId::ALL
        .iter()
        .filter(|tab| config.section_tabs.sections_on(**tab).is_empty())
        .map(|tab| tab.as_str())
        .collect();
    if !empty_tabs.is_empty() {
        println!();
        println!("  Tabs without an editing section: {}", empty_tabs.join(", "));
    }

    println!();
    if problems > 0 {
        return Err(anyhow::anyhow!("{} problem(s) found", problems));
    }
    println!("✨ {} All checks passed", "Done".green().bold());
    Ok(())
}

fn print_timings(config: &EditorConfig) {
    println!(
        "    debounce {}ms, release {}ms, tab settle {}ms (transition {}ms), scroll settle {}ms",
        config.preview_debounce_ms,
        config.scroll_release_ms,
        config.tab_settle_ms,
        config.tab_transition_ms,
        config.scroll_settle_ms
    );
}
