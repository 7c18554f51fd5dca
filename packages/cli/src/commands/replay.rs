use super::load_config;
use crate::script::{Action, Script};
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::{sleep, sleep_until, Instant};
use tracing::debug;
use vitae_document::DocumentStore;
use vitae_editor::sim::{form_height, SimulatedPane, SimulatedPreview};
use vitae_editor::{DualPaneShell, EditorConfig, ShellDriver, ShellStatus};

pub type ReplayShell = DualPaneShell<SimulatedPane, SimulatedPreview>;

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Resume JSON file to edit
    #[arg(short, long)]
    pub resume: PathBuf,

    /// Session script to replay
    #[arg(short, long)]
    pub script: PathBuf,

    /// Editor config file (defaults to vitae.config.json in the current directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the final shell status as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn replay(args: ReplayArgs, cwd: &str) -> Result<()> {
    let config = load_config(args.config.as_deref(), cwd)?;
    let script = Script::load(&args.script)
        .with_context(|| format!("Failed to load script {}", args.script.display()))?;
    let store = DocumentStore::load(&args.resume)
        .with_context(|| format!("Failed to load resume {}", args.resume.display()))?;

    if !args.json {
        println!("▶️  {} Vitae replay", "Starting".green().bold());
        println!("   Resume: {}", args.resume.display());
        println!("   Script: {} ({} steps)", args.script.display(), script.steps.len());
        println!();
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let (status, shell) = runtime.block_on(run_script(config, store, script, !args.json))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        print_summary(&status, &shell);
    }
    Ok(())
}

/// Drive a shell with simulated panes through the script in real time
pub async fn run_script(
    config: EditorConfig,
    store: DocumentStore,
    script: Script,
    verbose: bool,
) -> Result<(ShellStatus, ReplayShell)> {
    let document = store.current();
    let mut shell = ReplayShell::new(config.clone(), store);
    shell.attach_editor(SimulatedPane::new(form_height(&document), script.editor_height));
    shell.attach_preview(SimulatedPreview::new(config.section_tabs, script.preview_height));

    if let Some(reason) = shell.degraded() {
        if verbose {
            println!("  {} {}", "⚠️".yellow(), reason);
            println!("     Scroll sync disabled for this session");
            println!();
        }
    }

    let (driver, handle) = ShellDriver::new(shell);
    debug!(steps = script.steps.len(), settle_ms = script.settle_ms, "Replaying script");

    let session = async move {
        let start = Instant::now();

        for step in &script.steps {
            sleep_until(start + Duration::from_millis(step.at)).await;
            if verbose {
                println!("  {:>6}ms  {}", step.at, describe(&step.action));
            }

            match &step.action {
                Action::Scroll { pane, top } => handle.scroll_to(*pane, *top)?,
                Action::Activate { section } => handle.activate(*section)?,
                Action::Edit { mutation } => match handle.apply(mutation.clone()).await {
                    Ok(result) => {
                        if verbose {
                            println!("            {} version {}", "✓".green(), result.version);
                        }
                    }
                    Err(err) => {
                        if verbose {
                            println!("            {} {}", "✗".red(), err);
                        }
                    }
                },
                Action::Layout { mode } => handle.set_layout(*mode)?,
                Action::Sync { enabled } => handle.set_sync_enabled(*enabled)?,
                Action::Focus { enabled } => handle.set_focus_mode(*enabled)?,
                Action::Resize { fraction } => handle.resize(*fraction)?,
                Action::Reset => handle.reset()?,
                Action::Save => handle.mark_saved()?,
            }
        }

        sleep(Duration::from_millis(script.settle_ms)).await;
        let status = handle.status().await?;
        handle.shutdown()?;
        Ok::<_, anyhow::Error>(status)
    };

    let (shell, status) = tokio::join!(driver.run(), session);
    Ok((status?, shell))
}

fn describe(action: &Action) -> String {
    match action {
        Action::Scroll { pane, top } => format!("scroll {} to {}", pane, top),
        Action::Activate { section } => format!("activate {}", section),
        Action::Edit { mutation } => format!("edit {}", serde_json::to_string(mutation).unwrap_or_default()),
        Action::Layout { mode } => format!("layout {}", mode),
        Action::Sync { enabled } => format!("sync {}", if *enabled { "on" } else { "off" }),
        Action::Focus { enabled } => format!("focus mode {}", if *enabled { "on" } else { "off" }),
        Action::Resize { fraction } => format!("resize split to {}", fraction),
        Action::Reset => "reset".to_string(),
        Action::Save => "save".to_string(),
    }
}

fn print_summary(status: &ShellStatus, shell: &ReplayShell) {
    println!();
    println!("✨ {} Replay complete", "Done".green().bold());
    println!("   Layout:        {}", status.layout);
    println!("   Sync:          {:?} (live: {})", status.sync_state, status.sync_live);
    println!(
        "   Document:      version {} (preview at {}){}",
        status.version,
        status.published_version,
        if status.dirty { ", unsaved changes" } else { "" }
    );
    if let Some(section) = status.active_section {
        println!("   Viewing:       {}", section);
    }
    if let Some(preview) = shell.preview() {
        let tabs: Vec<&str> = preview.tab_selections().iter().map(|tab| tab.as_str()).collect();
        println!("   Tabs selected: {}", if tabs.is_empty() { "-".to_string() } else { tabs.join(" → ") });
        if let Some(section) = preview.highlight() {
            println!("   Highlighted:   {}", section);
        }
    }
    println!("   Split:         {:.0}% editor", status.split_fraction * 100.0);
    if status.pending_timers > 0 {
        println!("   {} {} timers still pending", "⚠️".yellow(), status.pending_timers);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitae_document::{ResumeData, SectionId};
    use vitae_editor::{PreviewTabId, SyncState};

    #[tokio::test(start_paused = true)]
    async fn test_replay_activation_and_edit() {
        let script = Script::from_json_str(
            r#"{
                "settleMs": 1200,
                "steps": [
                    { "at": 0, "action": { "type": "activate", "section": "certifications" } },
                    { "at": 50, "action": { "type": "edit", "mutation": {
                        "op": "appendItem", "collection": "certifications",
                        "item": { "kind": "text", "value": "CKA" } } } },
                    { "at": 60, "action": { "type": "resize", "fraction": 0.9 } }
                ]
            }"#,
        )
        .unwrap();
        let store = DocumentStore::new("replay", ResumeData::default());

        let (status, shell) = run_script(EditorConfig::default(), store, script, false).await.unwrap();

        assert_eq!(status.sync_state, SyncState::Idle);
        assert_eq!(status.pending_timers, 0);
        assert_eq!(status.version, 1);
        assert_eq!(status.published_version, 1);
        assert_eq!(status.highlighted, Some(SectionId::Certifications));
        assert!((status.split_fraction - 0.7).abs() < 1e-9);

        let preview = shell.preview().unwrap();
        assert_eq!(preview.tab_selections(), &[PreviewTabId::Education]);
        assert_eq!(preview.rendered_version(), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_replay_with_invalid_config_still_edits() {
        let config = EditorConfig {
            scroll_release_ms: 0,
            ..Default::default()
        };
        let script = Script::from_json_str(
            r#"{ "steps": [
                { "at": 0, "action": { "type": "scroll", "pane": "editor", "top": 400 } },
                { "at": 10, "action": { "type": "edit", "mutation": { "op": "setField", "field": "bio", "value": "x" } } }
            ] }"#,
        )
        .unwrap();
        let store = DocumentStore::new("replay", ResumeData::default());

        let (status, shell) = run_script(config, store, script, false).await.unwrap();

        assert!(!status.sync_live);
        assert_eq!(status.version, 1);
        assert_eq!(shell.preview().unwrap().assignments(), 0);
    }
}
