//! Section activation pipeline against the simulated tabbed preview

use std::time::Duration;
use tokio::time::Instant;
use vitae_document::{DocumentStore, ResumeData, SectionId};
use vitae_editor::sim::{form_height, SimulatedPane, SimulatedPreview};
use vitae_editor::{
    DualPaneShell, EditorConfig, LayoutMode, PaneSide, PreviewSurface, PreviewTabId, ScrollEvent,
    ScrollOutcome, ScrollPane, SyncState,
};

type Shell = DualPaneShell<SimulatedPane, SimulatedPreview>;

fn sample_data() -> ResumeData {
    ResumeData::from_json_str(
        r#"{
            "profile": { "name": "Elijah Clark", "title": "Full Stack Engineer" },
            "experience": [
                { "company": "Maximus", "position": "Software Engineer", "period": "2017 - Present" },
                { "company": "Conatus", "position": "Founder", "period": "2018 - Present" },
                { "company": "Maximus", "position": "IT PM Senior Analyst", "period": "2015 - 2017" }
            ],
            "skills": {
                "frontend": [{ "name": "TypeScript" }, { "name": "React" }],
                "backend": [{ "name": "Rust" }, { "name": "Java" }],
                "cloud": [{ "name": "AWS" }],
                "databases": [{ "name": "PostgreSQL" }]
            },
            "education": [
                { "school": "SUNY Albany", "degree": "B.S.", "period": "2010 - 2014" },
                { "school": "HVCC", "degree": "A.S.", "period": "2008 - 2010" }
            ],
            "projects": [
                { "title": "Portfolio" },
                { "title": "Conatus Platform" },
                { "title": "Provisioning Bot" }
            ],
            "certifications": ["AWS SA", "CKA", "Terraform Associate", "Scrum Master"],
            "additionalInfo": ["Mentor", "Speaker"]
        }"#,
    )
    .unwrap()
}

fn shell_with_preview(preview: SimulatedPreview) -> Shell {
    let config = EditorConfig::default();
    let store = DocumentStore::new("activation", sample_data());
    let editor_height = form_height(&store.current());

    let mut shell = Shell::new(config, store);
    shell.attach_editor(SimulatedPane::new(editor_height, 600.0));
    shell.attach_preview(preview);
    shell
}

fn shell() -> Shell {
    shell_with_preview(SimulatedPreview::new(EditorConfig::default().section_tabs, 300.0))
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

#[test]
fn test_certifications_reveal_on_education_tab() {
    let mut shell = shell();
    let start = Instant::now();

    shell.activate_section(SectionId::Certifications, start);
    assert_eq!(shell.active_tab_hint(), Some(PreviewTabId::Education));
    assert_eq!(shell.preview().unwrap().tab_selections(), &[PreviewTabId::Education]);
    assert_eq!(shell.sync_state(), SyncState::DrivenByEditorPane);

    shell.fire_due(start + ms(199));
    assert!(shell.preview().unwrap().scrolled_to().is_empty());

    shell.fire_due(start + ms(200));
    let preview = shell.preview().unwrap();
    assert_eq!(preview.scrolled_to(), &[SectionId::Certifications]);
    assert_eq!(preview.highlight(), Some(SectionId::Certifications));
    assert_eq!(
        Some(preview.metrics().scroll_top),
        preview.section_offset(SectionId::Certifications)
    );

    // The reveal scroll reaches the controller as a preview event; it is an echo
    let echo = ScrollEvent {
        pane: PaneSide::Preview,
        metrics: shell.preview().unwrap().metrics(),
    };
    assert_eq!(shell.on_scroll(echo, start + ms(210)), ScrollOutcome::Echo);
    assert_eq!(shell.editor().unwrap().assignments(), 0);

    shell.fire_due(start + ms(999));
    assert_eq!(shell.sync_state(), SyncState::DrivenByEditorPane);

    shell.fire_due(start + ms(1000));
    assert_eq!(shell.sync_state(), SyncState::Idle);
    assert_eq!(shell.pending_timers(), 0);
}

#[test]
fn test_latest_request_wins_before_tab_settle() {
    let mut shell = shell();
    let start = Instant::now();

    let first = shell.activate_section(SectionId::Skills, start);
    let second = shell.activate_section(SectionId::Projects, start + ms(100));
    assert!(second.request_id > first.request_id);

    shell.fire_due(start + ms(3000));

    let preview = shell.preview().unwrap();
    assert_eq!(
        preview.tab_selections(),
        &[PreviewTabId::Skills, PreviewTabId::Projects]
    );
    assert_eq!(preview.scrolled_to(), &[SectionId::Projects]);
    assert_eq!(preview.highlight(), Some(SectionId::Projects));
    assert_eq!(shell.sync_state(), SyncState::Idle);
}

#[test]
fn test_superseded_hold_is_not_released_early() {
    let mut shell = shell();
    let start = Instant::now();

    shell.activate_section(SectionId::Education, start);
    shell.fire_due(start + ms(200));
    assert_eq!(shell.highlighted(), Some(SectionId::Education));

    shell.activate_section(SectionId::Skills, start + ms(300));
    assert_eq!(shell.preview().unwrap().highlight(), None);

    // The education pipeline would have released at 1000ms
    shell.fire_due(start + ms(1000));
    assert_eq!(shell.sync_state(), SyncState::DrivenByEditorPane);
    assert_eq!(shell.highlighted(), Some(SectionId::Skills));

    shell.fire_due(start + ms(1300));
    assert_eq!(shell.sync_state(), SyncState::Idle);
}

#[test]
fn test_repeat_activation_is_idempotent() {
    let start = Instant::now();

    let mut once = shell();
    once.activate_section(SectionId::Education, start);
    once.fire_due(start + ms(2000));

    let mut twice = shell();
    twice.activate_section(SectionId::Education, start);
    twice.fire_due(start + ms(1500));
    twice.activate_section(SectionId::Education, start + ms(1500));
    twice.fire_due(start + ms(4000));

    assert_eq!(once.status(), twice.status());
    let (a, b) = (once.preview().unwrap(), twice.preview().unwrap());
    assert_eq!(a.metrics(), b.metrics());
    assert_eq!(a.highlight(), b.highlight());
    assert_eq!(a.active_tab(), b.active_tab());
    // Tab already shown, so the second request does not reselect it
    assert_eq!(b.tab_selections(), &[PreviewTabId::Education]);
}

#[test]
fn test_missing_node_releases_hold() {
    let preview = SimulatedPreview::new(EditorConfig::default().section_tabs, 300.0)
        .without_section(SectionId::Certifications);
    let mut shell = shell_with_preview(preview);
    let start = Instant::now();

    shell.activate_section(SectionId::Certifications, start);
    shell.fire_due(start + ms(200));
    assert_eq!(shell.highlighted(), None);

    shell.fire_due(start + ms(1000));
    assert_eq!(shell.sync_state(), SyncState::Idle);
    assert_eq!(shell.pending_timers(), 0);
    assert!(shell.preview().unwrap().scrolled_to().is_empty());
}

#[test]
fn test_mode_switch_mid_activation_leaves_no_timers() {
    let mut shell = shell();
    let start = Instant::now();

    shell.activate_section(SectionId::Education, start);
    shell.fire_due(start + ms(200));
    assert_eq!(shell.preview().unwrap().highlight(), Some(SectionId::Education));

    shell.set_layout(LayoutMode::EditorOnly);

    assert_eq!(shell.pending_timers(), 0);
    assert_eq!(shell.sync_state(), SyncState::Idle);
    assert_eq!(shell.preview().unwrap().highlight(), None);
    assert_eq!(shell.fire_due(start + ms(5000)), 0);
    assert_eq!(shell.active_section(), Some(SectionId::Education));
}

#[test]
fn test_disabled_sync_only_tracks_label() {
    let mut shell = shell();
    shell.set_sync_enabled(false);

    shell.activate_section(SectionId::Skills, Instant::now());

    assert_eq!(shell.active_section(), Some(SectionId::Skills));
    assert_eq!(shell.active_tab_hint(), Some(PreviewTabId::Skills));
    assert!(shell.preview().unwrap().tab_selections().is_empty());
    assert_eq!(shell.pending_timers(), 0);
}

#[test]
fn test_editor_scroll_during_hold_mirrors_without_release() {
    let mut shell = shell();
    let start = Instant::now();

    shell.activate_section(SectionId::Experience, start);
    let outcome = shell.scroll_pane_to(PaneSide::Editor, 400.0, start + ms(50));

    assert!(matches!(outcome, ScrollOutcome::Mirrored { .. }));
    // Only the activation stage is pending; no release timer was armed
    assert_eq!(shell.pending_timers(), 1);
    assert_eq!(shell.sync_state(), SyncState::DrivenByEditorPane);
}

#[test]
fn test_focus_mode_follows_highlight() {
    let mut shell = shell();
    let start = Instant::now();

    shell.set_focus_mode(true);
    assert!(!shell.preview().unwrap().focus_mode());

    shell.activate_section(SectionId::Projects, start);
    shell.fire_due(start + ms(200));
    assert!(shell.preview().unwrap().focus_mode());

    shell.activate_section(SectionId::Skills, start + ms(250));
    assert!(!shell.preview().unwrap().focus_mode());

    shell.fire_due(start + ms(450));
    assert!(shell.preview().unwrap().focus_mode());

    shell.set_focus_mode(false);
    assert!(!shell.preview().unwrap().focus_mode());
}
