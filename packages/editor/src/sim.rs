//! In-memory panes with a toy layout model.
//!
//! Used by the tests and the CLI replay. Section heights grow with the
//! number of entries they render so edits visibly change scroll geometry.

use crate::propagator::PreviewSnapshot;
use crate::surface::{PreviewSurface, ScrollMetrics, ScrollPane};
use crate::tabs::{PreviewTabId, SectionTabMap};
use std::collections::{BTreeMap, BTreeSet};
use vitae_document::{ResumeDocument, SectionId};

const TAB_HEADER_HEIGHT: f64 = 64.0;
const SECTION_BASE_HEIGHT: f64 = 120.0;
const ROW_HEIGHT: f64 = 80.0;

/// Rendered height of one section
pub fn section_height(doc: &ResumeDocument, section: SectionId) -> f64 {
    SECTION_BASE_HEIGHT + ROW_HEIGHT * doc.section_len(section) as f64
}

/// Height of the editing form, which shows every section at once
pub fn form_height(doc: &ResumeDocument) -> f64 {
    SectionId::ALL
        .iter()
        .map(|section| section_height(doc, *section) * 1.5)
        .sum()
}

#[derive(Debug, Clone)]
pub struct SimulatedPane {
    metrics: ScrollMetrics,
    assignments: usize,
}

impl SimulatedPane {
    pub fn new(scroll_height: f64, client_height: f64) -> Self {
        Self {
            metrics: ScrollMetrics::new(0.0, scroll_height, client_height),
            assignments: 0,
        }
    }

    /// Scroll as the user would; returns the metrics the pane would report
    pub fn user_scroll(&mut self, top: f64) -> ScrollMetrics {
        self.metrics.scroll_top = self.clamp(top);
        self.metrics
    }

    /// Change content height, keeping the offset in range
    pub fn set_content_height(&mut self, scroll_height: f64) {
        self.metrics.scroll_height = scroll_height;
        self.metrics.scroll_top = self.clamp(self.metrics.scroll_top);
    }

    /// Number of programmatic offset assignments received
    pub fn assignments(&self) -> usize {
        self.assignments
    }

    fn clamp(&self, top: f64) -> f64 {
        top.clamp(0.0, self.metrics.scroll_range().max(0.0))
    }
}

impl ScrollPane for SimulatedPane {
    fn metrics(&self) -> ScrollMetrics {
        self.metrics
    }

    fn set_scroll_top(&mut self, top: f64) {
        self.assignments += 1;
        self.metrics.scroll_top = self.clamp(top);
    }
}

/// Tabbed preview laid out from the section → tab table
#[derive(Debug, Clone)]
pub struct SimulatedPreview {
    pane: SimulatedPane,
    tabs: SectionTabMap,
    active_tab: Option<PreviewTabId>,
    heights: BTreeMap<SectionId, f64>,
    /// Sections whose node is not mounted
    missing: BTreeSet<SectionId>,
    highlight: Option<SectionId>,
    focus_mode: bool,
    rendered_version: Option<u64>,
    tab_selections: Vec<PreviewTabId>,
    scrolled_to: Vec<SectionId>,
}

impl SimulatedPreview {
    pub fn new(tabs: SectionTabMap, client_height: f64) -> Self {
        let empty = ResumeDocument::default();
        let mut preview = Self {
            pane: SimulatedPane::new(client_height, client_height),
            tabs,
            active_tab: Some(PreviewTabId::Experience),
            heights: BTreeMap::new(),
            missing: BTreeSet::new(),
            highlight: None,
            focus_mode: false,
            rendered_version: None,
            tab_selections: Vec::new(),
            scrolled_to: Vec::new(),
        };
        preview.measure(&empty);
        preview
    }

    /// Unmount a section's node, as if the tab lacked the marker
    pub fn without_section(mut self, section: SectionId) -> Self {
        self.missing.insert(section);
        self
    }

    pub fn user_scroll(&mut self, top: f64) -> ScrollMetrics {
        self.pane.user_scroll(top)
    }

    pub fn assignments(&self) -> usize {
        self.pane.assignments()
    }

    pub fn highlight(&self) -> Option<SectionId> {
        self.highlight
    }

    pub fn focus_mode(&self) -> bool {
        self.focus_mode
    }

    pub fn rendered_version(&self) -> Option<u64> {
        self.rendered_version
    }

    /// Every programmatic tab selection, in order
    pub fn tab_selections(&self) -> &[PreviewTabId] {
        &self.tab_selections
    }

    /// Every section scrolled into view, in order
    pub fn scrolled_to(&self) -> &[SectionId] {
        &self.scrolled_to
    }

    /// Offset of a section's node within the active tab
    pub fn section_offset(&self, section: SectionId) -> Option<f64> {
        let tab = self.active_tab?;
        if self.tabs.tab_for(section) != tab || self.missing.contains(&section) {
            return None;
        }

        let before: f64 = self
            .tabs
            .sections_on(tab)
            .into_iter()
            .take_while(|s| *s != section)
            .map(|s| self.heights.get(&s).copied().unwrap_or(0.0))
            .sum();
        Some(TAB_HEADER_HEIGHT + before)
    }

    fn measure(&mut self, doc: &ResumeDocument) {
        self.heights = SectionId::ALL
            .into_iter()
            .map(|section| (section, section_height(doc, section)))
            .collect();
        self.layout();
    }

    fn layout(&mut self) {
        let content: f64 = match self.active_tab {
            Some(tab) => self
                .tabs
                .sections_on(tab)
                .iter()
                .map(|s| self.heights.get(s).copied().unwrap_or(0.0))
                .sum(),
            None => 0.0,
        };
        let client = self.pane.metrics().client_height;
        self.pane
            .set_content_height((TAB_HEADER_HEIGHT + content).max(client));
    }
}

impl ScrollPane for SimulatedPreview {
    fn metrics(&self) -> ScrollMetrics {
        self.pane.metrics()
    }

    fn set_scroll_top(&mut self, top: f64) {
        self.pane.set_scroll_top(top);
    }
}

impl PreviewSurface for SimulatedPreview {
    fn render(&mut self, snapshot: &PreviewSnapshot) {
        self.measure(&snapshot.document);
        self.rendered_version = Some(snapshot.version);
    }

    fn active_tab(&self) -> Option<PreviewTabId> {
        self.active_tab
    }

    fn select_tab(&mut self, tab: PreviewTabId) {
        self.active_tab = Some(tab);
        self.tab_selections.push(tab);
        self.layout();
        self.pane.user_scroll(0.0);
    }

    fn scroll_section_into_view(&mut self, section: SectionId) -> bool {
        match self.section_offset(section) {
            Some(offset) => {
                self.pane.set_scroll_top(offset);
                self.scrolled_to.push(section);
                true
            }
            None => false,
        }
    }

    fn set_highlight(&mut self, section: Option<SectionId>) {
        self.highlight = section;
    }

    fn set_focus_mode(&mut self, enabled: bool) {
        self.focus_mode = enabled;
    }
}
