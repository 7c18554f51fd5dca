//! # Pane Surfaces
//!
//! The coordination core never touches a real container. It talks to the
//! two panes through these traits; a browser host implements them over DOM
//! elements, tests and the CLI use [`crate::sim`].

use crate::propagator::PreviewSnapshot;
use crate::tabs::PreviewTabId;
use serde::{Deserialize, Serialize};
use std::fmt;
use vitae_document::SectionId;

/// Scroll geometry of one pane, captured at event time
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_top: f64, scroll_height: f64, client_height: f64) -> Self {
        Self {
            scroll_top,
            scroll_height,
            client_height,
        }
    }

    /// Distance the pane can scroll
    pub fn scroll_range(&self) -> f64 {
        self.scroll_height - self.client_height
    }

    /// Content fits the viewport, there is nothing to mirror
    pub fn is_degenerate(&self) -> bool {
        !(self.scroll_range() > 0.0)
    }

    /// Fractional position in [0, 1]; 0 for degenerate geometry
    pub fn ratio(&self) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        (self.scroll_top / self.scroll_range().max(1.0)).clamp(0.0, 1.0)
    }

    /// Scroll offset that puts this pane at `ratio`
    pub fn offset_for(&self, ratio: f64) -> f64 {
        ratio * self.scroll_range().max(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaneSide {
    Editor,
    Preview,
}

impl PaneSide {
    pub fn other(&self) -> PaneSide {
        match self {
            PaneSide::Editor => PaneSide::Preview,
            PaneSide::Preview => PaneSide::Editor,
        }
    }
}

impl fmt::Display for PaneSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaneSide::Editor => f.write_str("editor"),
            PaneSide::Preview => f.write_str("preview"),
        }
    }
}

/// A scroll event raised by one pane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollEvent {
    pub pane: PaneSide,
    pub metrics: ScrollMetrics,
}

/// An independently scrollable container
pub trait ScrollPane {
    /// Current geometry
    fn metrics(&self) -> ScrollMetrics;

    /// Assign the scroll offset directly, without animation
    fn set_scroll_top(&mut self, top: f64);
}

/// The read-only rendered preview
pub trait PreviewSurface: ScrollPane {
    /// Re-render from a published snapshot
    fn render(&mut self, snapshot: &PreviewSnapshot);

    /// Tab currently shown, if any
    fn active_tab(&self) -> Option<PreviewTabId>;

    /// Programmatically select a tab
    fn select_tab(&mut self, tab: PreviewTabId);

    /// Scroll the node tagged with `section` into view; false if the
    /// visible tab has no such node
    fn scroll_section_into_view(&mut self, section: SectionId) -> bool;

    /// Mark one section as highlighted, clearing any other
    fn set_highlight(&mut self, section: Option<SectionId>);

    /// Dim everything except the highlighted section
    fn set_focus_mode(&mut self, _enabled: bool) {}
}
