//! Preview tabs and the static section → tab table.

use serde::{Deserialize, Serialize};
use std::fmt;
use vitae_document::SectionId;

/// One tab of the read-only preview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PreviewTabId {
    Experience,
    Skills,
    Education,
    Projects,
    Github,
    Contact,
}

impl PreviewTabId {
    pub const ALL: [PreviewTabId; 6] = [
        PreviewTabId::Experience,
        PreviewTabId::Skills,
        PreviewTabId::Education,
        PreviewTabId::Projects,
        PreviewTabId::Github,
        PreviewTabId::Contact,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PreviewTabId::Experience => "experience",
            PreviewTabId::Skills => "skills",
            PreviewTabId::Education => "education",
            PreviewTabId::Projects => "projects",
            PreviewTabId::Github => "github",
            PreviewTabId::Contact => "contact",
        }
    }
}

impl fmt::Display for PreviewTabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which preview tab shows each editing section
///
/// One field per [`SectionId`], so the table is total by construction.
/// Profile and additional info have no tab of their own; the default
/// table files both under experience, next to the career summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionTabMap {
    pub profile: PreviewTabId,
    pub experience: PreviewTabId,
    pub skills: PreviewTabId,
    pub education: PreviewTabId,
    pub projects: PreviewTabId,
    pub certifications: PreviewTabId,
    pub additional_info: PreviewTabId,
}

impl Default for SectionTabMap {
    fn default() -> Self {
        Self {
            profile: PreviewTabId::Experience,
            experience: PreviewTabId::Experience,
            skills: PreviewTabId::Skills,
            education: PreviewTabId::Education,
            projects: PreviewTabId::Projects,
            certifications: PreviewTabId::Education,
            additional_info: PreviewTabId::Experience,
        }
    }
}

impl SectionTabMap {
    pub fn tab_for(&self, section: SectionId) -> PreviewTabId {
        match section {
            SectionId::Profile => self.profile,
            SectionId::Experience => self.experience,
            SectionId::Skills => self.skills,
            SectionId::Education => self.education,
            SectionId::Projects => self.projects,
            SectionId::Certifications => self.certifications,
            SectionId::AdditionalInfo => self.additional_info,
        }
    }

    /// Sections rendered inside a tab, in form order
    pub fn sections_on(&self, tab: PreviewTabId) -> Vec<SectionId> {
        SectionId::ALL
            .into_iter()
            .filter(|section| self.tab_for(*section) == tab)
            .collect()
    }
}
