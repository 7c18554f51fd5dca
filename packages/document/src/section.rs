//! Logical editing groups exposed by the editor form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One collapsible group of the editing form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionId {
    Profile,
    Experience,
    Skills,
    Education,
    Projects,
    Certifications,
    AdditionalInfo,
}

impl SectionId {
    /// Every section, in form order
    pub const ALL: [SectionId; 7] = [
        SectionId::Profile,
        SectionId::Experience,
        SectionId::Skills,
        SectionId::Education,
        SectionId::Projects,
        SectionId::Certifications,
        SectionId::AdditionalInfo,
    ];

    /// Marker name used to tag the section's node in either pane
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionId::Profile => "profile",
            SectionId::Experience => "experience",
            SectionId::Skills => "skills",
            SectionId::Education => "education",
            SectionId::Projects => "projects",
            SectionId::Certifications => "certifications",
            SectionId::AdditionalInfo => "additionalInfo",
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Unknown section: {0}")]
pub struct UnknownSection(pub String);

impl FromStr for SectionId {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionId::ALL
            .into_iter()
            .find(|section| section.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownSection(s.to_string()))
    }
}
