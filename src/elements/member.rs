//! Member element - 2D frame element (beam/column)

use serde::{Deserialize, Serialize};

use super::Section;

/// Connection of a member end to its node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndRelease {
    /// Rigid connection, moment is transferred
    #[default]
    Fixed,
    /// Hinge, no moment transfer
    Pinned,
}

impl EndRelease {
    pub fn is_pinned(self) -> bool {
        self == EndRelease::Pinned
    }
}

/// A 2D frame member (beam or column)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Identity, unique among members
    pub id: String,
    /// Id of the start node
    pub start: String,
    /// Id of the end node
    pub end: String,
    /// Connection at the start node
    #[serde(default)]
    pub start_release: EndRelease,
    /// Connection at the end node
    #[serde(default)]
    pub end_release: EndRelease,
    /// Section properties
    #[serde(default)]
    pub section: Section,
}

impl Member {
    /// Create a new member rigidly connected at both ends
    pub fn new(id: &str, start: &str, end: &str, section: Section) -> Self {
        Self {
            id: id.to_string(),
            start: start.to_string(),
            end: end.to_string(),
            start_release: EndRelease::Fixed,
            end_release: EndRelease::Fixed,
            section,
        }
    }

    /// Set member end releases
    pub fn with_releases(mut self, start: EndRelease, end: EndRelease) -> Self {
        self.start_release = start;
        self.end_release = end;
        self
    }

    /// Hinge at the start node
    pub fn pin_start(self) -> Self {
        let end = self.end_release;
        self.with_releases(EndRelease::Pinned, end)
    }

    /// Hinge at the end node
    pub fn pin_end(self) -> Self {
        let start = self.start_release;
        self.with_releases(start, EndRelease::Pinned)
    }

    /// Hinges at both ends (axial-only member)
    pub fn pin_both(self) -> Self {
        self.with_releases(EndRelease::Pinned, EndRelease::Pinned)
    }

    /// Releases as `[start, end]`
    pub fn releases(&self) -> [EndRelease; 2] {
        [self.start_release, self.end_release]
    }

    /// Check whether the member touches a node
    pub fn connects(&self, node: &str) -> bool {
        self.start == node || self.end == node
    }
}
