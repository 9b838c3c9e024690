//! Frame model - container for the four input collections

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::{self, AnalysisOptions};
use crate::elements::{Member, Node, Support};
use crate::error::{FrameError, FrameResult};
use crate::loads::PointLoad;
use crate::results::AnalysisResult;

/// A plane frame: nodes, members, supports and point loads.
///
/// The `add_*` methods check references as the model is built so problems
/// surface where they are introduced. Models deserialized from JSON are
/// checked by the solver instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameModel {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub supports: Vec<Support>,
    #[serde(default)]
    pub loads: Vec<PointLoad>,
}

impl FrameModel {
    /// Create a new empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a model from JSON
    pub fn from_json(json: &str) -> FrameResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a model from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> FrameResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize the model to pretty JSON
    pub fn to_json(&self) -> FrameResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn node(&self, id: &str) -> FrameResult<&Node> {
        self.nodes
            .iter()
            .find(|n| n.id == id)
            .ok_or_else(|| FrameError::NodeNotFound(id.to_string()))
    }

    pub fn member(&self, id: &str) -> FrameResult<&Member> {
        self.members
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| FrameError::MemberNotFound(id.to_string()))
    }

    fn has_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    fn has_member(&self, id: &str) -> bool {
        self.members.iter().any(|m| m.id == id)
    }

    // ========================
    // Model Building Methods
    // ========================

    /// Add a node to the model
    pub fn add_node(&mut self, node: Node) -> FrameResult<()> {
        if self.has_node(&node.id) {
            return Err(FrameError::DuplicateName(node.id));
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Add a member to the model
    pub fn add_member(&mut self, member: Member) -> FrameResult<()> {
        for node in [&member.start, &member.end] {
            if !self.has_node(node) {
                return Err(FrameError::NodeNotFound(node.clone()));
            }
        }
        if self.has_member(&member.id) {
            return Err(FrameError::DuplicateName(member.id));
        }
        self.members.push(member);
        Ok(())
    }

    /// Add a support condition
    pub fn add_support(&mut self, support: Support) -> FrameResult<()> {
        if !self.has_node(&support.node) {
            return Err(FrameError::NodeNotFound(support.node));
        }
        if self.supports.iter().any(|s| s.id == support.id) {
            return Err(FrameError::DuplicateName(support.id));
        }
        self.supports.push(support);
        Ok(())
    }

    /// Add a point load to a member
    pub fn add_load(&mut self, load: PointLoad) -> FrameResult<()> {
        if !self.has_member(&load.member) {
            return Err(FrameError::MemberNotFound(load.member));
        }
        if self.loads.iter().any(|l| l.id == load.id) {
            return Err(FrameError::DuplicateName(load.id));
        }
        self.loads.push(load);
        Ok(())
    }

    /// Remove a node together with everything that references it
    pub fn remove_node(&mut self, id: &str) -> FrameResult<Node> {
        let index = self
            .nodes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| FrameError::NodeNotFound(id.to_string()))?;

        let dropped: HashSet<String> = self
            .members
            .iter()
            .filter(|m| m.connects(id))
            .map(|m| m.id.clone())
            .collect();
        self.members.retain(|m| !dropped.contains(&m.id));
        self.loads.retain(|l| !dropped.contains(&l.member));
        self.supports.retain(|s| s.node != id);

        Ok(self.nodes.remove(index))
    }

    // ========================
    // Analysis Methods
    // ========================

    /// Run linear static analysis with default options
    pub fn analyze(&self) -> FrameResult<AnalysisResult> {
        self.analyze_with(&AnalysisOptions::default())
    }

    /// Run analysis with custom options
    pub fn analyze_with(&self, options: &AnalysisOptions) -> FrameResult<AnalysisResult> {
        analysis::solve_with(
            &self.nodes,
            &self.members,
            &self.supports,
            &self.loads,
            options,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Section;
    use approx::assert_relative_eq;

    fn cantilever() -> FrameModel {
        let mut model = FrameModel::new();
        model.add_node(Node::new("N1", 0.0, 0.0)).unwrap();
        model.add_node(Node::new("N2", 10.0, 0.0)).unwrap();
        model
            .add_member(Member::new("M1", "N1", "N2", Section::rectangular(200e9, 0.3, 0.5)))
            .unwrap();
        model.add_support(Support::fixed("S1", "N1")).unwrap();
        model
            .add_load(PointLoad::downward("P1", "M1", 10000.0, 10.0))
            .unwrap();
        model
    }

    #[test]
    fn test_simple_cantilever() {
        let model = cantilever();
        let result = model.analyze().unwrap();

        let disp = result.displacement("N2").unwrap();
        assert!(disp.dy < 0.0, "Expected negative Y displacement");

        let rxn = result.reaction("N1").unwrap();
        assert_relative_eq!(rxn.fy, 10000.0, epsilon = 1e-6);
        assert_relative_eq!(rxn.mz, 100000.0, epsilon = 1e-4);
    }

    #[test]
    fn test_building_checks_references() {
        let mut model = cantilever();
        assert!(matches!(
            model.add_node(Node::new("N1", 1.0, 1.0)),
            Err(FrameError::DuplicateName(_))
        ));
        assert!(matches!(
            model.add_member(Member::new("M2", "N1", "N9", Section::default())),
            Err(FrameError::NodeNotFound(id)) if id == "N9"
        ));
        assert!(matches!(
            model.add_load(PointLoad::new("P2", "M9", -1.0, 0.0)),
            Err(FrameError::MemberNotFound(_))
        ));
        assert!(matches!(
            model.add_support(Support::pin("S2", "N7")),
            Err(FrameError::NodeNotFound(_))
        ));
    }

    #[test]
    fn test_remove_node_cascades() {
        let mut model = cantilever();
        model.remove_node("N2").unwrap();
        assert!(model.members.is_empty());
        assert!(model.loads.is_empty());
        assert_eq!(model.supports.len(), 1);
    }

    #[test]
    fn test_json_roundtrip_preserves_model() {
        let model = cantilever();
        let json = model.to_json().unwrap();
        assert_eq!(FrameModel::from_json(&json).unwrap(), model);
        assert!(FrameModel::from_json("{not json").is_err());
    }
}
