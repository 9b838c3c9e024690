//! Degree-of-freedom numbering

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::elements::Node;
use crate::error::{FrameError, FrameResult};

/// Number of unknowns carried by each node
pub const DOFS_PER_NODE: usize = 3;

/// Kind of nodal unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DofKind {
    X,
    Y,
    Rotation,
}

impl DofKind {
    pub const ALL: [DofKind; 3] = [DofKind::X, DofKind::Y, DofKind::Rotation];

    /// Offset within the node's block of unknowns
    pub fn offset(self) -> usize {
        match self {
            DofKind::X => 0,
            DofKind::Y => 1,
            DofKind::Rotation => 2,
        }
    }
}

impl fmt::Display for DofKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DofKind::X => "dx",
            DofKind::Y => "dy",
            DofKind::Rotation => "rz",
        };
        f.write_str(name)
    }
}

/// Maps `(node, kind)` to a global equation number.
///
/// Node `i` of the input slice owns equations `3i..3i+3`.
#[derive(Debug, Clone, Default)]
pub struct DofMap {
    ids: Vec<String>,
    index: HashMap<String, usize>,
}

impl DofMap {
    /// Number the nodes in input order
    pub fn new(nodes: &[Node]) -> FrameResult<Self> {
        let mut index = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if !node.is_finite() {
                return Err(FrameError::InvalidInput(format!(
                    "node '{}' has non-finite coordinates ({}, {})",
                    node.id, node.x, node.y
                )));
            }
            if index.insert(node.id.clone(), i).is_some() {
                return Err(FrameError::DuplicateName(node.id.clone()));
            }
        }

        Ok(Self {
            ids: nodes.iter().map(|n| n.id.clone()).collect(),
            index,
        })
    }

    /// Total number of unknowns
    pub fn n_dofs(&self) -> usize {
        self.ids.len() * DOFS_PER_NODE
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Position of a node in the input order
    pub fn node_index(&self, id: &str) -> FrameResult<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| FrameError::NodeNotFound(id.to_string()))
    }

    /// First equation of a node
    pub fn base(&self, id: &str) -> FrameResult<usize> {
        Ok(self.node_index(id)? * DOFS_PER_NODE)
    }

    /// Global equation of one unknown
    pub fn dof(&self, id: &str, kind: DofKind) -> FrameResult<usize> {
        Ok(self.base(id)? + kind.offset())
    }

    /// Node id and kind of a global equation
    pub fn label(&self, dof: usize) -> Option<(&str, DofKind)> {
        let node = self.ids.get(dof / DOFS_PER_NODE)?;
        Some((node.as_str(), DofKind::ALL[dof % DOFS_PER_NODE]))
    }

    /// Human readable name of a global equation, e.g. `N3.rz`
    pub fn describe(&self, dof: usize) -> String {
        match self.label(dof) {
            Some((node, kind)) => format!("{}.{}", node, kind),
            None => format!("#{}", dof),
        }
    }
}
