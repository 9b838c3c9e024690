//! Element formulation: geometry, stiffness and equivalent loads of one member

use crate::elements::{Member, Node};
use crate::error::{FrameError, FrameResult};
use crate::loads::PointLoad;
use crate::math::{self, Mat6, Vec, Vec6};

use super::dof::{DofMap, DOFS_PER_NODE};

/// Relative slack allowed on a load position before it counts as off the member
const POSITION_TOLERANCE: f64 = 1e-9;

/// A member resolved against the node table, with its point loads attached
#[derive(Debug, Clone)]
pub struct MemberElement<'a> {
    pub member: &'a Member,
    /// Loads on this member with positions clamped to `[0, L]`
    pub loads: std::vec::Vec<(f64, f64)>,
    pub c: f64,
    pub s: f64,
    pub length: f64,
    /// Global -> local rotation
    pub transform: Mat6,
    /// Local stiffness, end releases already condensed
    pub k_local: Mat6,
    start_base: usize,
    end_base: usize,
}

impl<'a> MemberElement<'a> {
    /// Formulate a member, validating its references and geometry
    pub fn new(
        member: &'a Member,
        nodes: &[Node],
        dof_map: &DofMap,
        loads: &[&PointLoad],
    ) -> FrameResult<Self> {
        let start_index = dof_map.node_index(&member.start)?;
        let end_index = dof_map.node_index(&member.end)?;
        let start = &nodes[start_index];
        let end = &nodes[end_index];

        let (c, s, length) = math::direction_cosines(&start.coords(), &end.coords()).ok_or_else(
            || FrameError::ZeroLengthMember {
                member: member.id.clone(),
                start: member.start.clone(),
                end: member.end.clone(),
            },
        )?;

        member.section.validate(&member.id)?;

        let slack = POSITION_TOLERANCE * length;
        let mut placed = std::vec::Vec::with_capacity(loads.len());
        for load in loads {
            if !load.magnitude.is_finite() {
                return Err(FrameError::InvalidInput(format!(
                    "load '{}' has a non-finite magnitude",
                    load.id
                )));
            }
            if !(load.position >= -slack && load.position <= length + slack) {
                return Err(FrameError::InvalidInput(format!(
                    "load '{}' at {} lies outside member '{}' (length {})",
                    load.id, load.position, member.id, length
                )));
            }
            placed.push((load.magnitude, load.position.clamp(0.0, length)));
        }

        let section = &member.section;
        let k_local = math::member_local_stiffness(
            section.e,
            section.i,
            section.a,
            length,
            member.releases(),
        );

        Ok(Self {
            member,
            loads: placed,
            c,
            s,
            length,
            transform: math::member_transformation_matrix(c, s),
            k_local,
            start_base: start_index * DOFS_PER_NODE,
            end_base: end_index * DOFS_PER_NODE,
        })
    }

    /// Global equation numbers of the six member unknowns
    pub fn dofs(&self) -> [usize; 6] {
        let (i, j) = (self.start_base, self.end_base);
        [i, i + 1, i + 2, j, j + 1, j + 2]
    }

    /// K_global = T^T * K_local * T
    pub fn global_stiffness(&self) -> Mat6 {
        self.transform.transpose() * self.k_local * self.transform
    }

    /// Fixed end reactions of all point loads, in local coordinates
    pub fn local_fer(&self) -> Vec6 {
        let releases = self.member.releases();
        self.loads.iter().fold(Vec6::zeros(), |acc, &(p, a)| {
            let fer = math::fer_point_load(p, a, self.length);
            acc + math::apply_fer_releases(&fer, p, a, self.length, releases)
        })
    }

    /// Fixed end reactions in global coordinates
    pub fn global_fer(&self) -> Vec6 {
        self.transform.transpose() * self.local_fer()
    }

    /// Equivalent nodal loads: the negated global fixed end reactions
    pub fn equivalent_nodal_loads(&self) -> Vec6 {
        -self.global_fer()
    }

    /// Gather this member's slice of a global displacement vector
    pub fn global_displacements(&self, d: &Vec) -> Vec6 {
        Vec6::from_iterator(self.dofs().iter().map(|&dof| d[dof]))
    }

    /// Local end displacements
    pub fn local_displacements(&self, d: &Vec) -> Vec6 {
        self.transform * self.global_displacements(d)
    }

    /// Forces the nodes exert on the member, in global coordinates:
    /// `K_global * d + FER_global`
    pub fn global_end_forces(&self, d: &Vec) -> Vec6 {
        self.global_stiffness() * self.global_displacements(d) + self.global_fer()
    }

    /// Member end forces in local coordinates
    pub fn local_end_forces(&self, d: &Vec) -> Vec6 {
        self.transform * self.global_end_forces(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Section;
    use approx::assert_relative_eq;

    fn setup() -> (std::vec::Vec<Node>, DofMap) {
        let nodes = vec![Node::new("N1", 0.0, 0.0), Node::new("N2", 0.0, 4.0)];
        let map = DofMap::new(&nodes).unwrap();
        (nodes, map)
    }

    #[test]
    fn test_vertical_member_geometry() {
        let (nodes, map) = setup();
        let member = Member::new("C1", "N1", "N2", Section::new(1.0, 1.0, 1.0));
        let element = MemberElement::new(&member, &nodes, &map, &[]).unwrap();

        assert_relative_eq!(element.length, 4.0);
        assert_eq!(element.dofs(), [0, 1, 2, 3, 4, 5]);
        // Axial stiffness lands on global Y
        let k = element.global_stiffness();
        assert_relative_eq!(k[(1, 1)], 0.25, epsilon = 1e-12);
        assert_relative_eq!(k[(0, 0)], 12.0 / 64.0, epsilon = 1e-12);
    }

    #[test]
    fn test_equivalent_loads_balance_the_load() {
        let nodes = vec![Node::new("N1", 0.0, 0.0), Node::new("N2", 3.0, 4.0)];
        let map = DofMap::new(&nodes).unwrap();
        let member = Member::new("M1", "N1", "N2", Section::default()).pin_end();
        let load = PointLoad::new("P1", "M1", -7.0, 1.5);
        let element = MemberElement::new(&member, &nodes, &map, &[&load]).unwrap();

        let eq = element.equivalent_nodal_loads();
        let [fx, fy] = load.global_components(element.c, element.s);
        assert_relative_eq!(eq[0] + eq[3], fx, epsilon = 1e-12);
        assert_relative_eq!(eq[1] + eq[4], fy, epsilon = 1e-12);
        assert_eq!(eq[5], 0.0);
    }

    #[test]
    fn test_zero_length_member() {
        let nodes = vec![Node::new("N1", 1.0, 1.0), Node::new("N2", 1.0, 1.0)];
        let map = DofMap::new(&nodes).unwrap();
        let member = Member::new("M1", "N1", "N2", Section::default());
        let err = MemberElement::new(&member, &nodes, &map, &[]).unwrap_err();
        assert!(matches!(err, FrameError::ZeroLengthMember { .. }));
    }

    #[test]
    fn test_missing_node() {
        let (nodes, map) = setup();
        let member = Member::new("M1", "N1", "N7", Section::default());
        let err = MemberElement::new(&member, &nodes, &map, &[]).unwrap_err();
        assert!(matches!(err, FrameError::NodeNotFound(id) if id == "N7"));
    }

    #[test]
    fn test_load_off_member() {
        let (nodes, map) = setup();
        let member = Member::new("M1", "N1", "N2", Section::default());
        let load = PointLoad::new("P1", "M1", -1.0, 4.5);
        let err = MemberElement::new(&member, &nodes, &map, &[&load]).unwrap_err();
        assert!(err.is_configuration());

        // A hair past the end is clamped
        let load = PointLoad::new("P1", "M1", -1.0, 4.0 + 1e-12);
        let element = MemberElement::new(&member, &nodes, &map, &[&load]).unwrap();
        assert_eq!(element.loads[0].1, 4.0);
    }
}
