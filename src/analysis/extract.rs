//! Recovery of member forces, reactions and diagrams from solved displacements

use std::collections::HashMap;

use crate::elements::Support;
use crate::math::{Vec, Vec6};
use crate::results::{DiagramPoint, MemberDiagram, MemberForces, NodeDisplacement, Reactions};

use super::dof::{DofMap, DOFS_PER_NODE};
use super::element::MemberElement;

/// Reshape the global displacement vector per node
pub fn node_displacements(d: &Vec, dof_map: &DofMap) -> HashMap<String, NodeDisplacement> {
    (0..d.len() / DOFS_PER_NODE)
        .filter_map(|i| {
            let base = i * DOFS_PER_NODE;
            let (node, _) = dof_map.label(base)?;
            Some((
                node.to_string(),
                NodeDisplacement::from_array([d[base], d[base + 1], d[base + 2]]),
            ))
        })
        .collect()
}

/// Local end forces reported with the end values flipped
pub fn member_forces(element: &MemberElement<'_>, d: &Vec) -> MemberForces {
    let f = element.local_end_forces(d);
    MemberForces::from_local_forces(&[f[0], f[1], f[2], f[3], f[4], f[5]])
}

/// Sum the global end forces of every member meeting each supported node
pub fn reactions(
    elements: &[MemberElement<'_>],
    supports: &[Support],
    d: &Vec,
) -> HashMap<String, Reactions> {
    let mut masks: HashMap<&str, [bool; 3]> = HashMap::new();
    for support in supports {
        let mask = masks.entry(support.node.as_str()).or_insert([false; 3]);
        for (m, r) in mask.iter_mut().zip(support.restraints()) {
            *m |= r;
        }
    }

    let mut sums: HashMap<&str, [f64; 3]> = masks.keys().map(|&node| (node, [0.0; 3])).collect();

    for element in elements {
        let f = element.global_end_forces(d);
        if let Some(sum) = sums.get_mut(element.member.start.as_str()) {
            for i in 0..3 {
                sum[i] += f[i];
            }
        }
        if let Some(sum) = sums.get_mut(element.member.end.as_str()) {
            for i in 0..3 {
                sum[i] += f[i + 3];
            }
        }
    }

    sums.into_iter()
        .map(|(node, mut sum)| {
            let mask = masks[node];
            for i in 0..3 {
                if !mask[i] {
                    sum[i] = 0.0;
                }
            }
            (node.to_string(), Reactions::from_array(sum))
        })
        .collect()
}

/// Sample positions: a uniform partition of `[0, L]` plus every load position
pub fn sample_positions(length: f64, segments: usize, loads: &[(f64, f64)]) -> std::vec::Vec<f64> {
    let segments = segments.max(1);
    let mut xs: std::vec::Vec<f64> = (0..=segments)
        .map(|k| length * k as f64 / segments as f64)
        .chain(loads.iter().map(|&(_, a)| a))
        .collect();

    xs.sort_by(f64::total_cmp);
    let tolerance = 1e-9 * length;
    xs.dedup_by(|a, b| (*a - *b).abs() <= tolerance);
    xs
}

/// Closed-form beam response of one member between its end forces
struct BeamSolution<'e> {
    loads: &'e [(f64, f64)],
    /// Local end forces acting on the member
    f: Vec6,
    ei: f64,
}

impl BeamSolution<'_> {
    /// Loads strictly before `x`
    fn passed(&self, x: f64) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.loads.iter().copied().filter(move |&(_, a)| a < x)
    }

    fn shear(&self, x: f64) -> f64 {
        self.f[1] + self.passed(x).map(|(p, _)| p).sum::<f64>()
    }

    fn moment(&self, x: f64) -> f64 {
        -self.f[2] + self.f[1] * x + self.passed(x).map(|(p, a)| p * (x - a)).sum::<f64>()
    }

    /// Double integral of M/EI from 0 to x with zero slope and deflection at 0
    fn integrated_curvature(&self, x: f64) -> f64 {
        let from_ends = -self.f[2] * x * x / 2.0 + self.f[1] * x.powi(3) / 6.0;
        let from_loads: f64 = self.passed(x).map(|(p, a)| p * (x - a).powi(3) / 6.0).sum();
        (from_ends + from_loads) / self.ei
    }
}

/// Sample axial force, shear, moment and transverse deflection along a member
pub fn member_diagram(element: &MemberElement<'_>, d: &Vec, segments: usize) -> MemberDiagram {
    let length = element.length;
    let d_local = element.local_displacements(d);
    let solution = BeamSolution {
        loads: &element.loads,
        f: element.local_end_forces(d),
        ei: element.member.section.ei(),
    };

    let v1 = d_local[1];
    let v2 = d_local[4];

    // A hinged start end does not follow the node rotation; recover its
    // slope from v(L) = v2 instead.
    let slope = if element.member.start_release.is_pinned() {
        (v2 - v1 - solution.integrated_curvature(length)) / length
    } else {
        d_local[2]
    };

    let axial = -solution.f[0];
    let points = sample_positions(length, segments, &element.loads)
        .into_iter()
        .map(|x| DiagramPoint {
            x,
            axial,
            shear: solution.shear(x),
            moment: solution.moment(x),
            deflection: v1 + slope * x + solution.integrated_curvature(x),
        })
        .collect();

    MemberDiagram { length, points }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_positions_include_loads() {
        let xs = sample_positions(4.0, 4, &[(-1.0, 1.5), (-1.0, 2.0)]);
        assert_eq!(xs, vec![0.0, 1.0, 1.5, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_sample_positions_zero_segments() {
        let xs = sample_positions(2.0, 0, &[]);
        assert_eq!(xs, vec![0.0, 2.0]);
    }
}
