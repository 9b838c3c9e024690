//! Single-span beams checked against textbook solutions

use approx::{assert_abs_diff_eq, assert_relative_eq};
use frame_solver::prelude::*;

const E: f64 = 200e9;

fn section() -> Section {
    Section::rectangular(E, 0.2, 0.4)
}

/// Horizontal beam from A at the origin to B at `length`
fn beam(length: f64, start: Support, end: Support, load: f64, position: f64) -> FrameModel {
    let mut model = FrameModel::new();
    model.add_node(Node::new("A", 0.0, 0.0)).unwrap();
    model.add_node(Node::new("B", length, 0.0)).unwrap();
    model.add_member(Member::new("M1", "A", "B", section())).unwrap();
    model.add_support(start).unwrap();
    model.add_support(end).unwrap();
    model
        .add_load(PointLoad::downward("P1", "M1", load, position))
        .unwrap();
    model
}

fn assert_in_equilibrium(result: &AnalysisResult) {
    let [rx, ry] = result.statics_residual();
    assert_abs_diff_eq!(rx, 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(ry, 0.0, epsilon = 1e-6);
}

#[test]
fn test_simply_supported_central_load() {
    let (length, p) = (6.0, 10_000.0);
    let model = beam(length, Support::pin("S1", "A"), Support::roller("S2", "B"), p, 3.0);
    let result = model.analyze().unwrap();

    let forces = result.forces("M1").unwrap();
    assert_relative_eq!(forces.shear_start, p / 2.0, max_relative = 1e-9);
    assert_relative_eq!(forces.shear_end, -p / 2.0, max_relative = 1e-9);
    assert_abs_diff_eq!(forces.moment_start, 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(forces.moment_end, 0.0, epsilon = 1e-6);

    let diagram = result.diagram("M1").unwrap();
    assert_relative_eq!(diagram.max_moment(), p * length / 4.0, max_relative = 1e-9);
    assert_abs_diff_eq!(diagram.first().unwrap().moment, 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(diagram.last().unwrap().moment, 0.0, epsilon = 1e-6);

    let ei = section().ei();
    let midspan = diagram.nearest(3.0).unwrap();
    assert_relative_eq!(
        midspan.deflection,
        -p * length.powi(3) / (48.0 * ei),
        max_relative = 1e-6
    );

    assert_relative_eq!(result.reaction("A").unwrap().fy, p / 2.0, max_relative = 1e-9);
    assert_relative_eq!(result.reaction("B").unwrap().fy, p / 2.0, max_relative = 1e-9);
    assert_eq!(result.reaction("B").unwrap().fx, 0.0);
    assert_in_equilibrium(&result);
}

#[test]
fn test_cantilever_tip_load() {
    let (length, p) = (4.0, 5_000.0);
    let mut model = FrameModel::new();
    model.add_node(Node::new("A", 0.0, 0.0)).unwrap();
    model.add_node(Node::new("B", length, 0.0)).unwrap();
    model.add_member(Member::new("M1", "A", "B", section())).unwrap();
    model.add_support(Support::fixed("S1", "A")).unwrap();
    model
        .add_load(PointLoad::downward("P1", "M1", p, length))
        .unwrap();

    let result = model.analyze().unwrap();
    let diagram = result.diagram("M1").unwrap();

    // Hogging at the root, nothing at the tip
    assert_relative_eq!(diagram.first().unwrap().moment, -p * length, max_relative = 1e-9);
    assert_abs_diff_eq!(diagram.last().unwrap().moment, 0.0, epsilon = 1e-6);
    assert_relative_eq!(diagram.first().unwrap().shear, p, max_relative = 1e-9);
    assert_relative_eq!(diagram.last().unwrap().shear, p, max_relative = 1e-9);

    let expected = -p * length.powi(3) / (3.0 * section().ei());
    assert_relative_eq!(result.displacement("B").unwrap().dy, expected, max_relative = 1e-6);
    assert_relative_eq!(diagram.last().unwrap().deflection, expected, max_relative = 1e-6);

    let rxn = result.reaction("A").unwrap();
    assert_relative_eq!(rxn.fy, p, max_relative = 1e-9);
    assert_relative_eq!(rxn.mz, p * length, max_relative = 1e-9);
    assert_in_equilibrium(&result);
}

#[test]
fn test_fixed_fixed_central_load() {
    let (length, p) = (8.0, 12_000.0);
    let model = beam(length, Support::fixed("S1", "A"), Support::fixed("S2", "B"), p, 4.0);
    let result = model.analyze().unwrap();

    let forces = result.forces("M1").unwrap();
    assert_relative_eq!(forces.moment_start, p * length / 8.0, max_relative = 1e-9);
    assert_relative_eq!(forces.moment_end, p * length / 8.0, max_relative = 1e-9);

    let diagram = result.diagram("M1").unwrap();
    assert_relative_eq!(diagram.first().unwrap().moment, -p * length / 8.0, max_relative = 1e-9);
    assert_relative_eq!(diagram.last().unwrap().moment, -p * length / 8.0, max_relative = 1e-9);
    assert_relative_eq!(diagram.max_moment(), p * length / 8.0, max_relative = 1e-9);

    let expected = p * length.powi(3) / (192.0 * section().ei());
    assert_relative_eq!(diagram.max_abs_deflection(), expected, max_relative = 1e-6);
    assert_relative_eq!(diagram.nearest(4.0).unwrap().deflection, -expected, max_relative = 1e-6);
    assert_in_equilibrium(&result);
}

#[test]
fn test_propped_cantilever_central_load() {
    let (length, p) = (6.0, 16_000.0);
    let model = beam(length, Support::fixed("S1", "A"), Support::roller("S2", "B"), p, 3.0);
    let result = model.analyze().unwrap();

    let forces = result.forces("M1").unwrap();
    assert_relative_eq!(forces.shear_start, 11.0 * p / 16.0, max_relative = 1e-9);
    assert_relative_eq!(forces.moment_start.abs(), 3.0 * p * length / 16.0, max_relative = 1e-9);
    assert_relative_eq!(forces.shear_end, -5.0 * p / 16.0, max_relative = 1e-9);

    assert_relative_eq!(result.reaction("B").unwrap().fy, 5.0 * p / 16.0, max_relative = 1e-9);
    assert_abs_diff_eq!(result.displacement("B").unwrap().dy, 0.0, epsilon = 1e-12);
    assert_in_equilibrium(&result);
}

#[test]
fn test_pinned_member_ends_match_simple_span() {
    // Releasing both ends between fixed supports leaves a simple span
    let (length, p) = (5.0, 8_000.0);
    let mut model = FrameModel::new();
    model.add_node(Node::new("A", 0.0, 0.0)).unwrap();
    model.add_node(Node::new("B", length, 0.0)).unwrap();
    model
        .add_member(Member::new("M1", "A", "B", section()).pin_both())
        .unwrap();
    model.add_support(Support::fixed("S1", "A")).unwrap();
    model.add_support(Support::fixed("S2", "B")).unwrap();
    model
        .add_load(PointLoad::downward("P1", "M1", p, 2.0))
        .unwrap();

    let result = model.analyze().unwrap();
    let forces = result.forces("M1").unwrap();
    assert_relative_eq!(forces.shear_start, p * 3.0 / length, max_relative = 1e-9);
    assert_relative_eq!(forces.shear_end, -p * 2.0 / length, max_relative = 1e-9);
    assert_abs_diff_eq!(forces.moment_start, 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(forces.moment_end, 0.0, epsilon = 1e-6);

    let diagram = result.diagram("M1").unwrap();
    assert_relative_eq!(diagram.max_moment(), p * 2.0 * 3.0 / length, max_relative = 1e-9);

    // Simply supported deflection under the load: P a² b² / (3 E I L)
    let expected = -p * 4.0 * 9.0 / (3.0 * section().ei() * length);
    assert_relative_eq!(diagram.nearest(2.0).unwrap().deflection, expected, max_relative = 1e-6);
    assert_in_equilibrium(&result);
}

#[test]
fn test_load_at_support_produces_no_bending() {
    let model = beam(4.0, Support::pin("S1", "A"), Support::roller("S2", "B"), 1_000.0, 0.0);
    let result = model.analyze().unwrap();

    let diagram = result.diagram("M1").unwrap();
    assert_abs_diff_eq!(diagram.max_abs_moment(), 0.0, epsilon = 1e-6);
    assert_relative_eq!(result.reaction("A").unwrap().fy, 1_000.0, max_relative = 1e-9);
    assert_abs_diff_eq!(result.reaction("B").unwrap().fy, 0.0, epsilon = 1e-6);
}

#[test]
fn test_sparse_solver_matches_dense() {
    let model = beam(6.0, Support::fixed("S1", "A"), Support::roller("S2", "B"), 16_000.0, 2.0);
    let dense = model.analyze().unwrap();
    let sparse = model
        .analyze_with(&AnalysisOptions::default().with_sparse())
        .unwrap();

    let (a, b) = (dense.forces("M1").unwrap(), sparse.forces("M1").unwrap());
    for (x, y) in a.as_array().iter().zip(b.as_array()) {
        assert_relative_eq!(*x, y, epsilon = 1e-6, max_relative = 1e-9);
    }
    assert_relative_eq!(
        dense.displacement("B").unwrap().rz,
        sparse.displacement("B").unwrap().rz,
        max_relative = 1e-9
    );
}

#[test]
fn test_small_unit_cantilever_is_not_regularized() {
    // Unit properties over a long span leave 12EI/L³ far below 1e-9
    let (length, p) = (3000.0, 1e-6);
    let unit = Section::new(1.0, 1.0, 1.0);
    let mut model = FrameModel::new();
    model.add_node(Node::new("A", 0.0, 0.0)).unwrap();
    model.add_node(Node::new("B", length, 0.0)).unwrap();
    model.add_member(Member::new("M1", "A", "B", unit)).unwrap();
    model.add_support(Support::fixed("S1", "A")).unwrap();
    model
        .add_load(PointLoad::downward("P1", "M1", p, length))
        .unwrap();

    let expected = -p * length.powi(3) / 3.0;
    for options in [AnalysisOptions::default(), AnalysisOptions::default().with_sparse()] {
        let result = model.analyze_with(&options).unwrap();
        assert!(result.summary.regularized_dofs.is_empty());
        assert_relative_eq!(result.displacement("B").unwrap().dy, expected, max_relative = 1e-6);
    }
}
