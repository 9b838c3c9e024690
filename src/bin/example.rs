//! Frame Solver Example - Simple Portal Frame

use frame_solver::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("=== Frame Solver Example: Portal Frame ===\n");

    let mut model = FrameModel::new();

    // W12x26 (approximate): d = 310 mm, bf = 165 mm, tf = 9.7 mm, tw = 5.8 mm
    let w12x26 = Section::wide_flange(STEEL_E, 0.310, 0.165, 0.0097, 0.0058);

    // Create a simple portal frame
    //
    //     N3 -------- N4
    //     |          |
    //     |          |
    //     |          |
    //     N1        N2
    //     ^          ^
    //   Fixed     Fixed
    //

    // Add nodes (in meters)
    let height = 4.0; // 4m column height
    let span = 6.0; // 6m beam span

    model.add_node(Node::new("N1", 0.0, 0.0))?;
    model.add_node(Node::new("N2", span, 0.0))?;
    model.add_node(Node::new("N3", 0.0, height))?;
    model.add_node(Node::new("N4", span, height))?;

    model.add_member(Member::new("Col1", "N1", "N3", w12x26))?;
    model.add_member(Member::new("Col2", "N2", "N4", w12x26))?;
    model.add_member(Member::new("Beam", "N3", "N4", w12x26))?;

    model.add_support(Support::fixed("S1", "N1"))?;
    model.add_support(Support::fixed("S2", "N2"))?;

    // 40 kN gravity load at the beam third point
    model.add_load(PointLoad::downward("G1", "Beam", 40_000.0, span / 3.0))?;
    // 10 kN lateral load near the top of the left column, acting in +X.
    // Col1 runs upward so its local +y points in global -X.
    model.add_load(PointLoad::new("W1", "Col1", -10_000.0, 0.9 * height))?;

    println!("Running linear analysis...\n");
    let options = AnalysisOptions::linear().with_segments(24).with_statics_check();
    let result = model.analyze_with(&options)?;

    println!("Node Displacements:");
    for node in ["N1", "N2", "N3", "N4"] {
        let disp = result.displacement(node)?;
        println!(
            "  {}: DX={:.4}mm, DY={:.4}mm, RZ={:.6}rad",
            node,
            disp.dx * 1000.0,
            disp.dy * 1000.0,
            disp.rz
        );
    }

    println!("\nSupport Reactions:");
    for node in ["N1", "N2"] {
        let rxn = result.reaction(node)?;
        println!(
            "  {}: FX={:.2}kN, FY={:.2}kN, MZ={:.2}kN·m",
            node,
            rxn.fx / 1000.0,
            rxn.fy / 1000.0,
            rxn.mz / 1000.0
        );
    }

    println!("\nMember Forces:");
    for member in ["Col1", "Col2", "Beam"] {
        let forces = result.forces(member)?;
        let diagram = result.diagram(member)?;
        println!(
            "  {}: N={:.2}kN, Vmax={:.2}kN, Mmax={:.2}kN·m, Mmin={:.2}kN·m",
            member,
            forces.axial_start / 1000.0,
            diagram.max_abs_shear() / 1000.0,
            diagram.max_moment() / 1000.0,
            diagram.min_moment() / 1000.0
        );
    }

    let summary = &result.summary;
    let [rx, ry] = result.statics_residual();
    println!("\nSummary:");
    println!(
        "  Max displacement: {:.4}mm at {}",
        summary.max_displacement * 1000.0,
        summary.max_disp_node
    );
    println!(
        "  Max reaction: {:.2}kN at {}",
        summary.max_reaction / 1000.0,
        summary.max_reaction_node
    );
    println!(
        "  Max moment: {:.2}kN·m in {}",
        summary.max_moment / 1000.0,
        summary.max_moment_member
    );
    println!("  Equilibrium residual: Fx={:.3e}N, Fy={:.3e}N", rx, ry);

    println!("\n=== Analysis Complete ===");
    Ok(())
}
