//! Save → load → replay round trip against a real data directory.

use gridwire_core::prelude::*;
use gridwire_io::{load_chip, load_solution, replay_solution, save_solution};
use std::path::PathBuf;

fn c(x: i32, y: i32, z: i32) -> Coord {
    Coord::new(x, y, z)
}

fn setup_data_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("gridwire_replay_{tag}_{}", std::process::id()));
    let chip_dir = dir.join("chip_0");
    std::fs::create_dir_all(&chip_dir).unwrap();
    std::fs::write(
        chip_dir.join("print_0.csv"),
        "chip,x,y\n1,0,1\n2,2,1\n3,1,0\n4,1,2\n",
    )
    .unwrap();
    std::fs::write(chip_dir.join("netlist_1.csv"), "chip_a,chip_b\n1,2\n3,4\n").unwrap();
    dir
}

#[test]
fn replay_reproduces_saved_layout() {
    let dir = setup_data_dir("basic");

    let mut chip = load_chip(&dir, 0, 1, 1).unwrap();
    chip.add_entire_wire(&[c(0, 1, 0), c(1, 1, 0), c(2, 1, 0)]).unwrap();
    chip.add_entire_wire(&[c(1, 0, 0), c(1, 0, 1), c(1, 1, 1), c(1, 2, 1), c(1, 2, 0)])
        .unwrap();
    assert!(chip.is_fully_connected());

    let solution_path = dir.join("output.csv");
    save_solution(&chip, &solution_path).unwrap();

    let solution = load_solution(&solution_path).unwrap();
    let replayed = replay_solution(&dir, &solution, 1).unwrap();

    assert!(replayed.is_fully_connected());
    assert_eq!(replayed.total_cost(), chip.total_cost());
    assert_eq!(replayed.total_cost(), solution.total_cost);
    assert_eq!(replayed.wire_segment_list(), chip.wire_segment_list());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn replay_widens_grid_for_spilling_wires() {
    let dir = setup_data_dir("spill");

    let mut chip = load_chip(&dir, 0, 1, 3).unwrap();
    // a route dipping two cells below the gate bounding box
    chip.add_entire_wire(&[
        c(0, 1, 0),
        c(0, 0, 0),
        c(0, -1, 0),
        c(0, -2, 0),
        c(1, -2, 0),
        c(2, -2, 0),
        c(2, -1, 0),
        c(2, 0, 0),
        c(2, 1, 0),
    ])
    .unwrap();
    chip.add_entire_wire(&[c(1, 0, 0), c(1, 1, 0), c(1, 2, 0)]).unwrap();

    let solution_path = dir.join("spill.csv");
    save_solution(&chip, &solution_path).unwrap();

    // replay with padding 1: the loader must widen the grid by itself
    let solution = load_solution(&solution_path).unwrap();
    let replayed = replay_solution(&dir, &solution, 1).unwrap();

    assert!(replayed.is_fully_connected());
    assert_eq!(replayed.wire_segment_list(), chip.wire_segment_list());
    assert!(replayed.bounds().contains(&c(1, -2, 0)));

    std::fs::remove_dir_all(&dir).ok();
}
