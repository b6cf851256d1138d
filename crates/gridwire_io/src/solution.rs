//! Saving, loading and replaying routed solutions.
//!
//! The solution format is a two-column CSV:
//!
//! ```text
//! net,wires
//! "(1,2)","[(0,0,0),(1,0,0),(2,0,0)]"
//! "(3,1)","[(4,2,0),(3,2,0)]"
//! chip_0_net_3,42
//! ```
//!
//! Wire rows appear in netlist order with the net's source orientation;
//! the footer names the input files and carries the total cost. All
//! numbers are bare decimal integers and no field contains spaces.

use crate::loader::load_chip;
use gridwire_core::prelude::*;
use nom::{
    bytes::complete::tag,
    character::complete::{char, digit1},
    combinator::{all_consuming, map, map_res, opt, recognize},
    multi::separated_list0,
    sequence::{delimited, pair, separated_pair, tuple},
    IResult,
};
use std::io::Write;
use std::path::Path;
use tracing::info;

const SOLUTION_HEADER: &str = "net,wires";

/// A parsed solution file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedSolution {
    pub chip_id: u32,
    pub net_id: u32,
    /// Net labels in file order, source orientation preserved.
    pub nets: Vec<(u32, u32)>,
    /// Full segment lists in file order, endpoints included.
    pub wires: Vec<Vec<Coord>>,
    /// Total cost recorded in the footer.
    pub total_cost: u64,
}

/// Writes a chip's layout to the solution CSV format.
pub fn save_solution(chip: &Chip, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut out = std::io::BufWriter::new(std::fs::File::create(path)?);
    writeln!(out, "{SOLUTION_HEADER}")?;

    for (net, wire) in chip.netlist().iter().zip(chip.wires()) {
        let cells: Vec<String> = wire.segments().iter().map(Coord::to_string).collect();
        writeln!(
            out,
            "\"({},{})\",\"[{}]\"",
            net.a.0,
            net.b.0,
            cells.join(",")
        )?;
    }

    writeln!(
        out,
        "chip_{}_net_{},{}",
        chip.chip_id(),
        chip.net_id(),
        chip.total_cost()
    )?;
    out.flush()?;

    info!(path = %path.display(), "solution saved");
    Ok(())
}

fn u32_literal(input: &str) -> IResult<&str, u32> {
    map_res(digit1, str::parse)(input)
}

fn u64_literal(input: &str) -> IResult<&str, u64> {
    map_res(digit1, str::parse)(input)
}

fn i32_literal(input: &str) -> IResult<&str, i32> {
    map_res(recognize(pair(opt(char('-')), digit1)), str::parse)(input)
}

fn coord_literal(input: &str) -> IResult<&str, Coord> {
    map(
        delimited(
            char('('),
            tuple((
                i32_literal,
                char(','),
                i32_literal,
                char(','),
                i32_literal,
            )),
            char(')'),
        ),
        |(x, _, y, _, z)| Coord::new(x, y, z),
    )(input)
}

fn net_label(input: &str) -> IResult<&str, (u32, u32)> {
    delimited(
        tag("\"("),
        separated_pair(u32_literal, char(','), u32_literal),
        tag(")\""),
    )(input)
}

fn wire_list(input: &str) -> IResult<&str, Vec<Coord>> {
    delimited(
        tag("\"["),
        separated_list0(char(','), coord_literal),
        tag("]\""),
    )(input)
}

fn wire_row(input: &str) -> IResult<&str, ((u32, u32), Vec<Coord>)> {
    separated_pair(net_label, char(','), wire_list)(input)
}

fn footer_row(input: &str) -> IResult<&str, (u32, u32, u64)> {
    map(
        tuple((
            tag("chip_"),
            u32_literal,
            tag("_net_"),
            u32_literal,
            char(','),
            u64_literal,
        )),
        |(_, chip_id, _, net_id, _, cost)| (chip_id, net_id, cost),
    )(input)
}

/// Parses a solution file body.
pub fn parse_solution(content: &str, file: &str) -> Result<SavedSolution> {
    let mut rows = content
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty());

    match rows.next() {
        Some(header) if header.trim() == SOLUTION_HEADER => {}
        other => {
            return Err(GridwireError::parse(
                file,
                format!("expected header '{SOLUTION_HEADER}', got {other:?}"),
            ))
        }
    }

    let mut nets = Vec::new();
    let mut wires = Vec::new();
    let mut footer = None;

    for row in rows {
        if footer.is_some() {
            return Err(GridwireError::parse(file, "rows after footer"));
        }
        if row.starts_with('"') {
            let (_, (net, cells)) = all_consuming(wire_row)(row)
                .map_err(|_| GridwireError::parse(file, format!("bad wire row '{row}'")))?;
            if cells.len() < 2 {
                return Err(GridwireError::TruncatedWire(cells.len()));
            }
            nets.push(net);
            wires.push(cells);
        } else {
            let (_, parsed) = all_consuming(footer_row)(row)
                .map_err(|_| GridwireError::parse(file, format!("bad footer row '{row}'")))?;
            footer = Some(parsed);
        }
    }

    let (chip_id, net_id, total_cost) =
        footer.ok_or_else(|| GridwireError::parse(file, "missing footer row"))?;

    Ok(SavedSolution {
        chip_id,
        net_id,
        nets,
        wires,
        total_cost,
    })
}

/// Loads a solution file from disk.
pub fn load_solution(path: &Path) -> Result<SavedSolution> {
    let content = std::fs::read_to_string(path)?;
    parse_solution(&content, &path.display().to_string())
}

/// Rebuilds a routed chip from a saved solution and its data directory.
///
/// The grid is widened first when the saved wires spill past the bounds
/// the requested padding would give, then every wire is replayed into its
/// netlist slot.
pub fn replay_solution(
    base_data_path: &Path,
    solution: &SavedSolution,
    padding: i32,
) -> Result<Chip> {
    let mut chip = load_chip(base_data_path, solution.chip_id, solution.net_id, padding)?;

    let padding = padding.max(required_padding(&chip, &solution.wires));
    chip.set_padding(padding);

    chip.add_entire_wires(solution.wires.iter().map(Vec::as_slice))?;
    Ok(chip)
}

/// Smallest padding that keeps every replayed cell inside the grid.
fn required_padding(chip: &Chip, wires: &[Vec<Coord>]) -> i32 {
    let mut gate_min_x = i32::MAX;
    let mut gate_max_x = i32::MIN;
    let mut gate_min_y = i32::MAX;
    let mut gate_max_y = i32::MIN;
    for coord in chip.gate_coords() {
        gate_min_x = gate_min_x.min(coord.x);
        gate_max_x = gate_max_x.max(coord.x);
        gate_min_y = gate_min_y.min(coord.y);
        gate_max_y = gate_max_y.max(coord.y);
    }

    let mut needed = 1;
    for coord in wires.iter().flatten() {
        needed = needed
            .max(gate_min_x - coord.x)
            .max(coord.x - gate_max_x)
            .max(gate_min_y - coord.y)
            .max(coord.y - gate_max_y);
    }
    needed
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridwire_core::chip::GateId;

    fn c(x: i32, y: i32, z: i32) -> Coord {
        Coord::new(x, y, z)
    }

    fn routed_chip() -> Chip {
        let mut chip = Chip::new(
            0,
            1,
            vec![
                (GateId(1), c(0, 1, 0)),
                (GateId(2), c(2, 1, 0)),
                (GateId(3), c(1, 0, 0)),
                (GateId(4), c(1, 2, 0)),
            ],
            vec![(GateId(3), GateId(4)), (GateId(2), GateId(1))],
            1,
        )
        .unwrap();
        chip.add_entire_wire(&[c(1, 0, 0), c(1, 1, 0), c(1, 2, 0)]).unwrap();
        chip.add_entire_wire(&[c(2, 1, 0), c(2, 1, 1), c(1, 1, 1), c(0, 1, 1), c(0, 1, 0)])
            .unwrap();
        chip
    }

    #[test]
    fn test_save_format_is_exact() {
        let chip = routed_chip();
        let path = std::env::temp_dir().join(format!("gridwire_sol_{}.csv", std::process::id()));
        save_solution(&chip, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let expected = "net,wires\n\
            \"(3,4)\",\"[(1,0,0),(1,1,0),(1,2,0)]\"\n\
            \"(2,1)\",\"[(2,1,0),(2,1,1),(1,1,1),(0,1,1),(0,1,0)]\"\n\
            chip_0_net_1,6\n";
        assert_eq!(written, expected);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_parse_roundtrip() {
        let chip = routed_chip();
        let path = std::env::temp_dir().join(format!("gridwire_rt_{}.csv", std::process::id()));
        save_solution(&chip, &path).unwrap();

        let solution = load_solution(&path).unwrap();
        assert_eq!(solution.chip_id, 0);
        assert_eq!(solution.net_id, 1);
        assert_eq!(solution.total_cost, chip.total_cost());
        assert_eq!(solution.nets, vec![(3, 4), (2, 1)]);
        assert_eq!(solution.wires[0], chip.wire(WireId(0)).segments());
        assert_eq!(solution.wires[1], chip.wire(WireId(1)).segments());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_parse_rejects_malformed_files() {
        assert!(parse_solution("wrong,header\n", "s.csv").is_err());
        assert!(parse_solution("net,wires\n\"(1,2)\",\"[(0,0)]\"\n", "s.csv").is_err());
        assert!(parse_solution("net,wires\n\"(1,2)\",\"[(0,0,0),(1,0,0)]\"\n", "s.csv").is_err());
        // a single-cell wire is truncated
        assert!(matches!(
            parse_solution(
                "net,wires\n\"(1,2)\",\"[(0,0,0)]\"\nchip_0_net_1,0\n",
                "s.csv"
            ),
            Err(GridwireError::TruncatedWire(1))
        ));
    }

    #[test]
    fn test_negative_coordinates_survive() {
        let content = "net,wires\n\"(1,2)\",\"[(0,0,0),(-1,0,0),(-1,1,0)]\"\nchip_0_net_1,2\n";
        let solution = parse_solution(content, "s.csv").unwrap();
        assert_eq!(solution.wires[0][1], c(-1, 0, 0));
    }

    #[test]
    fn test_footer_identifies_chip_and_net() {
        let content = "net,wires\nchip_2_net_7,12345\n";
        let solution = parse_solution(content, "s.csv").unwrap();
        assert_eq!(solution.chip_id, 2);
        assert_eq!(solution.net_id, 7);
        assert_eq!(solution.total_cost, 12345);
        assert!(solution.wires.is_empty());
    }

    #[test]
    fn test_required_padding_grows_for_spilling_wires() {
        let chip = Chip::new(
            0,
            1,
            vec![(GateId(1), c(0, 0, 0)), (GateId(2), c(2, 0, 0))],
            vec![(GateId(1), GateId(2))],
            1,
        )
        .unwrap();
        // a wire dipping to y = -3 needs padding 3
        let wires = vec![vec![
            c(0, 0, 0),
            c(0, -1, 0),
            c(0, -2, 0),
            c(0, -3, 0),
            c(1, -3, 0),
        ]];
        assert_eq!(required_padding(&chip, &wires), 3);
    }
}
