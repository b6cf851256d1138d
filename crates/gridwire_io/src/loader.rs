//! Print and netlist CSV loading.
//!
//! A chip's input lives in `<base>/chip_<id>/` as two files:
//!
//! ```text
//! print_<id>.csv      header: chip,x,y      one gate per row
//! netlist_<net>.csv   header: chip_a,chip_b one unordered gate pair per row
//! ```

use gridwire_core::prelude::*;
use nom::{
    character::complete::{char, digit1},
    combinator::{all_consuming, map, map_res, opt, recognize},
    sequence::{pair, separated_pair},
    IResult,
};
use std::path::Path;
use tracing::info;

const PRINT_HEADER: &str = "chip,x,y";
const NETLIST_HEADER: &str = "chip_a,chip_b";

fn u32_literal(input: &str) -> IResult<&str, u32> {
    map_res(digit1, str::parse)(input)
}

fn i32_literal(input: &str) -> IResult<&str, i32> {
    map_res(recognize(pair(opt(char('-')), digit1)), str::parse)(input)
}

fn print_row(input: &str) -> IResult<&str, (GateId, Coord)> {
    map(
        separated_pair(
            u32_literal,
            char(','),
            separated_pair(i32_literal, char(','), i32_literal),
        ),
        // gates always sit on the bottom layer
        |(id, (x, y))| (GateId(id), Coord::new(x, y, 0)),
    )(input)
}

fn netlist_row(input: &str) -> IResult<&str, (GateId, GateId)> {
    map(
        separated_pair(u32_literal, char(','), u32_literal),
        |(a, b)| (GateId(a), GateId(b)),
    )(input)
}

fn lines(content: &str) -> impl Iterator<Item = &str> {
    content
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
}

/// Parses a print file body into gate placements.
pub fn parse_print_csv(content: &str, file: &str) -> Result<Vec<(GateId, Coord)>> {
    let mut rows = lines(content);
    match rows.next() {
        Some(header) if header.trim() == PRINT_HEADER => {}
        other => {
            return Err(GridwireError::parse(
                file,
                format!("expected header '{PRINT_HEADER}', got {other:?}"),
            ))
        }
    }

    rows.map(|row| {
        all_consuming(print_row)(row)
            .map(|(_, gate)| gate)
            .map_err(|_| GridwireError::parse(file, format!("bad gate row '{row}'")))
    })
    .collect()
}

/// Parses a netlist file body into gate pairs.
pub fn parse_netlist_csv(content: &str, file: &str) -> Result<Vec<(GateId, GateId)>> {
    let mut rows = lines(content);
    match rows.next() {
        Some(header) if header.trim() == NETLIST_HEADER => {}
        other => {
            return Err(GridwireError::parse(
                file,
                format!("expected header '{NETLIST_HEADER}', got {other:?}"),
            ))
        }
    }

    rows.map(|row| {
        all_consuming(netlist_row)(row)
            .map(|(_, net)| net)
            .map_err(|_| GridwireError::parse(file, format!("bad netlist row '{row}'")))
    })
    .collect()
}

/// Loads a chip from the standard on-disk layout.
pub fn load_chip(base_data_path: &Path, chip_id: u32, net_id: u32, padding: i32) -> Result<Chip> {
    let chip_dir = base_data_path.join(format!("chip_{chip_id}"));
    let print_path = chip_dir.join(format!("print_{chip_id}.csv"));
    let netlist_path = chip_dir.join(format!("netlist_{net_id}.csv"));

    let print_content = std::fs::read_to_string(&print_path)?;
    let netlist_content = std::fs::read_to_string(&netlist_path)?;

    let gates = parse_print_csv(&print_content, &print_path.display().to_string())?;
    let netlist = parse_netlist_csv(&netlist_content, &netlist_path.display().to_string())?;

    info!(
        chip_id,
        net_id,
        gates = gates.len(),
        nets = netlist.len(),
        "loaded chip"
    );
    Chip::new(chip_id, net_id, gates, netlist, padding)
}
