//! Catalogue of every admissible winning line in the 4D lattice.

use once_cell::sync::Lazy;

use super::state::{GameMode, GRID_SIZE, TIME_SLICES};

/// A winning line is always exactly three cells, in both modes.
pub const LINE_LENGTH: usize = 3;

const MAX: i32 = GRID_SIZE as i32 - 1;

/// A candidate line: a start coordinate walked by a per-axis step.
/// Coordinates are (x, y, z, t); each step component is -1, 0 or +1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpec {
    pub start: [i32; 4],
    pub step: [i32; 4],
}

impl LineSpec {
    const fn new(start: [i32; 4], step: [i32; 4]) -> Self {
        Self { start, step }
    }

    /// The i-th coordinate along the line, possibly out of bounds.
    pub fn cell(&self, i: usize) -> [i32; 4] {
        let i = i as i32;
        [
            self.start[0] + i * self.step[0],
            self.start[1] + i * self.step[1],
            self.start[2] + i * self.step[2],
            self.start[3] + i * self.step[3],
        ]
    }
}

static NORMAL_LINES: Lazy<Vec<LineSpec>> = Lazy::new(|| {
    let mut specs = Vec::new();
    push_spatial_lines(&mut specs, 0);
    specs
});

static TIME_LINES: Lazy<Vec<LineSpec>> = Lazy::new(|| {
    let mut specs = Vec::new();
    // The full spatial catalogue repeats independently within each slice.
    for t in 0..TIME_SLICES as i32 {
        push_spatial_lines(&mut specs, t);
    }
    // Pure temporal lines: one per spatial cell, walking the time axis.
    for z in 0..GRID_SIZE as i32 {
        for y in 0..GRID_SIZE as i32 {
            for x in 0..GRID_SIZE as i32 {
                specs.push(LineSpec::new([x, y, z, 0], [0, 0, 0, 1]));
            }
        }
    }
    push_time_diagonals(&mut specs);
    specs
});

/// The fixed, deterministically ordered catalogue for a mode.
pub fn catalogue(mode: GameMode) -> &'static [LineSpec] {
    match mode {
        GameMode::Normal => &NORMAL_LINES,
        GameMode::Time => &TIME_LINES,
    }
}

/// All lines confined to one time slice: the three axis-aligned families,
/// the space diagonals, and the plane diagonals.
fn push_spatial_lines(specs: &mut Vec<LineSpec>, t: i32) {
    // Rows (x direction).
    for z in 0..GRID_SIZE as i32 {
        for y in 0..GRID_SIZE as i32 {
            specs.push(LineSpec::new([0, y, z, t], [1, 0, 0, 0]));
        }
    }
    // Columns (y direction).
    for z in 0..GRID_SIZE as i32 {
        for x in 0..GRID_SIZE as i32 {
            specs.push(LineSpec::new([x, 0, z, t], [0, 1, 0, 0]));
        }
    }
    // Depth (z direction).
    for y in 0..GRID_SIZE as i32 {
        for x in 0..GRID_SIZE as i32 {
            specs.push(LineSpec::new([x, y, 0, t], [0, 0, 1, 0]));
        }
    }

    // Space diagonals, anchored at each corner of the cube.
    specs.push(LineSpec::new([0, 0, 0, t], [1, 1, 1, 0]));
    specs.push(LineSpec::new([MAX, 0, 0, t], [-1, 1, 1, 0]));
    specs.push(LineSpec::new([0, MAX, 0, t], [1, -1, 1, 0]));
    specs.push(LineSpec::new([0, 0, MAX, t], [1, 1, -1, 0]));
    specs.push(LineSpec::new([MAX, MAX, 0, t], [-1, -1, 1, 0]));
    specs.push(LineSpec::new([MAX, 0, MAX, t], [-1, 1, -1, 0]));
    specs.push(LineSpec::new([0, MAX, MAX, t], [1, -1, -1, 0]));
    specs.push(LineSpec::new([MAX, MAX, MAX, t], [-1, -1, -1, 0]));

    // XY plane diagonals.
    for z in 0..GRID_SIZE as i32 {
        specs.push(LineSpec::new([0, 0, z, t], [1, 1, 0, 0]));
        specs.push(LineSpec::new([MAX, 0, z, t], [-1, 1, 0, 0]));
    }
    // XZ plane diagonals.
    for y in 0..GRID_SIZE as i32 {
        specs.push(LineSpec::new([0, y, 0, t], [1, 0, 1, 0]));
        specs.push(LineSpec::new([MAX, y, 0, t], [-1, 0, 1, 0]));
    }
    // YZ plane diagonals.
    for x in 0..GRID_SIZE as i32 {
        specs.push(LineSpec::new([x, 0, 0, t], [0, 1, 1, 0]));
        specs.push(LineSpec::new([x, MAX, 0, t], [0, -1, 1, 0]));
    }
}

/// Mixed space-time diagonals: the spatial diagonal families with the time
/// coordinate advancing by one per step, anchored at t = 0.
fn push_time_diagonals(specs: &mut Vec<LineSpec>) {
    specs.push(LineSpec::new([0, 0, 0, 0], [1, 1, 1, 1]));
    specs.push(LineSpec::new([MAX, 0, 0, 0], [-1, 1, 1, 1]));
    specs.push(LineSpec::new([0, MAX, 0, 0], [1, -1, 1, 1]));
    specs.push(LineSpec::new([0, 0, MAX, 0], [1, 1, -1, 1]));
    specs.push(LineSpec::new([MAX, MAX, 0, 0], [-1, -1, 1, 1]));
    specs.push(LineSpec::new([MAX, 0, MAX, 0], [-1, 1, -1, 1]));
    specs.push(LineSpec::new([0, MAX, MAX, 0], [1, -1, -1, 1]));
    specs.push(LineSpec::new([MAX, MAX, MAX, 0], [-1, -1, -1, 1]));

    for z in 0..GRID_SIZE as i32 {
        specs.push(LineSpec::new([0, 0, z, 0], [1, 1, 0, 1]));
        specs.push(LineSpec::new([MAX, 0, z, 0], [-1, 1, 0, 1]));
    }
    for y in 0..GRID_SIZE as i32 {
        specs.push(LineSpec::new([0, y, 0, 0], [1, 0, 1, 1]));
        specs.push(LineSpec::new([MAX, y, 0, 0], [-1, 0, 1, 1]));
    }
    for x in 0..GRID_SIZE as i32 {
        specs.push(LineSpec::new([x, 0, 0, 0], [0, 1, 1, 1]));
        specs.push(LineSpec::new([x, MAX, 0, 0], [0, -1, 1, 1]));
    }
}
