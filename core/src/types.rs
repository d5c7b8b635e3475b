use ndarray::Array2;

/// Single coordinate axis used for board rows, columns, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Whether `a` and `b` are within Chebyshev distance 1 of each other (a cell is
/// considered adjacent to itself).
pub const fn is_within_one((ar, ac): Coord2, (br, bc): Coord2) -> bool {
    ar.abs_diff(br) <= 1 && ac.abs_diff(bc) <= 1
}

pub trait NeighborIterExt {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter {
        let (rows, cols) = self.dim();
        // boards are built from `Coord` sized configs, larger dims are never constructed
        let size = (
            Coord::try_from(rows).unwrap_or(Coord::MAX),
            Coord::try_from(cols).unwrap_or(Coord::MAX),
        );
        NeighborIter::new(index, size)
    }
}

const DISPLACEMENTS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Steps one cell from `coords` in direction `(dr, dc)`, `None` past the board edge.
fn step((row, col): Coord2, (dr, dc): (i8, i8), (rows, cols): Coord2) -> Option<Coord2> {
    let row = row.checked_add_signed(dr).filter(|&row| row < rows)?;
    let col = col.checked_add_signed(dc).filter(|&col| col < cols)?;
    Some((row, col))
}

/// Iterator over the up-to-8 in-bounds neighbors of a cell, in row-major order.
#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    next_direction: usize,
}

impl NeighborIter {
    pub(crate) fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            next_direction: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&direction) = DISPLACEMENTS.get(self.next_direction) {
            self.next_direction += 1;
            if let Some(neighbor) = step(self.center, direction, self.bounds) {
                return Some(neighbor);
            }
        }
        None
    }
}
