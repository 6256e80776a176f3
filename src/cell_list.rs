use crate::error::{Error, Result};

/// Uniform cell grid over a periodic box, used for neighbour queries.
///
/// Buckets hold the indices of the particles currently inside each cell;
/// `membership` records the bucket each tracked particle sits in.
#[derive(Clone, Debug)]
pub struct CellList {
    num_cells: [usize; 2],
    cell_size: [f64; 2],
    cells: Vec<Vec<usize>>,
    membership: Vec<usize>,
    neighbours: Vec<Vec<usize>>,
}

impl CellList {
    /// Partition the box into cells of side at least `cutoff`.
    pub fn initialise(box_size: &[f64; 2], cutoff: f64) -> Result<Self> {
        if cutoff <= 0.0 {
            return Err(Error::Configuration(format!(
                "cell cutoff should be positive, found {}",
                cutoff
            )));
        }
        let mut num_cells = [0usize; 2];
        let mut cell_size = [0f64; 2];
        for d in 0..2 {
            num_cells[d] = (box_size[d] / cutoff).floor() as usize;
            if num_cells[d] == 0 {
                return Err(Error::Configuration(format!(
                    "box length {} is smaller than the cell cutoff {}",
                    box_size[d], cutoff
                )));
            }
            cell_size[d] = box_size[d] / num_cells[d] as f64;
        }

        let total = num_cells[0] * num_cells[1];
        let mut neighbours = Vec::with_capacity(total);
        for cell in 0..total {
            let cx = (cell % num_cells[0]) as i64;
            let cy = (cell / num_cells[0]) as i64;
            let mut adjacent = Vec::with_capacity(9);
            for dy in -1..=1i64 {
                for dx in -1..=1i64 {
                    let nx = (cx + dx).rem_euclid(num_cells[0] as i64) as usize;
                    let ny = (cy + dy).rem_euclid(num_cells[1] as i64) as usize;
                    adjacent.push(ny * num_cells[0] + nx);
                }
            }
            // fewer than 3 cells along a dimension folds images onto the
            // same cell; deduplicate so pair sums never double count
            adjacent.sort_unstable();
            adjacent.dedup();
            neighbours.push(adjacent);
        }

        Ok(Self {
            num_cells,
            cell_size,
            cells: vec![Vec::new(); total],
            membership: Vec::new(),
            neighbours,
        })
    }
    pub fn num_cells(&self) -> &[usize; 2] {
        &self.num_cells
    }
    pub fn cell_size(&self) -> &[f64; 2] {
        &self.cell_size
    }
    /// Linear cell index for a wrapped position.
    pub fn cell_of(&self, position: &[f64; 2]) -> usize {
        let mut index = [0usize; 2];
        for d in 0..2 {
            index[d] =
                ((position[d] / self.cell_size[d]).floor() as usize).min(self.num_cells[d] - 1);
        }
        index[1] * self.num_cells[0] + index[0]
    }
    /// The cell itself plus its distinct periodic neighbours.
    pub fn neighbours(&self, cell: usize) -> &[usize] {
        &self.neighbours[cell]
    }
    /// Particle indices currently inside a cell.
    pub fn members(&self, cell: usize) -> &[usize] {
        &self.cells[cell]
    }
    /// Current bucket of a tracked particle.
    pub fn cell_of_particle(&self, index: usize) -> usize {
        self.membership[index]
    }
    /// Start tracking a particle; indices must arrive in order.
    pub fn insert(&mut self, index: usize, position: &[f64; 2]) {
        debug_assert_eq!(index, self.membership.len());
        let cell = self.cell_of(position);
        self.cells[cell].push(index);
        self.membership.push(cell);
    }
    /// Move a particle between buckets if its cell changed.
    pub fn update_particle(&mut self, index: usize, new_position: &[f64; 2]) {
        let new_cell = self.cell_of(new_position);
        let old_cell = self.membership[index];
        if new_cell == old_cell {
            return;
        }
        let bucket = &mut self.cells[old_cell];
        let slot = bucket
            .iter()
            .position(|&i| i == index)
            .expect("particle missing from its cell bucket");
        bucket.swap_remove(slot);
        self.cells[new_cell].push(index);
        self.membership[index] = new_cell;
    }
}
