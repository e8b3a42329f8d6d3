use crate::error::{AceError, Result};

//=====================================================================
// Energy grid helpers shared by nuclides, angular distributions and
// probability tables.
//=====================================================================

// Validate that a grid is non-empty and strictly increasing
pub fn check_increasing(what: &'static str, grid: &[f64]) -> Result<()> {
    if grid.is_empty() {
        return Err(AceError::shape(what, "energy grid is empty"));
    }
    if let Some(i) = grid.windows(2).position(|w| !(w[0] < w[1])) {
        return Err(AceError::shape(
            what,
            format!(
                "energy grid must be strictly increasing, E[{}] = {} and E[{}] = {}",
                i,
                grid[i],
                i + 1,
                grid[i + 1]
            ),
        ));
    }
    Ok(())
}

// Index `i` of the grid interval [grid[i], grid[i + 1]] holding `energy`.
//
// Energies below the grid map to 0 and energies at or above the last
// point map to the last interval. Out-of-range energies are the
// caller's contract to report, not ours.
#[inline]
pub fn search(grid: &[f64], energy: f64) -> usize {
    if grid.len() < 2 {
        return 0;
    }
    let upper = grid.partition_point(|&e| e <= energy);
    upper.saturating_sub(1).min(grid.len() - 2)
}

// For every point of a library-wide union grid, the index of the
// nuclide grid interval that contains it.
pub fn union_grid_index(union_grid: &[f64], nuclide_grid: &[f64]) -> Vec<usize> {
    let mut index = Vec::with_capacity(union_grid.len());
    let mut j = 0;
    // Both grids are increasing, so one forward sweep suffices
    for &energy in union_grid {
        while j + 2 < nuclide_grid.len() && nuclide_grid[j + 1] <= energy {
            j += 1;
        }
        index.push(j);
    }
    index
}
