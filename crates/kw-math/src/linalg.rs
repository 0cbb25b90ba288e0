//! Tolerance-aware row reduction used to read off matrix rank.

use nalgebra::DMatrix;

use crate::Vector3;

/// Stack vectors as the rows of an `n × 3` matrix.
pub fn matrix_from_rows(rows: &[Vector3]) -> DMatrix<f64> {
    DMatrix::from_fn(rows.len(), 3, |r, c| rows[r][c])
}

/// Reduce `matrix` to row-echelon form with partial pivoting.
///
/// For each pivot column the row with the largest magnitude entry at or
/// below the current pivot row is swapped into place and entries below it
/// are eliminated. With `normalize` set, each pivot row is scaled so its
/// pivot is `1`. Entries with magnitude `<= tolerance` are treated as zero
/// and snapped to exactly `0.0` in the result.
pub fn row_echelon_form(matrix: &DMatrix<f64>, normalize: bool, tolerance: f64) -> DMatrix<f64> {
    let mut m = matrix.clone();
    let (rows, cols) = m.shape();
    let mut pivot_row = 0;

    for col in 0..cols {
        if pivot_row >= rows {
            break;
        }

        let mut best = pivot_row;
        for r in pivot_row + 1..rows {
            if m[(r, col)].abs() > m[(best, col)].abs() {
                best = r;
            }
        }

        if m[(best, col)].abs() <= tolerance {
            // Nothing usable in this column
            for r in pivot_row..rows {
                m[(r, col)] = 0.0;
            }
            continue;
        }

        m.swap_rows(pivot_row, best);

        if normalize {
            let pivot = m[(pivot_row, col)];
            for c in col..cols {
                m[(pivot_row, c)] /= pivot;
            }
        }

        let pivot = m[(pivot_row, col)];
        for r in pivot_row + 1..rows {
            let ratio = m[(r, col)] / pivot;
            if ratio == 0.0 {
                continue;
            }
            for c in col..cols {
                let v = m[(r, c)] - ratio * m[(pivot_row, c)];
                m[(r, c)] = if v.abs() <= tolerance { 0.0 } else { v };
            }
            m[(r, col)] = 0.0;
        }

        pivot_row += 1;
    }

    m.apply(|v| {
        if v.abs() <= tolerance {
            *v = 0.0;
        }
    });
    m
}

/// Number of rows holding at least one entry with magnitude `> tolerance`.
pub fn count_non_zero_rows(matrix: &DMatrix<f64>, tolerance: f64) -> usize {
    matrix
        .row_iter()
        .filter(|row| row.iter().any(|v| v.abs() > tolerance))
        .count()
}

/// Rank of `matrix` as the non-zero row count of its row-echelon form.
pub fn rank(matrix: &DMatrix<f64>, tolerance: f64) -> usize {
    count_non_zero_rows(&row_echelon_form(matrix, false, tolerance), tolerance)
}
