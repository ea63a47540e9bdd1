use ndarray::Array1;

use crate::solver::tableau::DenseTableau;

/// Verdict of the selection rules on one tableau.
///
/// `Optimal` means every reduced cost is at most the tolerance. `Unbounded`
/// means the chosen entering column has no positive coefficient, so the
/// objective grows without limit along it. `Pivot` carries the chosen pair
/// together with the ratio column that justified the leaving row.
#[derive(Clone, Debug, PartialEq)]
pub enum PivotDecision {
    Optimal,
    Unbounded {
        entering: usize,
    },
    Pivot {
        entering: usize,
        leaving: usize,
        ratios: Array1<f64>,
    },
}

/// Applies the entering rule, the unboundedness check and the ratio test to
/// one tableau. Pure; the tableau is not modified.
pub fn select_pivot(tableau: &DenseTableau, tolerance: f64) -> PivotDecision {
    let entering = match entering_column(&tableau.delta, tolerance) {
        Some(j) => j,
        None => return PivotDecision::Optimal,
    };
    let ratios = ratio_column(tableau, entering, tolerance);
    match leaving_row(&ratios) {
        Some(leaving) => PivotDecision::Pivot {
            entering,
            leaving,
            ratios,
        },
        None => PivotDecision::Unbounded { entering },
    }
}

/// First maximum of the reduced costs, `None` when none exceeds the tolerance.
fn entering_column(delta: &Array1<f64>, tolerance: f64) -> Option<usize> {
    let mut entering = None;
    let mut max_delta = tolerance;
    for (j, &d) in delta.iter().enumerate() {
        if d > max_delta {
            max_delta = d;
            entering = Some(j);
        }
    }
    entering
}

/// Ratio `rhs[i] / matrix[i, entering]` per row; rows whose coefficient is not
/// positive cannot bound the entering variable and get `f64::INFINITY`.
fn ratio_column(tableau: &DenseTableau, entering: usize, tolerance: f64) -> Array1<f64> {
    let column = tableau.matrix.column(entering);
    Array1::from_iter(
        column
            .iter()
            .zip(tableau.rhs.iter())
            .map(|(&coefficient, &b)| {
                if coefficient > tolerance {
                    b / coefficient
                } else {
                    f64::INFINITY
                }
            }),
    )
}

/// First finite minimum of the ratio column, `None` when every row is excluded.
fn leaving_row(ratios: &Array1<f64>) -> Option<usize> {
    let mut leaving = None;
    let mut min_ratio = f64::INFINITY;
    for (i, &ratio) in ratios.iter().enumerate() {
        if ratio < min_ratio {
            min_ratio = ratio;
            leaving = Some(i);
        }
    }
    leaving
}

/// Gauss-Jordan pivot on `matrix[leaving, entering]`: normalize the leaving
/// row, eliminate the entering column from the other rows and from the
/// reduced-cost row, fold the change into the objective offset, and swap the
/// entering and leaving names.
pub fn apply_pivot(tableau: &mut DenseTableau, entering: usize, leaving: usize) {
    let pivot = tableau.matrix[[leaving, entering]];
    let mut leaving_row = tableau.matrix.row_mut(leaving);
    leaving_row /= pivot;
    tableau.rhs[leaving] /= pivot;

    let pivot_row = tableau.matrix.row(leaving).to_owned();
    let pivot_rhs = tableau.rhs[leaving];
    for i in 0..tableau.num_constraints() {
        if i == leaving {
            continue;
        }
        let factor = tableau.matrix[[i, entering]];
        let mut row = tableau.matrix.row_mut(i);
        row.scaled_add(-factor, &pivot_row);
        tableau.rhs[i] -= factor * pivot_rhs;
    }

    let factor = tableau.delta[entering];
    tableau.delta.scaled_add(-factor, &pivot_row);
    tableau.objective_offset -= factor * pivot_rhs;

    std::mem::swap(
        &mut tableau.nonbasic_names[entering],
        &mut tableau.basic_names[leaving],
    );
}
