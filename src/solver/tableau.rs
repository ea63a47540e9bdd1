use ndarray::{Array1, Array2};

use crate::solver::problem::{LinearProgram, OptimisationDirection};

/// One immutable snapshot of the tableau, frozen once per driver turn.
///
/// A snapshot records the state *after* `iteration` pivots. When a pivot was
/// applied to this state, `entering`, `leaving` and `ratios` describe that
/// pivot (the one that produced the next snapshot in the history); on a
/// terminal state no pivot follows and all three are `None`.
#[derive(Clone, Debug, PartialEq)]
pub struct TableauState {
    /// Coefficients of the nonbasic columns, one row per basic variable.
    pub matrix: Array2<f64>,
    /// Reduced-cost row, one entry per nonbasic column.
    pub delta: Array1<f64>,
    /// Current value of each basic variable.
    pub rhs: Array1<f64>,
    /// The negative of the current objective value (of the internal
    /// maximisation; minimised programs enter with a negated objective).
    pub objective_offset: f64,
    /// Names owning the columns of `matrix`, positionally.
    pub nonbasic_names: Vec<String>,
    /// Names owning the rows of `matrix` and the entries of `rhs`, positionally.
    pub basic_names: Vec<String>,
    /// Column chosen to enter the basis by the pivot applied to this state.
    pub entering: Option<usize>,
    /// Row whose basic variable leaves the basis in that pivot.
    pub leaving: Option<usize>,
    /// Ratio-test column of that pivot; `f64::INFINITY` marks excluded rows.
    pub ratios: Option<Array1<f64>>,
    /// Position of this snapshot in the history.
    pub iteration: usize,
    /// Human-readable description of what happens at this state.
    pub message: String,
}

impl TableauState {
    pub fn num_constraints(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn num_variables(&self) -> usize {
        self.matrix.ncols()
    }
}

/// The working tableau the driver advances in place. Snapshots taken from it
/// copy every array, so pivoting the working tableau never disturbs history.
#[derive(Clone, Debug)]
pub struct DenseTableau {
    pub(crate) matrix: Array2<f64>,
    pub(crate) delta: Array1<f64>,
    pub(crate) rhs: Array1<f64>,
    pub(crate) objective_offset: f64,
    pub(crate) nonbasic_names: Vec<String>,
    pub(crate) basic_names: Vec<String>,
}

impl DenseTableau {
    /// Builds the initial tableau: the slacks form the basis, the decision
    /// variables sit at zero, and a minimised objective is negated so the
    /// engine always maximises.
    pub fn initial(program: &LinearProgram) -> Self {
        let m = program.num_constraints();
        let n = program.num_variables();
        let mut matrix = Array2::zeros((m, n));
        for (i, row) in program.constraints.iter().enumerate() {
            for (j, &coefficient) in row.iter().enumerate() {
                matrix[[i, j]] = coefficient;
            }
        }
        let delta = match program.direction {
            OptimisationDirection::Maximise => Array1::from(program.objective.clone()),
            OptimisationDirection::Minimise => {
                Array1::from_iter(program.objective.iter().map(|c| -c))
            }
        };
        Self {
            matrix,
            delta,
            rhs: Array1::from(program.rhs.clone()),
            objective_offset: 0.0,
            nonbasic_names: program.variable_names.clone(),
            basic_names: program.slack_names(),
        }
    }

    pub fn num_constraints(&self) -> usize {
        self.matrix.nrows()
    }

    /// Freezes the current state into an immutable snapshot.
    pub fn snapshot(
        &self,
        iteration: usize,
        entering: Option<usize>,
        leaving: Option<usize>,
        ratios: Option<Array1<f64>>,
        message: String,
    ) -> TableauState {
        TableauState {
            matrix: self.matrix.clone(),
            delta: self.delta.clone(),
            rhs: self.rhs.clone(),
            objective_offset: self.objective_offset,
            nonbasic_names: self.nonbasic_names.clone(),
            basic_names: self.basic_names.clone(),
            entering,
            leaving,
            ratios,
            iteration,
            message,
        }
    }
}
