/// An enum indicating whether to minimise or maximise the objective function.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptimisationDirection {
    /// Minimise the objective function.
    Minimise,
    /// Maximise the objective function.
    Maximise,
}

/// Ways in which an input program is rejected before the first tableau exists.
#[derive(Clone, Debug, PartialEq)]
pub enum ProblemError {
    /// Some input vector or matrix row has an inconsistent length.
    Dimension(String),
    /// A right-hand side is negative, so the all-slack starting basis is not feasible.
    InfeasibleStart { row: usize, value: f64 },
}

impl std::fmt::Display for ProblemError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ProblemError::Dimension(msg) => write!(f, "dimension mismatch: {}", msg),
            ProblemError::InfeasibleStart { row, value } => write!(
                f,
                "right-hand side {} of constraint {} is negative; the all-slack basis is infeasible",
                value, row
            ),
        }
    }
}

impl std::error::Error for ProblemError {}

/// A linear program in the form the tableau engine accepts: maximise or
/// minimise `objective · x` subject to `constraints · x <= rhs` and `x >= 0`.
///
/// Every constraint row is read as `<=`; one slack variable per row turns it
/// into an equality, and the slacks form the feasible starting basis. General
/// programs with equality rows or explicit bounds belong to
/// [`ProgramBuilder`](crate::facade::program_builder::ProgramBuilder), which
/// routes them to a general-purpose backend instead.
///
/// ```
/// use tracelp::solver::problem::{LinearProgram, OptimisationDirection};
///
/// let program = LinearProgram::new(
///     OptimisationDirection::Maximise,
///     vec![3.0, 2.0],
///     vec![vec![2.0, 1.0], vec![2.0, 3.0], vec![3.0, 1.0]],
///     vec![18.0, 42.0, 24.0],
/// ).unwrap();
/// assert_eq!(program.num_variables(), 2);
/// assert_eq!(program.num_constraints(), 3);
/// assert_eq!(program.variable_names(), ["x1", "x2"]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct LinearProgram {
    pub(crate) direction: OptimisationDirection,
    pub(crate) objective: Vec<f64>,
    pub(crate) constraints: Vec<Vec<f64>>,
    pub(crate) rhs: Vec<f64>,
    pub(crate) variable_names: Vec<String>,
}

impl LinearProgram {
    /// Creates a program with the default variable names `x1..xn`.
    pub fn new(
        direction: OptimisationDirection,
        objective: Vec<f64>,
        constraints: Vec<Vec<f64>>,
        rhs: Vec<f64>,
    ) -> Result<Self, ProblemError> {
        let names = (1..=objective.len()).map(|i| format!("x{}", i)).collect();
        Self::with_names(direction, objective, constraints, rhs, names)
    }

    /// Creates a program with caller-supplied variable names (length `n`).
    pub fn with_names(
        direction: OptimisationDirection,
        objective: Vec<f64>,
        constraints: Vec<Vec<f64>>,
        rhs: Vec<f64>,
        variable_names: Vec<String>,
    ) -> Result<Self, ProblemError> {
        if objective.is_empty() {
            return Err(ProblemError::Dimension(
                "the objective must have at least one coefficient".to_string(),
            ));
        }
        let num_variables = objective.len();
        for (i, row) in constraints.iter().enumerate() {
            if row.len() != num_variables {
                return Err(ProblemError::Dimension(format!(
                    "constraint row {} has {} coefficients, the objective has {}",
                    i,
                    row.len(),
                    num_variables
                )));
            }
        }
        if rhs.len() != constraints.len() {
            return Err(ProblemError::Dimension(format!(
                "{} constraint rows but {} right-hand sides",
                constraints.len(),
                rhs.len()
            )));
        }
        if variable_names.len() != num_variables {
            return Err(ProblemError::Dimension(format!(
                "{} variable names for {} variables",
                variable_names.len(),
                num_variables
            )));
        }
        if let Some((row, &value)) = rhs.iter().enumerate().find(|&(_, &b)| b < 0.0) {
            return Err(ProblemError::InfeasibleStart { row, value });
        }
        Ok(Self {
            direction,
            objective,
            constraints,
            rhs,
            variable_names,
        })
    }

    /// Number of decision variables `n`.
    pub fn num_variables(&self) -> usize {
        self.objective.len()
    }

    /// Number of constraint rows `m`.
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn direction(&self) -> OptimisationDirection {
        self.direction
    }

    pub fn variable_names(&self) -> &[String] {
        &self.variable_names
    }

    /// Names of the generated slack variables, `t1..tm`.
    pub fn slack_names(&self) -> Vec<String> {
        (1..=self.num_constraints())
            .map(|i| format!("t{}", i))
            .collect()
    }
}
