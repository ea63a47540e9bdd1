use microlp::{ComparisonOp, OptimizationDirection, Problem};

use crate::solver::problem::OptimisationDirection;

/// Status codes of the general-backend contract, following the scipy-linprog
/// convention consumers of this seam expect.
pub const STATUS_OPTIMAL: i32 = 0;
pub const STATUS_ITERATION_LIMIT: i32 = 1;
pub const STATUS_INFEASIBLE: i32 = 2;
pub const STATUS_UNBOUNDED: i32 = 3;
pub const STATUS_NUMERICAL: i32 = 4;

/// A general linear program: minimise or maximise `objective · x` subject to
/// `a_ineq · x <= b_ineq`, `a_eq · x == b_eq` and per-variable bounds.
///
/// This is the shape the routing façade hands to a backend when the program
/// does not fit the tableau engine.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneralForm {
    pub direction: OptimisationDirection,
    pub objective: Vec<f64>,
    pub a_ineq: Vec<Vec<f64>>,
    pub b_ineq: Vec<f64>,
    pub a_eq: Vec<Vec<f64>>,
    pub b_eq: Vec<f64>,
    /// One `(min, max)` pair per variable, `f64::INFINITY` for an open end.
    pub bounds: Vec<(f64, f64)>,
}

/// Flat outcome of a general-purpose backend solve. `values` and `objective`
/// are meaningful only when `success` holds.
#[derive(Clone, Debug, PartialEq)]
pub struct BackendSolution {
    pub success: bool,
    /// Decision-variable values in declaration order; empty on failure.
    pub values: Vec<f64>,
    pub objective: f64,
    pub message: String,
    pub status_code: i32,
}

/// Seam for solving programs the tableau engine does not accept.
pub trait LpBackend {
    fn solve_general(&self, form: &GeneralForm) -> BackendSolution;
}

/// The default backend, on the microlp crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct MicrolpBackend;

impl LpBackend for MicrolpBackend {
    fn solve_general(&self, form: &GeneralForm) -> BackendSolution {
        let direction = match form.direction {
            OptimisationDirection::Minimise => OptimizationDirection::Minimize,
            OptimisationDirection::Maximise => OptimizationDirection::Maximize,
        };
        let mut problem = Problem::new(direction);
        let variables: Vec<microlp::Variable> = form
            .objective
            .iter()
            .zip(form.bounds.iter())
            .map(|(&coefficient, &bounds)| problem.add_var(coefficient, bounds))
            .collect();
        for (row, &b) in form.a_ineq.iter().zip(form.b_ineq.iter()) {
            problem.add_constraint(row_terms(&variables, row), ComparisonOp::Le, b);
        }
        for (row, &b) in form.a_eq.iter().zip(form.b_eq.iter()) {
            problem.add_constraint(row_terms(&variables, row), ComparisonOp::Eq, b);
        }
        log::debug!(
            "delegating to microlp: {} variables, {} inequality rows, {} equality rows",
            variables.len(),
            form.a_ineq.len(),
            form.a_eq.len()
        );
        match problem.solve() {
            Ok(solution) => BackendSolution {
                success: true,
                values: variables.iter().map(|&v| solution[v]).collect(),
                objective: solution.objective(),
                message: "optimisation terminated successfully".to_string(),
                status_code: STATUS_OPTIMAL,
            },
            Err(error) => {
                log::info!("microlp rejected the program: {}", error);
                let status_code = match error {
                    microlp::Error::Infeasible => STATUS_INFEASIBLE,
                    microlp::Error::Unbounded => STATUS_UNBOUNDED,
                    _ => STATUS_NUMERICAL,
                };
                BackendSolution {
                    success: false,
                    values: vec![],
                    objective: f64::NAN,
                    message: error.to_string(),
                    status_code,
                }
            }
        }
    }
}

/// Dense row as sparse variable/coefficient terms; zero coefficients carry no
/// information and are left out.
fn row_terms(variables: &[microlp::Variable], row: &[f64]) -> Vec<(microlp::Variable, f64)> {
    variables
        .iter()
        .copied()
        .zip(row.iter().copied())
        .filter(|(_, coefficient)| *coefficient != 0.0)
        .collect()
}
