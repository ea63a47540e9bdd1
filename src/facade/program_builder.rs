use anyhow::{Result, bail};

use crate::{
    facade::backend::{BackendSolution, GeneralForm, LpBackend, MicrolpBackend},
    solver::{
        driver::{self, SolveResult},
        problem::{LinearProgram, OptimisationDirection},
    },
};

/// How a built program was solved: by the tracing tableau engine when the
/// program fits it, by a general-purpose backend otherwise.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    Tableau(SolveResult),
    General(BackendSolution),
}

/// Accumulating façade over both solution paths.
///
/// Programs made of `<=` rows with nonnegative right-hand sides and no bounds
/// beyond the implicit `x >= 0` go to the tableau engine and come back with a
/// full trace; everything else (equality rows, explicit bounds, negative
/// right-hand sides) is delegated to an [`LpBackend`].
///
/// ```
/// use tracelp::facade::program_builder::{ProgramBuilder, Resolution};
///
/// let resolution = ProgramBuilder::maximise(vec![3.0, 2.0])
///     .named("workshop plan")
///     .less_than(vec![2.0, 1.0], 18.0)
///     .less_than(vec![2.0, 3.0], 42.0)
///     .less_than(vec![3.0, 1.0], 24.0)
///     .solve()
///     .unwrap();
/// match resolution {
///     Resolution::Tableau(result) => {
///         assert!((result.objective_value.unwrap() - 30.0).abs() < 1e-9);
///         assert_eq!(result.history.len(), 3);
///     }
///     Resolution::General(_) => unreachable!("inequality-only programs are traced"),
/// }
/// ```
#[derive(Clone, Debug)]
pub struct ProgramBuilder {
    pub(crate) name: Option<String>,
    pub(crate) direction: OptimisationDirection,
    pub(crate) objective: Vec<f64>,
    pub(crate) names: Option<Vec<String>>,
    pub(crate) a_ineq: Vec<Vec<f64>>,
    pub(crate) b_ineq: Vec<f64>,
    pub(crate) a_eq: Vec<Vec<f64>>,
    pub(crate) b_eq: Vec<f64>,
    pub(crate) bounds: Option<Vec<(f64, f64)>>,
}

impl ProgramBuilder {
    pub fn maximise(objective: Vec<f64>) -> Self {
        Self::with_direction(OptimisationDirection::Maximise, objective)
    }

    pub fn minimise(objective: Vec<f64>) -> Self {
        Self::with_direction(OptimisationDirection::Minimise, objective)
    }

    fn with_direction(direction: OptimisationDirection, objective: Vec<f64>) -> Self {
        Self {
            name: None,
            direction,
            objective,
            names: None,
            a_ineq: vec![],
            b_ineq: vec![],
            a_eq: vec![],
            b_eq: vec![],
            bounds: None,
        }
    }

    /// Problem name used as the heading of the rendered statement.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Variable names (length `n`); defaults to `x1..xn`.
    pub fn variable_names(mut self, names: Vec<String>) -> Self {
        self.names = Some(names);
        self
    }

    /// Adds the constraint `coefficients · x <= rhs`.
    pub fn less_than(mut self, coefficients: Vec<f64>, rhs: f64) -> Self {
        self.a_ineq.push(coefficients);
        self.b_ineq.push(rhs);
        self
    }

    /// Adds the constraint `coefficients · x == rhs`.
    pub fn equal_to(mut self, coefficients: Vec<f64>, rhs: f64) -> Self {
        self.a_eq.push(coefficients);
        self.b_eq.push(rhs);
        self
    }

    /// Per-variable `(min, max)` bounds; defaults to `(0, +inf)` for every
    /// variable.
    pub fn bounds(mut self, bounds: Vec<(f64, f64)>) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Validates the accumulated program and solves it with the default
    /// microlp backend behind the routing rule.
    pub fn solve(&self) -> Result<Resolution> {
        self.solve_with_backend(&MicrolpBackend)
    }

    /// Like [`solve`](Self::solve), with a caller-chosen backend for the
    /// general path.
    pub fn solve_with_backend(&self, backend: &impl LpBackend) -> Result<Resolution> {
        self.validate()?;
        if self.fits_the_tableau_engine() {
            let program = LinearProgram::with_names(
                self.direction,
                self.objective.clone(),
                self.a_ineq.clone(),
                self.b_ineq.clone(),
                self.names_or_default(),
            )?;
            log::debug!("solving with the tableau engine");
            Ok(Resolution::Tableau(driver::solve(&program)))
        } else {
            log::debug!("routing to the general backend");
            Ok(Resolution::General(backend.solve_general(&self.general_form())))
        }
    }

    fn validate(&self) -> Result<()> {
        let n = self.objective.len();
        if n == 0 {
            bail!("the objective must have at least one coefficient");
        }
        for (i, row) in self.a_ineq.iter().enumerate() {
            if row.len() != n {
                bail!(
                    "inequality row {} has {} coefficients, the objective has {}",
                    i,
                    row.len(),
                    n
                );
            }
        }
        for (i, row) in self.a_eq.iter().enumerate() {
            if row.len() != n {
                bail!(
                    "equality row {} has {} coefficients, the objective has {}",
                    i,
                    row.len(),
                    n
                );
            }
        }
        if self.b_ineq.len() != self.a_ineq.len() {
            bail!(
                "{} inequality rows but {} right-hand sides",
                self.a_ineq.len(),
                self.b_ineq.len()
            );
        }
        if self.b_eq.len() != self.a_eq.len() {
            bail!(
                "{} equality rows but {} right-hand sides",
                self.a_eq.len(),
                self.b_eq.len()
            );
        }
        if let Some(names) = &self.names {
            if names.len() != n {
                bail!("{} variable names for {} variables", names.len(), n);
            }
        }
        if let Some(bounds) = &self.bounds {
            if bounds.len() != n {
                bail!("{} bound pairs for {} variables", bounds.len(), n);
            }
            for (i, &(min, max)) in bounds.iter().enumerate() {
                if !(min <= max) {
                    bail!("bound {} has minimum {} above maximum {}", i, min, max);
                }
            }
        }
        Ok(())
    }

    /// The tableau engine takes `<=` rows only, implicit `x >= 0` and a
    /// feasible all-slack start.
    fn fits_the_tableau_engine(&self) -> bool {
        self.a_eq.is_empty()
            && self.b_ineq.iter().all(|&b| b >= 0.0)
            && match &self.bounds {
                None => true,
                Some(bounds) => bounds
                    .iter()
                    .all(|&(min, max)| min == 0.0 && max == f64::INFINITY),
            }
    }

    pub(crate) fn names_or_default(&self) -> Vec<String> {
        match &self.names {
            Some(names) => names.clone(),
            None => (1..=self.objective.len()).map(|i| format!("x{}", i)).collect(),
        }
    }

    fn general_form(&self) -> GeneralForm {
        GeneralForm {
            direction: self.direction,
            objective: self.objective.clone(),
            a_ineq: self.a_ineq.clone(),
            b_ineq: self.b_ineq.clone(),
            a_eq: self.a_eq.clone(),
            b_eq: self.b_eq.clone(),
            bounds: self
                .bounds
                .clone()
                .unwrap_or_else(|| vec![(0.0, f64::INFINITY); self.objective.len()]),
        }
    }
}
