use std::collections::BTreeMap;

use crate::solver::{
    pivot::{self, PivotDecision},
    problem::{LinearProgram, OptimisationDirection},
    tableau::{DenseTableau, TableauState},
};

/// Hard bound on the number of pivots; reaching it is a reported outcome,
/// never a silent success.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Reduced costs and pivot candidates within this distance of zero count as
/// zero. May require adjustment for badly scaled problems.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Knobs of the solve loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverOptions {
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// Terminal verdict of a solve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveStatus {
    Optimal,
    Unbounded,
    IterationLimit,
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let msg = match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Unbounded => "unbounded",
            SolveStatus::IterationLimit => "iteration limit reached",
        };
        msg.fmt(f)
    }
}

/// Everything a solve produced: the full trace and the verdict.
///
/// `history` is never empty and grows by exactly one snapshot per visited
/// tableau, so `history.len() == 1 + pivots_performed()`. `variable_values`
/// and `objective_value` are present only on [`SolveStatus::Optimal`]; the
/// map covers every name of the universe, slacks included, with nonbasic
/// variables at exactly zero.
#[derive(Clone, Debug, PartialEq)]
pub struct SolveResult {
    pub history: Vec<TableauState>,
    pub status: SolveStatus,
    pub variable_values: Option<BTreeMap<String, f64>>,
    pub objective_value: Option<f64>,
}

impl SolveResult {
    /// Number of pivots the solve performed; always `history.len() - 1`.
    pub fn pivots_performed(&self) -> usize {
        self.history
            .iter()
            .filter(|state| state.entering.is_some())
            .count()
    }
}

/// Runs the simplex loop with default options.
///
/// ```
/// use tracelp::solver::driver::{solve, SolveStatus};
/// use tracelp::solver::problem::{LinearProgram, OptimisationDirection};
///
/// // Maximise 1200 x1 + 1000 x2
/// // subject to 3 x1 + 4 x2 <= 160 and 6 x1 + 3 x2 <= 180.
/// let program = LinearProgram::new(
///     OptimisationDirection::Maximise,
///     vec![1200.0, 1000.0],
///     vec![vec![3.0, 4.0], vec![6.0, 3.0]],
///     vec![160.0, 180.0],
/// ).unwrap();
///
/// let result = solve(&program);
/// assert_eq!(result.status, SolveStatus::Optimal);
/// assert_eq!(result.objective_value, Some(47200.0));
/// let values = result.variable_values.unwrap();
/// assert_eq!(values["x1"], 16.0);
/// assert_eq!(values["x2"], 28.0);
/// // One snapshot per visited tableau: initial, after pivot 1, optimal.
/// assert_eq!(result.history.len(), 3);
/// ```
pub fn solve(program: &LinearProgram) -> SolveResult {
    solve_with_options(program, &SolverOptions::default())
}

/// Runs the simplex loop: select a pivot, freeze a snapshot of the current
/// tableau, apply the pivot, until a terminal verdict. Snapshots that a pivot
/// was applied to carry the pivot's annotations; terminal snapshots carry
/// none.
pub fn solve_with_options(program: &LinearProgram, options: &SolverOptions) -> SolveResult {
    let mut work = DenseTableau::initial(program);
    let mut history: Vec<TableauState> = Vec::new();
    let status = loop {
        let iteration = history.len();
        match pivot::select_pivot(&work, options.tolerance) {
            PivotDecision::Optimal => {
                let objective = objective_value(&work, program.direction());
                log::info!(
                    "optimal tableau after {} pivots, objective value {}",
                    iteration,
                    objective
                );
                let message = format!(
                    "optimal: every reduced cost is at most zero; objective value = {:.4}",
                    objective
                );
                history.push(work.snapshot(iteration, None, None, None, message));
                break SolveStatus::Optimal;
            }
            PivotDecision::Unbounded { entering } => {
                let message = format!(
                    "unbounded: column {} has a positive reduced cost but no positive coefficient in any row",
                    work.nonbasic_names[entering]
                );
                log::info!("{}", message);
                history.push(work.snapshot(iteration, None, None, None, message));
                break SolveStatus::Unbounded;
            }
            PivotDecision::Pivot {
                entering,
                leaving,
                ratios,
            } => {
                if iteration == options.max_iterations {
                    let message = format!(
                        "iteration limit of {} pivots reached without a verdict",
                        options.max_iterations
                    );
                    log::info!("{}", message);
                    history.push(work.snapshot(iteration, None, None, None, message));
                    break SolveStatus::IterationLimit;
                }
                let message = format!(
                    "pivot {}: {} enters the basis, {} leaves (ratio = {:.2})",
                    iteration + 1,
                    work.nonbasic_names[entering],
                    work.basic_names[leaving],
                    ratios[leaving]
                );
                log::debug!("{}", message);
                history.push(work.snapshot(
                    iteration,
                    Some(entering),
                    Some(leaving),
                    Some(ratios),
                    message,
                ));
                pivot::apply_pivot(&mut work, entering, leaving);
            }
        }
    };
    let (variable_values, objective) = match status {
        SolveStatus::Optimal => (
            Some(read_solution(&work)),
            Some(objective_value(&work, program.direction())),
        ),
        _ => (None, None),
    };
    SolveResult {
        history,
        status,
        variable_values,
        objective_value: objective,
    }
}

/// Objective value of the tableau, re-negated for minimised programs.
fn objective_value(tableau: &DenseTableau, direction: OptimisationDirection) -> f64 {
    let value = -tableau.objective_offset;
    match direction {
        OptimisationDirection::Maximise => value,
        OptimisationDirection::Minimise => -value,
    }
}

/// Basic variables take their rhs value, every nonbasic variable is zero.
fn read_solution(tableau: &DenseTableau) -> BTreeMap<String, f64> {
    let mut values = BTreeMap::new();
    for (name, &value) in tableau.basic_names.iter().zip(tableau.rhs.iter()) {
        values.insert(name.clone(), value);
    }
    for name in &tableau.nonbasic_names {
        values.insert(name.clone(), 0.0);
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use ntest::timeout;
    use std::collections::BTreeSet;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} is not close to {}", a, b);
    }

    fn maximise(
        objective: Vec<f64>,
        constraints: Vec<Vec<f64>>,
        rhs: Vec<f64>,
    ) -> LinearProgram {
        LinearProgram::new(OptimisationDirection::Maximise, objective, constraints, rhs).unwrap()
    }

    fn production_program() -> LinearProgram {
        maximise(
            vec![1200.0, 1000.0],
            vec![vec![3.0, 4.0], vec![6.0, 3.0]],
            vec![160.0, 180.0],
        )
    }

    fn workshop_program() -> LinearProgram {
        maximise(
            vec![3.0, 2.0],
            vec![vec![2.0, 1.0], vec![2.0, 3.0], vec![3.0, 1.0]],
            vec![18.0, 42.0, 24.0],
        )
    }

    #[test]
    #[timeout(1000)]
    fn production_planning_reaches_the_optimum() {
        let result = solve(&production_program());
        assert_eq!(result.status, SolveStatus::Optimal);
        assert_eq!(result.objective_value, Some(47200.0));
        assert_eq!(result.history.len(), 3);
        assert_eq!(result.pivots_performed(), 2);
        let values = result.variable_values.unwrap();
        assert_eq!(values["x1"], 16.0);
        assert_eq!(values["x2"], 28.0);
        assert_eq!(values["t1"], 0.0);
        assert_eq!(values["t2"], 0.0);
    }

    #[test]
    fn pivot_annotations_sit_on_the_state_they_were_chosen_on() {
        let result = solve(&production_program());
        let first = &result.history[0];
        assert_eq!(first.entering, Some(0));
        assert_eq!(first.leaving, Some(1));
        let ratios = first.ratios.as_ref().unwrap();
        assert_eq!(ratios[1], 30.0);
        let second = &result.history[1];
        assert_eq!(second.entering, Some(1));
        assert_eq!(second.leaving, Some(0));
        let last = &result.history[2];
        assert_eq!(last.entering, None);
        assert_eq!(last.leaving, None);
        assert_eq!(last.ratios, None);
        assert!(last.message.contains("optimal"));
    }

    #[test]
    #[timeout(1000)]
    fn workshop_program_reaches_the_optimum() {
        let result = solve(&workshop_program());
        assert_eq!(result.status, SolveStatus::Optimal);
        assert_close(result.objective_value.unwrap(), 30.0);
        assert_eq!(result.pivots_performed(), 2);
        let values = result.variable_values.unwrap();
        assert_close(values["x1"], 6.0);
        assert_close(values["x2"], 6.0);
        assert_close(values["t1"], 0.0);
        assert_close(values["t2"], 12.0);
        assert_close(values["t3"], 0.0);
    }

    #[test]
    fn early_snapshots_keep_their_initial_values() {
        let result = solve(&workshop_program());
        let initial = &result.history[0];
        assert_eq!(initial.iteration, 0);
        assert_eq!(initial.delta.to_vec(), vec![3.0, 2.0]);
        assert_eq!(initial.rhs.to_vec(), vec![18.0, 42.0, 24.0]);
        assert_eq!(initial.objective_offset, 0.0);
        assert_eq!(initial.nonbasic_names, ["x1", "x2"]);
        assert_eq!(initial.basic_names, ["t1", "t2", "t3"]);
    }

    #[test]
    fn histories_are_deterministic() {
        let first = solve(&workshop_program());
        let second = solve(&workshop_program());
        assert_eq!(first, second);
    }

    #[test]
    fn every_snapshot_partitions_the_name_universe() {
        let result = solve(&workshop_program());
        let universe: BTreeSet<String> = ["x1", "x2", "t1", "t2", "t3"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        for state in &result.history {
            assert_eq!(state.num_constraints(), 3);
            assert_eq!(state.num_variables(), 2);
            assert_eq!(state.basic_names.len(), 3);
            assert_eq!(state.nonbasic_names.len(), 2);
            let seen: BTreeSet<String> = state
                .basic_names
                .iter()
                .chain(state.nonbasic_names.iter())
                .cloned()
                .collect();
            assert_eq!(seen, universe);
        }
    }

    #[test]
    fn the_name_partition_holds_on_the_unbounded_path() {
        let program = maximise(vec![2.0, 1.0], vec![vec![1.0, -1.0]], vec![4.0]);
        let result = solve(&program);
        assert_eq!(result.status, SolveStatus::Unbounded);
        let universe: BTreeSet<String> = ["x1", "x2", "t1"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        for state in &result.history {
            let seen: BTreeSet<String> = state
                .basic_names
                .iter()
                .chain(state.nonbasic_names.iter())
                .cloned()
                .collect();
            assert_eq!(seen, universe);
        }
    }

    #[test]
    fn each_pivot_moves_the_entering_variable_onto_its_ratio() {
        let result = solve(&workshop_program());
        for pair in result.history.windows(2) {
            let (before, after) = (&pair[0], &pair[1]);
            let entering = before.entering.unwrap();
            let leaving = before.leaving.unwrap();
            let pivot = before.matrix[[leaving, entering]];
            assert_close(after.rhs[leaving], before.rhs[leaving] / pivot);
            assert_eq!(after.basic_names[leaving], before.nonbasic_names[entering]);
            assert!(!after.nonbasic_names.contains(&before.nonbasic_names[entering]));
        }
    }

    #[test]
    #[timeout(1000)]
    fn unbounded_after_one_pivot_keeps_the_partial_trace() {
        let program = maximise(vec![2.0, 1.0], vec![vec![1.0, -1.0]], vec![4.0]);
        let result = solve(&program);
        assert_eq!(result.status, SolveStatus::Unbounded);
        assert_eq!(result.history.len(), 2);
        assert_eq!(result.pivots_performed(), 1);
        assert_eq!(result.variable_values, None);
        assert_eq!(result.objective_value, None);
        let last = &result.history[1];
        assert_eq!(last.entering, None);
        assert!(last.message.contains("unbounded"));
        assert!(last.message.contains("x2"));
    }

    #[test]
    fn immediately_unbounded_programs_leave_one_snapshot() {
        let program = maximise(vec![1.0, 2.0], vec![vec![1.0, -1.0]], vec![4.0]);
        let result = solve(&program);
        assert_eq!(result.status, SolveStatus::Unbounded);
        assert_eq!(result.history.len(), 1);
        assert_eq!(result.pivots_performed(), 0);
    }

    #[test]
    fn minimising_is_maximising_the_negated_objective() {
        let constraints = vec![vec![2.0, 1.0], vec![1.0, 3.0]];
        let rhs = vec![40.0, 30.0];
        let minimised = LinearProgram::new(
            OptimisationDirection::Minimise,
            vec![100.0, 80.0],
            constraints.clone(),
            rhs.clone(),
        )
        .unwrap();
        let maximised = LinearProgram::new(
            OptimisationDirection::Maximise,
            vec![-100.0, -80.0],
            constraints,
            rhs,
        )
        .unwrap();
        let min_result = solve(&minimised);
        let max_result = solve(&maximised);
        assert_eq!(min_result.status, SolveStatus::Optimal);
        assert_eq!(min_result.variable_values, max_result.variable_values);
        assert_eq!(
            min_result.objective_value.unwrap(),
            -max_result.objective_value.unwrap()
        );
    }

    #[test]
    fn minimising_negative_costs_finds_the_nontrivial_optimum() {
        let constraints = vec![vec![2.0, 1.0], vec![1.0, 1.0]];
        let rhs = vec![100.0, 80.0];
        let minimised = LinearProgram::new(
            OptimisationDirection::Minimise,
            vec![-40.0, -30.0],
            constraints.clone(),
            rhs.clone(),
        )
        .unwrap();
        let maximised = LinearProgram::new(
            OptimisationDirection::Maximise,
            vec![40.0, 30.0],
            constraints,
            rhs,
        )
        .unwrap();
        let min_result = solve(&minimised);
        let max_result = solve(&maximised);
        assert_eq!(min_result.objective_value, Some(-2600.0));
        assert_eq!(max_result.objective_value, Some(2600.0));
        assert_eq!(min_result.variable_values, max_result.variable_values);
        let values = max_result.variable_values.unwrap();
        assert_eq!(values["x1"], 20.0);
        assert_eq!(values["x2"], 60.0);
    }

    #[test]
    fn the_iteration_cap_is_a_reported_outcome() {
        let options = SolverOptions {
            max_iterations: 1,
            ..SolverOptions::default()
        };
        let result = solve_with_options(&workshop_program(), &options);
        assert_eq!(result.status, SolveStatus::IterationLimit);
        assert_eq!(result.history.len(), 2);
        assert_eq!(result.pivots_performed(), 1);
        assert_eq!(result.variable_values, None);
        let last = &result.history[1];
        assert_eq!(last.entering, None);
        assert!(last.message.contains("iteration limit"));
    }

    #[test]
    fn a_zero_pivot_cap_reports_on_the_initial_tableau() {
        let options = SolverOptions {
            max_iterations: 0,
            ..SolverOptions::default()
        };
        let result = solve_with_options(&workshop_program(), &options);
        assert_eq!(result.status, SolveStatus::IterationLimit);
        assert_eq!(result.history.len(), 1);
        assert_eq!(result.pivots_performed(), 0);
        let initial = &result.history[0];
        assert_eq!(initial.iteration, 0);
        assert_eq!(initial.rhs.to_vec(), vec![18.0, 42.0, 24.0]);
        assert!(initial.message.contains("iteration limit"));
    }

    #[test]
    fn programs_without_constraints_terminate_at_once() {
        let optimal = maximise(vec![-1.0, -2.0], vec![], vec![]);
        let result = solve(&optimal);
        assert_eq!(result.status, SolveStatus::Optimal);
        assert_eq!(result.history.len(), 1);
        assert_eq!(result.objective_value, Some(0.0));

        let unbounded = maximise(vec![1.0], vec![], vec![]);
        let result = solve(&unbounded);
        assert_eq!(result.status, SolveStatus::Unbounded);
        assert_eq!(result.history.len(), 1);
    }

    #[test]
    fn status_display_matches_the_verdict() {
        assert_eq!(SolveStatus::Optimal.to_string(), "optimal");
        assert_eq!(SolveStatus::Unbounded.to_string(), "unbounded");
        assert_eq!(
            SolveStatus::IterationLimit.to_string(),
            "iteration limit reached"
        );
    }
}
