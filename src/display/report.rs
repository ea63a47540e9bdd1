use anyhow::Result;
use itertools::Itertools;

use crate::{
    display::render::Render,
    facade::program_builder::ProgramBuilder,
    solver::{
        driver::{SolveResult, SolveStatus},
        problem::{LinearProgram, OptimisationDirection},
    },
};

const BANNER_WIDTH: usize = 60;

/// Statement of a tableau-engine program: objective, `<=` rows and the
/// implicit nonnegativity footer.
impl Render for LinearProgram {
    fn render(&self, f: &mut impl std::io::Write) -> Result<()> {
        banner(f, "PROBLEM")?;
        writeln!(f)?;
        writeln!(f, "{}:", direction_verb(self.direction()))?;
        writeln!(
            f,
            "  Z = {}",
            linear_combination(&self.objective, self.variable_names())
        )?;
        writeln!(f)?;
        writeln!(f, "Subject to:")?;
        for (row, &b) in self.constraints.iter().zip(self.rhs.iter()) {
            writeln!(
                f,
                "  {} <= {}",
                linear_combination(row, self.variable_names()),
                b
            )?;
        }
        writeln!(f, "  {} >= 0", self.variable_names().iter().join(", "))?;
        Ok(())
    }
}

/// Statement of a built program, equality rows and explicit bounds included.
impl Render for ProgramBuilder {
    fn render(&self, f: &mut impl std::io::Write) -> Result<()> {
        match &self.name {
            Some(name) => banner(f, &format!("PROBLEM: {}", name))?,
            None => banner(f, "PROBLEM")?,
        }
        let names = self.names_or_default();
        writeln!(f)?;
        writeln!(f, "{}:", direction_verb(self.direction))?;
        writeln!(f, "  Z = {}", linear_combination(&self.objective, &names))?;
        writeln!(f)?;
        writeln!(f, "Subject to:")?;
        for (row, &b) in self.a_ineq.iter().zip(self.b_ineq.iter()) {
            writeln!(f, "  {} <= {}", linear_combination(row, &names), b)?;
        }
        for (row, &b) in self.a_eq.iter().zip(self.b_eq.iter()) {
            writeln!(f, "  {} == {}", linear_combination(row, &names), b)?;
        }
        match &self.bounds {
            Some(bounds) => {
                for (name, &(min, max)) in names.iter().zip(bounds.iter()) {
                    if max.is_finite() {
                        writeln!(f, "  {} <= {} <= {}", min, name, max)?;
                    } else {
                        writeln!(f, "  {} >= {}", name, min)?;
                    }
                }
            }
            None => writeln!(f, "  {} >= 0", names.iter().join(", "))?,
        }
        Ok(())
    }
}

/// The whole session transcript: every visited tableau, then the final
/// verdict with the variable values split into decision and slack variables.
impl Render for SolveResult {
    fn render(&self, f: &mut impl std::io::Write) -> Result<()> {
        for state in &self.history {
            state.render(f)?;
            writeln!(f)?;
        }
        banner(f, "FINAL RESULT")?;
        writeln!(f)?;
        match self.status {
            SolveStatus::Optimal => writeln!(f, "✓ Optimal solution found!")?,
            SolveStatus::Unbounded => writeln!(f, "✗ The problem is unbounded.")?,
            SolveStatus::IterationLimit => writeln!(f, "✗ Iteration limit reached.")?,
        }
        if let Some(last) = self.history.last() {
            writeln!(f, "{}", last.message)?;
        }
        if let Some(objective) = self.objective_value {
            writeln!(f)?;
            writeln!(f, "Objective value: Z = {:.4}", objective)?;
        }
        if let Some(values) = &self.variable_values {
            if let Some(initial) = self.history.first() {
                writeln!(f)?;
                writeln!(f, "Decision variables:")?;
                render_values(f, &initial.nonbasic_names, values)?;
                writeln!(f)?;
                writeln!(f, "Slack variables:")?;
                render_values(f, &initial.basic_names, values)?;
            }
        }
        Ok(())
    }
}

fn render_values(
    f: &mut impl std::io::Write,
    roster: &[String],
    values: &std::collections::BTreeMap<String, f64>,
) -> Result<()> {
    for name in roster.iter().sorted() {
        if let Some(value) = values.get(name) {
            writeln!(f, "  • {} = {:.4}", name, value)?;
        }
    }
    Ok(())
}

fn banner(f: &mut impl std::io::Write, title: &str) -> Result<()> {
    writeln!(f, "{}", "=".repeat(BANNER_WIDTH))?;
    writeln!(f, "{}", title)?;
    writeln!(f, "{}", "=".repeat(BANNER_WIDTH))?;
    Ok(())
}

fn direction_verb(direction: OptimisationDirection) -> &'static str {
    match direction {
        OptimisationDirection::Maximise => "Maximise",
        OptimisationDirection::Minimise => "Minimise",
    }
}

/// `3 x1 + 2 x2 - 4 x3`, skipping zero coefficients.
fn linear_combination(coefficients: &[f64], names: &[String]) -> String {
    let mut out = String::new();
    for (coefficient, name) in coefficients.iter().zip(names.iter()) {
        if *coefficient == 0.0 {
            continue;
        }
        if out.is_empty() {
            if *coefficient < 0.0 {
                out.push('-');
            }
        } else if *coefficient < 0.0 {
            out.push_str(" - ");
        } else {
            out.push_str(" + ");
        }
        out.push_str(&format!("{} {}", coefficient.abs(), name));
    }
    if out.is_empty() {
        out.push('0');
    }
    out
}
