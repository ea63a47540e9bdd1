use anyhow::Result;
use itertools::Itertools;

use crate::{display::render::Render, solver::tableau::TableauState};

const LABEL_WIDTH: usize = 8;
const CELL_WIDTH: usize = 12;

/// Renders one snapshot as a fixed-width table: one column per nonbasic
/// variable, the constant column `C`, and the ratio column `R` when the
/// snapshot carries one. The pivot cell and the entering reduced cost are
/// bracketed.
///
/// ```
/// use tracelp::display::render::Render;
/// use tracelp::solver::driver::solve;
/// use tracelp::solver::problem::{LinearProgram, OptimisationDirection};
///
/// let program = LinearProgram::new(
///     OptimisationDirection::Maximise,
///     vec![1200.0, 1000.0],
///     vec![vec![3.0, 4.0], vec![6.0, 3.0]],
///     vec![160.0, 180.0],
/// ).unwrap();
/// let result = solve(&program);
/// let text = result.history[0].render_to_string().unwrap();
/// assert!(text.contains("INITIAL TABLEAU"));
/// assert!(text.contains("[6.00]"));
/// ```
impl Render for TableauState {
    fn render(&self, f: &mut impl std::io::Write) -> Result<()> {
        let has_ratios = self.ratios.is_some();
        let columns = self.num_variables() + 1 + usize::from(has_ratios);
        let width = LABEL_WIDTH + columns * (CELL_WIDTH + 3);

        if self.iteration == 0 {
            writeln!(f, "INITIAL TABLEAU")?;
        } else {
            writeln!(f, "TABLEAU {}", self.iteration)?;
        }
        writeln!(f, "{}", "=".repeat(width))?;

        let mut header = vec![format!("{:>LABEL_WIDTH$}", "B\\N")];
        for name in &self.nonbasic_names {
            header.push(format!("{:>CELL_WIDTH$}", name));
        }
        header.push(format!("{:>CELL_WIDTH$}", "C"));
        if has_ratios {
            header.push(format!("{:>CELL_WIDTH$}", "R"));
        }
        writeln!(f, "{}", header.iter().join(" | "))?;
        writeln!(f, "{}", "-".repeat(width))?;

        for (i, basic) in self.basic_names.iter().enumerate() {
            let mut cells = vec![format!("{:>LABEL_WIDTH$}", basic)];
            for j in 0..self.num_variables() {
                cells.push(value_cell(
                    self.matrix[[i, j]],
                    self.entering == Some(j) && self.leaving == Some(i),
                ));
            }
            cells.push(value_cell(self.rhs[i], false));
            if let Some(ratios) = &self.ratios {
                cells.push(ratio_cell(ratios[i]));
            }
            writeln!(f, "{}", cells.iter().join(" | "))?;
        }
        writeln!(f, "{}", "-".repeat(width))?;

        let mut cells = vec![format!("{:>LABEL_WIDTH$}", "delta")];
        for j in 0..self.num_variables() {
            cells.push(value_cell(self.delta[j], self.entering == Some(j)));
        }
        cells.push(value_cell(self.objective_offset, false));
        writeln!(f, "{}", cells.iter().join(" | "))?;

        writeln!(f)?;
        writeln!(f, "{}", self.message)?;
        Ok(())
    }
}

fn value_cell(value: f64, highlighted: bool) -> String {
    if highlighted {
        format!("{:>CELL_WIDTH$}", format!("[{:.2}]", value))
    } else {
        format!("{:>CELL_WIDTH$}", format!("{:.2}", value))
    }
}

/// Excluded rows show a dash instead of an infinite ratio.
fn ratio_cell(ratio: f64) -> String {
    if ratio.is_finite() {
        format!("{:>CELL_WIDTH$}", format!("{:.2}", ratio))
    } else {
        format!("{:>CELL_WIDTH$}", "-")
    }
}
