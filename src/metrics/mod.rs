//! Per-function metric calculation.
//!
//! The calculator consumes a [`StructureVisitor`] event stream for one
//! function body together with the [`FunctionFacts`] a front-end extracted,
//! and produces an immutable [`FunctionMetrics`] record.

pub mod complexity;
pub mod events;
pub mod halstead;
pub mod maintainability;

pub use complexity::{ComplexityCalculator, StructuralMetrics};
pub use events::{replay, BlockKind, BranchKind, EventRecorder, StructuralEvent, StructureVisitor};
pub use maintainability::maintainability_index;

use crate::model::{ChurnMetrics, FunctionMetrics};

/// Facts about one function that do not come from the structural stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionFacts {
    pub name: String,
    pub file_path: String,
    pub start_line: u32,
    pub end_line: u32,
    pub logical_lines: u32,
    pub parameter_count: u32,
    pub return_count: u32,
    pub fan_in: u32,
    pub fan_out: u32,
    pub churn: Option<ChurnMetrics>,
}

impl FunctionFacts {
    /// Physical length, inclusive of both boundary lines.
    pub fn length(&self) -> u32 {
        if self.end_line < self.start_line {
            return 0;
        }
        self.end_line - self.start_line + 1
    }
}

/// Combine facts with structural results into the final record.
///
/// `is_hotspot` starts false; it depends on every other function and is
/// set by the aggregator.
pub fn build_function_metrics(facts: FunctionFacts, structure: StructuralMetrics) -> FunctionMetrics {
    let length = facts.length();
    let maintainability_index =
        maintainability_index(structure.halstead.volume, structure.cyclomatic, length);

    FunctionMetrics {
        name: facts.name,
        file_path: facts.file_path,
        start_line: facts.start_line,
        end_line: facts.end_line,
        length,
        logical_lines: facts.logical_lines,
        parameter_count: facts.parameter_count,
        return_count: facts.return_count,
        cyclomatic_complexity: structure.cyclomatic,
        cognitive_complexity: structure.cognitive,
        nesting_depth: structure.nesting_depth,
        halstead: structure.halstead,
        maintainability_index,
        fan_in: facts.fan_in,
        fan_out: facts.fan_out,
        churn: facts.churn,
        is_hotspot: false,
    }
}

/// Run the calculator over recorded events and build the record.
pub fn analyze_function(facts: FunctionFacts, events: &[StructuralEvent]) -> FunctionMetrics {
    let mut calculator = ComplexityCalculator::new();
    replay(&mut calculator, events);
    build_function_metrics(facts, calculator.finish())
}
