//! Cyclomatic complexity, cognitive complexity and nesting depth.
//!
//! # Overview
//!
//! - **Cyclomatic Complexity**: number of linearly independent paths through
//!   the function. Based on McCabe (1976) "A Complexity Measure", IEEE TSE
//!   SE-2(4). Starts at 1 and adds one per decision point.
//!
//! - **Cognitive Complexity**: how hard the code is to follow, with a
//!   penalty for nesting. Based on SonarSource's methodology.
//!   Reference: https://www.sonarsource.com/docs/CognitiveComplexity.pdf
//!
//! - **Nesting depth**: deepest stack of `if`, loop, `switch` and `try`
//!   blocks.
//!
//! Closures are scored on their own cognitive budget: their constructs start
//! from nesting 0 and their total is dropped when the closure ends. Their
//! decision points still count toward the enclosing function's cyclomatic
//! complexity.

use crate::model::HalsteadMetrics;

use super::events::{BlockKind, BranchKind, StructureVisitor};
use super::halstead::HalsteadCounter;

/// Structural results for one function body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StructuralMetrics {
    pub cyclomatic: u32,
    pub cognitive: u32,
    pub nesting_depth: u32,
    pub halstead: HalsteadMetrics,
}

#[derive(Debug, Default, Clone, Copy)]
struct CognitiveFrame {
    total: u32,
    nesting: u32,
}

/// Visitor that computes [`StructuralMetrics`] from an event stream.
#[derive(Debug, Clone)]
pub struct ComplexityCalculator {
    cyclomatic: u32,
    frames: Vec<CognitiveFrame>,
    open_blocks: Vec<BlockKind>,
    depth: u32,
    max_depth: u32,
    halstead: HalsteadCounter,
}

impl Default for ComplexityCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl ComplexityCalculator {
    pub fn new() -> Self {
        Self {
            cyclomatic: 1,
            frames: vec![CognitiveFrame::default()],
            open_blocks: Vec::new(),
            depth: 0,
            max_depth: 0,
            halstead: HalsteadCounter::new(),
        }
    }

    fn frame(&mut self) -> &mut CognitiveFrame {
        // The root frame is never popped.
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    /// Consume the calculator. Blocks still open are closed implicitly.
    pub fn finish(self) -> StructuralMetrics {
        StructuralMetrics {
            cyclomatic: self.cyclomatic,
            cognitive: self.frames[0].total,
            nesting_depth: self.max_depth,
            halstead: self.halstead.metrics(),
        }
    }
}

impl StructureVisitor for ComplexityCalculator {
    fn enter_block(&mut self, kind: BlockKind) {
        if matches!(kind, BlockKind::If | BlockKind::Loop) {
            self.cyclomatic += 1;
        }

        if kind.nests_cognitively() {
            let frame = self.frame();
            frame.total += 1 + frame.nesting;
            frame.nesting += 1;
        } else {
            self.frames.push(CognitiveFrame::default());
        }

        if kind.counts_toward_depth() {
            self.depth += 1;
            self.max_depth = self.max_depth.max(self.depth);
        }

        self.open_blocks.push(kind);
    }

    fn exit_block(&mut self) {
        let Some(kind) = self.open_blocks.pop() else {
            return;
        };

        if kind.nests_cognitively() {
            let frame = self.frame();
            frame.nesting = frame.nesting.saturating_sub(1);
        } else if self.frames.len() > 1 {
            self.frames.pop();
        }

        if kind.counts_toward_depth() {
            self.depth = self.depth.saturating_sub(1);
        }
    }

    fn branch(&mut self, kind: BranchKind) {
        match kind {
            BranchKind::ElseIf | BranchKind::Case | BranchKind::Catch | BranchKind::BooleanOperator => {
                self.cyclomatic += 1;
                self.frame().total += 1;
            }
            BranchKind::Else => {
                self.frame().total += 1;
            }
            BranchKind::Ternary | BranchKind::ComprehensionFilter => {
                self.cyclomatic += 1;
                let frame = self.frame();
                frame.total += 1 + frame.nesting;
            }
            BranchKind::DefaultCase => {}
        }
    }

    fn operator(&mut self, token: &str) {
        self.halstead.add_operator(token);
    }

    fn operand(&mut self, token: &str) {
        self.halstead.add_operand(token);
    }
}
