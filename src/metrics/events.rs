//! Language-neutral structural events.
//!
//! Front-ends walk their parse tree and report what they see through
//! [`StructureVisitor`]. The calculator never looks at syntax, only at this
//! stream, so adding a language means writing an adapter and nothing else.

/// A construct that opens a body and is closed by a matching `exit_block`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    If,
    Loop,
    /// `switch`, `match`, `select`.
    Switch,
    Try,
    /// Python `with` and similar resource scopes.
    With,
    /// Lambda, closure, arrow function or nested function literal.
    Closure,
}

impl BlockKind {
    /// Whether the block increases the nesting-depth metric.
    pub fn counts_toward_depth(self) -> bool {
        matches!(self, Self::If | Self::Loop | Self::Switch | Self::Try)
    }

    /// Whether the block increments cognitive nesting for its body.
    pub fn nests_cognitively(self) -> bool {
        !matches!(self, Self::Closure)
    }
}

/// A flat marker that does not open a body of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchKind {
    ElseIf,
    Else,
    Catch,
    /// A non-default case or match arm.
    Case,
    DefaultCase,
    /// One occurrence of `&&`, `||`, `and`, `or`.
    BooleanOperator,
    Ternary,
    /// `if` filter inside a comprehension.
    ComprehensionFilter,
}

/// Receives the structural view of one function body.
pub trait StructureVisitor {
    fn enter_block(&mut self, kind: BlockKind);
    fn exit_block(&mut self);
    fn branch(&mut self, kind: BranchKind);
    fn operator(&mut self, token: &str);
    fn operand(&mut self, token: &str);
}

/// A recorded event, for building streams by hand or replaying them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralEvent {
    Enter(BlockKind),
    Exit,
    Branch(BranchKind),
    Operator(String),
    Operand(String),
}

/// Feed recorded events to a visitor in order.
pub fn replay<'a, V, I>(visitor: &mut V, events: I)
where
    V: StructureVisitor + ?Sized,
    I: IntoIterator<Item = &'a StructuralEvent>,
{
    for event in events {
        match event {
            StructuralEvent::Enter(kind) => visitor.enter_block(*kind),
            StructuralEvent::Exit => visitor.exit_block(),
            StructuralEvent::Branch(kind) => visitor.branch(*kind),
            StructuralEvent::Operator(token) => visitor.operator(token),
            StructuralEvent::Operand(token) => visitor.operand(token),
        }
    }
}

/// A visitor that just records, used by tests and by adapters that need
/// to buffer a body before deciding where it belongs.
#[derive(Debug, Default, Clone)]
pub struct EventRecorder {
    pub events: Vec<StructuralEvent>,
}

impl StructureVisitor for EventRecorder {
    fn enter_block(&mut self, kind: BlockKind) {
        self.events.push(StructuralEvent::Enter(kind));
    }

    fn exit_block(&mut self) {
        self.events.push(StructuralEvent::Exit);
    }

    fn branch(&mut self, kind: BranchKind) {
        self.events.push(StructuralEvent::Branch(kind));
    }

    fn operator(&mut self, token: &str) {
        self.events.push(StructuralEvent::Operator(token.to_string()));
    }

    fn operand(&mut self, token: &str) {
        self.events.push(StructuralEvent::Operand(token.to_string()));
    }
}
