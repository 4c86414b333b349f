//! Adapts a tree-sitter function body into structural events.
//!
//! One recursive pass over the body reports blocks and branches to a
//! [`StructureVisitor`], feeds every leaf token to it as a Halstead operator
//! or operand, and collects the facts the calculator does not derive:
//! callee names, explicit returns and logical lines.

use std::collections::BTreeSet;

use tree_sitter::Node;

use crate::core::Language;
use crate::metrics::{BlockKind, BranchKind, StructureVisitor};

use super::queries;

/// Facts gathered while walking one body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodyFacts {
    /// Distinct names of called functions, last path segment only.
    pub callees: BTreeSet<String>,
    /// `return` statements outside nested closures.
    pub return_count: u32,
    pub logical_lines: u32,
}

/// Walk `body` and report its structure to `visitor`.
pub fn walk_body<V>(body: Node<'_>, lang: Language, source: &[u8], visitor: &mut V) -> BodyFacts
where
    V: StructureVisitor + ?Sized,
{
    let mut walker = Walker {
        lang,
        source,
        visitor,
        closure_depth: 0,
        facts: BodyFacts::default(),
    };
    walker.walk(body);
    walker.facts
}

struct Walker<'a, V: ?Sized> {
    lang: Language,
    source: &'a [u8],
    visitor: &'a mut V,
    closure_depth: u32,
    facts: BodyFacts,
}

impl<V: StructureVisitor + ?Sized> Walker<'_, V> {
    fn walk(&mut self, node: Node<'_>) {
        if node.is_extra() {
            return;
        }
        if is_atomic(&node) {
            self.token(&node);
            return;
        }

        let kind = node.kind();
        self.record_facts(&node);

        if queries::get_if_node_types(self.lang).contains(&kind) {
            self.walk_if(node, false);
            return;
        }

        if let Some(block) = self.block_kind(kind) {
            self.visitor.enter_block(block);
            if block == BlockKind::Closure {
                self.closure_depth += 1;
            }
            self.walk_children(node);
            if block == BlockKind::Closure {
                self.closure_depth -= 1;
            }
            self.visitor.exit_block();
            return;
        }

        if let Some(branch) = self.branch_kind(&node) {
            self.visitor.branch(branch);
        }
        self.walk_children(node);
    }

    fn walk_children(&mut self, node: Node<'_>) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.walk(child);
        }
    }

    /// An `if` keeps its block open across `else if` and `else` so that the
    /// bodies of every arm sit one nesting level deeper.
    fn walk_if(&mut self, node: Node<'_>, chained: bool) {
        if chained {
            self.visitor.branch(BranchKind::ElseIf);
        } else {
            self.visitor.enter_block(BlockKind::If);
        }

        let mut cursor = node.walk();
        if cursor.goto_first_child() {
            loop {
                let child = cursor.node();
                if cursor.field_name() == Some("alternative") {
                    self.walk_alternative(child);
                } else {
                    self.walk(child);
                }
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }

        if !chained {
            self.visitor.exit_block();
        }
    }

    fn walk_alternative(&mut self, alt: Node<'_>) {
        let kind = alt.kind();
        if queries::get_if_node_types(self.lang).contains(&kind) || kind == "elif_clause" {
            self.record_facts(&alt);
            self.walk_if(alt, true);
            return;
        }

        if kind == "else_clause" {
            if let Some(inner) = self.chained_if(&alt) {
                let mut cursor = alt.walk();
                for child in alt.children(&mut cursor) {
                    if child.id() == inner.id() {
                        self.record_facts(&child);
                        self.walk_if(child, true);
                    } else {
                        self.walk(child);
                    }
                }
                return;
            }
        }

        self.visitor.branch(BranchKind::Else);
        self.walk(alt);
    }

    /// The `if` wrapped by an `else` clause, as in `else if` for languages
    /// whose grammar nests it.
    fn chained_if<'tree>(&self, else_clause: &Node<'tree>) -> Option<Node<'tree>> {
        let mut cursor = else_clause.walk();
        let named: Vec<Node<'tree>> = else_clause
            .named_children(&mut cursor)
            .filter(|c| !c.is_extra())
            .collect();
        match named.as_slice() {
            [only] if queries::get_if_node_types(self.lang).contains(&only.kind()) => Some(*only),
            _ => None,
        }
    }

    fn block_kind(&self, kind: &str) -> Option<BlockKind> {
        let lang = self.lang;
        if queries::get_loop_node_types(lang).contains(&kind) {
            Some(BlockKind::Loop)
        } else if queries::get_switch_node_types(lang).contains(&kind) {
            Some(BlockKind::Switch)
        } else if queries::get_try_node_types(lang).contains(&kind) {
            Some(BlockKind::Try)
        } else if queries::get_with_node_types(lang).contains(&kind) {
            Some(BlockKind::With)
        } else if queries::get_closure_node_types(lang).contains(&kind) {
            Some(BlockKind::Closure)
        } else {
            None
        }
    }

    fn branch_kind(&self, node: &Node<'_>) -> Option<BranchKind> {
        let lang = self.lang;
        let kind = node.kind();
        if queries::get_case_node_types(lang).contains(&kind) {
            if self.is_default_case(node) {
                Some(BranchKind::DefaultCase)
            } else {
                Some(BranchKind::Case)
            }
        } else if queries::get_catch_node_types(lang).contains(&kind) {
            Some(BranchKind::Catch)
        } else if queries::get_ternary_node_types(lang).contains(&kind) {
            Some(BranchKind::Ternary)
        } else if queries::get_comprehension_filter_types(lang).contains(&kind) {
            Some(BranchKind::ComprehensionFilter)
        } else if queries::get_boolean_expression_types(lang).contains(&kind) {
            node.child_by_field_name("operator")
                .filter(|op| queries::is_logical_operator(op.kind()))
                .map(|_| BranchKind::BooleanOperator)
        } else {
            None
        }
    }

    fn is_default_case(&self, node: &Node<'_>) -> bool {
        match node.kind() {
            "default_case" | "switch_default" => true,
            "match_arm" => node
                .child_by_field_name("pattern")
                .and_then(|p| self.text(&p))
                .is_some_and(|t| t.trim() == "_"),
            "case_clause" => node
                .named_child(0)
                .and_then(|p| self.text(&p))
                .is_some_and(|t| t.trim() == "_"),
            "switch_block_statement_group" | "switch_rule" => node
                .named_child(0)
                .and_then(|label| self.text(&label))
                .is_some_and(|t| t.trim_start().starts_with("default")),
            _ => false,
        }
    }

    fn record_facts(&mut self, node: &Node<'_>) {
        let kind = node.kind();
        if queries::is_statement_kind(kind) {
            self.facts.logical_lines += 1;
        }
        if self.closure_depth == 0 && queries::get_return_node_types(self.lang).contains(&kind) {
            self.facts.return_count += 1;
        }
        if queries::get_call_node_types(self.lang).contains(&kind) {
            if let Some(name) = callee_name(node, self.lang, self.source) {
                self.facts.callees.insert(name);
            }
        }
    }

    fn token(&mut self, node: &Node<'_>) {
        if node.is_named() {
            let source = self.source;
            let keyword = queries::get_keyword_node_types(self.lang).contains(&node.kind());
            if let Ok(text) = node.utf8_text(source) {
                if text.is_empty() {
                    return;
                }
                if keyword {
                    self.visitor.operator(text);
                } else {
                    self.visitor.operand(text);
                }
            }
        } else {
            let kind = node.kind();
            if !kind.is_empty() && !queries::is_delimiter(kind) {
                self.visitor.operator(kind);
            }
        }
    }

    fn text<'s>(&'s self, node: &Node<'_>) -> Option<&'s str> {
        node.utf8_text(self.source).ok()
    }
}

/// Leaves, plus literals whose internals are not interesting.
fn is_atomic(node: &Node<'_>) -> bool {
    if node.child_count() == 0 {
        return true;
    }
    let kind = node.kind();
    node.is_named() && (kind.contains("string") || kind.ends_with("_literal"))
}

fn callee_name(node: &Node<'_>, lang: Language, source: &[u8]) -> Option<String> {
    if lang == Language::Java {
        return node
            .child_by_field_name("name")
            .and_then(|n| n.utf8_text(source).ok())
            .map(str::to_string);
    }
    simple_name(&node.child_by_field_name("function")?, source)
}

/// The last path segment of a name-like expression: `pkg.Foo` → `Foo`,
/// `self.load` → `load`, `a::b::c` → `c`.
pub(crate) fn simple_name(node: &Node<'_>, source: &[u8]) -> Option<String> {
    match node.kind() {
        "identifier" | "field_identifier" | "property_identifier" | "type_identifier" => {
            node.utf8_text(source).ok().map(str::to_string)
        }
        "selector_expression" | "field_expression" => {
            simple_name(&node.child_by_field_name("field")?, source)
        }
        "scoped_identifier" => simple_name(&node.child_by_field_name("name")?, source),
        "attribute" => simple_name(&node.child_by_field_name("attribute")?, source),
        "member_expression" => simple_name(&node.child_by_field_name("property")?, source),
        "generic_function" => simple_name(&node.child_by_field_name("function")?, source),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::metrics::{ComplexityCalculator, EventRecorder, StructuralEvent, StructuralMetrics};
    use crate::parser::{extract_functions, Parser};

    fn walk_first(code: &str, lang: Language) -> (StructuralMetrics, BodyFacts) {
        let parser = Parser::new();
        let result = parser
            .parse(code.as_bytes(), lang, Path::new("test"))
            .unwrap();
        let functions = extract_functions(&result);
        let function = functions.first().expect("no function found");
        let mut calculator = ComplexityCalculator::new();
        let facts = walk_body(function.body, lang, &result.source, &mut calculator);
        (calculator.finish(), facts)
    }

    fn events_first(code: &str, lang: Language) -> Vec<StructuralEvent> {
        let parser = Parser::new();
        let result = parser
            .parse(code.as_bytes(), lang, Path::new("test"))
            .unwrap();
        let functions = extract_functions(&result);
        let mut recorder = EventRecorder::default();
        walk_body(functions[0].body, lang, &result.source, &mut recorder);
        recorder
            .events
            .into_iter()
            .filter(|e| {
                !matches!(e, StructuralEvent::Operator(_) | StructuralEvent::Operand(_))
            })
            .collect()
    }

    fn operands_first(code: &str, lang: Language) -> BTreeSet<String> {
        let parser = Parser::new();
        let result = parser
            .parse(code.as_bytes(), lang, Path::new("test"))
            .unwrap();
        let functions = extract_functions(&result);
        let mut recorder = EventRecorder::default();
        walk_body(functions[0].body, lang, &result.source, &mut recorder);
        recorder
            .events
            .into_iter()
            .filter_map(|e| match e {
                StructuralEvent::Operand(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_rust_keywords_are_not_operands() {
        let code = r#"
impl Counter {
    fn bump(&self) -> i32 {
        let mut x: i32 = 1;
        x += self.g();
        x
    }
}
"#;
        let operands = operands_first(code, Language::Rust);
        let expected: BTreeSet<String> = ["x", "1", "g"].iter().map(|s| s.to_string()).collect();
        assert_eq!(operands, expected);
    }

    #[test]
    fn test_js_this_is_not_an_operand() {
        let code = "function read() { return this.x + 1; }";
        let operands = operands_first(code, Language::JavaScript);
        let expected: BTreeSet<String> = ["x", "1"].iter().map(|s| s.to_string()).collect();
        assert_eq!(operands, expected);
    }

    #[test]
    fn test_rust_simple_function() {
        let (m, facts) = walk_first("fn simple() { let x = 1; }", Language::Rust);
        assert_eq!(m.cyclomatic, 1);
        assert_eq!(m.cognitive, 0);
        assert_eq!(facts.logical_lines, 1);
    }

    #[test]
    fn test_rust_if_else() {
        let code = r#"
fn with_else(x: i32) -> i32 {
    if x > 0 {
        1
    } else {
        -1
    }
}
"#;
        let (m, _) = walk_first(code, Language::Rust);
        assert_eq!(m.cyclomatic, 2);
        // if +1, else +1 without nesting penalty
        assert_eq!(m.cognitive, 2);
        assert_eq!(m.nesting_depth, 1);
    }

    #[test]
    fn test_rust_nested_if_else() {
        let code = r#"
fn nested_if_else(x: i32, y: i32) -> i32 {
    if x > 0 {
        if y > 0 {
            1
        } else {
            2
        }
    } else {
        0
    }
}
"#;
        let (m, _) = walk_first(code, Language::Rust);
        // outer if 1, inner if 2, two elses 1 each
        assert_eq!(m.cognitive, 5);
        assert_eq!(m.nesting_depth, 2);
    }

    #[test]
    fn test_rust_three_nested_ifs() {
        let code = r#"
fn complex(a: bool, b: bool, c: bool) {
    if a {
        if b {
            if c {
                println!("all true");
            }
        }
    }
}
"#;
        let (m, _) = walk_first(code, Language::Rust);
        assert_eq!(m.cognitive, 6);
        assert_eq!(m.nesting_depth, 3);
        assert_eq!(m.cyclomatic, 4);
    }

    #[test]
    fn test_rust_else_if_chain_events() {
        let code = r#"
fn sign(x: i32) -> i32 {
    if x > 0 {
        1
    } else if x < 0 {
        -1
    } else {
        0
    }
}
"#;
        assert_eq!(
            events_first(code, Language::Rust),
            vec![
                StructuralEvent::Enter(BlockKind::If),
                StructuralEvent::Branch(BranchKind::ElseIf),
                StructuralEvent::Branch(BranchKind::Else),
                StructuralEvent::Exit,
            ]
        );
    }

    #[test]
    fn test_rust_match_arms() {
        let code = r#"
fn with_match(x: i32) -> &'static str {
    match x {
        0 => "zero",
        1 => "one",
        _ => "other",
    }
}
"#;
        let (m, _) = walk_first(code, Language::Rust);
        // two non-default arms
        assert_eq!(m.cyclomatic, 3);
        // match +1, arms +1 each
        assert_eq!(m.cognitive, 3);
    }

    #[test]
    fn test_rust_while_let() {
        let code = r#"
fn drain(v: &mut Vec<i32>) {
    while let Some(x) = v.pop() {
        println!("{}", x);
    }
}
"#;
        let (m, facts) = walk_first(code, Language::Rust);
        assert_eq!(m.cyclomatic, 2);
        assert!(facts.callees.contains("pop"));
    }

    #[test]
    fn test_rust_closure_scored_separately() {
        let code = r#"
fn outer(items: Vec<i32>) -> Vec<i32> {
    items.into_iter().filter(|x| {
        if *x > 0 {
            if *x < 10 {
                return true;
            }
        }
        false
    }).collect()
}
"#;
        let (m, facts) = walk_first(code, Language::Rust);
        assert_eq!(m.cognitive, 0);
        assert_eq!(m.cyclomatic, 3);
        // Returns inside the closure belong to the closure.
        assert_eq!(facts.return_count, 0);
        assert!(facts.callees.contains("filter"));
        assert!(facts.callees.contains("collect"));
    }

    #[test]
    fn test_go_if_else() {
        let code = r#"
package main

func withIfElse(x int) int {
    if x > 0 {
        return 1
    } else {
        return -1
    }
}
"#;
        let (m, facts) = walk_first(code, Language::Go);
        assert_eq!(m.cyclomatic, 2);
        assert_eq!(m.cognitive, 2);
        assert_eq!(facts.return_count, 2);
    }

    #[test]
    fn test_go_switch_cases() {
        let code = r#"
package main

func classify(x int) string {
    switch x {
    case 0:
        return "zero"
    case 1:
        return "one"
    default:
        return "other"
    }
}
"#;
        let (m, facts) = walk_first(code, Language::Go);
        // baseline 1 + two non-default cases
        assert_eq!(m.cyclomatic, 3);
        assert_eq!(m.cognitive, 3);
        assert_eq!(m.nesting_depth, 1);
        assert_eq!(facts.return_count, 3);
    }

    #[test]
    fn test_go_for_loop_and_calls() {
        let code = r#"
package main

func withLoop() {
    for i := 0; i < 10; i++ {
        fmt.Println(i)
        helper(i)
    }
}
"#;
        let (m, facts) = walk_first(code, Language::Go);
        assert_eq!(m.cyclomatic, 2);
        let callees: Vec<&str> = facts.callees.iter().map(String::as_str).collect();
        assert_eq!(callees, vec!["Println", "helper"]);
    }

    #[test]
    fn test_python_if_elif_else() {
        let code = r#"
def classify(x):
    if x > 0:
        return "positive"
    elif x < 0:
        return "negative"
    else:
        return "zero"
"#;
        let (m, facts) = walk_first(code, Language::Python);
        assert_eq!(m.cyclomatic, 3);
        assert_eq!(m.cognitive, 3);
        assert_eq!(m.nesting_depth, 1);
        assert_eq!(facts.return_count, 3);
    }

    #[test]
    fn test_python_try_except() {
        let code = r#"
def safe_parse(data):
    try:
        if data:
            return json.loads(data)
    except ValueError:
        return None
"#;
        let (m, facts) = walk_first(code, Language::Python);
        // try 1, nested if 2, except 1
        assert_eq!(m.cognitive, 4);
        assert_eq!(m.cyclomatic, 3);
        assert!(facts.callees.contains("loads"));
    }

    #[test]
    fn test_python_conditional_expression() {
        let code = "def pick(x):\n    return 1 if x > 0 else 0\n";
        let (m, _) = walk_first(code, Language::Python);
        assert_eq!(m.cyclomatic, 2);
        assert_eq!(m.cognitive, 1);
    }

    #[test]
    fn test_python_comprehension_filter_and_boolean() {
        let code = "def evens(xs):\n    return [x for x in xs if x % 2 == 0 and x > 0]\n";
        let (m, _) = walk_first(code, Language::Python);
        // filter + `and`
        assert_eq!(m.cyclomatic, 3);
    }

    #[test]
    fn test_python_with_does_not_add_depth() {
        let code = r#"
def read(path):
    with open(path) as f:
        if f:
            return f.read()
"#;
        let (m, _) = walk_first(code, Language::Python);
        assert_eq!(m.nesting_depth, 1);
        // with 1, if nested under with 2
        assert_eq!(m.cognitive, 3);
    }

    #[test]
    fn test_javascript_logical_operators() {
        let code = "function check(a, b, c) { if (a && b || c) { return true; } return false; }";
        let (m, facts) = walk_first(code, Language::JavaScript);
        assert_eq!(m.cognitive, 3);
        assert_eq!(m.cyclomatic, 4);
        assert_eq!(facts.return_count, 2);
    }

    #[test]
    fn test_javascript_ternary() {
        let code = "function tern(x) { return x > 0 ? 'pos' : 'neg'; }";
        let (m, _) = walk_first(code, Language::JavaScript);
        assert_eq!(m.cyclomatic, 2);
    }

    #[test]
    fn test_javascript_try_catch() {
        let code = r#"
function safeParse(json) {
    try {
        if (json) {
            return JSON.parse(json);
        }
    } catch (e) {
        return null;
    }
}
"#;
        let (m, facts) = walk_first(code, Language::JavaScript);
        assert_eq!(m.cognitive, 4);
        assert_eq!(m.nesting_depth, 2);
        assert!(facts.callees.contains("parse"));
    }

    #[test]
    fn test_typescript_switch_case() {
        let code = r#"
function classify(x: number): string {
    switch (x) {
        case 0: return "zero";
        case 1: return "one";
        default: return "other";
    }
}
"#;
        let (m, _) = walk_first(code, Language::TypeScript);
        assert_eq!(m.cyclomatic, 3);
    }

    #[test]
    fn test_java_switch_and_else_if() {
        let code = r#"
class Test {
    String classify(int x) {
        if (x > 100) {
            return "big";
        } else if (x > 10) {
            return "medium";
        }
        switch (x) {
            case 0: return "zero";
            case 1: return "one";
            default: return "other";
        }
    }
}
"#;
        let (m, facts) = walk_first(code, Language::Java);
        // if, else if, two cases
        assert_eq!(m.cyclomatic, 5);
        assert_eq!(facts.return_count, 5);
    }

    #[test]
    fn test_halstead_tokens_are_counted() {
        let (m, _) = walk_first("fn add(a: i32, b: i32) -> i32 { a + b }", Language::Rust);
        assert_eq!(m.halstead.distinct_operands, 2);
        assert_eq!(m.halstead.total_operands, 2);
        assert_eq!(m.halstead.distinct_operators, 1);
        assert!(m.halstead.volume > 0.0);
    }
}
