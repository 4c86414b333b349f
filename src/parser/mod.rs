//! Tree-sitter based front-end.
//!
//! Parses a source file, finds its functions and type declarations, and
//! hands each function body to [`walker::walk_body`] which turns it into the
//! language-neutral structural event stream.

pub mod queries;
pub mod walker;

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use tree_sitter::{Language as TsLanguage, Node, Parser as TsParser, Tree};

use crate::core::{Error, Language, Result, SourceFile};
use crate::model::TypeMetrics;

pub use walker::{walk_body, BodyFacts};

/// Thread-safe parser pool for multi-language parsing.
pub struct Parser {
    /// Cached parsers per language.
    parsers: Mutex<HashMap<Language, TsParser>>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Create a new parser.
    pub fn new() -> Self {
        Self {
            parsers: Mutex::new(HashMap::new()),
        }
    }

    /// Parse source content.
    pub fn parse_source(&self, file: &SourceFile) -> Result<ParseResult> {
        self.parse(&file.content, file.language, &file.path)
    }

    /// Parse content with explicit language.
    pub fn parse(&self, content: &[u8], lang: Language, path: &Path) -> Result<ParseResult> {
        let tree = {
            let mut parsers = self.parsers.lock();
            let parser = match parsers.entry(lang) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    let mut parser = TsParser::new();
                    parser
                        .set_language(&get_tree_sitter_language(lang))
                        .map_err(|e| Error::Parse {
                            path: path.to_path_buf(),
                            message: e.to_string(),
                        })?;
                    entry.insert(parser)
                }
            };

            parser.parse(content, None).ok_or_else(|| Error::Parse {
                path: path.to_path_buf(),
                message: "Failed to parse file".to_string(),
            })?
        };

        Ok(ParseResult {
            tree: Arc::new(tree),
            source: content.to_vec(),
            language: lang,
            path: path.to_path_buf(),
        })
    }
}

/// Result of parsing a source file.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// The parsed syntax tree.
    pub tree: Arc<Tree>,
    /// Original source content.
    pub source: Vec<u8>,
    /// Detected language.
    pub language: Language,
    /// File path.
    pub path: std::path::PathBuf,
}

impl ParseResult {
    /// Get the root node of the tree.
    pub fn root_node(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Get text for a node.
    pub fn node_text(&self, node: &Node<'_>) -> &str {
        node.utf8_text(&self.source).unwrap_or("")
    }

    /// Whether the grammar had to recover from syntax errors.
    pub fn has_errors(&self) -> bool {
        self.root_node().has_error()
    }
}

/// Get tree-sitter language for a Language enum value.
pub fn get_tree_sitter_language(lang: Language) -> TsLanguage {
    let ts_lang = match lang {
        Language::Go => tree_sitter_go::LANGUAGE,
        Language::Rust => tree_sitter_rust::LANGUAGE,
        Language::Python => tree_sitter_python::LANGUAGE,
        Language::TypeScript | Language::Tsx => tree_sitter_typescript::LANGUAGE_TSX,
        Language::JavaScript | Language::Jsx => tree_sitter_javascript::LANGUAGE,
        Language::Java => tree_sitter_java::LANGUAGE,
    };
    ts_lang.into()
}

/// A function found in the syntax tree.
#[derive(Debug, Clone)]
pub struct FunctionNode<'tree> {
    pub name: String,
    /// Start line (1-indexed).
    pub start_line: u32,
    /// End line (1-indexed).
    pub end_line: u32,
    pub parameter_count: u32,
    pub body: Node<'tree>,
}

/// Extract every function with a body, nested ones included, in source
/// order.
pub fn extract_functions(result: &ParseResult) -> Vec<FunctionNode<'_>> {
    let mut functions = Vec::new();
    let function_types = queries::get_function_node_types(result.language);

    fn visit<'tree>(
        node: Node<'tree>,
        source: &[u8],
        lang: Language,
        function_types: &[&str],
        functions: &mut Vec<FunctionNode<'tree>>,
    ) {
        if function_types.contains(&node.kind()) {
            if let Some(func) = extract_function_info(&node, source, lang) {
                functions.push(func);
            }
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            visit(child, source, lang, function_types, functions);
        }
    }

    visit(
        result.root_node(),
        &result.source,
        result.language,
        function_types,
        &mut functions,
    );

    functions
}

fn extract_function_info<'tree>(
    node: &Node<'tree>,
    source: &[u8],
    lang: Language,
) -> Option<FunctionNode<'tree>> {
    let body = node.child_by_field_name("body")?;
    let name = extract_function_name(node, source)?;

    Some(FunctionNode {
        name,
        start_line: node.start_position().row as u32 + 1,
        end_line: node.end_position().row as u32 + 1,
        parameter_count: count_parameters(node, source, lang),
        body,
    })
}

/// The declared name, or for anonymous JS functions the name they are bound
/// to. Unbound anonymous functions are only scored as closures of their
/// enclosing function.
fn extract_function_name(node: &Node<'_>, source: &[u8]) -> Option<String> {
    if let Some(name) = node.child_by_field_name("name") {
        return name.utf8_text(source).ok().map(str::to_string);
    }

    if !matches!(
        node.kind(),
        "arrow_function" | "function_expression" | "function"
    ) {
        return None;
    }

    let parent = node.parent()?;
    let binding = match parent.kind() {
        "variable_declarator" | "public_field_definition" => parent.child_by_field_name("name"),
        "field_definition" => parent.child_by_field_name("property"),
        "pair" => parent.child_by_field_name("key"),
        "assignment_expression" => parent.child_by_field_name("left"),
        _ => None,
    }?;
    walker::simple_name(&binding, source)
}

fn count_parameters(node: &Node<'_>, source: &[u8], lang: Language) -> u32 {
    // `x => x + 1`
    if node.child_by_field_name("parameter").is_some() {
        return 1;
    }
    let Some(params) = node.child_by_field_name("parameters") else {
        return 0;
    };

    let mut count = 0;
    let mut cursor = params.walk();
    for (index, param) in params
        .named_children(&mut cursor)
        .filter(|p| !p.is_extra())
        .enumerate()
    {
        match param.kind() {
            "self_parameter"
            | "receiver_parameter"
            | "attribute_item"
            | "keyword_separator"
            | "positional_separator" => continue,
            // `a, b int` declares two parameters.
            "parameter_declaration" if lang == Language::Go => {
                let mut names = param.walk();
                let declared = param.children_by_field_name("name", &mut names).count();
                count += declared.max(1) as u32;
                continue;
            }
            _ => {}
        }

        if lang == Language::Python
            && index == 0
            && matches!(python_parameter_name(&param, source), Some("self" | "cls"))
        {
            continue;
        }
        count += 1;
    }
    count
}

fn python_parameter_name<'s>(param: &Node<'_>, source: &'s [u8]) -> Option<&'s str> {
    let name = if param.kind() == "identifier" {
        *param
    } else {
        param
            .child_by_field_name("name")
            .or_else(|| param.named_child(0))?
    };
    name.utf8_text(source).ok()
}

/// Extract class, struct, trait and interface declarations.
pub fn extract_types(result: &ParseResult) -> Vec<TypeMetrics> {
    let lang = result.language;
    let source = result.source.as_slice();
    let type_kinds = queries::get_type_node_types(lang);

    // Go and Rust attach methods outside the declaration.
    let detached = detached_method_counts(result);

    let mut types = Vec::new();
    let mut stack = vec![result.root_node()];
    while let Some(node) = stack.pop() {
        if type_kinds.contains(&node.kind()) {
            if let Some(metrics) = type_metrics(&node, source, lang, &detached) {
                types.push(metrics);
            }
        }
        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    types
}

fn type_metrics(
    node: &Node<'_>,
    source: &[u8],
    lang: Language,
    detached: &HashMap<String, u32>,
) -> Option<TypeMetrics> {
    let name = node.child_by_field_name("name")?.utf8_text(source).ok()?.to_string();

    let (kind, method_count) = match lang {
        Language::Go => {
            let kind = match node.child_by_field_name("type").map(|t| t.kind()) {
                Some("struct_type") => "struct",
                Some("interface_type") => "interface",
                _ => "type",
            };
            let count = if kind == "interface" {
                node.child_by_field_name("type")
                    .map(|t| count_children(&t, &["method_elem", "method_spec"]))
                    .unwrap_or(0)
            } else {
                detached.get(&name).copied().unwrap_or(0)
            };
            (kind, count)
        }
        Language::Rust => match node.kind() {
            "trait_item" => (
                "trait",
                node.child_by_field_name("body")
                    .map(|b| count_children(&b, &["function_item", "function_signature_item"]))
                    .unwrap_or(0),
            ),
            "enum_item" => ("enum", detached.get(&name).copied().unwrap_or(0)),
            _ => ("struct", detached.get(&name).copied().unwrap_or(0)),
        },
        Language::Python => {
            let count = node
                .child_by_field_name("body")
                .map(|body| {
                    let mut cursor = body.walk();
                    body.named_children(&mut cursor)
                        .filter(|c| match c.kind() {
                            "function_definition" => true,
                            "decorated_definition" => c
                                .child_by_field_name("definition")
                                .is_some_and(|d| d.kind() == "function_definition"),
                            _ => false,
                        })
                        .count() as u32
                })
                .unwrap_or(0);
            ("class", count)
        }
        Language::TypeScript | Language::JavaScript | Language::Tsx | Language::Jsx => {
            let kind = if node.kind() == "interface_declaration" {
                "interface"
            } else {
                "class"
            };
            let count = node
                .child_by_field_name("body")
                .map(|b| {
                    count_children(
                        &b,
                        &[
                            "method_definition",
                            "method_signature",
                            "abstract_method_signature",
                        ],
                    )
                })
                .unwrap_or(0);
            (kind, count)
        }
        Language::Java => {
            let kind = node.kind().trim_end_matches("_declaration");
            let count = node
                .child_by_field_name("body")
                .map(|b| {
                    let methods = ["method_declaration", "constructor_declaration"];
                    let mut count = count_children(&b, &methods);
                    // Enum methods live after the constants.
                    let mut cursor = b.walk();
                    for child in b.named_children(&mut cursor) {
                        if child.kind() == "enum_body_declarations" {
                            count += count_children(&child, &methods);
                        }
                    }
                    count
                })
                .unwrap_or(0);
            (kind, count)
        }
    };

    Some(TypeMetrics {
        name,
        kind: kind.to_string(),
        start_line: node.start_position().row as u32 + 1,
        end_line: node.end_position().row as u32 + 1,
        method_count,
    })
}

fn count_children(node: &Node<'_>, kinds: &[&str]) -> u32 {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| kinds.contains(&c.kind()))
        .count() as u32
}

/// Methods per receiver type (Go) or impl target (Rust).
fn detached_method_counts(result: &ParseResult) -> HashMap<String, u32> {
    let mut counts = HashMap::new();
    let source = result.source.as_slice();

    match result.language {
        Language::Go => {
            let root = result.root_node();
            let mut cursor = root.walk();
            for decl in root.named_children(&mut cursor) {
                if decl.kind() != "method_declaration" {
                    continue;
                }
                if let Some(receiver) = go_receiver_type(&decl, source) {
                    *counts.entry(receiver).or_insert(0) += 1;
                }
            }
        }
        Language::Rust => {
            let mut stack = vec![result.root_node()];
            while let Some(node) = stack.pop() {
                if node.kind() == "impl_item" {
                    let target = node
                        .child_by_field_name("type")
                        .and_then(|t| t.utf8_text(source).ok())
                        .map(base_type_name);
                    let methods = node
                        .child_by_field_name("body")
                        .map(|b| count_children(&b, &["function_item"]))
                        .unwrap_or(0);
                    if let Some(target) = target {
                        *counts.entry(target).or_insert(0) += methods;
                    }
                    continue;
                }
                let mut cursor = node.walk();
                stack.extend(node.named_children(&mut cursor));
            }
        }
        _ => {}
    }
    counts
}

fn go_receiver_type(decl: &Node<'_>, source: &[u8]) -> Option<String> {
    let receiver = decl.child_by_field_name("receiver")?;
    let mut cursor = receiver.walk();
    let param = receiver
        .named_children(&mut cursor)
        .find(|c| c.kind() == "parameter_declaration")?;
    let ty = param.child_by_field_name("type")?.utf8_text(source).ok()?;
    Some(base_type_name(ty))
}

/// `*Server` → `Server`, `Cache<K, V>` → `Cache`, `List[T]` → `List`.
fn base_type_name(text: &str) -> String {
    let text = text.trim().trim_start_matches('*').trim_start_matches('&');
    text.split(['<', '['])
        .next()
        .unwrap_or(text)
        .trim()
        .to_string()
}
