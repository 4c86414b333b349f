//! Node kind tables for each supported grammar.
//!
//! The walker classifies nodes by looking their kind up here. Kinds are the
//! ones emitted by the tree-sitter grammars pinned in Cargo.toml.

use crate::core::Language;

/// Nodes reported as functions of their own.
pub fn get_function_node_types(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::Go => &["function_declaration", "method_declaration"],
        Language::Rust => &["function_item"],
        Language::Python => &["function_definition"],
        Language::TypeScript | Language::JavaScript | Language::Tsx | Language::Jsx => &[
            "function_declaration",
            "generator_function_declaration",
            "method_definition",
            // Only when bound to a name, see `extract_function_name`.
            "arrow_function",
            "function_expression",
            "function",
        ],
        Language::Java => &["method_declaration", "constructor_declaration"],
    }
}

/// Nodes that open a body scored on its own cognitive budget when they
/// appear inside another function.
pub fn get_closure_node_types(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::Go => &["func_literal", "function_declaration", "method_declaration"],
        Language::Rust => &["closure_expression", "function_item"],
        Language::Python => &["lambda", "function_definition"],
        Language::TypeScript | Language::JavaScript | Language::Tsx | Language::Jsx => &[
            "arrow_function",
            "function_expression",
            "function",
            "function_declaration",
            "generator_function",
            "generator_function_declaration",
            "method_definition",
        ],
        Language::Java => &["lambda_expression", "method_declaration"],
    }
}

pub fn get_if_node_types(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::Rust => &["if_expression"],
        _ => &["if_statement"],
    }
}

pub fn get_loop_node_types(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::Go => &["for_statement"],
        Language::Rust => &["for_expression", "while_expression", "loop_expression"],
        Language::Python => &["for_statement", "while_statement"],
        Language::TypeScript | Language::JavaScript | Language::Tsx | Language::Jsx => &[
            "for_statement",
            "for_in_statement",
            "while_statement",
            "do_statement",
        ],
        Language::Java => &[
            "for_statement",
            "enhanced_for_statement",
            "while_statement",
            "do_statement",
        ],
    }
}

pub fn get_switch_node_types(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::Go => &[
            "expression_switch_statement",
            "type_switch_statement",
            "select_statement",
        ],
        Language::Rust => &["match_expression"],
        Language::Python => &["match_statement"],
        Language::TypeScript | Language::JavaScript | Language::Tsx | Language::Jsx => {
            &["switch_statement"]
        }
        Language::Java => &["switch_expression", "switch_statement"],
    }
}

pub fn get_try_node_types(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::Go | Language::Rust => &[],
        Language::Python => &["try_statement"],
        Language::TypeScript | Language::JavaScript | Language::Tsx | Language::Jsx => {
            &["try_statement"]
        }
        Language::Java => &["try_statement", "try_with_resources_statement"],
    }
}

pub fn get_with_node_types(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::Python => &["with_statement"],
        _ => &[],
    }
}

/// Case and arm nodes. Whether one is the default is decided by
/// `is_default_case` in the walker.
pub fn get_case_node_types(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::Go => &[
            "expression_case",
            "type_case",
            "communication_case",
            "default_case",
        ],
        Language::Rust => &["match_arm"],
        Language::Python => &["case_clause"],
        Language::TypeScript | Language::JavaScript | Language::Tsx | Language::Jsx => {
            &["switch_case", "switch_default"]
        }
        Language::Java => &["switch_block_statement_group", "switch_rule"],
    }
}

pub fn get_catch_node_types(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::Go | Language::Rust => &[],
        Language::Python => &["except_clause"],
        Language::TypeScript
        | Language::JavaScript
        | Language::Tsx
        | Language::Jsx
        | Language::Java => &["catch_clause"],
    }
}

pub fn get_ternary_node_types(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::Go | Language::Rust => &[],
        Language::Python => &["conditional_expression"],
        Language::TypeScript
        | Language::JavaScript
        | Language::Tsx
        | Language::Jsx
        | Language::Java => &["ternary_expression"],
    }
}

/// The `if` filter of a comprehension.
pub fn get_comprehension_filter_types(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::Python => &["if_clause"],
        _ => &[],
    }
}

/// Node types for boolean/logical expressions.
///
/// Python uses `boolean_operator` for `and`/`or`; everything else shares
/// `binary_expression` with arithmetic, so the operator still has to be
/// checked with `is_logical_operator`.
pub fn get_boolean_expression_types(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::Python => &["boolean_operator"],
        _ => &["binary_expression"],
    }
}

pub fn get_call_node_types(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::Python => &["call"],
        Language::Java => &["method_invocation"],
        _ => &["call_expression"],
    }
}

pub fn get_return_node_types(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::Rust => &["return_expression"],
        _ => &["return_statement"],
    }
}

/// Class/struct-like declarations reported as types.
pub fn get_type_node_types(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::Go => &["type_spec"],
        Language::Rust => &["struct_item", "enum_item", "trait_item"],
        Language::Python => &["class_definition"],
        Language::TypeScript | Language::Tsx => &[
            "class_declaration",
            "abstract_class_declaration",
            "interface_declaration",
        ],
        Language::JavaScript | Language::Jsx => &["class_declaration"],
        Language::Java => &[
            "class_declaration",
            "interface_declaration",
            "enum_declaration",
            "record_declaration",
        ],
    }
}

/// Named leaves that are keywords. Halstead counts them as operators.
pub fn get_keyword_node_types(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::Rust => &["mutable_specifier", "self", "super", "crate", "primitive_type"],
        Language::TypeScript | Language::Tsx => &["this", "super", "predefined_type"],
        Language::JavaScript | Language::Jsx => &["this", "super"],
        Language::Java => &["this", "super", "void_type", "boolean_type"],
        Language::Go | Language::Python => &[],
    }
}

/// Check if an operator token is a logical connective.
pub fn is_logical_operator(token: &str) -> bool {
    matches!(token, "&&" | "||" | "and" | "or")
}

/// Statement-like nodes counted as logical lines.
pub fn is_statement_kind(kind: &str) -> bool {
    kind.ends_with("_statement") || kind.ends_with("_declaration")
}

/// Punctuation that is neither operator nor operand.
pub fn is_delimiter(token: &str) -> bool {
    matches!(token, "(" | ")" | "{" | "}" | "[" | "]" | "," | ";" | ":")
}
