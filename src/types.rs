//! Core data model for snipe analysis.
//!
//! This module defines the fundamental structures shared by every
//! component of the engine:
//! - [`Symbol`] - a declaration extracted from a parsed file
//! - [`Reference`] - a use-site of a name, with rule-relevant context
//! - [`Diagnostic`] - a finding reported back to a caller
//! - [`Language`] - the two supported source languages

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A supported source language. Symbols and references are always
/// tagged with one; cross-language lookups are forbidden (spec I3).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    C,
    Python,
}

impl Language {
    /// Detect a language from a file extension (without the leading dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "c" | "h" => Some(Language::C),
            "py" => Some(Language::Python),
            _ => None,
        }
    }
}

/// What kind of declaration a [`Symbol`] represents.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Variable,
    Function,
    Array,
    Struct,
    Extern,
    Import,
    Parameter,
}

/// Lexical scope a symbol was declared in.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Module,
    Function,
    Block,
}

/// A single function parameter, as declared.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub annotated_type: Option<String>,
    pub has_default: bool,
}

/// A declaration extracted by the symbol extractor. Identity is the
/// tuple `(language, file, line, name)`; a file's whole symbol list is
/// replaced on re-parse (spec §3).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Symbol {
    pub language: Language,
    pub file: String,
    pub line: usize,
    pub name: String,
    pub kind: SymbolKind,
    /// Language-native textual type, e.g. `"int"`, `"char[10]"`, `"list[int]"`.
    pub declared_type: Option<String>,
    pub array_size: Option<i64>,
    pub scope: Scope,
    /// Populated for `kind == Function`.
    pub params: Vec<Param>,
    pub varargs: bool,
    pub kwargs: bool,
    pub return_type: Option<String>,
    /// Populated for `kind == Struct`: member name -> declared type.
    pub struct_members: HashMap<String, String>,
    /// True for a Python `from X import *` symbol; sets the file-wide
    /// suppression flag for R-UNDEFINED.
    pub star_import: bool,
    pub references_in_file: usize,
}

impl Symbol {
    pub fn new(
        language: Language,
        file: impl Into<String>,
        line: usize,
        name: impl Into<String>,
        kind: SymbolKind,
    ) -> Self {
        Self {
            language,
            file: file.into(),
            line,
            name: name.into(),
            kind,
            declared_type: None,
            array_size: None,
            scope: Scope::Module,
            params: Vec::new(),
            varargs: false,
            kwargs: false,
            return_type: None,
            struct_members: HashMap::new(),
            star_import: false,
            references_in_file: 0,
        }
    }
}

/// How a name was used at a [`Reference`] site.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UseKind {
    Call,
    Read,
    Write,
    ArrayAccess,
    MemberAccess,
    FormatCall,
    ImportUse,
}

/// Context attached to a reference; which fields are meaningful
/// depends on `kind_of_use` (spec §3).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RefContext {
    /// Call sites: apparent type of each positional argument.
    pub arg_types: Vec<ApparentType>,
    pub arg_count: Option<usize>,
    /// Array/subscript accesses: the index, if a literal integer.
    pub index_literal: Option<i64>,
    /// Format calls: the literal format string and number of varargs passed.
    pub format_literal: Option<String>,
    pub format_arg_count: Option<usize>,
    /// Member accesses: the receiver's apparent type and member name.
    pub receiver_type: Option<String>,
    pub member_name: Option<String>,
    /// Write sites to typed targets: the RHS apparent type.
    pub rhs_type: Option<ApparentType>,
    /// Annotated target's own declared type (Python assigns/returns).
    pub target_type: Option<String>,
}

/// A use-site emitted by the extractor.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Reference {
    pub name: String,
    pub kind_of_use: UseKind,
    pub file: String,
    pub line: usize,
    pub context: RefContext,
}

/// A shallow, literal-and-declaration-driven guess at an expression's
/// type. `Unknown` is a valid value and suppresses downstream type
/// checks (spec §4.2, §9).
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApparentType {
    Int,
    Float,
    Str,
    Char,
    Bool,
    List,
    Tuple,
    Dict,
    Set,
    /// Raw textual type for cases the closed enum above doesn't name
    /// (e.g. a C struct pointer, `char*`, a user-defined class).
    Named(String),
    Unknown,
}

impl ApparentType {
    pub fn as_str(&self) -> &str {
        match self {
            ApparentType::Int => "int",
            ApparentType::Float => "float",
            ApparentType::Str => "str",
            ApparentType::Char => "char",
            ApparentType::Bool => "bool",
            ApparentType::List => "list",
            ApparentType::Tuple => "tuple",
            ApparentType::Dict => "dict",
            ApparentType::Set => "set",
            ApparentType::Named(s) => s.as_str(),
            ApparentType::Unknown => "unknown",
        }
    }
}

/// Diagnostic severity.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// Stable diagnostic code. Closed set per spec §6.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum DiagnosticCode {
    #[serde(rename = "SNIPE_TYPE_MISMATCH")]
    TypeMismatch,
    #[serde(rename = "SNIPE_ARRAY_BOUNDS")]
    ArrayBounds,
    #[serde(rename = "SNIPE_SIGNATURE_DRIFT")]
    SignatureDrift,
    #[serde(rename = "SNIPE_UNDEFINED_SYMBOL")]
    UndefinedSymbol,
    #[serde(rename = "SNIPE_SHADOWED_SYMBOL")]
    ShadowedSymbol,
    #[serde(rename = "SNIPE_FORMAT_STRING")]
    FormatString,
    #[serde(rename = "SNIPE_UNUSED_EXTERN")]
    UnusedExtern,
    #[serde(rename = "SNIPE_DEAD_IMPORT")]
    DeadImport,
    #[serde(rename = "SNIPE_UNSAFE_FUNCTION")]
    UnsafeFunction,
    #[serde(rename = "SNIPE_ARG_TYPE_MISMATCH")]
    ArgTypeMismatch,
    #[serde(rename = "SNIPE_STRUCT_ACCESS")]
    StructAccess,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::TypeMismatch => "SNIPE_TYPE_MISMATCH",
            DiagnosticCode::ArrayBounds => "SNIPE_ARRAY_BOUNDS",
            DiagnosticCode::SignatureDrift => "SNIPE_SIGNATURE_DRIFT",
            DiagnosticCode::UndefinedSymbol => "SNIPE_UNDEFINED_SYMBOL",
            DiagnosticCode::ShadowedSymbol => "SNIPE_SHADOWED_SYMBOL",
            DiagnosticCode::FormatString => "SNIPE_FORMAT_STRING",
            DiagnosticCode::UnusedExtern => "SNIPE_UNUSED_EXTERN",
            DiagnosticCode::DeadImport => "SNIPE_DEAD_IMPORT",
            DiagnosticCode::UnsafeFunction => "SNIPE_UNSAFE_FUNCTION",
            DiagnosticCode::ArgTypeMismatch => "SNIPE_ARG_TYPE_MISMATCH",
            DiagnosticCode::StructAccess => "SNIPE_STRUCT_ACCESS",
        }
    }
}

/// A single finding. Deduplicated on `(file, line, code, message)`
/// (spec I-dedup / P5).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    pub file: String,
    pub line: usize,
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
}

impl Diagnostic {
    pub fn dedup_key(&self) -> (String, usize, &'static str, String) {
        (self.file.clone(), self.line, self.code.as_str(), self.message.clone())
    }

    /// Remove duplicate diagnostics sharing `(file, line, code, message)`,
    /// preserving first-seen order.
    pub fn dedup(mut diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
        let mut seen = std::collections::HashSet::new();
        diagnostics.retain(|d| seen.insert(d.dedup_key()));
        diagnostics
    }
}

/// An unsaved (content, path) overlay passed alongside `analyze` (spec §6).
#[derive(Clone, Debug)]
pub struct OpenBuffer {
    pub path: String,
    pub content: String,
}
