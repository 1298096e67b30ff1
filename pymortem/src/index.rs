//! The symbol index: every definition candidate seen during traversal plus
//! the global set of names observed as used anywhere in the project.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize, Serializer};
use smallvec::SmallVec;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::sync::Arc;

/// Serialize `Arc<PathBuf>` as a plain `PathBuf` for JSON output
fn serialize_arc_path<S>(path: &Arc<PathBuf>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    path.as_ref().serialize(serializer)
}

/// Serialize `SmallVec<[String; 2]>` as a plain `Vec<String>` for JSON output
fn serialize_smallvec_string<S>(
    vec: &SmallVec<[String; 2]>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    vec.as_slice().serialize(serializer)
}

/// The closed set of finding categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DefinitionKind {
    /// An attribute written but never read.
    UnusedAttribute,
    /// A decorated class never referenced by name.
    UnusedClass,
    /// A function or method never referenced by name.
    UnusedFunction,
    /// A bound name never read.
    UnusedVariable,
    /// An imported name never referenced.
    UnusedImport,
    /// A file with no non-whitespace content.
    EmptyFile,
}

impl DefinitionKind {
    /// The diagnostic tag rendered in report lines.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnusedAttribute => "UNUSED_ATTRIBUTE",
            Self::UnusedClass => "UNUSED_CLASS",
            Self::UnusedFunction => "UNUSED_FUNCTION",
            Self::UnusedVariable => "UNUSED_VARIABLE",
            Self::UnusedImport => "UNUSED_IMPORT",
            Self::EmptyFile => "EMPTY_FILE",
        }
    }
}

/// One candidate finding: a symbol that may turn out to be unused.
///
/// Besides the identity fields (file, name, kind, position), a definition
/// carries the projections of its ancestry path that suppression rules
/// consume: the enclosing class's declared bases, the names of call-shaped
/// decorators on the defining node, and the root identifier of the
/// attribute chain when the defining node is an attribute access.
#[derive(Debug, Clone, Serialize)]
pub struct Definition {
    /// The file the definition originates from.
    /// Uses `Arc` to avoid cloning for every definition in the same file.
    #[serde(serialize_with = "serialize_arc_path")]
    pub file: Arc<PathBuf>,
    /// The symbol's bare identifier, as it would appear when referenced.
    pub name: String,
    /// The finding category.
    pub kind: DefinitionKind,
    /// 1-indexed line of the defining node; 1 when there is no node.
    pub line: usize,
    /// 1-indexed byte column of the defining node; 1 when there is no node.
    pub col: usize,
    /// Bare identifiers of the enclosing class's declared bases, empty when
    /// the definition is not directly inside a class body.
    #[serde(serialize_with = "serialize_smallvec_string")]
    pub container_bases: SmallVec<[String; 2]>,
    /// Names of call-shaped decorators on the defining node.
    #[serde(serialize_with = "serialize_smallvec_string")]
    pub call_decorators: SmallVec<[String; 2]>,
    /// Root identifier of the attribute chain when the defining node is an
    /// attribute access (empty string for a non-name root).
    pub attr_root: Option<String>,
}

impl Definition {
    /// A definition with no ancestry context, pinned to position 1:1.
    #[must_use]
    pub fn new(file: Arc<PathBuf>, name: String, kind: DefinitionKind) -> Self {
        Self {
            file,
            name,
            kind,
            line: 1,
            col: 1,
            container_bases: SmallVec::new(),
            call_decorators: SmallVec::new(),
            attr_root: None,
        }
    }

    /// The single definition recorded for a file with no content, named
    /// after the file's base name.
    #[must_use]
    pub fn empty_file(file: Arc<PathBuf>, name: String) -> Self {
        Self::new(file, name, DefinitionKind::EmptyFile)
    }
}

// Two definitions with the same name are the same symbol as far as the
// index is concerned: the flat-namespace approximation.
impl PartialEq for Definition {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Definition {}

impl Hash for Definition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// The shared mutable store accumulated during traversal.
///
/// Both collections only grow during a run; computing the unused set at the
/// end is a pure read. Duplicate definitions by name are kept as distinct
/// entries so each physical occurrence can be reported or suppressed on its
/// own.
#[derive(Debug, Default)]
pub struct SymbolIndex {
    /// Every definition seen, in traversal order.
    pub definitions: Vec<Definition>,
    /// Every name observed as used anywhere in the project. No per-file or
    /// per-scope partitioning.
    pub used_names: FxHashSet<String>,
}

impl SymbolIndex {
    /// Records a definition candidate.
    pub fn define(&mut self, definition: Definition) {
        self.definitions.push(definition);
    }

    /// Records that `name` was referenced somewhere.
    pub fn mark_used<S: Into<String>>(&mut self, name: S) {
        self.used_names.insert(name.into());
    }

    /// Whether `name` was observed as used.
    #[must_use]
    pub fn is_used(&self, name: &str) -> bool {
        self.used_names.contains(name)
    }

    /// Merges a per-file index into this one, preserving insertion order.
    pub fn absorb(&mut self, other: SymbolIndex) {
        self.definitions.extend(other.definitions);
        self.used_names.extend(other.used_names);
    }
}
