//! Projucer (`.jucer`) project documents.
//!
//! Only a handful of attributes are touched:
//!
//! ```text
//! <JUCERPROJECT headerPath="...">
//!   <EXPORTFORMATS>
//!     <XCODE_MAC externalLibraries="...">
//!       <CONFIGURATIONS>
//!         <CONFIGURATION isDebug="1" libraryPath="..."/>
//!       </CONFIGURATIONS>
//!     </XCODE_MAC>
//!   </EXPORTFORMATS>
//! </JUCERPROJECT>
//! ```
//!
//! Each of these attributes holds a newline-separated list. Reading goes
//! through `roxmltree`; writing splices the raw source using the byte ranges
//! roxmltree reports, so everything else in the file keeps its exact bytes.

use std::fmt;
use std::ops::Range;
use std::path::{Path, PathBuf};

use roxmltree::Node;
use thiserror::Error;

use crate::core::library::TargetFamily;
use crate::core::Platform;

/// Header search path added to the project root.
pub const HEADER_PATH: &str = "../../external_libs/include";

/// Library search path for release configurations.
pub const RELEASE_LIB_PATH: &str = "../../external_libs/lib";

/// Library search path for debug configurations.
pub const DEBUG_LIB_PATH: &str = "../../external_libs/debug/lib";

const EXPORT_FORMATS: &str = "EXPORTFORMATS";
const CONFIGURATIONS: &str = "CONFIGURATIONS";

#[derive(Debug, Error)]
pub enum JucerError {
    #[error("failed to access project file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed project file: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("<{parent}> has no <{name}> element")]
    MissingElement { parent: String, name: &'static str },
}

/// An ordered, duplicate-free list stored as a newline-delimited attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchList {
    entries: Vec<String>,
}

impl SearchList {
    /// Parse a newline-delimited attribute value. Blank lines are dropped.
    pub fn parse(value: &str) -> Self {
        let mut list = SearchList::default();
        for line in value.lines() {
            if !line.trim().is_empty() {
                list.insert(line);
            }
        }
        list
    }

    /// Whether the list already holds this entry (surrounding whitespace ignored).
    pub fn contains(&self, entry: &str) -> bool {
        let entry = entry.trim();
        self.entries.iter().any(|e| e.trim() == entry)
    }

    /// Append an entry unless present. Returns whether it was added.
    pub fn insert(&mut self, entry: impl Into<String>) -> bool {
        let entry = entry.into();
        if entry.trim().is_empty() || self.contains(&entry) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize back to the attribute format.
    pub fn to_attribute_value(&self) -> String {
        self.entries.join("\n")
    }
}

impl fmt::Display for SearchList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.entries.join(", "))
    }
}

/// Entries to add to a project file.
#[derive(Debug, Clone)]
pub struct JucerPatch {
    /// Header search path for the project root
    pub header_path: String,
    /// Library search path for release configurations
    pub release_lib_path: String,
    /// Library search path for debug configurations
    pub debug_lib_path: String,
    /// Staged library file names (e.g., `libcairo.a`)
    pub library_files: Vec<String>,
}

impl JucerPatch {
    /// Patch pointing at the `external_libs` staging tree.
    pub fn for_staged(library_files: Vec<String>) -> Self {
        JucerPatch {
            header_path: HEADER_PATH.to_string(),
            release_lib_path: RELEASE_LIB_PATH.to_string(),
            debug_lib_path: DEBUG_LIB_PATH.to_string(),
            library_files,
        }
    }
}

/// What a patch changed.
#[derive(Debug, Clone, Default)]
pub struct PatchSummary {
    /// Number of list entries added across all attributes
    pub entries_added: usize,
    /// Export targets that matched the platform
    pub patched_targets: Vec<String>,
    /// Export targets left alone
    pub skipped_targets: Vec<String>,
}

impl PatchSummary {
    pub fn changed(&self) -> bool {
        self.entries_added > 0
    }
}

/// Owned view of one build configuration.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub name: Option<String>,
    pub is_debug: bool,
    pub library_path: SearchList,
}

/// Owned view of one export target.
#[derive(Debug, Clone)]
pub struct ExportTarget {
    pub name: String,
    pub family: TargetFamily,
    pub external_libraries: SearchList,
    pub configurations: Vec<Configuration>,
}

/// A replacement of `range` in the source with `text`.
#[derive(Debug)]
struct Edit {
    range: Range<usize>,
    text: String,
}

/// Handle for reading and patching a `.jucer` file.
#[derive(Debug, Clone)]
pub struct JucerDocument {
    source: String,
}

impl JucerDocument {
    /// Parse a document from its XML source.
    pub fn parse(source: impl Into<String>) -> Result<Self, JucerError> {
        let source = source.into();
        roxmltree::Document::parse(&source)?;
        Ok(JucerDocument { source })
    }

    /// Load a document from disk.
    pub fn from_file(path: &Path) -> Result<Self, JucerError> {
        let source = std::fs::read_to_string(path).map_err(|source| JucerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(source)
    }

    /// Write the document back to disk.
    pub fn save(&self, path: &Path) -> Result<(), JucerError> {
        std::fs::write(path, &self.source).map_err(|source| JucerError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The current raw XML source.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Header search paths on the project root.
    pub fn header_paths(&self) -> Result<SearchList, JucerError> {
        let doc = roxmltree::Document::parse(&self.source)?;
        Ok(SearchList::parse(
            doc.root_element().attribute("headerPath").unwrap_or(""),
        ))
    }

    /// All export targets in document order.
    pub fn export_targets(&self) -> Result<Vec<ExportTarget>, JucerError> {
        let doc = roxmltree::Document::parse(&self.source)?;
        let formats = required_child(doc.root_element(), EXPORT_FORMATS)?;

        let mut targets = Vec::new();
        for target in element_children(formats) {
            let configurations = match find_child(target, CONFIGURATIONS) {
                Some(configs) => element_children(configs)
                    .map(|config| Configuration {
                        name: config.attribute("name").map(String::from),
                        is_debug: is_debug(config),
                        library_path: SearchList::parse(
                            config.attribute("libraryPath").unwrap_or(""),
                        ),
                    })
                    .collect(),
                None => Vec::new(),
            };

            targets.push(ExportTarget {
                name: target.tag_name().name().to_string(),
                family: TargetFamily::from_tag(target.tag_name().name()),
                external_libraries: SearchList::parse(
                    target.attribute("externalLibraries").unwrap_or(""),
                ),
                configurations,
            });
        }

        Ok(targets)
    }

    /// Add the patch entries for the export targets matching `platform`.
    ///
    /// Entries already present are not repeated, and attributes that gain
    /// nothing are left byte-for-byte untouched.
    pub fn apply(
        &mut self,
        patch: &JucerPatch,
        platform: &Platform,
    ) -> Result<PatchSummary, JucerError> {
        let mut summary = PatchSummary::default();
        let mut edits = Vec::new();

        {
            let doc = roxmltree::Document::parse(&self.source)?;
            let root = doc.root_element();

            let header = [patch.header_path.as_str()];
            if let Some((edit, added)) = extend_attribute(&self.source, root, "headerPath", header)
            {
                summary.entries_added += added;
                edits.push(edit);
            }

            let formats = required_child(root, EXPORT_FORMATS)?;
            for target in element_children(formats) {
                let name = target.tag_name().name().to_string();
                let family = TargetFamily::from_tag(&name);

                if !family.matches(platform) {
                    summary.skipped_targets.push(name);
                    continue;
                }

                let link_names: Vec<String> = patch
                    .library_files
                    .iter()
                    .map(|file| family.link_name(file))
                    .collect();
                if let Some((edit, added)) =
                    extend_attribute(&self.source, target, "externalLibraries", link_names)
                {
                    summary.entries_added += added;
                    edits.push(edit);
                }

                let configs = required_child(target, CONFIGURATIONS)?;
                for config in element_children(configs) {
                    let dir = if is_debug(config) {
                        patch.debug_lib_path.as_str()
                    } else {
                        patch.release_lib_path.as_str()
                    };
                    if let Some((edit, added)) =
                        extend_attribute(&self.source, config, "libraryPath", [dir])
                    {
                        summary.entries_added += added;
                        edits.push(edit);
                    }
                }

                summary.patched_targets.push(name);
            }
        }

        // Later edits first so earlier ranges stay valid.
        edits.sort_by(|a, b| b.range.start.cmp(&a.range.start));
        for edit in edits {
            self.source.replace_range(edit.range, &edit.text);
        }

        Ok(summary)
    }
}

fn is_debug(config: Node) -> bool {
    config.attribute("isDebug") == Some("1")
}

fn element_children<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|n| n.is_element())
}

fn find_child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == tag)
}

fn required_child<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'static str,
) -> Result<Node<'a, 'input>, JucerError> {
    find_child(node, tag).ok_or_else(|| JucerError::MissingElement {
        parent: node.tag_name().name().to_string(),
        name: tag,
    })
}

/// Build the edit that adds `entries` to the list attribute `name`.
///
/// Returns `None` when every entry is already present.
fn extend_attribute<I, S>(
    source: &str,
    node: Node,
    name: &str,
    entries: I,
) -> Option<(Edit, usize)>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let existing = node
        .attributes()
        .find(|a| a.namespace().is_none() && a.name() == name);

    let mut list = SearchList::parse(existing.as_ref().map(|a| a.value()).unwrap_or(""));
    let added = entries
        .into_iter()
        .map(|entry| list.insert(entry))
        .filter(|inserted| *inserted)
        .count();
    if added == 0 {
        return None;
    }

    let serialized = format!("{}=\"{}\"", name, escape_attribute(&list.to_attribute_value()));
    let edit = match existing {
        Some(attr) => Edit {
            range: attr.range(),
            text: serialized,
        },
        None => {
            let at = attribute_insert_point(source, node);
            Edit {
                range: at..at,
                text: format!(" {}", serialized),
            }
        }
    };

    Some((edit, added))
}

/// Byte offset where a new attribute goes: after the last attribute, or
/// right after the tag name.
fn attribute_insert_point(source: &str, node: Node) -> usize {
    if let Some(last) = node.attributes().last() {
        return last.range().end;
    }

    let name_start = node.range().start + 1;
    let name_len = source[name_start..]
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .unwrap_or(0);
    name_start + name_len
}

fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            c => out.push(c),
        }
    }
    out
}
