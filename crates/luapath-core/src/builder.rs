//! Materialize a [`Table`] tree from a [`TableSource`].
//!
//! The walk is depth-first over an explicit stack of frames, one per table
//! being filled, so the native stack does not grow with the nesting depth
//! of the source. Each frame holds the entries its table still has to
//! consume; when they run out the finished table is attached to its parent.
//!
//! Building is best effort. A problem with one entry (unsupported key or
//! value kind, a duplicate key, a node that cannot be enumerated, a table
//! nested deeper than [`BuildOptions::max_depth`]) skips that entry, records
//! a [`Diagnostic`], logs it, and the walk continues with the siblings.

use std::fmt;

use crate::key::Key;
use crate::source::{classify, ForeignEntry, TableSource};
use crate::table::Table;

/// Default for [`BuildOptions::max_depth`].
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Settings for [`TreeBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Maximum number of nested table levels below the root. Deeper tables
    /// are skipped.
    pub max_depth: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// A problem encountered while building, located by the path of the table
/// that was being filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Root name followed by the search path of the table, e.g. `cars#5.class`.
    pub location: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// Result of a build: the (possibly partial) table and what was skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Build {
    pub table: Table,
    pub diagnostics: Vec<Diagnostic>,
}

impl Build {
    /// True if every entry of the source made it into the table.
    pub fn is_complete(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Walks a [`TableSource`] and fills a [`Table`].
pub struct TreeBuilder<'s, S: TableSource> {
    source: &'s S,
    options: BuildOptions,
}

struct Frame<N> {
    table: Table,
    location: String,
    entries: std::vec::IntoIter<ForeignEntry<N>>,
}

impl<'s, S: TableSource> TreeBuilder<'s, S> {
    pub fn new(source: &'s S, options: BuildOptions) -> Self {
        Self { source, options }
    }

    /// Build the table named `root` from the source node `node`.
    pub fn build(&self, root: Key, node: &S::Node) -> Build {
        let mut diagnostics = Vec::new();
        let location = root.text().to_string();
        let entries = self.open(node, &location, &mut diagnostics);

        let mut stack = vec![Frame {
            table: Table::new(root.clone()),
            location,
            entries,
        }];
        let mut built = None;

        loop {
            let depth = stack.len();
            let Some(frame) = stack.last_mut() else {
                break;
            };

            let Some(entry) = frame.entries.next() else {
                if let Some(done) = stack.pop() {
                    match stack.last_mut() {
                        // Duplicates were rejected before the frame was pushed.
                        Some(parent) => {
                            parent.table.insert_child(done.table);
                        }
                        None => built = Some(done.table),
                    }
                }
                continue;
            };

            let (key, value) = match entry.and_then(|(key, value)| Ok((key.into_key()?, value))) {
                Ok(pair) => pair,
                Err(error) => {
                    record(&mut diagnostics, &frame.location, error.to_string());
                    continue;
                }
            };

            if frame.table.contains_key(&key) {
                record(
                    &mut diagnostics,
                    &frame.location,
                    format!("duplicate key '{key}' skipped"),
                );
                continue;
            }

            let (value, nested) = match classify(value) {
                Ok(classified) => classified,
                Err(error) => {
                    record(
                        &mut diagnostics,
                        &frame.location,
                        format!("entry '{key}' skipped: {error}"),
                    );
                    continue;
                }
            };

            let Some(child) = nested else {
                frame.table.insert_leaf(key, value);
                continue;
            };

            if depth > self.options.max_depth {
                record(
                    &mut diagnostics,
                    &frame.location,
                    format!(
                        "table '{key}' skipped: nesting deeper than {} levels",
                        self.options.max_depth
                    ),
                );
                continue;
            }

            let child_location = format!("{}{}", frame.location, key.path_segment());
            let entries = self.open(&child, &child_location, &mut diagnostics);
            stack.push(Frame {
                table: Table::new(key),
                location: child_location,
                entries,
            });
        }

        Build {
            table: built.unwrap_or_else(|| Table::new(root)),
            diagnostics,
        }
    }

    /// Enumerate a node, turning a failure into an empty table plus a
    /// diagnostic.
    fn open(
        &self,
        node: &S::Node,
        location: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> std::vec::IntoIter<ForeignEntry<S::Node>> {
        match self.source.entries(node) {
            Ok(entries) => entries.into_iter(),
            Err(error) => {
                record(
                    diagnostics,
                    location,
                    format!("table contents unreadable: {error}"),
                );
                Vec::new().into_iter()
            }
        }
    }
}

fn record(diagnostics: &mut Vec<Diagnostic>, location: &str, message: String) {
    tracing::warn!(location, "{message}");
    diagnostics.push(Diagnostic {
        location: location.to_string(),
        message,
    });
}
