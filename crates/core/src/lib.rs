// Chunk: docs/chunks/editor_core - Editor core crate surface

//! zemacs-core: the in-memory editor core for ZEMACS.
//!
//! This crate is the state-management substrate the ZEMACS tool layer
//! edits and navigates code through. It has no wire, file, or CLI
//! surface of its own; the RPC dispatcher drives it entirely through
//! this in-process API.
//!
//! # Components
//!
//! - [`GapBuffer`] — the byte container. Localized edits cost only the
//!   work of moving the interior gap, and every registered marker is
//!   adjusted atomically with the edit that affects it.
//! - [`MarkerId`] / [`InsertionType`] — positional references that stay
//!   semantically stable across arbitrary edits elsewhere in the buffer.
//! - [`UndoManager`] — a linear, grouped, two-stack history of edit
//!   primitives that reconstructs prior buffer states exactly.
//! - [`SyntaxTable`] + [`scan_sexp`]/[`scan_sexp_n`]/[`skip_whitespace`]
//!   — a byte-class table and a pure scanner that advances past balanced
//!   s-expressions.
//!
//! # Example
//!
//! ```
//! use zemacs_core::{scan_sexp, GapBuffer, InsertionType, SyntaxTable, UndoManager};
//!
//! let mut buffer = GapBuffer::new();
//! let mut history = UndoManager::new();
//!
//! // One atomic edit: insert a form and record it.
//! history.begin_group();
//! buffer.insert(0, b"(hello world)");
//! history.record_insert(0, 13);
//! history.end_group();
//!
//! // A marker at the end of the form follows subsequent edits.
//! let end = buffer.create_marker(buffer.len(), InsertionType::After);
//!
//! // The scanner steps over the balanced form.
//! let table = SyntaxTable::standard();
//! assert_eq!(scan_sexp(&buffer, &table, 0), Ok(13));
//!
//! // Undo restores the prior bytes; the marker collapses with them.
//! assert!(history.undo(&mut buffer));
//! assert!(buffer.is_empty());
//! assert_eq!(buffer.marker_position(end), Some(0));
//! ```
//!
//! # Threading
//!
//! Everything here is single-writer. The types are `Send`, but a buffer
//! shared between threads needs external mutual exclusion; no operation
//! suspends or blocks.

mod gap_buffer;
mod marker;
mod scanner;
mod syntax;
mod undo;

pub use gap_buffer::GapBuffer;
pub use marker::{InsertionType, Marker, MarkerId};
pub use scanner::{scan_sexp, scan_sexp_n, skip_whitespace, ScanError};
pub use syntax::{SyntaxClass, SyntaxTable};
pub use undo::{UndoEntry, UndoGroup, UndoManager, DEFAULT_MAX_UNDO_STEPS};
