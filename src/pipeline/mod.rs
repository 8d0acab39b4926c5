//! Pipeline stages for document-to-report analysis.
//!
//! Each submodule implements exactly one transformation step, so each is
//! testable on its own and can be swapped without touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ reader ──▶ prompt ──▶ llm (team) ──▶ render
//! (URL/path) (text)    (8000 ch)  (agents)        (PDF)
//! ```
//!
//! 1. [`input`]  — canonicalise the user-supplied path or URL to a local file
//! 2. [`crate::reader`] — pick a parser by extension and flatten to text
//! 3. [`crate::prompts`] — wrap the first characters of the text in the task
//! 4. [`llm`]    — one chat call per agent; the only stage with network I/O
//!    besides URL downloads
//! 5. [`render`] — wrap, paginate and write the leader's report as returned;
//!    [`font`] holds the Helvetica metrics it measures with

pub mod font;
pub mod input;
pub mod llm;
pub mod render;
