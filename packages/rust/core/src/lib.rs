//! Document generation core for reqdraft.
//!
//! This crate turns classified, segmented input into BRDs, converts BRDs
//! into FRDs, lays out wireframes, and wraps all three behind an optional
//! AI orchestrator with a deterministic fallback.

pub mod assembler;
pub mod brd_parser;
pub mod enrichment;
pub mod extract;
pub mod frd;
pub mod frd_parser;
pub mod pipeline;
pub mod priority;
pub mod scope;
pub mod wireframe;

pub use assembler::{Document, DocumentKind, OutputMeta, fingerprint, write_output};
pub use enrichment::{CompletionProvider, OpenAiCompatProvider, Orchestrator, Prompt};
pub use frd_parser::parse_user_stories;
pub use pipeline::{
    BrdRequest, Generated, GenerationSource, ProgressReporter, SilentProgress, generate_brd,
    generate_frd_from_brd, generate_wireframes, generate_wireframes_from_frd, render_brd, render_frd,
    render_wireframes, render_wireframes_from_frd,
};
pub use priority::{Moscow, Prioritized, prioritize};
