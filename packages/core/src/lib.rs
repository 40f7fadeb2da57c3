//! Result normalization and multi-format serialization for the Mutalyzer
//! linked-data front end.
//!
//! A call to the remote sequence-annotation service returns a nested,
//! loosely typed record. This crate turns that record into exactly one
//! representation chosen by content negotiation: the flattened JSON, a
//! template-rendered Turtle document, or (for `getTranscriptsAndInfo`) a
//! Turtle graph built in code.
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`normalize`] | Singleton-wrapper unwrapping and embedded error detection |
//! | [`negotiate`] | `Accept` parsing and representation selection |
//! | [`template`] | Precompiled Turtle templates |
//! | [`graph`] | Transcript scan and triple emission |
//! | [`turtle`] | Turtle serialization of triples |
//! | [`operation`] | Operation table and the per-call [`Pipeline`] |
//!
//! # Quick start
//!
//! ```rust,ignore
//! use mutalyzer_ld::{AcceptList, Operation, Pipeline, RequestParams};
//!
//! let pipeline = Pipeline::builtin()?;
//! let params: RequestParams = [("genomicReference", "NC_000011.9")].into_iter().collect();
//! let output = pipeline.respond(
//!     Operation::GetTranscriptsAndInfo,
//!     &params,
//!     &AcceptList::from_header(Some("text/turtle")),
//!     raw_result,
//! )?;
//! ```

pub mod error;
pub mod graph;
pub mod negotiate;
pub mod normalize;
pub mod operation;
pub mod template;
pub mod turtle;

pub use error::PipelineError;
pub use graph::{build_graph, TranscriptEntry, TranscriptScan};
pub use negotiate::{select, AcceptList, Representation, RepresentationChoice};
pub use normalize::{normalize, ErrorMessage, NormalizedResult, SingletonWrapper};
pub use operation::{Operation, Output, Param, Pipeline, RequestParams};
pub use template::TemplateRegistry;
pub use turtle::{write_turtle, Term, Triple};
