//! # daymatrix
//!
//! Self-hosted day planner: describe your day in free-form text and get
//! back a prioritized task list arranged in an Eisenhower urgency/
//! importance matrix.
//!
//! ## Architecture
//!
//! ```text
//!   free-form input
//!        │
//!        ▼
//!   ┌──────────────┐    raw records    ┌──────────────────┐
//!   │ llm client   │ ────────────────► │ engine           │
//!   │ (classifier) │                   │ normalize → rank │
//!   └──────────────┘                   └──────────────────┘
//!                                              │
//!                                              ▼
//!                                      session task list
//!                                      (table / matrix / "do next")
//! ```
//!
//! The engine is the only nontrivial part: it coerces the provider's
//! best-effort output into a bounded domain, drops degenerate records,
//! assigns Eisenhower buckets, and derives a total order for
//! recommendations. Everything around it is I/O plumbing.
//!
//! ## Modules
//! - `engine`: normalization, classification, and ranking (pure)
//! - `llm`: external text-classification provider client
//! - `session`: per-session task list and reminder scheduler
//! - `api`: axum HTTP surface and static asset serving
//! - `config`: environment-driven configuration

pub mod api;
pub mod config;
pub mod engine;
pub mod llm;
pub mod session;

pub use config::Config;
pub use engine::{classify, rank_tasks, sanitize_tasks, PriorityBucket, Scale, Task};
