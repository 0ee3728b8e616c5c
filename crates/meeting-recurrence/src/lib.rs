//! # meeting-recurrence
//!
//! Deterministic occurrence generation for recurring meetings.
//!
//! Given a [`RecurrenceConfig`] (pattern, interval, selected days or dates,
//! termination rule) and an injected reference "now", produce the ordered,
//! capped list of upcoming meeting start times a scheduling dialog previews.
//! Only the configuration is ever persisted; occurrences are re-derived on
//! demand.
//!
//! ## Modules
//!
//! - [`config`] — The recurrence configuration model, JSON wire form, validation
//! - [`engine`] — Configuration + reference instant → ascending occurrence list
//! - [`dst`] — Resolving wall-clock meeting times across DST transitions
//! - [`export`] — RFC 5545 `RRULE` rendering of a configuration
//! - [`summary`] — One-line English description of a configuration
//! - [`preview`] — Summary + occurrences bundled for display
//! - [`parse`] — Reference instant and timezone parsing
//! - [`error`] — Error types

pub mod config;
pub mod dst;
pub mod engine;
pub mod error;
pub mod export;
pub mod parse;
pub mod preview;
pub mod summary;

pub use config::{MonthlyPattern, PatternType, RecurrenceConfig, TerminationRule};
pub use engine::{generate_occurrences, SAFETY_CAP};
pub use error::RecurrenceError;
pub use export::to_rrule;
pub use parse::{parse_reference, parse_timezone};
pub use preview::{preview, Preview, PreviewOccurrence, EMPTY_PREVIEW_MESSAGE};
pub use summary::describe;
