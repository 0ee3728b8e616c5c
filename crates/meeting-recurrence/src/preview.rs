//! Occurrence previews for the scheduling dialog.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::config::RecurrenceConfig;
use crate::engine::generate;
use crate::summary::describe;

/// Message a consumer shows when a preview has no occurrences.
pub const EMPTY_PREVIEW_MESSAGE: &str = "No meetings scheduled";

/// One previewed occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewOccurrence {
    /// The instant in UTC (RFC 3339).
    pub utc: String,
    /// The instant in the reference timezone (RFC 3339 with offset).
    pub local: String,
    /// Human-readable form, e.g. "Monday, January 1, 2024 at 9:00 AM UTC".
    pub label: String,
}

impl PreviewOccurrence {
    fn new(dt: &DateTime<Tz>) -> Self {
        Self {
            utc: dt.with_timezone(&Utc).to_rfc3339(),
            local: dt.to_rfc3339(),
            label: dt.format("%A, %B %-d, %Y at %-I:%M %p %Z").to_string(),
        }
    }
}

/// A recurrence summary together with its upcoming occurrences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preview {
    /// See [`describe`].
    pub summary: String,
    pub occurrences: Vec<PreviewOccurrence>,
    /// True when the safety cap hid further occurrences that the
    /// configuration's own termination rule would still produce.
    pub truncated: bool,
}

impl Preview {
    /// Whether there is nothing to list (render [`EMPTY_PREVIEW_MESSAGE`]).
    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }
}

/// Build the preview for a configuration as of `reference_now`.
pub fn preview(config: &RecurrenceConfig, reference_now: DateTime<Tz>) -> Preview {
    let generation = generate(config, reference_now);
    Preview {
        summary: describe(config),
        occurrences: generation
            .occurrences
            .iter()
            .map(PreviewOccurrence::new)
            .collect(),
        truncated: generation.truncated,
    }
}
