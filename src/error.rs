// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types.
//!
//! Nothing in the template core is fatal. `RecoveredError` describes a
//! problem that was repaired in place (and logged); `TimelineError` is a
//! rejected timeline edit that left the state untouched.

use crate::models::content_type::ContentType;
use thiserror::Error;

/// A problem that was corrected locally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecoveredError {
    /// Frame index or content type name out of range.
    #[error("invalid index {index} for {content_type} ({frame_count} frames), using {fallback}")]
    InvalidIndex {
        content_type: ContentType,
        index: usize,
        frame_count: usize,
        fallback: usize,
    },

    /// Unknown content type name, replaced by a default.
    #[error("unknown content type '{name}', using {fallback}")]
    UnknownContentType { name: String, fallback: ContentType },

    /// Missing or garbled persisted value, replaced by a default.
    #[error("malformed {field} at {location}: {reason}")]
    MalformedData {
        location: String,
        field: String,
        reason: String,
    },

    /// Geometry that violated a size constraint, clamped to the minimum.
    #[error("element '{element}' size {width}x{height} below minimum, clamped")]
    ConstraintViolation {
        element: String,
        width: f64,
        height: f64,
    },
}

impl RecoveredError {
    pub fn malformed(location: impl Into<String>, field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedData {
            location: location.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Log the recovery at warning level and hand the value back.
    pub fn logged(self) -> Self {
        log::warn!("{}", self);
        self
    }
}

/// A timeline edit that was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimelineError {
    #[error("{content_type} already has the maximum of {max} frames")]
    FrameLimit { content_type: ContentType, max: usize },

    #[error("cannot remove the only frame")]
    LastFrame,

    #[error("frame {index} is out of range ({count} frames)")]
    OutOfRange { index: usize, count: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = RecoveredError::InvalidIndex {
            content_type: ContentType::Video,
            index: 7,
            frame_count: 3,
            fallback: 0,
        };
        assert_eq!(err.to_string(), "invalid index 7 for video (3 frames), using 0");

        let err = TimelineError::FrameLimit { content_type: ContentType::Video, max: 10 };
        assert_eq!(err.to_string(), "video already has the maximum of 10 frames");
    }
}
