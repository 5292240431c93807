// SPDX-FileCopyrightText: 2026 Swiftroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flattens message content into the plain text the classifiers look at.

use std::borrow::Cow;

use swiftroute_core::{ContentPart, MessageContent};

/// Text of a message body.
///
/// Plain strings are returned unchanged. Part lists keep only `text` parts,
/// joined with a single space in their original order; image and audio
/// parts contribute nothing.
pub fn extract_text(content: &MessageContent) -> Cow<'_, str> {
    match content {
        MessageContent::Text(text) => Cow::Borrowed(text),
        MessageContent::Parts(parts) => Cow::Owned(
            parts
                .iter()
                .filter_map(|part| match part {
                    ContentPart::Text(part) => Some(part.text.as_str()),
                    ContentPart::ImageUrl(_) | ContentPart::InputAudio(_) => None,
                })
                .collect::<Vec<_>>()
                .join(" "),
        ),
    }
}
