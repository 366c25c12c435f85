//! Cursor-relative context windowing. The editor sends the whole document
//! (plus any merged context files) with a sentinel at the caret; we split at
//! the sentinel and cut the two sides down to the character budget, always
//! discarding the text furthest from the cursor.

use super::types::CompletionError;

#[derive(Debug, Clone, PartialEq)]
pub struct WindowedContext {
    prefix_content: String,
    suffix_content: String,
}

impl WindowedContext {
    pub fn prefix_content(&self) -> &str {
        &self.prefix_content
    }

    pub fn suffix_content(&self) -> &str {
        &self.suffix_content
    }
}

pub struct ContextWindower {
    cursor_marker: String,
    context_chars: usize,
}

impl ContextWindower {
    pub fn new(cursor_marker: String, context_chars: usize) -> Self {
        Self {
            cursor_marker,
            context_chars,
        }
    }

    pub fn window(&self, text: &str) -> Result<WindowedContext, CompletionError> {
        // collapse the first double-space, then trim the whole input, before
        // we go looking for the marker
        let text = text.replacen("  ", "", 1);
        let text = text.trim();
        let marker_position = text
            .find(&self.cursor_marker)
            .ok_or(CompletionError::MissingCursorMarker)?;
        let prefix = &text[..marker_position];
        let suffix = &text[marker_position + self.cursor_marker.len()..];

        let prefix_chars = prefix.chars().count();
        let suffix_chars = suffix.chars().count();
        let total = prefix_chars + suffix_chars;
        if total <= self.context_chars {
            return Ok(WindowedContext {
                prefix_content: prefix.to_owned(),
                suffix_content: suffix.to_owned(),
            });
        }

        // 70% of the excess comes off the start of the prefix, the rest off
        // the end of the suffix, each cut clamped to what the side has
        let excess = total - self.context_chars;
        let prefix_cut = std::cmp::min(excess * 7 / 10, prefix_chars);
        let suffix_cut = std::cmp::min(excess - prefix_cut, suffix_chars);
        let prefix_content = prefix.chars().skip(prefix_cut).collect::<String>();
        let suffix_content = suffix
            .chars()
            .take(suffix_chars - suffix_cut)
            .collect::<String>();
        Ok(WindowedContext {
            prefix_content,
            suffix_content,
        })
    }
}
