//! Editable text buffer shared by the input fields.

/// One text edit: at char position `start`, `removed` characters were
/// deleted and `inserted` was typed or pasted in their place.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Edit {
    /// Char position the edit starts at.
    pub start: usize,
    /// Number of chars removed at `start`.
    pub removed: usize,
    /// Replacement text inserted at `start`.
    pub inserted: String,
}

impl Edit {
    /// An edit that only inserts text.
    pub fn insertion(start: usize, inserted: impl Into<String>) -> Self {
        Self {
            start,
            removed: 0,
            inserted: inserted.into(),
        }
    }

    /// An edit that only removes characters.
    pub fn deletion(start: usize, removed: usize) -> Self {
        Self {
            start,
            removed,
            inserted: String::new(),
        }
    }

    /// An edit that replaces `removed` characters with `inserted`.
    pub fn replacement(start: usize, removed: usize, inserted: impl Into<String>) -> Self {
        Self {
            start,
            removed,
            inserted: inserted.into(),
        }
    }
}

/// Text buffer with a cursor and an optional length cap.
///
/// Positions are char based. Fields filter what they commit, so committed
/// content is plain ASCII even when the incoming edit is not.
#[derive(Clone, Debug, Default)]
pub struct TextInput {
    value: String,
    cursor: usize,
    max_length: Option<usize>,
}

impl TextInput {
    /// Creates an empty buffer capped at `max_length` chars, or unbounded
    /// when `None`.
    pub fn new(max_length: Option<usize>) -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            max_length,
        }
    }

    /// Current content.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Current cursor position, in chars from the start.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The length cap, when one is set.
    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    /// Updates the length cap, truncating content only when it exceeds the
    /// new cap.
    pub fn set_max_length(&mut self, max_length: Option<usize>) {
        self.max_length = max_length;
        if let Some(max) = max_length {
            if self.value.chars().count() > max {
                self.value = self.value.chars().take(max).collect();
                self.cursor = self.cursor.min(max);
            }
        }
    }

    /// The content `edit` would produce, without committing it and without
    /// applying the length cap. Out of range positions are clamped.
    pub fn preview(&self, edit: &Edit) -> String {
        let mut chars: Vec<char> = self.value.chars().collect();
        let start = edit.start.min(chars.len());
        let end = start.saturating_add(edit.removed).min(chars.len());
        let tail = chars.split_off(end);
        chars.truncate(start);
        chars.extend(edit.inserted.chars());
        chars.extend(tail);
        chars.into_iter().collect()
    }

    /// Replaces the content, truncating to the cap and clamping the cursor
    /// into the new content.
    pub fn commit(&mut self, value: String, cursor: usize) {
        let mut value = value;
        if let Some(max) = self.max_length {
            if value.chars().count() > max {
                value = value.chars().take(max).collect();
            }
        }
        let length = value.chars().count();
        self.value = value;
        self.cursor = cursor.min(length);
    }
}
