//! The single "apply delta" operation shared by every streaming tier.

use super::records::Delta;

#[derive(Debug, Clone, Default)]
pub struct TextAccumulator {
    text: String,
    chars: usize,
}

impl TextAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a delta. Returns whether the text changed.
    ///
    /// A replacement shorter than the current text is a stale frame and is
    /// ignored, so the text never shrinks.
    pub fn apply(&mut self, delta: Delta) -> bool {
        match delta {
            Delta::Append(piece) => {
                if piece.is_empty() {
                    return false;
                }
                self.chars += piece.chars().count();
                self.text.push_str(&piece);
                true
            }
            Delta::Replace(full) => {
                let chars = full.chars().count();
                if chars < self.chars {
                    tracing::debug!(
                        target: "augury::streaming",
                        current = self.chars,
                        replacement = chars,
                        "ignoring shorter replacement"
                    );
                    return false;
                }
                if full == self.text {
                    return false;
                }
                self.text = full;
                self.chars = chars;
                true
            }
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in code points.
    pub fn len(&self) -> usize {
        self.chars
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_and_replace_share_one_operation() {
        let mut acc = TextAccumulator::new();
        assert!(acc.apply(Delta::Append("乾".into())));
        assert!(acc.apply(Delta::Append("坤".into())));
        assert_eq!(acc.text(), "乾坤");
        assert_eq!(acc.len(), 2);

        assert!(acc.apply(Delta::Replace("乾坤之道".into())));
        assert_eq!(acc.text(), "乾坤之道");
        assert!(!acc.apply(Delta::Append(String::new())));
    }

    #[test]
    fn shorter_or_identical_replacement_is_ignored() {
        let mut acc = TextAccumulator::new();
        acc.apply(Delta::Replace("abcdef".into()));
        assert!(!acc.apply(Delta::Replace("abc".into())));
        assert!(!acc.apply(Delta::Replace("abcdef".into())));
        assert_eq!(acc.into_text(), "abcdef");
    }
}
