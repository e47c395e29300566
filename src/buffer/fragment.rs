//! Fragment: one incremental piece of message text.

/// An immutable text delta tagged with its sequence index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    index: u64,
    text: String,
}

impl Fragment {
    /// Create a fragment from a sequence index and its text.
    pub fn new(index: u64, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    /// The sequence index of this fragment.
    #[inline]
    pub const fn index(&self) -> u64 {
        self.index
    }

    /// The text carried by this fragment.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consume the fragment, returning its parts.
    pub fn into_parts(self) -> (u64, String) {
        (self.index, self.text)
    }
}

impl<S: Into<String>> From<(u64, S)> for Fragment {
    fn from((index, text): (u64, S)) -> Self {
        Self::new(index, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_from_tuple() {
        let fragment = Fragment::from((4, "tok"));
        assert_eq!(fragment.index(), 4);
        assert_eq!(fragment.text(), "tok");
        assert_eq!(fragment.into_parts(), (4, "tok".to_string()));
    }
}
