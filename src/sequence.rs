use std::ops::Range;

/// Per-position result of comparing typed input with the expected text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mark {
    #[default]
    Unmarked,
    Correct,
    Incorrect,
}

/// The characters the user is expected to type: words separated by single
/// spaces. Only ever grows while a session runs.
#[derive(Clone, Debug, Default)]
pub struct ExpectedSequence {
    chars: Vec<char>,
    marks: Vec<Mark>,
    words: Vec<Range<usize>>,
}

impl ExpectedSequence {
    pub fn from_words<S: AsRef<str>>(words: &[S]) -> Self {
        let mut sequence = Self::default();
        sequence.append_words(words);
        sequence
    }

    /// Append words at the tail, returning how many characters were added.
    /// A separating space is inserted before the first new word when the
    /// sequence already holds text.
    pub fn append_words<S: AsRef<str>>(&mut self, words: &[S]) -> usize {
        let before = self.chars.len();

        for word in words {
            let word = word.as_ref();
            if word.is_empty() {
                continue;
            }
            if !self.chars.is_empty() {
                self.push(' ');
            }
            let start = self.chars.len();
            word.chars().for_each(|c| self.push(c));
            self.words.push(start..self.chars.len());
        }

        self.chars.len() - before
    }

    fn push(&mut self, c: char) {
        self.chars.push(c);
        self.marks.push(Mark::Unmarked);
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn expected(&self, idx: usize) -> Option<char> {
        self.chars.get(idx).copied()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn mark(&self, idx: usize) -> Mark {
        self.marks.get(idx).copied().unwrap_or_default()
    }

    pub(crate) fn set_mark(&mut self, idx: usize, mark: Mark) {
        if let Some(slot) = self.marks.get_mut(idx) {
            *slot = mark;
        }
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Character span of the word containing `idx`. Separating spaces belong to
    /// no word.
    pub fn word_at(&self, idx: usize) -> Option<Range<usize>> {
        let pos = self.words.partition_point(|w| w.end <= idx);
        self.words
            .get(pos)
            .filter(|w| w.contains(&idx))
            .cloned()
    }
}
