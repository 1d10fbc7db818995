use std::ops::Range;
use std::time::{Duration, Instant};

use unicode_width::UnicodeWidthChar;

use crate::sequence::ExpectedSequence;
use crate::typing_test::{Change, SessionObserver};

pub const SCROLL_DEBOUNCE: Duration = Duration::from_millis(16);
pub const VISIBLE_LINES: usize = 3;

fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// Split the text into display lines no wider than `width`, breaking between
/// words. Spaces stay at the end of the line they follow; a word wider than a
/// whole line is split wherever it overflows.
pub fn wrap_lines(chars: &[char], width: usize) -> Vec<Range<usize>> {
    let width = width.max(1);
    let mut lines = vec![];
    let mut start = 0;
    let mut used = 0;
    let mut i = 0;

    while i < chars.len() {
        let word_end = chars[i..]
            .iter()
            .position(|c| *c == ' ')
            .map_or(chars.len(), |p| i + p);
        let word_width: usize = chars[i..word_end].iter().copied().map(char_width).sum();

        if used > 0 && used + word_width > width {
            lines.push(start..i);
            start = i;
            used = 0;
        }

        for (j, c) in chars.iter().enumerate().take(word_end).skip(i) {
            let w = char_width(*c);
            if used > 0 && used + w > width {
                lines.push(start..j);
                start = j;
                used = 0;
            }
            used += w;
        }

        let space_end = chars[word_end..]
            .iter()
            .position(|c| *c != ' ')
            .map_or(chars.len(), |p| word_end + p);
        used += space_end - word_end;
        i = space_end;
    }

    if start < chars.len() {
        lines.push(start..chars.len());
    }
    lines
}

/// Index of the line holding `idx`; positions past the end sit on the last line.
pub fn line_of(lines: &[Range<usize>], idx: usize) -> usize {
    lines
        .partition_point(|l| l.end <= idx)
        .min(lines.len().saturating_sub(1))
}

/// Trailing-edge debounce: fires once, `wait` after the most recent trigger.
#[derive(Debug, Clone)]
pub struct Debounce {
    wait: Duration,
    due: Option<Instant>,
}

impl Debounce {
    pub fn new(wait: Duration) -> Self {
        Self { wait, due: None }
    }

    pub fn trigger(&mut self, now: Instant) {
        self.due = Some(now + self.wait);
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.due
    }

    pub fn fire(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}

/// Keeps the word under the cursor inside a small window of wrapped lines.
/// Scroll updates are coalesced; state changes never wait on them.
#[derive(Debug, Clone)]
pub struct ScrollAdapter {
    debounce: Debounce,
    top_line: usize,
    visible_lines: usize,
}

impl Default for ScrollAdapter {
    fn default() -> Self {
        Self::new(VISIBLE_LINES, SCROLL_DEBOUNCE)
    }
}

impl ScrollAdapter {
    pub fn new(visible_lines: usize, wait: Duration) -> Self {
        Self {
            debounce: Debounce::new(wait),
            top_line: 0,
            visible_lines: visible_lines.max(1),
        }
    }

    pub fn top_line(&self) -> usize {
        self.top_line
    }

    pub fn visible_lines(&self) -> usize {
        self.visible_lines
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    /// Apply a pending scroll if its debounce window has passed. Returns true
    /// when the window moved.
    pub fn poll(
        &mut self,
        now: Instant,
        sequence: &ExpectedSequence,
        cursor: usize,
        width: usize,
    ) -> bool {
        if !self.debounce.fire(now) {
            return false;
        }
        self.scroll_to_active(sequence, cursor, width)
    }

    pub fn scroll_to_active(
        &mut self,
        sequence: &ExpectedSequence,
        cursor: usize,
        width: usize,
    ) -> bool {
        let lines = wrap_lines(sequence.chars(), width);
        let anchor = sequence.word_at(cursor).map_or(cursor, |w| w.start);
        let active = line_of(&lines, anchor);

        let below = active >= self.top_line + self.visible_lines;
        let above = active < self.top_line;
        if !(below || above) {
            return false;
        }

        // keep one line of already typed text above the active one
        self.top_line = active.saturating_sub(1);
        true
    }
}

impl SessionObserver for ScrollAdapter {
    fn on_change(&mut self, change: &Change, now: Instant) {
        match change {
            Change::Advanced { .. } | Change::Retreated { .. } => self.debounce.trigger(now),
            Change::Reset => {
                self.debounce.cancel();
                self.top_line = 0;
            }
            _ => {}
        }
    }
}
