use std::io::{ErrorKind, Read};

use quill_common::token::MAX_LEXEME_LEN;

/// Size of each half of the twin buffer.
pub const HALF_SIZE: usize = 4096;
const TOTAL: usize = 2 * HALF_SIZE;

/// Twin-buffer character source for the Quill scanner.
///
/// Two contiguous halves of [`HALF_SIZE`] bytes stream the input with O(1)
/// retraction across the half boundary. The buffer owns the underlying
/// reader and tracks the current line number, bumping it on every newline
/// consumed and un-bumping it on every newline retracted over, so the
/// scanner can attribute each lexeme to the line of its first character.
///
/// A half is (re)loaded when the forward pointer first crosses into it;
/// each half is reloaded at most once per pass, so retraction within one
/// half's worth of look-back always re-reads the same bytes. A short read
/// records a sentinel position just past the last byte loaded; [`next`]
/// detects the sentinel and reports end of input *without* advancing past
/// it. I/O errors degrade to end of input.
///
/// [`next`]: TwinBuffer::next
pub struct TwinBuffer<R> {
    reader: R,
    buf: Box<[u8; TOTAL]>,
    /// Index of the next byte to read, in 0..TOTAL.
    forward: usize,
    /// Start of the current lexeme, set by [`TwinBuffer::begin_lexeme`].
    lexeme_begin: usize,
    /// Per-half end-of-input sentinel: index just past the last loaded byte.
    sentinel: [Option<usize>; 2],
    /// Whether the half's contents are current for this pass.
    loaded: [bool; 2],
    /// The reader has been exhausted; no further refills.
    eof_reached: bool,
    line: u32,
}

impl<R: Read> TwinBuffer<R> {
    /// Create a twin buffer over a reader and load the first half.
    pub fn new(reader: R) -> Self {
        let mut tb = Self {
            reader,
            buf: Box::new([0u8; TOTAL]),
            forward: 0,
            lexeme_begin: 0,
            sentinel: [None, None],
            loaded: [false, false],
            eof_reached: false,
            line: 1,
        };
        tb.load_half(0);
        tb
    }

    /// Consume and return the next byte, or `None` at end of input.
    ///
    /// Hitting the end-of-input sentinel does not advance the forward
    /// pointer, so repeated calls at end of input are stable and callers
    /// must not retract after a `None`.
    pub fn next(&mut self) -> Option<u8> {
        let half = self.forward / HALF_SIZE;
        if self.sentinel[half] == Some(self.forward) {
            return None;
        }

        let c = self.buf[self.forward];
        self.forward += 1;
        if c == b'\n' {
            self.line += 1;
        }

        if self.forward == HALF_SIZE {
            // Crossing into the second half: bring it up to date.
            if !self.loaded[1] {
                self.load_half(1);
            }
            self.loaded[0] = false;
        } else if self.forward == TOTAL {
            // Wrap around into the first half.
            self.forward = 0;
            if !self.loaded[0] {
                self.load_half(0);
            }
            self.loaded[1] = false;
        }

        Some(c)
    }

    /// Undo `n` advances, walking the line counter back over any newlines.
    ///
    /// Look-back is valid for up to one half's worth of characters; the
    /// scanner never retracts further than a handful.
    pub fn retract(&mut self, n: usize) {
        for _ in 0..n {
            self.forward = if self.forward == 0 { TOTAL - 1 } else { self.forward - 1 };
            if self.buf[self.forward] == b'\n' {
                self.line -= 1;
            }
        }
    }

    /// Mark the current position as the start of the next lexeme.
    pub fn begin_lexeme(&mut self) {
        self.lexeme_begin = self.forward;
    }

    /// Line number of the next byte to be read (1-based).
    pub fn line(&self) -> u32 {
        self.line
    }

    /// The text from the lexeme start up to (not including) the forward
    /// pointer, wrapping across the half boundary, truncated to
    /// [`MAX_LEXEME_LEN`] bytes.
    pub fn lexeme(&self) -> String {
        let mut bytes = Vec::new();
        let mut pos = self.lexeme_begin;
        while pos != self.forward && bytes.len() < MAX_LEXEME_LEN {
            bytes.push(self.buf[pos]);
            pos += 1;
            if pos == TOTAL {
                pos = 0;
            }
        }
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Fill a half from the reader, recording the sentinel on a short read.
    fn load_half(&mut self, half: usize) {
        let start = half * HALF_SIZE;
        let mut filled = 0;
        while !self.eof_reached && filled < HALF_SIZE {
            match self.reader.read(&mut self.buf[start + filled..start + HALF_SIZE]) {
                Ok(0) => self.eof_reached = true,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(_) => self.eof_reached = true,
            }
        }
        if filled < HALF_SIZE {
            self.sentinel[half] = Some(start + filled);
        }
        self.loaded[half] = true;
    }
}
