use std::io::Read;

/// The byte-level input source the parser consumes. Kept as a trait (per
/// spec §1, input is an out-of-scope external collaborator) so the DFA can
/// be driven from an in-memory string in tests without touching stdin.
pub trait Reader {
    fn consume(&mut self) -> Option<char>;

    fn peek(&self) -> Option<char>;
}

/// A `Reader` over a string already fully held in memory.
pub struct SliceReader {
    chars: Vec<char>,
    pos: usize,
}

impl SliceReader {
    pub fn new(text: impl AsRef<str>) -> SliceReader {
        SliceReader {
            chars: text.as_ref().chars().collect(),
            pos: 0,
        }
    }
}

impl Reader for SliceReader {
    fn consume(&mut self) -> Option<char> {
        let ch = self.chars.get(self.pos).copied();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }
}

/// A `Reader` that eagerly slurps all of stdin, then replays it. Mirrors
/// the teacher's `ByteReader::from_read` (`dts/reader.rs`), which also
/// reads its whole source up front rather than streaming.
pub struct StdinReader {
    inner: SliceReader,
}

impl StdinReader {
    pub fn from_stdin() -> std::io::Result<StdinReader> {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(StdinReader {
            inner: SliceReader::new(text),
        })
    }
}

impl Reader for StdinReader {
    fn consume(&mut self) -> Option<char> {
        self.inner.consume()
    }

    fn peek(&self) -> Option<char> {
        self.inner.peek()
    }
}
