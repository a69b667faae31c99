//! Framing for bodies made of concatenated JSON objects.
//!
//! The shape is chosen from the first non-whitespace byte:
//!
//! - `[` means a single top-level array of (possibly pretty-printed) objects.
//!   Objects are found by tracking brace depth; bytes between elements
//!   (`,`, `]`, whitespace) are skipped.
//! - anything else means newline-delimited JSON. Every non-blank line is one
//!   record, so a corrupt line costs only itself.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Shape {
    #[default]
    Unknown,
    Array,
    Lines,
}

#[derive(Debug, Default)]
pub struct JsonObjectDecoder {
    shape: Shape,
    buffer: Vec<u8>,
    /// Next byte to scan.
    pos: usize,
    /// Start of the array element being scanned, if any.
    start: Option<usize>,
    depth: usize,
    in_string: bool,
    escaped: bool,
}

impl JsonObjectDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes and return every record they completed.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);
        if self.shape == Shape::Unknown {
            match self.buffer.iter().find(|b| !b.is_ascii_whitespace()) {
                Some(b'[') => self.shape = Shape::Array,
                Some(_) => self.shape = Shape::Lines,
                None => return Vec::new(),
            }
        }
        match self.shape {
            Shape::Array => self.scan_array(),
            _ => self.split_lines(),
        }
    }

    /// Flush at end of body. A trailing line without a newline is still a
    /// record; an array element that never closed is dropped.
    pub fn finish(&mut self) -> Vec<String> {
        let records = match self.shape {
            Shape::Lines => {
                let line = std::mem::take(&mut self.buffer);
                line_record(&line).into_iter().collect()
            }
            _ => {
                if self.pending() > 0 {
                    tracing::debug!(
                        target: "augury::streaming",
                        bytes = self.pending(),
                        "dropping unterminated trailing record"
                    );
                }
                Vec::new()
            }
        };
        self.buffer.clear();
        self.pos = 0;
        self.start = None;
        records
    }

    /// Buffered bytes of a record that has not completed yet.
    pub fn pending(&self) -> usize {
        match self.shape {
            Shape::Array => self.start.map(|s| self.buffer.len() - s).unwrap_or(0),
            _ => self
                .buffer
                .iter()
                .filter(|b| !b.is_ascii_whitespace())
                .count(),
        }
    }

    fn split_lines(&mut self) -> Vec<String> {
        let mut records = Vec::new();
        let mut consumed = 0;
        while let Some(offset) = self.buffer[consumed..].iter().position(|b| *b == b'\n') {
            let end = consumed + offset;
            if let Some(record) = line_record(&self.buffer[consumed..end]) {
                records.push(record);
            }
            consumed = end + 1;
        }
        self.buffer.drain(..consumed);
        records
    }

    fn scan_array(&mut self) -> Vec<String> {
        let mut objects = Vec::new();
        while self.pos < self.buffer.len() {
            let b = self.buffer[self.pos];
            if self.start.is_none() {
                if b == b'{' {
                    self.start = Some(self.pos);
                    self.depth = 1;
                    self.in_string = false;
                    self.escaped = false;
                }
                self.pos += 1;
                continue;
            }

            if self.in_string {
                if self.escaped {
                    self.escaped = false;
                } else if b == b'\\' {
                    self.escaped = true;
                } else if b == b'"' {
                    self.in_string = false;
                }
            } else {
                match b {
                    b'"' => self.in_string = true,
                    b'{' | b'[' => self.depth += 1,
                    b'}' | b']' => {
                        self.depth = self.depth.saturating_sub(1);
                        if self.depth == 0 {
                            if let Some(start) = self.start.take() {
                                let raw = &self.buffer[start..=self.pos];
                                objects.push(String::from_utf8_lossy(raw).into_owned());
                            }
                        }
                    }
                    _ => {}
                }
            }
            self.pos += 1;
        }

        self.compact();
        objects
    }

    fn compact(&mut self) {
        let keep_from = self.start.unwrap_or(self.pos);
        if keep_from > 0 {
            self.buffer.drain(..keep_from);
            self.pos -= keep_from;
            if let Some(start) = self.start.as_mut() {
                *start -= keep_from;
            }
        }
    }
}

fn line_record(raw: &[u8]) -> Option<String> {
    let line = String::from_utf8_lossy(raw);
    let line = line.trim();
    (!line.is_empty()).then(|| line.to_string())
}
