//! Incremental UTF-8 line splitting.
//!
//! Chunks may end anywhere: inside a multi-byte character, inside a line,
//! or between `\r` and `\n`. The reader carries the incomplete tail of each
//! chunk forward so the emitted lines are identical to splitting the whole
//! byte sequence at once.

const REPLACEMENT: char = '\u{FFFD}';

#[derive(Debug, Default)]
pub struct LineReader {
    /// Bytes of a character that started in a previous chunk
    pending: Vec<u8>,
    /// Decoded text after the last newline seen so far
    partial: String,
}

impl LineReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and return every line it completes, without terminators.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        if self.pending.is_empty() {
            self.decode(chunk);
        } else {
            let mut joined = std::mem::take(&mut self.pending);
            joined.extend_from_slice(chunk);
            self.decode(&joined);
        }
        self.drain_complete_lines()
    }

    /// End of stream: return the trailing partial line, if any.
    pub fn finish(&mut self) -> Option<String> {
        if !self.pending.is_empty() {
            self.pending.clear();
            self.partial.push(REPLACEMENT);
        }
        let mut rest = std::mem::take(&mut self.partial);
        if rest.ends_with('\r') {
            rest.pop();
        }
        if rest.is_empty() { None } else { Some(rest) }
    }

    fn decode(&mut self, mut bytes: &[u8]) {
        loop {
            match std::str::from_utf8(bytes) {
                Ok(text) => {
                    self.partial.push_str(text);
                    return;
                }
                Err(err) => {
                    let (valid, rest) = bytes.split_at(err.valid_up_to());
                    // valid_up_to guarantees this prefix is well-formed
                    if let Ok(text) = std::str::from_utf8(valid) {
                        self.partial.push_str(text);
                    }
                    match err.error_len() {
                        Some(invalid) => {
                            self.partial.push(REPLACEMENT);
                            bytes = &rest[invalid..];
                        }
                        None => {
                            // Incomplete sequence at the end of the chunk
                            self.pending.extend_from_slice(rest);
                            return;
                        }
                    }
                }
            }
        }
    }

    fn drain_complete_lines(&mut self) -> Vec<String> {
        let Some(last_newline) = self.partial.rfind('\n') else {
            return Vec::new();
        };

        let tail = self.partial.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.partial, tail);

        complete[..last_newline]
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_in_chunks(bytes: &[u8], sizes: &[usize]) -> Vec<String> {
        let mut reader = LineReader::new();
        let mut lines = Vec::new();
        let mut offset = 0;
        let mut i = 0;
        while offset < bytes.len() {
            let size = sizes[i % sizes.len()].max(1);
            let end = (offset + size).min(bytes.len());
            lines.extend(reader.push(&bytes[offset..end]));
            offset = end;
            i += 1;
        }
        lines.extend(reader.finish());
        lines
    }

    #[test]
    fn test_single_chunk() {
        let mut reader = LineReader::new();
        let lines = reader.push(b"one\ntwo\nthree");
        assert_eq!(lines, vec!["one", "two"]);
        assert_eq!(reader.finish(), Some("three".to_string()));
    }

    #[test]
    fn test_partial_line_carried_across_chunks() {
        let mut reader = LineReader::new();
        assert!(reader.push(b"{\"url\":").is_empty());
        assert_eq!(reader.push(b"\"x\"}\n{"), vec!["{\"url\":\"x\"}"]);
        assert_eq!(reader.finish(), Some("{".to_string()));
    }

    #[test]
    fn test_multibyte_char_split_across_chunks() {
        let text = "建築署\n香港\n";
        let bytes = text.as_bytes();
        // Split after the first byte of the 3-byte character
        let mut reader = LineReader::new();
        let mut lines = reader.push(&bytes[..1]);
        lines.extend(reader.push(&bytes[1..4]));
        lines.extend(reader.push(&bytes[4..]));
        assert_eq!(lines, vec!["建築署", "香港"]);
        assert_eq!(reader.finish(), None);
    }

    #[test]
    fn test_crlf_split_between_cr_and_lf() {
        let mut reader = LineReader::new();
        let mut lines = reader.push(b"a\r");
        lines.extend(reader.push(b"\nb\r\n"));
        assert_eq!(lines, vec!["a", "b"]);
        assert_eq!(reader.finish(), None);
    }

    #[test]
    fn test_every_chunking_matches_single_chunk() {
        let text = "{\"name\":\"土木工程拓展署\"}\r\n{\"name\":\"é\"}\n\n{\"name\":\"😀 emoji\"}\nlast";
        let bytes = text.as_bytes();
        let expected = read_in_chunks(bytes, &[bytes.len()]);

        for size in 1..=bytes.len() {
            assert_eq!(read_in_chunks(bytes, &[size]), expected, "chunk size {}", size);
        }
        assert_eq!(read_in_chunks(bytes, &[1, 2, 3, 5, 7]), expected);
    }

    #[test]
    fn test_invalid_bytes_are_replaced() {
        let mut reader = LineReader::new();
        let lines = reader.push(b"ab\xffcd\n");
        assert_eq!(lines, vec!["ab\u{FFFD}cd"]);
    }

    #[test]
    fn test_truncated_char_at_end_of_stream() {
        let mut reader = LineReader::new();
        assert!(reader.push(&"x香".as_bytes()[..2]).is_empty());
        assert_eq!(reader.finish(), Some("x\u{FFFD}".to_string()));
    }

    #[test]
    fn test_empty_stream() {
        let mut reader = LineReader::new();
        assert!(reader.push(b"").is_empty());
        assert_eq!(reader.finish(), None);
    }
}
