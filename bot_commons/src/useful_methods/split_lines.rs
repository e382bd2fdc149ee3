/// Iterator that cuts text into pieces no longer than `limit` bytes.
///
/// Cuts happen on line breaks whenever a piece can end on one; the line break
/// itself is dropped. A single line that's too long on its own gets cut at the
/// last character boundary that fits. Empty lines at the start or end of a
/// piece are dropped, so there are never empty pieces.
#[derive(Clone, Debug)]
pub struct SplitByLines<'a> {
    rest: &'a str,
    limit: usize,
}

impl<'a> SplitByLines<'a> {
    /// # Panics
    ///
    /// Panics if `limit` is zero.
    #[must_use]
    pub fn new(text: &'a str, limit: usize) -> Self {
        assert!(limit > 0, "Can't split text into zero-length pieces");
        SplitByLines { rest: text, limit }
    }
}

impl<'a> Iterator for SplitByLines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.rest = self.rest.trim_start_matches('\n');

        if self.rest.is_empty() {
            return None;
        }

        if self.rest.len() <= self.limit {
            let piece = self.rest.trim_end_matches('\n');
            self.rest = "";
            return Some(piece);
        }

        // Longest prefix that fits and doesn't cut a character in half.
        let mut cut = self.limit;
        while cut > 0 && !self.rest.is_char_boundary(cut) {
            cut -= 1;
        }
        if cut == 0 {
            // Limit is smaller than the first character. Send it anyway.
            cut = self.rest.chars().next().map_or(1, char::len_utf8);
        }

        let (piece, rest) = if self.rest.as_bytes().get(cut) == Some(&b'\n') {
            // The prefix ends exactly at a line break.
            (&self.rest[..cut], &self.rest[cut + 1..])
        } else if let Some(newline) = self.rest[..cut].rfind('\n') {
            (&self.rest[..newline], &self.rest[newline + 1..])
        } else {
            (&self.rest[..cut], &self.rest[cut..])
        };

        self.rest = rest;
        Some(piece.trim_end_matches('\n'))
    }
}

#[cfg(test)]
mod tests {
    use super::SplitByLines;

    #[test]
    fn fits_whole() {
        let data = "hi\nhello";
        let mut splitter = SplitByLines::new(data, 64);
        assert_eq!(splitter.next(), Some(data));
        assert_eq!(splitter.next(), None);
    }

    #[test]
    fn line_splits() {
        let data = "aaa\nbbb\nccc";
        let mut splitter = SplitByLines::new(data, 7);
        assert_eq!(splitter.next(), Some("aaa\nbbb"));
        assert_eq!(splitter.next(), Some("ccc"));
        assert_eq!(splitter.next(), None);

        let mut splitter = SplitByLines::new(data, 5);
        assert_eq!(splitter.next(), Some("aaa"));
        assert_eq!(splitter.next(), Some("bbb"));
        assert_eq!(splitter.next(), Some("ccc"));
        assert_eq!(splitter.next(), None);
    }

    #[test]
    fn cut_right_at_newline() {
        let mut splitter = SplitByLines::new("abc\ndef", 3);
        assert_eq!(splitter.next(), Some("abc"));
        assert_eq!(splitter.next(), Some("def"));
        assert_eq!(splitter.next(), None);
    }

    #[test]
    fn long_line_char_splits() {
        let mut splitter = SplitByLines::new("abcdefgh", 3);
        assert_eq!(splitter.next(), Some("abc"));
        assert_eq!(splitter.next(), Some("def"));
        assert_eq!(splitter.next(), Some("gh"));
        assert_eq!(splitter.next(), None);
    }

    #[test]
    fn multibyte_stays_whole() {
        // "é" is two bytes.
        let pieces: Vec<_> = SplitByLines::new("ééé", 3).collect();
        assert_eq!(pieces, ["é", "é", "é"]);

        // Limit smaller than one character still makes progress.
        let pieces: Vec<_> = SplitByLines::new("éé", 1).collect();
        assert_eq!(pieces, ["é", "é"]);
    }

    #[test]
    fn no_empty_pieces() {
        let pieces: Vec<_> = SplitByLines::new("\n\nab\n\n\ncd\n\n", 3).collect();
        assert_eq!(pieces, ["ab", "cd"]);
        assert_eq!(SplitByLines::new("\n\n\n", 3).next(), None);
        assert_eq!(SplitByLines::new("", 3).next(), None);
    }
}
