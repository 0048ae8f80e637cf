//! Line grammar for composer replies.
//!
//! Two line forms are recognized, tried in order:
//!
//! ```text
//! synth :<instrument>, note: :<note>, release: <release>, amp: <amp>
//! sleep <duration>
//! ```
//!
//! Identifiers are ASCII letters, digits and underscores; numbers are
//! unsigned decimals (`1`, `0.25`). Anything after `#` is a comment. A line
//! that matches neither form classifies as [`Line::Unrecognized`] and is
//! dropped from the segment.

use super::types::{MusicEvent, Segment};

/// Classification of a single source line.
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Note(MusicEvent),
    Rest(MusicEvent),
    Blank,
    Unrecognized,
}

/// Parse composer text into a segment. Never fails; unrecognized lines are skipped.
pub fn parse(text: &str) -> Segment {
    text.lines()
        .filter_map(|line| match classify_line(line) {
            Line::Note(event) | Line::Rest(event) => Some(event),
            Line::Blank | Line::Unrecognized => None,
        })
        .collect()
}

/// Classify one line of composer output.
pub fn classify_line(raw: &str) -> Line {
    let line = strip_comment(raw).trim();
    if line.is_empty() {
        return Line::Blank;
    }

    if let Some(event) = note_line(line) {
        return Line::Note(event);
    }
    if let Some(event) = rest_line(line) {
        return Line::Rest(event);
    }
    Line::Unrecognized
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

fn note_line(line: &str) -> Option<MusicEvent> {
    let mut scan = Scanner::new(line);
    scan.keyword("synth")?;
    let instrument = scan.symbol()?;
    scan.punct(',')?;
    scan.label("note")?;
    let note = scan.symbol()?;
    scan.punct(',')?;
    scan.label("release")?;
    let release = scan.number()?;
    scan.punct(',')?;
    scan.label("amp")?;
    let amplitude = scan.number()?;
    scan.finish()?;

    if amplitude > 1.0 {
        return None;
    }

    Some(MusicEvent::Note {
        instrument: instrument.to_string(),
        note: note.to_string(),
        release,
        amplitude,
    })
}

fn rest_line(line: &str) -> Option<MusicEvent> {
    let mut scan = Scanner::new(line);
    scan.keyword("sleep")?;
    let duration = scan.number()?;
    scan.finish()?;
    Some(MusicEvent::Rest { duration })
}

/// Cursor over one trimmed line. Every method returns `None` on mismatch so
/// grammar rules chain with `?`.
struct Scanner<'a> {
    rest: &'a str,
}

impl<'a> Scanner<'a> {
    fn new(line: &'a str) -> Self {
        Self { rest: line }
    }

    fn skip_ws(&mut self) {
        self.rest = self.rest.trim_start();
    }

    /// A bare word that must be followed by whitespace.
    fn keyword(&mut self, word: &str) -> Option<()> {
        self.skip_ws();
        let after = self.rest.strip_prefix(word)?;
        if !after.starts_with(char::is_whitespace) {
            return None;
        }
        self.rest = after;
        Some(())
    }

    /// `name:` with optional whitespace before the colon.
    fn label(&mut self, name: &str) -> Option<()> {
        self.skip_ws();
        self.rest = self.rest.strip_prefix(name)?;
        self.punct(':')
    }

    fn punct(&mut self, c: char) -> Option<()> {
        self.skip_ws();
        self.rest = self.rest.strip_prefix(c)?;
        Some(())
    }

    /// `:<identifier>`, returning the identifier.
    fn symbol(&mut self) -> Option<&'a str> {
        self.punct(':')?;
        self.identifier()
    }

    fn identifier(&mut self) -> Option<&'a str> {
        let end = self
            .rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(self.rest.len());
        if end == 0 {
            return None;
        }
        let (ident, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(ident)
    }

    /// Unsigned decimal: `digits` or `digits.digits`.
    fn number(&mut self) -> Option<f64> {
        self.skip_ws();
        let int_len = leading_digits(self.rest);
        if int_len == 0 {
            return None;
        }

        let mut len = int_len;
        if let Some(fraction) = self.rest[int_len..].strip_prefix('.') {
            let frac_len = leading_digits(fraction);
            if frac_len == 0 {
                return None;
            }
            len += 1 + frac_len;
        }

        let (literal, rest) = self.rest.split_at(len);
        let value: f64 = literal.parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        self.rest = rest;
        Some(value)
    }

    fn finish(&mut self) -> Option<()> {
        self.skip_ws();
        self.rest.is_empty().then_some(())
    }
}

fn leading_digits(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_digit).count()
}
