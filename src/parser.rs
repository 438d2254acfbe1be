//! Delimited-text splitting with configurable separators and quote pairs.
//!
//! A [`Splitter`] turns one line into an ordered list of fields. Fields are
//! separated by any of the configured separator characters and may be wrapped
//! in one of the configured [`QuotePair`]s, in which case separators and
//! whitespace inside the quotes belong to the field.
//!
//! The result is never empty: an absent or blank line is a single empty field,
//! and a trailing separator yields one trailing empty field.

use crate::{error::MalformedInput, types::FormatPolicy};

pub const DEFAULT_SEPARATORS: &[char] = &[','];

/// Opening/closing characters of a quoted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotePair {
    pub open: char,
    pub close: char,
    /// `\<close>` and `\\` inside the quotes stand for the literal character.
    pub resolve_escapes: bool,
    /// Emit the quoted text verbatim, quote characters and escapes included.
    pub keep_quote_chars: bool,
}

impl QuotePair {
    pub const fn new(open: char, close: char) -> Self {
        Self {
            open,
            close,
            resolve_escapes: false,
            keep_quote_chars: false,
        }
    }

    pub const fn double_quote() -> Self {
        Self::new('"', '"').with_escapes(true)
    }

    pub const fn parens() -> Self {
        Self::new('(', ')')
    }

    pub const fn with_escapes(mut self, resolve_escapes: bool) -> Self {
        self.resolve_escapes = resolve_escapes;
        self
    }

    pub const fn keeping_quote_chars(mut self, keep_quote_chars: bool) -> Self {
        self.keep_quote_chars = keep_quote_chars;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splitter {
    separators: Vec<char>,
    quotes: Vec<QuotePair>,
    trim_whitespace: bool,
    policy: FormatPolicy,
}

impl Default for Splitter {
    fn default() -> Self {
        Self {
            separators: DEFAULT_SEPARATORS.to_vec(),
            quotes: Vec::new(),
            trim_whitespace: true,
            policy: FormatPolicy::Strict,
        }
    }
}

impl Splitter {
    pub fn new(separators: &[char], quotes: &[QuotePair]) -> Self {
        Self {
            separators: separators.to_vec(),
            quotes: quotes.to_vec(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_trim_whitespace(mut self, trim_whitespace: bool) -> Self {
        self.trim_whitespace = trim_whitespace;
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: FormatPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> FormatPolicy {
        self.policy
    }

    /// Split `text` into fields.
    ///
    /// # Errors
    ///
    /// Under [`FormatPolicy::Strict`], returns [`MalformedInput::QuoteNotClosed`]
    /// when a quoted field runs to the end of input and
    /// [`MalformedInput::SeparatorExpected`] when a quoted field is followed by
    /// something other than a separator.
    pub fn split(&self, text: Option<&str>) -> Result<Vec<String>, MalformedInput> {
        let chars: Vec<char> = text.unwrap_or_default().chars().collect();
        let mut fields = Vec::new();
        let mut pos = 0;

        loop {
            if self.trim_whitespace {
                pos = skip_whitespace(&chars, pos);
            }

            let mut field = match self.quote_opened_by(chars.get(pos).copied()) {
                Some(quote) => {
                    let (field, end) = self.scan_quoted(&chars, pos, quote)?;
                    pos = end;
                    if self.trim_whitespace {
                        pos = skip_whitespace(&chars, pos);
                    }
                    field
                }
                None => {
                    let (field, end) = self.scan_plain(&chars, pos);
                    pos = end;
                    field
                }
            };

            if pos < chars.len() && !self.is_separator(chars[pos]) {
                if self.policy == FormatPolicy::Strict {
                    return Err(MalformedInput::SeparatorExpected { position: pos });
                }
                let (stray, end) = self.scan_plain(&chars, pos);
                field.push_str(&stray);
                pos = end;
            }

            fields.push(field);

            if pos >= chars.len() {
                break;
            }

            // consume the separator
            pos += 1;
            if pos == chars.len() {
                fields.push(String::new());
                break;
            }
        }

        Ok(fields)
    }

    fn quote_opened_by(&self, c: Option<char>) -> Option<QuotePair> {
        let c = c?;
        self.quotes.iter().find(|quote| quote.open == c).copied()
    }

    fn is_separator(&self, c: char) -> bool {
        self.separators.contains(&c)
    }

    fn scan_plain(&self, chars: &[char], start: usize) -> (String, usize) {
        let end = chars[start..]
            .iter()
            .position(|c| self.is_separator(*c))
            .map_or(chars.len(), |offset| start + offset);

        let field: String = chars[start..end].iter().collect();
        if self.trim_whitespace {
            (field.trim_end().to_owned(), end)
        } else {
            (field, end)
        }
    }

    /// Scans from the opening quote at `start`. Returns the field and the
    /// position just past the closing quote.
    fn scan_quoted(
        &self,
        chars: &[char],
        start: usize,
        quote: QuotePair,
    ) -> Result<(String, usize), MalformedInput> {
        let mut content = String::new();
        let mut pos = start + 1;
        let mut closed = false;

        while pos < chars.len() {
            let c = chars[pos];
            if quote.resolve_escapes
                && c == '\\'
                && let Some(&next) = chars.get(pos + 1)
                && (next == quote.close || next == '\\')
            {
                content.push(next);
                pos += 2;
                continue;
            }
            if c == quote.close {
                closed = true;
                pos += 1;
                break;
            }
            content.push(c);
            pos += 1;
        }

        if !closed && self.policy == FormatPolicy::Strict {
            return Err(MalformedInput::QuoteNotClosed { position: start });
        }

        if quote.keep_quote_chars {
            return Ok((chars[start..pos].iter().collect(), pos));
        }

        Ok((content, pos))
    }
}

fn skip_whitespace(chars: &[char], mut pos: usize) -> usize {
    while pos < chars.len() && chars[pos].is_whitespace() {
        pos += 1;
    }
    pos
}

/// Split with whitespace trimming and strict error reporting.
///
/// # Errors
///
/// See [`Splitter::split`].
pub fn split(
    text: Option<&str>,
    separators: &[char],
    quotes: &[QuotePair],
) -> Result<Vec<String>, MalformedInput> {
    Splitter::new(separators, quotes).split(text)
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;
