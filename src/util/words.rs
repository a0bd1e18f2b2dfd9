//! Shell-style word splitting for option strings.
//!
//! Option variables such as `SPHINXOPTS` have always been expanded unquoted
//! inside a make recipe, so the shell split them into words. This module
//! reproduces that splitting without invoking a shell.

use std::borrow::Cow;

use thiserror::Error;

/// Error while splitting a command or option string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordsError {
    #[error("unterminated {quote} quote in `{input}`")]
    UnterminatedQuote { quote: char, input: String },

    #[error("trailing backslash in `{input}`")]
    TrailingBackslash { input: String },

    #[error("empty command")]
    EmptyCommand,
}

/// Split `input` into words the way a POSIX shell splits an unquoted expansion.
pub fn split(input: &str) -> Result<Vec<String>, WordsError> {
    let mut words = Vec::new();
    let mut current = String::new();
    // A word may be empty (`''`), so track whether one has started.
    let mut in_word = false;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            '\\' => match chars.next() {
                Some(next) => {
                    current.push(next);
                    in_word = true;
                }
                None => {
                    return Err(WordsError::TrailingBackslash {
                        input: input.to_string(),
                    })
                }
            },
            '\'' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(inner) => current.push(inner),
                        None => {
                            return Err(WordsError::UnterminatedQuote {
                                quote: '\'',
                                input: input.to_string(),
                            })
                        }
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(escaped @ ('"' | '\\' | '$' | '`')) => current.push(escaped),
                            Some('\n') => {}
                            Some(other) => {
                                current.push('\\');
                                current.push(other);
                            }
                            None => {
                                return Err(WordsError::UnterminatedQuote {
                                    quote: '"',
                                    input: input.to_string(),
                                })
                            }
                        },
                        Some(inner) => current.push(inner),
                        None => {
                            return Err(WordsError::UnterminatedQuote {
                                quote: '"',
                                input: input.to_string(),
                            })
                        }
                    }
                }
            }
            other => {
                current.push(other);
                in_word = true;
            }
        }
    }

    if in_word {
        words.push(current);
    }

    Ok(words)
}

/// Quote a single word so that [`split`] (or a shell) reads it back unchanged.
pub fn quote(word: &str) -> Cow<'_, str> {
    if word.is_empty() {
        return Cow::Borrowed("''");
    }

    let safe = word
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "-_./=:,+@%".contains(c));
    if safe {
        return Cow::Borrowed(word);
    }

    Cow::Owned(format!("'{}'", word.replace('\'', r"'\''")))
}
