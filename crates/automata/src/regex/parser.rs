//! Regular expression syntax.

use std::iter::Peekable;
use std::str::CharIndices;

use thiserror::Error;

use super::builder::RegexBuilder;
use crate::automaton::FiniteAutomaton;

/// Token for the language containing only the empty string.
pub const EMPTY_STRING: char = 'λ';
/// Token for the empty language.
pub const EMPTY_LANGUAGE: char = '∅';

const META_CHARS: [char; 4] = [
    '|', // union
    '*', // star
    '(', ')', // group brackets
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegexError {
    #[error("unexpected {found:?} at position {position}")]
    UnexpectedChar { position: usize, found: char },

    #[error("unclosed parenthesis opened at position {position}")]
    UnclosedParenthesis { position: usize },

    #[error("missing operand at position {position}")]
    MissingOperand { position: usize },
}

/// Recursive descent parser for regular expressions in Kleene syntax:
/// juxtaposition for concatenation, `|` for union, postfix `*`,
/// parentheses, `λ` for the empty string and `∅` for the empty language.
///
/// Precedence from tightest: star, concatenation, union.
///
/// Error positions are byte offsets into the pattern.
pub struct RegexParser {
    builder: RegexBuilder,
    /// Byte length of the pattern being parsed
    end: usize,
}

impl Default for RegexParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RegexParser {
    pub fn new() -> Self {
        Self {
            builder: RegexBuilder::new(),
            end: 0,
        }
    }

    /// Parse `pattern` and build its automaton. An empty pattern denotes the
    /// empty string.
    pub fn create_automaton(&mut self, pattern: &str) -> Result<FiniteAutomaton, RegexError> {
        self.end = pattern.len();
        let mut stream = pattern.char_indices().peekable();
        if stream.peek().is_none() {
            return Ok(self.builder.lambda());
        }

        let automaton = self.parse_union(&mut stream)?;
        match stream.next() {
            Some((position, found)) => Err(RegexError::UnexpectedChar { position, found }),
            None => Ok(automaton),
        }
    }

    fn parse_union(
        &mut self,
        stream: &mut Peekable<CharIndices<'_>>,
    ) -> Result<FiniteAutomaton, RegexError> {
        let mut automaton = self.parse_concat(stream)?;
        while let Some(&(_, '|')) = stream.peek() {
            stream.next();
            let rhs = self.parse_concat(stream)?;
            automaton = self.builder.union(automaton, rhs);
        }
        Ok(automaton)
    }

    fn parse_concat(
        &mut self,
        stream: &mut Peekable<CharIndices<'_>>,
    ) -> Result<FiniteAutomaton, RegexError> {
        let mut automaton: Option<FiniteAutomaton> = None;
        while let Some(&(_, c)) = stream.peek() {
            if c == '|' || c == ')' {
                break;
            }
            let next = self.parse_star(stream)?;
            automaton = Some(match automaton {
                Some(prefix) => self.builder.concat(prefix, next),
                None => next,
            });
        }

        automaton.ok_or_else(|| RegexError::MissingOperand {
            position: stream.peek().map_or(self.end, |&(position, _)| position),
        })
    }

    fn parse_star(
        &mut self,
        stream: &mut Peekable<CharIndices<'_>>,
    ) -> Result<FiniteAutomaton, RegexError> {
        let mut automaton = self.parse_atom(stream)?;
        while stream.next_if(|&(_, c)| c == '*').is_some() {
            automaton = self.builder.star(automaton);
        }
        Ok(automaton)
    }

    fn parse_atom(
        &mut self,
        stream: &mut Peekable<CharIndices<'_>>,
    ) -> Result<FiniteAutomaton, RegexError> {
        let Some((position, c)) = stream.next() else {
            return Err(RegexError::MissingOperand { position: self.end });
        };

        match c {
            '(' => {
                let inner = self.parse_union(stream)?;
                match stream.next() {
                    Some((_, ')')) => Ok(inner),
                    _ => Err(RegexError::UnclosedParenthesis { position }),
                }
            }
            EMPTY_STRING => Ok(self.builder.lambda()),
            EMPTY_LANGUAGE => Ok(self.builder.empty()),
            c if META_CHARS.contains(&c) => Err(RegexError::UnexpectedChar { position, found: c }),
            c => Ok(self.builder.symbol(c)),
        }
    }
}
