//! A small CSS selector engine.
//!
//! Covers what the storefront script needs: type selectors, `#id`,
//! `.class`, attribute presence / equality / prefix (`[href^="#"]`),
//! the descendant combinator and comma-separated selector lists.

use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;
use thiserror::Error;

/// Errors produced while parsing a selector
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("selector is empty")]
    Empty,

    #[error("unexpected '{ch}' at position {pos}")]
    Unexpected { ch: char, pos: usize },

    #[error("expected a name at position {pos}")]
    ExpectedName { pos: usize },

    #[error("unterminated attribute selector starting at position {pos}")]
    UnterminatedAttribute { pos: usize },

    #[error("unsupported combinator '{0}'")]
    UnsupportedCombinator(char),
}

/// Anything a selector can be matched against.
pub trait SelectorTarget: Copy {
    fn tag(&self) -> &str;
    fn element_id(&self) -> Option<&str>;
    fn has_class(&self, class: &str) -> bool;
    fn attribute(&self, name: &str) -> Option<&str>;
    fn parent(&self) -> Option<Self>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttributeMatcher {
    Exists(String),
    Equals(String, String),
    Prefix(String, String),
}

impl AttributeMatcher {
    fn matches<T: SelectorTarget>(&self, target: T) -> bool {
        match self {
            AttributeMatcher::Exists(name) => target.attribute(name).is_some(),
            AttributeMatcher::Equals(name, value) => target.attribute(name) == Some(value.as_str()),
            AttributeMatcher::Prefix(name, prefix) => target
                .attribute(name)
                .map(|v| v.starts_with(prefix.as_str()))
                .unwrap_or(false),
        }
    }
}

/// One simple-selector sequence, e.g. `a.nav-link[href^="#"]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttributeMatcher>,
}

impl Compound {
    fn matches<T: SelectorTarget>(&self, target: T) -> bool {
        if let Some(tag) = &self.tag {
            if !target.tag().eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if target.element_id() != Some(id.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|c| target.has_class(c))
            && self.attributes.iter().all(|a| a.matches(target))
    }
}

/// A parsed selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    // Each entry is a descendant chain, outermost ancestor first.
    groups: Vec<Vec<Compound>>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        Parser::new(input).parse()
    }

    /// The text this selector was parsed from
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// True if any group of the list matches `target`.
    pub fn matches<T: SelectorTarget>(&self, target: T) -> bool {
        self.groups.iter().any(|chain| chain_matches(chain, target))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl std::str::FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Selector::parse(s)
    }
}

fn chain_matches<T: SelectorTarget>(chain: &[Compound], target: T) -> bool {
    let Some((last, ancestors)) = chain.split_last() else {
        return false;
    };
    if !last.matches(target) {
        return false;
    }

    // Descendant-only chains can be matched greedily from the right.
    let mut cursor = target.parent();
    for compound in ancestors.iter().rev() {
        loop {
            match cursor {
                Some(node) if compound.matches(node) => {
                    cursor = node.parent();
                    break;
                }
                Some(node) => cursor = node.parent(),
                None => return false,
            }
        }
    }
    true
}

struct Parser<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    fn parse(mut self) -> Result<Selector, SelectorError> {
        let mut groups = Vec::new();
        let mut chain: Vec<Compound> = Vec::new();

        loop {
            self.skip_whitespace();
            let Some(&(pos, ch)) = self.chars.peek() else {
                break;
            };

            match ch {
                ',' => {
                    self.chars.next();
                    if chain.is_empty() {
                        return Err(SelectorError::Unexpected { ch, pos });
                    }
                    groups.push(std::mem::take(&mut chain));
                }
                '>' | '+' | '~' => return Err(SelectorError::UnsupportedCombinator(ch)),
                _ => chain.push(self.compound()?),
            }
        }

        if chain.is_empty() {
            return if groups.is_empty() {
                Err(SelectorError::Empty)
            } else {
                Err(SelectorError::ExpectedName {
                    pos: self.input.len(),
                })
            };
        }
        groups.push(chain);

        Ok(Selector {
            source: self.input.trim().to_string(),
            groups,
        })
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.chars.peek(), Some((_, c)) if c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();

        if let Some(&(_, ch)) = self.chars.peek() {
            if ch == '*' {
                self.chars.next();
            } else if is_name_char(ch) {
                compound.tag = Some(self.name()?);
            }
        }

        while let Some(&(pos, ch)) = self.chars.peek() {
            match ch {
                '#' => {
                    self.chars.next();
                    compound.id = Some(self.name()?);
                }
                '.' => {
                    self.chars.next();
                    compound.classes.push(self.name()?);
                }
                '[' => {
                    self.chars.next();
                    compound.attributes.push(self.attribute(pos)?);
                }
                c if c.is_whitespace() || c == ',' => break,
                '>' | '+' | '~' => return Err(SelectorError::UnsupportedCombinator(ch)),
                _ => return Err(SelectorError::Unexpected { ch, pos }),
            }
        }

        // An empty compound here came from `*` and matches every element.
        Ok(compound)
    }

    fn name(&mut self) -> Result<String, SelectorError> {
        let start = self.position();
        let mut name = String::new();
        while let Some(&(_, ch)) = self.chars.peek() {
            if !is_name_char(ch) {
                break;
            }
            name.push(ch);
            self.chars.next();
        }
        if name.is_empty() {
            return Err(SelectorError::ExpectedName { pos: start });
        }
        Ok(name)
    }

    fn attribute(&mut self, open: usize) -> Result<AttributeMatcher, SelectorError> {
        self.skip_whitespace();
        let name = self.name()?;
        self.skip_whitespace();

        let prefix = match self.chars.next() {
            Some((_, ']')) => return Ok(AttributeMatcher::Exists(name)),
            Some((_, '=')) => false,
            Some((pos, '^')) => match self.chars.next() {
                Some((_, '=')) => true,
                Some((pos, ch)) => return Err(SelectorError::Unexpected { ch, pos }),
                None => return Err(SelectorError::Unexpected { ch: '^', pos }),
            },
            Some((pos, ch)) => return Err(SelectorError::Unexpected { ch, pos }),
            None => return Err(SelectorError::UnterminatedAttribute { pos: open }),
        };

        self.skip_whitespace();
        let value = self.attribute_value(open)?;
        self.skip_whitespace();

        match self.chars.next() {
            Some((_, ']')) => {}
            Some((pos, ch)) => return Err(SelectorError::Unexpected { ch, pos }),
            None => return Err(SelectorError::UnterminatedAttribute { pos: open }),
        }

        Ok(if prefix {
            AttributeMatcher::Prefix(name, value)
        } else {
            AttributeMatcher::Equals(name, value)
        })
    }

    fn attribute_value(&mut self, open: usize) -> Result<String, SelectorError> {
        match self.chars.peek() {
            Some(&(_, quote)) if quote == '"' || quote == '\'' => {
                self.chars.next();
                let mut value = String::new();
                for (_, ch) in self.chars.by_ref() {
                    if ch == quote {
                        return Ok(value);
                    }
                    value.push(ch);
                }
                Err(SelectorError::UnterminatedAttribute { pos: open })
            }
            _ => self.name(),
        }
    }

    fn position(&mut self) -> usize {
        self.chars
            .peek()
            .map(|&(pos, _)| pos)
            .unwrap_or(self.input.len())
    }
}

fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'
}
