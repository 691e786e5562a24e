// SPDX-License-Identifier: (Apache-2.0 OR MIT)

use std::fmt;

use crate::elf::AllocMatch;
use crate::error::{Error, Result};
use crate::spell::SpellChecker;

pub const DEFAULT_MIN_LENGTH: usize = 3;

/// Spell-check mode as selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SpellMode {
    /// Print strings as they are.
    #[default]
    None,
    /// Print a caret line under misspelled words.
    Annotate,
    /// Highlight misspelled words in place.
    Underline,
}

/// How each string is rendered. The spell-checking variants own the oracle, so
/// there is no way to ask for spelling feedback without having one.
pub enum Annotation {
    Plain,
    Underline(Box<dyn SpellChecker>),
    Annotate(Box<dyn SpellChecker>),
}

impl Annotation {
    pub fn mode(&self) -> SpellMode {
        match self {
            Annotation::Plain => SpellMode::None,
            Annotation::Underline(_) => SpellMode::Underline,
            Annotation::Annotate(_) => SpellMode::Annotate,
        }
    }
}

impl fmt::Debug for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Annotation::{:?}", self.mode())
    }
}

/// Settings for a whole run, built once before the first file is opened.
#[derive(Debug)]
pub struct Config {
    pub min_length: usize,
    pub annotation: Annotation,
    pub alloc_match: AllocMatch,
    /// Carry on with the next file after a fatal error in one of them.
    pub keep_going: bool,
}

impl Config {
    pub fn new(
        min_length: usize,
        mode: SpellMode,
        oracle: Option<Box<dyn SpellChecker>>,
    ) -> Result<Config> {
        let annotation = match (mode, oracle) {
            (SpellMode::None, _) => Annotation::Plain,
            (SpellMode::Underline, Some(oracle)) => Annotation::Underline(oracle),
            (SpellMode::Annotate, Some(oracle)) => Annotation::Annotate(oracle),
            (mode, None) => {
                return Err(Error::Config(format!(
                    "spell mode {mode:?} requires a spell checker"
                )))
            }
        };
        Ok(Config {
            min_length,
            annotation,
            alloc_match: AllocMatch::default(),
            keep_going: false,
        })
    }

    pub fn with_alloc_match(mut self, alloc_match: AllocMatch) -> Config {
        self.alloc_match = alloc_match;
        self
    }

    pub fn with_keep_going(mut self, keep_going: bool) -> Config {
        self.keep_going = keep_going;
        self
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            min_length: DEFAULT_MIN_LENGTH,
            annotation: Annotation::Plain,
            alloc_match: AllocMatch::default(),
            keep_going: false,
        }
    }
}
