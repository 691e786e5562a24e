// SPDX-License-Identifier: (Apache-2.0 OR MIT)

//! The spelling oracle used by the annotating renderers.
//!
//! The renderers only need a yes/no answer per word, which is what
//! [`SpellChecker`] captures. [`Dictionary`] answers it from a word list, either
//! a hunspell/myspell `.dic` file picked by locale or any file given
//! explicitly.

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::{Error, Result};

/// Directories searched for `<locale>.dic`.
const DICTIONARY_DIRS: &[&str] = &[
    "/usr/share/hunspell",
    "/usr/share/myspell",
    "/usr/share/myspell/dicts",
    "/usr/local/share/hunspell",
];

const DEFAULT_LOCALE: &str = "en_US";

/// Answers whether a word is spelled correctly.
pub trait SpellChecker {
    fn check(&self, word: &[u8]) -> bool;
}

impl<F: Fn(&[u8]) -> bool> SpellChecker for F {
    fn check(&self, word: &[u8]) -> bool {
        self(word)
    }
}

/// Word-list backed [`SpellChecker`].
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    words: HashSet<String>,
}

impl Dictionary {
    /// Loads the dictionary for `locale`, or for the locale of the environment
    /// when `None`.
    pub fn initialize(locale: Option<&str>) -> Result<Dictionary> {
        let locale = match locale {
            Some(locale) => normalize_locale(locale),
            None => environment_locale(),
        };
        debug!("Looking up dictionary for locale {}", locale);

        let path = find_dictionary(&locale)
            .ok_or_else(|| Error::Config(format!("no dictionary found for locale {locale}")))?;
        Dictionary::from_path(path)
    }

    /// Loads a hunspell `.dic` file or a plain word list, one word per line.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Dictionary> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read dictionary {}: {e}", path.display()))
        })?;
        let dictionary = Dictionary::parse(&contents);
        info!(
            "Loaded {} words from {}",
            dictionary.len(),
            path.display()
        );
        Ok(dictionary)
    }

    pub fn from_words<I, S>(words: I) -> Dictionary
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Dictionary {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn parse(contents: &str) -> Dictionary {
        let mut lines = contents.lines().peekable();
        // hunspell files open with an approximate word count.
        if let Some(first) = lines.peek() {
            if !first.trim().is_empty() && first.trim().bytes().all(|b| b.is_ascii_digit()) {
                lines.next();
            }
        }
        Dictionary::from_words(lines.filter_map(|line| {
            // Affix flags follow a '/', morphological fields a tab.
            let word = line.split(&['/', '\t'][..]).next().unwrap_or("").trim();
            (!word.is_empty()).then(|| word.to_string())
        }))
    }

    fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }
}

impl SpellChecker for Dictionary {
    fn check(&self, word: &[u8]) -> bool {
        let Ok(word) = std::str::from_utf8(word) else {
            return false;
        };
        if self.contains(word) {
            return true;
        }
        let lower = word.to_ascii_lowercase();
        if self.contains(&lower) {
            return true;
        }
        // Capitalized at the start of a sentence.
        let mut chars = word.chars();
        match chars.next() {
            Some(first) if first.is_ascii_uppercase() => {
                let decapitalized: String =
                    std::iter::once(first.to_ascii_lowercase()).chain(chars).collect();
                self.contains(&decapitalized)
            }
            _ => false,
        }
    }
}

/// `en_US.UTF-8@euro` → `en_US`.
fn normalize_locale(locale: &str) -> String {
    let name = locale.split(&['.', '@'][..]).next().unwrap_or("");
    match name {
        "" | "C" | "POSIX" => DEFAULT_LOCALE.to_string(),
        name => name.replace('-', "_"),
    }
}

fn environment_locale() -> String {
    let locale = ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| env::var(var).ok())
        .find(|value| !value.is_empty())
        .unwrap_or_default();
    normalize_locale(&locale)
}

fn find_dictionary(locale: &str) -> Option<PathBuf> {
    let file_name = format!("{locale}.dic");
    DICTIONARY_DIRS
        .iter()
        .map(|dir| Path::new(dir).join(&file_name))
        .find(|path| path.is_file())
}
