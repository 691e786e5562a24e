// SPDX-License-Identifier: (Apache-2.0 OR MIT)

//! Extracts NUL-terminated string literals from the read-only data of ELF
//! files, optionally flagging spelling mistakes in them.
//!
//! The pipeline for one file is:
//! - [`elf::ElfFile`] validates the header and walks the section header table,
//!   yielding the `PROGBITS` sections flagged `ALLOC`.
//! - [`scanner::scan`] finds runs of printable bytes ending in a NUL in each of
//!   those sections.
//! - [`render::Renderer`] prints every run, plain or with spelling feedback
//!   from a [`spell::SpellChecker`].
//!
//! [`driver::run`] strings these together for a list of paths.
//!
//! ```no_run
//! use elfstrings::{driver, Config};
//!
//! let config = Config::default();
//! driver::run(&["/bin/true"], &config, std::io::stdout().lock()).unwrap();
//! ```

pub mod config;
pub mod driver;
pub mod elf;
pub mod error;
pub mod logger;
pub mod render;
pub mod scanner;
pub mod source;
pub mod spell;

pub use config::{Annotation, Config, SpellMode};
pub use elf::{AllocMatch, ElfFile, SectionDescriptor};
pub use error::{Error, Result};
pub use scanner::{scan, StringSpan};
pub use spell::{Dictionary, SpellChecker};
