// SPDX-License-Identifier: (Apache-2.0 OR MIT)

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

use log::{error, info};

use crate::config::Config;
use crate::elf::ElfFile;
use crate::error::{Error, Result};
use crate::render::Renderer;
use crate::scanner::scan;
use crate::source::ByteSource;

/// Prints the strings of every candidate section of `elf`. Returns how many
/// strings were printed.
pub fn scan_elf<S: ByteSource, W: Write>(
    elf: &ElfFile<S>,
    config: &Config,
    renderer: &mut Renderer<'_, W>,
) -> Result<usize> {
    let mut count = 0;
    for section in elf.sections(config.alloc_match) {
        let section = section?;
        let data = elf.load_section(&section)?;
        for span in scan(&data, config.min_length) {
            renderer.render(span.bytes(&data))?;
            count += 1;
        }
    }
    Ok(count)
}

/// Same as [`scan_elf`], validating the ELF header of `source` first.
pub fn scan_source<S: ByteSource, W: Write>(
    source: S,
    config: &Config,
    renderer: &mut Renderer<'_, W>,
) -> Result<usize> {
    let elf = ElfFile::open(source)?;
    scan_elf(&elf, config, renderer)
}

/// Opens and scans one file. The `== Parsing <path> ==` banner is only printed
/// once the ELF header has been accepted.
pub fn scan_file<W: Write>(
    path: &Path,
    config: &Config,
    renderer: &mut Renderer<'_, W>,
) -> Result<usize> {
    let file = File::open(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let elf = ElfFile::open(BufReader::new(file))?;
    renderer.write_line(&format!("== Parsing {} ==", path.display()))?;
    let count = scan_elf(&elf, config, renderer)?;
    info!("{}: {} strings", path.display(), count);
    Ok(count)
}

/// Scans `paths` in order, writing to `out`.
///
/// The first error ends the run unless `config.keep_going` is set, in which
/// case it is logged, the remaining files are still scanned, and the first
/// error is returned at the end.
pub fn run<P: AsRef<Path>, W: Write>(paths: &[P], config: &Config, out: W) -> Result<usize> {
    let mut renderer = Renderer::new(out, &config.annotation);
    let mut total = 0;
    let mut first_error = None;

    for path in paths {
        let path = path.as_ref();
        match scan_file(path, config, &mut renderer) {
            Ok(count) => total += count,
            Err(e) if config.keep_going => {
                error!("{}: {}", path.display(), e);
                first_error.get_or_insert(e);
            }
            Err(e) => return Err(e),
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(total),
    }
}
