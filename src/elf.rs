// SPDX-License-Identifier: (Apache-2.0 OR MIT)

//! Locating the sections of an ELF file that are likely to hold string
//! literals.
//!
//! Only the identification bytes, the file header and the section header table
//! are decoded, using goblin's parsers for the file's own width and byte order.
//! 32-bit and 64-bit section headers are normalized into a single
//! [`SectionDescriptor`] by one of two small parsers, picked once when the file
//! is opened, so nothing downstream needs to care about the ELF class again.

use std::cell::RefCell;
use std::fmt;

use goblin::container::{Container, Ctx};
use goblin::elf::header::{
    EI_CLASS, EI_DATA, ELFCLASS32, ELFCLASS64, ELFDATA2LSB, ELFDATA2MSB, ELFMAG, SELFMAG,
    SIZEOF_IDENT,
};
use goblin::elf::section_header::{sht_to_str, SHF_ALLOC, SHT_PROGBITS};
use goblin::elf::{Elf, SectionHeader};
use log::{debug, trace};

use crate::error::{Error, Result};
use crate::source::ByteSource;

pub use goblin::container::Endian;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElfClass {
    Elf32,
    Elf64,
}

impl ElfClass {
    /// Size of the file header (`Elf{32,64}_Ehdr`).
    pub fn header_size(self) -> usize {
        match self {
            ElfClass::Elf32 => goblin::elf32::header::SIZEOF_EHDR,
            ElfClass::Elf64 => goblin::elf64::header::SIZEOF_EHDR,
        }
    }

    /// Size of one section header record (`Elf{32,64}_Shdr`).
    pub fn section_header_size(self) -> usize {
        match self {
            ElfClass::Elf32 => goblin::elf32::section_header::SIZEOF_SHDR,
            ElfClass::Elf64 => goblin::elf64::section_header::SIZEOF_SHDR,
        }
    }
}

/// How the `ALLOC` flag of a `PROGBITS` section is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AllocMatch {
    /// The flags must be exactly `SHF_ALLOC`. Writable data, mergeable string
    /// tables and anything else carrying an extra flag bit is skipped.
    #[default]
    Exact,
    /// `SHF_ALLOC` must be among the flags.
    AnyAlloc,
}

/// Width-agnostic view of one section header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionDescriptor {
    /// Position of the record in the section header table.
    pub index: usize,
    pub sh_type: u32,
    pub flags: u64,
    /// File offset of the section contents.
    pub offset: u64,
    pub size: u64,
}

impl SectionDescriptor {
    fn from_header(index: usize, shdr: &SectionHeader) -> Self {
        SectionDescriptor {
            index,
            sh_type: shdr.sh_type,
            flags: shdr.sh_flags,
            offset: shdr.sh_offset,
            size: shdr.sh_size,
        }
    }

    /// Program data that is allocated at runtime, i.e. most likely `.rodata`.
    pub fn is_candidate(&self, alloc_match: AllocMatch) -> bool {
        if self.sh_type != SHT_PROGBITS {
            return false;
        }
        let alloc = u64::from(SHF_ALLOC);
        match alloc_match {
            AllocMatch::Exact => self.flags == alloc,
            AllocMatch::AnyAlloc => self.flags & alloc != 0,
        }
    }
}

impl fmt::Display for SectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "section #{} ({}, flags={:#x}, offset={:#x}, size={:#x})",
            self.index,
            sht_to_str(self.sh_type),
            self.flags,
            self.offset,
            self.size
        )
    }
}

type ShdrParser = fn(usize, &[u8], Endian) -> Result<SectionDescriptor>;

/// Decodes an `Elf32_Shdr` record.
pub fn parse_shdr32(index: usize, rec: &[u8], endian: Endian) -> Result<SectionDescriptor> {
    parse_shdr(index, rec, Ctx::new(Container::Little, endian))
}

/// Decodes an `Elf64_Shdr` record.
pub fn parse_shdr64(index: usize, rec: &[u8], endian: Endian) -> Result<SectionDescriptor> {
    parse_shdr(index, rec, Ctx::new(Container::Big, endian))
}

fn parse_shdr(index: usize, rec: &[u8], ctx: Ctx) -> Result<SectionDescriptor> {
    // `parse` reads offset 0 as "no section header table".
    let shdr = SectionHeader::parse_from(rec, 0, 1, ctx)?
        .into_iter()
        .next()
        .ok_or(Error::TruncatedFile("section header"))?;
    Ok(SectionDescriptor::from_header(index, &shdr))
}

/// An ELF file whose header has been validated.
///
/// The source sits behind a `RefCell` so that iterating the section headers and
/// loading section contents can interleave. All reads are positioned, so they
/// never observe each other.
pub struct ElfFile<S> {
    source: RefCell<S>,
    class: ElfClass,
    endian: Endian,
    shoff: u64,
    file_len: u64,
    parse_shdr: ShdrParser,
}

impl<S: ByteSource> ElfFile<S> {
    /// Reads and validates the identification bytes and the file header.
    pub fn open(mut source: S) -> Result<Self> {
        let mut ident = [0u8; SIZEOF_IDENT];
        if source.read_at(0, &mut ident)? != SIZEOF_IDENT {
            return Err(Error::TruncatedFile("ELF identification"));
        }
        if &ident[..SELFMAG] != ELFMAG {
            return Err(Error::InvalidFormat);
        }

        let class = match ident[EI_CLASS] {
            ELFCLASS32 => ElfClass::Elf32,
            ELFCLASS64 => ElfClass::Elf64,
            value => {
                return Err(Error::UnsupportedFormat {
                    field: "EI_CLASS",
                    value,
                })
            }
        };
        let endian = match ident[EI_DATA] {
            ELFDATA2LSB => Endian::Little,
            ELFDATA2MSB => Endian::Big,
            value => {
                return Err(Error::UnsupportedFormat {
                    field: "EI_DATA",
                    value,
                })
            }
        };

        let mut header = vec![0u8; class.header_size()];
        if source.read_at(0, &mut header)? != header.len() {
            return Err(Error::TruncatedFile("ELF header"));
        }
        let shoff = Elf::parse_header(&header)?.e_shoff;
        let parse_shdr: ShdrParser = match class {
            ElfClass::Elf32 => parse_shdr32,
            ElfClass::Elf64 => parse_shdr64,
        };
        let file_len = source.size()?;

        debug!(
            "ELF header: class={:?}, endian={:?}, e_shoff={:#x}, file length={:#x}",
            class, endian, shoff, file_len
        );

        Ok(ElfFile {
            source: RefCell::new(source),
            class,
            endian,
            shoff,
            file_len,
            parse_shdr,
        })
    }

    pub fn class(&self) -> ElfClass {
        self.class
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Offset of the section header table.
    pub fn shoff(&self) -> u64 {
        self.shoff
    }

    /// Walks the section header table, yielding the sections that pass
    /// [`SectionDescriptor::is_candidate`].
    pub fn sections(&self, alloc_match: AllocMatch) -> Sections<'_, S> {
        Sections {
            elf: self,
            alloc_match,
            offset: self.shoff,
            index: 0,
            // An e_shoff of zero means the file has no section header table.
            done: self.shoff == 0,
        }
    }

    /// Reads the contents of `section` into a freshly allocated buffer.
    pub fn load_section(&self, section: &SectionDescriptor) -> Result<Vec<u8>> {
        let end = section
            .offset
            .checked_add(section.size)
            .ok_or(Error::TruncatedFile("section extends past end of file"))?;
        if end > self.file_len {
            return Err(Error::TruncatedFile("section extends past end of file"));
        }

        // Only reachable when the source reports a length no buffer can hold.
        let len = usize::try_from(section.size).map_err(|_| Error::Allocation {
            size: section.size,
        })?;
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|_| Error::Allocation {
            size: section.size,
        })?;
        data.resize(len, 0);

        let read = self
            .source
            .borrow_mut()
            .read_at(section.offset, &mut data)?;
        if read != len {
            return Err(Error::TruncatedFile("section contents"));
        }
        Ok(data)
    }

    /// Reads the section header record at `offset`. `None` on a clean end of
    /// file, an error if the record is cut short.
    fn read_section_header(&self, offset: u64, index: usize) -> Result<Option<SectionDescriptor>> {
        let mut rec = [0u8; goblin::elf64::section_header::SIZEOF_SHDR];
        let rec = &mut rec[..self.class.section_header_size()];
        match self.source.borrow_mut().read_at(offset, rec)? {
            0 => Ok(None),
            n if n == rec.len() => (self.parse_shdr)(index, rec, self.endian).map(Some),
            _ => Err(Error::TruncatedFile("section header")),
        }
    }
}

/// Lazy sequence of candidate sections, see [`ElfFile::sections`].
///
/// Records are read until the end of the file, the way the section header
/// table is usually laid out at the tail of an object.
pub struct Sections<'a, S> {
    elf: &'a ElfFile<S>,
    alloc_match: AllocMatch,
    offset: u64,
    index: usize,
    done: bool,
}

impl<S: ByteSource> Iterator for Sections<'_, S> {
    type Item = Result<SectionDescriptor>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let section = match self.elf.read_section_header(self.offset, self.index) {
                Ok(Some(section)) => section,
                Ok(None) => {
                    self.done = true;
                    break;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            };
            self.index += 1;
            match self
                .offset
                .checked_add(self.elf.class.section_header_size() as u64)
            {
                Some(next) => self.offset = next,
                None => self.done = true,
            }

            if section.is_candidate(self.alloc_match) {
                debug!("Scanning {}", section);
                return Some(Ok(section));
            }
            trace!("Skipping {}", section);
        }
        None
    }
}
