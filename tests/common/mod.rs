// SPDX-License-Identifier: (Apache-2.0 OR MIT)

// Builds minimal ELF images: a file header, the section contents, then the
// section header table (with the usual null section first).

#![allow(dead_code)]

use byteorder::{BigEndian, ByteOrder, LittleEndian, WriteBytesExt};

pub const SHT_PROGBITS: u32 = 1;
pub const SHT_NOBITS: u32 = 8;
pub const SHF_WRITE: u64 = 0x1;
pub const SHF_ALLOC: u64 = 0x2;
pub const SHF_MERGE: u64 = 0x10;
pub const SHF_STRINGS: u64 = 0x20;

struct Section {
    sh_type: u32,
    flags: u64,
    data: Vec<u8>,
    /// Offset and size written as is instead of pointing at `data`.
    raw: Option<(u64, u64)>,
}

pub struct ElfBuilder {
    class64: bool,
    big_endian: bool,
    sections: Vec<Section>,
}

impl ElfBuilder {
    pub fn new64() -> Self {
        ElfBuilder {
            class64: true,
            big_endian: false,
            sections: Vec::new(),
        }
    }

    pub fn new32() -> Self {
        ElfBuilder {
            class64: false,
            big_endian: false,
            sections: Vec::new(),
        }
    }

    pub fn big_endian(mut self) -> Self {
        self.big_endian = true;
        self
    }

    pub fn section(mut self, sh_type: u32, flags: u64, data: &[u8]) -> Self {
        self.sections.push(Section {
            sh_type,
            flags,
            data: data.to_vec(),
            raw: None,
        });
        self
    }

    pub fn raw_section(mut self, sh_type: u32, flags: u64, offset: u64, size: u64) -> Self {
        self.sections.push(Section {
            sh_type,
            flags,
            data: Vec::new(),
            raw: Some((offset, size)),
        });
        self
    }

    /// A typical layout: `.rodata`, `.data`, `.comment` and `.bss`, each with a
    /// string of its own.
    pub fn typical(self) -> Self {
        self.section(SHT_PROGBITS, SHF_ALLOC, b"\x01\x02rodata string\0")
            .section(SHT_PROGBITS, SHF_ALLOC | SHF_WRITE, b"data string\0")
            .section(SHT_PROGBITS, 0, b"GCC: (GNU) 13.2.0\0")
            .section(SHT_PROGBITS, SHF_ALLOC | SHF_MERGE | SHF_STRINGS, b"merged string\0")
            .section(SHT_NOBITS, SHF_ALLOC | SHF_WRITE, b"")
    }

    pub fn build(&self) -> Vec<u8> {
        if self.big_endian {
            self.build_with::<BigEndian>()
        } else {
            self.build_with::<LittleEndian>()
        }
    }

    fn build_with<E: ByteOrder>(&self) -> Vec<u8> {
        let header_size: u64 = if self.class64 { 64 } else { 52 };
        let shentsize: u16 = if self.class64 { 64 } else { 40 };

        let mut placed = Vec::new();
        let mut offset = header_size;
        for section in &self.sections {
            match section.raw {
                Some(raw) => placed.push(raw),
                None => {
                    placed.push((offset, section.data.len() as u64));
                    offset += section.data.len() as u64;
                }
            }
        }
        let shoff = offset;
        let shnum = self.sections.len() as u16 + 1;

        let mut out = Vec::new();
        out.extend_from_slice(b"\x7fELF");
        out.push(if self.class64 { 2 } else { 1 });
        out.push(if self.big_endian { 2 } else { 1 });
        out.push(1);
        out.extend_from_slice(&[0; 9]);
        out.write_u16::<E>(1).unwrap(); // ET_REL
        out.write_u16::<E>(62).unwrap(); // EM_X86_64
        out.write_u32::<E>(1).unwrap();
        if self.class64 {
            out.write_u64::<E>(0).unwrap();
            out.write_u64::<E>(0).unwrap();
            out.write_u64::<E>(shoff).unwrap();
        } else {
            out.write_u32::<E>(0).unwrap();
            out.write_u32::<E>(0).unwrap();
            out.write_u32::<E>(shoff as u32).unwrap();
        }
        out.write_u32::<E>(0).unwrap();
        out.write_u16::<E>(header_size as u16).unwrap();
        out.write_u16::<E>(0).unwrap();
        out.write_u16::<E>(0).unwrap();
        out.write_u16::<E>(shentsize).unwrap();
        out.write_u16::<E>(shnum).unwrap();
        out.write_u16::<E>(0).unwrap();
        assert_eq!(out.len() as u64, header_size);

        for section in &self.sections {
            out.extend_from_slice(&section.data);
        }

        self.write_shdr::<E>(&mut out, 0, 0, 0, 0);
        for (section, &(offset, size)) in self.sections.iter().zip(&placed) {
            self.write_shdr::<E>(&mut out, section.sh_type, section.flags, offset, size);
        }
        out
    }

    fn write_shdr<E: ByteOrder>(
        &self,
        out: &mut Vec<u8>,
        sh_type: u32,
        flags: u64,
        offset: u64,
        size: u64,
    ) {
        out.write_u32::<E>(0).unwrap();
        out.write_u32::<E>(sh_type).unwrap();
        if self.class64 {
            out.write_u64::<E>(flags).unwrap();
            out.write_u64::<E>(0).unwrap();
            out.write_u64::<E>(offset).unwrap();
            out.write_u64::<E>(size).unwrap();
            out.write_u32::<E>(0).unwrap();
            out.write_u32::<E>(0).unwrap();
            out.write_u64::<E>(1).unwrap();
            out.write_u64::<E>(0).unwrap();
        } else {
            out.write_u32::<E>(flags as u32).unwrap();
            out.write_u32::<E>(0).unwrap();
            out.write_u32::<E>(offset as u32).unwrap();
            out.write_u32::<E>(size as u32).unwrap();
            out.write_u32::<E>(0).unwrap();
            out.write_u32::<E>(0).unwrap();
            out.write_u32::<E>(1).unwrap();
            out.write_u32::<E>(0).unwrap();
        }
    }
}
