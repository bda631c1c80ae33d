//! Binary container loader (C2).
//!
//! Parses a whole ECL file into an [`EclImage`]: a header, the `ANIM`/`ECLI`
//! include lists, and a subroutine name → entry-point table. The image owns
//! the raw bytes; every other structure in this crate borrows offsets into
//! it rather than raw pointers, the index-and-bounds-check model spec.md §9
//! prefers over pointer arithmetic — and the same shape `Gargafield-Lush`'s
//! `PeParser`/`PeImage` use for their own magic-checked, offset-table binary
//! format.

use crate::error::EclError;

/// 4-byte magic at the start of every ECL file.
pub const MAGIC_HEADER: &[u8; 4] = b"SCPT";
/// Include-region tag for the animation file name list.
pub const MAGIC_ANIM: &[u8; 4] = b"ANIM";
/// Include-region tag for the ECL include file name list.
pub const MAGIC_ECLI: &[u8; 4] = b"ECLI";
/// Magic at the start of every subroutine header.
pub const MAGIC_SUB: &[u8; 4] = b"ECLH";

/// Byte size of the fixed file header.
pub const HEADER_SIZE: usize = 36;
/// Byte size of a subroutine header (magic + data offset + 8 reserved).
const SUB_HEADER_SIZE: usize = 16;

/// The fixed-layout file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Format revision; observed value `1`.
    pub revision: u16,
    /// Total include-region size, counted from the start of the file.
    pub include_length: u16,
    /// Include-region offset; equals [`HEADER_SIZE`] in every known file.
    pub include_offset: u32,
    /// Number of subroutines in the subroutine table.
    pub sub_count: u32,
}

impl Header {
    fn read(buf: &[u8]) -> Result<Self, EclError> {
        if buf.len() < HEADER_SIZE {
            return Err(EclError::Io("file shorter than the fixed header".into()));
        }
        if &buf[0..4] != MAGIC_HEADER {
            return Err(EclError::InvalidMagic);
        }
        Ok(Header {
            revision: read_u16(buf, 4),
            include_length: read_u16(buf, 6),
            include_offset: read_u32(buf, 8),
            sub_count: read_u32(buf, 20),
        })
    }
}

/// One `ANIM` or `ECLI` include-region: a tag and the byte ranges (into the
/// image buffer, terminator excluded) of each null-terminated string it
/// lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeList {
    /// `ANIM` or `ECLI`.
    pub tag: [u8; 4],
    strings: Vec<(usize, usize)>,
}

impl IncludeList {
    /// Number of strings in this list.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// True if this list has no entries.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Borrow the `i`-th string (without its terminator) from `buf`, which
    /// must be the same buffer this list was parsed from.
    pub fn get<'a>(&self, buf: &'a [u8], i: usize) -> Option<&'a [u8]> {
        let (start, len) = *self.strings.get(i)?;
        Some(&buf[start..start + len])
    }
}

#[derive(Debug)]
struct SubEntry {
    name: String,
    /// Byte offset of the first instruction, i.e. just past the subroutine
    /// header.
    start: usize,
}

/// A fully loaded, immutable ECL file image.
///
/// Owns the raw bytes; every offset handed out by its methods indexes into
/// that same buffer, which lives as long as the `EclImage` does (spec.md
/// §9's "no cycles at the data level": tasks hold a read-only borrow of
/// this, the scheduler owns the tasks).
#[derive(Debug)]
pub struct EclImage {
    buf: Vec<u8>,
    header: Header,
    anim: IncludeList,
    ecli: IncludeList,
    subs: Vec<SubEntry>,
}

impl EclImage {
    /// Parse a whole file image per spec.md §4.1's algorithm.
    pub fn load(buf: Vec<u8>) -> Result<Self, EclError> {
        let header = Header::read(&buf)?;

        let mut cursor = header.include_offset as usize;
        let include_end = header.include_offset as usize + header.include_length as usize;
        let mut anim = None;
        let mut ecli = None;
        while cursor < include_end {
            let (tag, count) = read_include_tag(&buf, cursor)?;
            cursor += 8;
            let mut strings = Vec::with_capacity(count as usize);
            for _ in 0..count {
                let start = cursor;
                let len = cstr_len(&buf, start)?;
                strings.push((start, len));
                cursor = start + len + 1;
            }
            cursor = align4(cursor);
            let list = IncludeList { tag, strings };
            match &tag {
                t if t == MAGIC_ANIM => anim = Some(list),
                t if t == MAGIC_ECLI => ecli = Some(list),
                _ => return Err(EclError::UnknownInclude(tag)),
            }
        }
        let anim = anim.unwrap_or(IncludeList {
            tag: *MAGIC_ANIM,
            strings: Vec::new(),
        });
        let ecli = ecli.unwrap_or(IncludeList {
            tag: *MAGIC_ECLI,
            strings: Vec::new(),
        });

        let sub_count = header.sub_count as usize;
        let offsets_end = cursor + sub_count * 4;
        if buf.len() < offsets_end {
            return Err(EclError::Io("subroutine offset table truncated".into()));
        }
        let mut offsets = Vec::with_capacity(sub_count);
        for i in 0..sub_count {
            offsets.push(read_u32(&buf, cursor + i * 4) as usize);
        }
        cursor = offsets_end;

        let mut subs = Vec::with_capacity(sub_count);
        for &offset in &offsets {
            let name_len = cstr_len(&buf, cursor)?;
            let name = String::from_utf8_lossy(&buf[cursor..cursor + name_len]).into_owned();
            cursor += name_len + 1;

            if buf.len() < offset + SUB_HEADER_SIZE || &buf[offset..offset + 4] != MAGIC_SUB {
                return Err(EclError::InvalidSub(name));
            }
            subs.push(SubEntry {
                name,
                start: offset + SUB_HEADER_SIZE,
            });
        }

        Ok(EclImage {
            buf,
            header,
            anim,
            ecli,
            subs,
        })
    }

    /// The parsed file header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The `ANIM` include list.
    pub fn anim(&self) -> &IncludeList {
        &self.anim
    }

    /// The `ECLI` include list.
    pub fn ecli(&self) -> &IncludeList {
        &self.ecli
    }

    /// The raw file buffer, for borrowing instruction payloads out of.
    pub fn buf(&self) -> &[u8] {
        &self.buf
    }

    /// Subroutine names, in table order.
    pub fn sub_names(&self) -> impl Iterator<Item = &str> {
        self.subs.iter().map(|s| s.name.as_str())
    }

    /// Look up a subroutine's first-instruction offset by name. Linear scan;
    /// subroutine counts are small (spec.md §4.1: "typically < 64").
    pub fn sub_start(&self, name: &str) -> Option<usize> {
        self.subs.iter().find(|s| s.name == name).map(|s| s.start)
    }
}

fn read_include_tag(buf: &[u8], at: usize) -> Result<([u8; 4], u32), EclError> {
    if buf.len() < at + 8 {
        return Err(EclError::Io("include region header truncated".into()));
    }
    let mut tag = [0u8; 4];
    tag.copy_from_slice(&buf[at..at + 4]);
    Ok((tag, read_u32(buf, at + 4)))
}

fn cstr_len(buf: &[u8], start: usize) -> Result<usize, EclError> {
    buf[start..]
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| EclError::Io("unterminated string in container".into()))
}

const fn align4(n: usize) -> usize {
    (n + 3) & !3
}

fn read_u16(buf: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([buf[at], buf[at + 1]])
}

fn read_u32(buf: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}
