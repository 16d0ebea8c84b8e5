//! Bounds-checked big-endian reads over one box payload.
//!
//! Every read that would run past the payload becomes
//! [`ParseError::MalformedPayload`] for the owning box, never a zero fill.

use crate::boxes::{BoxHeader, FourCC};
use crate::error::{ParseError, Result};
use crate::parser::read_box_header_within;
use byteorder::{BigEndian, ReadBytesExt};
use std::io::{Cursor, Read, Seek, SeekFrom};

pub struct PayloadReader<'a> {
    typ: FourCC,
    cur: Cursor<&'a [u8]>,
}

impl<'a> PayloadReader<'a> {
    pub fn new(typ: FourCC, payload: &'a [u8]) -> Self {
        Self {
            typ,
            cur: Cursor::new(payload),
        }
    }

    pub fn position(&self) -> u64 {
        self.cur.position()
    }

    pub fn len(&self) -> u64 {
        self.cur.get_ref().len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn remaining(&self) -> u64 {
        self.len().saturating_sub(self.position())
    }

    fn short(&self, what: &str, need: u64) -> ParseError {
        ParseError::malformed(
            self.typ,
            format!(
                "payload ends before {} ({} bytes needed at offset {}, {} left)",
                what,
                need,
                self.position(),
                self.remaining()
            ),
        )
    }

    fn ensure(&self, what: &str, need: u64) -> Result<()> {
        if self.remaining() < need {
            return Err(self.short(what, need));
        }
        Ok(())
    }

    pub fn u8(&mut self, what: &str) -> Result<u8> {
        self.ensure(what, 1)?;
        Ok(self.cur.read_u8()?)
    }

    pub fn u16(&mut self, what: &str) -> Result<u16> {
        self.ensure(what, 2)?;
        Ok(self.cur.read_u16::<BigEndian>()?)
    }

    pub fn i16(&mut self, what: &str) -> Result<i16> {
        self.ensure(what, 2)?;
        Ok(self.cur.read_i16::<BigEndian>()?)
    }

    pub fn u32(&mut self, what: &str) -> Result<u32> {
        self.ensure(what, 4)?;
        Ok(self.cur.read_u32::<BigEndian>()?)
    }

    pub fn i32(&mut self, what: &str) -> Result<i32> {
        self.ensure(what, 4)?;
        Ok(self.cur.read_i32::<BigEndian>()?)
    }

    pub fn u64(&mut self, what: &str) -> Result<u64> {
        self.ensure(what, 8)?;
        Ok(self.cur.read_u64::<BigEndian>()?)
    }

    /// A u32 in version 0 boxes, a u64 in version 1 boxes.
    pub fn versioned_u64(&mut self, version: u8, what: &str) -> Result<u64> {
        if version == 1 {
            self.u64(what)
        } else {
            Ok(self.u32(what)? as u64)
        }
    }

    pub fn fourcc(&mut self, what: &str) -> Result<FourCC> {
        let mut b = [0u8; 4];
        self.ensure(what, 4)?;
        self.cur.read_exact(&mut b)?;
        Ok(FourCC(b))
    }

    pub fn skip(&mut self, n: u64, what: &str) -> Result<()> {
        self.ensure(what, n)?;
        self.cur.seek(SeekFrom::Current(n as i64))?;
        Ok(())
    }

    /// FullBox prefix: version byte and the three flag bytes as one u32.
    pub fn version_and_flags(&mut self) -> Result<(u8, u32)> {
        self.ensure("version and flags", 4)?;
        let v = self.cur.read_u32::<BigEndian>()?;
        Ok(((v >> 24) as u8, v & 0x00ff_ffff))
    }

    pub fn rest(&mut self) -> Vec<u8> {
        let pos = self.position() as usize;
        let out = self.cur.get_ref().get(pos..).unwrap_or_default().to_vec();
        self.cur.set_position(self.len());
        out
    }

    /// Read the header of a nested box and step over its body.
    ///
    /// The nested box must lie entirely within this payload.
    pub fn child_header(&mut self, what: &str) -> Result<BoxHeader> {
        self.ensure(what, 8)?;
        let len = self.len();
        let hdr = read_box_header_within(&mut self.cur, len).map_err(|e| match e {
            ParseError::TruncatedStream(_) => self.short(what, 16),
            other => other,
        })?;
        if hdr.end() > self.len() {
            return Err(ParseError::malformed(
                self.typ,
                format!(
                    "{} {} of {} bytes at offset {} overruns the {}-byte payload",
                    what,
                    hdr.typ,
                    hdr.size,
                    hdr.start,
                    self.len()
                ),
            ));
        }
        self.cur.set_position(hdr.end());
        Ok(hdr)
    }
}
