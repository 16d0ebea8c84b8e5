use crate::boxes::{BoxHeader, FourCC};
use crate::error::{ParseError, Result};
use crate::known_boxes::KnownBox;
use byteorder::{BigEndian, ReadBytesExt};
use std::io::{Read, Seek, SeekFrom};

/// Read one box header at the current position.
///
/// On return the cursor sits right after the header (8 or 16 bytes). A size
/// field of 0 is resolved against the end of the underlying stream.
pub fn read_box_header<R: Read + Seek>(r: &mut R) -> Result<BoxHeader> {
    read_header(r, None)
}

/// Like [`read_box_header`], but a size field of 0 extends the box to
/// `stream_end` instead of to the end of the underlying stream.
pub fn read_box_header_within<R: Read + Seek>(r: &mut R, stream_end: u64) -> Result<BoxHeader> {
    read_header(r, Some(stream_end))
}

fn read_header<R: Read + Seek>(r: &mut R, stream_end: Option<u64>) -> Result<BoxHeader> {
    let start = r.stream_position()?;
    let size32 = r.read_u32::<BigEndian>()?;
    let mut typ = [0u8; 4];
    r.read_exact(&mut typ)?;
    let typ = FourCC(typ);

    let (size, header_size) = match (size32, stream_end) {
        (0, Some(end)) => (end.saturating_sub(start), 8),
        (0, None) => {
            let end = r.seek(SeekFrom::End(0))?;
            r.seek(SeekFrom::Start(start + 8))?;
            (end.saturating_sub(start), 8)
        }
        (1, _) => (r.read_u64::<BigEndian>()?, 16),
        (n, _) => (n as u64, 8),
    };

    if size < header_size {
        return Err(ParseError::malformed(
            typ,
            format!("box size {} at offset {} is smaller than its {}-byte header", size, start, header_size),
        ));
    }

    Ok(BoxHeader {
        size,
        typ,
        header_size,
        start,
        is_container: KnownBox::from(typ).is_container(),
    })
}
