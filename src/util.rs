use std::io::{Read, Seek, SeekFrom};

pub fn read_slice<R: Read + Seek>(r: &mut R, offset: u64, len: u64) -> std::io::Result<Vec<u8>> {
    r.seek(SeekFrom::Start(offset))?;
    let mut v = Vec::new();
    r.take(len).read_to_end(&mut v)?;
    if (v.len() as u64) < len {
        return Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            format!("wanted {} bytes at offset {}, got {}", len, offset, v.len()),
        ));
    }
    Ok(v)
}

/// Offset/hex/ASCII rows for at most `limit` bytes of `bytes`, which start at
/// stream offset `base`. A final line notes how much was left out.
pub fn hex_dump(bytes: &[u8], base: u64, limit: usize) -> String {
    let shown = &bytes[..bytes.len().min(limit)];
    let mut out = String::with_capacity(shown.len() / 16 * 80 + 80);
    for (row, chunk) in (0u64..).zip(shown.chunks(16)) {
        out.push_str(&format!("{:08x} ", base + row * 16));
        for b in chunk {
            out.push_str(&format!(" {:02x}", b));
        }
        let pad = 3 * (16 - chunk.len());
        out.extend(std::iter::repeat_n(' ', pad + 2));
        out.push('|');
        out.extend(chunk.iter().map(|&b| if b.is_ascii_graphic() || b == b' ' { char::from(b) } else { '.' }));
        out.push_str("|\n");
    }
    if bytes.len() > shown.len() {
        out.push_str(&format!("... {} more bytes\n", bytes.len() - shown.len()));
    }
    out
}
