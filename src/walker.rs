use crate::aggregate::Aggregate;
use crate::boxes::{BoxHeader, NodeKind};
use crate::error::{ParseError, Result};
use crate::known_boxes::KnownBox;
use crate::parser::read_box_header_within;
use crate::registry::Registry;
use crate::util::{hex_dump, read_slice};
use std::io::{Read, Seek, SeekFrom};
use tracing::{debug, trace};

/// Knobs for a single walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkOptions {
    /// Deepest container nesting accepted below the root.
    pub max_depth: usize,
}

impl WalkOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 64;

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}

/// Depth-first walker over the box tree of one stream.
pub struct Walker<'a, R> {
    reader: &'a mut R,
    registry: &'a Registry,
    options: &'a WalkOptions,
    stream_len: u64,
}

impl<'a, R: Read + Seek> Walker<'a, R> {
    pub fn new(
        reader: &'a mut R,
        stream_len: u64,
        registry: &'a Registry,
        options: &'a WalkOptions,
    ) -> Self {
        Self {
            reader,
            registry,
            options,
            stream_len,
        }
    }

    /// Walk the whole stream as children of a synthetic root box.
    pub fn walk_stream(&mut self, agg: &mut Aggregate) -> Result<u64> {
        let root = BoxHeader::root(self.stream_len);
        self.walk(&root, agg)
    }

    /// Consume the box described by `hdr` (and all of its supported
    /// descendants) and return the number of bytes consumed, which is the
    /// box's declared size.
    pub fn walk(&mut self, hdr: &BoxHeader, agg: &mut Aggregate) -> Result<u64> {
        self.walk_at(hdr, agg, 0)
    }

    fn walk_at(&mut self, hdr: &BoxHeader, agg: &mut Aggregate, depth: usize) -> Result<u64> {
        if depth > self.options.max_depth {
            return Err(ParseError::malformed(
                hdr.typ,
                format!("nested deeper than {} boxes", self.options.max_depth),
            ));
        }

        self.dispatch(hdr, agg)?;

        if !hdr.is_container {
            self.reader.seek(SeekFrom::Start(hdr.end()))?;
            return Ok(hdr.size);
        }

        self.reader.seek(SeekFrom::Start(hdr.payload_offset()))?;
        let mut consumed = hdr.header_size;

        while consumed < hdr.size {
            let child = read_box_header_within(&mut *self.reader, self.stream_len)?;
            self.check_child(hdr, &child, consumed)?;

            let kb = KnownBox::from(child.typ);
            let size = if kb.is_supported() {
                debug!(typ = %child.typ, name = kb.full_name(), offset = child.start, size = child.size, depth, "entering box");
                self.walk_at(&child, agg, depth + 1)?
            } else {
                trace!(typ = %child.typ, offset = child.start, size = child.size, depth, "skipping box");
                self.reader.seek(SeekFrom::Start(child.end()))?;
                child.size
            };

            consumed += size;
        }

        Ok(consumed)
    }

    /// A child must make progress and stay inside both its parent and the stream.
    fn check_child(&self, parent: &BoxHeader, child: &BoxHeader, consumed: u64) -> Result<()> {
        if child.end() > self.stream_len {
            return Err(ParseError::TruncatedStream(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!(
                    "{} box at offset {} declares {} bytes but the stream ends at {}",
                    child.typ, child.start, child.size, self.stream_len
                ),
            )));
        }
        if child.size == 0 || child.size > parent.size - consumed {
            return Err(ParseError::malformed(
                parent.typ,
                format!(
                    "child {} at offset {} ({} bytes) does not fit the {} bytes left",
                    child.typ,
                    child.start,
                    child.size,
                    parent.size - consumed
                ),
            ));
        }
        Ok(())
    }

    /// Run the payload action for a box: open a track or fragment, or decode
    /// and attach a record.
    fn dispatch(&mut self, hdr: &BoxHeader, agg: &mut Aggregate) -> Result<()> {
        let kb = KnownBox::from(hdr.typ);
        match kb {
            KnownBox::Trak => agg.begin_track(),
            KnownBox::Traf => agg.begin_fragment(),
            _ if kb.kind() == NodeKind::Payload && self.registry.contains(&hdr.typ) => {
                let payload = read_slice(&mut *self.reader, hdr.payload_offset(), hdr.payload_len())?;
                trace!(
                    typ = %hdr.typ,
                    decoder = self.registry.decoder_name(&hdr.typ).unwrap_or("?"),
                    "payload:\n{}",
                    hex_dump(&payload, hdr.payload_offset(), 64)
                );
                if let Some(value) = self.registry.decode(&hdr.typ, &payload, hdr) {
                    agg.attach(value?, hdr)?;
                }
            }
            _ => {}
        }
        Ok(())
    }
}
