//! Typed records for the supported payload boxes and the decoders that fill them.

use crate::boxes::{BoxHeader, FourCC};
use crate::error::Result;
use crate::reader::PayloadReader;
use crate::registry::{BoxDecoder, BoxValue};
use serde::Serialize;

/// Handler type carried by video tracks.
pub const VIDEO_HANDLER: FourCC = FourCC::new(b"vide");

// tfhd flags (low byte)
pub const TFHD_BASE_DATA_OFFSET: u32 = 0x00_0001;
pub const TFHD_SAMPLE_DESCRIPTION_INDEX: u32 = 0x00_0002;
pub const TFHD_DEFAULT_SAMPLE_DURATION: u32 = 0x00_0008;
pub const TFHD_DEFAULT_SAMPLE_SIZE: u32 = 0x00_0010;
pub const TFHD_DEFAULT_SAMPLE_FLAGS: u32 = 0x00_0020;

// trun flags (low byte, then middle byte for per-sample fields)
pub const TRUN_DATA_OFFSET: u32 = 0x00_0001;
pub const TRUN_FIRST_SAMPLE_FLAGS: u32 = 0x00_0004;
pub const TRUN_SAMPLE_DURATION: u32 = 0x00_0100;
pub const TRUN_SAMPLE_SIZE: u32 = 0x00_0200;
pub const TRUN_SAMPLE_FLAGS: u32 = 0x00_0400;
pub const TRUN_SAMPLE_COMPOSITION_TIME_OFFSET: u32 = 0x00_0800;

/// Movie Header Box (mvhd)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovieHeader {
    pub version: u8,
    pub flags: u32,
    pub creation_time: u64,
    pub modification_time: u64,
    pub timescale: u32,
    pub duration: u64,
    /// 16.16 fixed point, 0x00010000 is normal playback
    pub rate: u32,
    /// 8.8 fixed point
    pub volume: u16,
    pub matrix: [u32; 9],
    pub pre_defined: [u32; 6],
    pub next_track_id: u32,
}

impl MovieHeader {
    pub fn parse(r: &mut PayloadReader<'_>) -> Result<Self> {
        let (version, flags) = r.version_and_flags()?;
        let creation_time = r.versioned_u64(version, "creation_time")?;
        let modification_time = r.versioned_u64(version, "modification_time")?;
        let timescale = r.u32("timescale")?;
        let duration = r.versioned_u64(version, "duration")?;
        let rate = r.u32("rate")?;
        let volume = r.u16("volume")?;
        // u16 + 2 * u32 reserved
        r.skip(10, "reserved")?;

        let mut matrix = [0u32; 9];
        for m in matrix.iter_mut() {
            *m = r.u32("matrix")?;
        }
        let mut pre_defined = [0u32; 6];
        for p in pre_defined.iter_mut() {
            *p = r.u32("pre_defined")?;
        }
        let next_track_id = r.u32("next_track_id")?;

        Ok(MovieHeader {
            version,
            flags,
            creation_time,
            modification_time,
            timescale,
            duration,
            rate,
            volume,
            matrix,
            pre_defined,
            next_track_id,
        })
    }
}

/// Track Header Box (tkhd)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackHeader {
    pub version: u8,
    pub flags: u32,
    pub creation_time: u64,
    pub modification_time: u64,
    pub track_id: u32,
    pub duration: u64,
    pub layer: i16,
    pub alternate_group: i16,
    pub volume: i16,
    pub matrix: [i32; 9],
    /// Integer pixels (16.16 value truncated)
    pub width: u32,
    /// Integer pixels (16.16 value truncated)
    pub height: u32,
}

impl TrackHeader {
    pub fn parse(r: &mut PayloadReader<'_>) -> Result<Self> {
        let (version, flags) = r.version_and_flags()?;
        let creation_time = r.versioned_u64(version, "creation_time")?;
        let modification_time = r.versioned_u64(version, "modification_time")?;
        let track_id = r.u32("track_id")?;
        r.skip(4, "reserved")?;
        let duration = r.versioned_u64(version, "duration")?;
        r.skip(8, "reserved")?;
        let layer = r.i16("layer")?;
        let alternate_group = r.i16("alternate_group")?;
        let volume = r.i16("volume")?;
        r.skip(2, "reserved")?;

        let mut matrix = [0i32; 9];
        for m in matrix.iter_mut() {
            *m = r.i32("matrix")?;
        }

        let width = r.u32("width")? / 0x10000;
        let height = r.u32("height")? / 0x10000;

        Ok(TrackHeader {
            version,
            flags,
            creation_time,
            modification_time,
            track_id,
            duration,
            layer,
            alternate_group,
            volume,
            matrix,
            width,
            height,
        })
    }
}

/// Handler Reference Box (hdlr)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Handler {
    pub version: u8,
    pub flags: u32,
    pub pre_defined: u32,
    pub handler_type: FourCC,
    pub reserved: [u32; 3],
    pub name: String,
}

impl Handler {
    pub fn parse(r: &mut PayloadReader<'_>) -> Result<Self> {
        let (version, flags) = r.version_and_flags()?;
        let pre_defined = r.u32("pre_defined")?;
        let handler_type = r.fourcc("handler_type")?;
        let mut reserved = [0u32; 3];
        for v in reserved.iter_mut() {
            *v = r.u32("reserved")?;
        }

        // name: null-terminated string (or just rest of box)
        let mut name_bytes = r.rest();
        while name_bytes.last() == Some(&0) {
            name_bytes.pop();
        }
        let name = String::from_utf8_lossy(&name_bytes).to_string();

        Ok(Handler {
            version,
            flags,
            pre_defined,
            handler_type,
            reserved,
            name,
        })
    }

    pub fn is_video(&self) -> bool {
        self.handler_type == VIDEO_HANDLER
    }
}

/// One entry of a Sample Description Box; only its header is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleEntry {
    pub codec: FourCC,
    pub size: u64,
}

/// Sample Description Box (stsd)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleDescription {
    pub version: u8,
    pub flags: u32,
    pub entry_count: u32,
    pub entries: Vec<SampleEntry>,
}

impl SampleDescription {
    pub fn parse(r: &mut PayloadReader<'_>) -> Result<Self> {
        let (version, flags) = r.version_and_flags()?;
        let entry_count = r.u32("entry_count")?;

        // every entry carries at least an 8-byte header
        let cap = (entry_count as u64).min(r.remaining() / 8) as usize;
        let mut entries = Vec::with_capacity(cap);
        for _ in 0..entry_count {
            let h = r.child_header("sample entry")?;
            entries.push(SampleEntry {
                codec: h.typ,
                size: h.size,
            });
        }

        Ok(SampleDescription {
            version,
            flags,
            entry_count,
            entries,
        })
    }

    pub fn codecs(&self) -> impl Iterator<Item = FourCC> + '_ {
        self.entries.iter().map(|e| e.codec)
    }
}

/// Track Fragment Header Box (tfhd)
///
/// Optional fields that the flags leave out read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FragmentHeader {
    pub version: u8,
    pub flags: u32,
    pub track_id: u32,
    pub base_data_offset: u64,
    pub sample_description_index: u32,
    pub default_sample_duration: u32,
    pub default_sample_size: u32,
    pub default_sample_flags: u32,
}

impl FragmentHeader {
    pub fn parse(r: &mut PayloadReader<'_>) -> Result<Self> {
        let (version, flags) = r.version_and_flags()?;
        let mut tfhd = FragmentHeader {
            version,
            flags,
            track_id: r.u32("track_id")?,
            ..Default::default()
        };

        if flags & TFHD_BASE_DATA_OFFSET != 0 {
            tfhd.base_data_offset = r.u64("base_data_offset")?;
        }
        if flags & TFHD_SAMPLE_DESCRIPTION_INDEX != 0 {
            tfhd.sample_description_index = r.u32("sample_description_index")?;
        }
        if flags & TFHD_DEFAULT_SAMPLE_DURATION != 0 {
            tfhd.default_sample_duration = r.u32("default_sample_duration")?;
        }
        if flags & TFHD_DEFAULT_SAMPLE_SIZE != 0 {
            tfhd.default_sample_size = r.u32("default_sample_size")?;
        }
        if flags & TFHD_DEFAULT_SAMPLE_FLAGS != 0 {
            tfhd.default_sample_flags = r.u32("default_sample_flags")?;
        }

        Ok(tfhd)
    }

    pub fn has_default_duration(&self) -> bool {
        self.flags & TFHD_DEFAULT_SAMPLE_DURATION != 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSample {
    pub duration: u32,
    pub size: u32,
    pub flags: u32,
    /// Unsigned in version 0 runs, signed in version 1.
    pub composition_time_offset: i64,
}

/// Track Fragment Run Box (trun)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FragmentRun {
    pub version: u8,
    pub flags: u32,
    pub sample_count: u32,
    pub data_offset: i32,
    pub first_sample_flags: u32,
    /// Empty when the flags carry no per-sample field.
    pub samples: Vec<RunSample>,
}

impl FragmentRun {
    pub fn parse(r: &mut PayloadReader<'_>) -> Result<Self> {
        let (version, flags) = r.version_and_flags()?;
        let mut trun = FragmentRun {
            version,
            flags,
            sample_count: r.u32("sample_count")?,
            ..Default::default()
        };

        if flags & TRUN_DATA_OFFSET != 0 {
            trun.data_offset = r.i32("data_offset")?;
        }
        if flags & TRUN_FIRST_SAMPLE_FLAGS != 0 {
            trun.first_sample_flags = r.u32("first_sample_flags")?;
        }

        let per_sample = 4 * (flags & 0x0f00).count_ones() as u64;
        if per_sample == 0 {
            return Ok(trun);
        }

        let cap = (trun.sample_count as u64).min(r.remaining() / per_sample) as usize;
        trun.samples.reserve_exact(cap);
        for _ in 0..trun.sample_count {
            let mut s = RunSample::default();
            if flags & TRUN_SAMPLE_DURATION != 0 {
                s.duration = r.u32("sample_duration")?;
            }
            if flags & TRUN_SAMPLE_SIZE != 0 {
                s.size = r.u32("sample_size")?;
            }
            if flags & TRUN_SAMPLE_FLAGS != 0 {
                s.flags = r.u32("sample_flags")?;
            }
            if flags & TRUN_SAMPLE_COMPOSITION_TIME_OFFSET != 0 {
                s.composition_time_offset = if version == 1 {
                    r.i32("sample_composition_time_offset")? as i64
                } else {
                    r.u32("sample_composition_time_offset")? as i64
                };
            }
            trun.samples.push(s);
        }

        Ok(trun)
    }

    /// Sum of the per-sample durations in timescale units.
    pub fn total_sample_duration(&self) -> u64 {
        self.samples.iter().map(|s| s.duration as u64).sum()
    }
}

// ---------- Decoders ----------

pub struct MvhdDecoder;

impl BoxDecoder for MvhdDecoder {
    fn decode(&self, payload: &[u8], hdr: &BoxHeader) -> Result<BoxValue> {
        let mut r = PayloadReader::new(hdr.typ, payload);
        Ok(BoxValue::MovieHeader(MovieHeader::parse(&mut r)?))
    }
}

pub struct TkhdDecoder;

impl BoxDecoder for TkhdDecoder {
    fn decode(&self, payload: &[u8], hdr: &BoxHeader) -> Result<BoxValue> {
        let mut r = PayloadReader::new(hdr.typ, payload);
        Ok(BoxValue::TrackHeader(TrackHeader::parse(&mut r)?))
    }
}

pub struct HdlrDecoder;

impl BoxDecoder for HdlrDecoder {
    fn decode(&self, payload: &[u8], hdr: &BoxHeader) -> Result<BoxValue> {
        let mut r = PayloadReader::new(hdr.typ, payload);
        Ok(BoxValue::Handler(Handler::parse(&mut r)?))
    }
}

pub struct StsdDecoder;

impl BoxDecoder for StsdDecoder {
    fn decode(&self, payload: &[u8], hdr: &BoxHeader) -> Result<BoxValue> {
        let mut r = PayloadReader::new(hdr.typ, payload);
        Ok(BoxValue::SampleDescription(SampleDescription::parse(&mut r)?))
    }
}

pub struct TfhdDecoder;

impl BoxDecoder for TfhdDecoder {
    fn decode(&self, payload: &[u8], hdr: &BoxHeader) -> Result<BoxValue> {
        let mut r = PayloadReader::new(hdr.typ, payload);
        Ok(BoxValue::FragmentHeader(FragmentHeader::parse(&mut r)?))
    }
}

pub struct TrunDecoder;

impl BoxDecoder for TrunDecoder {
    fn decode(&self, payload: &[u8], hdr: &BoxHeader) -> Result<BoxValue> {
        let mut r = PayloadReader::new(hdr.typ, payload);
        Ok(BoxValue::FragmentRun(FragmentRun::parse(&mut r)?))
    }
}
