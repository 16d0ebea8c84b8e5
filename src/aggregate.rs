//! Records gathered during one walk, and the reductions over them.
//!
//! Boxes arrive depth-first in document order, so a `tkhd`/`hdlr`/`stsd`
//! belongs to the most recently opened track and a `tfhd`/`trun` to the most
//! recently opened fragment.

use crate::api::Mp4Summary;
use crate::boxes::{BoxHeader, FourCC};
use crate::decoders::{
    FragmentHeader, FragmentRun, Handler, MovieHeader, SampleDescription, TrackHeader,
};
use crate::error::{ParseError, Result};
use crate::registry::BoxValue;
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Track {
    pub track_header: Option<TrackHeader>,
    pub media_handler: Option<Handler>,
    pub sample_description: Option<SampleDescription>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MovieFragment {
    pub fragment_header: Option<FragmentHeader>,
    pub fragment_run: Option<FragmentRun>,
}

impl MovieFragment {
    /// Duration covered by this fragment, in movie timescale units.
    pub fn duration(&self, index: usize) -> Result<u64> {
        let owner = || format!("fragment {}", index);
        let tfhd = self
            .fragment_header
            .as_ref()
            .ok_or_else(|| ParseError::missing("tfhd", owner()))?;
        let trun = self
            .fragment_run
            .as_ref()
            .ok_or_else(|| ParseError::missing("trun", owner()))?;

        if tfhd.has_default_duration() {
            Ok(tfhd.default_sample_duration as u64 * trun.sample_count as u64)
        } else {
            Ok(trun.total_sample_duration())
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Aggregate {
    pub movie_header: Option<MovieHeader>,
    pub tracks: Vec<Track>,
    pub fragments: Vec<MovieFragment>,
}

fn fill<T>(slot: &mut Option<T>, value: T, hdr: &BoxHeader, owner: &str) {
    if slot.replace(value).is_some() {
        warn!(typ = %hdr.typ, offset = hdr.start, "{} already had a {}, keeping the later one", owner, hdr.typ);
    }
}

impl Aggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new track; following track-level boxes fill it.
    pub fn begin_track(&mut self) {
        self.tracks.push(Track::default());
    }

    /// Open a new movie fragment; following fragment-level boxes fill it.
    pub fn begin_fragment(&mut self) {
        self.fragments.push(MovieFragment::default());
    }

    fn current_track(&mut self, hdr: &BoxHeader) -> Result<(usize, &mut Track)> {
        let idx = self.tracks.len().checked_sub(1);
        match (idx, self.tracks.last_mut()) {
            (Some(i), Some(t)) => Ok((i, t)),
            _ => Err(ParseError::UnexpectedBox {
                typ: hdr.typ,
                offset: hdr.start,
                parent: "trak",
            }),
        }
    }

    fn current_fragment(&mut self, hdr: &BoxHeader) -> Result<(usize, &mut MovieFragment)> {
        let idx = self.fragments.len().checked_sub(1);
        match (idx, self.fragments.last_mut()) {
            (Some(i), Some(f)) => Ok((i, f)),
            _ => Err(ParseError::UnexpectedBox {
                typ: hdr.typ,
                offset: hdr.start,
                parent: "traf",
            }),
        }
    }

    /// Attach a decoded record to the slot it belongs to.
    pub fn attach(&mut self, value: BoxValue, hdr: &BoxHeader) -> Result<()> {
        match value {
            BoxValue::MovieHeader(mvhd) => fill(&mut self.movie_header, mvhd, hdr, "movie"),
            BoxValue::TrackHeader(tkhd) => {
                let (i, t) = self.current_track(hdr)?;
                fill(&mut t.track_header, tkhd, hdr, &format!("track {}", i));
            }
            BoxValue::Handler(hdlr) => {
                let (i, t) = self.current_track(hdr)?;
                fill(&mut t.media_handler, hdlr, hdr, &format!("track {}", i));
            }
            BoxValue::SampleDescription(stsd) => {
                let (i, t) = self.current_track(hdr)?;
                fill(&mut t.sample_description, stsd, hdr, &format!("track {}", i));
            }
            BoxValue::FragmentHeader(tfhd) => {
                let (i, f) = self.current_fragment(hdr)?;
                fill(&mut f.fragment_header, tfhd, hdr, &format!("fragment {}", i));
            }
            BoxValue::FragmentRun(trun) => {
                let (i, f) = self.current_fragment(hdr)?;
                fill(&mut f.fragment_run, trun, hdr, &format!("fragment {}", i));
            }
        }
        Ok(())
    }

    fn handler(&self, index: usize) -> Result<&Handler> {
        self.tracks[index]
            .media_handler
            .as_ref()
            .ok_or_else(|| ParseError::missing("hdlr", format!("track {}", index)))
    }

    /// Handler type of every track, in track order.
    pub fn media_types(&self) -> Result<Vec<FourCC>> {
        (0..self.tracks.len())
            .map(|i| self.handler(i).map(|h| h.handler_type))
            .collect()
    }

    /// Sample entry types of every track, in track then entry order.
    pub fn codecs(&self) -> Result<Vec<FourCC>> {
        let mut out = Vec::new();
        for (i, t) in self.tracks.iter().enumerate() {
            let stsd = t
                .sample_description
                .as_ref()
                .ok_or_else(|| ParseError::missing("stsd", format!("track {}", i)))?;
            out.extend(stsd.codecs());
        }
        Ok(out)
    }

    /// Dimensions of the first video track, `(0, 0)` without one.
    pub fn video_resolution(&self) -> Result<(u32, u32)> {
        for (i, t) in self.tracks.iter().enumerate() {
            if self.handler(i)?.is_video() {
                let tkhd = t
                    .track_header
                    .as_ref()
                    .ok_or_else(|| ParseError::missing("tkhd", format!("track {}", i)))?;
                return Ok((tkhd.width, tkhd.height));
            }
        }
        Ok((0, 0))
    }

    /// Movie duration plus every fragment's duration, in movie timescale units.
    pub fn duration_ticks(&self) -> Result<u64> {
        let mvhd = self.movie_header()?;
        let mut total = mvhd.duration;
        for (i, f) in self.fragments.iter().enumerate() {
            total = total.saturating_add(f.duration(i)?);
        }
        Ok(total)
    }

    pub fn duration_seconds(&self) -> Result<f64> {
        let timescale = self.movie_header()?.timescale;
        if timescale == 0 {
            return Err(ParseError::malformed(FourCC(*b"mvhd"), "timescale is zero"));
        }
        Ok(self.duration_ticks()? as f64 / timescale as f64)
    }

    fn movie_header(&self) -> Result<&MovieHeader> {
        self.movie_header
            .as_ref()
            .ok_or_else(|| ParseError::missing("mvhd", "movie"))
    }

    pub fn summary(&self) -> Result<Mp4Summary> {
        let (video_width, video_height) = self.video_resolution()?;
        Ok(Mp4Summary {
            media_types: self.media_types()?,
            codecs: self.codecs()?,
            video_width,
            video_height,
            duration_seconds: self.duration_seconds()?,
        })
    }
}
