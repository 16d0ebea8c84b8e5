use crate::{
    aggregate::Aggregate,
    boxes::FourCC,
    error::{ParseError, Result},
    registry::default_registry,
    walker::{WalkOptions, Walker},
};
use serde::Serialize;
use std::{
    fs::File,
    io::{BufReader, Read, Seek},
    path::Path,
};
use tracing::{debug, info};

/// Structural metadata of one MP4/ISOBMFF file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mp4Summary {
    /// Handler type of every track (e.g. `vide`, `soun`), in track order
    pub media_types: Vec<FourCC>,
    /// Sample entry type of every track (e.g. `avc1`, `mp4a`), in track then entry order
    pub codecs: Vec<FourCC>,
    /// Width of the first video track in pixels, 0 without one
    pub video_width: u32,
    /// Height of the first video track in pixels, 0 without one
    pub video_height: u32,
    /// Movie duration plus all movie fragments, in seconds
    pub duration_seconds: f64,
}

/// Walk an MP4/ISOBMFF stream and collect every supported record.
///
/// # Parameters
/// - `r`: A reader that implements `Read + Seek` (e.g., `File`, `Cursor<Vec<u8>>`)
/// - `size`: The total size of the MP4 data (typically file length)
/// - `options`: Limits applied during the walk
///
/// Any error aborts the walk; no partial aggregate is returned.
pub fn read_aggregate<R: Read + Seek>(
    r: &mut R,
    size: u64,
    options: &WalkOptions,
) -> Result<Aggregate> {
    let mut agg = Aggregate::new();
    let consumed = Walker::new(r, size, default_registry(), options).walk_stream(&mut agg)?;
    debug!(
        consumed,
        tracks = agg.tracks.len(),
        fragments = agg.fragments.len(),
        "walk finished"
    );
    Ok(agg)
}

/// Extract the [`Mp4Summary`] of an MP4/ISOBMFF stream with default options.
///
/// # Example
/// ```no_run
/// use mp4meta::summarize;
/// use std::fs::File;
///
/// let mut file = File::open("video.mp4")?;
/// let size = file.metadata()?.len();
/// let summary = summarize(&mut file, size)?;
/// println!("{:.2}s", summary.duration_seconds);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn summarize<R: Read + Seek>(r: &mut R, size: u64) -> Result<Mp4Summary> {
    summarize_with(r, size, &WalkOptions::default())
}

pub fn summarize_with<R: Read + Seek>(
    r: &mut R,
    size: u64,
    options: &WalkOptions,
) -> Result<Mp4Summary> {
    read_aggregate(r, size, options)?.summary()
}

/// Open `path` and summarize it.
pub fn summarize_file(path: impl AsRef<Path>) -> Result<Mp4Summary> {
    let path = path.as_ref();
    let open_err = |source| ParseError::Open {
        path: path.to_path_buf(),
        source,
    };
    let f = File::open(path).map_err(open_err)?;
    let size = f.metadata().map_err(open_err)?.len();
    info!(path = %path.display(), size, "summarizing file");
    let mut reader = BufReader::new(f);
    summarize(&mut reader, size)
}
