mod common;

use common::*;
use mp4meta::{FourCC, Mp4Summary, ParseError, summarize, summarize_file};
use std::io::{Cursor, Write};

fn run(data: Vec<u8>) -> mp4meta::Result<Mp4Summary> {
    let len = data.len() as u64;
    summarize(&mut Cursor::new(data), len)
}

fn tags(list: &[&[u8; 4]]) -> Vec<FourCC> {
    list.iter().map(|t| FourCC(**t)).collect()
}

#[test]
fn movie_header_only() {
    let data = [ftyp(), container(b"moov", &[mvhd(0, 0, 0, 1000, 5000)])].concat();
    let s = run(data).unwrap();

    assert_eq!(s.duration_seconds, 5.0);
    assert!(s.media_types.is_empty());
    assert!(s.codecs.is_empty());
    assert_eq!(s.video_width, 0);
    assert_eq!(s.video_height, 0);
}

#[test]
fn single_video_track_resolution() {
    let trak = container(
        b"trak",
        &[
            tkhd(1, 0x0190_0000, 0x00F0_0000),
            container(b"mdia", &[hdlr(b"vide", "")]),
        ],
    );
    let data = container(b"moov", &[trak]);
    let len = data.len() as u64;
    let agg = mp4meta::read_aggregate(&mut Cursor::new(data), len, &Default::default()).unwrap();

    assert_eq!(agg.video_resolution().unwrap(), (400, 240));
    assert_eq!(agg.media_types().unwrap(), tags(&[b"vide"]));
}

#[test]
fn fragmented_duration_uses_default_sample_duration() {
    let data = [
        ftyp(),
        container(b"moov", &[mvhd(0, 0, 0, 1000, 0), container(b"mvex", &[bx(b"trex", &[0u8; 24])])]),
        container(
            b"moof",
            &[container(b"traf", &[tfhd_default_duration(1, 40), trun_count(25)])],
        ),
        bx(b"mdat", &[0u8; 16]),
    ]
    .concat();

    let s = run(data).unwrap();
    assert_eq!(s.duration_seconds, 1.0);
}

#[test]
fn fragment_durations_add_to_movie_duration() {
    let data = [
        container(b"moov", &[mvhd(1, 0, 0, 100, 50)]),
        container(b"moof", &[container(b"traf", &[tfhd_plain(1), trun_durations(&[25, 25])])]),
        container(b"moof", &[container(b"traf", &[tfhd_default_duration(1, 10), trun_count(10)])]),
    ]
    .concat();

    // 50 + (25 + 25) + 10 * 10 ticks at 100 per second
    let s = run(data).unwrap();
    assert_eq!(s.duration_seconds, 2.0);
}

#[test]
fn trailing_zero_size_box_ends_at_the_given_length() {
    let mut data = [ftyp(), container(b"moov", &[mvhd(0, 0, 0, 1000, 5000)])].concat();
    data.extend_from_slice(&0u32.to_be_bytes());
    data.extend_from_slice(b"mdat");
    data.extend_from_slice(&[0u8; 32]);
    let len = data.len() as u64;

    let whole = summarize(&mut Cursor::new(data.clone()), len).unwrap();
    assert_eq!(whole.duration_seconds, 5.0);

    // bytes past the given length are ignored, not reported as truncation
    let shorter = summarize(&mut Cursor::new(data), len - 4).unwrap();
    assert_eq!(shorter.duration_seconds, 5.0);
}

#[test]
fn audio_and_video_tracks() {
    let data = [
        ftyp(),
        container(
            b"moov",
            &[
                mvhd(0, 0, 0, 600, 3000),
                audio_track(b"mp4a"),
                video_track(0x0780_0000, 0x0438_0000, b"avc1"),
                video_track(0x0280_0000, 0x01E0_0000, b"hvc1"),
            ],
        ),
    ]
    .concat();

    let s = run(data).unwrap();
    assert_eq!(s.media_types, tags(&[b"soun", b"vide", b"vide"]));
    assert_eq!(s.codecs, tags(&[b"mp4a", b"avc1", b"hvc1"]));
    // first video track wins
    assert_eq!((s.video_width, s.video_height), (1920, 1080));
    assert_eq!(s.duration_seconds, 5.0);
}

#[test]
fn track_without_handler_fails_the_summary() {
    let trak = container(
        b"trak",
        &[tkhd(1, 0, 0), container(b"mdia", &[container(b"minf", &[container(b"stbl", &[stsd(&[b"avc1"])])])])],
    );
    let data = container(b"moov", &[mvhd(0, 0, 0, 1000, 1000), trak]);
    assert!(matches!(
        run(data),
        Err(ParseError::MissingDependency { what: "hdlr", .. })
    ));
}

#[test]
fn fragment_without_header_fails_the_summary() {
    let data = [
        container(b"moov", &[mvhd(0, 0, 0, 1000, 0)]),
        container(b"moof", &[container(b"traf", &[trun_count(25)])]),
    ]
    .concat();
    assert!(matches!(
        run(data),
        Err(ParseError::MissingDependency { what: "tfhd", .. })
    ));
}

#[test]
fn no_partial_summary_on_truncation() {
    let mut data = [ftyp(), container(b"moov", &[mvhd(0, 0, 0, 1000, 5000)])].concat();
    let full = data.len();
    data.truncate(full - 10);
    // claim the original length so the walker runs into the missing bytes
    let res = summarize(&mut Cursor::new(data), full as u64);
    assert!(matches!(res, Err(ParseError::TruncatedStream(_))));
}

#[test]
fn summary_serializes_tags_as_strings() {
    let data = container(b"moov", &[mvhd(0, 0, 0, 1000, 1500), audio_track(b"mp4a")]);
    let s = run(data).unwrap();
    let v = serde_json::to_value(&s).unwrap();
    assert_eq!(v["media_types"][0], "soun");
    assert_eq!(v["codecs"][0], "mp4a");
    assert_eq!(v["duration_seconds"], 1.5);
}

#[test]
fn summarize_file_reads_from_disk() {
    let data = [
        ftyp(),
        container(b"moov", &[mvhd(0, 0, 0, 1000, 2000), video_track(0x0064_0000, 0x0064_0000, b"av01")]),
    ]
    .concat();
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(&data).unwrap();
    f.flush().unwrap();

    let s = summarize_file(f.path()).unwrap();
    assert_eq!(s.codecs, tags(&[b"av01"]));
    assert_eq!((s.video_width, s.video_height), (100, 100));
    assert_eq!(s.duration_seconds, 2.0);
}

#[test]
fn summarize_file_missing_path_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let res = summarize_file(dir.path().join("absent.mp4"));
    assert!(matches!(res, Err(ParseError::Open { .. })));
}
