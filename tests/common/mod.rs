#![allow(dead_code)]

// Builders for synthetic ISOBMFF byte streams.

pub fn bx(typ: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut v = Vec::with_capacity(8 + payload.len());
    v.extend_from_slice(&((8 + payload.len()) as u32).to_be_bytes());
    v.extend_from_slice(typ);
    v.extend_from_slice(payload);
    v
}

/// Same box with a 64-bit size (size field = 1).
pub fn large_bx(typ: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut v = Vec::with_capacity(16 + payload.len());
    v.extend_from_slice(&1u32.to_be_bytes());
    v.extend_from_slice(typ);
    v.extend_from_slice(&((16 + payload.len()) as u64).to_be_bytes());
    v.extend_from_slice(payload);
    v
}

pub fn container(typ: &[u8; 4], children: &[Vec<u8>]) -> Vec<u8> {
    bx(typ, &children.concat())
}

pub fn full_box(typ: &[u8; 4], version: u8, flags: u32, body: &[u8]) -> Vec<u8> {
    let mut p = vec![version];
    p.extend_from_slice(&flags.to_be_bytes()[1..]);
    p.extend_from_slice(body);
    bx(typ, &p)
}

pub fn mvhd(version: u8, creation: u64, modification: u64, timescale: u32, duration: u64) -> Vec<u8> {
    let mut b = Vec::new();
    if version == 1 {
        b.extend_from_slice(&creation.to_be_bytes());
        b.extend_from_slice(&modification.to_be_bytes());
        b.extend_from_slice(&timescale.to_be_bytes());
        b.extend_from_slice(&duration.to_be_bytes());
    } else {
        b.extend_from_slice(&(creation as u32).to_be_bytes());
        b.extend_from_slice(&(modification as u32).to_be_bytes());
        b.extend_from_slice(&timescale.to_be_bytes());
        b.extend_from_slice(&(duration as u32).to_be_bytes());
    }
    b.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // rate
    b.extend_from_slice(&0x0100u16.to_be_bytes()); // volume
    b.extend_from_slice(&[0u8; 10]); // reserved
    for m in [0x0001_0000u32, 0, 0, 0, 0x0001_0000, 0, 0, 0, 0x4000_0000] {
        b.extend_from_slice(&m.to_be_bytes());
    }
    b.extend_from_slice(&[0u8; 24]); // pre_defined
    b.extend_from_slice(&2u32.to_be_bytes()); // next_track_id
    full_box(b"mvhd", version, 0, &b)
}

pub fn tkhd(track_id: u32, width_fixed: u32, height_fixed: u32) -> Vec<u8> {
    tkhd_versioned(0, track_id, 1000, width_fixed, height_fixed)
}

/// tkhd with 32-bit (version 0) or 64-bit (version 1) times and duration.
pub fn tkhd_versioned(version: u8, track_id: u32, duration: u64, width_fixed: u32, height_fixed: u32) -> Vec<u8> {
    let mut b = Vec::new();
    if version == 1 {
        b.extend_from_slice(&0x1_0000_0001u64.to_be_bytes()); // creation
        b.extend_from_slice(&0x1_0000_0002u64.to_be_bytes()); // modification
    } else {
        b.extend_from_slice(&0u32.to_be_bytes());
        b.extend_from_slice(&0u32.to_be_bytes());
    }
    b.extend_from_slice(&track_id.to_be_bytes());
    b.extend_from_slice(&0xFFFF_FFFFu32.to_be_bytes()); // reserved
    if version == 1 {
        b.extend_from_slice(&duration.to_be_bytes());
    } else {
        b.extend_from_slice(&(duration as u32).to_be_bytes());
    }
    b.extend_from_slice(&[0u8; 8]); // reserved
    b.extend_from_slice(&[0u8; 8]); // layer, alternate_group, volume, reserved
    b.extend_from_slice(&[0u8; 36]); // matrix
    b.extend_from_slice(&width_fixed.to_be_bytes());
    b.extend_from_slice(&height_fixed.to_be_bytes());
    full_box(b"tkhd", version, 3, &b)
}

pub fn hdlr(handler: &[u8; 4], name: &str) -> Vec<u8> {
    let mut b = Vec::new();
    b.extend_from_slice(&0u32.to_be_bytes());
    b.extend_from_slice(handler);
    b.extend_from_slice(&[0u8; 12]);
    b.extend_from_slice(name.as_bytes());
    b.push(0);
    full_box(b"hdlr", 0, 0, &b)
}

pub fn stsd(codecs: &[&[u8; 4]]) -> Vec<u8> {
    let mut b = Vec::new();
    b.extend_from_slice(&(codecs.len() as u32).to_be_bytes());
    for c in codecs {
        // sample entry header plus a token body
        b.extend_from_slice(&bx(c, &[0u8; 8]));
    }
    full_box(b"stsd", 0, 0, &b)
}

pub fn tfhd_default_duration(track_id: u32, duration: u32) -> Vec<u8> {
    let mut b = Vec::new();
    b.extend_from_slice(&track_id.to_be_bytes());
    b.extend_from_slice(&duration.to_be_bytes());
    full_box(b"tfhd", 0, 0x08, &b)
}

pub fn tfhd_plain(track_id: u32) -> Vec<u8> {
    full_box(b"tfhd", 0, 0, &track_id.to_be_bytes())
}

/// trun with only a sample count (no per-sample fields).
pub fn trun_count(sample_count: u32) -> Vec<u8> {
    full_box(b"trun", 0, 0, &sample_count.to_be_bytes())
}

/// trun carrying a duration for every sample.
pub fn trun_durations(durations: &[u32]) -> Vec<u8> {
    let mut b = Vec::new();
    b.extend_from_slice(&(durations.len() as u32).to_be_bytes());
    for d in durations {
        b.extend_from_slice(&d.to_be_bytes());
    }
    full_box(b"trun", 0, 0x100, &b)
}

pub fn video_track(width_fixed: u32, height_fixed: u32, codec: &[u8; 4]) -> Vec<u8> {
    container(
        b"trak",
        &[
            tkhd(1, width_fixed, height_fixed),
            container(
                b"mdia",
                &[
                    hdlr(b"vide", "VideoHandler"),
                    container(b"minf", &[container(b"stbl", &[stsd(&[codec])])]),
                ],
            ),
        ],
    )
}

pub fn audio_track(codec: &[u8; 4]) -> Vec<u8> {
    container(
        b"trak",
        &[
            tkhd(2, 0, 0),
            container(
                b"mdia",
                &[
                    hdlr(b"soun", "SoundHandler"),
                    container(b"minf", &[container(b"stbl", &[stsd(&[codec])])]),
                ],
            ),
        ],
    )
}

pub fn ftyp() -> Vec<u8> {
    let mut p = Vec::new();
    p.extend_from_slice(b"isom");
    p.extend_from_slice(&512u32.to_be_bytes());
    p.extend_from_slice(b"isom");
    bx(b"ftyp", &p)
}
