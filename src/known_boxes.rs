use crate::boxes::{FourCC, NodeKind};

/// Typed view over the boxes the walker understands.
///
/// Anything not in this list becomes `KnownBox::Unknown(fourcc)` and is
/// skipped without being descended into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownBox {
    // movie
    Moov,
    Mvhd,
    Trak,
    Mvex,

    // trak children
    Tkhd,
    Mdia,

    // mdia children
    Hdlr,
    Minf,

    // minf children
    Stbl,

    // stbl children
    Stsd,

    // fragmented / moof / traf
    Moof,
    Traf,
    Tfhd,
    Trun,

    // Anything else
    Unknown(FourCC),
}

impl From<FourCC> for KnownBox {
    fn from(cc: FourCC) -> Self {
        match &cc.0 {
            b"moov" => KnownBox::Moov,
            b"mvhd" => KnownBox::Mvhd,
            b"trak" => KnownBox::Trak,
            b"mvex" => KnownBox::Mvex,

            b"tkhd" => KnownBox::Tkhd,
            b"mdia" => KnownBox::Mdia,

            b"hdlr" => KnownBox::Hdlr,
            b"minf" => KnownBox::Minf,

            b"stbl" => KnownBox::Stbl,
            b"stsd" => KnownBox::Stsd,

            b"moof" => KnownBox::Moof,
            b"traf" => KnownBox::Traf,
            b"tfhd" => KnownBox::Tfhd,
            b"trun" => KnownBox::Trun,

            _ => KnownBox::Unknown(cc),
        }
    }
}

impl KnownBox {
    /// Human-readable name, used in walk logs.
    pub fn full_name(&self) -> &'static str {
        match self {
            KnownBox::Moov => "Movie Box",
            KnownBox::Mvhd => "Movie Header Box",
            KnownBox::Trak => "Track Box",
            KnownBox::Mvex => "Movie Extends Box",
            KnownBox::Tkhd => "Track Header Box",
            KnownBox::Mdia => "Media Box",
            KnownBox::Hdlr => "Handler Reference Box",
            KnownBox::Minf => "Media Information Box",
            KnownBox::Stbl => "Sample Table Box",
            KnownBox::Stsd => "Sample Description Box",
            KnownBox::Moof => "Movie Fragment Box",
            KnownBox::Traf => "Track Fragment Box",
            KnownBox::Tfhd => "Track Fragment Header Box",
            KnownBox::Trun => "Track Fragment Run Box",
            KnownBox::Unknown(_) => "Unknown Box",
        }
    }

    /// Does this box *contain* child boxes (container semantics)?
    pub fn is_container(&self) -> bool {
        matches!(self.kind(), NodeKind::Container)
    }

    /// Is this type walked at all? Unsupported boxes are skipped.
    pub fn is_supported(&self) -> bool {
        !matches!(self, KnownBox::Unknown(_))
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            KnownBox::Moov
            | KnownBox::Trak
            | KnownBox::Mvex
            | KnownBox::Mdia
            | KnownBox::Minf
            | KnownBox::Stbl
            | KnownBox::Moof
            | KnownBox::Traf => NodeKind::Container,

            KnownBox::Mvhd
            | KnownBox::Tkhd
            | KnownBox::Hdlr
            | KnownBox::Stsd
            | KnownBox::Tfhd
            | KnownBox::Trun => NodeKind::Payload,

            KnownBox::Unknown(_) => NodeKind::Opaque,
        }
    }
}
