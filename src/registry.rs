use crate::boxes::{BoxHeader, FourCC};
use crate::decoders::{
    FragmentHeader, FragmentRun, Handler, HdlrDecoder, MovieHeader, MvhdDecoder,
    SampleDescription, StsdDecoder, TfhdDecoder, TkhdDecoder, TrackHeader, TrunDecoder,
};
use crate::error::Result;
use std::collections::HashMap;
use std::sync::OnceLock;

/// A typed record produced by a box decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoxValue {
    MovieHeader(MovieHeader),
    TrackHeader(TrackHeader),
    Handler(Handler),
    SampleDescription(SampleDescription),
    FragmentHeader(FragmentHeader),
    FragmentRun(FragmentRun),
}

/// Trait for box payload decoders.
///
/// A decoder receives exactly the payload bytes of one box (everything after
/// the header) and must not assume anything beyond them.
pub trait BoxDecoder: Send + Sync {
    fn decode(&self, payload: &[u8], hdr: &BoxHeader) -> Result<BoxValue>;
}

/// Registry of decoders keyed by box type.
///
/// The registry is immutable once constructed; use [`Registry::with_decoder`]
/// to build it fluently.
pub struct Registry {
    map: HashMap<FourCC, BoxDecoderEntry>,
}

struct BoxDecoderEntry {
    inner: Box<dyn BoxDecoder>,
    name: String,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Return a new registry with the given decoder added.
    ///
    /// `name` is human-readable and used only for logging.
    pub fn with_decoder(mut self, key: FourCC, name: &str, dec: Box<dyn BoxDecoder>) -> Self {
        self.map.insert(
            key,
            BoxDecoderEntry {
                inner: dec,
                name: name.to_string(),
            },
        );
        self
    }

    pub fn contains(&self, key: &FourCC) -> bool {
        self.map.contains_key(key)
    }

    pub fn decoder_name(&self, key: &FourCC) -> Option<&str> {
        self.map.get(key).map(|d| d.name.as_str())
    }

    /// Try to decode the payload of a box using a registered decoder.
    ///
    /// Returns `None` if no decoder exists for the given key.
    pub fn decode(
        &self,
        key: &FourCC,
        payload: &[u8],
        hdr: &BoxHeader,
    ) -> Option<Result<BoxValue>> {
        self.map.get(key).map(|d| d.inner.decode(payload, hdr))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide registry holding a decoder for every payload box the walker supports.
pub fn default_registry() -> &'static Registry {
    static DEFAULT: OnceLock<Registry> = OnceLock::new();
    DEFAULT.get_or_init(|| {
        Registry::new()
            .with_decoder(FourCC(*b"mvhd"), "movie header", Box::new(MvhdDecoder))
            .with_decoder(FourCC(*b"tkhd"), "track header", Box::new(TkhdDecoder))
            .with_decoder(FourCC(*b"hdlr"), "handler reference", Box::new(HdlrDecoder))
            .with_decoder(FourCC(*b"stsd"), "sample description", Box::new(StsdDecoder))
            .with_decoder(FourCC(*b"tfhd"), "track fragment header", Box::new(TfhdDecoder))
            .with_decoder(FourCC(*b"trun"), "track fragment run", Box::new(TrunDecoder))
    })
}
