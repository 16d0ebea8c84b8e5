pub mod aggregate;
pub mod api;
pub mod boxes;
pub mod decoders;
pub mod error;
pub mod known_boxes;
pub mod parser;
pub mod reader;
pub mod registry;
pub mod util;
pub mod walker;

pub use aggregate::{Aggregate, MovieFragment, Track};
pub use api::{Mp4Summary, read_aggregate, summarize, summarize_file, summarize_with};
pub use boxes::{BoxHeader, FourCC, NodeKind};
pub use error::{ParseError, Result};
pub use parser::{read_box_header, read_box_header_within};
pub use registry::{BoxValue, Registry, default_registry};
pub use walker::{WalkOptions, Walker};
