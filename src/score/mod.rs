pub mod parser;
pub mod render;
pub mod types;

pub use parser::{classify_line, parse, Line};
pub use render::render;
pub use types::{ambient_key, playback_secs, MusicEvent, Segment};
