pub mod annotator;
pub mod palette;
pub mod segment;
pub mod span;

pub use annotator::*;
pub use palette::*;
pub use segment::*;
pub use span::*;
