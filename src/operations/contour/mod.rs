mod build_contours;
mod join_segments;

pub use build_contours::{close_ring, close_ring_default, BuildContours};
pub use join_segments::join_open_paths;
