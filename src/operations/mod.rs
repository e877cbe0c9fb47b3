pub mod boolean;
pub mod contour;
pub mod query;
pub mod shaping;
