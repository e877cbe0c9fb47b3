mod is_closed;
mod volume;

pub use is_closed::{IsClosed, NormalSum};
pub use volume::{approximate_volume, exact_volume, MeshVolume};
