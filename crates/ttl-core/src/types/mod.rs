mod status;
mod ttl;

pub use status::*;
pub use ttl::*;
