mod id;
mod timestamp;

pub use id::Id;
pub use timestamp::Timestamp;
