pub mod instance;
pub mod traits;

pub use instance::{DirtyFlags, InstanceBatch};
pub use traits::InstanceSink;
