//! Pipeline orchestration

mod linker;
mod result;

pub use linker::link;
pub use result::{LinkStats, LinkedModel};
