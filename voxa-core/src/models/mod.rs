mod comment;
mod report;
mod sprint;
mod story;
mod task;

pub use comment::*;
pub use report::*;
pub use sprint::*;
pub use story::*;
pub use task::*;
