mod completion;
mod message;

pub use completion::*;
pub use message::*;
