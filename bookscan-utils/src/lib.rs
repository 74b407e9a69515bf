mod files;
pub use files::*;
mod hash;
pub use hash::*;
mod json;
pub use json::*;
