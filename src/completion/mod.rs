pub mod error;
pub mod spec;
pub mod registry;
pub mod document;
pub mod snapshot;
pub mod scanner;
pub mod selector;
pub mod filter;
pub mod cursor;
pub mod committer;
pub mod decoration;
pub mod anchor;
pub mod session;
pub mod debug;
pub mod presets;
pub mod wasm;

pub use error::*;
pub use spec::*;
pub use registry::*;
pub use document::*;
pub use snapshot::*;
pub use scanner::*;
pub use selector::*;
pub use filter::*;
pub use cursor::*;
pub use committer::*;
pub use decoration::*;
pub use anchor::*;
pub use session::*;
pub use debug::*;
pub use presets::*;
pub use wasm::*;

#[cfg(test)]
mod tests;
