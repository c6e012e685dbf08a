//! XML input boundary: raw element trees and the streaming reader.
//!
//! The rest of the crate never touches quick-xml directly; it consumes
//! owned [`RawNode`] subtrees yielded one at a time by [`ElementReader`].

mod node;
mod reader;

pub use node::{Descendants, RawNode};
pub use reader::ElementReader;
