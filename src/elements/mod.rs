//! Structural elements module

mod member;
mod node;
mod section;
mod support;

pub use member::{EndRelease, Member};
pub use node::Node;
pub use section::{Section, STEEL_E};
pub use support::{Support, SupportKind};
