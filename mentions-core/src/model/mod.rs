pub mod attribute;
pub mod mention;
pub mod text_range;

pub use attribute::{Attribute, AttributeSet, AttributeValue};
pub use mention::{MentionRange, NewMention};
pub use text_range::TextRange;
