//! Feature extraction: criteria aggregation, text features, and the
//! fixed-order feature union shared by both regression heads.

pub mod criteria;
pub mod text;
pub mod union;

pub use criteria::summarize;
pub use text::{LexicalStats, Tokenizer, TfidfVectorizer};
pub use union::{FeatureUnion, UnionInput};
