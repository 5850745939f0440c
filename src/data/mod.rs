//! Dataset generation: the scoring corpus and the decision dataset.

pub mod decision;
pub mod synthetic;

pub use synthetic::{generate, BAD_KEYWORDS, GOOD_KEYWORDS, SECTORS};
