//! The six learning modules as session strategies.

pub mod coding;
pub mod drawing;
pub mod kindness;
pub mod math;
pub mod reading;
pub mod typing;

pub use coding::{CodeAction, CodingStrategy, CodingWorkspace};
pub use drawing::{DrawAction, DrawingBoard, DrawingStrategy};
pub use kindness::KindnessStrategy;
pub use math::{parse_answer, MathStrategy};
pub use reading::{ReadingPassage, ReadingStrategy};
pub use typing::{TypingChallengeText, TypingStrategy, INITIAL_TEXT};
