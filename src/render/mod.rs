//! CPU rasterization of finished flashcards.

pub mod card;
pub mod gradient;
