pub mod language;
pub mod translation_map;

pub use language::Language;
pub use translation_map::{TranslationMap, merge, resolve};
