//! Operation options and configuration.

mod pages;
mod text;
mod transform;

pub use pages::PageSelection;
pub use text::{ColumnLayout, TextLayoutOptions, TextStyle, DEFAULT_FONT_SIZE};
pub use transform::{
    RotationPolicy, Strategy, TransformMode, TransformOptions, DEFAULT_DPI, VECTOR_SAFETY_FACTOR,
};
