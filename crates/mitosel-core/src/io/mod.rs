pub mod export;
pub mod image_io;
pub mod results;
pub mod tiff_stack;

pub use export::export_output;
pub use tiff_stack::{StackLayout, TiffStackLoader};
