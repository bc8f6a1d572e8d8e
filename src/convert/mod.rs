//! Convert module - table encoding for download

mod serializer;
mod xlsx;

pub use serializer::{ConversionResult, ConvertError, TableSerializer, TargetFormat};
pub use xlsx::XlsxWriter;
