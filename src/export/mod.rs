//! File exports for boundary geometry: SVG for 2D curves, OBJ for 3D meshes.

use thiserror::Error;

use crate::norm::NormParameter;

pub mod obj;
pub mod svg;

pub use obj::write_obj;
pub use svg::{SvgOptions, curve_to_svg};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvas { width: f64, height: f64 },
    #[error("XML write failed: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("mesh validation failed: {0}")]
    Mesh(String),
    #[error("export produced invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Base file name (without extension) for exports of `k`, e.g.
/// `lk_norm_2.0_visualization`.
#[must_use]
pub fn file_stem(k: NormParameter) -> String {
    let label = match k {
        NormParameter::Finite(_) => k.label(),
        NormParameter::Infinity => "inf".to_string(),
    };
    format!("lk_norm_{label}_visualization")
}
