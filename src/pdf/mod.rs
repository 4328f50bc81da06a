//! PDF codec layer over `lopdf`.
//!
//! [`SourcePdf`] reads pages and their geometry, [`PdfWriter`] builds new
//! fixed-size pages and serializes them into an [`OutputDocument`].

mod output;
mod source;
mod writer;

pub use output::{write_atomic, OutputDocument};
pub use source::{SourcePage, SourcePdf};
pub use writer::{pdf_date, text_string, PdfWriter, PRODUCER};

use lopdf::content::Operation;
use lopdf::Object;

use crate::geometry::{Matrix, Rect};

/// `cm` operator for a matrix.
pub(crate) fn op_concat(matrix: &Matrix) -> Operation {
    Operation::new(
        "cm",
        matrix.to_array().iter().map(|&v| Object::Real(v)).collect(),
    )
}

/// `x y w h re W n`: intersect the clipping path with a rectangle.
pub(crate) fn ops_clip(rect: &Rect) -> Vec<Operation> {
    vec![
        Operation::new(
            "re",
            vec![
                Object::Real(rect.x),
                Object::Real(rect.y),
                Object::Real(rect.width),
                Object::Real(rect.height),
            ],
        ),
        Operation::new("W", vec![]),
        Operation::new("n", vec![]),
    ]
}

/// `/name Do`.
pub(crate) fn op_draw(name: &str) -> Operation {
    Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())])
}
