//! sp-field: splice predicted pressure into the fixed-layout surface template.
//!
//! The template is an ASCII point file with three regions: a header, a data
//! block of one row per surface point, and a footer. Only the pressure column
//! of the data block is rewritten; everything else is carried over verbatim.

pub mod error;
pub mod layout;
pub mod template;
pub mod writer;

pub use error::{FieldError, FieldResult};
pub use layout::TemplateLayout;
pub use template::{DataRow, Template, sha256_hex};
pub use writer::{FieldWriter, format_value};
