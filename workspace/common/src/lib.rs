//! Helpers shared by the model crate and the command line tool.
//! Nothing in here touches the database.

pub mod email;
pub mod vat;

pub use email::normalize_email;
pub use vat::{OfflineVatValidator, VatError, VatNumber, VatValidator, validate_vat_number};
