//! Input masking and display formatting.
//!
//! Every function in this module is total: malformed input never panics and
//! degrades to a documented default (an empty string, zero, or `None`).
//!
//! - [`mask`] - Digit-position masks for CPF, CNPJ, phone and CEP
//! - [`number`] - pt-BR number parsing and BRL currency output
//! - [`date`] - `DD/MM/YYYY` date rendering

pub mod date;
pub mod mask;
pub mod number;

pub use date::format_date_br;
pub use mask::{
    DocumentKind, digits_only, is_valid_cnpj, is_valid_cpf, mask_cep, mask_document, mask_phone,
};
pub use number::{
    format_currency_brl, format_decimal_brl, format_number_br, format_percentage, parse_currency,
    parse_decimal, parse_locale_number, parse_percentage,
};

/// Trim surrounding whitespace and lowercase an e-mail address.
///
/// ```
/// use vitrine_core::format::normalize_email;
///
/// assert_eq!(normalize_email("  Ana@Loja.COM "), "ana@loja.com");
/// ```
#[must_use]
pub fn normalize_email(input: &str) -> String {
    input.trim().to_lowercase()
}
