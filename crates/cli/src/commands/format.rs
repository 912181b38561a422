//! Formatter commands.
//!
//! # Usage
//!
//! ```bash
//! vitrine-cli format cpf 52998224725        # 529.982.247-25
//! vitrine-cli format currency "1234,5"      # R$ 1.234,50
//! vitrine-cli format date 2024-03-05        # 05/03/2024
//! ```

use clap::ValueEnum;
use vitrine_core::Email;
use vitrine_core::format::{
    DocumentKind, format_currency_brl, format_date_br, format_number_br, format_percentage,
    is_valid_cnpj, is_valid_cpf, mask_cep, mask_document, mask_phone, normalize_email,
    parse_currency, parse_locale_number, parse_percentage,
};

use super::CliError;

/// What to format the value as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatKind {
    Cpf,
    Cnpj,
    Phone,
    Cep,
    Email,
    Currency,
    Number,
    Percent,
    Date,
}

/// Format `value` as `kind`.
///
/// Masks never fail; invalid CPF/CNPJ check digits are logged as a warning.
///
/// # Errors
///
/// Returns `CliError::InvalidInput` when an e-mail, number, percentage or
/// date cannot be read.
pub fn run(kind: FormatKind, value: &str) -> Result<String, CliError> {
    let invalid = || CliError::InvalidInput(format!("{value:?} is not a valid {kind:?}"));

    let output = match kind {
        FormatKind::Cpf => {
            let masked = mask_document(value, DocumentKind::Cpf);
            if !is_valid_cpf(&masked) {
                tracing::warn!("CPF check digits do not match");
            }
            masked
        }
        FormatKind::Cnpj => {
            let masked = mask_document(value, DocumentKind::Cnpj);
            if !is_valid_cnpj(&masked) {
                tracing::warn!("CNPJ check digits do not match");
            }
            masked
        }
        FormatKind::Phone => mask_phone(value),
        FormatKind::Cep => mask_cep(value),
        FormatKind::Email => Email::parse(&normalize_email(value))
            .map_err(|e| CliError::InvalidInput(e.to_string()))?
            .into_inner(),
        FormatKind::Currency => format_currency_brl(parse_currency(value)),
        FormatKind::Number => format_number_br(parse_locale_number(value).ok_or_else(invalid)?),
        FormatKind::Percent => format_percentage(parse_percentage(value).ok_or_else(invalid)?),
        FormatKind::Date => Some(format_date_br(value))
            .filter(|d| !d.is_empty())
            .ok_or_else(invalid)?,
    };

    Ok(output)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_masks() {
        assert_eq!(run(FormatKind::Cpf, "52998224725").unwrap(), "529.982.247-25");
        assert_eq!(run(FormatKind::Cep, "86010000").unwrap(), "86010-000");
        assert_eq!(
            run(FormatKind::Phone, "43999998888").unwrap(),
            "(43) 99999-8888"
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(run(FormatKind::Currency, "1234,5").unwrap(), "R$ 1.234,50");
        assert_eq!(run(FormatKind::Currency, "abc").unwrap(), "R$ 0,00");
        assert_eq!(run(FormatKind::Number, "1.234,56").unwrap(), "1234,56");
        assert_eq!(run(FormatKind::Percent, "12,5%").unwrap(), "12,5%");
        assert!(run(FormatKind::Number, "abc").is_err());
    }

    #[test]
    fn test_email_and_date() {
        assert_eq!(
            run(FormatKind::Email, " Ana@Loja.COM ").unwrap(),
            "ana@loja.com"
        );
        assert!(run(FormatKind::Email, "ana.loja.com").is_err());
        assert_eq!(run(FormatKind::Date, "2024-03-05").unwrap(), "05/03/2024");
        assert!(run(FormatKind::Date, "ontem").is_err());
    }
}
