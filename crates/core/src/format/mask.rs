//! Fixed-position masks for Brazilian documents, phones and postal codes.
//!
//! Masks are applied progressively: a partially typed value gets the
//! separators that its digits already reach, so the same function serves
//! keystroke-by-keystroke input and final display. Re-masking a masked value
//! is a no-op because masking starts by stripping everything but digits.

use serde::{Deserialize, Serialize};

/// Brazilian taxpayer document kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Individual taxpayer number, `000.000.000-00`.
    Cpf,
    /// Company taxpayer number, `00.000.000/0000-00`.
    Cnpj,
}

impl DocumentKind {
    /// Number of digits in a complete document.
    #[must_use]
    pub const fn max_digits(self) -> usize {
        match self {
            Self::Cpf => 11,
            Self::Cnpj => 14,
        }
    }

    const fn groups(self) -> &'static [usize] {
        match self {
            Self::Cpf => &[3, 3, 3, 2],
            Self::Cnpj => &[2, 3, 3, 4, 2],
        }
    }

    const fn separators(self) -> &'static [char] {
        match self {
            Self::Cpf => &['.', '.', '-'],
            Self::Cnpj => &['.', '.', '/', '-'],
        }
    }
}

impl std::str::FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpf" => Ok(Self::Cpf),
            "cnpj" => Ok(Self::Cnpj),
            other => Err(format!("invalid document kind: {other}")),
        }
    }
}

/// Strip every character that is not an ASCII digit.
#[must_use]
pub fn digits_only(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Digits of `input`, truncated to `max` digits.
fn truncated_digits(input: &str, max: usize) -> String {
    input.chars().filter(char::is_ascii_digit).take(max).collect()
}

/// Insert `separators[i]` between group `i` and group `i + 1`, stopping as
/// soon as the digits run out.
fn apply_groups(digits: &str, groups: &[usize], separators: &[char]) -> String {
    let mut out = String::with_capacity(digits.len() + separators.len());
    let mut rest = digits;

    for (i, &size) in groups.iter().enumerate() {
        if rest.is_empty() {
            break;
        }
        if i > 0
            && let Some(sep) = separators.get(i - 1)
        {
            out.push(*sep);
        }
        let take = size.min(rest.len());
        let (head, tail) = rest.split_at(take);
        out.push_str(head);
        rest = tail;
    }

    out
}

/// Mask a CPF or CNPJ.
///
/// Input beyond the document's digit count is dropped.
///
/// ```
/// use vitrine_core::format::{DocumentKind, mask_document};
///
/// assert_eq!(mask_document("12345678901", DocumentKind::Cpf), "123.456.789-01");
/// assert_eq!(mask_document("1234", DocumentKind::Cpf), "123.4");
/// assert_eq!(
///     mask_document("11222333000181", DocumentKind::Cnpj),
///     "11.222.333/0001-81"
/// );
/// ```
#[must_use]
pub fn mask_document(input: &str, kind: DocumentKind) -> String {
    let digits = truncated_digits(input, kind.max_digits());
    apply_groups(&digits, kind.groups(), kind.separators())
}

/// Mask a Brazilian phone number with area code.
///
/// | digits | output              |
/// |--------|---------------------|
/// | 0      | empty               |
/// | 1-2    | `(DD`               |
/// | 3-7    | `(DD) DDDDD`        |
/// | 10     | `(DD) DDDD-DDDD`    |
/// | 8-11   | `(DD) DDDDD-DDDD`   |
///
/// Digits past the eleventh are dropped.
#[must_use]
pub fn mask_phone(input: &str) -> String {
    let digits = truncated_digits(input, 11);
    let len = digits.len();

    if len == 0 {
        return String::new();
    }

    let (area, rest) = digits.split_at(len.min(2));
    if rest.is_empty() {
        return format!("({area}");
    }
    if len <= 7 {
        return format!("({area}) {rest}");
    }

    // Landlines carry a four-digit prefix, mobiles a five-digit one.
    let prefix_len = if len == 10 { 4 } else { 5 };
    let (prefix, line) = rest.split_at(prefix_len);
    format!("({area}) {prefix}-{line}")
}

/// Mask a CEP (postal code) as `00000-000`.
#[must_use]
pub fn mask_cep(input: &str) -> String {
    let digits = truncated_digits(input, 8);
    apply_groups(&digits, &[5, 3], &['-'])
}

/// Digits of a string as numbers, or `None` if the length is wrong.
fn digit_values(input: &str, expected: usize) -> Option<Vec<u32>> {
    let values: Vec<u32> = input.chars().filter_map(|c| c.to_digit(10)).collect();
    (values.len() == expected).then_some(values)
}

fn all_equal(values: &[u32]) -> bool {
    values.windows(2).all(|w| w.first() == w.get(1))
}

/// Modulo-11 check digit over `digits` weighted by `weights`.
fn check_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    let rest = sum % 11;
    if rest < 2 { 0 } else { 11 - rest }
}

/// Validate a CPF's two check digits.
///
/// Accepts masked or raw input. Sequences of one repeated digit are rejected
/// even though they satisfy the checksum.
#[must_use]
pub fn is_valid_cpf(input: &str) -> bool {
    let Some(values) = digit_values(input, 11) else {
        return false;
    };
    if all_equal(&values) {
        return false;
    }

    let (body, checks) = values.split_at(9);
    let first = check_digit(body, &[10, 9, 8, 7, 6, 5, 4, 3, 2]);
    let mut with_first = body.to_vec();
    with_first.push(first);
    let second = check_digit(&with_first, &[11, 10, 9, 8, 7, 6, 5, 4, 3, 2]);

    checks == [first, second]
}

/// Validate a CNPJ's two check digits.
#[must_use]
pub fn is_valid_cnpj(input: &str) -> bool {
    let Some(values) = digit_values(input, 14) else {
        return false;
    };
    if all_equal(&values) {
        return false;
    }

    let (body, checks) = values.split_at(12);
    let first = check_digit(body, &[5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2]);
    let mut with_first = body.to_vec();
    with_first.push(first);
    let second = check_digit(&with_first, &[6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2]);

    checks == [first, second]
}
