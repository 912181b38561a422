//! Formatter behaviour across the core crate.

use vitrine_core::format::{
    DocumentKind, format_currency_brl, is_valid_cnpj, is_valid_cpf, mask_cep, mask_document,
    mask_phone, parse_currency, parse_locale_number,
};
use vitrine_core::{ListFilter, build_query_string, parse_id_list};

#[test]
fn test_masks_are_idempotent() {
    for raw in ["52998224725", "529.982.247-25", "529 982 247 25"] {
        let once = mask_document(raw, DocumentKind::Cpf);
        assert_eq!(once, "529.982.247-25");
        assert_eq!(mask_document(&once, DocumentKind::Cpf), once);
    }

    let phone = mask_phone("43999998888");
    assert_eq!(mask_phone(&phone), phone);

    let cep = mask_cep("86010000");
    assert_eq!(mask_cep(&cep), cep);
}

#[test]
fn test_document_check_digits() {
    assert!(is_valid_cpf("529.982.247-25"));
    assert!(!is_valid_cpf("529.982.247-26"));
    assert!(is_valid_cnpj("11.222.333/0001-81"));
    assert!(!is_valid_cnpj("11.111.111/1111-11"));
}

#[test]
fn test_currency_parse_then_format() {
    for (raw, formatted) in [
        ("1.234,56", "R$ 1.234,56"),
        ("R$ 10", "R$ 10,00"),
        ("0,5", "R$ 0,50"),
    ] {
        assert_eq!(format_currency_brl(parse_currency(raw)), formatted);
    }
    assert_eq!(parse_currency("abc"), 0.0);
    assert_eq!(parse_locale_number("abc"), None);
}

#[test]
fn test_category_filter_query() {
    let filter = ListFilter {
        categories: parse_id_list("4, x, 9"),
        promo: true,
        ..ListFilter::default()
    };
    let query = build_query_string(&filter);
    assert!(query.starts_with("categories=4,9"));
    assert!(!query.contains("category_id="));
    assert!(query.contains("promo=true"));
}
