//! Medication heuristics over realistic purchase-order descriptions

use medtally::core::medication::{classify, coerce_quantity, derive_key, derive_key_from_fields};
use medtally::domain::{LineItem, LooseValue};
use test_case::test_case;

#[test_case("Paracetamol 500 mg comprimidos", "PARACETAMOL 500 MG" ; "plain strength")]
#[test_case("PARACETAMOL 500MG CAJA X 20", "PARACETAMOL 500 MG" ; "unit glued to strength")]
#[test_case("Amoxicilina 250 mg/5 ml suspension", "AMOXICILINA 250 MG" ; "ratio keeps first unit")]
#[test_case("Ácido fólico 1 mg", "ÁCIDO FÓLICO 1 MG" ; "accented generic")]
#[test_case("Cloruro de sodio 0,9 % 500 ml", "CLORURO DE SODIO 0,9 %" ; "decimal comma strength")]
#[test_case("Insulina NPH 100 UI/ml", "INSULINA NPH 100 UI" ; "international units")]
#[test_case("Salbutamol 100 mcg inhalador", "SALBUTAMOL 100 MCG" ; "micrograms")]
#[test_case("Sulfato ferroso polvo oral solucion 25 mg", "SULFATO FERROSO POLVO ORAL 25 MG" ; "generic capped at four words")]
#[test_case("Guantes de nitrilo talla M", "GUANTES DE NITRILO TALLA M" ; "no strength falls back to text")]
#[test_case("   ", "DESCONOCIDO" ; "blank text")]
fn test_supplier_spec_key(text: &str, expected: &str) {
    assert_eq!(derive_key_from_fields([Some(text), None, None, None]), expected);
}

#[test]
fn test_fields_are_joined_in_order() {
    // the strength only appears once the buyer spec is appended
    let key = derive_key_from_fields([Some("Losartan"), Some("50 mg"), None, None]);
    assert_eq!(key, "LOSARTAN 50 MG");

    // earliest match wins across fields
    let key = derive_key_from_fields([
        Some("Metformina 850 mg"),
        Some("Metformina 500 mg"),
        None,
        None,
    ]);
    assert_eq!(key, "METFORMINA 850 MG");
}

#[test]
fn test_item_key_uses_every_description_field() {
    let item = LineItem::builder()
        .order_code("1057-123-SE24")
        .unwrap()
        .category_code(51101500)
        .product_name("Enalapril")
        .product("10 mg comprimidos")
        .quantity(30)
        .build()
        .unwrap();

    assert!(classify(&item));
    assert_eq!(derive_key(&item), "ENALAPRIL 10 MG");
}

#[test_case("51101500", true ; "pharmaceutical segment")]
#[test_case("5", false ; "too short")]
#[test_case("42131600", false ; "medical supplies")]
#[test_case("", false ; "empty")]
fn test_classification(code: &str, expected: bool) {
    let item = LineItem::builder()
        .order_code("1057-123-SE24")
        .unwrap()
        .category_code(code)
        .build()
        .unwrap();
    assert_eq!(classify(&item), expected);
}

#[test_case(LooseValue::from("1,5"), 1.5 ; "decimal comma")]
#[test_case(LooseValue::from("1000"), 1000.0 ; "integer text")]
#[test_case(LooseValue::from(" 12 "), 12.0 ; "surrounding spaces")]
#[test_case(LooseValue::from(250), 250.0 ; "json integer")]
#[test_case(LooseValue::from(2.5), 2.5 ; "json float")]
#[test_case(LooseValue::from(""), 0.0 ; "empty text")]
fn test_quantity(raw: LooseValue, expected: f64) {
    assert_eq!(coerce_quantity(Some(&raw)).unwrap(), expected);
}

#[test_case("1.000,5" ; "thousands separator")]
#[test_case("N/A" ; "not a number")]
#[test_case("inf" ; "infinite")]
#[test_case("1_000" ; "underscore digit separator")]
fn test_quantity_rejected(raw: &str) {
    let err = coerce_quantity(Some(&LooseValue::from(raw))).unwrap_err();
    assert_eq!(err.raw, raw);
}
