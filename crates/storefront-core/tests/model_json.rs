//! Wire shape of request and response bodies.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use storefront_core::{NewProduct, NewUser, User};

#[test]
fn new_user_rejects_unknown_fields() {
    let err = serde_json::from_str::<NewUser>(r#"{"name":"a","email":"a@b","admin":true}"#);
    assert!(err.is_err());
}

#[test]
fn new_product_parses() {
    let p: NewProduct = serde_json::from_str(r#"{"name":"Lamp","price_cents":2500}"#).unwrap();
    assert_eq!(p.price_cents, 2500);
    p.validate().expect("valid product");
}

#[test]
fn user_serializes_flat() {
    let u = User { id: 3, name: "Grace".into(), email: "grace@example.com".into() };
    let v = serde_json::to_value(&u).unwrap();
    assert_eq!(v["id"], 3);
    assert_eq!(v["email"], "grace@example.com");
}
