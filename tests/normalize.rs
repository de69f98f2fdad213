mod common;

use common::models_source;
use relatable::{Error, Value, equalities};

#[test]
fn equality_entries_keep_original_order() {
    let rel = models_source()
        .r#where(equalities! { name: "chris", age: 26 })
        .unwrap();

    assert_eq!(rel.wheres().len(), 1);
    let fragment = &rel.wheres()[0];
    assert_eq!(
        fragment.sql(),
        "\"models\".\"name\" = ? \nAND \"models\".\"age\" = ?"
    );
    assert_eq!(
        fragment.binds(),
        vec![&Value::Text("chris".into()), &Value::Integer(26)]
    );
}

#[test]
fn only_entries_after_the_first_carry_an_and_prefix() {
    let rel = models_source()
        .r#where(equalities! { id: 1, name: "a", age: 2 })
        .unwrap();

    let sql = rel.wheres()[0].sql();
    let conditions: Vec<&str> = sql.split(" \n").collect();
    assert_eq!(conditions.len(), 3);
    assert!(!conditions[0].starts_with("AND "));
    assert!(conditions[1].starts_with("AND "));
    assert!(conditions[2].starts_with("AND "));
}

#[test]
fn list_value_becomes_one_in_group() {
    let rel = models_source()
        .r#where(equalities! { active: vec![true, false] })
        .unwrap();

    let fragment = &rel.wheres()[0];
    assert_eq!(fragment.sql(), "\"models\".\"active\" IN(?)");
    // Two values for one conceptual placeholder group.
    assert_eq!(
        fragment.binds(),
        vec![&Value::Integer(1), &Value::Integer(0)]
    );
}

#[test]
fn raw_string_passes_through_unchanged() {
    let rel = models_source().r#where("email IS NOT NULL").unwrap();

    let fragment = &rel.wheres()[0];
    assert_eq!(fragment.sql(), "email IS NOT NULL");
    assert!(fragment.binds().is_empty());
}

#[test]
fn raw_scalar_bind_wraps_into_one_element_sequence() {
    let rel = models_source().r#where(("age > ?", 18)).unwrap();

    let fragment = &rel.wheres()[0];
    assert_eq!(fragment.sql(), "age > ?");
    assert_eq!(fragment.binds(), vec![&Value::Integer(18)]);
}

#[test]
fn raw_bind_list_matches_raw_scalar_bind() {
    let scalar = models_source().r#where(("age > ?", 18)).unwrap();
    let list = models_source().r#where(("age > ?", vec![18])).unwrap();

    assert_eq!(scalar.wheres(), list.wheres());
}

#[test]
fn declared_columns_cast_incoming_values() {
    let rel = models_source()
        .r#where(equalities! { age: "26", active: "true" })
        .unwrap();

    assert_eq!(
        rel.wheres()[0].binds(),
        vec![&Value::Integer(26), &Value::Integer(1)]
    );
}

#[test]
fn undeclared_columns_pass_through_uncast() {
    let rel = models_source()
        .r#where(equalities! { email: "x@example.com" })
        .unwrap();

    assert_eq!(
        rel.wheres()[0].binds(),
        vec![&Value::Text("x@example.com".into())]
    );
}

#[test]
fn cast_failure_surfaces_at_normalization() {
    let err = models_source()
        .r#where(equalities! { age: "not-a-number" })
        .unwrap_err();

    match err {
        Error::Cast { column, .. } => assert_eq!(column, "age"),
        other => panic!("expected a cast error, got {other:?}"),
    }
}

#[test]
fn list_elements_cast_individually() {
    let err = models_source()
        .r#where(equalities! { age: vec!["5", "six"] })
        .unwrap_err();

    assert!(matches!(err, Error::Cast { .. }));
}

#[test]
fn chained_where_calls_keep_fragments_in_call_order() {
    let rel = models_source()
        .r#where(equalities! { name: "chris", age: 26 })
        .unwrap()
        .r#where(equalities! { active: true })
        .unwrap()
        .r#where("email IS NOT NULL")
        .unwrap();

    assert_eq!(rel.wheres().len(), 3);
    assert_eq!(
        rel.wheres()[0].sql(),
        "\"models\".\"name\" = ? \nAND \"models\".\"age\" = ?"
    );
    assert_eq!(
        rel.wheres()[0].binds(),
        vec![&Value::Text("chris".into()), &Value::Integer(26)]
    );
    assert_eq!(rel.wheres()[1].sql(), "\"models\".\"active\" = ?");
    assert_eq!(rel.wheres()[1].binds(), vec![&Value::Integer(1)]);
    assert_eq!(rel.wheres()[2].sql(), "email IS NOT NULL");
    assert!(rel.wheres()[2].binds().is_empty());
}

#[test]
fn empty_equality_mapping_is_a_no_op() {
    let rel = models_source()
        .relation()
        .r#where(relatable::WhereInput::Equalities(Vec::new()))
        .unwrap();

    assert!(rel.wheres().is_empty());
}
