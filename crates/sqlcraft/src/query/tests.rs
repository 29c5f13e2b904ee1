//! Builder tests for the query module.

use super::*;
use chrono::NaiveDate;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_new_query_selects_everything() {
    let q = Query::new();
    assert!(matches!(q.table_ref(), TableRef::None));
    assert_eq!(q.columns().len(), 1);
    assert!(q.columns()[0].is_wildcard());
    assert!(q.validate().is_ok());
}

#[test]
fn test_add_select_replaces_wildcard() {
    let q = Query::table("users").add_select("id").add_select("name");
    assert_eq!(q.columns().len(), 2);
    assert!(matches!(&q.columns()[0], ColumnRef::Name(n) if n == "id"));
}

#[test]
fn test_select_empty_keeps_wildcard() {
    let q = Query::table("users").select(Vec::<String>::new());
    assert!(q.columns()[0].is_wildcard());
}

#[test]
fn test_conditions_keep_append_order() {
    let q = Query::table("users")
        .eq("a", 1)
        .or_where("b", ">", 2)
        .is_null("c");
    let seps: Vec<_> = q.wheres().iter().map(Condition::separator).collect();
    assert_eq!(seps, vec![Separator::And, Separator::Or, Separator::And]);
}

#[test]
fn test_where_sep_any_case() {
    let q = Query::table("t").eq("a", 1).where_sep("or", "b", "=", 2);
    assert_eq!(q.wheres()[1].separator(), Separator::Or);
    assert!(q.validate().is_ok());

    let bad = Query::table("t").where_sep("xor", "b", "=", 2);
    assert!(bad.validate().unwrap_err().is_malformed());
}

#[test]
fn test_unknown_operator_is_recorded() {
    let q = Query::table("t").and_where("a", "= 1 OR 1 =", 1);
    assert!(q.wheres().is_empty());
    assert!(q.validate().unwrap_err().is_malformed());
}

#[test]
fn test_first_error_wins() {
    let q = Query::table("t").and_where("a", "??", 1).in_list("b", Vec::<i32>::new());
    let err = q.validate().unwrap_err();
    assert!(err.to_string().contains("??"));
}

#[test]
fn test_empty_in_list_is_malformed() {
    let q = Query::table("t").in_list("id", Vec::<i64>::new());
    assert!(q.validate().unwrap_err().is_malformed());
}

#[test]
fn test_pattern_operator_on_date_is_malformed() {
    let q = Query::table("t").where_date("created_at", "LIKE", day(2024, 1, 1));
    assert!(q.validate().unwrap_err().is_malformed());
}

#[test]
fn test_nested_group_error_propagates() {
    let q = Query::table("t").where_group(|q| q.and_where("a", "nope", 1));
    assert!(q.validate().is_err());

    let q = Query::table("t").exists(|q| q.from("u").in_list("x", Vec::<i32>::new()));
    assert!(q.validate().is_err());
}

#[test]
fn test_join_error_propagates() {
    let q = Query::table("users").join("orders", "users.id", "===", "orders.user_id");
    assert!(q.validate().is_err());
}

#[test]
fn test_child_query_is_independent() {
    let parent = Query::table("users").eq("active", true);
    let q = parent.clone().where_group(|child| child.eq("a", 1).eq("b", 2));
    assert_eq!(parent.wheres().len(), 1);
    assert_eq!(q.wheres().len(), 2);
    match &q.wheres()[1] {
        Condition::Nested { query, .. } => {
            assert_eq!(query.wheres().len(), 2);
            assert!(matches!(query.table_ref(), TableRef::None));
        }
        other => panic!("expected nested group, got {other:?}"),
    }
}

#[test]
fn test_paginate() {
    let q = Query::table("t").paginate(3, 25);
    assert_eq!(q.get_limit(), Some(25));
    assert_eq!(q.get_offset(), Some(50));

    let q = Query::table("t").paginate(0, 0);
    assert_eq!(q.get_limit(), Some(1));
    assert_eq!(q.get_offset(), Some(0));
}

#[test]
fn test_when() {
    let name: Option<&str> = None;
    let q = Query::table("users")
        .when(name.is_some(), |q| q.eq("name", name))
        .when(true, |q| q.eq("active", true));
    assert_eq!(q.wheres().len(), 1);
}

#[test]
fn test_locks() {
    assert_eq!(Query::new().lock_for_update().get_lock(), Some(&Lock::Exclusive));
    assert_eq!(Query::new().shared_lock().get_lock(), Some(&Lock::Shared));
    assert_eq!(Query::new().lock(false).get_lock(), Some(&Lock::Shared));
    assert_eq!(
        Query::new().lock_raw("FOR UPDATE SKIP LOCKED").get_lock(),
        Some(&Lock::Custom("FOR UPDATE SKIP LOCKED".into()))
    );
}

#[test]
fn test_recursive_cte_flips_flag() {
    let q = Query::table("tree")
        .with("base", &[], Query::table("nodes"))
        .with_recursive("tree", &["id", "parent_id"], Query::table("nodes"));
    let ctes = q.common_table_expressions();
    assert!(ctes.recursive);
    assert_eq!(ctes.ctes.len(), 2);
    assert_eq!(ctes.ctes[1].columns, vec!["id", "parent_id"]);
}

#[test]
fn test_empty_cte_name_is_malformed() {
    let q = Query::table("t").with(" ", &[], Query::table("u"));
    assert!(q.validate().is_err());
}

#[test]
fn test_set_operations_keep_order() {
    let q = Query::table("a")
        .union(Query::table("b"))
        .except_with(|q| q.from("c"));
    let ops: Vec<_> = q.set_operations().iter().map(|s| s.operator).collect();
    assert_eq!(ops, vec![SetOperator::Union, SetOperator::Except]);
}

#[test]
fn test_from_query_without_alias() {
    let q = Query::new().from_query(|q| q.from("users").eq("a", 1));
    match q.table_ref() {
        TableRef::Subquery(sub) => {
            assert!(sub.get_alias().is_none());
            assert!(!sub.provides_builder_instance());
        }
        other => panic!("expected subquery, got {other:?}"),
    }
}

#[test]
fn test_subquery_builder_runs_on_fresh_query() {
    let sub = Subquery::builder(|q| q.from("orders").gt("total", 100)).alias("big");
    assert!(sub.provides_builder_instance());
    let resolved = sub.resolve();
    assert_eq!(resolved.wheres().len(), 1);
    // Resolving again yields a fresh child, not an accumulated one.
    assert_eq!(sub.resolve().wheres().len(), 1);
}

#[test]
fn test_order_by_columns_skips_empty() {
    let q = Query::table("t")
        .order_by_columns(Vec::<String>::new(), Direction::Asc)
        .order_by_desc("created_at");
    assert_eq!(q.orderings().len(), 1);
    assert_eq!(q.orderings()[0].direction, Direction::Desc);
}

#[test]
fn test_group_by_and_distinct() {
    let q = Query::table("t").distinct().group_by(["a", "b"]).group_by(["c"]);
    assert!(q.is_distinct());
    assert_eq!(q.groupings(), ["a", "b", "c"]);
}
