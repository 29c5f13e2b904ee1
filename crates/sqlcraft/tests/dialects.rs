use sqlcraft::prelude::*;

fn compile(dialect: &dyn Dialect, query: &Query) -> Compiled {
    Compiler::new(dialect).select(query).unwrap()
}

#[test]
fn where_greater_than_postgres() {
    let q = Query::table("users").and_where("age", ">", 18);
    let c = compile(&Postgres, &q);
    assert_eq!(c.sql, r#"SELECT * FROM "users" WHERE "age" > ?"#);
    assert_eq!(c.params, vec![Value::Int(18)]);
}

#[test]
fn where_greater_than_mysql() {
    let q = Query::table("users").and_where("age", ">", 18);
    let c = compile(&MySql, &q);
    assert_eq!(c.sql, "SELECT * FROM `users` WHERE `age` > ?");
    assert_eq!(c.params, vec![Value::Int(18)]);
}

#[test]
fn sql_server_pages_without_ordering() {
    let q = Query::table("users").limit(10).offset(20);
    assert_eq!(
        compile(&SqlServer, &q).sql,
        "SELECT * FROM [users] ORDER BY (SELECT 0) OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY"
    );
}

#[test]
fn sql_server_keeps_explicit_ordering() {
    let q = Query::table("users").order_by_asc("id").limit(10).offset(20);
    assert_eq!(
        compile(&SqlServer, &q).sql,
        "SELECT * FROM [users] ORDER BY [id] ASC OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY"
    );
}

#[test]
fn or_group_with_single_condition() {
    let q = Query::table("users")
        .and_where("a", "=", 1)
        .or_where_group(|q| q.eq("b", 2));
    let c = compile(&Postgres, &q);
    assert_eq!(c.sql, r#"SELECT * FROM "users" WHERE "a" = ? OR ("b" = ?)"#);
    assert_eq!(c.params, vec![Value::Int(1), Value::Int(2)]);
}

#[test]
fn insert_and_return_sqlite_and_unsupported() {
    let q = Query::table("t");
    let row = Record::new().set("x", 1);

    let c = Compiler::new(&Sqlite).insert_and_return(&q, &row, &["id"]).unwrap();
    assert_eq!(c.sql, r#"INSERT INTO "t" ("x") VALUES (?) RETURNING "id""#);
    assert_eq!(c.params, vec![Value::Int(1)]);

    for dialect in [&Ansi as &dyn Dialect, &MySql] {
        let err = Compiler::new(dialect).insert_and_return(&q, &row, &["id"]).unwrap_err();
        assert!(err.is_unsupported(), "{}: {err}", dialect.name());
        assert!(err.to_string().contains(dialect.name()));
    }
}

#[test]
fn skip_twenty_take_ten_in_every_dialect() {
    let q = Query::table("t").limit(10).offset(20);
    let expected: [(&dyn Dialect, &str); 10] = [
        (&Ansi, r#"SELECT * FROM "t" LIMIT 10 OFFSET 20"#),
        (&MySql, "SELECT * FROM `t` LIMIT 10 OFFSET 20"),
        (&MariaDb, "SELECT * FROM `t` LIMIT 10 OFFSET 20"),
        (&Postgres, r#"SELECT * FROM "t" LIMIT 10 OFFSET 20"#),
        (&Sqlite, r#"SELECT * FROM "t" LIMIT 10 OFFSET 20"#),
        (
            &SqlServer,
            "SELECT * FROM [t] ORDER BY (SELECT 0) OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY",
        ),
        (&Oracle, r#"SELECT * FROM "t" OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY"#),
        (&Firebird, r#"SELECT * FROM "t" ROWS 21 TO 30"#),
        (
            &Db2 { legacy: false },
            concat!(
                r#"SELECT * FROM (SELECT "db2_inner".*, ROW_NUMBER() OVER () AS "db2_rownum""#,
                r#" FROM (SELECT * FROM "t") AS "db2_inner") AS "db2_outer""#,
                r#" WHERE "db2_rownum" BETWEEN 21 AND 30"#
            ),
        ),
        (&NuoDb, "SELECT * FROM `t` LIMIT 10 OFFSET 20"),
    ];
    for (dialect, sql) in expected {
        let c = compile(dialect, &q);
        assert_eq!(c.sql, sql, "{}", dialect.name());
        assert!(c.params.is_empty());
    }
}

#[test]
fn offset_only_in_every_dialect() {
    let q = Query::table("t").offset(5);
    let expected: [(&dyn Dialect, &str); 6] = [
        (&Postgres, r#"SELECT * FROM "t" OFFSET 5"#),
        (&MySql, "SELECT * FROM `t` LIMIT 18446744073709551615 OFFSET 5"),
        (&Sqlite, r#"SELECT * FROM "t" LIMIT -1 OFFSET 5"#),
        (&SqlServer, "SELECT * FROM [t] ORDER BY (SELECT 0) OFFSET 5 ROWS"),
        (&Oracle, r#"SELECT * FROM "t" OFFSET 5 ROWS"#),
        (&Firebird, r#"SELECT * FROM "t" ROWS 6 TO 2147483647"#),
    ];
    for (dialect, sql) in expected {
        assert_eq!(compile(dialect, &q).sql, sql, "{}", dialect.name());
    }
}

#[test]
fn db2_window_keeps_parameter_order() {
    let q = Query::table("t").eq("a", 1).order_by_desc("b").limit(5).offset(5);
    let c = compile(&Db2::new(), &q);
    assert_eq!(
        c.sql,
        concat!(
            r#"SELECT * FROM (SELECT "db2_inner".*, ROW_NUMBER() OVER () AS "db2_rownum""#,
            r#" FROM (SELECT * FROM "t" WHERE "a" = ? ORDER BY "b" DESC) AS "db2_inner") AS "db2_outer""#,
            r#" WHERE "db2_rownum" BETWEEN 6 AND 10"#
        )
    );
    assert_eq!(c.params, vec![Value::Int(1)]);
}

#[test]
fn db2_legacy_quoting() {
    let c = compile(&Db2::legacy(), &Query::table("t").eq("a", 1));
    assert_eq!(c.sql, "SELECT * FROM `t` WHERE `a` = ?");
}

#[test]
fn locks_in_every_dialect() {
    let q = Query::table("t").lock_for_update();
    let expected: [(&dyn Dialect, &str); 8] = [
        (&Ansi, r#"SELECT * FROM "t""#),
        (&MySql, "SELECT * FROM `t` FOR UPDATE"),
        (&Postgres, r#"SELECT * FROM "t" FOR UPDATE"#),
        (&Sqlite, r#"SELECT * FROM "t""#),
        (&SqlServer, "SELECT * FROM [t] WITH (UPDLOCK, ROWLOCK)"),
        (&Oracle, r#"SELECT * FROM "t" FOR UPDATE"#),
        (&Firebird, r#"SELECT * FROM "t" WITH LOCK"#),
        (
            &Db2 { legacy: false },
            r#"SELECT * FROM "t" FOR UPDATE WITH RS USE AND KEEP EXCLUSIVE LOCKS"#,
        ),
    ];
    for (dialect, sql) in expected {
        assert_eq!(compile(dialect, &q).sql, sql, "{}", dialect.name());
    }
}

#[test]
fn json_read_in_every_capable_dialect() {
    let q = Query::table("t").select(["doc->tags->0"]);
    let expected: [(&dyn Dialect, &str); 5] = [
        (&MySql, r#"SELECT JSON_UNQUOTE(JSON_EXTRACT(`doc`, '$."tags"[0]')) FROM `t`"#),
        (&Postgres, r#"SELECT "doc"->'tags'->>0 FROM "t""#),
        (&Sqlite, r#"SELECT json_extract("doc", '$."tags"[0]') FROM "t""#),
        (&SqlServer, r#"SELECT JSON_VALUE([doc], '$."tags"[0]') FROM [t]"#),
        (&Oracle, r#"SELECT JSON_VALUE("doc", '$."tags"[0]') FROM "t""#),
    ];
    for (dialect, sql) in expected {
        assert_eq!(compile(dialect, &q).sql, sql, "{}", dialect.name());
    }
    for dialect in [&Ansi as &dyn Dialect, &Firebird, &Db2::new(), &NuoDb] {
        let err = Compiler::new(dialect).select(&q).unwrap_err();
        assert!(err.is_unsupported(), "{}", dialect.name());
    }
}

#[test]
fn between_date_per_dialect() {
    let from = chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    let to = chrono::NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
    let q = Query::table("t").between_date("at", from, to);

    let c = compile(&Sqlite, &q);
    assert_eq!(c.sql, r#"SELECT * FROM "t" WHERE "at" BETWEEN ? AND ?"#);
    assert_eq!(
        c.params,
        vec![
            Value::Text("2024-05-01 00:00:00".into()),
            Value::Text("2024-05-02 23:59:59".into())
        ]
    );

    let c = compile(&Oracle, &q);
    assert_eq!(
        c.sql,
        r#"SELECT * FROM "t" WHERE TO_CHAR("at", 'YYYY-MM-DD') BETWEEN ? AND ?"#
    );
    assert_eq!(
        c.params,
        vec![Value::Text("2024-05-01".into()), Value::Text("2024-05-02".into())]
    );
}

#[test]
fn vector_search_per_dialect() {
    let q = Query::table("docs").where_vector_distance("v", vec![0.5, 1.0], VectorMetric::Cosine, 0.2);
    let expected: [(&dyn Dialect, &str); 4] = [
        (&Postgres, r#"SELECT * FROM "docs" WHERE ("v" <=> ?::text::vector) < ?"#),
        (&MariaDb, "SELECT * FROM `docs` WHERE VEC_DISTANCE_COSINE(`v`, VEC_FromText(?)) < ?"),
        (
            &SqlServer,
            "SELECT * FROM [docs] WHERE VECTOR_DISTANCE('cosine', [v], CAST(? AS VECTOR(2))) < ?",
        ),
        (&Oracle, r#"SELECT * FROM "docs" WHERE VECTOR_DISTANCE("v", TO_VECTOR(?), COSINE) < ?"#),
    ];
    for (dialect, sql) in expected {
        let c = compile(dialect, &q);
        assert_eq!(c.sql, sql, "{}", dialect.name());
        assert_eq!(c.params, vec![Value::Text("[0.5,1]".into()), Value::Float(0.2)]);
    }
}

#[test]
fn dialect_lookup_round_trips_names() {
    for dialect in sqlcraft::dialect::all() {
        let found = sqlcraft::dialect::by_name(dialect.name()).unwrap();
        assert_eq!(found.name(), dialect.name());
    }
}
