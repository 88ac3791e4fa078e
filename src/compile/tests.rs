use pretty_assertions::assert_eq;

use crate::ast::expr::{captured, field, lit};
use crate::ast::{FieldKind, Selector, TargetField, Value};
use crate::compile::{fixed, predicate, projection, FieldSource, ParamContext};
use crate::dialect::{Dialect, SqlGenerator};
use crate::entity::{EntityDescriptor, EntityMapping, FieldMapping};
use crate::error::RelqError;

fn user() -> EntityDescriptor {
    let mapping = EntityMapping::new("User")
        .field(FieldMapping::new("Id", FieldKind::Int).primary_key().identity())
        .field(FieldMapping::new("UserName", FieldKind::Text))
        .field(FieldMapping::new("Email", FieldKind::Text))
        .field(FieldMapping::new("Age", FieldKind::Int));
    EntityDescriptor::from_mapping(&mapping).unwrap()
}

fn pg() -> Box<dyn SqlGenerator> {
    Dialect::Postgres.generator()
}

#[test]
fn simple_equality() {
    let expr = field("UserName").eq("admin");
    let compiled = predicate::compile(&expr, &user(), pg().as_ref()).unwrap();
    assert_eq!(compiled.sql, "(\"user_name\" = @p0)");
    assert_eq!(compiled.params.len(), 1);
    assert_eq!(compiled.params[0].name, "p0");
    assert_eq!(compiled.params[0].placeholder, "@p0");
    assert_eq!(compiled.params[0].value, Value::String("admin".into()));
}

#[test]
fn captured_value_binds_like_a_literal() {
    let min_age = 18;
    let expr = field("Age").eq_expr(captured("min_age", min_age));
    let compiled = predicate::compile(&expr, &user(), pg().as_ref()).unwrap();
    assert_eq!(compiled.sql, "(\"age\" = @p0)");
    assert_eq!(compiled.params[0].value, Value::Int(18));
}

#[test]
fn nested_and_keeps_parens() {
    let expr = field("UserName").eq("admin").and(field("Age").gt(18));
    let compiled = predicate::compile(&expr, &user(), pg().as_ref()).unwrap();
    assert_eq!(compiled.sql, "((\"user_name\" = @p0) AND (\"age\" > @p1))");
}

#[test]
fn comparison_symbols() {
    let entity = user();
    let g = pg();
    for (expr, want) in [
        (field("Age").ne(1), "(\"age\" != @p0)"),
        (field("Age").gte(1), "(\"age\" >= @p0)"),
        (field("Age").lt(1), "(\"age\" < @p0)"),
        (field("Age").lte(1), "(\"age\" <= @p0)"),
    ] {
        let compiled = predicate::compile(&expr, &entity, g.as_ref()).unwrap();
        assert_eq!(compiled.sql, want);
    }
}

#[test]
fn string_methods_bind_wildcarded_patterns() {
    let entity = user();
    let g = pg();

    let contains = predicate::compile(&field("UserName").contains("adm"), &entity, g.as_ref())
        .unwrap();
    assert_eq!(contains.sql, "\"user_name\" LIKE @p0");
    assert_eq!(contains.params[0].value, Value::String("%adm%".into()));

    let starts = predicate::compile(&field("UserName").starts_with("adm"), &entity, g.as_ref())
        .unwrap();
    assert_eq!(starts.params[0].value, Value::String("adm%".into()));

    let ends = predicate::compile(&field("UserName").ends_with("adm"), &entity, g.as_ref())
        .unwrap();
    assert_eq!(ends.params[0].value, Value::String("%adm".into()));
}

#[test]
fn method_on_non_field_is_unsupported() {
    let expr = lit("abc").contains("b");
    let err = predicate::compile(&expr, &user(), pg().as_ref()).unwrap_err();
    assert!(matches!(err, RelqError::UnsupportedExpression(msg) if msg.contains("Contains")));
}

#[test]
fn negation_and_convert() {
    let expr = field("UserName").eq("admin").negate();
    let compiled = predicate::compile(&expr, &user(), pg().as_ref()).unwrap();
    assert_eq!(compiled.sql, "NOT (\"user_name\" = @p0)");

    let wrapped = field("Age").convert().eq(3);
    let compiled = predicate::compile(&wrapped, &user(), pg().as_ref()).unwrap();
    assert_eq!(compiled.sql, "(\"age\" = @p0)");
}

#[test]
fn or_chain_becomes_in_list() {
    let expr = field("UserName")
        .eq("a")
        .or(field("UserName").eq("b"))
        .or(field("UserName").eq("c"));
    let compiled = predicate::compile(&expr, &user(), pg().as_ref()).unwrap();
    assert_eq!(compiled.sql, "(\"user_name\" IN (@p0, @p1, @p2))");
    let values: Vec<_> = compiled.params.iter().map(|p| p.value.clone()).collect();
    assert_eq!(
        values,
        vec![
            Value::String("a".into()),
            Value::String("b".into()),
            Value::String("c".into()),
        ]
    );
}

#[test]
fn reversed_equality_still_rewrites() {
    let expr = lit("a").eq_expr(field("UserName")).or(field("UserName").eq("b"));
    let compiled = predicate::compile(&expr, &user(), pg().as_ref()).unwrap();
    assert_eq!(compiled.sql, "(\"user_name\" IN (@p0, @p1))");
}

#[test]
fn mixed_fields_veto_the_rewrite() {
    let expr = field("UserName").eq("a").or(field("Email").eq("b"));
    let compiled = predicate::compile(&expr, &user(), pg().as_ref()).unwrap();
    assert_eq!(compiled.sql, "((\"user_name\" = @p0) OR (\"email\" = @p1))");
}

#[test]
fn non_equality_leaf_vetoes_the_rewrite() {
    let expr = field("Age").eq(1).or(field("Age").gt(5));
    let compiled = predicate::compile(&expr, &user(), pg().as_ref()).unwrap();
    assert_eq!(compiled.sql, "((\"age\" = @p0) OR (\"age\" > @p1))");
}

#[test]
fn qualifying_sub_chain_is_rewritten_inside_a_mixed_tree() {
    let expr = field("UserName")
        .eq("a")
        .or(field("UserName").eq("b"))
        .or(field("Email").eq("x"));
    let compiled = predicate::compile(&expr, &user(), pg().as_ref()).unwrap();
    assert_eq!(
        compiled.sql,
        "((\"user_name\" IN (@p0, @p1)) OR (\"email\" = @p2))"
    );
}

#[test]
fn rewrite_continues_parameter_numbering() {
    let expr = field("Age")
        .gt(18)
        .and(field("UserName").eq("a").or(field("UserName").eq("b")));
    let compiled = predicate::compile(&expr, &user(), pg().as_ref()).unwrap();
    assert_eq!(
        compiled.sql,
        "((\"age\" > @p0) AND (\"user_name\" IN (@p1, @p2)))"
    );
}

#[test]
fn failed_rewrite_leaves_numbering_intact() {
    // The veto must not consume parameter indices before the fallback path.
    let expr = field("UserName").eq("a").or(field("Email").eq("b"));
    let entity = user();
    let g = pg();
    let mut ctx = ParamContext::new();
    let sql = predicate::compile_with(&expr, &entity, g.as_ref(), &mut ctx).unwrap();
    assert_eq!(sql, "((\"user_name\" = @p0) OR (\"email\" = @p1))");
    assert_eq!(ctx.into_params().len(), 2);
}

#[test]
fn recompilation_is_deterministic() {
    let expr = field("UserName")
        .eq("a")
        .or(field("UserName").eq("b"))
        .and(field("Age").gt(3));
    let entity = user();
    let g = pg();
    let first = predicate::compile(&expr, &entity, g.as_ref()).unwrap();
    let second = predicate::compile(&expr, &entity, g.as_ref()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn and_of_equalities_fixes_both_fields() {
    let expr = field("UserName").eq("admin").and(field("Email").eq("a@b.c"));
    let analysis = fixed::analyze(Some(&expr));
    assert_eq!(
        analysis.fixed_value("UserName"),
        Some(&Value::String("admin".into()))
    );
    assert_eq!(
        analysis.fixed_value("Email"),
        Some(&Value::String("a@b.c".into()))
    );
}

#[test]
fn or_excludes_its_fields() {
    let expr = field("UserName")
        .eq("a")
        .or(field("UserName").eq("b"))
        .and(field("Email").eq("x"));
    let analysis = fixed::analyze(Some(&expr));
    assert_eq!(analysis.fixed_value("UserName"), None);
    assert_eq!(analysis.fixed_value("Email"), Some(&Value::String("x".into())));
}

#[test]
fn exclusion_outlives_the_or_subtree() {
    // An equality AFTER the OR must not resurrect the field.
    let expr = field("UserName")
        .eq("a")
        .or(field("UserName").eq("b"))
        .and(field("UserName").eq("a"));
    let analysis = fixed::analyze(Some(&expr));
    assert_eq!(analysis.fixed_value("UserName"), None);
}

#[test]
fn null_equality_fixes_nothing() {
    let expr = field("Email").eq(Option::<String>::None);
    let analysis = fixed::analyze(Some(&expr));
    assert!(analysis.is_empty());
}

#[test]
fn inequalities_are_inert() {
    let expr = field("Age").gt(18).and(field("UserName").ne("x"));
    let analysis = fixed::analyze(Some(&expr));
    assert!(analysis.is_empty());
}

#[test]
fn fixed_field_is_elided_from_select() {
    let expr = field("Id").gt(5).and(field("UserName").eq("admin"));
    let analysis = fixed::analyze(Some(&expr));
    let selector = Selector::ObjectShape(vec![
        TargetField::new("UserName", FieldKind::Text),
        TargetField::new("Email", FieldKind::Text),
    ]);
    let plan = projection::compile(&selector, &user(), &analysis, pg().as_ref());
    assert_eq!(plan.select_clause, "\"email\" AS \"Email\"");
    assert!(!plan.all_fixed);
    assert_eq!(
        plan.fields[0].source,
        FieldSource::Fixed(Value::String("admin".into()))
    );
    assert_eq!(plan.fields[1].source, FieldSource::Column("Email".into()));
}

#[test]
fn all_fixed_collapses_to_one() {
    let expr = field("UserName").eq("admin").and(field("Email").eq("a@b.c"));
    let analysis = fixed::analyze(Some(&expr));
    let selector = Selector::ObjectShape(vec![
        TargetField::new("UserName", FieldKind::Text),
        TargetField::new("Email", FieldKind::Text),
    ]);
    let plan = projection::compile(&selector, &user(), &analysis, pg().as_ref());
    assert_eq!(plan.select_clause, "1");
    assert!(plan.all_fixed);
}

#[test]
fn untouched_fields_keep_their_aliases() {
    let expr = field("UserName").eq("a").or(field("UserName").eq("b"));
    let analysis = fixed::analyze(Some(&expr));
    let selector = Selector::ObjectShape(vec![
        TargetField::new("UserName", FieldKind::Text),
        TargetField::new("Email", FieldKind::Text),
    ]);
    let plan = projection::compile(&selector, &user(), &analysis, pg().as_ref());
    assert_eq!(
        plan.select_clause,
        "\"user_name\" AS \"UserName\", \"email\" AS \"Email\""
    );
}

#[test]
fn empty_shape_selects_star() {
    let analysis = fixed::analyze(None);
    let selector = Selector::ObjectShape(vec![]);
    let plan = projection::compile(&selector, &user(), &analysis, pg().as_ref());
    assert_eq!(plan.select_clause, "*");
    assert!(!plan.all_fixed);
}

#[test]
fn scalar_shape_has_no_alias() {
    let analysis = fixed::analyze(None);
    let selector = Selector::single("Email", FieldKind::Text);
    let plan = projection::compile(&selector, &user(), &analysis, pg().as_ref());
    assert_eq!(plan.select_clause, "\"email\"");
    assert_eq!(plan.fields[0].source, FieldSource::Column("email".into()));
}

#[test]
fn renamed_source_field_resolves_through_mapping() {
    let analysis = fixed::analyze(None);
    let selector = Selector::ObjectShape(vec![
        TargetField::new("Address", FieldKind::Text).from_source("Email"),
    ]);
    let plan = projection::compile(&selector, &user(), &analysis, pg().as_ref());
    assert_eq!(plan.select_clause, "\"email\" AS \"Address\"");
}
