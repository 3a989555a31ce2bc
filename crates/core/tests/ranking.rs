mod common;

use std::collections::HashSet;

use burrow_api::{CheckedPackage, PackageBuilder, Param, Signature, TypeRef};
use burrow_core::CompletionOptions;
use common::{FakeIndex, FuncFixture, complete, engine, engine_with, find, finish, rank, split_cursor, typing};

/// `label = <>` with locals of two types; optionally a package-level
/// `count` shadowed by the local one.
fn assignment(shadowed_global: bool) -> (CheckedPackage, usize) {
    let (src, at) = split_cursor(
        "package main\n\nvar count string\n\nfunc main() {\n\tvar title string\n\tvar count int\n\tvar label string\n\tlabel = <>\n}\n",
    );
    let mut b = PackageBuilder::new("main", "example.com/app", src);
    let string = b.universe_type("string");
    let int = b.universe_type("int");
    if shadowed_global {
        let package_scope = b.package_scope(b.current());
        let at_global = b.pos("count string").unwrap();
        b.var(package_scope, "count", string.clone(), at_global);
    }

    let main = FuncFixture::new(&mut b, "main", Signature::default());
    main.var(&mut b, "title", 0, string.clone());
    main.var(&mut b, "count", 1, int);
    let label = main.var(&mut b, "label", 0, string);

    let lhs = b.ident_nth("label", 1).unwrap();
    b.use_symbol(lhs, label);
    let rhs = typing(&mut b, "", at);
    let tok = b.pos(" = ").unwrap() + 1;
    let assign = b.assign(vec![lhs], vec![rhs], tok, false);
    let decl = main.decl(&mut b, vec![assign]);
    (finish(b, vec![decl]), at)
}

#[tokio::test]
async fn values_of_the_assigned_type_rank_first() {
    let (pkg, at) = assignment(false);
    let (engine, _) = engine(FakeIndex::default());

    let list = complete(&engine, &pkg, at).await;
    assert!(rank(&list, "title") < rank(&list, "count"));
    assert!(rank(&list, "label") < rank(&list, "count"));
    assert_eq!(list.surrounding.prefix, "");
}

#[tokio::test]
async fn implementations_fit_an_interface_target() {
    let (src, at) = split_cursor(
        "package main\n\ntype Writer interface {\n\tWrite(p []byte) (int, error)\n}\n\ntype Buffer struct{}\n\nfunc main() {\n\tvar buf *Buffer\n\tvar n int\n\tvar w Writer\n\tw = <>\n}\n",
    );
    let mut b = PackageBuilder::new("main", "example.com/app", src);
    let byte = b.universe_type("byte");
    let int = b.universe_type("int");
    let error = b.universe_type("error");
    let write = Signature::new(
        vec![Param::new("p", TypeRef::slice(byte))],
        vec![Param::unnamed(int.clone()), Param::unnamed(error)],
    );
    let current = b.current();
    let package_scope = b.package_scope(current);
    let method = b.interface_method(current, "Write", write.clone());
    let writer = b.named_type(
        package_scope,
        "Writer",
        PackageBuilder::interface_of(vec![method]),
        b.pos("Writer").unwrap(),
    );
    let buffer_fields = b.struct_type(current, &[]);
    let buffer = b.named_type(package_scope, "Buffer", buffer_fields, b.pos("Buffer").unwrap());
    b.method(&buffer, "Write", write, true);

    let main = FuncFixture::new(&mut b, "main", Signature::default());
    main.var(&mut b, "buf", 0, TypeRef::pointer(buffer));
    let n_at = b.pos("n int").unwrap();
    b.var(main.scope, "n", int, n_at);
    let w = main.var(&mut b, "w", 0, writer);
    let w_at = b.pos("w = ").unwrap();
    let lhs = b.ident("w", w_at);
    b.use_symbol(lhs, w);
    let rhs = typing(&mut b, "", at);
    let tok = b.pos(" = ").unwrap() + 1;
    let assign = b.assign(vec![lhs], vec![rhs], tok, false);
    let decl = main.decl(&mut b, vec![assign]);
    let pkg = finish(b, vec![decl]);
    let (engine, _) = engine(FakeIndex::default());

    let list = complete(&engine, &pkg, at).await;
    assert!(rank(&list, "buf") < rank(&list, "n"));
}

#[tokio::test]
async fn inner_declarations_hide_outer_ones() {
    let (pkg, at) = assignment(true);
    let (engine, _) = engine(FakeIndex::default());

    let list = complete(&engine, &pkg, at).await;
    let counts: Vec<_> = list.items.iter().filter(|i| i.label == "count").collect();
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].detail, "int");
}

#[tokio::test]
async fn universe_names_rank_below_locals() {
    let (src, at) = split_cursor("package main\n\nfunc main() {\n\tvar nilness bool\n\tnil<>\n}\n");
    let mut b = PackageBuilder::new("main", "example.com/app", src);
    let boolean = b.universe_type("bool");
    let main = FuncFixture::new(&mut b, "main", Signature::default());
    main.var(&mut b, "nilness", 0, boolean);
    let typed = typing(&mut b, "nil", at);
    let stmt = b.expr_stmt(typed);
    let decl = main.decl(&mut b, vec![stmt]);
    let pkg = finish(b, vec![decl]);
    let (engine, _) = engine(FakeIndex::default());

    let list = complete(&engine, &pkg, at).await;
    assert_eq!(list.surrounding.prefix, "nil");
    assert!(rank(&list, "nilness") < rank(&list, "nil"));
}

#[tokio::test]
async fn repeated_requests_give_the_same_list() {
    let (pkg, at) = assignment(true);
    let (engine, _) = engine(FakeIndex::default());

    let first = complete(&engine, &pkg, at).await;
    let second = complete(&engine, &pkg, at).await;
    assert_eq!(first.labels(), second.labels());
    let scores = |l: &burrow_api::CompletionList| l.items.iter().map(|i| i.score).collect::<Vec<_>>();
    assert_eq!(scores(&first), scores(&second));
}

/// `title = <>` with a struct-typed local whose field fits.
fn deep_field() -> (CheckedPackage, usize) {
    let (src, at) = split_cursor(
        "package main\n\ntype Config struct {\n\tName string\n}\n\nfunc main() {\n\tvar cfg Config\n\tvar title string\n\ttitle = <>\n}\n",
    );
    let mut b = PackageBuilder::new("main", "example.com/app", src);
    let string = b.universe_type("string");
    let current = b.current();
    let package_scope = b.package_scope(current);
    let fields = b.struct_type(current, &[("Name", string.clone())]);
    let config = b.named_type(package_scope, "Config", fields, b.pos("Config").unwrap());

    let main = FuncFixture::new(&mut b, "main", Signature::default());
    main.var(&mut b, "cfg", 0, config);
    let title = main.var(&mut b, "title", 0, string);
    let lhs = b.ident_nth("title", 1).unwrap();
    b.use_symbol(lhs, title);
    let rhs = typing(&mut b, "", at);
    let tok = b.pos(" = ").unwrap() + 1;
    let assign = b.assign(vec![lhs], vec![rhs], tok, false);
    let decl = main.decl(&mut b, vec![assign]);
    (finish(b, vec![decl]), at)
}

#[tokio::test]
async fn larger_budgets_only_add_items() {
    let (pkg, at) = deep_field();
    let (shallow, _) = engine_with(
        FakeIndex::default(),
        CompletionOptions {
            budget_ms: 0,
            ..CompletionOptions::default()
        },
    );
    let (deep, _) = engine_with(
        FakeIndex::default(),
        CompletionOptions {
            budget_ms: 10_000,
            ..CompletionOptions::default()
        },
    );

    let small = complete(&shallow, &pkg, at).await;
    let large = complete(&deep, &pkg, at).await;
    let small: HashSet<_> = small.items.iter().map(|i| i.label.clone()).collect();
    let large_labels: HashSet<_> = large.items.iter().map(|i| i.label.clone()).collect();

    assert!(small.is_subset(&large_labels));
    assert!(!small.contains("cfg.Name"));
    assert!(large_labels.contains("cfg.Name"));
    // a fitting field beats the struct holding it
    assert!(rank(&large, "cfg.Name") < rank(&large, "cfg"));
}

#[tokio::test]
async fn deep_search_can_be_disabled() {
    let (pkg, at) = deep_field();
    let (engine, _) = engine_with(
        FakeIndex::default(),
        CompletionOptions {
            deep: false,
            ..CompletionOptions::default()
        },
    );

    let list = complete(&engine, &pkg, at).await;
    assert!(find(&list, "cfg").is_some());
    assert!(find(&list, "cfg.Name").is_none());
}

/// `x int` in main and `x string` in a nested block whose body is `inner`.
fn nested_x(inner: &str) -> (CheckedPackage, usize) {
    let (src, at) = split_cursor(&format!(
        "package main\n\nfunc main() {{\n\tvar x int\n\t{{\n{inner}\n\t}}\n}}\n"
    ));
    let mut b = PackageBuilder::new("main", "example.com/app", src);
    let int = b.universe_type("int");
    let string = b.universe_type("string");
    let main = FuncFixture::new(&mut b, "main", Signature::default());
    main.var(&mut b, "x", 0, int);

    let lbrace = b.pos("{\n\t\t").unwrap();
    let rbrace = b.pos("\n\t}\n}").unwrap() + 2;
    let inner_scope = b.block_scope(main.scope, lbrace, rbrace + 1);
    let inner_x = b.pos_nth("x", 1).unwrap();
    b.var(inner_scope, "x", string, inner_x);

    let typed = typing(&mut b, "", at);
    let stmt = b.expr_stmt(typed);
    let block = b.block(vec![stmt], lbrace, rbrace);
    let decl = main.decl(&mut b, vec![block]);
    (finish(b, vec![decl]), at)
}

fn details_of<'a>(list: &'a burrow_api::CompletionList, label: &str) -> Vec<&'a str> {
    list.items
        .iter()
        .filter(|i| i.label == label)
        .map(|i| i.detail.as_str())
        .collect()
}

#[tokio::test]
async fn nested_block_declarations_hide_outer_ones() {
    let (pkg, at) = nested_x("\t\tvar x string\n\t\t<>");
    let (engine, _) = engine(FakeIndex::default());

    let list = complete(&engine, &pkg, at).await;
    assert_eq!(details_of(&list, "x"), vec!["string"]);
}

#[tokio::test]
async fn later_declarations_stay_hidden() {
    let (pkg, at) = nested_x("\t\t<>\n\t\tvar x string");
    let (engine, _) = engine(FakeIndex::default());

    let list = complete(&engine, &pkg, at).await;
    assert_eq!(details_of(&list, "x"), vec!["int"]);
}
