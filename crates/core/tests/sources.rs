mod common;

use burrow_api::{NodeKind, PackageBuilder, Param, Signature, Span, TextEdit, TypeRef};
use common::{FakeIndex, FuncFixture, complete, engine, find, finish, split_cursor, typing};
use lsp_types::CompletionItemKind;

#[tokio::test]
async fn statement_keywords_follow_the_prefix() {
    let (src, at) = split_cursor("package main\n\nfunc main() {\n\tre<>\n}\n");
    let mut b = PackageBuilder::new("main", "example.com/app", src);
    let main = FuncFixture::new(&mut b, "main", Signature::default());
    let typed = typing(&mut b, "re", at);
    let stmt = b.expr_stmt(typed);
    let decl = main.decl(&mut b, vec![stmt]);
    let pkg = finish(b, vec![decl]);
    let (engine, _) = engine(FakeIndex::default());

    let list = complete(&engine, &pkg, at).await;
    let ret = find(&list, "return").unwrap();
    assert_eq!(ret.kind, CompletionItemKind::KEYWORD);
    // "break" matches the prefix but needs a loop or switch
    assert!(find(&list, "break").is_none());
}

#[tokio::test]
async fn package_clause_offers_the_package_name() {
    let (src, at) = split_cursor("package ma<>\n");
    let mut b = PackageBuilder::new("main", "example.com/app", src);
    let name = typing(&mut b, "ma", at);
    let clause = b.package_clause(0, name);
    let root = b.file(clause, Vec::new());
    let pkg = b.finish(root);
    let (engine, _) = engine(FakeIndex::default());

    let list = complete(&engine, &pkg, at).await;
    assert_eq!(list.labels(), vec!["main"]);
    assert_eq!(list.items[0].kind, CompletionItemKind::MODULE);
    assert_eq!(list.surrounding.prefix, "ma");
}

#[tokio::test]
async fn comments_offer_names_of_the_documented_declaration() {
    let (src, at) = split_cursor(
        "package main\n\n// Options holds Verb<>\ntype Options struct {\n\tVerbose bool\n}\n",
    );
    let mut b = PackageBuilder::new("main", "example.com/app", src);
    let boolean = b.universe_type("bool");
    let current = b.current();
    let package_scope = b.package_scope(current);
    let verbose = b.field(current, "Verbose", boolean, false);
    let options = b.named_type(
        package_scope,
        "Options",
        PackageBuilder::struct_of(vec![verbose]),
        b.pos_nth("Options", 1).unwrap(),
    );

    let comment_start = b.pos("//").unwrap();
    b.comment(Span::new(comment_start, at));
    let name = b.ident_nth("Options", 1).unwrap();
    if let TypeRef::Named(id) = options {
        let obj = b.store().named(id).obj;
        b.def(name, obj);
    }
    let field_name = b.ident_nth("Verbose", 0).unwrap();
    b.def(field_name, verbose);
    let field_ty = b.ident_nth("bool", 0).unwrap();
    let field = b.field_node(vec![field_name], field_ty);
    let struct_start = b.pos("struct").unwrap();
    let struct_end = b.source().rfind('}').unwrap() + 1;
    let struct_node = b.node(
        NodeKind::StructType {
            fields: vec![field],
        },
        Span::new(struct_start, struct_end),
    );
    let spec = b.type_spec(name, struct_node);
    let decl = b.gen_decl(b.pos("type").unwrap(), vec![spec]);
    let pkg = finish(b, vec![decl]);
    let (engine, _) = engine(FakeIndex::default());

    let list = complete(&engine, &pkg, at).await;
    assert_eq!(list.labels(), vec!["Verbose"]);
    assert_eq!(list.surrounding.prefix, "Verb");
    assert_eq!(list.surrounding.span, Span::new(at - 4, at));
}

#[tokio::test]
async fn postfix_templates_rewrite_the_operand() {
    let (src, at) = split_cursor("package main\n\nfunc main() {\n\tvar items []string\n\titems.<>\n}\n");
    let mut b = PackageBuilder::new("main", "example.com/app", src);
    let string = b.universe_type("string");
    let main = FuncFixture::new(&mut b, "main", Signature::default());
    let items = main.var(&mut b, "items", 0, TypeRef::slice(string));
    let x = b.ident_nth("items", 1).unwrap();
    b.use_symbol(x, items);
    let sel = typing(&mut b, "", at);
    let selector = b.selector(x, sel);
    let stmt = b.expr_stmt(selector);
    let decl = main.decl(&mut b, vec![stmt]);
    let x_start = b.pos_nth("items", 1).unwrap();
    let pkg = finish(b, vec![decl]);
    let (engine, _) = engine(FakeIndex::default());

    let list = complete(&engine, &pkg, at).await;
    for label in ["len", "last", "range", "append", "copy", "var"] {
        assert!(find(&list, label).is_some(), "{label} missing");
    }
    // bool and map templates do not apply to a slice
    assert!(find(&list, "not").is_none());
    assert!(find(&list, "keys").is_none());

    let range = find(&list, "range").unwrap();
    assert_eq!(range.kind, CompletionItemKind::SNIPPET);
    assert!(range.is_snippet);
    assert_eq!(
        range.insert_text,
        "for ${1:i}, ${2:v} := range items {\n\t$0\n}"
    );
    assert_eq!(
        range.additional_edits,
        vec![TextEdit::delete(Span::new(x_start, at))]
    );
}

#[tokio::test]
async fn error_assignments_are_followed_by_a_check() {
    let (src, at) = split_cursor(
        "package main\n\nfunc load() (int, error) {\n\tcount, err := parse()\n\t<>\n}\n",
    );
    let mut b = PackageBuilder::new("main", "example.com/app", src);
    let int = b.universe_type("int");
    let error = b.universe_type("error");
    let load = FuncFixture::new(
        &mut b,
        "load",
        Signature::new(
            Vec::new(),
            vec![Param::unnamed(int.clone()), Param::unnamed(error.clone())],
        ),
    );
    let count = load.var(&mut b, "count", 0, int);
    let err_at = b.pos("err :=").unwrap();
    let err = b.var(load.scope, "err", error, err_at);

    let count_node = b.ident_nth("count", 0).unwrap();
    b.def(count_node, count);
    let err_node = b.ident("err", err_at);
    b.def(err_node, err);
    let parse = b.ident_nth("parse", 0).unwrap();
    let tok = b.pos(":=").unwrap();
    let assign = b.assign(vec![count_node, err_node], vec![parse], tok, true);
    let typed = typing(&mut b, "", at);
    let stmt = b.expr_stmt(typed);
    let decl = load.decl(&mut b, vec![assign, stmt]);
    let pkg = finish(b, vec![decl]);
    let (engine, _) = engine(FakeIndex::default());

    let list = complete(&engine, &pkg, at).await;
    let check = find(&list, "if err != nil { return err }").unwrap();
    assert_eq!(check.insert_text, "if err != nil {\n\treturn 0, ${1:err}\n}");
    assert!(check.is_snippet);
}

#[tokio::test]
async fn unnamed_expected_types_get_literals() {
    let (src, at) = split_cursor("package main\n\nfunc main() {\n\tvar names []string\n\tnames = <>\n}\n");
    let mut b = PackageBuilder::new("main", "example.com/app", src);
    let string = b.universe_type("string");
    let main = FuncFixture::new(&mut b, "main", Signature::default());
    let names = main.var(&mut b, "names", 0, TypeRef::slice(string));
    let lhs = b.ident_nth("names", 1).unwrap();
    b.use_symbol(lhs, names);
    let rhs = typing(&mut b, "", at);
    let tok = b.pos(" = ").unwrap() + 1;
    let assign = b.assign(vec![lhs], vec![rhs], tok, false);
    let decl = main.decl(&mut b, vec![assign]);
    let pkg = finish(b, vec![decl]);
    let (engine, _) = engine(FakeIndex::default());

    let list = complete(&engine, &pkg, at).await;
    let composite = find(&list, "[]string{}").unwrap();
    assert_eq!(composite.insert_text, "[]string{$0\\}");
    let make = find(&list, "make([]string, 0)").unwrap();
    assert_eq!(make.insert_text, "make([]string, ${1:0})");
    assert_eq!(make.kind, CompletionItemKind::FUNCTION);
    assert!(make.score < composite.score);
}

#[tokio::test]
async fn comment_cursor_inside_a_multibyte_character() {
    let src = "package main\n\n// Déjà vu\n".to_string();
    let mut b = PackageBuilder::new("main", "example.com/app", src);
    let comment_start = b.pos("//").unwrap();
    let word_start = b.pos("Déjà").unwrap();
    let word_end = word_start + "Déjà".len();
    b.comment(Span::new(comment_start, b.pos(" vu").unwrap() + 3));
    let pkg = finish(b, Vec::new());
    let (engine, _) = engine(FakeIndex::default());

    // between the two bytes of "é"
    let at = word_start + 2;
    let list = complete(&engine, &pkg, at).await;
    assert!(list.items.is_empty());
    assert_eq!(list.surrounding.span, Span::new(word_start, word_end));
    assert_eq!(list.surrounding.prefix, "");
}
