use burrow_api::{BasicKind, ChanDir, PackageId, Param, Signature, TypeRef, TypeStore};

/// Renders types as Go source text, qualifying named types that live
/// outside the current package with their package name.
#[derive(Clone, Copy)]
pub struct TypeFormatter<'a> {
    store: &'a TypeStore,
    current: PackageId,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(store: &'a TypeStore, current: PackageId) -> Self {
        Self { store, current }
    }

    pub fn format(&self, ty: &TypeRef) -> String {
        let mut out = String::new();
        self.write(ty, &mut out);
        out
    }

    fn write(&self, ty: &TypeRef, out: &mut String) {
        match ty {
            TypeRef::Invalid => out.push_str("invalid type"),
            TypeRef::Basic(kind) => out.push_str(kind.name()),
            TypeRef::Named(id) => {
                let obj = self.store.symbol(self.store.named(*id).obj);
                if let Some(pkg) = obj.package
                    && pkg != self.current
                {
                    out.push_str(&self.store.package(pkg).name);
                    out.push('.');
                }
                out.push_str(&obj.name);
            }
            TypeRef::Pointer(elem) => {
                out.push('*');
                self.write(elem, out);
            }
            TypeRef::Slice(elem) => {
                out.push_str("[]");
                self.write(elem, out);
            }
            TypeRef::Array { len, elem } => {
                out.push_str(&format!("[{len}]"));
                self.write(elem, out);
            }
            TypeRef::Map { key, value } => {
                out.push_str("map[");
                self.write(key, out);
                out.push(']');
                self.write(value, out);
            }
            TypeRef::Chan { dir, elem } => {
                out.push_str(match dir {
                    ChanDir::Both => "chan ",
                    ChanDir::Send => "chan<- ",
                    ChanDir::Recv => "<-chan ",
                });
                self.write(elem, out);
            }
            TypeRef::Signature(sig) => {
                out.push_str("func");
                out.push_str(&self.signature(sig));
            }
            TypeRef::Struct(st) => {
                out.push_str("struct{");
                let fields: Vec<String> = st
                    .fields
                    .iter()
                    .map(|f| {
                        let field = self.store.symbol(*f);
                        let ty = field.ty.as_ref().map(|t| self.format(t)).unwrap_or_default();
                        if field.is_embedded() {
                            ty
                        } else {
                            format!("{} {ty}", field.name)
                        }
                    })
                    .collect();
                out.push_str(&fields.join("; "));
                out.push('}');
            }
            TypeRef::Interface(iface) => {
                if iface.methods.is_empty() {
                    out.push_str("interface{}");
                    return;
                }
                out.push_str("interface{");
                let methods: Vec<String> = iface
                    .methods
                    .iter()
                    .map(|m| {
                        let method = self.store.symbol(*m);
                        match &method.ty {
                            Some(TypeRef::Signature(sig)) => {
                                format!("{}{}", method.name, self.signature(sig))
                            }
                            _ => method.name.to_string(),
                        }
                    })
                    .collect();
                out.push_str(&methods.join("; "));
                out.push('}');
            }
            TypeRef::Tuple(items) => {
                let parts: Vec<String> = items.iter().map(|t| self.format(t)).collect();
                out.push('(');
                out.push_str(&parts.join(", "));
                out.push(')');
            }
        }
    }

    /// `(a int, b ...string) (int, error)`, without the `func` keyword.
    pub fn signature(&self, sig: &Signature) -> String {
        let params = self.params(sig);
        let results = self.results(sig);
        if results.is_empty() {
            format!("({params})")
        } else {
            format!("({params}) {results}")
        }
    }

    pub fn params(&self, sig: &Signature) -> String {
        self.param_texts(sig).join(", ")
    }

    /// One entry per parameter, variadic tail written as `...T`.
    pub fn param_texts(&self, sig: &Signature) -> Vec<String> {
        let last = sig.params.len().saturating_sub(1);
        sig.params
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let ty = match (&p.ty, sig.variadic && i == last) {
                    (TypeRef::Slice(elem), true) => format!("...{}", self.format(elem)),
                    (ty, _) => self.format(ty),
                };
                if p.name.is_empty() {
                    ty
                } else {
                    format!("{} {ty}", p.name)
                }
            })
            .collect()
    }

    pub fn results(&self, sig: &Signature) -> String {
        match sig.results.as_slice() {
            [] => String::new(),
            [Param { name, ty }] if name.is_empty() => self.format(ty),
            results => {
                let parts: Vec<String> = results
                    .iter()
                    .map(|p| {
                        if p.name.is_empty() {
                            self.format(&p.ty)
                        } else {
                            format!("{} {}", p.name, self.format(&p.ty))
                        }
                    })
                    .collect();
                format!("({})", parts.join(", "))
            }
        }
    }

    /// Detail text shown next to an item: untyped constants read as their kind.
    pub fn detail(&self, ty: &TypeRef) -> String {
        match ty {
            TypeRef::Basic(BasicKind::UntypedNil) => "untyped nil".to_string(),
            other => self
                .format(other)
                .trim_start_matches("untyped ")
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burrow_api::PackageBuilder;

    #[test]
    fn qualifies_foreign_named_types() {
        let mut b = PackageBuilder::new("main", "example.com/app", "package main\n");
        let io = b.add_package("io", "io");
        let io_scope = b.package_scope(io);
        let writer = b.named_type(io_scope, "Writer", TypeRef::empty_interface(), 0);
        let file = b.file_scope();
        let local = b.named_type(file, "Local", TypeRef::Basic(BasicKind::Int), 0);
        let f = TypeFormatter::new(b.store(), b.current());

        assert_eq!(f.format(&TypeRef::slice(writer)), "[]io.Writer");
        assert_eq!(f.format(&TypeRef::map(TypeRef::Basic(BasicKind::String), local)), "map[string]Local");
    }

    #[test]
    fn variadic_signatures_show_dots() {
        let b = PackageBuilder::new("main", "example.com/app", "package main\n");
        let f = TypeFormatter::new(b.store(), b.current());
        let sig = Signature::new(
            vec![
                Param::new("a", TypeRef::Basic(BasicKind::Int)),
                Param::new("b", TypeRef::slice(TypeRef::Basic(BasicKind::String))),
            ],
            vec![
                Param::unnamed(TypeRef::Basic(BasicKind::Int)),
                Param::unnamed(b.universe_type("error")),
            ],
        )
        .variadic();
        assert_eq!(f.signature(&sig), "(a int, b ...string) (int, error)");
        assert_eq!(f.detail(&TypeRef::Basic(BasicKind::UntypedFloat)), "float");
    }
}
