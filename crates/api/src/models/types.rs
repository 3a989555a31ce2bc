//! Structural type values as produced by the type checker.
//!
//! Named types are referenced by id into the [`TypeStore`](super::TypeStore);
//! every other variant is a plain value, so derived types such as `*T` or
//! `[]T` can be built by consumers without touching the snapshot.

use std::sync::Arc;

use smol_str::SmolStr;

use super::symbol::SymbolId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamedId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicKind {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    UnsafePointer,
    UntypedBool,
    UntypedInt,
    UntypedRune,
    UntypedFloat,
    UntypedString,
    UntypedNil,
}

/// Constant class of a basic type, used to compare untyped constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstClass {
    Bool,
    Int,
    Float,
    Complex,
    String,
}

impl BasicKind {
    pub fn name(self) -> &'static str {
        match self {
            BasicKind::Bool => "bool",
            BasicKind::Int => "int",
            BasicKind::Int8 => "int8",
            BasicKind::Int16 => "int16",
            BasicKind::Int32 => "int32",
            BasicKind::Int64 => "int64",
            BasicKind::Uint => "uint",
            BasicKind::Uint8 => "uint8",
            BasicKind::Uint16 => "uint16",
            BasicKind::Uint32 => "uint32",
            BasicKind::Uint64 => "uint64",
            BasicKind::Uintptr => "uintptr",
            BasicKind::Float32 => "float32",
            BasicKind::Float64 => "float64",
            BasicKind::Complex64 => "complex64",
            BasicKind::Complex128 => "complex128",
            BasicKind::String => "string",
            BasicKind::UnsafePointer => "unsafe.Pointer",
            BasicKind::UntypedBool => "untyped bool",
            BasicKind::UntypedInt => "untyped int",
            BasicKind::UntypedRune => "untyped rune",
            BasicKind::UntypedFloat => "untyped float",
            BasicKind::UntypedString => "untyped string",
            BasicKind::UntypedNil => "untyped nil",
        }
    }

    pub fn is_untyped(self) -> bool {
        matches!(
            self,
            BasicKind::UntypedBool
                | BasicKind::UntypedInt
                | BasicKind::UntypedRune
                | BasicKind::UntypedFloat
                | BasicKind::UntypedString
                | BasicKind::UntypedNil
        )
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            BasicKind::Int
                | BasicKind::Int8
                | BasicKind::Int16
                | BasicKind::Int32
                | BasicKind::Int64
                | BasicKind::Uint
                | BasicKind::Uint8
                | BasicKind::Uint16
                | BasicKind::Uint32
                | BasicKind::Uint64
                | BasicKind::Uintptr
                | BasicKind::UntypedInt
                | BasicKind::UntypedRune
        )
    }

    pub fn is_float(self) -> bool {
        matches!(
            self,
            BasicKind::Float32 | BasicKind::Float64 | BasicKind::UntypedFloat
        )
    }

    pub fn is_complex(self) -> bool {
        matches!(self, BasicKind::Complex64 | BasicKind::Complex128)
    }

    pub fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float() || self.is_complex()
    }

    pub fn is_string(self) -> bool {
        matches!(self, BasicKind::String | BasicKind::UntypedString)
    }

    pub fn is_boolean(self) -> bool {
        matches!(self, BasicKind::Bool | BasicKind::UntypedBool)
    }

    pub fn const_class(self) -> Option<ConstClass> {
        if self.is_boolean() {
            Some(ConstClass::Bool)
        } else if self.is_integer() {
            Some(ConstClass::Int)
        } else if self.is_float() {
            Some(ConstClass::Float)
        } else if self.is_complex() {
            Some(ConstClass::Complex)
        } else if self.is_string() {
            Some(ConstClass::String)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Param {
    pub name: SmolStr,
    pub ty: TypeRef,
}

impl Param {
    pub fn new(name: impl Into<SmolStr>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    pub fn unnamed(ty: TypeRef) -> Self {
        Self {
            name: SmolStr::default(),
            ty,
        }
    }
}

/// A function signature. For a variadic signature the last parameter's type
/// is the slice type (`...string` is stored as `[]string`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Signature {
    pub recv: Option<Param>,
    pub params: Vec<Param>,
    pub results: Vec<Param>,
    pub variadic: bool,
}

impl Signature {
    pub fn new(params: Vec<Param>, results: Vec<Param>) -> Self {
        Self {
            recv: None,
            params,
            results,
            variadic: false,
        }
    }

    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    pub fn with_recv(mut self, recv: Param) -> Self {
        self.recv = Some(recv);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct StructType {
    pub fields: Vec<SymbolId>,
}

/// Embedded interfaces are expected to be flattened into `methods`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct InterfaceType {
    pub methods: Vec<SymbolId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Invalid,
    Basic(BasicKind),
    Named(NamedId),
    Pointer(Box<TypeRef>),
    Slice(Box<TypeRef>),
    Array { len: u64, elem: Box<TypeRef> },
    Map { key: Box<TypeRef>, value: Box<TypeRef> },
    Chan { dir: ChanDir, elem: Box<TypeRef> },
    Signature(Arc<Signature>),
    Struct(Arc<StructType>),
    Interface(Arc<InterfaceType>),
    Tuple(Arc<Vec<TypeRef>>),
}

impl TypeRef {
    pub fn pointer(elem: TypeRef) -> Self {
        TypeRef::Pointer(Box::new(elem))
    }

    pub fn slice(elem: TypeRef) -> Self {
        TypeRef::Slice(Box::new(elem))
    }

    pub fn array(len: u64, elem: TypeRef) -> Self {
        TypeRef::Array {
            len,
            elem: Box::new(elem),
        }
    }

    pub fn map(key: TypeRef, value: TypeRef) -> Self {
        TypeRef::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn chan(dir: ChanDir, elem: TypeRef) -> Self {
        TypeRef::Chan {
            dir,
            elem: Box::new(elem),
        }
    }

    pub fn signature(sig: Signature) -> Self {
        TypeRef::Signature(Arc::new(sig))
    }

    pub fn empty_interface() -> Self {
        TypeRef::Interface(Arc::new(InterfaceType::default()))
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, TypeRef::Invalid)
    }

    pub fn as_named(&self) -> Option<NamedId> {
        match self {
            TypeRef::Named(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_untyped(&self) -> bool {
        matches!(self, TypeRef::Basic(kind) if kind.is_untyped())
    }
}

#[derive(Debug, Clone)]
pub struct NamedType {
    pub obj: SymbolId,
    pub underlying: TypeRef,
    pub methods: Vec<SymbolId>,
}
