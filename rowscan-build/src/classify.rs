//! Field type classification.
//!
//! A declared field type is decomposed into a [`TypeExpr`] tree and then
//! collapsed into the flat `(type_name, is_array)` pair stored on each
//! [`FieldDescriptor`](crate::FieldDescriptor).

use std::fmt;

use quote::ToTokens;
use syn::{
    AngleBracketedGenericArguments, GenericArgument, Path, PathArguments, PathSegment, ReturnType,
    Type,
};

/// Pointer-like wrappers. These stay part of the type name and never make a
/// field an array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerKind {
    /// `&T`, `&'a T` or `&mut T`
    Ref { lifetime: Option<String>, mutable: bool },
    /// `*const T` or `*mut T`
    Raw { mutable: bool },
    /// `Box<T>`
    Boxed,
    /// `Option<T>`, the nullable column wrapper
    Optional,
}

/// Sequence wrappers that mark a field as an array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceKind {
    /// `Vec<T>`
    Vec,
    /// `[T]`
    Slice,
    /// `[T; N]`
    Array { len: String },
}

/// Structured view of a field's declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// Single-segment path without generic arguments (`i64`, `String`, `Uuid`).
    Primitive(String),
    /// Multi-segment path (`chrono::NaiveDateTime`). `name` carries the last
    /// segment including its generic arguments.
    Qualified { namespace: String, name: String },
    Pointer { kind: PointerKind, inner: Box<TypeExpr> },
    Sequence { kind: SequenceKind, inner: Box<TypeExpr> },
    /// Anything else (tuples, generic single-segment paths, trait objects),
    /// kept as normalized text.
    Opaque(String),
}

impl TypeExpr {
    pub fn from_type(ty: &Type) -> Self {
        match ty {
            Type::Path(type_path) if type_path.qself.is_none() => Self::from_path(&type_path.path),
            Type::Reference(reference) => Self::Pointer {
                kind: PointerKind::Ref {
                    lifetime: reference.lifetime.as_ref().map(|lt| lt.to_string()),
                    mutable: reference.mutability.is_some(),
                },
                inner: Box::new(Self::from_type(&reference.elem)),
            },
            Type::Ptr(ptr) => Self::Pointer {
                kind: PointerKind::Raw {
                    mutable: ptr.mutability.is_some(),
                },
                inner: Box::new(Self::from_type(&ptr.elem)),
            },
            Type::Slice(slice) => Self::Sequence {
                kind: SequenceKind::Slice,
                inner: Box::new(Self::from_type(&slice.elem)),
            },
            Type::Array(array) => Self::Sequence {
                kind: SequenceKind::Array {
                    len: tokens_to_string(&array.len),
                },
                inner: Box::new(Self::from_type(&array.elem)),
            },
            Type::Paren(paren) => Self::from_type(&paren.elem),
            Type::Group(group) => Self::from_type(&group.elem),
            Type::Tuple(tuple) => {
                let elems: Vec<String> = tuple
                    .elems
                    .iter()
                    .map(|elem| Self::from_type(elem).to_string())
                    .collect();
                if elems.len() == 1 {
                    Self::Opaque(format!("({},)", elems[0]))
                } else {
                    Self::Opaque(format!("({})", elems.join(", ")))
                }
            }
            other => Self::Opaque(tokens_to_string(other)),
        }
    }

    fn from_path(path: &Path) -> Self {
        if path.leading_colon.is_none() && path.segments.len() == 1 {
            let segment = &path.segments[0];
            let ident = segment.ident.to_string();

            if let PathArguments::None = segment.arguments {
                return Self::Primitive(ident);
            }

            if let PathArguments::AngleBracketed(args) = &segment.arguments
                && let Some(inner) = single_type_argument(args)
            {
                let inner = Box::new(Self::from_type(inner));
                match ident.as_str() {
                    "Vec" => {
                        return Self::Sequence {
                            kind: SequenceKind::Vec,
                            inner,
                        };
                    }
                    "Box" => {
                        return Self::Pointer {
                            kind: PointerKind::Boxed,
                            inner,
                        };
                    }
                    "Option" => {
                        return Self::Pointer {
                            kind: PointerKind::Optional,
                            inner,
                        };
                    }
                    _ => {}
                }
            }

            return Self::Opaque(render_segment(segment));
        }

        let mut segments: Vec<String> = path.segments.iter().map(render_segment).collect();
        let name = segments.pop().unwrap_or_default();
        let mut namespace = segments.join("::");
        if path.leading_colon.is_some() {
            namespace.insert_str(0, "::");
        }

        Self::Qualified { namespace, name }
    }

    /// True when the outermost constructor is a sequence.
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Sequence { .. })
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(name) | Self::Opaque(name) => f.write_str(name),
            Self::Qualified { namespace, name } => write!(f, "{namespace}::{name}"),
            Self::Pointer { kind, inner } => match kind {
                PointerKind::Ref { lifetime, mutable } => {
                    f.write_str("&")?;
                    if let Some(lifetime) = lifetime {
                        write!(f, "{lifetime} ")?;
                    }
                    if *mutable {
                        f.write_str("mut ")?;
                    }
                    write!(f, "{inner}")
                }
                PointerKind::Raw { mutable: true } => write!(f, "*mut {inner}"),
                PointerKind::Raw { mutable: false } => write!(f, "*const {inner}"),
                PointerKind::Boxed => write!(f, "Box<{inner}>"),
                PointerKind::Optional => write!(f, "Option<{inner}>"),
            },
            Self::Sequence { kind, inner } => match kind {
                SequenceKind::Vec => write!(f, "Vec<{inner}>"),
                SequenceKind::Slice => write!(f, "[{inner}]"),
                SequenceKind::Array { len } => write!(f, "[{inner}; {len}]"),
            },
        }
    }
}

/// Collapse a declared type into `(type_name, is_array)`.
pub fn classify(ty: &Type) -> (String, bool) {
    let expr = TypeExpr::from_type(ty);
    (expr.to_string(), expr.is_array())
}

fn single_type_argument(args: &AngleBracketedGenericArguments) -> Option<&Type> {
    if args.args.len() != 1 {
        return None;
    }
    match args.args.first() {
        Some(GenericArgument::Type(ty)) => Some(ty),
        _ => None,
    }
}

fn render_segment(segment: &PathSegment) -> String {
    let ident = segment.ident.to_string();
    match &segment.arguments {
        PathArguments::None => ident,
        PathArguments::AngleBracketed(args) => {
            let rendered: Vec<String> = args.args.iter().map(render_generic_argument).collect();
            format!("{ident}<{}>", rendered.join(", "))
        }
        PathArguments::Parenthesized(args) => {
            let inputs: Vec<String> = args
                .inputs
                .iter()
                .map(|input| TypeExpr::from_type(input).to_string())
                .collect();
            match &args.output {
                ReturnType::Default => format!("{ident}({})", inputs.join(", ")),
                ReturnType::Type(_, output) => {
                    format!("{ident}({}) -> {}", inputs.join(", "), TypeExpr::from_type(output))
                }
            }
        }
    }
}

fn render_generic_argument(arg: &GenericArgument) -> String {
    match arg {
        GenericArgument::Type(ty) => TypeExpr::from_type(ty).to_string(),
        GenericArgument::Lifetime(lifetime) => lifetime.to_string(),
        GenericArgument::AssocType(assoc) => {
            format!("{} = {}", assoc.ident, TypeExpr::from_type(&assoc.ty))
        }
        other => tokens_to_string(other),
    }
}

fn tokens_to_string(tokens: &impl ToTokens) -> String {
    tokens.to_token_stream().to_string()
}
