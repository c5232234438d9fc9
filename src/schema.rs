//! The typed schema recovered from the file footer.
//!
//! A schema is a tree of [`Type`] nodes rooted at a struct. Column ids are
//! assigned by a depth-first pre-order walk, so the children of a node have
//! ids greater than the parent and strictly less than the parent's next
//! sibling. Column selection relies on that invariant.

use std::fmt;

use num_enum::TryFromPrimitive;

use crate::error::{OrcError, Result};
use crate::proto;

pub const DEFAULT_DECIMAL_PRECISION: u32 = 38;
pub const DEFAULT_DECIMAL_SCALE: u32 = 18;

/// The kind of a schema node, with the wire values of the footer's type
/// table.
#[derive(TryFromPrimitive, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(i32)]
pub enum TypeKind {
    Boolean = 0,
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    String = 7,
    Binary = 8,
    Timestamp = 9,
    List = 10,
    Map = 11,
    Struct = 12,
    Union = 13,
    Decimal = 14,
    Date = 15,
    Varchar = 16,
    Char = 17,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeKind::Boolean => "boolean",
            TypeKind::Byte => "tinyint",
            TypeKind::Short => "smallint",
            TypeKind::Int => "int",
            TypeKind::Long => "bigint",
            TypeKind::Float => "float",
            TypeKind::Double => "double",
            TypeKind::String => "string",
            TypeKind::Binary => "binary",
            TypeKind::Timestamp => "timestamp",
            TypeKind::List => "array",
            TypeKind::Map => "map",
            TypeKind::Struct => "struct",
            TypeKind::Union => "uniontype",
            TypeKind::Decimal => "decimal",
            TypeKind::Date => "date",
            TypeKind::Varchar => "varchar",
            TypeKind::Char => "char",
        };
        f.write_str(name)
    }
}

/// One node of the schema tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Type {
    kind: TypeKind,
    column_id: u32,
    subtypes: Vec<Type>,
    field_names: Vec<String>,
    maximum_length: u32,
    precision: u32,
    scale: u32,
}

impl Type {
    pub fn primitive(kind: TypeKind) -> Type {
        Type {
            kind,
            column_id: 0,
            subtypes: Vec::new(),
            field_names: Vec::new(),
            maximum_length: 0,
            precision: 0,
            scale: 0,
        }
    }

    pub fn char_type(kind: TypeKind, maximum_length: u32) -> Type {
        Type {
            maximum_length,
            ..Type::primitive(kind)
        }
    }

    pub fn decimal(precision: u32, scale: u32) -> Type {
        Type {
            precision,
            scale,
            ..Type::primitive(TypeKind::Decimal)
        }
    }

    pub fn struct_type<S: Into<String>>(fields: Vec<(S, Type)>) -> Type {
        let mut field_names = Vec::with_capacity(fields.len());
        let mut subtypes = Vec::with_capacity(fields.len());
        for (name, field) in fields {
            field_names.push(name.into());
            subtypes.push(field);
        }
        Type {
            subtypes,
            field_names,
            ..Type::primitive(TypeKind::Struct)
        }
    }

    pub fn list(elements: Type) -> Type {
        Type {
            subtypes: vec![elements],
            ..Type::primitive(TypeKind::List)
        }
    }

    pub fn map(keys: Type, values: Type) -> Type {
        Type {
            subtypes: vec![keys, values],
            ..Type::primitive(TypeKind::Map)
        }
    }

    pub fn union_type(variants: Vec<Type>) -> Type {
        Type {
            subtypes: variants,
            ..Type::primitive(TypeKind::Union)
        }
    }

    /// Assign column ids in depth-first pre-order starting at `root`.
    /// Returns the next free id.
    pub fn assign_ids(&mut self, root: u32) -> u32 {
        self.column_id = root;
        let mut next = root + 1;
        for child in &mut self.subtypes {
            next = child.assign_ids(next);
        }
        next
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn column_id(&self) -> u32 {
        self.column_id
    }

    pub fn subtype_count(&self) -> usize {
        self.subtypes.len()
    }

    pub fn subtype(&self, index: usize) -> &Type {
        &self.subtypes[index]
    }

    pub fn field_name(&self, index: usize) -> &str {
        &self.field_names[index]
    }

    pub fn maximum_length(&self) -> u32 {
        self.maximum_length
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Rebuild the tree from the footer's flat type table, whose edges are
    /// subtype-index lists. Malformed tables (dangling or non-monotonic
    /// indices) fail instead of recursing forever.
    pub(crate) fn from_footer(footer: &proto::Footer) -> Result<Type> {
        if footer.types.is_empty() {
            return Err(OrcError::parse("footer has no types"));
        }
        let mut root = convert_type(footer, 0)?;
        root.assign_ids(0);
        Ok(root)
    }
}

fn convert_type(footer: &proto::Footer, index: usize) -> Result<Type> {
    let raw = &footer.types[index];
    let kind = TypeKind::try_from(raw.kind.unwrap_or(-1))
        .map_err(|_| OrcError::parse(format!("unknown type kind in type {index}")))?;

    let mut subtypes = Vec::with_capacity(raw.subtypes.len());
    for &child in &raw.subtypes {
        let child = child as usize;
        if child >= footer.types.len() {
            return Err(OrcError::parse(format!(
                "type {index} references missing type {child}"
            )));
        }
        if child <= index {
            return Err(OrcError::parse(format!(
                "type {index} references earlier type {child}"
            )));
        }
        subtypes.push(convert_type(footer, child)?);
    }

    Ok(Type {
        kind,
        column_id: 0,
        subtypes,
        field_names: raw.field_names.clone(),
        maximum_length: raw.maximum_length.unwrap_or(0),
        precision: raw.precision.unwrap_or(DEFAULT_DECIMAL_PRECISION),
        scale: raw.scale.unwrap_or(DEFAULT_DECIMAL_SCALE),
    })
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TypeKind::Struct => {
                write!(f, "struct<")?;
                for (i, child) in self.subtypes.iter().enumerate() {
                    if i != 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}:{}", self.field_names[i], child)?;
                }
                write!(f, ">")
            }
            TypeKind::List => write!(f, "array<{}>", self.subtypes[0]),
            TypeKind::Map => write!(f, "map<{},{}>", self.subtypes[0], self.subtypes[1]),
            TypeKind::Union => {
                write!(f, "uniontype<")?;
                for (i, child) in self.subtypes.iter().enumerate() {
                    if i != 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{child}")?;
                }
                write!(f, ">")
            }
            TypeKind::Decimal => write!(f, "decimal({},{})", self.precision, self.scale),
            TypeKind::Varchar | TypeKind::Char => {
                write!(f, "{}({})", self.kind, self.maximum_length)
            }
            _ => write!(f, "{}", self.kind),
        }
    }
}
