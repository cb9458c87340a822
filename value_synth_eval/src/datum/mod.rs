//! Dynamic values manipulated by evaluated plans.
//!
//! [`Datum`] models the runtime values a generated builder and value type
//! handle: the null reference, the eight primitive kinds, text, arrays,
//! optionals, containers, one-shot iterators, and instances of the
//! synthesized types. Containers and instances have identity, so aliasing
//! between a builder and the values it produced is observable.

mod semantics;


use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use value_synth::OptionalFlavor;
use value_synth::plan::{ContainerKind, TypeRole};

use crate::error::{EvalError, EvalResult};

pub(crate) use semantics::{
    canonical_f32_bits, canonical_f64_bits, fold_long, ordered_hash, render_elements,
};

/// Stored contents of a container.
#[derive(Debug, Clone)]
enum Contents {
    Elements(Vec<Datum>),
    Entries(Vec<(Datum, Datum)>),
}

/// A list, set, or map with identity.
#[derive(Debug)]
pub struct Container {
    kind: ContainerKind,
    writable: bool,
    contents: Contents,
}

impl Container {
    fn empty(kind: ContainerKind, writable: bool) -> Self {
        let contents = match kind {
            ContainerKind::Map => Contents::Entries(Vec::new()),
            ContainerKind::List | ContainerKind::Set => Contents::Elements(Vec::new()),
        };
        Self {
            kind,
            writable,
            contents,
        }
    }

    /// The container's kind.
    #[must_use]
    pub const fn kind(&self) -> ContainerKind {
        self.kind
    }

    fn size(&self) -> usize {
        match &self.contents {
            Contents::Elements(items) => items.len(),
            Contents::Entries(entries) => entries.len(),
        }
    }

    fn guard(&self, what: &str) -> EvalResult<()> {
        if self.writable {
            Ok(())
        } else {
            Err(EvalError::UnsupportedOperation {
                what: format!("{what} on an unmodifiable {}", kind_label(self.kind)),
            })
        }
    }

    /// Appends to a list; adds to a set unless an equal element is present.
    fn add(&mut self, item: Datum) -> EvalResult<()> {
        let kind = self.kind;
        let Contents::Elements(items) = &mut self.contents else {
            return Err(EvalError::mismatch("list or set", kind_label(kind)));
        };
        if kind == ContainerKind::List || !items.contains(&item) {
            items.push(item);
        }
        Ok(())
    }

    /// Puts an entry, replacing any entry with an equal key.
    fn put(&mut self, key: Datum, value: Datum) -> EvalResult<()> {
        let Contents::Entries(entries) = &mut self.contents else {
            return Err(EvalError::mismatch("map", kind_label(self.kind)));
        };
        entries.retain(|(existing, _)| *existing != key);
        entries.push((key, value));
        Ok(())
    }
}

const fn kind_label(kind: ContainerKind) -> &'static str {
    match kind {
        ContainerKind::List => "list",
        ContainerKind::Set => "set",
        ContainerKind::Map => "map",
    }
}

/// An instance of a synthesized type.
#[derive(Debug)]
pub struct Instance {
    pub(crate) id: u32,
    pub(crate) type_name: String,
    pub(crate) role: TypeRole,
    pub(crate) implements: Vec<String>,
    pub(crate) fields: HashMap<String, Datum>,
}

impl Instance {
    /// Simple name of the instance's type.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Builder or value.
    #[must_use]
    pub const fn role(&self) -> TypeRole {
        self.role
    }

    /// Whether the instance is of `type_name`, directly or by interface.
    #[must_use]
    pub fn is_instance_of(&self, type_name: &str) -> bool {
        self.type_name == type_name || self.implements.iter().any(|i| i == type_name)
    }
}

/// A runtime value.
#[derive(Debug, Clone)]
pub enum Datum {
    /// The null reference.
    Null,
    /// `boolean`.
    Boolean(bool),
    /// `byte`.
    Byte(i8),
    /// `short`.
    Short(i16),
    /// `char`, as a UTF-16 code unit.
    Char(u16),
    /// `int`.
    Int(i32),
    /// `long`.
    Long(i64),
    /// `float`.
    Float(f32),
    /// `double`.
    Double(f64),
    /// A string.
    Text(String),
    /// An array, compared by identity.
    Array(Rc<[Datum]>),
    /// An optional of either flavour.
    Optional {
        /// Which optional type.
        flavor: OptionalFlavor,
        /// The present value, if any.
        value: Option<Box<Datum>>,
    },
    /// A list, set, or map.
    Container(Rc<RefCell<Container>>),
    /// An iterable that is not a collection.
    Iterable(Rc<[Datum]>),
    /// A one-shot iterator.
    Iterator(Rc<RefCell<VecDeque<Datum>>>),
    /// A builder or value instance.
    Object(Rc<RefCell<Instance>>),
}

impl Datum {
    /// A string.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    fn container(kind: ContainerKind, writable: bool, contents: Contents) -> Self {
        Self::Container(Rc::new(RefCell::new(Container {
            kind,
            writable,
            contents,
        })))
    }

    /// A mutable list, as a caller would build with `new ArrayList<>()`.
    #[must_use]
    pub fn list(items: impl IntoIterator<Item = Self>) -> Self {
        Self::container(
            ContainerKind::List,
            true,
            Contents::Elements(items.into_iter().collect()),
        )
    }

    /// A mutable set; equal elements collapse.
    #[must_use]
    pub fn set(items: impl IntoIterator<Item = Self>) -> Self {
        let mut elements: Vec<Self> = Vec::new();
        for item in items {
            if !elements.contains(&item) {
                elements.push(item);
            }
        }
        Self::container(ContainerKind::Set, true, Contents::Elements(elements))
    }

    /// A mutable map; a later entry replaces an earlier one with an equal key.
    #[must_use]
    pub fn map(entries: impl IntoIterator<Item = (Self, Self)>) -> Self {
        let mut stored: Vec<(Self, Self)> = Vec::new();
        for (key, value) in entries {
            stored.retain(|(existing, _)| *existing != key);
            stored.push((key, value));
        }
        Self::container(ContainerKind::Map, true, Contents::Entries(stored))
    }

    /// An array.
    #[must_use]
    pub fn array(items: impl IntoIterator<Item = Self>) -> Self {
        Self::Array(items.into_iter().collect())
    }

    /// An iterable that is not a collection.
    #[must_use]
    pub fn iterable(items: impl IntoIterator<Item = Self>) -> Self {
        Self::Iterable(items.into_iter().collect())
    }

    /// A one-shot iterator.
    #[must_use]
    pub fn iterator(items: impl IntoIterator<Item = Self>) -> Self {
        Self::Iterator(Rc::new(RefCell::new(items.into_iter().collect())))
    }

    /// A present optional.
    #[must_use]
    pub fn present(flavor: OptionalFlavor, value: Self) -> Self {
        Self::Optional {
            flavor,
            value: Some(Box::new(value)),
        }
    }

    /// An absent optional.
    #[must_use]
    pub const fn absent(flavor: OptionalFlavor) -> Self {
        Self::Optional {
            flavor,
            value: None,
        }
    }

    /// Whether this is the null reference.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short description of the value's shape, for error messages.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Byte(_) => "byte",
            Self::Short(_) => "short",
            Self::Char(_) => "char",
            Self::Int(_) => "int",
            Self::Long(_) => "long",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::Text(_) => "text",
            Self::Array(_) => "array",
            Self::Optional { .. } => "optional",
            Self::Container(c) => kind_label(c.borrow().kind),
            Self::Iterable(_) => "iterable",
            Self::Iterator(_) => "iterator",
            Self::Object(_) => "object",
        }
    }

    /// Whether both values are the same instance.
    ///
    /// Only arrays, containers, iterables, iterators, and objects have
    /// identity; every other value is never the same instance as anything.
    #[must_use]
    pub fn same_instance(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Array(a), Self::Array(b)) | (Self::Iterable(a), Self::Iterable(b)) => {
                Rc::ptr_eq(a, b)
            }
            (Self::Container(a), Self::Container(b)) => Rc::ptr_eq(a, b),
            (Self::Iterator(a), Self::Iterator(b)) => Rc::ptr_eq(a, b),
            (Self::Object(a), Self::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Kind of a container value.
    #[must_use]
    pub fn container_kind(&self) -> Option<ContainerKind> {
        match self {
            Self::Container(c) => Some(c.borrow().kind),
            _ => None,
        }
    }

    /// Number of elements or entries of a container.
    #[must_use]
    pub fn size(&self) -> Option<usize> {
        match self {
            Self::Container(c) => Some(c.borrow().size()),
            _ => None,
        }
    }

    /// Whether a container may be mutated.
    #[must_use]
    pub fn is_writable(&self) -> Option<bool> {
        match self {
            Self::Container(c) => Some(c.borrow().writable),
            _ => None,
        }
    }

    /// Snapshot of the elements of a list, set, array, or iterable.
    #[must_use]
    pub fn elements(&self) -> Option<Vec<Self>> {
        match self {
            Self::Array(items) | Self::Iterable(items) => Some(items.to_vec()),
            Self::Container(c) => match &c.borrow().contents {
                Contents::Elements(items) => Some(items.clone()),
                Contents::Entries(_) => None,
            },
            _ => None,
        }
    }

    /// Snapshot of the entries of a map.
    #[must_use]
    pub fn entries(&self) -> Option<Vec<(Self, Self)>> {
        match self {
            Self::Container(c) => match &c.borrow().contents {
                Contents::Entries(entries) => Some(entries.clone()),
                Contents::Elements(_) => None,
            },
            _ => None,
        }
    }

    /// The value a map holds for `key`.
    #[must_use]
    pub fn lookup(&self, key: &Self) -> Option<Self> {
        self.entries()?
            .into_iter()
            .find_map(|(k, v)| (k == *key).then_some(v))
    }

    /// Adds `item` to a list or set.
    ///
    /// # Errors
    ///
    /// Fails with [`EvalError::UnsupportedOperation`] on an unmodifiable
    /// container, or [`EvalError::TypeMismatch`] when this is not a list or
    /// set.
    pub fn push(&self, item: Self) -> EvalResult<()> {
        let Self::Container(c) = self else {
            return Err(EvalError::mismatch("list or set", self.kind_name()));
        };
        let mut container = c.borrow_mut();
        container.guard("add")?;
        container.add(item)
    }

    /// Puts an entry into a map.
    ///
    /// # Errors
    ///
    /// Fails with [`EvalError::UnsupportedOperation`] on an unmodifiable map,
    /// or [`EvalError::TypeMismatch`] when this is not a map.
    pub fn insert(&self, key: Self, value: Self) -> EvalResult<()> {
        let Self::Container(c) = self else {
            return Err(EvalError::mismatch("map", self.kind_name()));
        };
        let mut container = c.borrow_mut();
        container.guard("put")?;
        container.put(key, value)
    }

    /// Removes every element or entry.
    ///
    /// # Errors
    ///
    /// Fails with [`EvalError::UnsupportedOperation`] on an unmodifiable
    /// container, or [`EvalError::TypeMismatch`] when this is not a
    /// container.
    pub fn clear(&self) -> EvalResult<()> {
        let Self::Container(c) = self else {
            return Err(EvalError::mismatch("container", self.kind_name()));
        };
        let mut container = c.borrow_mut();
        container.guard("clear")?;
        container.contents = match container.kind {
            ContainerKind::Map => Contents::Entries(Vec::new()),
            ContainerKind::List | ContainerKind::Set => Contents::Elements(Vec::new()),
        };
        Ok(())
    }

    /// Role of an instance.
    #[must_use]
    pub fn role(&self) -> Option<TypeRole> {
        match self {
            Self::Object(o) => Some(o.borrow().role),
            _ => None,
        }
    }

    /// Fresh empty storage of `kind`.
    pub(crate) fn empty_container(kind: ContainerKind, writable: bool) -> Self {
        Self::Container(Rc::new(RefCell::new(Container::empty(kind, writable))))
    }

    /// A fresh container of `kind` holding the contents of `source`.
    ///
    /// Lists and sets accept any element source; maps need a map.
    pub(crate) fn copied_container(
        source: &Self,
        kind: ContainerKind,
        writable: bool,
    ) -> EvalResult<Self> {
        let mut copy = Container::empty(kind, true);
        if kind == ContainerKind::Map {
            let entries = source
                .entries()
                .ok_or_else(|| EvalError::mismatch("map", source.kind_name()))?;
            for (key, value) in entries {
                copy.put(key, value)?;
            }
        } else {
            let items = source
                .elements()
                .ok_or_else(|| EvalError::mismatch("collection", source.kind_name()))?;
            for item in items {
                copy.add(item)?;
            }
        }
        copy.writable = writable;
        Ok(Self::Container(Rc::new(RefCell::new(copy))))
    }

    /// Appends to a container regardless of its writability.
    pub(crate) fn force_add(&self, item: Self) -> EvalResult<()> {
        let Self::Container(c) = self else {
            return Err(EvalError::mismatch("list or set", self.kind_name()));
        };
        c.borrow_mut().add(item)
    }

    /// Whether this is a list or set, as opposed to any other iterable.
    pub(crate) fn is_collection(&self) -> bool {
        matches!(
            self.container_kind(),
            Some(ContainerKind::List | ContainerKind::Set)
        )
    }
}
