//! Structured method bodies.
//!
//! A body is an ordered list of [`Step`]s. Each step describes one unit of
//! computation at the level of "what, in which order, failing how", leaving
//! concrete syntax to the renderer. Expressions inside steps are
//! [`Operand`]s.

use serde::{Deserialize, Serialize};

use super::{MethodKind, MethodRef, Shape};
use crate::schema::{CollectionKind, OptionalFlavor};

/// Concrete mutable storage behind a collection or map field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    /// Growable array.
    List,
    /// Hash set.
    Set,
    /// Hash map.
    Map,
}

impl ContainerKind {
    /// Simple name of the concrete implementation.
    #[must_use]
    pub const fn impl_name(self) -> &'static str {
        match self {
            Self::List => "ArrayList",
            Self::Set => "HashSet",
            Self::Map => "HashMap",
        }
    }

    /// Factory returning the canonical immutable empty instance.
    #[must_use]
    pub const fn empty_factory(self) -> &'static str {
        match self {
            Self::List => "emptyList",
            Self::Set => "emptySet",
            Self::Map => "emptyMap",
        }
    }

    /// Factory wrapping an instance as unmodifiable.
    #[must_use]
    pub const fn unmodifiable_factory(self) -> &'static str {
        match self {
            Self::List => "unmodifiableList",
            Self::Set => "unmodifiableSet",
            Self::Map => "unmodifiableMap",
        }
    }
}

impl From<CollectionKind> for ContainerKind {
    fn from(kind: CollectionKind) -> Self {
        match kind {
            CollectionKind::List => Self::List,
            CollectionKind::Set => Self::Set,
        }
    }
}

/// What `build()` passes on for an absent container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WhenAbsent {
    /// The canonical immutable empty instance.
    Empty,
    /// Null, unchanged.
    Null,
}

/// Field comparison used by `equals`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// Primitive value equality.
    Primitive,
    /// Total-order floating-point comparison (`compare(a, b) == 0`).
    FloatingCompare,
    /// Element-wise array equality.
    ArrayElements,
    /// Null-safe delegation to the field value's own `equals`.
    NullSafeEquals,
}

/// A field's contribution to `hashCode`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum HashContribution {
    /// The integral value, widened to `int`.
    Integral,
    /// `(int) (v ^ (v >>> 32))`.
    LongFold,
    /// One of two fixed sentinels.
    Boolean {
        /// Contribution of `true`.
        when_true: i32,
        /// Contribution of `false`.
        when_false: i32,
    },
    /// Float bit pattern, with `+0.0` contributing zero.
    FloatBits,
    /// Double bit pattern folded like a long, staged through `temp`.
    DoubleFold {
        /// Name of the `long` scratch local.
        temp: String,
    },
    /// Order-sensitive element hash, zero for null.
    ArrayElements,
    /// The value's own `hashCode`, zero for null.
    NullSafeDelegate,
}

/// How `toString` renders a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderStyle {
    /// The value's own string form.
    Plain,
    /// Arrays render as their element list.
    Elements,
}

/// One field of a rendered `toString`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedField {
    /// Field name, used both as label and source.
    pub name: String,
    /// Rendering rule.
    pub style: RenderStyle,
}

/// An expression inside a body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operand {
    /// The receiver.
    This,
    /// The null reference.
    Null,
    /// A method parameter.
    Param {
        /// Parameter name.
        name: String,
    },
    /// A local introduced by an earlier step.
    Local {
        /// Local name.
        name: String,
    },
    /// A field of the receiver.
    Field {
        /// Field name.
        name: String,
    },
    /// A field of another instance of the same type.
    FieldOf {
        /// Instance holding the field.
        target: Box<Operand>,
        /// Field name.
        field: String,
    },
    /// Result of calling a method on `target`.
    Invoke {
        /// Receiver of the call.
        target: Box<Operand>,
        /// Method called.
        method: MethodRef,
        /// Positional arguments.
        args: Vec<Operand>,
    },
    /// `value` wrapped with the flavour's "maybe" factory.
    Maybe {
        /// Optional flavour.
        flavor: OptionalFlavor,
        /// Possibly-null value.
        value: Box<Operand>,
    },
    /// The flavour's absent representation.
    Absent {
        /// Optional flavour.
        flavor: OptionalFlavor,
    },
    /// A fixed-size list view over a varargs parameter.
    ListOf {
        /// Varargs parameter name.
        param: String,
    },
    /// An iterator over an iterable.
    IteratorOf {
        /// The iterable.
        value: Box<Operand>,
    },
    /// `value` viewed as `to`. Never fails at runtime.
    Cast {
        /// Target shape.
        to: Shape,
        /// Value being cast.
        value: Box<Operand>,
    },
    /// A fresh instance of a synthesized type.
    New {
        /// Simple name of the instantiated type.
        type_name: String,
        /// Constructor selected.
        constructor: MethodKind,
        /// Positional arguments.
        args: Vec<Operand>,
    },
}

impl Operand {
    /// A parameter reference.
    #[must_use]
    pub fn param(name: impl Into<String>) -> Self {
        Self::Param { name: name.into() }
    }

    /// A local reference.
    #[must_use]
    pub fn local(name: impl Into<String>) -> Self {
        Self::Local { name: name.into() }
    }

    /// A receiver field reference.
    #[must_use]
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field { name: name.into() }
    }

    /// A call on the receiver.
    #[must_use]
    pub fn call(method: MethodRef, args: Vec<Self>) -> Self {
        Self::Invoke {
            target: Box::new(Self::This),
            method,
            args,
        }
    }
}

/// One step of a method body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// Fails with a null-argument error carrying `message` when `value` is
    /// null.
    RejectNull {
        /// Checked value.
        value: Operand,
        /// Error message.
        message: String,
    },
    /// When `param` is null, sets `field` to null and returns the receiver.
    ResetIfNull {
        /// Checked parameter.
        param: String,
        /// Field reset.
        field: String,
    },
    /// Walks `param` and fails on the first null element.
    RejectNullItems {
        /// Collection parameter.
        param: String,
        /// Loop variable.
        item: String,
        /// Error message.
        message: String,
    },
    /// Walks the entries of map `param` and fails on the first null key or
    /// value.
    RejectNullEntries {
        /// Map parameter.
        param: String,
        /// Loop variable.
        entry: String,
        /// Message for a null key.
        key_message: String,
        /// Message for a null value.
        value_message: String,
    },
    /// Allocates empty storage for `field` when it is null.
    EnsureStorage {
        /// Field initialized.
        field: String,
        /// Storage kind.
        container: ContainerKind,
    },
    /// Replaces `field` with fresh empty storage.
    Allocate {
        /// Field replaced.
        field: String,
        /// Storage kind.
        container: ContainerKind,
    },
    /// Stores `value` in `field`.
    Assign {
        /// Field written.
        field: String,
        /// Stored value.
        value: Operand,
    },
    /// Stores a fresh mutable copy of `source` in `field`.
    ///
    /// With `preserve_null`, a null source stores null instead of failing.
    CopyInto {
        /// Field written.
        field: String,
        /// Storage kind.
        container: ContainerKind,
        /// Copied contents.
        source: Operand,
        /// Whether null passes through.
        preserve_null: bool,
    },
    /// Empties iterator `param` into `field`, checking each element first
    /// when a message is given.
    Drain {
        /// Field appended to.
        field: String,
        /// Iterator parameter.
        param: String,
        /// Loop variable.
        item: String,
        /// Error message for a null element, when elements are checked.
        null_item_message: Option<String>,
    },
    /// Appends one element to `field`.
    Append {
        /// Collection field.
        field: String,
        /// Appended value.
        value: Operand,
    },
    /// Puts one entry into `field`, replacing any previous value.
    Put {
        /// Map field.
        field: String,
        /// Entry key.
        key: Operand,
        /// Entry value.
        value: Operand,
    },
    /// Calls a method on the receiver and discards the result.
    Invoke {
        /// Method called.
        method: MethodRef,
        /// Positional arguments.
        args: Vec<Operand>,
    },
    /// Returns the result of `method` when `param` is a collection.
    DispatchIfCollection {
        /// Iterable parameter.
        param: String,
        /// Collection-taking overload.
        method: MethodRef,
    },
    /// Stores `param` in `field`, substituting the immutable empty instance
    /// for null.
    DefaultIfNull {
        /// Field written.
        field: String,
        /// Source parameter.
        param: String,
        /// Storage kind.
        container: ContainerKind,
    },
    /// Binds `local` to an unmodifiable fresh copy of `field`, or to the
    /// absent replacement when the field is null.
    Finalize {
        /// Local bound.
        local: String,
        /// Source field.
        field: String,
        /// Storage kind.
        container: ContainerKind,
        /// Replacement for null storage.
        when_absent: WhenAbsent,
    },
    /// Binds a local.
    Bind {
        /// Local name.
        local: String,
        /// Bound value.
        value: Operand,
    },
    /// Returns `true` when `other` is the receiver itself.
    ReturnIfSame {
        /// Compared parameter.
        other: String,
    },
    /// Returns `false` unless `other` is an instance of `type_name`.
    ReturnUnlessInstance {
        /// Checked parameter.
        other: String,
        /// Required type.
        type_name: String,
    },
    /// Returns `false` unless the receiver's `field` equals the value read
    /// through `accessor` on local `other`.
    CompareField {
        /// Receiver field.
        field: String,
        /// Local holding the other instance.
        other: String,
        /// Accessor called on the other instance.
        accessor: MethodRef,
        /// Comparison rule.
        comparison: Comparison,
    },
    /// Declares the hash accumulator, seeded with 1.
    HashSeed {
        /// Accumulator local.
        local: String,
    },
    /// `local = 31 * local + contribution(field)`.
    HashMix {
        /// Accumulator local.
        local: String,
        /// Contributing field.
        field: String,
        /// Contribution rule.
        contribution: HashContribution,
    },
    /// Returns `type_name{f1=v1, f2=v2}` over the receiver's fields.
    Render {
        /// Name printed before the braces.
        type_name: String,
        /// Fields in print order.
        fields: Vec<RenderedField>,
    },
    /// Returns a value.
    Return {
        /// Returned value.
        value: Operand,
    },
    /// Returns a boolean constant.
    ReturnBool {
        /// Returned constant.
        value: bool,
    },
}

impl Step {
    /// `return this`.
    #[must_use]
    pub const fn return_this() -> Self {
        Self::Return {
            value: Operand::This,
        }
    }
}
