//! Structural equality, hashing, and rendering with the target platform's
//! semantics.
//!
//! Boxed numbers compare by kind and value, floating values by canonical bit
//! pattern, lists in order, sets and maps regardless of order. Arrays,
//! iterables, iterators, and instances compare by identity.

use std::fmt;
use std::rc::Rc;

use value_synth::OptionalFlavor;
use value_synth::plan::ContainerKind;

use super::{Container, Contents, Datum};

const CANONICAL_F32_NAN: u32 = 0x7fc0_0000;
const CANONICAL_F64_NAN: u64 = 0x7ff8_0000_0000_0000;
const ABSENT_HASH: i32 = 0x79a3_1aac;
const PRESENT_HASH: i32 = 0x598d_f91c;

/// Bit pattern with every NaN collapsed to the canonical one.
pub(crate) const fn canonical_f32_bits(value: f32) -> u32 {
    if value.is_nan() {
        CANONICAL_F32_NAN
    } else {
        value.to_bits()
    }
}

/// Bit pattern with every NaN collapsed to the canonical one.
pub(crate) const fn canonical_f64_bits(value: f64) -> u64 {
    if value.is_nan() {
        CANONICAL_F64_NAN
    } else {
        value.to_bits()
    }
}

/// `(int) (v ^ (v >>> 32))`.
#[expect(
    clippy::cast_possible_truncation,
    reason = "the fold keeps the low 32 bits"
)]
pub(crate) const fn fold_long(value: i64) -> i32 {
    (value ^ (value.cast_unsigned() >> 32).cast_signed()) as i32
}

/// `31 * h + hash(e)` over the items, seeded with 1.
pub(crate) fn ordered_hash<'a>(items: impl IntoIterator<Item = &'a Datum>) -> i32 {
    items
        .into_iter()
        .fold(1_i32, |h, item| h.wrapping_mul(31).wrapping_add(item.java_hash()))
}

/// `[a, b, c]`.
pub(crate) fn render_elements(items: &[Datum]) -> String {
    let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
    format!("[{}]", parts.join(", "))
}

fn containers_equal(left: &Container, right: &Container) -> bool {
    match (&left.contents, &right.contents) {
        (Contents::Elements(a), Contents::Elements(b)) => match (left.kind, right.kind) {
            (ContainerKind::List, ContainerKind::List) => a == b,
            (ContainerKind::Set, ContainerKind::Set) => {
                a.len() == b.len() && a.iter().all(|item| b.contains(item))
            }
            _ => false,
        },
        (Contents::Entries(a), Contents::Entries(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, value)| b.iter().any(|(k, v)| k == key && v == value))
        }
        _ => false,
    }
}

fn container_hash(container: &Container) -> i32 {
    match &container.contents {
        Contents::Elements(items) if container.kind == ContainerKind::List => ordered_hash(items),
        Contents::Elements(items) => items
            .iter()
            .fold(0_i32, |h, item| h.wrapping_add(item.java_hash())),
        Contents::Entries(entries) => entries.iter().fold(0_i32, |h, (key, value)| {
            h.wrapping_add(key.java_hash() ^ value.java_hash())
        }),
    }
}

impl PartialEq for Datum {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Byte(a), Self::Byte(b)) => a == b,
            (Self::Short(a), Self::Short(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Long(a), Self::Long(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => canonical_f32_bits(*a) == canonical_f32_bits(*b),
            (Self::Double(a), Self::Double(b)) => canonical_f64_bits(*a) == canonical_f64_bits(*b),
            (Self::Text(a), Self::Text(b)) => a == b,
            (
                Self::Optional {
                    flavor: fa,
                    value: va,
                },
                Self::Optional {
                    flavor: fb,
                    value: vb,
                },
            ) => fa == fb && va == vb,
            (Self::Container(a), Self::Container(b)) => {
                Rc::ptr_eq(a, b) || containers_equal(&a.borrow(), &b.borrow())
            }
            _ => self.same_instance(other),
        }
    }
}

impl Datum {
    /// The value's hash code.
    ///
    /// Instances hash by identity. Arrays and iterables hash by their
    /// elements, which stays consistent with their identity equality.
    #[must_use]
    pub fn java_hash(&self) -> i32 {
        match self {
            Self::Null | Self::Iterator(_) => 0,
            Self::Boolean(value) => {
                if *value {
                    1231
                } else {
                    1237
                }
            }
            Self::Byte(value) => i32::from(*value),
            Self::Short(value) => i32::from(*value),
            Self::Char(value) => i32::from(*value),
            Self::Int(value) => *value,
            Self::Long(value) => fold_long(*value),
            Self::Float(value) => canonical_f32_bits(*value).cast_signed(),
            Self::Double(value) => fold_long(canonical_f64_bits(*value).cast_signed()),
            Self::Text(value) => value
                .encode_utf16()
                .fold(0_i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit))),
            Self::Array(items) | Self::Iterable(items) => ordered_hash(items.iter()),
            Self::Optional { flavor, value } => match (flavor, value) {
                (OptionalFlavor::Standard, Some(inner)) => inner.java_hash(),
                (OptionalFlavor::Standard, None) => 0,
                (OptionalFlavor::Guava, Some(inner)) => PRESENT_HASH.wrapping_add(inner.java_hash()),
                (OptionalFlavor::Guava, None) => ABSENT_HASH,
            },
            Self::Container(container) => container_hash(&container.borrow()),
            Self::Object(instance) => instance.borrow().id.cast_signed(),
        }
    }
}

/// Integral floating values print with a trailing `.0`.
/// Rust's shortest round-trip text with a `.0` suffix for integral values.
///
/// Magnitudes that the target platform prints in scientific notation are
/// written positionally here: `1e10` renders as `10000000000.0`, not
/// `1.0E10`, and `1e-5` as `0.00001`, not `1.0E-5`.
fn write_floating(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    match text {
        "NaN" => f.write_str("NaN"),
        "inf" => f.write_str("Infinity"),
        "-inf" => f.write_str("-Infinity"),
        _ if text.contains(['.', 'e']) => f.write_str(text),
        _ => write!(f, "{text}.0"),
    }
}

/// Renders the way the generated `toString` would, except that floating-point
/// values never use scientific notation.
impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Byte(value) => write!(f, "{value}"),
            Self::Short(value) => write!(f, "{value}"),
            Self::Char(value) => write!(
                f,
                "{}",
                char::from_u32(u32::from(*value)).unwrap_or(char::REPLACEMENT_CHARACTER)
            ),
            Self::Int(value) => write!(f, "{value}"),
            Self::Long(value) => write!(f, "{value}"),
            Self::Float(value) => write_floating(f, &value.to_string()),
            Self::Double(value) => write_floating(f, &value.to_string()),
            Self::Text(value) => f.write_str(value),
            Self::Array(_) => write!(f, "[@{:x}", self.java_hash()),
            Self::Optional { flavor, value } => match (flavor, value) {
                (OptionalFlavor::Standard, Some(inner)) => write!(f, "Optional[{inner}]"),
                (OptionalFlavor::Standard, None) => f.write_str("Optional.empty"),
                (OptionalFlavor::Guava, Some(inner)) => write!(f, "Optional.of({inner})"),
                (OptionalFlavor::Guava, None) => f.write_str("Optional.absent()"),
            },
            Self::Container(container) => match &container.borrow().contents {
                Contents::Elements(items) => f.write_str(&render_elements(items)),
                Contents::Entries(entries) => {
                    let parts: Vec<String> =
                        entries.iter().map(|(k, v)| format!("{k}={v}")).collect();
                    write!(f, "{{{}}}", parts.join(", "))
                }
            },
            Self::Iterable(items) => f.write_str(&render_elements(items)),
            Self::Iterator(_) => f.write_str("Iterator"),
            Self::Object(instance) => {
                let inner = instance.borrow();
                write!(f, "{}@{:x}", inner.type_name, inner.id)
            }
        }
    }
}
