//! Resolving `property <type> <name>` header declarations into
//! [`PropertyTag`]s.
//!
//! Resolution happens in two independent steps: the name is mapped to a
//! [`BaseTag`] (which attribute is this?) and the type is mapped to a
//! [`ScalarLen`] (how many bytes does it occupy?). [`resolve`] then combines
//! both and checks that the width is allowed for the attribute.

use std::fmt;

use derive_more::Display;

use super::Error;


/// One of the four color channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Channel {
    #[display(fmt = "red")]
    Red,
    #[display(fmt = "green")]
    Green,
    #[display(fmt = "blue")]
    Blue,
    #[display(fmt = "alpha")]
    Alpha,
}

impl Channel {
    /// Index of this channel in an RGBA array.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// One of the three position axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Axis {
    #[display(fmt = "x")]
    X,
    #[display(fmt = "y")]
    Y,
    #[display(fmt = "z")]
    Z,
}

impl Axis {
    /// Index of this axis in an XYZ array.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Length of a PLY scalar value in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarLen {
    One = 1,
    Two = 2,
    Four = 4,
    Eight = 8,
}

impl ScalarLen {
    /// Classifies a (lowercase) PLY type name by its width. Both the classic
    /// names (`uchar`, `float`, ...) and the sized names (`uint8`, `float32`,
    /// ...) are understood. Signedness is irrelevant here. Returns `None` for
    /// anything else (including `list`).
    pub fn from_type_name(ty: &str) -> Option<Self> {
        match ty {
            "char" | "uchar" | "int8" | "uint8" => Some(ScalarLen::One),
            "short" | "ushort" | "int16" | "uint16" => Some(ScalarLen::Two),
            "int" | "uint" | "float" | "int32" | "uint32" | "float32" => Some(ScalarLen::Four),
            "int64" | "uint64" | "double" | "float64" => Some(ScalarLen::Eight),
            _ => None,
        }
    }

    pub fn as_usize(&self) -> usize {
        *self as usize
    }
}

/// The attribute a property name refers to, without any width information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseTag {
    Color(Channel),
    Position(Axis),

    /// Any name we don't know. Those properties are skipped when decoding.
    Unnamed,
}

impl BaseTag {
    /// Maps a (lowercase) property name to its attribute.
    pub fn from_name(name: &str) -> Self {
        match name {
            "red" => BaseTag::Color(Channel::Red),
            "green" => BaseTag::Color(Channel::Green),
            "blue" => BaseTag::Color(Channel::Blue),
            "alpha" => BaseTag::Color(Channel::Alpha),
            "x" => BaseTag::Position(Axis::X),
            "y" => BaseTag::Position(Axis::Y),
            "z" => BaseTag::Position(Axis::Z),
            _ => BaseTag::Unnamed,
        }
    }
}

/// The canonical, width-specific identity of a vertex property. Determines
/// how the body decoders read and convert the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyTag {
    /// 8 bit color channel, used as is.
    Color8(Channel),

    /// 16 bit color channel, only the high byte is kept.
    Color16(Channel),

    /// 32 bit color channel, read as `f32` in `0.0..=1.0` and scaled to a byte.
    Color32(Channel),

    /// Single precision position coordinate.
    Position32(Axis),

    /// Double precision position coordinate, narrowed to `f32`.
    Position64(Axis),

    /// A property we don't care about. Its bytes (or its token in ASCII files)
    /// are skipped.
    Data(ScalarLen),
}

impl PropertyTag {
    /// Returns the number of bytes one value of this property occupies in
    /// binary files.
    pub fn len(&self) -> ScalarLen {
        match *self {
            PropertyTag::Color8(_) => ScalarLen::One,
            PropertyTag::Color16(_) => ScalarLen::Two,
            PropertyTag::Color32(_) => ScalarLen::Four,
            PropertyTag::Position32(_) => ScalarLen::Four,
            PropertyTag::Position64(_) => ScalarLen::Eight,
            PropertyTag::Data(len) => len,
        }
    }
}

impl fmt::Display for PropertyTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PropertyTag::Color8(c) => write!(f, "{} (8 bit)", c),
            PropertyTag::Color16(c) => write!(f, "{} (16 bit)", c),
            PropertyTag::Color32(c) => write!(f, "{} (32 bit float)", c),
            PropertyTag::Position32(a) => write!(f, "{} (float)", a),
            PropertyTag::Position64(a) => write!(f, "{} (double)", a),
            PropertyTag::Data(len) => write!(f, "ignored ({} bytes)", len.as_usize()),
        }
    }
}

/// Combines an attribute with a width.
///
/// Positions only accept 4 and 8 byte types, colors only 1, 2 and 4 byte
/// types. Unnamed properties accept every width. Returns `None` if the width
/// is not allowed for the attribute.
pub fn resolve(base: BaseTag, len: ScalarLen) -> Option<PropertyTag> {
    match (base, len) {
        (BaseTag::Unnamed, len) => Some(PropertyTag::Data(len)),

        (BaseTag::Color(c), ScalarLen::One) => Some(PropertyTag::Color8(c)),
        (BaseTag::Color(c), ScalarLen::Two) => Some(PropertyTag::Color16(c)),
        (BaseTag::Color(c), ScalarLen::Four) => Some(PropertyTag::Color32(c)),
        (BaseTag::Color(_), ScalarLen::Eight) => None,

        (BaseTag::Position(_), ScalarLen::One) => None,
        (BaseTag::Position(_), ScalarLen::Two) => None,
        (BaseTag::Position(a), ScalarLen::Four) => Some(PropertyTag::Position32(a)),
        (BaseTag::Position(a), ScalarLen::Eight) => Some(PropertyTag::Position64(a)),
    }
}

/// Resolves the type and name of a `property` line (both already lowercase).
pub(crate) fn resolve_property(ty: &str, name: &str) -> Result<PropertyTag, Error> {
    let base = BaseTag::from_name(name);
    let len = ScalarLen::from_type_name(ty).ok_or_else(|| Error::UnsupportedPropertyType {
        ty: ty.to_string(),
        name: name.to_string(),
    })?;

    resolve(base, len).ok_or_else(|| Error::InvalidPropertyType {
        ty: ty.to_string(),
        name: name.to_string(),
    })
}
