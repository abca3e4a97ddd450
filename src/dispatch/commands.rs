// src/dispatch/commands.rs

//! Defines the `Opcode` enumeration, the untyped `Arg` payload items, and the
//! typed `DrawCall` instructions they unpack into.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of instructions an interpreter can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    Music = 0,
    Spr = 1,
    Btn = 2,
    Sfx = 3,
    Pal = 4,
    PalReset = 5,
    Circfill = 6,
    Print = 7,
    Rectfill = 8,
    Line = 9,
    Mget = 10,
    Camera = 11,
    Fget = 12,
    Map = 13,
}

impl Opcode {
    const ALL: [Opcode; 14] = [
        Opcode::Music,
        Opcode::Spr,
        Opcode::Btn,
        Opcode::Sfx,
        Opcode::Pal,
        Opcode::PalReset,
        Opcode::Circfill,
        Opcode::Print,
        Opcode::Rectfill,
        Opcode::Line,
        Opcode::Mget,
        Opcode::Camera,
        Opcode::Fget,
        Opcode::Map,
    ];

    /// Converts a numeric opcode; unknown values give `None`.
    pub fn from_i32(n: i32) -> Option<Self> {
        usize::try_from(n).ok().and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn name(self) -> &'static str {
        match self {
            Opcode::Music => "music",
            Opcode::Spr => "spr",
            Opcode::Btn => "btn",
            Opcode::Sfx => "sfx",
            Opcode::Pal => "pal",
            Opcode::PalReset => "pal_reset",
            Opcode::Circfill => "circfill",
            Opcode::Print => "print",
            Opcode::Rectfill => "rectfill",
            Opcode::Line => "line",
            Opcode::Mget => "mget",
            Opcode::Camera => "camera",
            Opcode::Fget => "fget",
            Opcode::Map => "map",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One item of an untyped argument list. Text is a raw byte string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Int(i32),
    Text(Vec<u8>),
}

impl From<i32> for Arg {
    fn from(v: i32) -> Self {
        Arg::Int(v)
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Text(s.as_bytes().to_vec())
    }
}

impl From<&[u8]> for Arg {
    fn from(bytes: &[u8]) -> Self {
        Arg::Text(bytes.to_vec())
    }
}

impl From<Vec<u8>> for Arg {
    fn from(bytes: Vec<u8>) -> Self {
        Arg::Text(bytes)
    }
}

fn one() -> i32 {
    1
}

/// A fully unpacked instruction, one variant per opcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCall {
    Music {
        channel: i32,
        track: i32,
        fade: i32,
    },
    Spr {
        sprite: i32,
        x: i32,
        y: i32,
        #[serde(default = "one")]
        cols: i32,
        #[serde(default = "one")]
        rows: i32,
        #[serde(default)]
        flip_x: bool,
        #[serde(default)]
        flip_y: bool,
    },
    Btn {
        button: i32,
    },
    Sfx {
        id: i32,
    },
    Pal {
        logical: i32,
        physical: i32,
    },
    PalReset,
    Circfill {
        x: i32,
        y: i32,
        r: i32,
        color: i32,
    },
    Print {
        #[serde(with = "byte_string")]
        text: Vec<u8>,
        x: i32,
        y: i32,
        color: i32,
    },
    Rectfill {
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: i32,
    },
    Line {
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: i32,
    },
    Mget {
        x: i32,
        y: i32,
    },
    Camera {
        x: i32,
        y: i32,
    },
    Fget {
        tile: i32,
        flag: i32,
    },
    Map {
        mx: i32,
        my: i32,
        tx: i32,
        ty: i32,
        mw: i32,
        mh: i32,
        #[serde(default)]
        mask: i32,
    },
}

/// Sequential reader over an argument list.
struct ArgReader<'a> {
    args: std::slice::Iter<'a, Arg>,
}

impl<'a> ArgReader<'a> {
    fn int(&mut self) -> Option<i32> {
        match self.args.next()? {
            Arg::Int(v) => Some(*v),
            Arg::Text(_) => None,
        }
    }

    fn text(&mut self) -> Option<Vec<u8>> {
        match self.args.next()? {
            Arg::Text(s) => Some(s.clone()),
            Arg::Int(_) => None,
        }
    }
}

impl DrawCall {
    /// Unpacks `args` in the declared order for `opcode`.
    ///
    /// Returns `None` when the list is too short or an argument has the
    /// wrong kind. Trailing extra arguments are ignored.
    pub fn from_args(opcode: Opcode, args: &[Arg]) -> Option<Self> {
        let mut r = ArgReader { args: args.iter() };
        let call = match opcode {
            Opcode::Music => DrawCall::Music {
                channel: r.int()?,
                track: r.int()?,
                fade: r.int()?,
            },
            Opcode::Spr => DrawCall::Spr {
                sprite: r.int()?,
                x: r.int()?,
                y: r.int()?,
                cols: r.int()?,
                rows: r.int()?,
                flip_x: r.int()? != 0,
                flip_y: r.int()? != 0,
            },
            Opcode::Btn => DrawCall::Btn { button: r.int()? },
            Opcode::Sfx => DrawCall::Sfx { id: r.int()? },
            Opcode::Pal => DrawCall::Pal {
                logical: r.int()?,
                physical: r.int()?,
            },
            Opcode::PalReset => DrawCall::PalReset,
            Opcode::Circfill => DrawCall::Circfill {
                x: r.int()?,
                y: r.int()?,
                r: r.int()?,
                color: r.int()?,
            },
            Opcode::Print => DrawCall::Print {
                text: r.text()?,
                x: r.int()?,
                y: r.int()?,
                color: r.int()?,
            },
            Opcode::Rectfill => DrawCall::Rectfill {
                x1: r.int()?,
                y1: r.int()?,
                x2: r.int()?,
                y2: r.int()?,
                color: r.int()?,
            },
            Opcode::Line => DrawCall::Line {
                x1: r.int()?,
                y1: r.int()?,
                x2: r.int()?,
                y2: r.int()?,
                color: r.int()?,
            },
            Opcode::Mget => DrawCall::Mget {
                x: r.int()?,
                y: r.int()?,
            },
            Opcode::Camera => DrawCall::Camera {
                x: r.int()?,
                y: r.int()?,
            },
            Opcode::Fget => DrawCall::Fget {
                tile: r.int()?,
                flag: r.int()?,
            },
            Opcode::Map => DrawCall::Map {
                mx: r.int()?,
                my: r.int()?,
                tx: r.int()?,
                ty: r.int()?,
                mw: r.int()?,
                mh: r.int()?,
                mask: r.int()?,
            },
        };
        Some(call)
    }

    pub fn opcode(&self) -> Opcode {
        match self {
            DrawCall::Music { .. } => Opcode::Music,
            DrawCall::Spr { .. } => Opcode::Spr,
            DrawCall::Btn { .. } => Opcode::Btn,
            DrawCall::Sfx { .. } => Opcode::Sfx,
            DrawCall::Pal { .. } => Opcode::Pal,
            DrawCall::PalReset => Opcode::PalReset,
            DrawCall::Circfill { .. } => Opcode::Circfill,
            DrawCall::Print { .. } => Opcode::Print,
            DrawCall::Rectfill { .. } => Opcode::Rectfill,
            DrawCall::Line { .. } => Opcode::Line,
            DrawCall::Mget { .. } => Opcode::Mget,
            DrawCall::Camera { .. } => Opcode::Camera,
            DrawCall::Fget { .. } => Opcode::Fget,
            DrawCall::Map { .. } => Opcode::Map,
        }
    }
}

/// Serde adapter for byte strings. Reads either a JSON string or an array of
/// byte values; writes a string whenever the bytes are valid UTF-8.
mod byte_string {
    use std::fmt;

    use serde::de::{self, SeqAccess, Visitor};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        match std::str::from_utf8(bytes) {
            Ok(text) => serializer.serialize_str(text),
            Err(_) => serializer.collect_seq(bytes),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        deserializer.deserialize_any(ByteStringVisitor)
    }

    struct ByteStringVisitor;

    impl<'de> Visitor<'de> for ByteStringVisitor {
        type Value = Vec<u8>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string or an array of bytes")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(v.as_bytes().to_vec())
        }

        fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
            Ok(v.to_vec())
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(0));
            while let Some(b) = seq.next_element::<u8>()? {
                bytes.push(b);
            }
            Ok(bytes)
        }
    }
}
