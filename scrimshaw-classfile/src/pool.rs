// scrimshaw-classfile/src/pool.rs

//! Constant pool model.
//!
//! The pool is append-only: parsing fills it, and transformers may intern new
//! entries at the end. Existing entries are never moved or re-encoded, so
//! every index already referenced by the class remains valid after mutation.
//! `CONSTANT_Utf8` payloads are stored as raw bytes to preserve modified
//! UTF-8 sequences exactly; `Float`/`Double` are stored as raw bit patterns
//! to preserve NaN payloads.

use crate::bytes::{ByteReader, ByteWriter};
use crate::{mutf8, ClassFileError, Result};

const TAG_UTF8: u8 = 1;
const TAG_INTEGER: u8 = 3;
const TAG_FLOAT: u8 = 4;
const TAG_LONG: u8 = 5;
const TAG_DOUBLE: u8 = 6;
const TAG_CLASS: u8 = 7;
const TAG_STRING: u8 = 8;
const TAG_FIELDREF: u8 = 9;
const TAG_METHODREF: u8 = 10;
const TAG_INTERFACE_METHODREF: u8 = 11;
const TAG_NAME_AND_TYPE: u8 = 12;
const TAG_METHOD_HANDLE: u8 = 15;
const TAG_METHOD_TYPE: u8 = 16;
const TAG_DYNAMIC: u8 = 17;
const TAG_INVOKE_DYNAMIC: u8 = 18;
const TAG_MODULE: u8 = 19;
const TAG_PACKAGE: u8 = 20;

/// One constant pool entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Utf8(Vec<u8>),
    Integer(i32),
    /// Raw IEEE-754 bits
    Float(u32),
    Long(i64),
    /// Raw IEEE-754 bits
    Double(u64),
    Class(u16),
    String(u16),
    FieldRef { class: u16, name_and_type: u16 },
    MethodRef { class: u16, name_and_type: u16 },
    InterfaceMethodRef { class: u16, name_and_type: u16 },
    NameAndType { name: u16, descriptor: u16 },
    MethodHandle { kind: u8, reference: u16 },
    MethodType(u16),
    Dynamic { bootstrap: u16, name_and_type: u16 },
    InvokeDynamic { bootstrap: u16, name_and_type: u16 },
    Module(u16),
    Package(u16),
}

impl Constant {
    /// Long and Double occupy two pool slots.
    fn is_wide(&self) -> bool {
        matches!(self, Constant::Long(_) | Constant::Double(_))
    }
}

enum Slot {
    Entry(Constant),
    /// Phantom slot following a Long/Double entry.
    Continuation,
}

/// The class file constant pool, indexed from 1 as in the binary format.
pub struct ConstantPool {
    slots: Vec<Slot>,
}

impl ConstantPool {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub fn parse(r: &mut ByteReader<'_>) -> Result<Self> {
        let count = r.u16()?;
        let mut slots = Vec::with_capacity(count.saturating_sub(1) as usize);
        let mut index: u16 = 1;
        while index < count {
            let tag = r.u8()?;
            let constant = match tag {
                TAG_UTF8 => {
                    let len = r.u16()? as usize;
                    Constant::Utf8(r.bytes(len)?.to_vec())
                }
                TAG_INTEGER => Constant::Integer(r.u32()? as i32),
                TAG_FLOAT => Constant::Float(r.u32()?),
                TAG_LONG => {
                    let hi = r.u32()? as u64;
                    let lo = r.u32()? as u64;
                    Constant::Long(((hi << 32) | lo) as i64)
                }
                TAG_DOUBLE => {
                    let hi = r.u32()? as u64;
                    let lo = r.u32()? as u64;
                    Constant::Double((hi << 32) | lo)
                }
                TAG_CLASS => Constant::Class(r.u16()?),
                TAG_STRING => Constant::String(r.u16()?),
                TAG_FIELDREF => Constant::FieldRef {
                    class: r.u16()?,
                    name_and_type: r.u16()?,
                },
                TAG_METHODREF => Constant::MethodRef {
                    class: r.u16()?,
                    name_and_type: r.u16()?,
                },
                TAG_INTERFACE_METHODREF => Constant::InterfaceMethodRef {
                    class: r.u16()?,
                    name_and_type: r.u16()?,
                },
                TAG_NAME_AND_TYPE => Constant::NameAndType {
                    name: r.u16()?,
                    descriptor: r.u16()?,
                },
                TAG_METHOD_HANDLE => Constant::MethodHandle {
                    kind: r.u8()?,
                    reference: r.u16()?,
                },
                TAG_METHOD_TYPE => Constant::MethodType(r.u16()?),
                TAG_DYNAMIC => Constant::Dynamic {
                    bootstrap: r.u16()?,
                    name_and_type: r.u16()?,
                },
                TAG_INVOKE_DYNAMIC => Constant::InvokeDynamic {
                    bootstrap: r.u16()?,
                    name_and_type: r.u16()?,
                },
                TAG_MODULE => Constant::Module(r.u16()?),
                TAG_PACKAGE => Constant::Package(r.u16()?),
                _ => return Err(ClassFileError::UnknownConstantTag { tag, index }),
            };
            let wide = constant.is_wide();
            slots.push(Slot::Entry(constant));
            if wide {
                slots.push(Slot::Continuation);
                index = index.wrapping_add(2);
            } else {
                index = index.wrapping_add(1);
            }
        }
        Ok(Self { slots })
    }

    pub fn write(&self, w: &mut ByteWriter) {
        w.u16(self.slots.len() as u16 + 1);
        for slot in &self.slots {
            let constant = match slot {
                Slot::Entry(c) => c,
                Slot::Continuation => continue,
            };
            match constant {
                Constant::Utf8(bytes) => {
                    w.u8(TAG_UTF8);
                    w.u16(bytes.len() as u16);
                    w.bytes(bytes);
                }
                Constant::Integer(v) => {
                    w.u8(TAG_INTEGER);
                    w.u32(*v as u32);
                }
                Constant::Float(bits) => {
                    w.u8(TAG_FLOAT);
                    w.u32(*bits);
                }
                Constant::Long(v) => {
                    w.u8(TAG_LONG);
                    w.u32((*v as u64 >> 32) as u32);
                    w.u32(*v as u32);
                }
                Constant::Double(bits) => {
                    w.u8(TAG_DOUBLE);
                    w.u32((bits >> 32) as u32);
                    w.u32(*bits as u32);
                }
                Constant::Class(v) => {
                    w.u8(TAG_CLASS);
                    w.u16(*v);
                }
                Constant::String(v) => {
                    w.u8(TAG_STRING);
                    w.u16(*v);
                }
                Constant::FieldRef { class, name_and_type } => {
                    w.u8(TAG_FIELDREF);
                    w.u16(*class);
                    w.u16(*name_and_type);
                }
                Constant::MethodRef { class, name_and_type } => {
                    w.u8(TAG_METHODREF);
                    w.u16(*class);
                    w.u16(*name_and_type);
                }
                Constant::InterfaceMethodRef { class, name_and_type } => {
                    w.u8(TAG_INTERFACE_METHODREF);
                    w.u16(*class);
                    w.u16(*name_and_type);
                }
                Constant::NameAndType { name, descriptor } => {
                    w.u8(TAG_NAME_AND_TYPE);
                    w.u16(*name);
                    w.u16(*descriptor);
                }
                Constant::MethodHandle { kind, reference } => {
                    w.u8(TAG_METHOD_HANDLE);
                    w.u8(*kind);
                    w.u16(*reference);
                }
                Constant::MethodType(v) => {
                    w.u8(TAG_METHOD_TYPE);
                    w.u16(*v);
                }
                Constant::Dynamic { bootstrap, name_and_type } => {
                    w.u8(TAG_DYNAMIC);
                    w.u16(*bootstrap);
                    w.u16(*name_and_type);
                }
                Constant::InvokeDynamic { bootstrap, name_and_type } => {
                    w.u8(TAG_INVOKE_DYNAMIC);
                    w.u16(*bootstrap);
                    w.u16(*name_and_type);
                }
                Constant::Module(v) => {
                    w.u8(TAG_MODULE);
                    w.u16(*v);
                }
                Constant::Package(v) => {
                    w.u8(TAG_PACKAGE);
                    w.u16(*v);
                }
            }
        }
    }

    /// Number of pool slots, as would be declared in `constant_pool_count - 1`.
    pub fn slot_count(&self) -> u16 {
        self.slots.len() as u16
    }

    pub fn get(&self, index: u16, context: &'static str) -> Result<&Constant> {
        match index.checked_sub(1).and_then(|i| self.slots.get(i as usize)) {
            Some(Slot::Entry(c)) => Ok(c),
            _ => Err(ClassFileError::BadPoolIndex { index, context }),
        }
    }

    /// Raw bytes of a `CONSTANT_Utf8` entry.
    pub fn utf8(&self, index: u16) -> Result<&[u8]> {
        match self.get(index, "Utf8")? {
            Constant::Utf8(bytes) => Ok(bytes),
            _ => Err(ClassFileError::WrongConstantKind {
                index,
                expected: "Utf8",
            }),
        }
    }

    /// A `CONSTANT_Utf8` entry decoded as a string. Class names, member names
    /// and descriptors are ASCII in practice; anything that fails standard
    /// UTF-8 decoding is rejected rather than silently mangled.
    pub fn utf8_str(&self, index: u16) -> Result<&str> {
        std::str::from_utf8(self.utf8(index)?).map_err(|_| ClassFileError::InvalidUtf8(index))
    }

    /// The internal name behind a `CONSTANT_Class` entry.
    pub fn class_name(&self, index: u16) -> Result<&str> {
        match self.get(index, "Class")? {
            Constant::Class(name_index) => self.utf8_str(*name_index),
            _ => Err(ClassFileError::WrongConstantKind {
                index,
                expected: "Class",
            }),
        }
    }

    /// Append an entry, returning its index.
    pub fn push(&mut self, constant: Constant) -> Result<u16> {
        let needed = if constant.is_wide() { 2 } else { 1 };
        if self.slots.len() + needed > 0xfffe {
            return Err(ClassFileError::PoolOverflow);
        }
        let index = self.slots.len() as u16 + 1;
        let wide = constant.is_wide();
        self.slots.push(Slot::Entry(constant));
        if wide {
            self.slots.push(Slot::Continuation);
        }
        Ok(index)
    }

    /// Index of a `CONSTANT_Utf8` entry for `s`, appending one if absent.
    pub fn intern_utf8(&mut self, s: &str) -> Result<u16> {
        let encoded = mutf8::encode(s);
        for (index, constant) in self.entries() {
            if let Constant::Utf8(bytes) = constant {
                if bytes == &encoded {
                    return Ok(index);
                }
            }
        }
        self.push(Constant::Utf8(encoded))
    }

    /// Index of a `CONSTANT_String` entry for `s`, appending the string and
    /// its backing Utf8 entry if absent.
    pub fn intern_string(&mut self, s: &str) -> Result<u16> {
        let utf8_index = self.intern_utf8(s)?;
        for (index, constant) in self.entries() {
            if matches!(constant, Constant::String(i) if *i == utf8_index) {
                return Ok(index);
            }
        }
        self.push(Constant::String(utf8_index))
    }

    /// Iterate `(index, constant)` over real entries, skipping the phantom
    /// slots behind Long/Double.
    pub fn entries(&self) -> impl Iterator<Item = (u16, &Constant)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| match slot {
            Slot::Entry(c) => Some((i as u16 + 1, c)),
            Slot::Continuation => None,
        })
    }
}

impl Default for ConstantPool {
    fn default() -> Self {
        Self::new()
    }
}
