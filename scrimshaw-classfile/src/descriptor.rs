// scrimshaw-classfile/src/descriptor.rs

//! Slot arithmetic over field and method descriptors.
//!
//! The limits computation needs to know how many operand stack slots a
//! field access or method invocation moves, which is fully determined by the
//! descriptor: `long` and `double` take two slots, everything else one.

use crate::{ClassFileError, Result};

/// Stack slots occupied by a value of the given field descriptor.
pub fn field_width(descriptor: &str) -> u16 {
    match descriptor.as_bytes().first() {
        Some(b'J') | Some(b'D') => 2,
        _ => 1,
    }
}

/// Total argument slots declared by a method descriptor (receiver excluded).
pub fn arg_slots(descriptor: &str) -> Result<u16> {
    let bytes = descriptor.as_bytes();
    if bytes.first() != Some(&b'(') {
        return Err(bad(descriptor));
    }
    let mut i = 1;
    let mut slots: u16 = 0;
    while i < bytes.len() && bytes[i] != b')' {
        match bytes[i] {
            b'J' | b'D' => {
                slots += 2;
                i += 1;
            }
            b'B' | b'C' | b'F' | b'I' | b'S' | b'Z' => {
                slots += 1;
                i += 1;
            }
            b'L' => {
                i = skip_reference(bytes, i).ok_or_else(|| bad(descriptor))?;
                slots += 1;
            }
            b'[' => {
                while i < bytes.len() && bytes[i] == b'[' {
                    i += 1;
                }
                match bytes.get(i) {
                    Some(b'L') => i = skip_reference(bytes, i).ok_or_else(|| bad(descriptor))?,
                    Some(b'B' | b'C' | b'F' | b'I' | b'S' | b'Z' | b'J' | b'D') => i += 1,
                    _ => return Err(bad(descriptor)),
                }
                // Arrays are references regardless of element type.
                slots += 1;
            }
            _ => return Err(bad(descriptor)),
        }
    }
    if bytes.get(i) != Some(&b')') {
        return Err(bad(descriptor));
    }
    Ok(slots)
}

/// Stack slots pushed by a method's return value: 0, 1 or 2.
pub fn return_width(descriptor: &str) -> Result<u16> {
    let close = descriptor.rfind(')').ok_or_else(|| bad(descriptor))?;
    match descriptor.as_bytes().get(close + 1) {
        Some(b'V') => Ok(0),
        Some(b'J') | Some(b'D') => Ok(2),
        Some(_) => Ok(1),
        None => Err(bad(descriptor)),
    }
}

fn skip_reference(bytes: &[u8], start: usize) -> Option<usize> {
    // bytes[start] == b'L'; returns the index one past the ';'
    let semi = bytes[start..].iter().position(|&b| b == b';')?;
    Some(start + semi + 1)
}

fn bad(descriptor: &str) -> ClassFileError {
    ClassFileError::BadDescriptor(descriptor.to_string())
}
