// scrimshaw-classfile/src/limits.rs

//! Recomputation of `max_stack` and `max_locals` for a method body.
//!
//! The values stored in a parsed `Code` attribute are derived metadata: any
//! transformer that rewrites bytecode would invalidate them, so serialization
//! always recomputes them from the instruction stream instead of trusting the
//! input.
//!
//! `max_stack` comes from a worklist walk: every reachable instruction gets
//! the operand stack depth at its entry, branch targets inherit the depth
//! after the branching instruction, and exception handlers start at depth 1
//! (the pushed throwable). Stack effects of field accesses and invocations
//! are resolved through the constant pool and descriptor arithmetic.
//! `max_locals` is the highest local slot touched by any load/store/iinc
//! (plus value width) or implied by the argument slots of the method
//! descriptor.
//!
//! `jsr`/`ret` subroutines are treated conservatively: the return address
//! counts one stack slot at the subroutine entry and `ret` ends the walk for
//! its path.

use tracing::debug;

use crate::model::CodeAttribute;
use crate::pool::{Constant, ConstantPool};
use crate::{descriptor, ClassFileError, Result, ACC_STATIC};

/// Compute `(max_stack, max_locals)` for one method body.
pub fn compute(
    pool: &ConstantPool,
    access_flags: u16,
    method_descriptor: &str,
    code: &CodeAttribute,
) -> Result<(u16, u16)> {
    let receiver = if access_flags & ACC_STATIC == 0 { 1 } else { 0 };
    let arg_slots = u32::from(descriptor::arg_slots(method_descriptor)?) + receiver;

    if code.code.is_empty() {
        return Ok((0, clamp(arg_slots)));
    }

    let mut walk = Walk {
        pool,
        code: &code.code,
        max_stack: 0,
        max_locals: arg_slots,
        depth_at: vec![-1; code.code.len()],
        work: Vec::new(),
    };

    walk.enqueue(0, 0)?;
    for handler in &code.exception_table {
        // The JVM pushes the thrown value before entering a handler.
        walk.enqueue(i64::from(handler.handler_pc), 1)?;
    }
    while let Some(pc) = walk.work.pop() {
        walk.step(pc)?;
    }

    Ok((clamp(walk.max_stack), clamp(walk.max_locals)))
}

fn clamp(v: u32) -> u16 {
    v.min(u32::from(u16::MAX)) as u16
}

struct Walk<'a> {
    pool: &'a ConstantPool,
    code: &'a [u8],
    max_stack: u32,
    max_locals: u32,
    /// Entry stack depth per bytecode offset; -1 marks unvisited.
    depth_at: Vec<i32>,
    work: Vec<usize>,
}

impl Walk<'_> {
    fn enqueue(&mut self, target: i64, depth: i32) -> Result<()> {
        if target < 0 || target >= self.code.len() as i64 {
            return Err(ClassFileError::BadBranchTarget {
                target,
                len: self.code.len(),
            });
        }
        self.max_stack = self.max_stack.max(depth as u32);
        let target = target as usize;
        if self.depth_at[target] < 0 {
            self.depth_at[target] = depth;
            self.work.push(target);
        } else if self.depth_at[target] != depth {
            debug!(
                offset = target,
                first = self.depth_at[target],
                second = depth,
                "inconsistent stack depth at join; keeping first"
            );
        }
        Ok(())
    }

    /// Fallthrough after an instruction of `size` bytes with stack effect
    /// `delta`.
    fn fall(&mut self, pc: usize, size: usize, depth: i32, delta: i32) -> Result<()> {
        self.enqueue((pc + size) as i64, (depth + delta).max(0))
    }

    fn touch_local(&mut self, index: u32, width: u32) {
        self.max_locals = self.max_locals.max(index + width);
    }

    fn u8_at(&self, i: usize) -> Result<u8> {
        self.code.get(i).copied().ok_or(ClassFileError::Truncated(i))
    }

    fn u16_at(&self, i: usize) -> Result<u16> {
        Ok(u16::from_be_bytes([self.u8_at(i)?, self.u8_at(i + 1)?]))
    }

    fn i16_at(&self, i: usize) -> Result<i16> {
        Ok(self.u16_at(i)? as i16)
    }

    fn i32_at(&self, i: usize) -> Result<i32> {
        Ok(i32::from_be_bytes([
            self.u8_at(i)?,
            self.u8_at(i + 1)?,
            self.u8_at(i + 2)?,
            self.u8_at(i + 3)?,
        ]))
    }

    /// `(arg_slots_including_receiver_excluded, return_width)` for the
    /// method reference or call site behind a pool index.
    fn method_effect(&self, index: u16) -> Result<(i32, i32)> {
        let name_and_type = match self.pool.get(index, "method reference")? {
            Constant::MethodRef { name_and_type, .. }
            | Constant::InterfaceMethodRef { name_and_type, .. }
            | Constant::InvokeDynamic { name_and_type, .. }
            | Constant::Dynamic { name_and_type, .. } => *name_and_type,
            _ => {
                return Err(ClassFileError::WrongConstantKind {
                    index,
                    expected: "method reference",
                })
            }
        };
        let descriptor_index = match self.pool.get(name_and_type, "NameAndType")? {
            Constant::NameAndType { descriptor, .. } => *descriptor,
            _ => {
                return Err(ClassFileError::WrongConstantKind {
                    index: name_and_type,
                    expected: "NameAndType",
                })
            }
        };
        let desc = self.pool.utf8_str(descriptor_index)?;
        Ok((
            i32::from(descriptor::arg_slots(desc)?),
            i32::from(descriptor::return_width(desc)?),
        ))
    }

    /// Stack width of the field behind a `CONSTANT_Fieldref` index.
    fn field_effect(&self, index: u16) -> Result<i32> {
        let name_and_type = match self.pool.get(index, "field reference")? {
            Constant::FieldRef { name_and_type, .. } => *name_and_type,
            _ => {
                return Err(ClassFileError::WrongConstantKind {
                    index,
                    expected: "Fieldref",
                })
            }
        };
        let descriptor_index = match self.pool.get(name_and_type, "NameAndType")? {
            Constant::NameAndType { descriptor, .. } => *descriptor,
            _ => {
                return Err(ClassFileError::WrongConstantKind {
                    index: name_and_type,
                    expected: "NameAndType",
                })
            }
        };
        Ok(i32::from(descriptor::field_width(
            self.pool.utf8_str(descriptor_index)?,
        )))
    }

    fn step(&mut self, pc: usize) -> Result<()> {
        let depth = self.depth_at[pc];
        let op = self.u8_at(pc)?;
        match op {
            // nop
            0x00 => self.fall(pc, 1, depth, 0)?,
            // aconst_null, iconst_m1 .. iconst_5
            0x01..=0x08 => self.fall(pc, 1, depth, 1)?,
            // lconst_0/1, dconst_0/1
            0x09 | 0x0a | 0x0e | 0x0f => self.fall(pc, 1, depth, 2)?,
            // fconst_0/1/2
            0x0b..=0x0d => self.fall(pc, 1, depth, 1)?,
            // bipush
            0x10 => self.fall(pc, 2, depth, 1)?,
            // sipush
            0x11 => self.fall(pc, 3, depth, 1)?,
            // ldc (category-1 constants only)
            0x12 => self.fall(pc, 2, depth, 1)?,
            // ldc_w
            0x13 => self.fall(pc, 3, depth, 1)?,
            // ldc2_w
            0x14 => self.fall(pc, 3, depth, 2)?,

            // iload/fload/aload with explicit index
            0x15 | 0x17 | 0x19 => {
                let index = u32::from(self.u8_at(pc + 1)?);
                self.touch_local(index, 1);
                self.fall(pc, 2, depth, 1)?;
            }
            // lload/dload with explicit index
            0x16 | 0x18 => {
                let index = u32::from(self.u8_at(pc + 1)?);
                self.touch_local(index, 2);
                self.fall(pc, 2, depth, 2)?;
            }
            // iload_0..3
            0x1a..=0x1d => {
                self.touch_local(u32::from(op - 0x1a), 1);
                self.fall(pc, 1, depth, 1)?;
            }
            // lload_0..3
            0x1e..=0x21 => {
                self.touch_local(u32::from(op - 0x1e), 2);
                self.fall(pc, 1, depth, 2)?;
            }
            // fload_0..3
            0x22..=0x25 => {
                self.touch_local(u32::from(op - 0x22), 1);
                self.fall(pc, 1, depth, 1)?;
            }
            // dload_0..3
            0x26..=0x29 => {
                self.touch_local(u32::from(op - 0x26), 2);
                self.fall(pc, 1, depth, 2)?;
            }
            // aload_0..3
            0x2a..=0x2d => {
                self.touch_local(u32::from(op - 0x2a), 1);
                self.fall(pc, 1, depth, 1)?;
            }

            // laload/daload: arrayref+index -> category-2 value
            0x2f | 0x31 => self.fall(pc, 1, depth, 0)?,
            // iaload/faload/aaload/baload/caload/saload
            0x2e | 0x30 | 0x32..=0x35 => self.fall(pc, 1, depth, -1)?,

            // istore/fstore/astore with explicit index
            0x36 | 0x38 | 0x3a => {
                let index = u32::from(self.u8_at(pc + 1)?);
                self.touch_local(index, 1);
                self.fall(pc, 2, depth, -1)?;
            }
            // lstore/dstore with explicit index
            0x37 | 0x39 => {
                let index = u32::from(self.u8_at(pc + 1)?);
                self.touch_local(index, 2);
                self.fall(pc, 2, depth, -2)?;
            }
            // istore_0..3
            0x3b..=0x3e => {
                self.touch_local(u32::from(op - 0x3b), 1);
                self.fall(pc, 1, depth, -1)?;
            }
            // lstore_0..3
            0x3f..=0x42 => {
                self.touch_local(u32::from(op - 0x3f), 2);
                self.fall(pc, 1, depth, -2)?;
            }
            // fstore_0..3
            0x43..=0x46 => {
                self.touch_local(u32::from(op - 0x43), 1);
                self.fall(pc, 1, depth, -1)?;
            }
            // dstore_0..3
            0x47..=0x4a => {
                self.touch_local(u32::from(op - 0x47), 2);
                self.fall(pc, 1, depth, -2)?;
            }
            // astore_0..3
            0x4b..=0x4e => {
                self.touch_local(u32::from(op - 0x4b), 1);
                self.fall(pc, 1, depth, -1)?;
            }

            // lastore/dastore
            0x50 | 0x52 => self.fall(pc, 1, depth, -4)?,
            // iastore/fastore/aastore/bastore/castore/sastore
            0x4f | 0x51 | 0x53..=0x56 => self.fall(pc, 1, depth, -3)?,

            // pop, pop2
            0x57 => self.fall(pc, 1, depth, -1)?,
            0x58 => self.fall(pc, 1, depth, -2)?,
            // dup, dup_x1, dup_x2
            0x59..=0x5b => self.fall(pc, 1, depth, 1)?,
            // dup2, dup2_x1, dup2_x2
            0x5c..=0x5e => self.fall(pc, 1, depth, 2)?,
            // swap
            0x5f => self.fall(pc, 1, depth, 0)?,

            // int/float add/sub/mul/div/rem
            0x60 | 0x62 | 0x64 | 0x66 | 0x68 | 0x6a | 0x6c | 0x6e | 0x70 | 0x72 => {
                self.fall(pc, 1, depth, -1)?;
            }
            // long/double add/sub/mul/div/rem
            0x61 | 0x63 | 0x65 | 0x67 | 0x69 | 0x6b | 0x6d | 0x6f | 0x71 | 0x73 => {
                self.fall(pc, 1, depth, -2)?;
            }
            // ineg/lneg/fneg/dneg
            0x74..=0x77 => self.fall(pc, 1, depth, 0)?,
            // shifts: value op int-amount
            0x78..=0x7d => self.fall(pc, 1, depth, -1)?,
            // iand/ior/ixor
            0x7e | 0x80 | 0x82 => self.fall(pc, 1, depth, -1)?,
            // land/lor/lxor
            0x7f | 0x81 | 0x83 => self.fall(pc, 1, depth, -2)?,
            // iinc
            0x84 => {
                let index = u32::from(self.u8_at(pc + 1)?);
                self.touch_local(index, 1);
                self.fall(pc, 3, depth, 0)?;
            }

            // i2l, i2d, f2l, f2d
            0x85 | 0x87 | 0x8c | 0x8d => self.fall(pc, 1, depth, 1)?,
            // i2f, l2d, f2i, d2l, i2b, i2c, i2s
            0x86 | 0x8a | 0x8b | 0x8f | 0x91..=0x93 => self.fall(pc, 1, depth, 0)?,
            // l2i, l2f, d2i, d2f
            0x88 | 0x89 | 0x8e | 0x90 => self.fall(pc, 1, depth, -1)?,

            // lcmp, dcmpl, dcmpg
            0x94 | 0x97 | 0x98 => self.fall(pc, 1, depth, -3)?,
            // fcmpl, fcmpg
            0x95 | 0x96 => self.fall(pc, 1, depth, -1)?,

            // ifeq..ifle, ifnull, ifnonnull
            0x99..=0x9e | 0xc6 | 0xc7 => {
                let offset = i64::from(self.i16_at(pc + 1)?);
                let next = (depth - 1).max(0);
                self.enqueue(pc as i64 + offset, next)?;
                self.enqueue((pc + 3) as i64, next)?;
            }
            // if_icmpXX, if_acmpXX
            0x9f..=0xa6 => {
                let offset = i64::from(self.i16_at(pc + 1)?);
                let next = (depth - 2).max(0);
                self.enqueue(pc as i64 + offset, next)?;
                self.enqueue((pc + 3) as i64, next)?;
            }
            // goto
            0xa7 => {
                let offset = i64::from(self.i16_at(pc + 1)?);
                self.enqueue(pc as i64 + offset, depth)?;
            }
            // jsr: the subroutine sees the return address on the stack
            0xa8 => {
                let offset = i64::from(self.i16_at(pc + 1)?);
                self.enqueue(pc as i64 + offset, depth + 1)?;
                self.enqueue((pc + 3) as i64, depth)?;
            }
            // ret: end of a subroutine path
            0xa9 => {
                let index = u32::from(self.u8_at(pc + 1)?);
                self.touch_local(index, 1);
            }

            // tableswitch
            0xaa => {
                let base = aligned_operands(pc);
                let default = i64::from(self.i32_at(base)?);
                let low = i64::from(self.i32_at(base + 4)?);
                let high = i64::from(self.i32_at(base + 8)?);
                if high < low {
                    return Err(ClassFileError::MalformedSwitch(pc));
                }
                let next = (depth - 1).max(0);
                self.enqueue(pc as i64 + default, next)?;
                let count = (high - low + 1) as usize;
                for k in 0..count {
                    let offset = i64::from(self.i32_at(base + 12 + 4 * k)?);
                    self.enqueue(pc as i64 + offset, next)?;
                }
            }
            // lookupswitch
            0xab => {
                let base = aligned_operands(pc);
                let default = i64::from(self.i32_at(base)?);
                let npairs = self.i32_at(base + 4)?;
                if npairs < 0 {
                    return Err(ClassFileError::MalformedSwitch(pc));
                }
                let next = (depth - 1).max(0);
                self.enqueue(pc as i64 + default, next)?;
                for k in 0..npairs as usize {
                    let offset = i64::from(self.i32_at(base + 8 + 8 * k + 4)?);
                    self.enqueue(pc as i64 + offset, next)?;
                }
            }

            // ireturn/freturn/areturn/lreturn/dreturn/return/athrow: terminal
            0xac..=0xb1 | 0xbf => {}

            // getstatic/putstatic/getfield/putfield
            0xb2..=0xb5 => {
                let width = self.field_effect(self.u16_at(pc + 1)?)?;
                let delta = match op {
                    0xb2 => width,
                    0xb3 => -width,
                    0xb4 => width - 1,
                    _ => -width - 1,
                };
                self.fall(pc, 3, depth, delta)?;
            }

            // invokevirtual, invokespecial
            0xb6 | 0xb7 => {
                let (args, ret) = self.method_effect(self.u16_at(pc + 1)?)?;
                self.fall(pc, 3, depth, ret - args - 1)?;
            }
            // invokestatic
            0xb8 => {
                let (args, ret) = self.method_effect(self.u16_at(pc + 1)?)?;
                self.fall(pc, 3, depth, ret - args)?;
            }
            // invokeinterface (index, count, 0)
            0xb9 => {
                let (args, ret) = self.method_effect(self.u16_at(pc + 1)?)?;
                self.fall(pc, 5, depth, ret - args - 1)?;
            }
            // invokedynamic (index, 0, 0)
            0xba => {
                let (args, ret) = self.method_effect(self.u16_at(pc + 1)?)?;
                self.fall(pc, 5, depth, ret - args)?;
            }

            // new
            0xbb => self.fall(pc, 3, depth, 1)?,
            // newarray
            0xbc => self.fall(pc, 2, depth, 0)?,
            // anewarray
            0xbd => self.fall(pc, 3, depth, 0)?,
            // arraylength
            0xbe => self.fall(pc, 1, depth, 0)?,
            // checkcast, instanceof
            0xc0 | 0xc1 => self.fall(pc, 3, depth, 0)?,
            // monitorenter, monitorexit
            0xc2 | 0xc3 => self.fall(pc, 1, depth, -1)?,

            // wide
            0xc4 => {
                let sub = self.u8_at(pc + 1)?;
                let index = u32::from(self.u16_at(pc + 2)?);
                match sub {
                    0x84 => {
                        self.touch_local(index, 1);
                        self.fall(pc, 6, depth, 0)?;
                    }
                    0x15 | 0x17 | 0x19 => {
                        self.touch_local(index, 1);
                        self.fall(pc, 4, depth, 1)?;
                    }
                    0x16 | 0x18 => {
                        self.touch_local(index, 2);
                        self.fall(pc, 4, depth, 2)?;
                    }
                    0x36 | 0x38 | 0x3a => {
                        self.touch_local(index, 1);
                        self.fall(pc, 4, depth, -1)?;
                    }
                    0x37 | 0x39 => {
                        self.touch_local(index, 2);
                        self.fall(pc, 4, depth, -2)?;
                    }
                    0xa9 => {
                        self.touch_local(index, 1);
                    }
                    _ => {
                        return Err(ClassFileError::UnknownOpcode {
                            opcode: sub,
                            offset: pc + 1,
                        })
                    }
                }
            }
            // multianewarray
            0xc5 => {
                let dims = i32::from(self.u8_at(pc + 3)?);
                self.fall(pc, 4, depth, 1 - dims)?;
            }
            // goto_w
            0xc8 => {
                let offset = i64::from(self.i32_at(pc + 1)?);
                self.enqueue(pc as i64 + offset, depth)?;
            }
            // jsr_w
            0xc9 => {
                let offset = i64::from(self.i32_at(pc + 1)?);
                self.enqueue(pc as i64 + offset, depth + 1)?;
                self.enqueue((pc + 5) as i64, depth)?;
            }

            _ => {
                return Err(ClassFileError::UnknownOpcode {
                    opcode: op,
                    offset: pc,
                })
            }
        }
        Ok(())
    }
}

/// Offset of the first operand of a switch at `pc`: padded so it is 4-byte
/// aligned relative to the start of the code array.
fn aligned_operands(pc: usize) -> usize {
    let operands = pc + 1;
    operands + (4 - (operands % 4)) % 4
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ExceptionHandler;

    fn code_attr(code: Vec<u8>, handlers: Vec<ExceptionHandler>) -> CodeAttribute {
        CodeAttribute {
            name_index: 1,
            max_stack: 0,
            max_locals: 0,
            code,
            exception_table: handlers,
            attributes: Vec::new(),
        }
    }

    #[test]
    fn test_empty_body_uses_descriptor_slots() {
        let pool = ConstantPool::new();
        let code = code_attr(Vec::new(), Vec::new());
        assert_eq!(compute(&pool, ACC_STATIC, "(IJ)V", &code).unwrap(), (0, 3));
        // Instance method counts the receiver slot.
        assert_eq!(compute(&pool, 0, "(IJ)V", &code).unwrap(), (0, 4));
    }

    #[test]
    fn test_conditional_branch() {
        let pool = ConstantPool::new();
        // iload_0; ifeq +5; iconst_1; ireturn; iconst_0; ireturn
        let code = code_attr(
            vec![0x1a, 0x99, 0x00, 0x05, 0x04, 0xac, 0x03, 0xac],
            Vec::new(),
        );
        assert_eq!(compute(&pool, ACC_STATIC, "(I)I", &code).unwrap(), (1, 1));
    }

    #[test]
    fn test_long_arithmetic_doubles_slots() {
        let pool = ConstantPool::new();
        // lload_0; lload_2; ladd; lreturn
        let code = code_attr(vec![0x1e, 0x20, 0x61, 0xad], Vec::new());
        assert_eq!(compute(&pool, ACC_STATIC, "(JJ)J", &code).unwrap(), (4, 4));
    }

    #[test]
    fn test_exception_handler_counts_one_slot() {
        let pool = ConstantPool::new();
        // return, with a handler covering it that rethrows: athrow at pc 1
        let code = code_attr(
            vec![0xb1, 0xbf],
            vec![ExceptionHandler {
                start_pc: 0,
                end_pc: 1,
                handler_pc: 1,
                catch_type: 0,
            }],
        );
        assert_eq!(compute(&pool, ACC_STATIC, "()V", &code).unwrap(), (1, 0));
    }

    #[test]
    fn test_invocation_effect_from_pool() {
        let mut pool = ConstantPool::new();
        let class_name = pool.intern_utf8("com/example/Util").unwrap();
        let class = pool.push(Constant::Class(class_name)).unwrap();
        let name = pool.intern_utf8("combine").unwrap();
        let desc = pool.intern_utf8("(II)J").unwrap();
        let nat = pool
            .push(Constant::NameAndType {
                name,
                descriptor: desc,
            })
            .unwrap();
        let method = pool
            .push(Constant::MethodRef {
                class,
                name_and_type: nat,
            })
            .unwrap();

        // iconst_1; iconst_2; invokestatic #method; lreturn
        let mut code = vec![0x04, 0x05, 0xb8];
        code.extend_from_slice(&method.to_be_bytes());
        code.push(0xad);
        let code = code_attr(code, Vec::new());
        // Two int args collapse into one long result: peak is the two args.
        assert_eq!(compute(&pool, ACC_STATIC, "()J", &code).unwrap(), (2, 0));
    }

    #[test]
    fn test_field_effect_from_pool() {
        let mut pool = ConstantPool::new();
        let class_name = pool.intern_utf8("com/example/Holder").unwrap();
        let class = pool.push(Constant::Class(class_name)).unwrap();
        let name = pool.intern_utf8("ticks").unwrap();
        let desc = pool.intern_utf8("J").unwrap();
        let nat = pool
            .push(Constant::NameAndType {
                name,
                descriptor: desc,
            })
            .unwrap();
        let field = pool
            .push(Constant::FieldRef {
                class,
                name_and_type: nat,
            })
            .unwrap();

        // getstatic #field; lreturn
        let mut code = vec![0xb2];
        code.extend_from_slice(&field.to_be_bytes());
        code.push(0xad);
        let code = code_attr(code, Vec::new());
        assert_eq!(compute(&pool, ACC_STATIC, "()J", &code).unwrap(), (2, 0));
    }

    #[test]
    fn test_lookupswitch_padding_and_targets() {
        let pool = ConstantPool::new();
        // pc 0: iload_0
        // pc 1: lookupswitch, operands aligned to pc 4 (2 pad bytes)
        //       default +19 -> pc 20, one pair (match 5, offset +21 -> pc 22)
        // pc 20: iconst_0; pc 21: ireturn; pc 22: iconst_1; pc 23: ireturn
        let mut code = vec![0x1a, 0xab, 0x00, 0x00];
        code.extend_from_slice(&19i32.to_be_bytes());
        code.extend_from_slice(&1i32.to_be_bytes());
        code.extend_from_slice(&5i32.to_be_bytes());
        code.extend_from_slice(&21i32.to_be_bytes());
        code.extend_from_slice(&[0x03, 0xac, 0x04, 0xac]);
        let code = code_attr(code, Vec::new());
        assert_eq!(compute(&pool, ACC_STATIC, "(I)I", &code).unwrap(), (1, 1));
    }

    #[test]
    fn test_wide_load_extends_locals() {
        let pool = ConstantPool::new();
        // wide iload 300; ireturn
        let code = code_attr(vec![0xc4, 0x15, 0x01, 0x2c, 0xac], Vec::new());
        assert_eq!(
            compute(&pool, ACC_STATIC, "()I", &code).unwrap(),
            (1, 301)
        );
    }

    #[test]
    fn test_branch_out_of_range_rejected() {
        let pool = ConstantPool::new();
        // goto +100 in a 3-byte body
        let code = code_attr(vec![0xa7, 0x00, 0x64], Vec::new());
        match compute(&pool, ACC_STATIC, "()V", &code) {
            Err(ClassFileError::BadBranchTarget { target: 100, len: 3 }) => {}
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_opcode_rejected() {
        let pool = ConstantPool::new();
        let code = code_attr(vec![0xfe], Vec::new());
        match compute(&pool, ACC_STATIC, "()V", &code) {
            Err(ClassFileError::UnknownOpcode { opcode: 0xfe, offset: 0 }) => {}
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_unreachable_code_is_ignored() {
        let pool = ConstantPool::new();
        // return; then garbage that is never reached
        let code = code_attr(vec![0xb1, 0xfe, 0xfe], Vec::new());
        assert_eq!(compute(&pool, ACC_STATIC, "()V", &code).unwrap(), (0, 0));
    }
}
