// scrimshaw-classfile/src/model.rs

//! Structural class file model: parse, mutate, serialize.
//!
//! Only the structure the pipeline needs is decoded: the constant pool, the
//! field and method tables, and each method's `Code` attribute (so that
//! stack/locals bounds can be recomputed on write). Every other attribute --
//! on the class, on fields, and nested inside `Code` -- is an opaque
//! `(name_index, bytes)` pair that is written back exactly as read.

use tracing::debug;

use crate::bytes::{ByteReader, ByteWriter};
use crate::pool::ConstantPool;
use crate::{limits, mutf8, ClassFileError, Result, CLASS_EXT};

const MAGIC: u32 = 0xcafe_babe;

/// An attribute carried as opaque bytes.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name_index: u16,
    pub info: Vec<u8>,
}

/// One `exception_table` row of a `Code` attribute.
#[derive(Debug, Clone)]
pub struct ExceptionHandler {
    pub start_pc: u16,
    pub end_pc: u16,
    pub handler_pc: u16,
    pub catch_type: u16,
}

/// A structurally decoded `Code` attribute. `max_stack`/`max_locals` hold the
/// values read from the input; they are recomputed from the bytecode when the
/// class is serialized and the stored values are ignored at that point.
#[derive(Debug, Clone)]
pub struct CodeAttribute {
    pub name_index: u16,
    pub max_stack: u16,
    pub max_locals: u16,
    pub code: Vec<u8>,
    pub exception_table: Vec<ExceptionHandler>,
    /// Nested attributes (StackMapTable, LineNumberTable, ...) kept opaque.
    pub attributes: Vec<Attribute>,
}

/// A method attribute: `Code` decoded, everything else opaque, original
/// ordering preserved.
#[derive(Debug, Clone)]
pub enum MethodAttribute {
    Code(CodeAttribute),
    Other(Attribute),
}

#[derive(Debug, Clone)]
pub struct Field {
    pub access_flags: u16,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone)]
pub struct Method {
    pub access_flags: u16,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub attributes: Vec<MethodAttribute>,
}

/// In-memory model of one compiled class.
pub struct ClassFile {
    pub minor_version: u16,
    pub major_version: u16,
    pub pool: ConstantPool,
    pub access_flags: u16,
    pub this_class: u16,
    pub super_class: u16,
    pub interfaces: Vec<u16>,
    pub fields: Vec<Field>,
    pub methods: Vec<Method>,
    pub attributes: Vec<Attribute>,
}

impl ClassFile {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut r = ByteReader::new(data);
        let magic = r.u32()?;
        if magic != MAGIC {
            return Err(ClassFileError::BadMagic(magic));
        }
        let minor_version = r.u16()?;
        let major_version = r.u16()?;
        let pool = ConstantPool::parse(&mut r)?;
        let access_flags = r.u16()?;
        let this_class = r.u16()?;
        let super_class = r.u16()?;

        let interface_count = r.u16()?;
        let mut interfaces = Vec::with_capacity(interface_count as usize);
        for _ in 0..interface_count {
            interfaces.push(r.u16()?);
        }

        let field_count = r.u16()?;
        let mut fields = Vec::with_capacity(field_count as usize);
        for _ in 0..field_count {
            fields.push(parse_field(&mut r)?);
        }

        let method_count = r.u16()?;
        let mut methods = Vec::with_capacity(method_count as usize);
        for _ in 0..method_count {
            methods.push(parse_method(&mut r, &pool)?);
        }

        let attributes = parse_attributes(&mut r)?;

        if r.remaining() != 0 {
            debug!(trailing = r.remaining(), "ignoring bytes after class attributes");
        }

        Ok(Self {
            minor_version,
            major_version,
            pool,
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            attributes,
        })
    }

    /// Serialize back into class file bytes, recomputing every method's
    /// stack/locals bounds from its bytecode.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut w = ByteWriter::new();
        w.u32(MAGIC);
        w.u16(self.minor_version);
        w.u16(self.major_version);
        self.pool.write(&mut w);
        w.u16(self.access_flags);
        w.u16(self.this_class);
        w.u16(self.super_class);

        w.u16(self.interfaces.len() as u16);
        for index in &self.interfaces {
            w.u16(*index);
        }

        w.u16(self.fields.len() as u16);
        for field in &self.fields {
            w.u16(field.access_flags);
            w.u16(field.name_index);
            w.u16(field.descriptor_index);
            write_attributes(&mut w, &field.attributes);
        }

        w.u16(self.methods.len() as u16);
        for method in &self.methods {
            w.u16(method.access_flags);
            w.u16(method.name_index);
            w.u16(method.descriptor_index);
            w.u16(method.attributes.len() as u16);
            for attribute in &method.attributes {
                match attribute {
                    MethodAttribute::Other(a) => write_attribute(&mut w, a),
                    MethodAttribute::Code(code) => {
                        let desc = self.pool.utf8_str(method.descriptor_index)?;
                        let (max_stack, max_locals) =
                            limits::compute(&self.pool, method.access_flags, desc, code)?;
                        write_code_attribute(&mut w, code, max_stack, max_locals);
                    }
                }
            }
        }

        write_attributes(&mut w, &self.attributes);
        Ok(w.into_vec())
    }

    /// Fully qualified internal name (e.g. `com/example/Widget`).
    pub fn name(&self) -> Result<&str> {
        self.pool.class_name(self.this_class)
    }

    /// Canonical container entry name: internal name plus `.class`.
    pub fn entry_name(&self) -> Result<String> {
        Ok(format!("{}{}", self.name()?, CLASS_EXT))
    }

    /// Append a `public static final` (or however `access_flags` reads)
    /// field of the given name and string constant value. Interns the pool
    /// entries it needs; existing entries and indices are untouched.
    pub fn append_string_constant(
        &mut self,
        access_flags: u16,
        name: &str,
        value: &str,
    ) -> Result<()> {
        let name_index = self.pool.intern_utf8(name)?;
        let descriptor_index = self.pool.intern_utf8("Ljava/lang/String;")?;
        let attr_name_index = self.pool.intern_utf8("ConstantValue")?;
        let value_index = self.pool.intern_string(value)?;
        self.fields.push(Field {
            access_flags,
            name_index,
            descriptor_index,
            attributes: vec![Attribute {
                name_index: attr_name_index,
                info: value_index.to_be_bytes().to_vec(),
            }],
        });
        Ok(())
    }

    /// Whether any field already carries this exact name.
    pub fn has_field_named(&self, name: &str) -> bool {
        let encoded = mutf8::encode(name);
        self.fields.iter().any(|field| {
            self.pool
                .utf8(field.name_index)
                .map(|bytes| bytes == encoded.as_slice())
                .unwrap_or(false)
        })
    }
}

fn parse_attribute(r: &mut ByteReader<'_>) -> Result<Attribute> {
    let name_index = r.u16()?;
    let len = r.u32()? as usize;
    Ok(Attribute {
        name_index,
        info: r.bytes(len)?.to_vec(),
    })
}

fn parse_attributes(r: &mut ByteReader<'_>) -> Result<Vec<Attribute>> {
    let count = r.u16()?;
    let mut attributes = Vec::with_capacity(count as usize);
    for _ in 0..count {
        attributes.push(parse_attribute(r)?);
    }
    Ok(attributes)
}

fn parse_field(r: &mut ByteReader<'_>) -> Result<Field> {
    Ok(Field {
        access_flags: r.u16()?,
        name_index: r.u16()?,
        descriptor_index: r.u16()?,
        attributes: parse_attributes(r)?,
    })
}

fn parse_method(r: &mut ByteReader<'_>, pool: &ConstantPool) -> Result<Method> {
    let access_flags = r.u16()?;
    let name_index = r.u16()?;
    let descriptor_index = r.u16()?;
    let count = r.u16()?;
    let mut attributes = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let attribute = parse_attribute(r)?;
        if matches!(pool.utf8(attribute.name_index), Ok(name) if name == b"Code") {
            attributes.push(MethodAttribute::Code(parse_code(&attribute)?));
        } else {
            attributes.push(MethodAttribute::Other(attribute));
        }
    }
    Ok(Method {
        access_flags,
        name_index,
        descriptor_index,
        attributes,
    })
}

fn parse_code(attribute: &Attribute) -> Result<CodeAttribute> {
    let mut r = ByteReader::new(&attribute.info);
    let max_stack = r.u16()?;
    let max_locals = r.u16()?;
    let code_len = r.u32()? as usize;
    let code = r.bytes(code_len)?.to_vec();

    let handler_count = r.u16()?;
    let mut exception_table = Vec::with_capacity(handler_count as usize);
    for _ in 0..handler_count {
        exception_table.push(ExceptionHandler {
            start_pc: r.u16()?,
            end_pc: r.u16()?,
            handler_pc: r.u16()?,
            catch_type: r.u16()?,
        });
    }
    let attributes = parse_attributes(&mut r)?;

    if r.remaining() != 0 {
        // A length mismatch here would silently drop bytes on re-serialize.
        return Err(ClassFileError::TrailingBytes {
            context: "Code attribute",
            count: r.remaining(),
        });
    }

    Ok(CodeAttribute {
        name_index: attribute.name_index,
        max_stack,
        max_locals,
        code,
        exception_table,
        attributes,
    })
}

fn write_attribute(w: &mut ByteWriter, attribute: &Attribute) {
    w.u16(attribute.name_index);
    w.u32(attribute.info.len() as u32);
    w.bytes(&attribute.info);
}

fn write_attributes(w: &mut ByteWriter, attributes: &[Attribute]) {
    w.u16(attributes.len() as u16);
    for attribute in attributes {
        write_attribute(w, attribute);
    }
}

fn write_code_attribute(w: &mut ByteWriter, code: &CodeAttribute, max_stack: u16, max_locals: u16) {
    let mut body = ByteWriter::new();
    body.u16(max_stack);
    body.u16(max_locals);
    body.u32(code.code.len() as u32);
    body.bytes(&code.code);
    body.u16(code.exception_table.len() as u16);
    for handler in &code.exception_table {
        body.u16(handler.start_pc);
        body.u16(handler.end_pc);
        body.u16(handler.handler_pc);
        body.u16(handler.catch_type);
    }
    let mut nested = ByteWriter::new();
    write_attributes(&mut nested, &code.attributes);
    body.bytes(&nested.into_vec());

    let body = body.into_vec();
    w.u16(code.name_index);
    w.u32(body.len() as u32);
    w.bytes(&body);
}
