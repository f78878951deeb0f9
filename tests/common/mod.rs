// tests/common/mod.rs

//! Shared test utilities: synthetic class files and JARs built in memory,
//! so no binary fixtures are checked in.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use scrimshaw_classfile::{ClassFile, Constant, ConstantPool};
use zip::write::FileOptions;
use zip::ZipWriter;

/// Minimal valid class: `public class <name> extends java/lang/Object`,
/// no fields, no methods.
pub fn build_class(name: &str) -> ClassFile {
    let mut pool = ConstantPool::new();
    let this_name = pool.intern_utf8(name).unwrap();
    let this_class = pool.push(Constant::Class(this_name)).unwrap();
    let super_name = pool.intern_utf8("java/lang/Object").unwrap();
    let super_class = pool.push(Constant::Class(super_name)).unwrap();
    ClassFile {
        minor_version: 0,
        major_version: 52,
        pool,
        access_flags: 0x0021, // ACC_PUBLIC | ACC_SUPER
        this_class,
        super_class,
        interfaces: Vec::new(),
        fields: Vec::new(),
        methods: Vec::new(),
        attributes: Vec::new(),
    }
}

/// Serialized bytes of a minimal class.
pub fn class_bytes(name: &str) -> Vec<u8> {
    build_class(name).to_bytes().unwrap()
}

/// Write a JAR containing the given classes (by internal name) and raw
/// resources (by entry name).
pub fn write_jar(path: &Path, class_names: &[&str], resources: &[(&str, &[u8])]) {
    let file = File::create(path).unwrap();
    let mut writer = ZipWriter::new(file);
    let options = FileOptions::default();
    for name in class_names {
        writer
            .start_file(format!("{name}.class"), options)
            .unwrap();
        writer.write_all(&class_bytes(name)).unwrap();
    }
    for (entry, data) in resources {
        writer.start_file(*entry, options).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap();
}

/// The injected constant string values of a class, in field order.
pub fn constant_values(class: &ClassFile) -> Vec<String> {
    class
        .fields
        .iter()
        .filter_map(|field| {
            let attr = field.attributes.first()?;
            let index = u16::from_be_bytes([attr.info[0], attr.info[1]]);
            match class.pool.get(index, "test").ok()? {
                Constant::String(utf8) => {
                    Some(class.pool.utf8_str(*utf8).ok()?.to_string())
                }
                _ => None,
            }
        })
        .collect()
}
