// src/transform/art.rs

//! Text-art injection transformer.
//!
//! Each visited class receives every non-blank line of one text-art block as
//! a `public static final String` constant field under a random name. Blocks
//! are assigned round-robin: the cursor advances once per processed class and
//! wraps at the block count, so more classes than blocks reuse earlier blocks
//! rather than erroring.

use std::cell::Cell;
use std::collections::BTreeSet;
use std::rc::Rc;

use scrimshaw_classfile::{ClassFile, ACC_FINAL, ACC_PUBLIC, ACC_STATIC};
use tracing::{debug, warn};

use crate::ident;
use crate::transform::Transformer;

/// Shared read handle on an injector's processed-class tally. Clone it
/// before boxing the injector into an archive; the count stays readable
/// after `transform` runs. Single-threaded, like the rest of the pipeline.
#[derive(Clone, Default)]
pub struct InjectionStats(Rc<Cell<usize>>);

impl InjectionStats {
    /// Number of classes processed so far.
    pub fn processed(&self) -> usize {
        self.0.get()
    }
}

/// Transformer that writes text-art blocks into classes as constant fields.
pub struct ArtInjector {
    blocks: Vec<String>,
    selection: Option<BTreeSet<String>>,
    unique_names: bool,
    cursor: usize,
    stats: InjectionStats,
}

impl ArtInjector {
    /// Injector over an ordered list of text-art blocks, visiting every
    /// class it is handed.
    pub fn new(blocks: Vec<String>) -> Self {
        Self {
            blocks,
            selection: None,
            unique_names: false,
            cursor: 0,
            stats: InjectionStats::default(),
        }
    }

    /// Restrict injection to the given canonical entry names (class name
    /// plus `.class`). Unselected classes are skipped without advancing the
    /// block cursor.
    pub fn with_selection(mut self, selection: BTreeSet<String>) -> Self {
        self.selection = Some(selection);
        self
    }

    /// Re-roll generated field names until they collide with nothing already
    /// on the class. Off by default: plain injection appends blindly and
    /// accepts the (tiny) collision risk.
    pub fn with_unique_names(mut self, unique: bool) -> Self {
        self.unique_names = unique;
        self
    }

    /// Read handle on the processed-class tally.
    pub fn stats(&self) -> InjectionStats {
        self.stats.clone()
    }

    /// Number of classes processed by this injector so far.
    pub fn processed_count(&self) -> usize {
        self.stats.processed()
    }

    fn field_name(&self, class: &ClassFile) -> String {
        let mut name = ident::random_identifier(ident::DEFAULT_LEN);
        if self.unique_names {
            while class.has_field_named(&name) {
                name = ident::random_identifier(ident::DEFAULT_LEN);
            }
        }
        name
    }
}

impl Transformer for ArtInjector {
    fn visit(&mut self, class: &mut ClassFile) {
        if self.blocks.is_empty() {
            return;
        }

        if let Some(selection) = &self.selection {
            let skip = match class.entry_name() {
                Ok(entry) => !selection.contains(&entry),
                // A class whose name cannot be resolved can never match.
                Err(_) => true,
            };
            if skip {
                return;
            }
        }

        let block = &self.blocks[self.cursor];
        let mut injected = 0usize;
        for line in block.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let name = self.field_name(class);
            if let Err(err) =
                class.append_string_constant(ACC_PUBLIC | ACC_STATIC | ACC_FINAL, &name, line)
            {
                // Pool exhaustion is the only realistic cause; the class
                // keeps whatever lines fit.
                warn!(error = %err, "stopping injection into class");
                break;
            }
            injected += 1;
        }
        debug!(
            class = class.name().unwrap_or("<unresolved>"),
            block = self.cursor,
            fields = injected,
            "injected text art"
        );

        self.cursor = (self.cursor + 1) % self.blocks.len();
        self.stats.0.set(self.stats.0.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrimshaw_classfile::{Constant, ConstantPool};

    fn test_class(name: &str) -> ClassFile {
        let mut pool = ConstantPool::new();
        let this_name = pool.intern_utf8(name).unwrap();
        let this_class = pool.push(Constant::Class(this_name)).unwrap();
        let super_name = pool.intern_utf8("java/lang/Object").unwrap();
        let super_class = pool.push(Constant::Class(super_name)).unwrap();
        ClassFile {
            minor_version: 0,
            major_version: 52,
            pool,
            access_flags: 0x0021,
            this_class,
            super_class,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            attributes: Vec::new(),
        }
    }

    fn field_values(class: &ClassFile) -> Vec<String> {
        class
            .fields
            .iter()
            .map(|field| {
                let info = &field.attributes[0].info;
                let index = u16::from_be_bytes([info[0], info[1]]);
                match class.pool.get(index, "test").unwrap() {
                    Constant::String(utf8) => {
                        class.pool.utf8_str(*utf8).unwrap().to_string()
                    }
                    other => panic!("expected string constant, got {other:?}"),
                }
            })
            .collect()
    }

    #[test]
    fn test_injects_non_blank_lines() {
        let mut injector = ArtInjector::new(vec!["@@\n\n   \n##\n".to_string()]);
        let mut class = test_class("com/example/A");
        injector.visit(&mut class);
        assert_eq!(field_values(&class), vec!["@@", "##"]);
        assert_eq!(injector.processed_count(), 1);
        for field in &class.fields {
            assert_eq!(field.access_flags, ACC_PUBLIC | ACC_STATIC | ACC_FINAL);
            assert_eq!(
                class.pool.utf8_str(field.descriptor_index).unwrap(),
                "Ljava/lang/String;"
            );
        }
    }

    #[test]
    fn test_empty_block_list_is_a_no_op() {
        let mut injector = ArtInjector::new(Vec::new());
        let mut class = test_class("com/example/A");
        injector.visit(&mut class);
        assert!(class.fields.is_empty());
        assert_eq!(injector.processed_count(), 0);
    }

    #[test]
    fn test_round_robin_wraps() {
        let blocks = vec!["@@\n".to_string(), "##\n".to_string()];
        let mut injector = ArtInjector::new(blocks);
        let mut classes = vec![
            test_class("com/example/A"),
            test_class("com/example/B"),
            test_class("com/example/C"),
        ];
        for class in &mut classes {
            injector.visit(class);
        }
        // Class i gets block i mod 2.
        assert_eq!(field_values(&classes[0]), vec!["@@"]);
        assert_eq!(field_values(&classes[1]), vec!["##"]);
        assert_eq!(field_values(&classes[2]), vec!["@@"]);
        assert_eq!(injector.processed_count(), 3);
    }

    #[test]
    fn test_selection_skips_without_advancing_cursor() {
        let blocks = vec!["@@\n".to_string(), "##\n".to_string()];
        let selection: BTreeSet<String> = ["com/example/A.class", "com/example/C.class"]
            .into_iter()
            .map(String::from)
            .collect();
        let mut injector = ArtInjector::new(blocks).with_selection(selection);
        let mut a = test_class("com/example/A");
        let mut b = test_class("com/example/B");
        let mut c = test_class("com/example/C");
        injector.visit(&mut a);
        injector.visit(&mut b);
        injector.visit(&mut c);
        assert_eq!(field_values(&a), vec!["@@"]);
        assert!(b.fields.is_empty());
        // The skipped class did not consume a block: C gets block 1.
        assert_eq!(field_values(&c), vec!["##"]);
        assert_eq!(injector.processed_count(), 2);
    }

    #[test]
    fn test_stats_handle_outlives_boxing() {
        let injector = ArtInjector::new(vec!["@@\n".to_string()]);
        let stats = injector.stats();
        let mut boxed: Box<dyn Transformer> = Box::new(injector);
        let mut class = test_class("com/example/A");
        boxed.visit(&mut class);
        assert_eq!(stats.processed(), 1);
    }

    #[test]
    fn test_unique_names_avoid_existing_fields() {
        // Not probabilistic: pre-seed every field the injector could collide
        // with is impossible, so this just exercises the code path.
        let mut injector = ArtInjector::new(vec!["@@\n".to_string()]).with_unique_names(true);
        let mut class = test_class("com/example/A");
        injector.visit(&mut class);
        assert_eq!(class.fields.len(), 1);
    }
}
