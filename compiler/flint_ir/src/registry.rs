//! Operator registry.
//!
//! Maps operator names to one or more [`OperatorEntry`] records (one per
//! arity). The registry is immutable once built. Construction checks that
//! every opcode is unique across all entries, since the opcode is the only
//! thing the code generator sees.
//!
//! The built-in table is available through [`OperatorRegistry::global`],
//! which builds it on first use. Callers that want a different table build
//! their own with [`OperatorRegistry::new`] and pass it to the compiler.

mod table;

use std::sync::OnceLock;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use thiserror::Error;

use crate::ValueType;

pub use table::BUILTIN_OPERATORS;

/// How the code generator has to lower an operator.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum OperatorClass {
    /// Plain arithmetic, comparison or math primitive.
    Arithmetic,
    /// Logical connective on truthiness (`&&`, `||`).
    Logical,
    /// Runtime helper with fixed argument types (`len`, `index`).
    Intrinsic,
}

/// Result type of an operator, given its operand types.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ResultRule {
    /// Float if any operand is a float, Int otherwise.
    Promote,
    /// Always Int.
    Int,
    /// Always Bool.
    Bool,
    /// Always Float.
    Float,
}

impl ResultRule {
    pub fn result_type(self, operands: &[ValueType]) -> ValueType {
        match self {
            ResultRule::Promote => {
                if operands.contains(&ValueType::Float) {
                    ValueType::Float
                } else {
                    ValueType::Int
                }
            }
            ResultRule::Int => ValueType::Int,
            ResultRule::Bool => ValueType::Bool,
            ResultRule::Float => ValueType::Float,
        }
    }
}

/// One operator at one arity.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct OperatorEntry {
    /// Name as written in source.
    pub name: &'static str,
    /// Globally unique opcode.
    pub opcode: u64,
    /// Number of operands (1 or 2).
    pub arity: u8,
    /// Name of the primitive the code generator lowers this to.
    pub native: &'static str,
    pub class: OperatorClass,
    /// Required operand types, for operators that are not generic.
    pub arg_hints: Option<&'static [ValueType]>,
    pub result: ResultRule,
}

impl OperatorEntry {
    pub const fn arithmetic(
        name: &'static str,
        opcode: u64,
        arity: u8,
        native: &'static str,
        result: ResultRule,
    ) -> Self {
        OperatorEntry {
            name,
            opcode,
            arity,
            native,
            class: OperatorClass::Arithmetic,
            arg_hints: None,
            result,
        }
    }

    pub const fn logical(name: &'static str, opcode: u64, native: &'static str) -> Self {
        OperatorEntry {
            name,
            opcode,
            arity: 2,
            native,
            class: OperatorClass::Logical,
            arg_hints: None,
            result: ResultRule::Bool,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    pub const fn intrinsic(
        name: &'static str,
        opcode: u64,
        native: &'static str,
        arg_hints: &'static [ValueType],
        result: ResultRule,
    ) -> Self {
        OperatorEntry {
            name,
            opcode,
            arity: arg_hints.len() as u8,
            native,
            class: OperatorClass::Intrinsic,
            arg_hints: Some(arg_hints),
            result,
        }
    }

    #[inline]
    pub const fn is_binary(&self) -> bool {
        self.arity == 2
    }
}

/// Inconsistent operator table.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Error)]
pub enum RegistryError {
    #[error("conflicting opcode {opcode:#04x} for {first} and {second}")]
    DuplicateOpcode {
        opcode: u64,
        first: &'static str,
        second: &'static str,
    },
    #[error("operator {name} declared twice with arity {arity}")]
    DuplicateArity { name: &'static str, arity: u8 },
    #[error("operator {name} has unsupported arity {arity}")]
    UnsupportedArity { name: &'static str, arity: u8 },
}

/// Immutable operator lookup table.
#[derive(Debug)]
pub struct OperatorRegistry {
    entries: Vec<OperatorEntry>,
    by_name: FxHashMap<&'static str, SmallVec<[usize; 2]>>,
    by_opcode: FxHashMap<u64, usize>,
}

static GLOBAL_REGISTRY: OnceLock<OperatorRegistry> = OnceLock::new();

impl OperatorRegistry {
    /// Build and validate a registry.
    pub fn new(entries: impl IntoIterator<Item = OperatorEntry>) -> Result<Self, RegistryError> {
        let entries: Vec<OperatorEntry> = entries.into_iter().collect();
        let mut by_name: FxHashMap<&'static str, SmallVec<[usize; 2]>> = FxHashMap::default();
        let mut by_opcode: FxHashMap<u64, usize> = FxHashMap::default();

        for (index, entry) in entries.iter().enumerate() {
            if !(1..=2).contains(&entry.arity) {
                return Err(RegistryError::UnsupportedArity {
                    name: entry.name,
                    arity: entry.arity,
                });
            }
            if let Some(&other) = by_opcode.get(&entry.opcode) {
                return Err(RegistryError::DuplicateOpcode {
                    opcode: entry.opcode,
                    first: entries[other].name,
                    second: entry.name,
                });
            }
            let slots = by_name.entry(entry.name).or_default();
            if slots.iter().any(|&i| entries[i].arity == entry.arity) {
                return Err(RegistryError::DuplicateArity {
                    name: entry.name,
                    arity: entry.arity,
                });
            }
            slots.push(index);
            by_opcode.insert(entry.opcode, index);
        }

        Ok(OperatorRegistry {
            entries,
            by_name,
            by_opcode,
        })
    }

    /// Registry over [`BUILTIN_OPERATORS`].
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::new(BUILTIN_OPERATORS.iter().copied())
    }

    /// Process-wide built-in registry, built on first use.
    ///
    /// # Panics
    ///
    /// Panics if the built-in table is inconsistent. That is a build defect,
    /// not a runtime condition, and is covered by this crate's tests.
    pub fn global() -> &'static OperatorRegistry {
        GLOBAL_REGISTRY.get_or_init(|| match Self::builtin() {
            Ok(registry) => registry,
            Err(err) => panic!("invalid built-in operator table: {err}"),
        })
    }

    /// Entry with exactly this name and arity.
    pub fn lookup(&self, name: &str, arity: usize) -> Option<&OperatorEntry> {
        self.by_name
            .get(name)?
            .iter()
            .map(|&i| &self.entries[i])
            .find(|entry| usize::from(entry.arity) == arity)
    }

    /// Entry to use for a form with `argc` operands.
    ///
    /// An exact arity match wins. Otherwise a binary entry is used for
    /// `argc > 2`, to be applied pairwise left to right.
    pub fn resolve(&self, name: &str, argc: usize) -> Option<&OperatorEntry> {
        self.lookup(name, argc).or_else(|| {
            if argc > 2 {
                self.lookup(name, 2)
            } else {
                None
            }
        })
    }

    pub fn by_opcode(&self, opcode: u64) -> Option<&OperatorEntry> {
        self.by_opcode.get(&opcode).map(|&i| &self.entries[i])
    }

    /// Whether any entry uses this name.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OperatorEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
