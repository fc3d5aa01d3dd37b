//! Opcode records and the finished specification.

use indexmap::IndexMap;

/// One entry in the specification.
///
/// All fields hold text as it appears in (or is derived from) the source
/// table. `code` is either a decimal string or a `0x`-prefixed hex string,
/// depending on how the entry was produced.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Opcode {
    /// The primary mnemonic, e.g. `OP_CHECKSIG`.
    pub name: String,
    /// A second mnemonic for the same operation, or empty.
    pub alias: String,
    pub code: String,
    pub inputs: String,
    pub outputs: String,
    pub description: String,
}

impl Opcode {
    /// `true` if this opcode is one half of an alias pair.
    pub fn has_alias(&self) -> bool {
        !self.alias.is_empty()
    }

    /// The numeric value of `code`, if it is a single decimal or hex number.
    pub fn code_value(&self) -> Option<u32> {
        match self.code.strip_prefix("0x") {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => self.code.parse().ok(),
        }
    }
}

/// The complete mapping from mnemonic to [`Opcode`].
///
/// Iteration follows the order in which names were first inserted. Lookup
/// is by exact mnemonic only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Specification {
    opcodes: IndexMap<String, Opcode>,
}

impl Specification {
    pub fn get(&self, name: &str) -> Option<&Opcode> {
        self.opcodes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.opcodes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.opcodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.opcodes.is_empty()
    }

    /// Iterate over all opcodes, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Opcode> + '_ {
        self.opcodes.values()
    }

    /// Iterate over all mnemonics, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.opcodes.keys().map(String::as_str)
    }

    pub(crate) fn insert(&mut self, opcode: Opcode) -> Option<Opcode> {
        self.opcodes.insert(opcode.name.clone(), opcode)
    }
}

impl<'a> IntoIterator for &'a Specification {
    type Item = &'a Opcode;
    type IntoIter = indexmap::map::Values<'a, String, Opcode>;

    fn into_iter(self) -> Self::IntoIter {
        self.opcodes.values()
    }
}
