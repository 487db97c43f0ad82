//! Stable-address storage for embedded string constants.
//!
//! String literals are referenced from bytecode by address. Each literal is
//! copied into its own boxed allocation together with a boxed
//! [`StrDescriptor`] pointing at it; growing the arena's vectors moves the
//! boxes, never the heap data behind them, so every address handed out stays
//! valid until the arena is dropped.

/// `(pointer, length)` pair describing a UTF-8 string, as read by generated code.
#[repr(C)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct StrDescriptor {
    pub ptr: u64,
    pub len: u64,
}

impl StrDescriptor {
    pub fn of(text: &str) -> Self {
        StrDescriptor {
            ptr: text.as_ptr() as u64,
            len: text.len() as u64,
        }
    }
}

/// Owner of every constant string a compiled program refers to.
#[derive(Debug, Default)]
pub struct ConstArena {
    texts: Vec<Box<str>>,
    descriptors: Vec<Box<StrDescriptor>>,
}

impl ConstArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retain a copy of `text` and return the address of its descriptor.
    pub fn retain_str(&mut self, text: &str) -> u64 {
        let text: Box<str> = Box::from(text);
        let descriptor = Box::new(StrDescriptor::of(&text));
        let address = std::ptr::addr_of!(*descriptor) as u64;
        self.texts.push(text);
        self.descriptors.push(descriptor);
        address
    }

    /// Retained strings, in insertion order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.texts.iter().map(AsRef::as_ref)
    }

    /// Whether `address` is one of this arena's descriptors.
    pub fn owns_descriptor(&self, address: u64) -> bool {
        self.descriptors
            .iter()
            .any(|d| std::ptr::addr_of!(**d) as u64 == address)
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

#[cfg(test)]
mod tests;
