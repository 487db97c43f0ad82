//! Bytecode records and their flat encodings.

use flint_lexer::TokenKind;

/// Size of one encoded record in bytes.
pub const RECORD_SIZE: usize = 16;

/// Bits of a tag that hold the [`TokenKind`].
pub const KIND_MASK: u64 = 0xff;

/// Marker set on the first record's tag when the expression yields a float.
pub const FLOAT_RETURN_FLAG: u64 = 0xff << 8;

/// One `(tag, payload)` bytecode record.
#[repr(C)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Record {
    pub tag: u64,
    pub payload: u64,
}

const _: () = assert!(std::mem::size_of::<Record>() == RECORD_SIZE);

impl Record {
    #[inline]
    pub const fn new(kind: TokenKind, payload: u64) -> Self {
        Record {
            tag: kind.tag() as u64,
            payload,
        }
    }

    /// Operator application record.
    #[inline]
    pub const fn operator(opcode: u64) -> Self {
        Record::new(TokenKind::Parenthesis, opcode)
    }

    /// Kind stored in the low byte of the tag.
    #[inline]
    pub fn kind(self) -> Option<TokenKind> {
        u8::try_from(self.tag & KIND_MASK)
            .ok()
            .and_then(TokenKind::from_tag)
    }

    /// Whether this record carries the float-return marker.
    #[inline]
    pub const fn returns_float(self) -> bool {
        self.tag & FLOAT_RETURN_FLAG == FLOAT_RETURN_FLAG
    }

    #[inline]
    pub const fn is_operator(self) -> bool {
        self.tag & KIND_MASK == TokenKind::Parenthesis as u64
    }
}

/// Flatten records into `(tag, payload)` word pairs.
pub fn encode_words(records: &[Record]) -> Vec<u64> {
    records
        .iter()
        .flat_map(|record| [record.tag, record.payload])
        .collect()
}

/// Little-endian byte view of the records.
pub fn encode_bytes(records: &[Record]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(records.len() * RECORD_SIZE);
    for record in records {
        bytes.extend_from_slice(&record.tag.to_le_bytes());
        bytes.extend_from_slice(&record.payload.to_le_bytes());
    }
    bytes
}

/// Rebuild records from word pairs. `None` for an odd word count.
pub fn decode_words(words: &[u64]) -> Option<Vec<Record>> {
    if words.len() % 2 != 0 {
        return None;
    }
    Some(
        words
            .chunks_exact(2)
            .map(|pair| Record {
                tag: pair[0],
                payload: pair[1],
            })
            .collect(),
    )
}
