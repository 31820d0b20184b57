//! Binary encoding export for blankets.
//!
//! Once a variable's blanket is final, its blocks can be assigned binary
//! codes and exported as one bit-vector per encoding bit, ready for LUT
//! mapping. A term claimed by several blocks whose codes disagree in a bit
//! becomes a don't-care in that bit.

use std::fmt;

use crate::blanket::Blanket;

/// A single bit position of an encoded term.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BitValue {
    Zero,
    One,
    DontCare,
}

impl fmt::Display for BitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BitValue::Zero => write!(f, "0"),
            BitValue::One => write!(f, "1"),
            BitValue::DontCare => write!(f, "-"),
        }
    }
}

/// One generated encoding bit: a value per term in `1..=max_term`
/// (`values[term - 1]`).
#[derive(Debug, Clone)]
pub struct EncodedBit {
    pub name: String,
    pub values: Vec<BitValue>,
}

/// Number of bits required to binary-encode `count` distinct values: 0 for
/// no values, 1 for a single value, otherwise `ceil(log2(count))`.
pub fn encoding_bits_count(count: usize) -> usize {
    match count {
        0 => 0,
        1 => 1,
        _ => (usize::BITS - (count - 1).leading_zeros()) as usize,
    }
}

/// Encodes a blanket as binary signals: block `i` receives the code `i` on
/// `encoding_bits_count(block count)` bits, and each term in `1..=max_term`
/// receives, per bit, the code bit of the block(s) containing it. The bit is
/// a don't-care where the containing blocks disagree, and every bit is a
/// don't-care when no block contains the term.
pub fn encode(blanket: &Blanket) -> Vec<EncodedBit> {
    let bits = encoding_bits_count(blanket.len());
    let max_term = blanket
        .blocks()
        .iter()
        .filter_map(|b| b.max_term())
        .max()
        .unwrap_or(0);

    let codes: Vec<Vec<BitValue>> = (0..blanket.len())
        .map(|i| {
            (0..bits)
                .rev()
                .map(|bit| {
                    if (i >> bit) & 1 == 1 {
                        BitValue::One
                    } else {
                        BitValue::Zero
                    }
                })
                .collect()
        })
        .collect();

    let mut signals: Vec<EncodedBit> = (0..bits)
        .map(|i| EncodedBit {
            name: format!("b{}", i),
            values: Vec::with_capacity(max_term as usize),
        })
        .collect();

    for term in 1..=max_term {
        let mut value: Option<Vec<BitValue>> = None;
        for (i, block) in blanket.blocks().iter().enumerate() {
            if block.contains(term) {
                match &mut value {
                    None => value = Some(codes[i].clone()),
                    Some(value) => {
                        for (pos, &code_bit) in codes[i].iter().enumerate() {
                            if value[pos] != code_bit {
                                value[pos] = BitValue::DontCare;
                            }
                        }
                    }
                }
            }
        }
        let value = value.unwrap_or_else(|| vec![BitValue::DontCare; bits]);
        for (signal, bit) in signals.iter_mut().zip(value) {
            signal.values.push(bit);
        }
    }

    signals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values_string(bit: &EncodedBit) -> String {
        bit.values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_encoding_bits_count() {
        assert_eq!(encoding_bits_count(0), 0);
        assert_eq!(encoding_bits_count(1), 1);
        assert_eq!(encoding_bits_count(2), 1);
        assert_eq!(encoding_bits_count(3), 2);
        assert_eq!(encoding_bits_count(4), 2);
        assert_eq!(encoding_bits_count(5), 3);
        assert_eq!(encoding_bits_count(8), 3);
        assert_eq!(encoding_bits_count(9), 4);
    }

    #[test]
    fn test_encode_partition() {
        let blanket = Blanket::parse("0:1,2; 1:3,4;").unwrap();
        let signals = encode(&blanket);
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].name, "b0");
        assert_eq!(values_string(&signals[0]), "0011");
    }

    #[test]
    fn test_encode_four_blocks() {
        let blanket = Blanket::parse("A:1; B:2; C:3; D:4;").unwrap();
        let signals = encode(&blanket);
        assert_eq!(signals.len(), 2);
        // Block codes 00, 01, 10, 11; b0 is the high bit.
        assert_eq!(values_string(&signals[0]), "0011");
        assert_eq!(values_string(&signals[1]), "0101");
    }

    #[test]
    fn test_encode_disagreement_is_dont_care() {
        // Term 2 sits in both blocks, whose codes differ in the only bit.
        let blanket = Blanket::parse("A:1,2; B:2,3;").unwrap();
        let signals = encode(&blanket);
        assert_eq!(values_string(&signals[0]), "0-1");
    }

    #[test]
    fn test_encode_uncovered_term_is_dont_care() {
        let blanket = Blanket::parse("A:1; B:3;").unwrap();
        let signals = encode(&blanket);
        assert_eq!(values_string(&signals[0]), "0-1");
    }

    #[test]
    fn test_encode_single_block() {
        let blanket = Blanket::parse("A:1,2;").unwrap();
        let signals = encode(&blanket);
        assert_eq!(signals.len(), 1);
        assert_eq!(values_string(&signals[0]), "00");
    }
}
