//! Codec round-trip tests
//!
//! Tests verify:
//! - decode(encode(v)) == v across every supported shape
//! - encoded_size(v) == encode(v).len()
//! - Wire layout of prefixes, bit-packing and aggregates
//! - Format errors on malformed input

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;

use contractkv::codec::traits::MAX_ZERO_SIZED_ITEMS;
use contractkv::codec::VarUint;
use contractkv::{decode, encode, encoded_size, impl_codec, impl_codec_enum, Codec, Error};
use proptest::prelude::*;

// =============================================================================
// Helper Types and Functions
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
struct Balance {
    owner: String,
    amount: u128,
    frozen: bool,
}

impl_codec!(Balance { owner, amount, frozen });

#[derive(Debug, Clone, PartialEq, Default)]
struct Ledger {
    id: u32,
    balances: Vec<Balance>,
    tags: BTreeSet<String>,
    limits: BTreeMap<u8, i64>,
    checksum: [u8; 4],
}

impl_codec!(Ledger {
    id,
    balances,
    tags,
    limits,
    checksum,
});

#[derive(Debug, Clone, PartialEq)]
struct Pair<A, B> {
    left: A,
    right: B,
}

impl_codec!(Pair<A, B> { left, right });

#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(i32)]
enum Direction {
    Left = -1,
    Stay = 0,
    Right = 1,
}

impl_codec_enum!(Direction as i32 { Left, Stay, Right });

fn round_trip<T: Codec + PartialEq + Debug>(value: &T) {
    let bytes = encode(value);
    assert_eq!(bytes.len(), encoded_size(value), "size law for {:?}", value);
    let decoded: T = decode(&bytes).unwrap();
    assert_eq!(&decoded, value);
}

fn balance_strategy() -> impl Strategy<Value = Balance> {
    (".{0,16}", any::<u128>(), any::<bool>()).prop_map(|(owner, amount, frozen)| Balance {
        owner,
        amount,
        frozen,
    })
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #[test]
    fn prop_integers_round_trip(a in any::<u8>(), b in any::<i16>(), c in any::<u32>(),
                                d in any::<i64>(), e in any::<u128>(), f in any::<isize>()) {
        let value = (a, b, c, d, e, f);
        let bytes = encode(&value);
        prop_assert_eq!(bytes.len(), 1 + 2 + 4 + 8 + 16 + 8);
        prop_assert_eq!(decode::<(u8, i16, u32, i64, u128, isize)>(&bytes).unwrap(), value);
    }

    #[test]
    fn prop_floats_round_trip_bitwise(x in any::<f64>(), y in any::<f32>()) {
        let bytes = encode(&(x, y));
        let (dx, dy): (f64, f32) = decode(&bytes).unwrap();
        prop_assert_eq!(dx.to_bits(), x.to_bits());
        prop_assert_eq!(dy.to_bits(), y.to_bits());
    }

    #[test]
    fn prop_strings_and_chars_round_trip(s in ".*", c in any::<char>()) {
        let value = (s, c);
        let bytes = encode(&value);
        prop_assert_eq!(bytes.len(), encoded_size(&value));
        prop_assert_eq!(decode::<(String, char)>(&bytes).unwrap(), value);
    }

    #[test]
    fn prop_bool_vec_packs_eight_per_byte(bits in prop::collection::vec(any::<bool>(), 0..200)) {
        let bytes = encode(&bits);
        let packed = bits.len().div_ceil(8);
        prop_assert_eq!(
            bytes.len(),
            encoded_size(&VarUint(bits.len() as u64)) + encoded_size(&VarUint(packed as u64)) + packed
        );
        prop_assert_eq!(decode::<Vec<bool>>(&bytes).unwrap(), bits);
    }

    #[test]
    fn prop_collections_round_trip(
        bytes in prop::collection::vec(any::<u8>(), 0..300),
        set in prop::collection::btree_set(any::<i64>(), 0..20),
        map in prop::collection::btree_map(any::<u16>(), ".{0,8}", 0..20),
    ) {
        let value = (bytes, set, map);
        let encoded = encode(&value);
        prop_assert_eq!(encoded.len(), encoded_size(&value));
        let decoded: (Vec<u8>, BTreeSet<i64>, BTreeMap<u16, String>) = decode(&encoded).unwrap();
        prop_assert_eq!(decoded, value);
    }

    #[test]
    fn prop_aggregates_round_trip(
        id in any::<u32>(),
        balances in prop::collection::vec(balance_strategy(), 0..5),
        checksum in any::<[u8; 4]>(),
    ) {
        let ledger = Ledger {
            id,
            balances,
            checksum,
            ..Ledger::default()
        };
        let bytes = encode(&ledger);
        prop_assert_eq!(bytes.len(), encoded_size(&ledger));
        prop_assert_eq!(decode::<Ledger>(&bytes).unwrap(), ledger);
    }

    #[test]
    fn prop_varuint_round_trip(n in any::<u64>()) {
        let bytes = encode(&VarUint(n));
        prop_assert!(bytes.len() <= 10);
        prop_assert_eq!(decode::<VarUint>(&bytes).unwrap(), VarUint(n));
    }
}

// =============================================================================
// Edge Cases
// =============================================================================

#[test]
fn test_empty_shapes() {
    round_trip(&String::new());
    round_trip(&Vec::<u32>::new());
    round_trip(&Vec::<bool>::new());
    round_trip(&BTreeSet::<u8>::new());
    round_trip(&BTreeMap::<String, Vec<u8>>::new());
    assert_eq!(encode(&String::new()), vec![0]);
    assert_eq!(encode(&Vec::<bool>::new()), vec![0, 0]);
}

#[test]
fn test_nested_aggregate() {
    let mut ledger = Ledger {
        id: 9,
        checksum: [1, 2, 3, 4],
        ..Ledger::default()
    };
    ledger.balances.push(Balance {
        owner: "alice".into(),
        amount: u128::MAX,
        frozen: true,
    });
    ledger.tags.insert("vip".into());
    ledger.limits.insert(1, -500);
    round_trip(&ledger);

    let pair = Pair {
        left: ledger,
        right: vec![Direction::Left, Direction::Right],
    };
    round_trip(&pair);
}

#[test]
fn test_aggregate_has_no_framing() {
    let balance = Balance {
        owner: "a".into(),
        amount: 1,
        frozen: false,
    };
    let mut expected = vec![1, b'a'];
    expected.extend_from_slice(&1u128.to_le_bytes());
    expected.push(0);
    assert_eq!(encode(&balance), expected);
}

#[test]
fn test_tuples_of_every_arity() {
    round_trip(&(1u8,));
    round_trip(&(1u8, 2u16, 3u32, 4u64, 5i8, 6i16, 7i32, 8i64, 9u128, 10i128, 'x', true));
    round_trip(&((), String::from("unit")));
}

#[test]
fn test_fixed_array_carries_length_prefix() {
    assert_eq!(encode(&[0x0102u16, 0x0304]), vec![2, 0x02, 0x01, 0x04, 0x03]);
    round_trip(&[String::from("a"), String::from("bc")]);
    round_trip(&[[true, false], [false, true]]);
}

#[test]
fn test_fixed_array_prefix_mismatch() {
    let bytes = encode(&[1u8, 2, 3]);
    assert!(matches!(
        decode::<[u8; 4]>(&bytes),
        Err(Error::LengthMismatch {
            expected: 4,
            actual: 3
        })
    ));
}

#[test]
fn test_enum_discriminants() {
    assert_eq!(encode(&Direction::Left), (-1i32).to_le_bytes().to_vec());
    round_trip(&Direction::Stay);
    assert!(matches!(
        decode::<Direction>(&7i32.to_le_bytes()),
        Err(Error::InvalidDiscriminant {
            type_name: "Direction",
            value: 7
        })
    ));
}

#[test]
fn test_invalid_utf8_rejected() {
    assert!(matches!(
        decode::<String>(&[2, 0xff, 0xfe]),
        Err(Error::InvalidUtf8(_))
    ));
}

#[test]
fn test_truncated_sequence() {
    let bytes = encode(&vec![1u32, 2, 3]);
    assert!(matches!(
        decode::<Vec<u32>>(&bytes[..bytes.len() - 1]),
        Err(Error::OutOfBounds { .. })
    ));
}

#[test]
fn test_huge_length_prefix_does_not_allocate() {
    // varint(u64::MAX >> 1) followed by nothing
    let bytes = [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7f];
    assert!(decode::<Vec<u64>>(&bytes).is_err());
    assert!(decode::<String>(&bytes).is_err());
}

#[test]
fn test_unit_sequences_within_cap_round_trip() {
    assert_eq!(encode(&vec![(); 3]), vec![3]);
    round_trip(&vec![(); 3]);
    round_trip(&vec![(); MAX_ZERO_SIZED_ITEMS]);
}

#[test]
fn test_huge_unit_sequence_rejected() {
    let bytes = [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7f];
    assert!(matches!(
        decode::<Vec<()>>(&bytes),
        Err(Error::SequenceTooLong {
            max: MAX_ZERO_SIZED_ITEMS,
            ..
        })
    ));
    assert!(matches!(
        decode::<BTreeSet<()>>(&bytes),
        Err(Error::SequenceTooLong { .. })
    ));
    assert!(matches!(
        decode::<BTreeMap<(), ()>>(&bytes),
        Err(Error::SequenceTooLong { .. })
    ));

    let just_over = encode(&VarUint(MAX_ZERO_SIZED_ITEMS as u64 + 1));
    assert!(matches!(
        decode::<Vec<()>>(&just_over),
        Err(Error::SequenceTooLong { len, .. }) if len == MAX_ZERO_SIZED_ITEMS + 1
    ));
}

#[test]
fn test_trailing_bytes_ignored() {
    let mut bytes = encode(&5u16);
    bytes.extend_from_slice(&[9, 9]);
    assert_eq!(decode::<u16>(&bytes).unwrap(), 5);
}
