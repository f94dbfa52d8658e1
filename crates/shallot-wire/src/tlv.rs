//! Generic type-length-value streams.
//!
//! A stream is a sequence of `bigsize(type) bigsize(length) value`
//! triples with strictly increasing type ids. Known types are described
//! by a [`TlvRecordType`] table; a marshal function returning `None`
//! omits the field entirely. Types absent from the table survive
//! decoding as opaque [`TlvField`]s and re-encode byte for byte, which
//! is what makes the format forward compatible.

use tracing::trace;

use crate::{bigsize, take, Result, WireError};

/// Schema entry tying a numeric type id to marshal/unmarshal functions
/// over some record type `R`.
pub struct TlvRecordType<R> {
    /// Numeric type id on the wire.
    pub typ: u64,
    /// Field name, used in error messages.
    pub name: &'static str,
    /// Serialize the field out of `R`; `None` omits it.
    pub encode: fn(&R) -> Option<Vec<u8>>,
    /// Populate `R` from the field's value bytes.
    pub decode: fn(&mut R, &[u8]) -> Result<()>,
}

/// A single field kept verbatim because its type id is unregistered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlvField {
    /// Numeric type id.
    pub typ: u64,
    /// Raw value bytes.
    pub value: Vec<u8>,
}

/// Encode a TLV stream into `out`.
///
/// `types` must be sorted by strictly ascending type id; that is the
/// encoder's wire contract and is enforced by assertion. `extra` carries
/// opaque fields (typically the output of a previous [`decode_stream`])
/// which are merged into the stream at their type position.
pub fn encode_stream<R>(
    out: &mut Vec<u8>,
    types: &[TlvRecordType<R>],
    record: &R,
    extra: &[TlvField],
) {
    assert!(
        types.windows(2).all(|w| w[0].typ < w[1].typ),
        "TLV schema table must be sorted by strictly ascending type id"
    );

    let mut fields: Vec<(u64, Vec<u8>)> = types
        .iter()
        .filter_map(|t| (t.encode)(record).map(|value| (t.typ, value)))
        .collect();
    fields.extend(extra.iter().map(|f| (f.typ, f.value.clone())));
    fields.sort_by_key(|(typ, _)| *typ);

    assert!(
        fields.windows(2).all(|w| w[0].0 < w[1].0),
        "duplicate TLV type id in encoded stream"
    );

    for (typ, value) in fields {
        bigsize::put(out, typ);
        bigsize::put(out, value.len() as u64);
        out.extend_from_slice(&value);
    }
}

/// Decode a TLV stream, consuming `bytes` entirely.
///
/// Known fields are unmarshalled into `record`; unknown fields are
/// returned in stream order for opaque passthrough.
pub fn decode_stream<R>(
    types: &[TlvRecordType<R>],
    bytes: &[u8],
    record: &mut R,
) -> Result<Vec<TlvField>> {
    let mut cursor = bytes;
    let mut unknown = Vec::new();
    let mut prev: Option<u64> = None;

    while !cursor.is_empty() {
        let typ = bigsize::get(&mut cursor)?;
        if let Some(prev) = prev {
            if typ <= prev {
                return Err(WireError::OutOfOrderType { typ, prev });
            }
        }
        prev = Some(typ);

        let len = bigsize::get(&mut cursor)?;
        let len = usize::try_from(len).unwrap_or(usize::MAX);
        let value = take(&mut cursor, len)?;

        match types.iter().find(|t| t.typ == typ) {
            Some(t) => (t.decode)(record, value)?,
            None => {
                trace!(typ, len = value.len(), "retaining unknown tlv field");
                unknown.push(TlvField { typ, value: value.to_vec() });
            }
        }
    }

    Ok(unknown)
}

/// Encode a truncated u64: minimal big-endian bytes, no leading zero.
///
/// Zero encodes to an empty byte string.
pub fn encode_tu64(value: u64) -> Vec<u8> {
    let word = value.to_be_bytes();
    let skip = word.iter().take_while(|b| **b == 0).count();
    word[skip..].to_vec()
}

/// Decode a truncated u64, rejecting non-minimal encodings.
pub fn decode_tu64(bytes: &[u8]) -> Result<u64> {
    if bytes.len() > 8 {
        return Err(WireError::IntTooWide { len: bytes.len(), max: 8 });
    }
    if bytes.first() == Some(&0) {
        return Err(WireError::NonMinimalInt);
    }
    Ok(bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b)))
}

/// Encode a truncated u32. See [`encode_tu64`].
pub fn encode_tu32(value: u32) -> Vec<u8> {
    encode_tu64(u64::from(value))
}

/// Decode a truncated u32, rejecting non-minimal encodings.
pub fn decode_tu32(bytes: &[u8]) -> Result<u32> {
    if bytes.len() > 4 {
        return Err(WireError::IntTooWide { len: bytes.len(), max: 4 });
    }
    Ok(decode_tu64(bytes)? as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[derive(Default, Debug, PartialEq)]
    struct TestRecord {
        amount: Option<u64>,
        memo: Option<Vec<u8>>,
    }

    fn amount_encode(r: &TestRecord) -> Option<Vec<u8>> {
        r.amount.map(encode_tu64)
    }

    fn amount_store(r: &mut TestRecord, value: &[u8]) -> Result<()> {
        r.amount = Some(decode_tu64(value)?);
        Ok(())
    }

    fn memo_encode(r: &TestRecord) -> Option<Vec<u8>> {
        r.memo.clone()
    }

    fn memo_store(r: &mut TestRecord, value: &[u8]) -> Result<()> {
        r.memo = Some(value.to_vec());
        Ok(())
    }

    const TEST_TYPES: &[TlvRecordType<TestRecord>] = &[
        TlvRecordType { typ: 1, name: "amount", encode: amount_encode, decode: amount_store },
        TlvRecordType { typ: 5, name: "memo", encode: memo_encode, decode: memo_store },
    ];

    #[test]
    fn test_encode_omits_absent_fields() {
        let record = TestRecord { amount: Some(0x0203), memo: None };
        let mut out = Vec::new();
        encode_stream(&mut out, TEST_TYPES, &record, &[]);
        assert_eq!(out, hex!("01020203"));
    }

    #[test]
    fn test_decode_known_fields() {
        let mut record = TestRecord::default();
        let unknown =
            decode_stream(TEST_TYPES, &hex!("010201000503616263"), &mut record).expect("decode");
        assert!(unknown.is_empty());
        assert_eq!(record.amount, Some(0x0100));
        assert_eq!(record.memo, Some(b"abc".to_vec()));
    }

    #[test]
    fn test_unknown_field_roundtrips() {
        // Type 3 is not registered; it must survive decode + re-encode
        // byte for byte, interleaved at its type position.
        let stream = hex!("010202030304deadbeef050161");
        let mut record = TestRecord::default();
        let unknown = decode_stream(TEST_TYPES, &stream, &mut record).expect("decode");
        assert_eq!(unknown, vec![TlvField { typ: 3, value: hex!("deadbeef").to_vec() }]);

        let mut out = Vec::new();
        encode_stream(&mut out, TEST_TYPES, &record, &unknown);
        assert_eq!(out, stream);
    }

    #[test]
    fn test_decode_rejects_out_of_order() {
        let mut record = TestRecord::default();
        let err = decode_stream(TEST_TYPES, &hex!("05016101020203"), &mut record)
            .expect_err("must reject");
        assert!(matches!(err, WireError::OutOfOrderType { typ: 1, prev: 5 }));
    }

    #[test]
    fn test_decode_rejects_duplicate_type() {
        let mut record = TestRecord::default();
        let err = decode_stream(TEST_TYPES, &hex!("010101010101"), &mut record)
            .expect_err("must reject");
        assert!(matches!(err, WireError::OutOfOrderType { typ: 1, prev: 1 }));
    }

    #[test]
    fn test_decode_rejects_length_overrun() {
        let mut record = TestRecord::default();
        let err =
            decode_stream(TEST_TYPES, &hex!("0105ab"), &mut record).expect_err("must reject");
        assert!(matches!(err, WireError::Truncated { wanted: 5, remaining: 1 }));
    }

    #[test]
    fn test_decode_rejects_truncated_header() {
        let mut record = TestRecord::default();
        let err = decode_stream(TEST_TYPES, &hex!("01"), &mut record).expect_err("must reject");
        assert!(matches!(err, WireError::Truncated { .. }));
    }

    #[test]
    fn test_decode_rejects_bad_known_contents() {
        // Truncated integer with a leading zero byte is non-minimal.
        let mut record = TestRecord::default();
        let err =
            decode_stream(TEST_TYPES, &hex!("01020001"), &mut record).expect_err("must reject");
        assert!(matches!(err, WireError::NonMinimalInt));
    }

    #[test]
    #[should_panic(expected = "sorted by strictly ascending type id")]
    fn test_encode_asserts_table_order() {
        let unsorted: &[TlvRecordType<TestRecord>] = &[
            TlvRecordType { typ: 5, name: "memo", encode: memo_encode, decode: memo_store },
            TlvRecordType { typ: 1, name: "amount", encode: amount_encode, decode: amount_store },
        ];
        let mut out = Vec::new();
        encode_stream(&mut out, unsorted, &TestRecord::default(), &[]);
    }

    #[test]
    fn test_tu64_minimal_encoding() {
        assert!(encode_tu64(0).is_empty());
        assert_eq!(encode_tu64(1), hex!("01"));
        assert_eq!(encode_tu64(0x0100), hex!("0100"));
        assert_eq!(encode_tu64(u64::MAX), hex!("ffffffffffffffff"));

        assert_eq!(decode_tu64(&[]).expect("zero"), 0);
        assert_eq!(decode_tu64(&hex!("0100")).expect("decode"), 0x0100);
    }

    #[test]
    fn test_tu32_minimal_encoding() {
        assert!(encode_tu32(0).is_empty());
        assert_eq!(encode_tu32(0xffff_ffff), hex!("ffffffff"));
        assert_eq!(decode_tu32(&hex!("02")).expect("decode"), 2);
    }

    #[test]
    fn test_tu_rejects_leading_zero() {
        assert!(matches!(
            decode_tu64(&hex!("0001")).expect_err("must reject"),
            WireError::NonMinimalInt
        ));
    }

    #[test]
    fn test_tu_rejects_oversized() {
        assert!(matches!(
            decode_tu32(&hex!("0102030405")).expect_err("must reject"),
            WireError::IntTooWide { len: 5, max: 4 }
        ));
        assert!(matches!(
            decode_tu64(&hex!("010203040506070809")).expect_err("must reject"),
            WireError::IntTooWide { len: 9, max: 8 }
        ));
    }
}
