//! Adversarial Input Tests
//!
//! Hostile or corrupted buffers must be rejected with an error, never a
//! panic, an oversized allocation or a read outside the buffer:
//! - Record sizes that are too small, too large or overflow the offset range
//! - Lengths and counts larger than the input
//! - Inner spans that escape their enclosing record
//! - Arbitrary bytes against every schema type

use integration_tests::{init_logging, v2, Location};
use parcel_wire::{
    from_bytes, from_bytes_with_context, to_bytes, Parcel, WireContext, WireError, MAX_OFFSET,
};
use proptest::prelude::*;

#[test]
fn test_size_overflow_at_offset_100() {
    init_logging();

    let mut parcel = Parcel::new();
    parcel.write_raw(&[0u8; 100]).unwrap();
    parcel.write_i32(i32::MAX).unwrap();
    parcel.set_position(100).unwrap();

    assert_eq!(
        parcel.read::<v2::Profile>(),
        Err(WireError::SizeOverflow {
            start: 100,
            size: i32::MAX as usize,
        })
    );
}

#[test]
fn test_size_at_exact_limit_is_truncated_not_overflow() {
    let mut parcel = Parcel::new();
    parcel.write_i32(i32::MAX).unwrap();
    parcel.set_position(0).unwrap();
    assert_eq!(
        parcel.read::<v2::Profile>(),
        Err(WireError::Truncated {
            needed: MAX_OFFSET,
            remaining: 4,
        })
    );
}

#[test]
fn test_sizes_below_header() {
    for size in [i32::MIN, -4, -1, 0, 1, 2, 3] {
        let mut parcel = Parcel::new();
        parcel.write_i32(size).unwrap();
        parcel.write_raw(&[0u8; 16]).unwrap();
        parcel.set_position(0).unwrap();
        assert_eq!(parcel.read::<v2::Profile>(), Err(WireError::BadSize { size }));
    }
}

#[test]
fn test_truncated_header() {
    assert_eq!(
        from_bytes::<v2::Profile>(&[8, 0]),
        Err(WireError::Truncated {
            needed: 4,
            remaining: 2,
        })
    );
    assert_eq!(
        from_bytes::<v2::Profile>(&[]),
        Err(WireError::Truncated {
            needed: 4,
            remaining: 0,
        })
    );
}

#[test]
fn test_every_truncation_of_a_valid_record() {
    let mut profile = v2::Profile {
        id: 1,
        name: "truncate me".into(),
        nickname: Some("t".into()),
        ..v2::Profile::default()
    };
    profile.ext.set(Location::default()).unwrap();
    let bytes = to_bytes(&profile).unwrap();

    for cut in 0..bytes.len() {
        let result = from_bytes::<v2::Profile>(&bytes[..cut]);
        assert!(
            matches!(result, Err(WireError::Truncated { .. })),
            "cut at {} gave {:?}",
            cut,
            result
        );
    }
    assert_eq!(from_bytes::<v2::Profile>(&bytes).unwrap(), profile);
}

#[test]
fn test_inner_span_cannot_escape_outer_record() {
    // Message declares 12 bytes; the nested Profile inside claims 64
    let mut parcel = Parcel::new();
    parcel.write_i32(12).unwrap();
    parcel.write_i32(64).unwrap();
    parcel.write_raw(&[0u8; 96]).unwrap();
    parcel.set_position(0).unwrap();

    assert_eq!(
        parcel.read::<v2::Message>(),
        Err(WireError::Truncated {
            needed: 64,
            remaining: 8,
        })
    );
}

#[test]
fn test_string_length_beyond_input() {
    let mut parcel = Parcel::new();
    parcel.write_i32(16).unwrap();
    parcel.write_i32(1).unwrap();
    parcel.write_i32(1_000_000).unwrap();
    parcel.write_i32(0).unwrap();
    parcel.set_position(0).unwrap();

    assert!(matches!(
        parcel.read::<v2::Profile>(),
        Err(WireError::Truncated { .. })
    ));
}

#[test]
fn test_array_count_limits() {
    let mut parcel = Parcel::new();
    parcel.write_i32(i32::MAX).unwrap();
    parcel.set_position(0).unwrap();
    assert!(matches!(
        parcel.read::<Vec<v2::Profile>>(),
        Err(WireError::AllocationLimitExceeded { .. })
    ));

    let ctx = WireContext::new().with_max_array_elements(2);
    let bytes = to_bytes(&vec![1i32, 2, 3]).unwrap();
    assert_eq!(
        from_bytes_with_context::<Vec<i32>>(&bytes, ctx),
        Err(WireError::AllocationLimitExceeded {
            requested: 3,
            limit: 2,
        })
    );
}

#[test]
fn test_invalid_presence_and_stability() {
    // record header, id, name (empty), priority, nickname (null), scores (empty), ext presence 2
    let mut parcel = Parcel::new();
    parcel.write_i32(32).unwrap();
    parcel.write_i32(0).unwrap();
    parcel.write_string(Some("")).unwrap();
    parcel.write_i32(0).unwrap();
    parcel.write_i32(-1).unwrap();
    parcel.write_i32(0).unwrap();
    parcel.write_i32(2).unwrap();
    assert_eq!(parcel.len(), 32);
    parcel.set_position(0).unwrap();
    assert_eq!(parcel.read::<v2::Profile>(), Err(WireError::InvalidPresence(2)));
}

#[test]
fn test_bad_optional_record_presence() {
    let mut parcel = Parcel::new();
    parcel.write_i32(7).unwrap();
    parcel.set_position(0).unwrap();
    assert_eq!(
        parcel.read::<Option<Location>>(),
        Err(WireError::InvalidPresence(7))
    );
}

proptest! {
    #[test]
    fn arbitrary_bytes_never_panic(data in proptest::collection::vec(any::<u8>(), 0..512)) {
        let _ = from_bytes::<v2::Profile>(&data);
        let _ = from_bytes::<v2::Message>(&data);
        let _ = from_bytes::<Vec<v2::Payload>>(&data);
        if let Ok(profile) = from_bytes::<v2::Profile>(&data) {
            let _ = profile.ext.get::<Location>();
            let _ = profile.ext.descriptor();
        }
    }

    #[test]
    fn overflowing_sizes_always_rejected(start in 0usize..256, size in 4i32..=i32::MAX) {
        let mut parcel = Parcel::new();
        parcel.write_raw(&vec![0u8; start]).unwrap();
        parcel.write_i32(size).unwrap();
        parcel.set_position(start).unwrap();

        let result = parcel.read::<v2::Profile>();
        if start > MAX_OFFSET - size as usize {
            prop_assert_eq!(result, Err(WireError::SizeOverflow { start, size: size as usize }));
        } else {
            // only a bare header fits in the bytes that follow
            prop_assert_eq!(result.is_ok(), size == 4);
        }
    }

    #[test]
    fn corrupted_valid_records_never_panic(index in any::<prop::sample::Index>(), byte in any::<u8>()) {
        let profile = v2::Profile {
            id: 11,
            name: "corrupt".into(),
            scores: vec![1, 2],
            ..v2::Profile::default()
        };
        let mut bytes = to_bytes(&profile).unwrap().to_vec();
        let at = index.index(bytes.len());
        bytes[at] = byte;
        let _ = from_bytes::<v2::Profile>(&bytes);
    }
}
