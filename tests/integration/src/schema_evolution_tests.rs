//! Schema Evolution Tests
//!
//! Peers built from different versions of the same schema:
//! - Newer readers default fields an older writer did not send
//! - Older readers skip fields they do not know
//! - Unknown union variants are rejected, unknown enumerators kept
//! - Nested and repeated records stay aligned across versions

use integration_tests::{init_logging, relay, v1, v2, Annotation, Location};
use parcel_wire::{from_bytes, to_bytes, Descriptor, Parcel, Stability, WireError};

fn sample_v1() -> v1::Profile {
    v1::Profile {
        id: 42,
        name: "ada".into(),
        priority: v1::Priority::HIGH,
    }
}

fn sample_v2() -> v2::Profile {
    v2::Profile {
        id: 7,
        name: "grace".into(),
        priority: v2::Priority::URGENT,
        nickname: Some("amazing".into()),
        scores: vec![3, 1, 4, 1, 5],
        ..v2::Profile::default()
    }
}

#[test]
fn test_new_reader_old_writer() {
    init_logging();

    let bytes = to_bytes(&sample_v1()).unwrap();
    let mut parcel = Parcel::from_bytes(&bytes);
    let decoded = parcel.read::<v2::Profile>().unwrap();

    assert_eq!(decoded.id, 42);
    assert_eq!(decoded.name, "ada");
    assert_eq!(decoded.priority, v2::Priority::HIGH);
    assert_eq!(decoded.nickname, None);
    assert_eq!(decoded.scores, vec![100]);
    assert!(!decoded.ext.is_set());
    assert_eq!(decoded.ext.stability(), Stability::Vintf);
    assert_eq!(parcel.position(), bytes.len());
}

#[test]
fn test_old_reader_new_writer() {
    init_logging();

    let mut parcel = Parcel::new();
    parcel.write(&sample_v2()).unwrap();
    let declared = parcel.len();
    parcel.write_i32(-5).unwrap();
    parcel.set_position(0).unwrap();

    let decoded = parcel.read::<v1::Profile>().unwrap();
    assert_eq!(decoded.id, 7);
    assert_eq!(decoded.name, "grace");
    // the enumerator is unknown to v1 but survives
    assert_eq!(decoded.priority, v1::Priority(2));
    assert!(!decoded.priority.is_known());
    assert_eq!(parcel.position(), declared);
    assert_eq!(parcel.read_i32().unwrap(), -5);
}

#[test]
fn test_old_reader_skips_populated_extension() {
    let mut profile = sample_v2();
    profile
        .ext
        .set(Location {
            lat: 52.5,
            lon: 13.4,
            label: Some("berlin".into()),
        })
        .unwrap();

    let bytes = to_bytes(&profile).unwrap();
    let decoded = from_bytes::<v1::Profile>(&bytes).unwrap();
    assert_eq!(decoded.id, 7);
}

#[test]
fn test_nested_records_across_versions() {
    let message = v2::Message {
        profile: sample_v2(),
        payload: v2::Payload::Text("hello".into()),
        sequence: 1 << 33,
        checksum: 0x0BAD_F00D,
    };

    let mut parcel = Parcel::new();
    parcel.write(&message).unwrap();
    parcel.write(&message).unwrap();
    parcel.set_position(0).unwrap();

    for _ in 0..2 {
        let old = parcel.read::<v1::Message>().unwrap();
        assert_eq!(old.profile.name, "grace");
        assert_eq!(old.payload, v1::Payload::Text("hello".into()));
        assert_eq!(old.sequence, 1 << 33);
    }
    assert!(!parcel.has_more_data());
}

#[test]
fn test_arrays_of_newer_records() {
    let profiles = vec![sample_v2(), v2::Profile::default(), sample_v2()];
    let bytes = to_bytes(&profiles).unwrap();

    let old = from_bytes::<Vec<v1::Profile>>(&bytes).unwrap();
    assert_eq!(old.len(), 3);
    assert_eq!(old[0].id, 7);
    assert_eq!(old[1], v1::Profile::default());
    assert_eq!(old[2].name, "grace");
}

#[test]
fn test_unknown_union_variant() {
    let bytes = to_bytes(&v2::Payload::Numbers(vec![1, 2, 3])).unwrap();

    let mut parcel = Parcel::from_bytes(&bytes);
    let err = parcel.read::<v1::Payload>().unwrap_err();
    assert_eq!(
        err,
        WireError::UnknownVariant {
            type_name: v1::Payload::DESCRIPTOR,
            tag: v2::PayloadTag::Numbers.raw(),
        }
    );
    assert_eq!(parcel.position(), 4);
}

#[test]
fn test_unknown_union_variant_inside_record() {
    let message = v2::Message {
        payload: v2::Payload::Numbers(vec![9]),
        ..v2::Message::default()
    };
    let bytes = to_bytes(&message).unwrap();
    assert!(matches!(
        from_bytes::<v1::Message>(&bytes),
        Err(WireError::UnknownVariant { tag: 2, .. })
    ));
}

#[test]
fn test_shared_variants_decode_across_versions() {
    let bytes = to_bytes(&v1::Payload::Code(-3)).unwrap();
    assert_eq!(from_bytes::<v2::Payload>(&bytes).unwrap(), v2::Payload::Code(-3));
    assert_eq!(v2::Payload::default(), v2::Payload::Code(0));
}

#[test]
fn test_relay_preserves_unknown_enumerator() {
    let bytes = to_bytes(&v2::Priority::URGENT).unwrap();
    let relayed = relay::<v1::Priority>(&bytes).unwrap();
    assert_eq!(relayed, bytes);
}

#[test]
fn test_same_version_relay_is_byte_identical() {
    let mut profile = sample_v2();
    profile.ext.set(Location::default()).unwrap();
    let bytes = to_bytes(&profile).unwrap();
    assert_eq!(relay::<v2::Profile>(&bytes).unwrap(), bytes);

    let message = v1::Message {
        profile: sample_v1(),
        payload: v1::Payload::Code(1),
        sequence: -1,
    };
    let bytes = to_bytes(&message).unwrap();
    assert_eq!(relay::<v1::Message>(&bytes).unwrap(), bytes);
}

#[test]
fn test_local_extension_in_local_record() {
    // v2 slots are declared stable, so a local value needs a local slot
    let mut profile = sample_v2();
    assert!(matches!(
        profile.ext.set(Annotation::default()),
        Err(WireError::StabilityViolation { .. })
    ));
    profile.ext = parcel_wire::ExtensionSlot::new(Stability::Local);
    profile.ext.set(Annotation { text: "note".into() }).unwrap();

    let decoded = from_bytes::<v2::Profile>(&to_bytes(&profile).unwrap()).unwrap();
    assert_eq!(decoded.ext.stability(), Stability::Local);
    assert_eq!(decoded.ext.get::<Annotation>().unwrap().unwrap().text, "note");
}
