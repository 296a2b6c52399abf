use proptest::prelude::*;
use bitpacker::{ByteBuffer, ByteBufferMut, Message, WireError, FLOAT_SCALE};
use bitpacker_conformance::{tree, Character, Item, Vec3};

fn item(id: i32, name: String, rarity: String) -> Item {
    Item { id, name, value: -id, weight: 0, rarity }
}

proptest! {
    #[test]
    fn ints_round_trip(x in any::<i32>(), y in any::<i32>(), z in any::<i32>()) {
        let v = Vec3 { x, y, z };
        prop_assert_eq!(Vec3::decode(&v.encode().unwrap()).unwrap(), v);
    }

    #[test]
    fn strings_round_trip(id in any::<i32>(), name in ".*", rarity in "[🍕é a-z]{0,8}") {
        let it = item(id, name, rarity);
        prop_assert_eq!(Item::decode(&it.encode().unwrap()).unwrap(), it);
    }

    #[test]
    fn bools_and_arrays_round_trip(alive in any::<bool>(), skills in prop::collection::vec(any::<i32>(), 0..32)) {
        let hero = Character { is_alive: alive, skills, ..Character::default() };
        prop_assert_eq!(Character::decode(&hero.encode().unwrap()).unwrap(), hero);
    }

    #[test]
    fn floats_stay_within_one_step(weight in -1.0e6f64..1.0e6) {
        let node = tree::Node { weight, ..tree::Node::default() };
        let back = tree::Node::decode(&node.encode().unwrap()).unwrap();
        prop_assert!((back.weight - weight).abs() < 1.0 / FLOAT_SCALE + 1e-9, "{} -> {}", weight, back.weight);
    }

    #[test]
    fn floats_on_the_grid_are_exact(sixteenths in -(1i64 << 40)..(1i64 << 40)) {
        let weight = sixteenths as f64 / 16.0;
        let node = tree::Node { weight, ..tree::Node::default() };
        prop_assert_eq!(tree::Node::decode(&node.encode().unwrap()).unwrap().weight, weight);
    }
}

#[test]
fn empty_and_multibyte_strings() {
    for name in ["", "a", "🍕", "naïve ☃ 雪"] {
        let it = item(7, name.to_string(), String::new());
        let bytes = it.encode().unwrap();
        assert_eq!(Item::decode(&bytes).unwrap(), it);
    }
}

#[test]
fn float_truncates_toward_zero() {
    for (weight, expected) in [(0.5, 0.5), (1.25, 1.25), (0.00019, 0.0001), (-0.00019, -0.0001), (2.0, 2.0)] {
        let node = tree::Node { weight, ..tree::Node::default() };
        assert_eq!(tree::Node::decode(&node.encode().unwrap()).unwrap().weight, expected);
    }
}

/// `Vec3` as seen by a runtime generated from a newer schema.
#[derive(Debug)]
struct Vec3V2(Vec3);

impl Message for Vec3V2 {
    const VERSION: &'static str = "2.0.0";

    fn encode_to(&self, bb: &mut ByteBufferMut) {
        self.0.encode_to(bb)
    }

    fn decode_from(bb: &mut ByteBuffer<'_>) -> Result<Self, WireError> {
        Vec3::decode_from(bb).map(Vec3V2)
    }
}

#[test]
fn version_mismatch_yields_no_value() {
    let bytes = Vec3 { x: 1, y: 2, z: 3 }.encode().unwrap();
    match Vec3V2::decode(&bytes) {
        Err(WireError::VersionMismatch { expected, found }) => {
            assert_eq!(expected, "2.0.0");
            assert_eq!(found, "1.0.0");
        }
        other => panic!("expected a version mismatch, got {:?}", other),
    }

    let newer = Vec3V2(Vec3 { x: 1, y: 2, z: 3 }).encode().unwrap();
    assert!(matches!(Vec3::decode(&newer), Err(WireError::VersionMismatch { .. })));
}

#[test]
fn nested_classes_carry_no_header() {
    let mut bb = ByteBufferMut::new();
    Vec3 { x: 1, y: -1, z: 0 }.encode_to(&mut bb);
    assert_eq!(bb.as_slice(), &[2, 1, 0]);
}
