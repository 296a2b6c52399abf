use bitpacker::{compile_schema, decode_value, encode_value, Message, Value, WireError};
use bitpacker_conformance::*;

/// The reference world as written by every runtime, byte for byte.
const GOLDEN: [u8; 142] = [
    5, 49, 46, 48, 46, 48, 84, 15, 99, 114, 111, 115, 115, 95, 108, 97, 110, 103, 95, 116, 101,
    115, 116, 2, 9, 84, 101, 115, 116, 71, 117, 105, 108, 100, 31, 65, 32, 116, 101, 115, 116, 32,
    103, 117, 105, 108, 100, 32, 102, 111, 114, 32, 99, 114, 111, 115, 115, 45, 108, 97, 110, 103,
    117, 97, 103, 101, 2, 8, 84, 101, 115, 116, 72, 101, 114, 111, 198, 1, 208, 15, 232, 7, 1, 20,
    39, 60, 8, 2, 4, 6, 200, 1, 2, 2, 9, 69, 120, 99, 97, 108, 105, 98, 117, 114, 158, 156, 1, 30,
    9, 76, 101, 103, 101, 110, 100, 97, 114, 121, 2, 4, 12, 72, 101, 97, 108, 116, 104, 80, 111,
    116, 105, 111, 110, 100, 2, 6, 67, 111, 109, 109, 111, 110,
];

#[test]
fn typed_encoder_matches_golden_bytes() {
    assert_eq!(VERSION, "1.0.0");
    assert_eq!(reference_world().encode().unwrap(), GOLDEN);
}

#[test]
fn typed_decoder_reproduces_every_field() {
    let world = WorldState::decode(&GOLDEN).unwrap();
    verify_world(&world).unwrap();
    assert_eq!(world, reference_world());
    assert_eq!(decode(&GOLDEN).unwrap(), world);
}

#[test]
fn dynamic_codec_matches_typed_codec() {
    let schema = compile_schema(WORLD_SCHEMA, "world").unwrap();
    let value = decode_value(&schema, &GOLDEN, false).unwrap();

    assert_eq!(value.get("worldId").unwrap().as_int(), 42);
    assert_eq!(value.get("seed").unwrap().as_string(), "cross_lang_test");
    let hero = &value.get("guilds").unwrap()[0].get("members").unwrap()[0];
    assert!(hero.get("isAlive").unwrap().as_bool());
    assert_eq!(hero.get("position").unwrap().get("y").unwrap().as_int(), -20);
    let skills: Vec<i32> = hero.get("skills").unwrap().as_array().iter().map(Value::as_int).collect();
    assert_eq!(skills, vec![1, 2, 3, 100]);

    assert_eq!(encode_value(&schema, &value, false).unwrap(), GOLDEN);
}

#[test]
fn json_views_agree() {
    let schema = compile_schema(WORLD_SCHEMA, "world").unwrap();
    let dynamic = serde_json::to_value(decode_value(&schema, &GOLDEN, false).unwrap()).unwrap();
    let typed = serde_json::to_value(reference_world()).unwrap();
    assert_eq!(dynamic, typed);
    assert_eq!(typed["lootTable"][0]["rarity"], "Common");

    let from_json: WorldState = serde_json::from_value(typed).unwrap();
    assert_eq!(from_json, reference_world());
}

#[test]
fn every_truncation_underflows() {
    let schema = compile_schema(WORLD_SCHEMA, "world").unwrap();
    for cut in 0..GOLDEN.len() {
        let prefix = &GOLDEN[..cut];
        match WorldState::decode(prefix) {
            Err(WireError::BufferUnderflow { .. }) => {}
            other => panic!("prefix of {} bytes: expected underflow, got {:?}", cut, other),
        }
        let err = decode_value(&schema, prefix, false).unwrap_err();
        assert!(err.is_underflow(), "prefix of {} bytes: {:?}", cut, err);
    }
}

#[test]
fn trailing_bytes_are_ignored() {
    let mut bytes = GOLDEN.to_vec();
    bytes.extend_from_slice(&[0xff, 0x00]);
    verify_world(&WorldState::decode(&bytes).unwrap()).unwrap();
}
