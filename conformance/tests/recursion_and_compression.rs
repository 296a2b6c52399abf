use bitpacker::{compile_schema, compress, decode_to_json, decode_value, Message, WireError, MAX_DEPTH};
use bitpacker_conformance::{compressed, reference_world, tree, verify_world, WorldState, TREE_SCHEMA, WORLD_SCHEMA};

fn node(value: i32, children: Vec<tree::Node>) -> tree::Node {
    tree::Node {
        value,
        label: format!("n{}", value),
        weight: value as f64 * 0.25,
        children,
    }
}

fn depth(n: &tree::Node) -> usize {
    1 + n.children.iter().map(depth).max().unwrap_or(0)
}

#[test]
fn recursive_tree_round_trip() {
    let root = node(1, vec![
        node(2, vec![node(4, vec![node(8, vec![])]), node(5, vec![])]),
        node(3, vec![]),
    ]);
    assert_eq!(depth(&root), 4);

    let bytes = root.encode().unwrap();
    let back = tree::decode(&bytes).unwrap();
    assert_eq!(back, root);
    assert_eq!(back.children[0].children[0].children[0].label, "n8");

    let schema = compile_schema(TREE_SCHEMA, "tree").unwrap();
    let value = decode_value(&schema, &bytes, false).unwrap();
    assert_eq!(value.get("children").unwrap()[0].get("children").unwrap()[0].get("value").unwrap().as_int(), 4);
}

/// A `tree.buff` message whose every node has exactly one child, `levels` deep.
fn chain(levels: usize) -> Vec<u8> {
    let mut bytes = vec![5, b'1', b'.', b'0', b'.', b'0'];
    for _ in 0..levels - 1 {
        // value 0, empty label, weight 0, one child
        bytes.extend_from_slice(&[0, 0, 0, 2]);
    }
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes
}

#[test]
fn nesting_past_the_limit_is_rejected() {
    let fits = tree::decode(&chain(MAX_DEPTH)).unwrap();
    assert_eq!(depth(&fits), MAX_DEPTH);

    let hostile = chain(100_000);
    assert!(matches!(tree::decode(&hostile), Err(WireError::DepthLimit(MAX_DEPTH))));

    let schema = compile_schema(TREE_SCHEMA, "tree").unwrap();
    assert!(matches!(decode_value(&schema, &hostile, false), Err(WireError::DepthLimit(_))));
}

#[test]
fn compressed_messages_wrap_the_plain_encoding() {
    let plain = reference_world().encode().unwrap();

    let packed_world = compressed::WorldState::decode(&compress::deflate(&plain).unwrap()).unwrap();
    let packed = packed_world.encode().unwrap();
    assert_eq!(compress::inflate(&packed).unwrap(), plain);
    assert_eq!(compressed::decode(&packed).unwrap(), packed_world);
    assert_eq!(packed_world.guilds[0].members[0].position.z, 30);

    let schema = compile_schema(WORLD_SCHEMA, "world").unwrap();
    let json = decode_to_json(&schema, &packed, true).unwrap();
    assert!(json.contains("\"seed\": \"cross_lang_test\""), "{}", json);
}

#[test]
fn compression_mismatch_is_an_error() {
    let plain = reference_world().encode().unwrap();
    assert!(matches!(compressed::WorldState::decode(&plain), Err(WireError::Compression(_))));

    let packed = compress::deflate(&plain).unwrap();
    assert!(WorldState::decode(&packed).is_err());
    verify_world(&WorldState::decode(&compress::inflate(&packed).unwrap()).unwrap()).unwrap();
}
