//! Types generated at build time from the schemas in `schema/`, plus the
//! reference values every language's conformance run encodes.

include!(concat!(env!("OUT_DIR"), "/plain/world_state.rs"));

/// The reference world, generated with compression enabled.
pub mod compressed {
    include!(concat!(env!("OUT_DIR"), "/packed/world_state.rs"));
    pub use self::packed::*;
}

/// A self-referencing schema, generated as separate struct and impl files.
pub mod tree {
    pub mod node_structs {
        include!(concat!(env!("OUT_DIR"), "/split/node_structs.rs"));
    }
    pub mod node_impl {
        include!(concat!(env!("OUT_DIR"), "/split/node_impl.rs"));
    }
    pub use self::node_impl::decode;
    pub use self::node_structs::*;
}

pub const WORLD_SCHEMA: &str = include_str!("../schema/world.buff");
pub const TREE_SCHEMA: &str = include_str!("../schema/tree.buff");

/// The reference message shared with the other language runtimes.
pub fn reference_world() -> WorldState {
    WorldState {
        world_id: 42,
        seed: "cross_lang_test".to_string(),
        guilds: vec![Guild {
            name: "TestGuild".to_string(),
            description: "A test guild for cross-language".to_string(),
            members: vec![Character {
                name: "TestHero".to_string(),
                level: 99,
                hp: 1000,
                mp: 500,
                is_alive: true,
                position: Vec3 { x: 10, y: -20, z: 30 },
                skills: vec![1, 2, 3, 100],
                inventory: vec![Item {
                    id: 1,
                    name: "Excalibur".to_string(),
                    value: 9999,
                    weight: 15,
                    rarity: "Legendary".to_string(),
                }],
            }],
        }],
        loot_table: vec![Item {
            id: 2,
            name: "HealthPotion".to_string(),
            value: 50,
            weight: 1,
            rarity: "Common".to_string(),
        }],
    }
}

/// Checks a decoded reference world field by field, naming the first field
/// that differs.
pub fn verify_world(world: &WorldState) -> Result<(), String> {
    let expected = reference_world();
    let check = |ok: bool, field: &str| if ok { Ok(()) } else { Err(format!("{} differs", field)) };

    check(world.world_id == expected.world_id, "worldId")?;
    check(world.seed == expected.seed, "seed")?;
    check(world.guilds.len() == 1, "guilds")?;
    check(world.loot_table == expected.loot_table, "lootTable")?;

    let (guild, want) = (&world.guilds[0], &expected.guilds[0]);
    check(guild.name == want.name, "guilds[0].name")?;
    check(guild.description == want.description, "guilds[0].description")?;
    check(guild.members.len() == 1, "guilds[0].members")?;

    let (hero, want) = (&guild.members[0], &want.members[0]);
    check(hero.name == want.name, "hero.name")?;
    check(hero.level == want.level, "hero.level")?;
    check(hero.hp == want.hp, "hero.hp")?;
    check(hero.mp == want.mp, "hero.mp")?;
    check(hero.is_alive == want.is_alive, "hero.isAlive")?;
    check(hero.position == want.position, "hero.position")?;
    check(hero.skills == want.skills, "hero.skills")?;
    check(hero.inventory == want.inventory, "hero.inventory")?;
    Ok(())
}
