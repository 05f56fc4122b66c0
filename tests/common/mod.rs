#![allow(dead_code)]

use std::path::PathBuf;

use pokefinder::data::{
    IndexSet, LearnMethod, LearnMethods, PokemonRecord, Quintiles, Stat, StatRecord, TypeMatchup,
};
use pokefinder::QueryEngine;

/// (defender, double_damage_from, half_damage_from, no_damage_from)
const DEFENSIVE_CHART: &[(&str, &[&str], &[&str], &[&str])] = &[
    ("normal", &["fighting"], &[], &["ghost"]),
    ("fire", &["water", "ground", "rock"], &["fire", "grass", "ice", "bug", "steel", "fairy"], &[]),
    ("water", &["electric", "grass"], &["fire", "water", "ice", "steel"], &[]),
    ("electric", &["ground"], &["electric", "flying", "steel"], &[]),
    ("grass", &["fire", "ice", "poison", "flying", "bug"], &["water", "electric", "grass", "ground"], &[]),
    ("ice", &["fire", "fighting", "rock", "steel"], &["ice"], &[]),
    ("fighting", &["flying", "psychic", "fairy"], &["bug", "rock", "dark"], &[]),
    ("poison", &["ground", "psychic"], &["grass", "fighting", "poison", "bug", "fairy"], &[]),
    ("ground", &["water", "grass", "ice"], &["poison", "rock"], &["electric"]),
    ("flying", &["electric", "ice", "rock"], &["grass", "fighting", "bug"], &["ground"]),
    ("psychic", &["bug", "ghost", "dark"], &["fighting", "psychic"], &[]),
    ("bug", &["fire", "flying", "rock"], &["grass", "fighting", "ground"], &[]),
    ("rock", &["water", "grass", "fighting", "ground", "steel"], &["normal", "fire", "poison", "flying"], &[]),
    ("ghost", &["ghost", "dark"], &["poison", "bug"], &["normal", "fighting"]),
    ("dragon", &["ice", "dragon", "fairy"], &["fire", "water", "electric", "grass"], &[]),
    ("dark", &["fighting", "bug", "fairy"], &["ghost", "dark"], &["psychic"]),
    (
        "steel",
        &["fire", "fighting", "ground"],
        &["normal", "grass", "ice", "flying", "psychic", "bug", "rock", "dragon", "steel", "fairy"],
        &["poison"],
    ),
    ("fairy", &["poison", "steel"], &["fighting", "bug", "dark"], &["dragon"]),
];

#[derive(Clone, Copy)]
pub enum Class {
    Regular,
    Legendary,
    Mythical,
    UltraBeast,
}

/// (name, types, class, [hp, atk, def, spa, spd, spe])
const ROSTER: &[(&str, &str, Class, [u32; 6])] = &[
    ("charmander", "fire", Class::Regular, [39, 52, 43, 60, 50, 65]),
    ("charizard", "fire/flying", Class::Regular, [78, 84, 78, 109, 85, 100]),
    ("moltres", "fire/flying", Class::Legendary, [90, 100, 90, 125, 85, 90]),
    ("squirtle", "water", Class::Regular, [44, 48, 65, 50, 64, 43]),
    ("gastly", "ghost/poison", Class::Regular, [30, 35, 30, 100, 35, 80]),
    ("gengar", "ghost/poison", Class::Regular, [60, 65, 60, 130, 75, 110]),
    ("drowzee", "psychic", Class::Regular, [60, 48, 45, 43, 90, 42]),
    ("hypno", "psychic", Class::Regular, [85, 73, 70, 73, 115, 67]),
    ("exeggcute", "grass/psychic", Class::Regular, [60, 40, 80, 60, 45, 40]),
    ("mewtwo", "psychic", Class::Legendary, [106, 110, 90, 154, 90, 130]),
    ("mew", "psychic", Class::Mythical, [100, 100, 100, 100, 100, 100]),
    ("articuno", "ice/flying", Class::Legendary, [90, 85, 100, 95, 125, 85]),
    ("darkrai", "dark", Class::Mythical, [70, 90, 90, 135, 90, 125]),
    ("nihilego", "rock/poison", Class::UltraBeast, [109, 53, 47, 127, 131, 103]),
    ("snorlax", "normal", Class::Regular, [160, 110, 65, 65, 110, 30]),
    ("machamp", "fighting", Class::Regular, [90, 130, 80, 65, 85, 55]),
    ("scyther", "bug/flying", Class::Regular, [70, 110, 80, 55, 80, 105]),
    ("dragonite", "dragon/flying", Class::Regular, [91, 134, 95, 100, 100, 80]),
];

fn record(name: &str, types: &str, class: Class, number: u32) -> PokemonRecord {
    PokemonRecord {
        name: name.to_string(),
        display_name: format!("{}{}", name[..1].to_uppercase(), &name[1..]),
        number,
        height: 1.0,
        weight: 10.0,
        sprite_url: format!("https://example.test/sprites/{number}.png"),
        description: format!("{name} fixture entry"),
        genus: "Fixture Pokémon".to_string(),
        type_display: types.to_string(),
        is_legendary: matches!(class, Class::Legendary),
        is_mythical: matches!(class, Class::Mythical),
        is_ultra_beast: matches!(class, Class::UltraBeast),
    }
}

fn learn(indexes: &mut IndexSet, move_name: &str, pokemon: &str, method: LearnMethod) {
    indexes
        .moves
        .entry(move_name.to_string())
        .or_default()
        .entry(pokemon.to_string())
        .or_insert_with(LearnMethods::new)
        .push(method);
}

pub fn fixture_indexes() -> IndexSet {
    let mut indexes = IndexSet::default();

    for (number, (name, types, class, base)) in ROSTER.iter().enumerate() {
        let record = record(name, types, *class, number as u32 + 1);
        for type_name in record.types() {
            indexes
                .types
                .entry(type_name)
                .or_default()
                .insert(name.to_string());
        }
        indexes.pokemon.insert(name.to_string(), record);
        indexes.stats.insert(
            name.to_string(),
            StatRecord {
                hp: base[0],
                attack: base[1],
                defense: base[2],
                special_attack: base[3],
                special_defense: base[4],
                speed: base[5],
            },
        );
    }

    for name in ["gastly", "gengar", "drowzee", "hypno"] {
        learn(&mut indexes, "hypnosis", name, LearnMethod::LevelUp(1));
    }
    learn(&mut indexes, "hypnosis", "exeggcute", LearnMethod::Egg);
    learn(&mut indexes, "hypnosis", "darkrai", LearnMethod::LevelUp(20));
    learn(&mut indexes, "hypnosis", "mew", LearnMethod::Tutor);
    learn(&mut indexes, "hypnosis", "nihilego", LearnMethod::Tutor);

    learn(&mut indexes, "flamethrower", "charmander", LearnMethod::LevelUp(38));
    learn(&mut indexes, "flamethrower", "charizard", LearnMethod::LevelUp(46));
    learn(&mut indexes, "flamethrower", "charizard", LearnMethod::Machine);
    learn(&mut indexes, "flamethrower", "moltres", LearnMethod::Machine);

    learn(&mut indexes, "sky-attack", "moltres", LearnMethod::Machine);
    learn(&mut indexes, "sky-attack", "articuno", LearnMethod::Machine);

    indexes
        .machine_moves
        .insert("flamethrower".to_string(), "tm35".to_string());

    let spreads = [
        (Stat::Hp, [45, 60, 70, 85, 255], 65),
        (Stat::Attack, [50, 65, 80, 100, 190], 75),
        (Stat::Defense, [50, 60, 75, 90, 230], 70),
        (Stat::SpecialAttack, [45, 60, 75, 95, 194], 65),
        (Stat::SpecialDefense, [50, 60, 75, 90, 230], 70),
        (Stat::Speed, [40, 55, 70, 90, 200], 65),
    ];
    for (stat, q, median) in spreads {
        indexes.stat_spread.medians.insert(stat, median);
        indexes.stat_spread.quintiles.insert(
            stat,
            Quintiles {
                p20: q[0],
                p40: q[1],
                p60: q[2],
                p80: q[3],
                p100: q[4],
            },
        );
    }

    let set = |names: &[&str]| names.iter().map(|n| n.to_string()).collect();
    for (defender, double, half, none) in DEFENSIVE_CHART {
        indexes.type_matchups.insert(
            defender.to_string(),
            TypeMatchup {
                double_damage_from: set(double),
                half_damage_from: set(half),
                no_damage_from: set(none),
            },
        );
    }

    indexes
}

pub fn fixture_engine() -> QueryEngine {
    QueryEngine::new(fixture_indexes()).expect("fixture indexes are complete")
}

pub fn sample_dataset_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/fixtures/sample")
}
