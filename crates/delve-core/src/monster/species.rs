//! Monster species table
//!
//! Base statistics, behaviour and the floors each species appears on.

use super::AiType;

/// Static description of a monster species
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Species {
    pub name: &'static str,
    pub symbol: char,
    pub description: &'static str,
    pub hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
    /// Experience for killing one
    pub exp: i32,
    pub ai: AiType,
    pub sight_range: i32,
    /// First floor it appears on
    pub min_floor: i32,
    /// Last floor it appears on
    pub max_floor: i32,
    /// Relative spawn frequency
    pub weight: f32,
}

impl Species {
    pub fn appears_on(&self, floor: i32) -> bool {
        (self.min_floor..=self.max_floor).contains(&floor)
    }
}

pub static SPECIES: &[Species] = &[
    // Shallow floors
    Species {
        name: "rat",
        symbol: 'r',
        description: "a quick little rodent",
        hp: 4,
        attack: 1,
        defense: 0,
        speed: 120,
        exp: 5,
        ai: AiType::Wander,
        sight_range: 4,
        min_floor: 1,
        max_floor: 4,
        weight: 1.5,
    },
    Species {
        name: "bat",
        symbol: 'B',
        description: "a flapping creature of the dark",
        hp: 3,
        attack: 1,
        defense: 0,
        speed: 150,
        exp: 3,
        ai: AiType::Wander,
        sight_range: 6,
        min_floor: 1,
        max_floor: 5,
        weight: 1.2,
    },
    Species {
        name: "goblin",
        symbol: 'g',
        description: "a small and spiteful humanoid",
        hp: 8,
        attack: 2,
        defense: 1,
        speed: 100,
        exp: 10,
        ai: AiType::Hostile,
        sight_range: 6,
        min_floor: 1,
        max_floor: 5,
        weight: 1.0,
    },
    Species {
        name: "kobold",
        symbol: 'k',
        description: "a cowardly reptilian scavenger",
        hp: 6,
        attack: 2,
        defense: 0,
        speed: 110,
        exp: 8,
        ai: AiType::Hostile,
        sight_range: 5,
        min_floor: 1,
        max_floor: 4,
        weight: 0.8,
    },
    // Middle floors
    Species {
        name: "orc",
        symbol: 'o',
        description: "a savage warrior",
        hp: 15,
        attack: 4,
        defense: 2,
        speed: 90,
        exp: 25,
        ai: AiType::Hostile,
        sight_range: 6,
        min_floor: 3,
        max_floor: 7,
        weight: 1.0,
    },
    Species {
        name: "skeleton",
        symbol: 's',
        description: "a walking heap of bones",
        hp: 10,
        attack: 3,
        defense: 3,
        speed: 80,
        exp: 20,
        ai: AiType::Hostile,
        sight_range: 5,
        min_floor: 3,
        max_floor: 8,
        weight: 1.0,
    },
    Species {
        name: "zombie",
        symbol: 'Z',
        description: "a rotting corpse that will not lie still",
        hp: 20,
        attack: 3,
        defense: 1,
        speed: 60,
        exp: 22,
        ai: AiType::Hostile,
        sight_range: 4,
        min_floor: 3,
        max_floor: 7,
        weight: 0.8,
    },
    Species {
        name: "snake",
        symbol: 'S',
        description: "a venomous serpent",
        hp: 8,
        attack: 4,
        defense: 0,
        speed: 130,
        exp: 18,
        ai: AiType::Hostile,
        sight_range: 5,
        min_floor: 2,
        max_floor: 6,
        weight: 0.6,
    },
    // Deep floors
    Species {
        name: "troll",
        symbol: 'T',
        description: "a regenerating giant",
        hp: 40,
        attack: 6,
        defense: 3,
        speed: 70,
        exp: 60,
        ai: AiType::Hostile,
        sight_range: 5,
        min_floor: 6,
        max_floor: 10,
        weight: 0.7,
    },
    Species {
        name: "ogre",
        symbol: 'O',
        description: "a huge man-eater",
        hp: 35,
        attack: 8,
        defense: 2,
        speed: 80,
        exp: 55,
        ai: AiType::Hostile,
        sight_range: 4,
        min_floor: 5,
        max_floor: 9,
        weight: 0.6,
    },
    Species {
        name: "wraith",
        symbol: 'W',
        description: "a spirit without a body",
        hp: 25,
        attack: 5,
        defense: 5,
        speed: 100,
        exp: 50,
        ai: AiType::Hostile,
        sight_range: 8,
        min_floor: 7,
        max_floor: 10,
        weight: 0.4,
    },
    Species {
        name: "dragon",
        symbol: 'D',
        description: "a dread wyrm",
        hp: 60,
        attack: 10,
        defense: 5,
        speed: 90,
        exp: 150,
        ai: AiType::Hostile,
        sight_range: 10,
        min_floor: 9,
        max_floor: 10,
        weight: 0.2,
    },
];

/// Species that can appear on `floor`, in table order
pub fn species_for_floor(floor: i32) -> Vec<&'static Species> {
    SPECIES.iter().filter(|s| s.appears_on(floor)).collect()
}

/// Look up a species by name, ignoring case
pub fn find_species(name: &str) -> Option<&'static Species> {
    SPECIES.iter().find(|s| s.name.eq_ignore_ascii_case(name))
}
