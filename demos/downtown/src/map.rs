//! The built-in downtown map.
//!
//! A 12×12 block: a one-way ring road around the edge, two two-lane avenues
//! crossing in the middle, sixteen parking bays tucked off the streets, one
//! signalised junction and one congestion watch.
//!
//! ```text
//!  y
//! 11  ←  ←  ←  ←  ←  ↓  ↑  ←  ←  ←  ←  ←
//! 10  ↓  #  #  P  #  ↓  ↑  #  #  P  #  ↑
//!  9  ↓  P  #  #  P  ↓  ↑  P  #  #  #  ↑
//!  8  ↓  #  #  #  #  ↓  ↑  #  #  #  P  ↑
//!  7  ↓  #  P  #  #  L  ↑  #  #  P  #  ↑
//!  6  →  →  →  →  L  →  →  →  →  →  →  ↑
//!  5  ↓  ←  ←  ←  ←  ←  ←  L  ←  ←  ←  ←
//!  4  ↓  #  P  #  #  ↓  L  #  #  P  #  ↑
//!  3  ↓  P  #  #  #  ↓  ↑  #  #  #  #  ↑
//!  2  ↓  #  #  #  P  ↓  ↑  P  #  #  P  ↑
//!  1  ↓  #  P  #  #  ↓  ↑  #  P  #  #  ↑
//!  0  →  →  →  →  →  →  →  →  →  →  →  ↑
//!     0  1  2  3  4  5  6  7  8  9  10 11  x
//! ```
//!
//! `L` cells carry the junction's lights: group `east_west` on (7,5) and
//! (4,6), group `north_south` on (5,7) and (6,4).

use ct_core::{Coord, Direction};
use ct_grid::{DirectionLists, LightDef, TopologyConfig, WatchDef};

pub const SIZE: i32 = 12;

/// Street rows and columns.
const STREET_ROWS: [i32; 4] = [0, 5, 6, SIZE - 1];
const STREET_COLS: [i32; 4] = [0, 5, 6, SIZE - 1];

/// `(bay, street cell it opens onto, direction from the street into the bay)`.
const BAYS: [((i32, i32), (i32, i32), Direction); 16] = [
    // ring
    ((2, 1), (2, 0), Direction::Up),
    ((8, 1), (8, 0), Direction::Up),
    ((10, 2), (11, 2), Direction::Left),
    ((10, 8), (11, 8), Direction::Left),
    ((3, 10), (3, 11), Direction::Down),
    ((9, 10), (9, 11), Direction::Down),
    ((1, 3), (0, 3), Direction::Right),
    ((1, 9), (0, 9), Direction::Right),
    // avenues
    ((2, 4), (2, 5), Direction::Down),
    ((9, 4), (9, 5), Direction::Down),
    ((2, 7), (2, 6), Direction::Up),
    ((9, 7), (9, 6), Direction::Up),
    ((4, 2), (5, 2), Direction::Left),
    ((4, 9), (5, 9), Direction::Left),
    ((7, 2), (6, 2), Direction::Right),
    ((7, 9), (6, 9), Direction::Right),
];

fn c(x: i32, y: i32) -> Coord {
    Coord::new(x, y)
}

fn is_street(p: Coord) -> bool {
    STREET_ROWS.contains(&p.y) || STREET_COLS.contains(&p.x)
}

/// Traffic flow along each street.
fn street_flow(directions: &mut DirectionLists) {
    for i in 0..SIZE {
        directions.right.push(c(i, 0));
        directions.up.push(c(SIZE - 1, i));
        directions.left.push(c(i, SIZE - 1));
        directions.down.push(c(0, i));

        directions.left.push(c(i, 5));
        directions.right.push(c(i, 6));
        directions.down.push(c(5, i));
        directions.up.push(c(6, i));
    }
}

pub fn downtown() -> TopologyConfig {
    let bays: Vec<Coord> = BAYS.iter().map(|&((x, y), _, _)| c(x, y)).collect();

    let buildings = (0..SIZE)
        .flat_map(|y| (0..SIZE).map(move |x| c(x, y)))
        .filter(|&p| !is_street(p) && !bays.contains(&p))
        .collect();

    let mut directions = DirectionLists::default();
    street_flow(&mut directions);
    for &((bx, by), (sx, sy), into) in &BAYS {
        directions.get_mut(into).push(c(sx, sy));
        directions.get_mut(into.opposite()).push(c(bx, by));
    }

    TopologyConfig {
        width: SIZE as u32,
        height: SIZE as u32,
        buildings,
        parking: bays,
        traffic_lights: vec![
            LightDef {
                lanes:     vec![c(7, 5), c(4, 6)],
                monitored: vec![c(7, 5), c(8, 5), c(4, 6), c(3, 6)],
                group:     Some("east_west".into()),
                ..LightDef::default()
            },
            LightDef {
                lanes:     vec![c(5, 7), c(6, 4)],
                monitored: vec![c(5, 7), c(5, 8), c(6, 4), c(6, 3)],
                group:     Some("north_south".into()),
                ..LightDef::default()
            },
        ],
        directions,
        // Keep cars off the southbound avenue while it backs up.
        congestion_watches: vec![WatchDef {
            cell:      c(5, SIZE - 1),
            direction: Direction::Down,
            area:      (7..SIZE - 1).map(|y| c(5, y)).collect(),
            threshold: 2,
        }],
    }
}
