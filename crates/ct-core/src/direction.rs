//! Canonical movement directions shared by the grid, agents, and topology.
//!
//! The enumeration order of [`Direction::ALL`] is part of the contract: the
//! greedy navigation policy breaks distance ties by it, and `DirectionSet`
//! iterates in it.

/// One of the 8 canonical movement directions.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    /// All directions in canonical enumeration order.
    pub const ALL: [Direction; 8] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    /// Unit movement vector `(dx, dy)`.
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up        => (0, 1),
            Direction::Down      => (0, -1),
            Direction::Left      => (-1, 0),
            Direction::Right     => (1, 0),
            Direction::UpLeft    => (-1, 1),
            Direction::UpRight   => (1, 1),
            Direction::DownLeft  => (-1, -1),
            Direction::DownRight => (1, -1),
        }
    }

    /// The direction pointing back the way this one came.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up        => Direction::Down,
            Direction::Down      => Direction::Up,
            Direction::Left      => Direction::Right,
            Direction::Right     => Direction::Left,
            Direction::UpLeft    => Direction::DownRight,
            Direction::UpRight   => Direction::DownLeft,
            Direction::DownLeft  => Direction::UpRight,
            Direction::DownRight => Direction::UpLeft,
        }
    }

    #[inline]
    pub fn is_diagonal(self) -> bool {
        !matches!(
            self,
            Direction::Up | Direction::Down | Direction::Left | Direction::Right
        )
    }

    /// Human-readable label, matching the topology JSON keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up        => "up",
            Direction::Down      => "down",
            Direction::Left      => "left",
            Direction::Right     => "right",
            Direction::UpLeft    => "up_left",
            Direction::UpRight   => "up_right",
            Direction::DownLeft  => "down_left",
            Direction::DownRight => "down_right",
        }
    }

    #[inline]
    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── DirectionSet ──────────────────────────────────────────────────────────────

/// A set of [`Direction`]s packed into one byte.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct DirectionSet(u8);

impl DirectionSet {
    pub const EMPTY: DirectionSet = DirectionSet(0);

    #[inline]
    pub fn contains(self, dir: Direction) -> bool {
        self.0 & dir.bit() != 0
    }

    #[inline]
    pub fn insert(&mut self, dir: Direction) {
        self.0 |= dir.bit();
    }

    #[inline]
    pub fn remove(&mut self, dir: Direction) {
        self.0 &= !dir.bit();
    }

    /// Copy of `self` without `dir`.
    #[inline]
    pub fn without(mut self, dir: Direction) -> DirectionSet {
        self.remove(dir);
        self
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members in canonical enumeration order.
    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |d| self.contains(*d))
    }
}

impl FromIterator<Direction> for DirectionSet {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        let mut set = DirectionSet::EMPTY;
        for d in iter {
            set.insert(d);
        }
        set
    }
}

impl std::fmt::Debug for DirectionSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
