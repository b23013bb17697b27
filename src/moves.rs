use super::vec2::Vec2;

pub type Move = Vec2;

pub const STAY: Move = Vec2::new(0, 0);

/// 4-neighbourhood in enumeration order. Ties between equally good moves resolve to the
/// earliest entry.
pub const MOVES_4: [Move; 4] = [
    Vec2::new(1, 0),
    Vec2::new(-1, 0),
    Vec2::new(0, 1),
    Vec2::new(0, -1),
];

pub const MOVES_4_STAY: [Move; 5] = [
    Vec2::new(1, 0),
    Vec2::new(-1, 0),
    Vec2::new(0, 1),
    Vec2::new(0, -1),
    STAY,
];

pub fn legal_moves(allow_stay: bool) -> &'static [Move] {
    if allow_stay {
        &MOVES_4_STAY
    } else {
        &MOVES_4
    }
}

/// Whether `to` is reachable from `from` with one entry of the move table.
pub fn is_legal_step(from: Vec2, to: Vec2, allow_stay: bool) -> bool {
    legal_moves(allow_stay).contains(&(to - from))
}
