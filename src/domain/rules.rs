/// Move rules: where a pawn goes after its answer is judged.
///
/// Pure functions, no side effects. They compute the step; the controller
/// applies it to the board.
///
/// ## Correct answer
/// Straight up one row: `(delta_row, delta_col) = (1, 0)`.
///
/// ## Wrong answer: sideways step on the hex grid
///
///   delta_col = ((1 + column - player) mod 2) * 2 - 1     (Euclidean mod)
///   delta_row = 1  if delta_col + player == 1 || delta_col - player == -2
///               0  otherwise
///
/// ### Truth table (player, column parity)
/// ┌────────┬──────────────┬───────────┬───────────┐
/// │ Player │ Column       │ delta_col │ delta_row │
/// ├────────┼──────────────┼───────────┼───────────┤
/// │ 0      │ even         │ +1        │ 1         │
/// │ 0      │ odd          │ -1        │ 0         │
/// │ 1      │ even         │ -1        │ 1         │
/// │ 1      │ odd          │ +1        │ 0         │
/// └────────┴──────────────┴───────────┴───────────┘
///
/// Player 0 climbs on rightward steps, player 1 on leftward steps. From the
/// default starts (columns 1 and 3 of 5) the pawns zig-zag in their own
/// halves of the board and never share a cell.
///
/// ### Board edge
/// If the step would leave the board sideways, the column delta is mirrored
/// and the row delta is recomputed with the same rule.

use crate::domain::board::PlayerState;
use crate::domain::status::PlayerId;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MoveDelta {
    pub d_row: i32,
    pub d_col: i32,
}

impl MoveDelta {
    pub const STRAIGHT: MoveDelta = MoveDelta { d_row: 1, d_col: 0 };
}

/// Step for a correct answer.
pub fn correct_step() -> MoveDelta {
    MoveDelta::STRAIGHT
}

/// Row delta implied by a sideways step for this player.
fn climbs(d_col: i32, player: PlayerId) -> i32 {
    let p = player.index() as i32;
    if d_col + p == 1 || d_col - p == -2 { 1 } else { 0 }
}

/// Step for a wrong answer, ignoring board edges.
pub fn wrong_step(player: PlayerId, column: usize) -> MoveDelta {
    let p = player.index() as i32;
    let c = column as i32;
    let d_col = (1 + c - p).rem_euclid(2) * 2 - 1;
    MoveDelta { d_row: climbs(d_col, player), d_col }
}

/// Step for a wrong answer, kept inside `ncols` columns.
pub fn wrong_step_on_board(player: PlayerId, column: usize, ncols: usize) -> MoveDelta {
    let step = wrong_step(player, column);
    let target = column as i32 + step.d_col;
    if target >= 0 && target < ncols as i32 {
        return step;
    }
    let d_col = -step.d_col;
    let mirrored = column as i32 + d_col;
    if mirrored >= 0 && mirrored < ncols as i32 {
        MoveDelta { d_row: climbs(d_col, player), d_col }
    } else {
        // Single-column board: no sideways move exists.
        MoveDelta { d_row: 0, d_col: 0 }
    }
}

/// Apply a delta. The row is capped at `goal_row`.
pub fn apply(pos: PlayerState, delta: MoveDelta, goal_row: usize) -> PlayerState {
    let level = (pos.level as i32 + delta.d_row).clamp(0, goal_row as i32) as usize;
    let column = (pos.column as i32 + delta.d_col).max(0) as usize;
    PlayerState { level, column }
}

/// Has this position reached the winning row?
pub fn is_victory(pos: PlayerState, nrows: usize) -> bool {
    pos.level + 1 == nrows
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn d(d_row: i32, d_col: i32) -> MoveDelta {
        MoveDelta { d_row, d_col }
    }

    #[test]
    fn wrong_step_table() {
        let cases = [
            (PlayerId::First, 0, d(1, 1)),
            (PlayerId::First, 1, d(0, -1)),
            (PlayerId::First, 2, d(1, 1)),
            (PlayerId::First, 3, d(0, -1)),
            (PlayerId::Second, 1, d(0, 1)),
            (PlayerId::Second, 2, d(1, -1)),
            (PlayerId::Second, 3, d(0, 1)),
            (PlayerId::Second, 4, d(1, -1)),
        ];
        for (player, col, expected) in cases {
            assert_eq!(wrong_step(player, col), expected, "player {player:?} col {col}");
        }
    }

    #[test]
    fn correct_step_is_straight_up() {
        assert_eq!(correct_step(), d(1, 0));
    }

    #[test]
    fn default_starts_zigzag_in_own_half() {
        let mut p0 = PlayerState::new(0, 1);
        let mut p1 = PlayerState::new(0, 3);
        for _ in 0..6 {
            p0 = apply(p0, wrong_step_on_board(PlayerId::First, p0.column, 5), 4);
            p1 = apply(p1, wrong_step_on_board(PlayerId::Second, p1.column, 5), 4);
            assert!(p0.column <= 1);
            assert!(p1.column >= 3);
        }
    }

    #[test]
    fn edge_step_is_mirrored() {
        // Player 0 on an even last column would step right off a 5-wide board.
        assert_eq!(wrong_step(PlayerId::First, 4), d(1, 1));
        assert_eq!(wrong_step_on_board(PlayerId::First, 4, 5), d(0, -1));
        // Player 1 on column 0 would step left.
        assert_eq!(wrong_step(PlayerId::Second, 0), d(1, -1));
        assert_eq!(wrong_step_on_board(PlayerId::Second, 0, 5), d(0, 1));
    }

    #[test]
    fn single_column_board_has_no_sideways_step() {
        assert_eq!(wrong_step_on_board(PlayerId::First, 0, 1), d(0, 0));
    }

    #[test]
    fn apply_caps_at_goal() {
        let p = apply(PlayerState::new(4, 2), correct_step(), 4);
        assert_eq!(p, PlayerState::new(4, 2));
        let p = apply(PlayerState::new(3, 2), correct_step(), 4);
        assert!(is_victory(p, 5));
        assert!(!is_victory(PlayerState::new(3, 0), 5));
    }
}
