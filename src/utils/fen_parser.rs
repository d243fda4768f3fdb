//! FEN-to-GameState parser.
//!
//! Builds a fresh state from a Forsyth-Edwards Notation string: placement,
//! side to move, castling rights and en-passant target. The move clocks are
//! validated but not stored.

use crate::game_state::chess_rules::pawn_start_row;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_fen(fen: &str) -> Result<GameState, String> {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or("Missing board layout in FEN")?;
    let side_part = parts.next().ok_or("Missing side-to-move in FEN")?;
    let castling_part = parts.next().ok_or("Missing castling rights in FEN")?;
    let en_passant_part = parts.next().ok_or("Missing en-passant square in FEN")?;

    // Clocks are optional; this engine keeps no fifty-move or move-number state.
    for clock in parts.by_ref().take(2) {
        clock
            .parse::<u16>()
            .map_err(|_| format!("Invalid move clock: {clock}"))?;
    }
    if parts.next().is_some() {
        return Err("FEN has extra trailing fields".to_owned());
    }

    let board = parse_board(board_part)?;
    let white_king = find_single_king(&board, Color::White)?;
    let black_king = find_single_king(&board, Color::Black)?;
    let side_to_move = parse_side_to_move(side_part)?;
    let en_passant_square = parse_en_passant_square(en_passant_part, &board, side_to_move)?;

    Ok(GameState {
        board,
        side_to_move,
        white_king,
        black_king,
        castling_rights: parse_castling_rights(castling_part)?,
        en_passant_square,
        move_history: Vec::new(),
        castling_history: Vec::new(),
        checkmate: false,
        stalemate: false,
        setup_en_passant: en_passant_square,
    })
}

fn parse_board(board_part: &str) -> Result<Board, String> {
    let rows: Vec<&str> = board_part.split('/').collect();
    if rows.len() != 8 {
        return Err("Board layout must contain 8 ranks".to_owned());
    }

    let mut board: Board = [[None; 8]; 8];
    // FEN lists rank 8 first, which is row 0 here.
    for (row, row_str) in rows.iter().enumerate() {
        let mut col = 0usize;

        for ch in row_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(format!("Invalid empty-square count '{ch}'"));
                }
                col += empty_count as usize;
                continue;
            }

            let piece = piece_from_fen_char(ch)
                .ok_or_else(|| format!("Invalid piece character '{ch}' in board layout"))?;

            if col >= 8 {
                return Err("Board rank has too many files".to_owned());
            }

            board[row][col] = Some(piece);
            col += 1;
        }

        if col != 8 {
            return Err("Board rank does not sum to 8 files".to_owned());
        }
    }

    Ok(board)
}

fn find_single_king(board: &Board, color: Color) -> Result<Square, String> {
    let king = Piece::new(color, PieceKind::King);
    let mut found = None;
    for (row, cells) in board.iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            if *cell == Some(king) {
                if found.is_some() {
                    return Err(format!("More than one {color:?} king in FEN"));
                }
                found = Some(Square::new(row as u8, col as u8));
            }
        }
    }
    found.ok_or_else(|| format!("Missing {color:?} king in FEN"))
}

fn parse_side_to_move(side_part: &str) -> Result<Color, String> {
    match side_part {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(format!("Invalid side-to-move field: {side_part}")),
    }
}

fn parse_castling_rights(castling_part: &str) -> Result<CastlingRights, String> {
    let mut rights = CastlingRights::NONE;
    if castling_part == "-" {
        return Ok(rights);
    }

    for ch in castling_part.chars() {
        match ch {
            'K' => rights.white_king_side = true,
            'Q' => rights.white_queen_side = true,
            'k' => rights.black_king_side = true,
            'q' => rights.black_queen_side = true,
            _ => return Err(format!("Invalid castling rights character: {ch}")),
        }
    }

    Ok(rights)
}

/// The target must be the square an enemy double push just skipped: on the
/// enemy's third rank, empty, with the enemy pawn directly beyond it.
fn parse_en_passant_square(
    en_passant_part: &str,
    board: &Board,
    side_to_move: Color,
) -> Result<Option<Square>, String> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    let target = algebraic_to_square(en_passant_part)?;
    let enemy = side_to_move.opposite();
    let expected_row = pawn_start_row(enemy) as i8 + enemy.forward();
    if target.row as i8 != expected_row {
        return Err(format!("En-passant square {en_passant_part} is on the wrong rank"));
    }
    if board[target.row as usize][target.col as usize].is_some() {
        return Err(format!("En-passant square {en_passant_part} is occupied"));
    }

    let pushed = target
        .offset(enemy.forward(), 0)
        .map(|square| board[square.row as usize][square.col as usize]);
    if pushed != Some(Some(Piece::new(enemy, PieceKind::Pawn))) {
        return Err(format!("No pawn behind en-passant square {en_passant_part}"));
    }

    Ok(Some(target))
}

fn piece_from_fen_char(ch: char) -> Option<Piece> {
    let color = if ch.is_ascii_uppercase() {
        Color::White
    } else if ch.is_ascii_lowercase() {
        Color::Black
    } else {
        return None;
    };

    let kind = match ch.to_ascii_lowercase() {
        'p' => PieceKind::Pawn,
        'n' => PieceKind::Knight,
        'b' => PieceKind::Bishop,
        'r' => PieceKind::Rook,
        'q' => PieceKind::Queen,
        'k' => PieceKind::King,
        _ => return None,
    };

    Some(Piece::new(color, kind))
}

#[cfg(test)]
mod tests {
    use super::parse_fen;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::*;
    use crate::utils::render_game_state::render_game_state;

    #[test]
    fn parse_starting_fen_and_render_board() {
        let game_state = parse_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");

        println!("\n{}", render_game_state(&game_state));

        assert_eq!(game_state.side_to_move, Color::White);
        assert_eq!(game_state.white_king, Square::new(7, 4));
        assert_eq!(game_state.black_king, Square::new(0, 4));
        assert_eq!(game_state.castling_rights, CastlingRights::ALL);
    }

    #[test]
    fn en_passant_target_is_remembered_for_setup() {
        let game_state = parse_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").expect("FEN should parse");
        assert_eq!(game_state.en_passant_square, Some(Square::new(2, 3)));
        assert_eq!(game_state.setup_en_passant, Some(Square::new(2, 3)));
    }

    #[test]
    fn clocks_are_optional() {
        let game_state = parse_fen("4k3/8/8/8/8/8/8/4K3 b - -").expect("FEN without clocks should parse");
        assert_eq!(game_state.side_to_move, Color::Black);
    }

    #[test]
    fn rejects_impossible_en_passant_targets() {
        // Back rank target beside a pawn that could never have double pushed.
        assert!(parse_fen("4k3/8/8/8/8/8/Kp6/8 b - a1 0 1").is_err());
        // Right rank for the other side to move.
        assert!(parse_fen("4k3/8/8/3pP3/8/8/8/4K3 b - d6 0 1").is_err());
        // No pawn beyond the target.
        assert!(parse_fen("4k3/8/8/4P3/8/8/8/4K3 w - d6 0 1").is_err());
        // Target square occupied.
        assert!(parse_fen("4k3/8/3n4/3pP3/8/8/8/4K3 w - d6 0 1").is_err());
    }

    #[test]
    fn rejects_missing_or_duplicate_kings() {
        assert!(parse_fen("8/8/8/8/8/8/8/4K3 w - - 0 1").is_err());
        assert!(parse_fen("k3k3/8/8/8/8/8/8/4K3 w - - 0 1").is_err());
    }

    #[test]
    fn rejects_bad_layouts() {
        assert!(parse_fen("4k3/8/8/8/8/8/4K3 w - - 0 1").is_err());
        assert!(parse_fen("4k3/8/8/8/8/8/8/4K4 w - - 0 1").is_err());
        assert!(parse_fen("4k3/8/8/8/8/8/8/4X3 w - - 0 1").is_err());
    }
}
