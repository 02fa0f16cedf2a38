use crate::{num_cells, Histories, Player, Position, ValidationError};

const RED: &str = "\x1b[31m";
const BLUE: &str = "\x1b[34m";
const RESET: &str = "\x1b[0m";

/// Draws the board with the numbers of the free cells and the players'
/// marks on the claimed ones.
///
/// ```
/// use tictactoe::{visualize_histories, Histories};
/// let board = visualize_histories(3, &Histories([vec![1, 5], vec![9]]), false).unwrap();
/// assert!(board.contains("│ X │ 2 │ 3 │"));
/// ```
pub fn visualize_histories(
    board_size: u32,
    histories: &Histories,
    colored: bool,
) -> Result<String, ValidationError> {
    let max = check_displayable(board_size)?;
    let mut labels: Vec<String> = (1..=max).map(|p| p.to_string()).collect();
    for player in [Player::One, Player::Two] {
        for &position in histories.of(player) {
            check_in_range(position, max)?;
            labels[position as usize - 1] = mark(player, colored);
        }
    }
    Ok(draw_grid(board_size, &labels))
}

/// Draws the board showing only the numbers of the given positions.
pub fn visualize_positions(
    board_size: u32,
    positions: impl IntoIterator<Item = Position>,
) -> Result<String, ValidationError> {
    let max = check_displayable(board_size)?;
    let mut labels = vec![String::new(); max as usize];
    for position in positions {
        check_in_range(position, max)?;
        labels[position as usize - 1] = position.to_string();
    }
    Ok(draw_grid(board_size, &labels))
}

fn check_displayable(board_size: u32) -> Result<Position, ValidationError> {
    // Cell labels are at most three characters wide
    if board_size >= 32 {
        return Err(ValidationError::BoardTooLargeToDisplay { board_size });
    }
    num_cells(board_size)
}

fn check_in_range(position: Position, max: Position) -> Result<(), ValidationError> {
    if position < 1 || position > max {
        Err(ValidationError::OutOfRange {
            player: None,
            position,
            max,
        })
    } else {
        Ok(())
    }
}

fn mark(player: Player, colored: bool) -> String {
    let color = match player {
        Player::One => RED,
        Player::Two => BLUE,
    };
    if colored {
        format!("{}{}{}", color, player.mark(), RESET)
    } else {
        player.mark().to_string()
    }
}

fn draw_grid(board_size: u32, labels: &[String]) -> String {
    let n = board_size as usize;
    let indent = " ".repeat(8usize.saturating_sub(n / 4 + n / 6).max(1));
    let border = |left: &str, middle: &str, right: &str| {
        format!("{}{}───{}{}", indent, left, format!("{}───", middle).repeat(n - 1), right)
    };

    let mut lines = vec![border("┌", "┬", "┐")];
    for (row_idx, row) in labels.chunks(n).enumerate() {
        if row_idx > 0 {
            lines.push(border("├", "┼", "┤"));
        }
        let mut line = format!("{}│", indent);
        for label in row {
            // Escape codes don't take up any space on the terminal
            let visible_width = if label.contains('\x1b') { 1 } else { label.chars().count() };
            let padding = 3usize.saturating_sub(visible_width);
            let left = padding / 2;
            line += &format!("{}{}{}│", " ".repeat(left), label, " ".repeat(padding - left));
        }
        lines.push(line);
    }
    lines.push(border("└", "┴", "┘"));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_3x3() {
        let board = visualize_histories(3, &Histories::new(), false).unwrap();
        let expected = [
            "        ┌───┬───┬───┐",
            "        │ 1 │ 2 │ 3 │",
            "        ├───┼───┼───┤",
            "        │ 4 │ 5 │ 6 │",
            "        ├───┼───┼───┤",
            "        │ 7 │ 8 │ 9 │",
            "        └───┴───┴───┘",
        ]
        .join("\n");
        assert_eq!(board, expected);
    }

    #[test]
    fn marks_and_wide_labels() {
        let histories = Histories([vec![1, 16], vec![10]]);
        let board = visualize_histories(4, &histories, false).unwrap();
        let lines: Vec<&str> = board.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[1], "       │ X │ 2 │ 3 │ 4 │");
        assert_eq!(lines[5], "       │ 9 │ O │11 │12 │");
        assert_eq!(lines[7], "       │13 │14 │15 │ X │");
    }

    #[test]
    fn colored_marks() {
        let board = visualize_histories(3, &Histories([vec![5], vec![]]), true).unwrap();
        assert!(board.contains("│ \x1b[31mX\x1b[0m │"));
    }

    #[test]
    fn positions_only() {
        let board = visualize_positions(3, [2, 9]).unwrap();
        let lines: Vec<&str> = board.lines().collect();
        assert_eq!(lines[1], "        │   │ 2 │   │");
        assert_eq!(lines[5], "        │   │   │ 9 │");
    }

    #[test]
    fn display_bounds() {
        assert_eq!(
            visualize_positions(32, []).unwrap_err(),
            ValidationError::BoardTooLargeToDisplay { board_size: 32 }
        );
        assert!(visualize_positions(31, [961]).is_ok());
        assert!(matches!(
            visualize_positions(3, [10]).unwrap_err(),
            ValidationError::OutOfRange { position: 10, .. }
        ));
    }
}
