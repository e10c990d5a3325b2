//! Game screen rendering using ratatui
//!
//! Layout, top to bottom:
//! - Header: both players with score and clock
//! - Board (15x15) beside the move list
//! - Rack
//! - Status: pending word and score, errors, dialog prompts
//! - Key hints

use super::view::View;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};
use skrafl::board::{Square, SquareCategory, BOARD_SIZE, RACK_SIZE};
use skrafl::game::moves::{Move, MoveKind};
use skrafl::game::tile::{Highlight, Tile};
use skrafl::game::{Dialog, Game};

/// Width of one board cell in columns
const CELL_WIDTH: u16 = 3;

pub fn render(frame: &mut Frame, game: &Game, view: &View) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                     // Header
            Constraint::Length(BOARD_SIZE as u16 + 3), // Board + column labels
            Constraint::Length(3),                     // Rack
            Constraint::Length(2),                     // Status
            Constraint::Length(1),                     // Footer
            Constraint::Min(0),
        ])
        .split(area);

    render_header(frame, layout[0], game);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(BOARD_SIZE as u16 * CELL_WIDTH + 4),
            Constraint::Min(20),
        ])
        .split(layout[1]);
    render_board(frame, middle[0], game, view);
    render_move_list(frame, middle[1], game);

    render_rack(frame, layout[2], game, view);
    render_status(frame, layout[3], game, view);

    let footer = Paragraph::new(
        "←↑↓→ Move  Tab Board/Rack  Space Pick/Drop  Enter Submit  Bksp Shuffle  Esc Recall  p x c r Pass/Exch/Chall/Resign  PgUp/PgDn Review  q Quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, layout[4]);
}

/// Player names, scores and clocks
fn render_header(frame: &mut Frame, area: Rect, game: &Game) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    for player in 0..2 {
        let mut style = if player == game.player {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::White)
        };
        if !game.over && game.moves.len() % 2 == player {
            style = style.bold();
        }
        let mut text = format_player(&game.nickname[player], game.display_score(player));
        if game.is_timed() {
            text.push_str("  ");
            text.push_str(&game.clock.text[player]);
            if game.clock.running_out[player] {
                style = style.fg(Color::Red);
            }
            if game.clock.blinking[player] {
                style = style.add_modifier(Modifier::SLOW_BLINK);
            }
        }
        let alignment = if player == 0 { Alignment::Left } else { Alignment::Right };
        frame.render_widget(
            Paragraph::new(text).style(style).alignment(alignment),
            halves[player],
        );
    }
}

fn render_board(frame: &mut Frame, area: Rect, game: &Game, view: &View) {
    let mut lines = Vec::with_capacity(BOARD_SIZE as usize + 1);
    let mut labels = String::from("   ");
    for col in 1..=BOARD_SIZE {
        labels.push_str(&format!("{:^3}", col));
    }
    lines.push(Line::from(labels).style(Style::default().fg(Color::DarkGray)));

    for row in 0..BOARD_SIZE {
        let row_id = skrafl::board::coord::ROW_IDS.as_bytes()[row as usize] as char;
        let mut spans = vec![Span::styled(
            format!("{}  ", row_id),
            Style::default().fg(Color::DarkGray),
        )];
        for col in 0..BOARD_SIZE {
            let square = Square::Board { row, col };
            let (text, mut style) = match game.tiles.get(&square) {
                Some(tile) => (format!(" {} ", tile_text(tile)), tile_style(tile, game)),
                None => {
                    let category = game.board_type.square_category(row, col);
                    (category_text(category).to_string(), category_style(category))
                }
            };
            if view.cursor == square {
                style = style.add_modifier(Modifier::REVERSED);
            }
            if view.held == Some(square) {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            spans.push(Span::styled(text, style));
        }
        lines.push(Line::from(spans));
    }

    let title = match game.reviewing {
        Some(n) => format!("Board (move {} of {})", n, game.moves.len()),
        None => format!("Board ({})", game.board_type.name()),
    };
    let board = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(board, area);
}

fn render_move_list(frame: &mut Frame, area: Rect, game: &Game) {
    let height = area.height.saturating_sub(2) as usize;
    let skip = game.moves.len().saturating_sub(height);
    let items: Vec<ListItem> = game
        .moves
        .iter()
        .enumerate()
        .skip(skip)
        .map(|(i, mv)| {
            let style = if mv.player == game.player as i32 {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(format!("{:>3}. {}", i + 1, describe_move(mv))).style(style)
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title("Moves"),
    );
    frame.render_widget(list, area);
}

fn render_rack(frame: &mut Frame, area: Rect, game: &Game, view: &View) {
    let mut spans = Vec::with_capacity(RACK_SIZE);
    for slot in 1..=RACK_SIZE {
        let square = Square::Rack(slot);
        let (text, mut style) = match game.tiles.get(&square) {
            Some(tile) => {
                let mut style = Style::default().fg(Color::Black).bg(Color::Yellow);
                if tile.xchg {
                    style = style.bg(Color::Magenta);
                }
                (format!(" {} ", tile_text(tile)), style)
            }
            None => (" . ".to_string(), Style::default().fg(Color::DarkGray)),
        };
        if view.cursor == square {
            style = style.add_modifier(Modifier::REVERSED);
        }
        if view.held == Some(square) {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        spans.push(Span::styled(text, style));
        spans.push(Span::raw(" "));
    }
    let bag = format!("   Bag: {}", game.bag.chars().count());
    spans.push(Span::styled(bag, Style::default().fg(Color::DarkGray)));
    let rack = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("Rack"));
    frame.render_widget(rack, area);
}

fn render_status(frame: &mut Frame, area: Rect, game: &Game, view: &View) {
    let (text, color) = status_line(game, view);
    frame.render_widget(Paragraph::new(text).style(Style::default().fg(color)), area);
}

/// What the status line should say, most urgent first
fn status_line(game: &Game, view: &View) -> (String, Color) {
    if let Some(kind) = game.current_error {
        let message = game.current_message.as_deref().unwrap_or(kind.message());
        return (format!("Error: {}", message), Color::Red);
    }
    if game.asking_for_blank.is_some() {
        return ("Type the letter for the blank tile (Esc cancels)".to_string(), Color::Yellow);
    }
    if let Some(dialog) = game.showing_dialog {
        return (dialog_prompt(dialog).to_string(), Color::Yellow);
    }
    if game.over {
        let text = if game.congratulate {
            "Game over. Congratulations, you won!"
        } else {
            "Game over."
        };
        return (text.to_string(), Color::Magenta);
    }
    if game.move_in_progress {
        return ("Sending move...".to_string(), Color::DarkGray);
    }
    if !view.status.is_empty() {
        return (view.status.clone(), Color::White);
    }
    match (&game.current_word, game.current_score) {
        (Some(word), Some(score)) => {
            let color = if game.word_good {
                Color::Green
            } else if game.word_bad {
                Color::Red
            } else {
                Color::White
            };
            (format!("{} for {} points", word.to_uppercase(), score), color)
        }
        _ if !game.tiles_placed().is_empty() => ("Not a valid placement".to_string(), Color::DarkGray),
        _ if game.localturn => ("Your move".to_string(), Color::White),
        _ => ("Waiting for opponent".to_string(), Color::DarkGray),
    }
}

fn dialog_prompt(dialog: Dialog) -> &'static str {
    match dialog {
        Dialog::Pass => "Pass this turn? (y/n)",
        Dialog::Challenge => "Challenge the last move? (y/n)",
        Dialog::Exchange => "Mark tiles with Space, then exchange? (y/n)",
        Dialog::Resign => "Resign the game? (y/n)",
    }
}

fn format_player(name: &str, score: i32) -> String {
    let name = if name.is_empty() { "?" } else { name };
    format!("{} {}", name, score)
}

/// Letter shown on a tile; a blank shows its assigned letter or `?`
fn tile_text(tile: &Tile) -> char {
    if tile.is_blank() && tile.letter == skrafl::game::tile::UNASSIGNED {
        '?'
    } else {
        tile.letter.to_ascii_uppercase()
    }
}

fn tile_style(tile: &Tile, game: &Game) -> Style {
    let base = if tile.draggable {
        Style::default().fg(Color::Black).bg(Color::Yellow)
    } else {
        Style::default().fg(Color::Black).bg(Color::White)
    };
    let base = match tile.highlight {
        Some(Highlight::Local) => base.bg(Color::Cyan),
        Some(Highlight::Remote) => base.bg(Color::LightRed),
        None => base,
    };
    let base = if tile.fresh { base.bold() } else { base };
    if tile.draggable && (game.word_bad || game.current_score.is_none()) {
        base.italic()
    } else {
        base
    }
}

fn category_text(category: SquareCategory) -> &'static str {
    match category {
        SquareCategory::None => " . ",
        SquareCategory::DoubleWord => " 2W",
        SquareCategory::TripleWord => " 3W",
        SquareCategory::DoubleLetter => " 2L",
        SquareCategory::TripleLetter => " 3L",
    }
}

fn category_style(category: SquareCategory) -> Style {
    match category {
        SquareCategory::None => Style::default().fg(Color::DarkGray),
        SquareCategory::DoubleWord => Style::default().fg(Color::LightMagenta),
        SquareCategory::TripleWord => Style::default().fg(Color::Red),
        SquareCategory::DoubleLetter => Style::default().fg(Color::LightCyan),
        SquareCategory::TripleLetter => Style::default().fg(Color::Blue),
    }
}

/// One line of the move list
fn describe_move(mv: &Move) -> String {
    match &mv.kind {
        MoveKind::Placement { coord, tiles } => {
            format!("{} {} {}", coord, tiles.replace('?', "").to_uppercase(), mv.score)
        }
        MoveKind::Pass => "pass".to_string(),
        MoveKind::Exchange { letters } => format!("exchanged {}", letters.chars().count()),
        MoveKind::Resign => "resigned".to_string(),
        MoveKind::Challenge => "challenge".to_string(),
        MoveKind::ChallengeResponse if mv.is_successful_challenge() => {
            format!("challenge upheld {}", mv.score)
        }
        MoveKind::ChallengeResponse => format!("challenge failed {}", mv.score),
        MoveKind::TimePenalty => format!("overtime {}", mv.score),
        MoveKind::GameOver => "game over".to_string(),
        MoveKind::RackLeave { letters } => format!("rack {} {}", letters, mv.score),
    }
}
