use crate::consts;
use crate::game::{Cell, Direction, GameState, Snapshot};
use crate::util::center_rect;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Margin, Rect, Size},
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};

impl Widget for Snapshot<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [status_area, block_area, msg_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);
        Line::styled(
            format!(
                " Length: {}  Tick: {}ms",
                self.length, self.tick_interval_ms
            ),
            consts::STATUS_BAR_STYLE,
        )
        .render(status_area, buf);

        let block_size = Size {
            width: self.size.width.saturating_add(2),
            height: self.size.height.saturating_add(2),
        };
        let block_area = center_rect(block_area, block_size);
        // The board wraps around at every edge
        DottedBorder.render(block_area, buf);

        let mut board = Canvas {
            area: block_area.inner(Margin::new(1, 1)),
            buf,
        };
        for cell in self.grid.occupied_cells() {
            board.draw_cell(cell, consts::SNAKE_BODY_SYMBOL, consts::SNAKE_STYLE);
        }
        for cell in self.eaten.iter() {
            board.draw_cell(cell, consts::SWALLOWED_SYMBOL, consts::SWALLOWED_STYLE);
        }
        if let Some(cell) = self.food {
            board.draw_cell(cell, consts::FOOD_SYMBOL, consts::FOOD_STYLE);
        }
        board.draw_cell(self.head, head_symbol(self.direction), consts::SNAKE_STYLE);
        if let GameState::GameOver { collision } = self.state {
            board.draw_cell(collision, consts::COLLISION_SYMBOL, consts::COLLISION_STYLE);
        }

        let verdict = match self.state {
            GameState::Running => return,
            GameState::GameOver { .. } => " — GAME OVER — Quit (",
            GameState::BoardFull => " — BOARD FULL — Quit (",
        };
        Line::from_iter([
            Span::raw(verdict),
            Span::styled("q", consts::KEY_STYLE),
            Span::raw(")"),
        ])
        .render(msg_area, buf);
    }
}

fn head_symbol(direction: Direction) -> char {
    match direction {
        Direction::Up => consts::SNAKE_HEAD_UP_SYMBOL,
        Direction::Down => consts::SNAKE_HEAD_DOWN_SYMBOL,
        Direction::Left => consts::SNAKE_HEAD_LEFT_SYMBOL,
        Direction::Right => consts::SNAKE_HEAD_RIGHT_SYMBOL,
    }
}

#[derive(Debug, Eq, PartialEq)]
struct Canvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl Canvas<'_> {
    fn draw_char(&mut self, cell: Cell, symbol: char) {
        if let Some(bufcell) = self.cell_mut(cell) {
            bufcell.set_char(symbol);
        }
    }

    fn draw_cell(&mut self, cell: Cell, symbol: char, style: Style) {
        if let Some(bufcell) = self.cell_mut(cell) {
            bufcell.set_char(symbol);
            bufcell.set_style(Style::reset().patch(style));
        }
    }

    fn cell_mut(&mut self, cell: Cell) -> Option<&mut ratatui::buffer::Cell> {
        let x = self.area.x.checked_add(cell.x)?;
        let y = self.area.y.checked_add(cell.y)?;
        self.buf.cell_mut((x, y))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct DottedBorder;

impl Widget for DottedBorder {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let max_x = area.width.saturating_sub(1);
        let max_y = area.height.saturating_sub(1);
        let mut canvas = Canvas { area, buf };
        canvas.draw_char(Cell::new(0, 0), '·');
        canvas.draw_char(Cell::new(max_x, 0), '·');
        canvas.draw_char(Cell::new(max_x, max_y), '·');
        canvas.draw_char(Cell::new(0, max_y), '·');
        for x in 1..max_x {
            canvas.draw_char(Cell::new(x, 0), '⋯');
            canvas.draw_char(Cell::new(x, max_y), '⋯');
        }
        for y in 1..max_y {
            canvas.draw_char(Cell::new(0, y), '⋮');
            canvas.draw_char(Cell::new(max_x, y), '⋮');
        }
    }
}
