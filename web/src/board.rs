use statrace_core::{Board, PlayerId, PlayerPair, Position, Square};
use yew::prelude::*;

use crate::menu::player_class;

const CELL_W: f64 = 100.0;
const CELL_H: f64 = 80.0;
const CELL_MARGIN: f64 = 6.0;
const TOKEN_R: f64 = 12.0;

/// Viewports narrower than this get one column less.
const NARROW_VIEWPORT: f64 = 900.0;

/// Zig-zag placement of squares: left to right on the bottom row, then back, climbing upwards.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct BoardLayout {
    cols: u8,
    rows: u8,
}

impl BoardLayout {
    pub(crate) fn new(squares: Position, cols: u8) -> Self {
        let cols = cols.max(1);
        Self {
            cols,
            rows: squares.div_ceil(cols).max(1),
        }
    }

    pub(crate) fn for_viewport(squares: Position, width: f64) -> Self {
        let cols = if width < NARROW_VIEWPORT { 5 } else { 6 };
        Self::new(squares, cols)
    }

    /// `(column, row)` in screen order, row 0 at the top.
    pub(crate) fn grid_cell(&self, index: Position) -> (u8, u8) {
        let row = index / self.cols;
        let mut col = index % self.cols;
        if row % 2 == 1 {
            col = self.cols - 1 - col;
        }
        (col, self.rows.saturating_sub(1).saturating_sub(row))
    }

    fn origin(&self, index: Position) -> (f64, f64) {
        let (col, row) = self.grid_cell(index);
        (f64::from(col) * CELL_W, f64::from(row) * CELL_H)
    }

    pub(crate) fn center(&self, index: Position) -> (f64, f64) {
        let (x, y) = self.origin(index);
        (x + CELL_W / 2.0, y + CELL_H / 2.0)
    }

    pub(crate) fn view_box(&self) -> String {
        format!(
            "0 0 {} {}",
            f64::from(self.cols) * CELL_W,
            f64::from(self.rows) * CELL_H
        )
    }
}

fn square_class(square: Square) -> &'static str {
    match square {
        Square::Plain => "plain",
        Square::Lucky(_) => "lucky",
        Square::Unlucky(_) => "unlucky",
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct BoardProps {
    pub board: Board,
    pub positions: PlayerPair<Position>,
    /// Player to highlight, while the race is on.
    pub active: Option<PlayerId>,
    pub layout: BoardLayout,
}

#[function_component]
pub(crate) fn BoardView(props: &BoardProps) -> Html {
    let BoardProps {
        board,
        positions,
        active,
        layout,
    } = props;
    let goal_square = board.last_square();

    let path = board
        .iter()
        .map(|(index, _)| {
            let (x, y) = layout.center(index);
            format!("{x},{y}")
        })
        .collect::<Vec<_>>()
        .join(" ");

    let squares = board.iter().map(|(index, square)| {
        let (x, y) = layout.origin(index);
        let (cx, cy) = layout.center(index);
        let is_goal = index == goal_square;
        let class = classes!(
            "square",
            square_class(square),
            is_goal.then_some("goal")
        );
        let label = board
            .label_at(index)
            .map(|label| html! { <text class="label" x={cx.to_string()} y={cy.to_string()}>{label}</text> });
        html! {
            <g>
                <rect {class}
                    x={(x + CELL_MARGIN).to_string()}
                    y={(y + CELL_MARGIN).to_string()}
                    width={(CELL_W - 2.0 * CELL_MARGIN).to_string()}
                    height={(CELL_H - 2.0 * CELL_MARGIN).to_string()}
                    rx="8"/>
                <text class="number" x={(x + 2.0 * CELL_MARGIN).to_string()} y={(y + 4.0 * CELL_MARGIN).to_string()}>
                    {(index + 1).to_string()}
                </text>
                { for label }
                if is_goal {
                    <text class="goal-label" x={cx.to_string()} y={(cy - 6.0).to_string()}>{"GOAL"}</text>
                }
            </g>
        }
    });

    let tokens = positions.iter().map(|(id, &position)| {
        let (cx, cy) = layout.center(position.min(goal_square));
        let dx = match id {
            PlayerId::One => -TOKEN_R,
            PlayerId::Two => TOKEN_R,
        };
        let (cx, cy) = ((cx + dx).to_string(), (cy + 8.0).to_string());
        let highlighted = *active == Some(id);
        html! {
            <g class={classes!("token", player_class(id))}>
                if highlighted {
                    <circle class="turn-ring" cx={cx.clone()} cy={cy.clone()} r={(TOKEN_R + 4.0).to_string()}/>
                }
                <circle cx={cx} cy={cy} r={TOKEN_R.to_string()}/>
            </g>
        }
    });

    html! {
        <svg class="board" viewBox={layout.view_box()} preserveAspectRatio="xMidYMid meet">
            <polyline class="track" points={path}/>
            { for squares }
            { for tokens }
        </svg>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zig_zag_rows_alternate_direction() {
        let layout = BoardLayout::new(30, 6);
        assert_eq!(layout.grid_cell(0), (0, 4));
        assert_eq!(layout.grid_cell(5), (5, 4));
        assert_eq!(layout.grid_cell(6), (5, 3));
        assert_eq!(layout.grid_cell(11), (0, 3));
        assert_eq!(layout.grid_cell(12), (0, 2));
        assert_eq!(layout.grid_cell(29), (5, 0));
    }

    #[test]
    fn consecutive_squares_are_adjacent() {
        let layout = BoardLayout::new(30, 5);
        for index in 0..29 {
            let (c0, r0) = layout.grid_cell(index);
            let (c1, r1) = layout.grid_cell(index + 1);
            assert_eq!(c0.abs_diff(c1) + r0.abs_diff(r1), 1, "gap after square {index}");
        }
    }

    #[test]
    fn narrow_viewport_uses_fewer_columns() {
        assert_eq!(BoardLayout::for_viewport(30, 1280.0), BoardLayout::new(30, 6));
        assert_eq!(BoardLayout::for_viewport(30, 640.0), BoardLayout::new(30, 5));
        assert_eq!(BoardLayout::new(30, 5).view_box(), "0 0 500 480");
    }
}
