use statrace_core::{
    DiceRoll, Pips, Player, PlayerId, PlayerPair, Position, PowerOutcome, PowerSlot, RaceEngine,
    RollOutcome, TurnEnd,
};
use yew::prelude::*;

use crate::menu::{player_class, player_name};
use crate::utils::{format_clock, format_stat};

/// Frames a plain move message stays up.
pub(crate) const ROLL_FRAMES: u16 = 90;
/// Frames for landmarks, powers and wins.
pub(crate) const EVENT_FRAMES: u16 = 120;
/// Frames the last throw stays on the dice.
pub(crate) const DICE_FRAMES: u16 = 90;

/// A value shown for a fixed number of animation frames.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Timed<T> {
    pub value: T,
    frames_left: u16,
}

impl<T> Timed<T> {
    pub(crate) fn new(value: T, frames: u16) -> Self {
        Self {
            value,
            frames_left: frames,
        }
    }

    /// Counts one frame down. Returns `false` once nothing is left.
    fn tick(&mut self) -> bool {
        self.frames_left = self.frames_left.saturating_sub(1);
        self.frames_left > 0
    }
}

/// Advances a timed slot by one frame, clearing it when it runs out. Returns whether it was cleared.
pub(crate) fn decay<T>(slot: &mut Option<Timed<T>>) -> bool {
    let expired = slot.as_mut().is_some_and(|timed| !timed.tick());
    if expired {
        *slot = None;
    }
    expired
}

pub(crate) fn roll_message(outcome: &RollOutcome) -> Timed<Vec<String>> {
    let mut lines = Vec::new();
    if outcome.doubled {
        lines.push("Doubled dice!".to_string());
    }
    lines.push(format!("Moved {} squares", outcome.movement));

    let mut frames = ROLL_FRAMES;
    if let Some(landmark) = &outcome.landmark {
        lines.push(format!(
            "{} on square {} ({:+})",
            landmark.label,
            landmark.position + 1,
            landmark.square.delta()
        ));
        frames = EVENT_FRAMES;
    }
    match outcome.turn_end {
        TurnEnd::Won => {
            lines.push(format!("{} WINS!", player_name(outcome.player)));
            frames = EVENT_FRAMES;
        }
        TurnEnd::Repeated => lines.push(format!("{} rolls again", player_name(outcome.player))),
        TurnEnd::Passed => {}
    }
    if outcome.doubled {
        frames = EVENT_FRAMES;
    }

    Timed::new(lines, frames)
}

pub(crate) fn power_message(outcome: &PowerOutcome) -> Timed<Vec<String>> {
    Timed::new(
        vec![format!(
            "{} used {}!",
            player_name(outcome.player),
            outcome.power.name()
        )],
        EVENT_FRAMES,
    )
}

/// Pip centres on a 3x3 grid, `(column, row)`.
pub(crate) fn pips(value: Pips) -> &'static [(u8, u8)] {
    match value {
        1 => &[(1, 1)],
        2 => &[(0, 0), (2, 2)],
        3 => &[(0, 0), (1, 1), (2, 2)],
        4 => &[(0, 0), (2, 0), (0, 2), (2, 2)],
        5 => &[(0, 0), (2, 0), (1, 1), (0, 2), (2, 2)],
        6 => &[(0, 0), (2, 0), (0, 1), (2, 1), (0, 2), (2, 2)],
        _ => &[],
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct DiceFaceProps {
    pub value: Pips,
    #[prop_or_default]
    pub fresh: bool,
}

#[function_component]
pub(crate) fn DiceFace(props: &DiceFaceProps) -> Html {
    let dots = pips(props.value).iter().map(|&(col, row)| {
        let cx = 12 + u16::from(col) * 18;
        let cy = 12 + u16::from(row) * 18;
        html! { <circle cx={cx.to_string()} cy={cy.to_string()} r="5"/> }
    });

    html! {
        <svg class={classes!("die", props.fresh.then_some("fresh"))} viewBox="0 0 60 60">
            <rect x="2" y="2" width="56" height="56" rx="8"/>
            { for dots }
        </svg>
    }
}

/// One line of the stats table.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct StatsRow {
    pub player: PlayerId,
    pub position: Position,
    pub rolls: usize,
    pub mean: String,
    pub median: String,
    pub mode: String,
    pub power: PowerSlot,
}

impl StatsRow {
    pub(crate) fn from_player(player: &Player) -> Self {
        let summary = player.summary();
        Self {
            player: player.id(),
            position: player.position(),
            rolls: player.rolls().len(),
            mean: format_stat(summary.map(|s| s.mean), 2),
            median: format_stat(summary.map(|s| s.median), 1),
            mode: format_stat(summary.map(|s| f64::from(s.mode)), 0),
            power: player.power(),
        }
    }
}

fn power_status(slot: PowerSlot) -> Html {
    match slot {
        PowerSlot::Unassigned => html! { <span class="power none">{"-"}</span> },
        PowerSlot::Ready(power) => html! { <span class="power ready">{power.name()}</span> },
        PowerSlot::Spent(power) => html! { <span class="power spent"><s>{power.name()}</s></span> },
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct PanelProps {
    pub rows: PlayerPair<StatsRow>,
    pub turn: PlayerId,
    pub winner: Option<PlayerId>,
    pub show_powers: bool,
    pub can_use_power: bool,
    pub dice: Option<DiceRoll>,
    #[prop_or_default]
    pub dice_fresh: bool,
    #[prop_or_default]
    pub banner: Option<Vec<String>>,
    pub elapsed_secs: u32,
    pub on_roll: Callback<()>,
    pub on_reset: Callback<()>,
    pub on_power: Callback<()>,
}

impl PanelProps {
    pub(crate) fn rows_for(engine: &RaceEngine) -> PlayerPair<StatsRow> {
        engine.players().map(StatsRow::from_player)
    }
}

#[function_component]
pub(crate) fn PanelView(props: &PanelProps) -> Html {
    let finished = props.winner.is_some();
    let on_roll = props.on_roll.reform(|_: MouseEvent| ());
    let on_reset = props.on_reset.reform(|_: MouseEvent| ());
    let on_power = props.on_power.reform(|_: MouseEvent| ());

    let status = match props.winner {
        Some(winner) => html! {
            <h2 class={classes!("winner", player_class(winner))}>{format!("{} WINS!", player_name(winner))}</h2>
        },
        None => html! {
            <h2 class={player_class(props.turn)}>{format!("Turn: {}", player_name(props.turn))}</h2>
        },
    };

    let rows = props.rows.iter().map(|(id, row)| {
        let active = !finished && id == props.turn;
        html! {
            <tr class={classes!(player_class(id), active.then_some("active"))}>
                <th>{player_name(id)}</th>
                <td>{(row.position + 1).to_string()}</td>
                <td>{row.rolls.to_string()}</td>
                <td>{row.mean.clone()}</td>
                <td>{row.median.clone()}</td>
                <td>{row.mode.clone()}</td>
                if props.show_powers {
                    <td>{ power_status(row.power) }</td>
                }
            </tr>
        }
    });

    let dice = props.dice.map(|roll| {
        html! {
            <div class="dice">
                <DiceFace value={roll.first} fresh={props.dice_fresh}/>
                <DiceFace value={roll.second} fresh={props.dice_fresh}/>
                <span class="sum">{format!("= {}", roll.sum())}</span>
            </div>
        }
    });

    html! {
        <aside class="panel">
            { status }
            <time>{format_clock(props.elapsed_secs)}</time>
            { for dice }
            if let Some(lines) = &props.banner {
                <div class="banner">
                    { for lines.iter().map(|line| html! { <p>{line.clone()}</p> }) }
                </div>
            }
            <table class="stats">
                <thead>
                    <tr>
                        <th/>
                        <th>{"Square"}</th>
                        <th>{"Rolls"}</th>
                        <th>{"Mean"}</th>
                        <th>{"Median"}</th>
                        <th>{"Mode"}</th>
                        if props.show_powers {
                            <th>{"Power"}</th>
                        }
                    </tr>
                </thead>
                <tbody>{ for rows }</tbody>
            </table>
            <nav>
                <button class="primary" disabled={finished} onclick={on_roll}>{"Roll (Space)"}</button>
                if props.show_powers {
                    <button class="power" disabled={!props.can_use_power} onclick={on_power}>{"Use power"}</button>
                }
                <button onclick={on_reset}>{"Reset (R)"}</button>
            </nav>
        </aside>
    }
}
