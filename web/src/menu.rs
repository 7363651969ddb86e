use statrace_core::{PlayerId, Power};
use yew::prelude::*;

const INSTRUCTIONS: [&str; 6] = [
    "Each player picks a power before the race",
    "Use your power once, when it helps most",
    "Roll the dice and move along the board",
    "Watch out for the red squares!",
    "First to reach the GOAL wins",
    "The charts follow both players' rolls live",
];

pub(crate) fn player_name(id: PlayerId) -> String {
    format!("Player {}", id.number())
}

pub(crate) fn player_class(id: PlayerId) -> &'static str {
    match id {
        PlayerId::One => "player-one",
        PlayerId::Two => "player-two",
    }
}

pub(crate) fn power_class(power: Power) -> &'static str {
    match power {
        Power::DoubleDice => "power-double",
        Power::PushBack => "power-push",
        Power::SwapPositions => "power-swap",
        Power::ExtraTurn => "power-again",
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct MenuProps {
    pub on_start: Callback<()>,
    pub on_quit: Callback<()>,
}

#[function_component]
pub(crate) fn MenuView(props: &MenuProps) -> Html {
    let on_start = props.on_start.reform(|_: MouseEvent| ());
    let on_quit = props.on_quit.reform(|_: MouseEvent| ());

    html! {
        <section class="menu">
            <h1>{"STATISTICAL RACE"}</h1>
            <p class="subtitle">{"Probability analysis in real time"}</p>
            <button class="primary" onclick={on_start}>{"START GAME"}</button>
            <button class="danger" onclick={on_quit}>{"QUIT"}</button>
            <ul class="instructions">
                { for INSTRUCTIONS.iter().map(|line| html! { <li>{*line}</li> }) }
            </ul>
        </section>
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct PowerSelectProps {
    pub chooser: PlayerId,
    pub on_pick: Callback<usize>,
}

#[function_component]
pub(crate) fn PowerSelectView(props: &PowerSelectProps) -> Html {
    let cards = Power::CATALOGUE.iter().enumerate().map(|(index, power)| {
        let onclick = props.on_pick.reform(move |_: MouseEvent| index);
        html! {
            <button class={classes!("power-card", power_class(*power))} {onclick}>
                <strong>{power.name()}</strong>
                <span>{power.description()}</span>
            </button>
        }
    });

    html! {
        <section class="power-select">
            <h1 class={player_class(props.chooser)}>
                {format!("{} - choose your power", player_name(props.chooser))}
            </h1>
            <p class="highlight">{"Each player can use their power ONCE during the game"}</p>
            <div class="power-grid">{ for cards }</div>
        </section>
    }
}
