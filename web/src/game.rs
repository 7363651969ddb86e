use crate::board::{BoardLayout, BoardView};
use crate::chart::{ChartCache, ConvergenceChart, DistributionChart};
use crate::menu::{MenuView, PowerSelectView};
use crate::panel::{self, PanelProps, PanelView, Timed};
use crate::settings::{self, RulesetArg, Settings};
use crate::theme::Theme;
use crate::utils::*;
use chrono::prelude::*;
use clap::Args;
use gloo::events::EventListener;
use gloo::timers::callback::Interval;
use statrace_core as game;
use wasm_bindgen::JsCast;
use yew::prelude::*;

/// About 60 frames per second.
const FRAME_MS: u32 = 16;
const DEFAULT_VIEWPORT: f64 = 1280.0;
const CLASSIC_COLUMNS: u8 = 6;

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct GameSession {
    pub engine: game::RaceEngine,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl GameSession {
    fn new(engine: game::RaceEngine) -> Self {
        Self {
            engine,
            started_at: None,
            ended_at: None,
        }
    }

    fn elapsed_secs(&self, now: DateTime<Utc>) -> u32 {
        if let Some(started_at) = self.started_at {
            (self.ended_at.unwrap_or(now) - started_at)
                .num_seconds()
                .max(0) as u32
        } else {
            0
        }
    }

    fn on_successful_move(&mut self, now: DateTime<Utc>) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }

        if self.engine.is_finished() && self.ended_at.is_none() {
            self.ended_at = Some(now);
        }
    }
}

pub trait HasUpdate {
    fn has_update(self) -> bool;
}

impl<T> HasUpdate for game::Result<T> {
    fn has_update(self) -> bool {
        match self {
            Ok(_) => true,
            Err(err) => {
                log::debug!("ignored: {}", err);
                false
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Start,
    Quit,
    PickPower(usize),
    Roll,
    UsePower,
    Reset,
    Tick,
    Resize(f64),
    ToggleSettings,
    UpdateSettings(Settings),
}

/// Keyboard shortcuts, by `KeyboardEvent.key`.
pub(crate) fn key_command(key: &str) -> Option<Msg> {
    match key {
        " " => Some(Msg::Roll),
        "r" | "R" => Some(Msg::Reset),
        "Escape" => Some(Msg::Quit),
        _ => None,
    }
}

/// Only the powers board follows the viewport; the classic one keeps its grid.
fn layout_for(ruleset: game::Ruleset, squares: game::Position, width: f64) -> BoardLayout {
    match ruleset {
        game::Ruleset::Powers => BoardLayout::for_viewport(squares, width),
        game::Ruleset::Classic => BoardLayout::new(squares, CLASSIC_COLUMNS),
    }
}

fn viewport_width() -> f64 {
    gloo::utils::window()
        .inner_width()
        .ok()
        .and_then(|width| width.as_f64())
        .unwrap_or(DEFAULT_VIEWPORT)
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Rules to start with
    #[arg(long, value_enum, default_value_t = RulesetArg::Powers)]
    pub ruleset: RulesetArg,

    /// Most squares a single turn can move
    #[arg(long)]
    pub max_step: Option<game::Pips>,

    /// Force a theme instead of following the browser
    #[arg(long, value_enum)]
    pub theme: Option<Theme>,
}

impl GameProps {
    fn settings(&self) -> Settings {
        Settings {
            theme: self.theme,
            ruleset: self.ruleset.into(),
            max_step: self.max_step,
        }
    }
}

pub(crate) struct GameView {
    settings: Settings,
    session: GameSession,
    dice: game::RandomDice,
    charts: ChartCache,
    layout: BoardLayout,
    banner: Option<Timed<Vec<String>>>,
    dice_display: Option<Timed<game::DiceRoll>>,
    prev_time: u32,
    settings_open: bool,
    closed: bool,
    timer_interval: Option<Interval>,
    key_listener: Option<EventListener>,
    resize_listener: Option<EventListener>,
}

impl GameView {
    fn create_timer(ctx: &Context<Self>) -> Interval {
        let link = ctx.link().clone();
        Interval::new(FRAME_MS, move || link.send_message(Msg::Tick))
    }

    fn create_key_listener(ctx: &Context<Self>) -> EventListener {
        let link = ctx.link().clone();
        EventListener::new(&gloo::utils::document(), "keydown", move |event| {
            let Some(event) = event.dyn_ref::<web_sys::KeyboardEvent>() else {
                return;
            };
            let key = event.key();
            if let Some(msg) = key_command(&key) {
                log::trace!("key {:?} -> {:?}", key, msg);
                // keep space from scrolling the page
                event.prevent_default();
                link.send_message(msg);
            }
        })
    }

    fn create_resize_listener(ctx: &Context<Self>) -> EventListener {
        let link = ctx.link().clone();
        EventListener::new(&gloo::utils::window(), "resize", move |_| {
            link.send_message(Msg::Resize(viewport_width()));
        })
    }

    fn new_session(&mut self) {
        let config = self.settings.game_config();
        log::debug!("new session: {:?}", config);
        self.session = GameSession::new(game::RaceEngine::new(config));
        self.charts.mark_all();
        self.banner = None;
        self.dice_display = None;
        self.prev_time = 0;
        self.relayout(viewport_width());
    }

    fn relayout(&mut self, width: f64) -> bool {
        let engine = &self.session.engine;
        let layout = layout_for(engine.config().ruleset, engine.board().goal(), width);
        if self.layout != layout {
            log::debug!("board layout: {:?}", layout);
            self.layout = layout;
            true
        } else {
            false
        }
    }

    fn get_time(&self) -> u32 {
        self.session.elapsed_secs(utc_now())
    }

    fn roll(&mut self) -> bool {
        let now = utc_now();
        match self.session.engine.roll(&mut self.dice) {
            Ok(outcome) => {
                self.charts.mark(outcome.player);
                self.dice_display = Some(Timed::new(outcome.roll, panel::DICE_FRAMES));
                self.banner = Some(panel::roll_message(&outcome));
                self.session.on_successful_move(now);
                true
            }
            Err(err) => {
                log::debug!("roll ignored: {}", err);
                false
            }
        }
    }

    fn use_power(&mut self) -> bool {
        let now = utc_now();
        match self.session.engine.activate_power() {
            Ok(outcome) => {
                self.banner = Some(panel::power_message(&outcome));
                self.session.on_successful_move(now);
                true
            }
            Err(err) => {
                log::debug!("power ignored: {}", err);
                false
            }
        }
    }

    fn tick(&mut self) -> bool {
        let banner_gone = panel::decay(&mut self.banner);
        let dice_gone = panel::decay(&mut self.dice_display);

        let time = self.get_time();
        let time_changed = self.prev_time != time;
        self.prev_time = time;

        banner_gone || dice_gone || time_changed
    }

    /// Stops every callback feeding the component.
    fn quit(&mut self) -> bool {
        log::debug!("quit");
        self.timer_interval.take();
        self.key_listener.take();
        self.resize_listener.take();
        self.closed = true;
        if let Err(err) = gloo::utils::window().close() {
            log::warn!("could not close window: {:?}", err);
        }
        true
    }

    fn view_race(&self, ctx: &Context<Self>) -> Html {
        let engine = &self.session.engine;
        let finished = engine.is_finished();

        let on_roll = ctx.link().callback(|_| Msg::Roll);
        let on_reset = ctx.link().callback(|_| Msg::Reset);
        let on_power = ctx.link().callback(|_| Msg::UsePower);

        let charts = match self.charts.data() {
            Ok(data) => html! {
                <>
                    <DistributionChart data={data.clone()}/>
                    <ConvergenceChart {data}/>
                </>
            },
            Err(err) => html! { <p class="placeholder">{err.to_string()}</p> },
        };

        html! {
            <>
                <main>
                    <BoardView
                        board={engine.board().clone()}
                        positions={engine.positions()}
                        active={(!finished).then_some(engine.turn())}
                        layout={self.layout}/>
                    <PanelView
                        rows={PanelProps::rows_for(engine)}
                        turn={engine.turn()}
                        winner={engine.winner()}
                        show_powers={engine.config().ruleset.has_powers()}
                        can_use_power={engine.can_activate_power()}
                        dice={self.dice_display.as_ref().map(|timed| timed.value)}
                        dice_fresh={self.dice_display.is_some()}
                        banner={self.banner.as_ref().map(|timed| timed.value.clone())}
                        elapsed_secs={self.get_time()}
                        {on_roll}
                        {on_reset}
                        {on_power}/>
                </main>
                <section class="charts">{ charts }</section>
            </>
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let settings = props.settings();
        let seed = props.seed.unwrap_or_else(js_random_seed);
        log::debug!("dice seed: {}", seed);

        let engine = game::RaceEngine::new(settings.game_config());
        let layout = layout_for(
            settings.ruleset,
            engine.board().goal(),
            viewport_width(),
        );

        Self {
            settings,
            session: GameSession::new(engine),
            dice: game::RandomDice::new(seed),
            charts: ChartCache::new(),
            layout,
            banner: None,
            dice_display: None,
            prev_time: 0,
            settings_open: false,
            closed: false,
            timer_interval: Some(GameView::create_timer(ctx)),
            key_listener: Some(GameView::create_key_listener(ctx)),
            resize_listener: Some(GameView::create_resize_listener(ctx)),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        if self.closed {
            return false;
        }

        let updated = match msg {
            Start => self.session.engine.start().has_update(),
            Quit => self.quit(),
            PickPower(index) => self.session.engine.select_power_index(index).has_update(),
            Roll => self.roll(),
            UsePower => self.use_power(),
            Reset => {
                self.new_session();
                true
            }
            Tick => self.tick(),
            Resize(width) => self.relayout(width),
            ToggleSettings => {
                self.settings_open = !self.settings_open;
                true
            }
            UpdateSettings(settings) => {
                self.settings_open = false;
                if self.settings.theme != settings.theme {
                    Theme::apply(settings.theme);
                }
                self.settings = settings;
                true
            }
        };

        let charts_rebuilt = self.charts.refresh(self.session.engine.players());
        updated || charts_rebuilt
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use game::Phase;
        use settings::SettingsView;

        if self.closed {
            return html! {
                <div class="statrace closed">
                    <h1>{"Thanks for playing!"}</h1>
                    <p>{"The game has stopped. You can close this tab."}</p>
                </div>
            };
        }

        let engine = &self.session.engine;
        let cb_show_settings = ctx.link().callback(|_| Msg::ToggleSettings);

        let content = match engine.phase() {
            Phase::Menu => html! {
                <MenuView
                    on_start={ctx.link().callback(|_| Msg::Start)}
                    on_quit={ctx.link().callback(|_| Msg::Quit)}/>
            },
            Phase::PowerSelection => match engine.selecting() {
                Some(chooser) => html! {
                    <PowerSelectView {chooser} on_pick={ctx.link().callback(Msg::PickPower)}/>
                },
                None => html! {},
            },
            Phase::Playing | Phase::Finished => self.view_race(ctx),
        };

        html! {
            <div class="statrace">
                <small class="settings-toggle" onclick={cb_show_settings}>{"···"}</small>
                { content }
                if self.settings_open {
                    <SettingsView
                        settings={self.settings}
                        on_apply={ctx.link().callback(Msg::UpdateSettings)}
                        on_cancel={ctx.link().callback(|_| Msg::ToggleSettings)}/>
                }
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn keyboard_shortcuts() {
        assert_eq!(key_command(" "), Some(Msg::Roll));
        assert_eq!(key_command("r"), Some(Msg::Reset));
        assert_eq!(key_command("R"), Some(Msg::Reset));
        assert_eq!(key_command("Escape"), Some(Msg::Quit));
        assert_eq!(key_command("Enter"), None);
    }

    #[test]
    fn clock_starts_on_first_move_and_stops_on_win() {
        let config = game::GameConfig::new(game::Ruleset::Classic);
        let mut session = GameSession::new(game::RaceEngine::new(config));
        assert_eq!(session.elapsed_secs(at(50)), 0);

        let mut dice = game::ScriptedDice::new([(6, 6), (1, 1), (6, 6), (1, 1), (6, 6)]);
        session.engine.roll(&mut dice).unwrap();
        session.on_successful_move(at(10));
        assert_eq!(session.elapsed_secs(at(25)), 15);

        while !session.engine.is_finished() {
            session.engine.roll(&mut dice).unwrap();
        }
        session.on_successful_move(at(40));
        assert_eq!(session.elapsed_secs(at(100)), 30);
    }

    #[test]
    fn errors_are_not_updates() {
        let mut engine = game::RaceEngine::new(game::GameConfig::new(game::Ruleset::Classic));
        assert!(!engine.start().has_update());
        assert!(!engine.activate_power().has_update());

        let mut engine = game::RaceEngine::new(game::GameConfig::new(game::Ruleset::Powers));
        assert!(engine.start().has_update());
        assert!(engine.select_power_index(0).has_update());
        assert!(!engine.select_power_index(9).has_update());
    }

    #[test]
    fn only_powers_board_follows_viewport() {
        assert_eq!(
            layout_for(game::Ruleset::Powers, 30, 600.0),
            BoardLayout::new(30, 5)
        );
        assert_eq!(
            layout_for(game::Ruleset::Classic, 30, 600.0),
            BoardLayout::new(30, CLASSIC_COLUMNS)
        );
    }

    #[test]
    fn props_seed_settings() {
        let props = GameProps {
            seed: Some(42),
            ruleset: RulesetArg::Classic,
            max_step: Some(6),
            theme: None,
        };
        let settings = props.settings();
        assert_eq!(settings.ruleset, game::Ruleset::Classic);
        assert_eq!(settings.game_config().movement(12), 6);
    }
}
