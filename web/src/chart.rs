use std::rc::Rc;

use bitflags::bitflags;
use statrace_core::stats::{MAX_SUM, MIN_SUM, THEORETICAL_MEAN};
use statrace_core::{Distribution, Player, PlayerId, PlayerPair};
use thiserror::Error;
use yew::prelude::*;

use crate::menu::player_class;

/// Rolls needed, across both players, before anything is plotted.
const MIN_ROLLS: usize = 1;

const WIDTH: f64 = 320.0;
const HEIGHT: f64 = 200.0;
const PAD_LEFT: f64 = 34.0;
const PAD_RIGHT: f64 = 8.0;
const PAD_TOP: f64 = 24.0;
const PAD_BOTTOM: f64 = 26.0;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum ChartError {
    #[error("Roll the dice to see the charts")]
    NotEnoughData,
}

bitflags! {
    /// Players whose roll history changed since the charts were last built.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub(crate) struct Dirty: u8 {
        const PLAYER_ONE = 1;
        const PLAYER_TWO = 1 << 1;
    }
}

impl Dirty {
    pub(crate) const fn player(id: PlayerId) -> Self {
        match id {
            PlayerId::One => Self::PLAYER_ONE,
            PlayerId::Two => Self::PLAYER_TWO,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ChartData {
    pub empirical: PlayerPair<Option<Distribution>>,
    pub theoretical: Distribution,
    pub means: PlayerPair<Vec<f64>>,
}

impl ChartData {
    pub(crate) fn from_players(players: &PlayerPair<Player>) -> Result<Self, ChartError> {
        let total: usize = players.iter().map(|(_, player)| player.rolls().len()).sum();
        if total < MIN_ROLLS {
            return Err(ChartError::NotEnoughData);
        }

        Ok(Self {
            empirical: players.map(Player::distribution),
            theoretical: Distribution::theoretical(),
            means: players.map(Player::running_means),
        })
    }

    /// Top of the frequency axis, rounded up to the next 0.05.
    pub(crate) fn frequency_ceiling(&self) -> f64 {
        let peak = self
            .empirical
            .iter()
            .filter_map(|(_, dist)| dist.as_ref().map(Distribution::peak))
            .fold(self.theoretical.peak(), f64::max);
        (peak / 0.05).ceil() * 0.05
    }

    /// Longest roll history, never below 2 so the x axis has a width.
    pub(crate) fn roll_span(&self) -> usize {
        self.means
            .iter()
            .map(|(_, means)| means.len())
            .max()
            .unwrap_or_default()
            .max(2)
    }
}

/// Built charts plus the set of players whose data moved on since.
#[derive(Debug)]
pub(crate) struct ChartCache {
    dirty: Dirty,
    data: Result<Rc<ChartData>, ChartError>,
}

impl ChartCache {
    pub(crate) fn new() -> Self {
        Self {
            dirty: Dirty::all(),
            data: Err(ChartError::NotEnoughData),
        }
    }

    pub(crate) fn mark(&mut self, id: PlayerId) {
        self.dirty |= Dirty::player(id);
    }

    pub(crate) fn mark_all(&mut self) {
        self.dirty = Dirty::all();
    }

    pub(crate) fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Rebuilds the charts if any history changed. Returns whether it did.
    pub(crate) fn refresh(&mut self, players: &PlayerPair<Player>) -> bool {
        if !self.is_dirty() {
            return false;
        }
        log::debug!("rebuilding charts ({:?})", self.dirty);
        self.data = ChartData::from_players(players).map(Rc::new);
        self.dirty = Dirty::empty();
        true
    }

    pub(crate) fn data(&self) -> Result<Rc<ChartData>, ChartError> {
        self.data.clone()
    }
}

/// Linear map from data space into the drawable area of a chart.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Plot {
    x_range: (f64, f64),
    y_range: (f64, f64),
}

impl Plot {
    fn x(&self, value: f64) -> f64 {
        let (lo, hi) = self.x_range;
        PAD_LEFT + (value - lo) / (hi - lo) * (WIDTH - PAD_LEFT - PAD_RIGHT)
    }

    fn y(&self, value: f64) -> f64 {
        let (lo, hi) = self.y_range;
        HEIGHT - PAD_BOTTOM - (value - lo) / (hi - lo) * (HEIGHT - PAD_TOP - PAD_BOTTOM)
    }

    fn width(&self, span: f64) -> f64 {
        self.x(self.x_range.0 + span) - self.x(self.x_range.0)
    }

    fn points(&self, values: impl Iterator<Item = (f64, f64)>) -> String {
        values
            .map(|(x, y)| format!("{:.1},{:.1}", self.x(x), self.y(y)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn frame(&self) -> Html {
        let (x0, x1) = (self.x(self.x_range.0), self.x(self.x_range.1));
        let (y0, y1) = (self.y(self.y_range.0), self.y(self.y_range.1));
        html! {
            <g class="frame">
                <line x1={x0.to_string()} y1={y0.to_string()} x2={x1.to_string()} y2={y0.to_string()}/>
                <line x1={x0.to_string()} y1={y0.to_string()} x2={x0.to_string()} y2={y1.to_string()}/>
            </g>
        }
    }

    fn x_tick(&self, value: f64, label: String) -> Html {
        html! {
            <text class="tick" x={self.x(value).to_string()} y={(HEIGHT - PAD_BOTTOM + 12.0).to_string()}>{label}</text>
        }
    }

    fn y_tick(&self, value: f64, label: String) -> Html {
        let y = self.y(value);
        html! {
            <g class="grid">
                <line x1={PAD_LEFT.to_string()} y1={y.to_string()} x2={(WIDTH - PAD_RIGHT).to_string()} y2={y.to_string()}/>
                <text class="tick y" x={(PAD_LEFT - 4.0).to_string()} y={(y + 3.0).to_string()}>{label}</text>
            </g>
        }
    }
}

fn view_box() -> String {
    format!("0 0 {WIDTH} {HEIGHT}")
}

#[derive(Properties, PartialEq)]
pub(crate) struct ChartProps {
    pub data: Rc<ChartData>,
}

#[function_component]
pub(crate) fn DistributionChart(props: &ChartProps) -> Html {
    let data = &props.data;
    let plot = Plot {
        x_range: (f64::from(MIN_SUM) - 0.5, f64::from(MAX_SUM) + 0.5),
        y_range: (0.0, data.frequency_ceiling()),
    };
    let bar_width = plot.width(0.35);
    let baseline = plot.y(0.0);

    let bars = data.empirical.iter().flat_map(|(id, dist)| {
        let offset = match id {
            PlayerId::One => -0.2,
            PlayerId::Two => 0.2,
        };
        dist.iter().flat_map(|dist| dist.iter()).map(move |(sum, freq)| {
            let top = plot.y(freq);
            html! {
                <rect class={classes!("bar", player_class(id))}
                    x={(plot.x(f64::from(sum) + offset) - bar_width / 2.0).to_string()}
                    y={top.to_string()}
                    width={bar_width.to_string()}
                    height={(baseline - top).max(0.0).to_string()}/>
            }
        })
        .collect::<Vec<_>>()
    });

    let curve = || data.theoretical.iter().map(|(sum, p)| (f64::from(sum), p));
    let area = plot.points(
        std::iter::once((f64::from(MIN_SUM), 0.0))
            .chain(curve())
            .chain(std::iter::once((f64::from(MAX_SUM), 0.0))),
    );
    let ceiling = plot.y_range.1;

    html! {
        <svg class="chart distribution" viewBox={view_box()}>
            <text class="title" x={(WIDTH / 2.0).to_string()} y="14">{"Probability distribution"}</text>
            { plot.y_tick(0.0, "0".into()) }
            { plot.y_tick(ceiling / 2.0, format!("{:.2}", ceiling / 2.0)) }
            { plot.y_tick(ceiling, format!("{:.2}", ceiling)) }
            { for (MIN_SUM..=MAX_SUM).map(|sum| plot.x_tick(f64::from(sum), sum.to_string())) }
            { for bars }
            <polygon class="theory-area" points={area}/>
            <polyline class="theory" points={plot.points(curve())}/>
            { plot.frame() }
            <g class="legend">
                <text class="player-one" x={(WIDTH - 110.0).to_string()} y="14">{"P1"}</text>
                <text class="player-two" x={(WIDTH - 86.0).to_string()} y="14">{"P2"}</text>
                <text class="theory" x={(WIDTH - 62.0).to_string()} y="14">{"Theory"}</text>
            </g>
        </svg>
    }
}

#[function_component]
pub(crate) fn ConvergenceChart(props: &ChartProps) -> Html {
    let data = &props.data;
    let span = data.roll_span();
    let plot = Plot {
        x_range: (1.0, span as f64),
        y_range: (f64::from(MIN_SUM), f64::from(MAX_SUM)),
    };

    let lines = data.means.iter().map(|(id, means)| {
        let points = plot.points(
            means
                .iter()
                .enumerate()
                .map(|(i, &mean)| ((i + 1) as f64, mean)),
        );
        html! {
            <polyline class={classes!("mean", player_class(id))} points={points}/>
        }
    });
    let reference = plot.y(THEORETICAL_MEAN);

    html! {
        <svg class="chart convergence" viewBox={view_box()}>
            <text class="title" x={(WIDTH / 2.0).to_string()} y="14">{"Law of large numbers"}</text>
            { for [MIN_SUM, 7, MAX_SUM].map(|v| plot.y_tick(f64::from(v), v.to_string())) }
            { plot.x_tick(1.0, "1".into()) }
            { plot.x_tick(span as f64, span.to_string()) }
            <line class="reference"
                x1={PAD_LEFT.to_string()} y1={reference.to_string()}
                x2={(WIDTH - PAD_RIGHT).to_string()} y2={reference.to_string()}/>
            { for lines }
            { plot.frame() }
            <g class="legend">
                <text class="theory" x={(WIDTH - 150.0).to_string()} y={(reference - 4.0).to_string()}>
                    {format!("Theoretical mean = {:.1}", THEORETICAL_MEAN)}
                </text>
            </g>
        </svg>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statrace_core::{GameConfig, RaceEngine, Ruleset, ScriptedDice};

    fn engine_after(rolls: &[(u8, u8)]) -> RaceEngine {
        let mut engine = RaceEngine::new(GameConfig::new(Ruleset::Classic));
        let mut dice = ScriptedDice::new(rolls.iter().copied());
        for _ in rolls {
            engine.roll(&mut dice).unwrap();
        }
        engine
    }

    #[test]
    fn no_rolls_means_placeholder() {
        let engine = engine_after(&[]);
        assert_eq!(
            ChartData::from_players(engine.players()),
            Err(ChartError::NotEnoughData)
        );
    }

    #[test]
    fn single_roll_is_enough_to_plot() {
        let engine = engine_after(&[(3, 4)]);
        let data = ChartData::from_players(engine.players()).unwrap();
        assert!(data.empirical[PlayerId::One].is_some());
        assert!(data.empirical[PlayerId::Two].is_none());
        assert_eq!(data.means[PlayerId::One], vec![7.0]);
        assert_eq!(data.roll_span(), 2);
        assert!((data.frequency_ceiling() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn ceiling_covers_theoretical_peak() {
        let engine = engine_after(&[(1, 1), (2, 2), (3, 3), (4, 4), (5, 5), (6, 6), (1, 2), (2, 3)]);
        let data = ChartData::from_players(engine.players()).unwrap();
        assert!(data.frequency_ceiling() >= 6.0 / 36.0);
    }

    #[test]
    fn cache_rebuilds_only_when_dirty() {
        let engine = engine_after(&[(3, 4), (2, 2)]);
        let mut cache = ChartCache::new();
        assert!(cache.data().is_err());

        assert!(cache.refresh(engine.players()));
        assert!(cache.data().is_ok());
        assert!(!cache.refresh(engine.players()));

        cache.mark(PlayerId::Two);
        assert!(cache.is_dirty());
        assert!(cache.refresh(engine.players()));
        assert!(!cache.is_dirty());
    }

    #[test]
    fn plot_maps_domain_corners() {
        let plot = Plot {
            x_range: (0.0, 10.0),
            y_range: (0.0, 1.0),
        };
        assert!((plot.x(0.0) - PAD_LEFT).abs() < 1e-9);
        assert!((plot.x(10.0) - (WIDTH - PAD_RIGHT)).abs() < 1e-9);
        assert!((plot.y(0.0) - (HEIGHT - PAD_BOTTOM)).abs() < 1e-9);
        assert!((plot.y(1.0) - PAD_TOP).abs() < 1e-9);
    }

    #[test]
    fn dirty_flags_per_player() {
        assert_eq!(Dirty::player(PlayerId::One) | Dirty::player(PlayerId::Two), Dirty::all());
    }
}
