use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Menu,
    PowerSelection,
    Playing,
    Finished,
}

impl Phase {
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Finished)
    }

    const fn initial(ruleset: Ruleset) -> Self {
        if ruleset.has_powers() {
            Self::Menu
        } else {
            Self::Playing
        }
    }
}

/// Effects queued by a power for the next roll.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pending {
    pub double_next: bool,
    pub extra_turn: bool,
}

/// Whole state of one race session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RaceEngine {
    config: GameConfig,
    board: Board,
    players: PlayerPair<Player>,
    turn: PlayerId,
    selecting: PlayerId,
    phase: Phase,
    winner: Option<PlayerId>,
    pending: Pending,
}

impl RaceEngine {
    pub fn new(config: GameConfig) -> Self {
        Self::with_board(config, config.ruleset.board())
    }

    pub fn with_board(config: GameConfig, board: Board) -> Self {
        Self {
            config,
            board,
            players: PlayerPair::from_fn(Player::new),
            turn: PlayerId::One,
            selecting: PlayerId::One,
            phase: Phase::initial(config.ruleset),
            winner: None,
            pending: Pending::default(),
        }
    }

    /// Back to the opening phase with fresh players, keeping config and board.
    pub fn reset(&mut self) {
        log::debug!("reset session ({:?})", self.config.ruleset);
        *self = Self::with_board(self.config, self.board.clone());
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_finished()
    }

    pub fn turn(&self) -> PlayerId {
        self.turn
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// Player whose power is being chosen, while in [`Phase::PowerSelection`].
    pub fn selecting(&self) -> Option<PlayerId> {
        matches!(self.phase, Phase::PowerSelection).then_some(self.selecting)
    }

    pub fn pending(&self) -> Pending {
        self.pending
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id]
    }

    pub fn players(&self) -> &PlayerPair<Player> {
        &self.players
    }

    pub fn positions(&self) -> PlayerPair<Position> {
        self.players.map(Player::position)
    }

    /// Whether the acting player could activate a power right now.
    pub fn can_activate_power(&self) -> bool {
        self.phase.is_playing() && self.players[self.turn].power().is_ready()
    }

    /// Leaves the menu for the power selection screen.
    pub fn start(&mut self) -> Result<()> {
        if self.phase != Phase::Menu {
            return Err(GameError::NotInMenu);
        }
        self.phase = Phase::PowerSelection;
        self.selecting = PlayerId::One;
        log::debug!("power selection started");
        Ok(())
    }

    /// Gives `power` to the selecting player. The race begins once both have chosen.
    pub fn select_power(&mut self, power: Power) -> Result<PlayerId> {
        if self.phase != Phase::PowerSelection {
            return Err(GameError::NotSelecting);
        }

        let chooser = self.selecting;
        *self.players[chooser].power_mut() = PowerSlot::Ready(power);
        log::debug!("player {} picked {:?}", chooser.number(), power);

        match chooser {
            PlayerId::One => self.selecting = PlayerId::Two,
            PlayerId::Two => {
                self.phase = Phase::Playing;
                log::debug!("race started");
            }
        }
        Ok(chooser)
    }

    pub fn select_power_index(&mut self, index: usize) -> Result<PlayerId> {
        let power = Power::from_index(index)?;
        self.select_power(power)
    }

    /// Spends the acting player's power and applies its effect.
    pub fn activate_power(&mut self) -> Result<PowerOutcome> {
        self.check_playing()?;

        let actor = self.turn;
        let (player, opponent) = self.players.split_mut(actor);
        let power = player.power_mut().spend()?;

        match power {
            Power::DoubleDice => self.pending.double_next = true,
            Power::PushBack => {
                let pushed = opponent.position().saturating_sub(Power::PUSH_BACK_SQUARES);
                opponent.set_position(pushed);
            }
            Power::SwapPositions => {
                let mine = player.position();
                player.set_position(opponent.position());
                opponent.set_position(mine);
            }
            Power::ExtraTurn => self.pending.extra_turn = true,
        }
        log::debug!("player {} used {:?}", actor.number(), power);

        Ok(PowerOutcome {
            player: actor,
            power,
            positions: self.positions(),
        })
    }

    /// Resolves one turn for the acting player with a throw from `dice`.
    pub fn roll<D: DiceSource + ?Sized>(&mut self, dice: &mut D) -> Result<RollOutcome> {
        self.check_playing()?;

        let actor = self.turn;
        let roll = dice.roll();
        let doubled = core::mem::take(&mut self.pending.double_next);
        let sum = if doubled {
            roll.sum().saturating_mul(2)
        } else {
            roll.sum()
        };
        let movement = self.config.movement(sum);

        let player = &mut self.players[actor];
        player.record(roll);

        let landed = player.position().saturating_add(movement);
        // effects fire once on the landing square, never on the square they lead to
        let landmark = self.board.landmark_at(landed);
        let mut position = landmark
            .as_ref()
            .map_or(landed, |landmark| landmark.square.apply(landed));
        if let Some(landmark) = &landmark {
            log::trace!("{} on square {} moves token to {}", landmark.label, landed, position);
        }

        let last_square = self.board.last_square();
        let turn_end = if position >= last_square {
            position = last_square;
            self.winner = Some(actor);
            self.phase = Phase::Finished;
            log::debug!("player {} wins", actor.number());
            TurnEnd::Won
        } else if core::mem::take(&mut self.pending.extra_turn) {
            TurnEnd::Repeated
        } else {
            self.turn = actor.other();
            TurnEnd::Passed
        };
        player.set_position(position);

        log::debug!(
            "player {} rolled {}+{}{} -> square {}",
            actor.number(),
            roll.first,
            roll.second,
            if doubled { " (doubled)" } else { "" },
            position
        );

        Ok(RollOutcome {
            player: actor,
            roll,
            doubled,
            movement,
            landed,
            landmark,
            position,
            turn_end,
        })
    }

    fn check_playing(&self) -> Result<()> {
        match self.phase {
            Phase::Playing => Ok(()),
            Phase::Finished => Err(GameError::AlreadyEnded),
            Phase::Menu | Phase::PowerSelection => Err(GameError::NotPlaying),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn classic() -> RaceEngine {
        RaceEngine::new(GameConfig::new(Ruleset::Classic))
    }

    fn powers_in_play(one: Power, two: Power) -> RaceEngine {
        let mut engine = RaceEngine::new(GameConfig::new(Ruleset::Powers));
        engine.start().unwrap();
        engine.select_power(one).unwrap();
        engine.select_power(two).unwrap();
        engine
    }

    fn place(engine: &mut RaceEngine, id: PlayerId, position: Position) {
        engine.players[id].set_position(position);
    }

    #[test]
    fn first_roll_moves_and_passes_turn() {
        let mut engine = classic();
        let mut dice = ScriptedDice::new([(3, 4)]);

        let outcome = engine.roll(&mut dice).unwrap();

        assert_eq!(outcome.roll.sum(), 7);
        assert_eq!(outcome.landmark, None);
        assert_eq!(outcome.turn_end, TurnEnd::Passed);
        assert_eq!(engine.player(PlayerId::One).position(), 7);
        assert_eq!(engine.player(PlayerId::One).sums(), vec![7]);
        assert_eq!(engine.turn(), PlayerId::Two);
    }

    #[test]
    fn unlucky_square_sets_back_once() {
        let mut engine = powers_in_play(Power::PushBack, Power::PushBack);
        place(&mut engine, PlayerId::One, 5);
        // 5 + 2 = 7 (Pit, -3) -> 4, which is itself an unlucky square and must not fire
        let outcome = engine.roll(&mut ScriptedDice::new([(1, 1)])).unwrap();

        assert_eq!(outcome.landed, 7);
        assert_eq!(outcome.landmark.map(|l| l.square), Some(Square::Unlucky(3)));
        assert_eq!(engine.player(PlayerId::One).position(), 4);
    }

    #[test]
    fn lucky_square_moves_forward() {
        let mut engine = powers_in_play(Power::PushBack, Power::PushBack);
        // 0 + 3 = 3 (Shortcut, +2) -> 5
        engine.roll(&mut ScriptedDice::new([(1, 2)])).unwrap();
        assert_eq!(engine.player(PlayerId::One).position(), 5);
    }

    #[test]
    fn reaching_goal_clamps_and_finishes() {
        let mut engine = classic();
        place(&mut engine, PlayerId::One, 27);
        let mut dice = ScriptedDice::new([(6, 6), (2, 2)]);

        let outcome = engine.roll(&mut dice).unwrap();

        assert!(outcome.is_win());
        assert_eq!(engine.player(PlayerId::One).position(), 29);
        assert_eq!(engine.winner(), Some(PlayerId::One));
        assert_eq!(engine.phase(), Phase::Finished);

        let before = engine.positions();
        assert_eq!(engine.roll(&mut dice), Err(GameError::AlreadyEnded));
        assert_eq!(engine.positions(), before);
        assert_eq!(engine.winner(), Some(PlayerId::One));
        assert_eq!(dice.remaining(), 1);
    }

    #[test]
    fn power_rejected_after_win() {
        let mut engine = powers_in_play(Power::PushBack, Power::PushBack);
        place(&mut engine, PlayerId::One, 27);
        assert!(engine.roll(&mut ScriptedDice::new([(6, 6)])).unwrap().is_win());

        let before = engine.positions();
        assert!(!engine.can_activate_power());
        assert_eq!(engine.activate_power(), Err(GameError::AlreadyEnded));
        assert_eq!(engine.positions(), before);
        assert!(engine.player(PlayerId::One).power().is_ready());
    }

    #[test]
    fn win_overrides_pending_extra_turn() {
        let mut engine = powers_in_play(Power::ExtraTurn, Power::PushBack);
        engine.activate_power().unwrap();
        place(&mut engine, PlayerId::One, 27);

        let outcome = engine.roll(&mut ScriptedDice::new([(1, 1)])).unwrap();
        assert_eq!(outcome.turn_end, TurnEnd::Won);
        assert_eq!(engine.winner(), Some(PlayerId::One));
        assert_eq!(engine.phase(), Phase::Finished);
        assert_eq!(
            engine.roll(&mut ScriptedDice::new([(1, 1)])),
            Err(GameError::AlreadyEnded)
        );
    }

    #[test]
    fn lucky_square_can_carry_onto_goal() {
        let mut engine = powers_in_play(Power::PushBack, Power::PushBack);
        place(&mut engine, PlayerId::One, 26);
        // 26 + 2 = 28 (Almost, +1) -> 29
        let outcome = engine.roll(&mut ScriptedDice::new([(1, 1)])).unwrap();

        assert_eq!(outcome.landed, 28);
        assert_eq!(outcome.landmark.as_ref().map(|l| l.square), Some(Square::Lucky(1)));
        assert_eq!(outcome.position, 29);
        assert!(outcome.is_win());
        assert_eq!(engine.winner(), Some(PlayerId::One));
    }

    #[test]
    fn history_records_raw_dice() {
        let mut engine = classic();
        let mut dice = ScriptedDice::new([(1, 6), (2, 5), (6, 6), (1, 1)]);
        for _ in 0..4 {
            engine.roll(&mut dice).unwrap();
        }
        for (_, player) in engine.players().iter() {
            for roll in player.rolls() {
                assert!((2..=12).contains(&roll.sum()));
                assert_eq!(roll.sum(), roll.first + roll.second);
            }
        }
        assert_eq!(engine.player(PlayerId::One).sums(), vec![7, 12]);
        assert_eq!(engine.player(PlayerId::Two).sums(), vec![7, 2]);
    }

    #[test]
    fn random_games_move_backwards_only_on_unlucky_squares() {
        for seed in 0..20 {
            let mut engine = classic();
            let mut dice = RandomDice::new(seed);
            let mut guard = 0;
            while !engine.is_finished() && guard < 500 {
                let before = engine.positions();
                let outcome = engine.roll(&mut dice).unwrap();
                guard += 1;

                let mover = outcome.player;
                assert_eq!(engine.positions()[mover.other()], before[mover.other()]);
                if outcome.position < before[mover] {
                    assert!(matches!(
                        outcome.landmark.map(|l| l.square),
                        Some(Square::Unlucky(_))
                    ));
                }
                assert!(outcome.position <= engine.board().last_square());
            }

            let winner = engine.winner();
            assert!(winner.is_some());
            assert_eq!(engine.roll(&mut dice), Err(GameError::AlreadyEnded));
            assert_eq!(engine.winner(), winner);
        }
    }

    #[test]
    fn movement_cap_limits_step() {
        let mut engine = RaceEngine::new(GameConfig::new(Ruleset::Classic).with_max_step(Some(5)));
        let outcome = engine.roll(&mut ScriptedDice::new([(6, 6)])).unwrap();
        assert_eq!(outcome.movement, 5);
        // square 5 is a +3 shortcut on the classic board
        assert_eq!(engine.player(PlayerId::One).position(), 8);
    }

    #[test]
    fn powers_require_selection_phase_flow() {
        let mut engine = RaceEngine::new(GameConfig::default());
        assert_eq!(engine.phase(), Phase::Menu);
        assert_eq!(engine.roll(&mut ScriptedDice::default()), Err(GameError::NotPlaying));
        assert_eq!(engine.select_power(Power::ExtraTurn), Err(GameError::NotSelecting));

        engine.start().unwrap();
        assert_eq!(engine.start(), Err(GameError::NotInMenu));
        assert_eq!(engine.selecting(), Some(PlayerId::One));
        assert_eq!(engine.select_power_index(9), Err(GameError::UnknownPower(9)));
        assert_eq!(engine.select_power_index(0), Ok(PlayerId::One));
        assert_eq!(engine.selecting(), Some(PlayerId::Two));
        assert_eq!(engine.select_power_index(3), Ok(PlayerId::Two));
        assert_eq!(engine.phase(), Phase::Playing);
        assert_eq!(engine.selecting(), None);
        assert_eq!(engine.player(PlayerId::Two).power(), PowerSlot::Ready(Power::ExtraTurn));
    }

    #[test]
    fn double_dice_applies_to_next_roll_only() {
        let mut engine = powers_in_play(Power::DoubleDice, Power::PushBack);
        engine.activate_power().unwrap();
        assert!(engine.pending().double_next);

        // 2 * (1 + 4) = 10, plain square on the powers board
        let outcome = engine.roll(&mut ScriptedDice::new([(1, 4)])).unwrap();
        assert!(outcome.doubled);
        assert_eq!(outcome.movement, 10);
        assert_eq!(engine.player(PlayerId::One).position(), 10);
        assert_eq!(engine.player(PlayerId::One).sums(), vec![5]);
        assert!(!engine.pending().double_next);

        let outcome = engine.roll(&mut ScriptedDice::new([(1, 4)])).unwrap();
        assert!(!outcome.doubled);
        assert_eq!(outcome.movement, 5);
    }

    #[test]
    fn push_back_floors_at_zero() {
        let mut engine = powers_in_play(Power::PushBack, Power::PushBack);
        place(&mut engine, PlayerId::Two, 2);
        let outcome = engine.activate_power().unwrap();
        assert_eq!(outcome.positions[PlayerId::Two], 0);

        assert_eq!(engine.activate_power(), Err(GameError::PowerUnavailable));
    }

    #[test]
    fn swap_exchanges_positions() {
        let mut engine = powers_in_play(Power::SwapPositions, Power::PushBack);
        place(&mut engine, PlayerId::One, 2);
        place(&mut engine, PlayerId::Two, 19);
        engine.activate_power().unwrap();
        assert_eq!(engine.positions(), PlayerPair::new(19, 2));
        assert_eq!(engine.player(PlayerId::One).power(), PowerSlot::Spent(Power::SwapPositions));
    }

    #[test]
    fn extra_turn_suppresses_one_switch() {
        let mut engine = powers_in_play(Power::ExtraTurn, Power::PushBack);
        engine.activate_power().unwrap();

        let outcome = engine.roll(&mut ScriptedDice::new([(1, 1)])).unwrap();
        assert_eq!(outcome.turn_end, TurnEnd::Repeated);
        assert_eq!(engine.turn(), PlayerId::One);

        let outcome = engine.roll(&mut ScriptedDice::new([(1, 1)])).unwrap();
        assert_eq!(outcome.turn_end, TurnEnd::Passed);
        assert_eq!(engine.turn(), PlayerId::Two);
    }

    #[test]
    fn only_acting_player_power_is_used() {
        let mut engine = powers_in_play(Power::PushBack, Power::SwapPositions);
        engine.roll(&mut ScriptedDice::new([(1, 1)])).unwrap();
        assert_eq!(engine.turn(), PlayerId::Two);
        let outcome = engine.activate_power().unwrap();
        assert_eq!(outcome.player, PlayerId::Two);
        assert_eq!(outcome.power, Power::SwapPositions);
        assert!(engine.player(PlayerId::One).power().is_ready());
    }

    #[test]
    fn classic_has_no_powers() {
        let mut engine = classic();
        assert!(!engine.can_activate_power());
        assert_eq!(engine.activate_power(), Err(GameError::PowerUnavailable));
        assert_eq!(engine.start(), Err(GameError::NotInMenu));
    }

    #[test]
    fn reset_returns_to_opening_phase() {
        let mut engine = powers_in_play(Power::DoubleDice, Power::ExtraTurn);
        engine.activate_power().unwrap();
        engine.roll(&mut ScriptedDice::new([(2, 3)])).unwrap();

        engine.reset();

        assert_eq!(engine.phase(), Phase::Menu);
        assert_eq!(engine.turn(), PlayerId::One);
        assert_eq!(engine.winner(), None);
        assert_eq!(engine.pending(), Pending::default());
        for (id, player) in engine.players().iter() {
            assert_eq!(*player, Player::new(id));
        }

        let mut engine = classic();
        engine.roll(&mut ScriptedDice::new([(2, 3)])).unwrap();
        engine.reset();
        assert_eq!(engine.phase(), Phase::Playing);
    }
}
