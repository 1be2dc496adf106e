use tracing::info;

use super::GameFlowService;
use crate::domain::scoring::{apply_round_scoring, game_winner};
use crate::domain::seed::derive_dealing_seed;
use crate::domain::state::{
    check_card_conservation, dealer_for_round, round_start_seat, RoundState,
};
use crate::domain::{deal_round, DomainError, Phase};
use crate::services::events::GameEvent;
use crate::services::games::GameSession;

impl GameFlowService {
    /// Advance through transient phases until the game waits on a player.
    ///
    /// Dealing and RoundScoring never persist across commands: a command
    /// that lands in one of them keeps applying transitions - tally the
    /// round, deal the next one, or end the game - inside the same critical
    /// section.
    pub(super) fn run_transitions(
        &self,
        session: &mut GameSession,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), DomainError> {
        // Each iteration deals a round or ends the game, so the schedule
        // length bounds the loop.
        for _ in 0..=session.config.total_rounds() as usize + 1 {
            match session.state.phase {
                Phase::Dealing => {
                    let next_round = session.state.round_no.map_or(1, |r| r + 1);
                    self.begin_round(session, next_round)?;
                }
                Phase::RoundScoring => self.finish_round(session, events)?,
                _ => return Ok(()),
            }
        }
        Err(DomainError::invariant("phase transitions did not settle"))
    }

    /// Deal a round: rotate the dealer, shuffle with the derived seed, fix
    /// trump, and open bidding left of the dealer.
    fn begin_round(&self, session: &mut GameSession, round_no: u8) -> Result<(), DomainError> {
        let player_count = session.state.player_count;
        let hand_size = session
            .config
            .hand_size_for_round(round_no)
            .ok_or_else(|| {
                DomainError::invariant(format!("round {round_no} is past the schedule"))
            })?;

        session.state.phase = Phase::Dealing;
        let dealer = dealer_for_round(0, round_no, player_count);
        let seed = derive_dealing_seed(session.seed, round_no);
        let dealt = deal_round(
            player_count,
            hand_size,
            dealer,
            seed,
            session.config.trump_policy,
        )?;

        let mut round = RoundState::empty(player_count);
        round.trump = Some(dealt.trump);
        round.upcard = dealt.upcard;
        // Carry the closed round's summary into the new round's display.
        round.previous_round = session.state.round.previous_round.take();

        session.state.round = round;
        session.state.hands = dealt.hands;
        session.state.round_no = Some(round_no);
        session.state.hand_size = Some(hand_size);
        session.state.dealer = Some(dealer);
        session.state.phase = Phase::Bidding;
        session.state.turn = Some(round_start_seat(dealer, player_count));
        session.state.leader = None;

        check_card_conservation(&session.state)?;
        info!(
            game_id = %session.game_id,
            round_no,
            hand_size,
            dealer,
            trump = ?session.state.round.trump,
            "round dealt"
        );
        Ok(())
    }

    /// Tally the finished round, then deal the next one or end the game.
    fn finish_round(
        &self,
        session: &mut GameSession,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), DomainError> {
        let result = apply_round_scoring(&mut session.state)?;
        events.push(GameEvent::RoundScored {
            round_no: result.round_no,
            deltas: result.deltas,
        });

        if result.round_no >= session.config.total_rounds() {
            let winner = game_winner(&session.state, session.config.tie_break);
            session.state.phase = Phase::GameEnd;
            session.state.winner = Some(winner);
            session.state.turn = None;
            session.state.leader = None;
            info!(
                game_id = %session.game_id,
                winner,
                scores = ?session.state.scores_total,
                "game over"
            );
            events.push(GameEvent::GameEnded {
                winner,
                final_scores: session.state.scores_total.clone(),
            });
        } else {
            session.state.phase = Phase::Dealing;
        }
        Ok(())
    }
}
