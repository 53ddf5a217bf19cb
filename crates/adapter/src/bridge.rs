//! Game-loop side of the adapter.
//!
//! Applies inbound commands to a [`Game`] strictly one action at a time, in
//! arrival order, and produces the outbound replies: one observation per state
//! change, then one ack per command.

use arrayvec::ArrayVec;
use log::debug;

use crate::core::{Game, RandomSource};
use crate::protocol::{
    build_observation, create_ack, ObservationMessage, MAX_ACTIONS_PER_COMMAND,
};
use crate::runtime::{InboundCommand, InboundPayload, OutboundMessage};
use crate::types::TurnEvent;

/// What one inbound command did to the game.
#[derive(Debug, Clone, Default)]
pub struct ApplyOutcome {
    /// True if any action changed the state (an accepted move or a restart).
    pub changed: bool,
    /// True if the command contained a restart that was applied.
    pub restarted: bool,
    /// Turn events of the accepted moves, in order. A restart drops the events
    /// that came before it.
    pub events: ArrayVec<TurnEvent, MAX_ACTIONS_PER_COMMAND>,
}

/// Turns game state into numbered observations.
#[derive(Debug, Clone, Default)]
pub struct GameBridge {
    seq: u64,
}

impl GameBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Server-side sequence number for the next observation.
    pub fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    pub fn observe<R: RandomSource>(
        &mut self,
        game: &Game<R>,
        last_event: Option<&TurnEvent>,
    ) -> ObservationMessage {
        let seq = self.next_seq();
        build_observation(&game.snapshot(), seq, last_event)
    }

    /// Apply one inbound command, emitting replies through `emit`.
    ///
    /// Accepted moves are taken out of the game's last-event slot; the caller
    /// gets them back in the outcome.
    pub fn apply<R: RandomSource>(
        &mut self,
        game: &mut Game<R>,
        cmd: InboundCommand,
        mut emit: impl FnMut(OutboundMessage),
    ) -> ApplyOutcome {
        let mut outcome = ApplyOutcome::default();

        match cmd.payload {
            InboundPayload::SnapshotRequest => {
                let obs = self.observe(game, None);
                emit(OutboundMessage::ToClientObservation {
                    client_id: cmd.client_id,
                    obs,
                });
            }
            InboundPayload::Actions(actions) => {
                for action in actions {
                    if !game.apply_action(action) {
                        debug!(
                            "client {} seq {}: {} rejected",
                            cmd.client_id,
                            cmd.seq,
                            action.as_str()
                        );
                        continue;
                    }
                    outcome.changed = true;
                    let event = game.take_last_event();
                    match event {
                        Some(ev) => outcome.events.push(ev),
                        None => {
                            outcome.restarted = true;
                            outcome.events.clear();
                        }
                    }
                    let obs = self.observe(game, event.as_ref());
                    emit(OutboundMessage::BroadcastObservation { obs });
                }
                emit(OutboundMessage::ToClientAck {
                    client_id: cmd.client_id,
                    ack: create_ack(cmd.seq),
                });
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameState, Grid, SequenceRng};
    use crate::protocol::ActionBatch;
    use crate::types::GameAction;

    fn game() -> Game<SequenceRng> {
        let grid = Grid::from_values([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
        Game::from_state(GameState::from_grid(grid), SequenceRng::first_cell_twos())
    }

    fn actions(list: &[GameAction]) -> InboundCommand {
        InboundCommand {
            client_id: 1,
            seq: 10,
            payload: InboundPayload::Actions(list.iter().copied().collect::<ActionBatch>()),
        }
    }

    #[test]
    fn applies_in_order_then_acks() {
        let mut bridge = GameBridge::new();
        let mut game = game();
        let mut out = Vec::new();

        let outcome = bridge.apply(
            &mut game,
            actions(&[GameAction::MoveLeft, GameAction::MoveUp, GameAction::MoveDown]),
            |m| out.push(m),
        );

        // Left merges, up is a no-op on the top row, down slides.
        assert!(outcome.changed);
        assert!(!outcome.restarted);
        assert_eq!(outcome.events.len(), 2);
        assert_eq!(outcome.events[0].score_gained, 4);
        assert_eq!(outcome.events[1].score_gained, 0);
        assert_eq!(game.score(), 4);
        assert_eq!(game.move_count(), 2);

        assert_eq!(out.len(), 3);
        let seqs: Vec<u64> = out
            .iter()
            .filter_map(|m| match m {
                OutboundMessage::BroadcastObservation { obs } => Some(obs.seq),
                _ => None,
            })
            .collect();
        assert_eq!(seqs, vec![1, 2]);
        match out.last() {
            Some(OutboundMessage::ToClientAck { client_id, ack }) => {
                assert_eq!(*client_id, 1);
                assert_eq!(ack.seq, 10);
            }
            other => panic!("expected ack last, got {:?}", other),
        }
    }

    #[test]
    fn rejected_only_command_still_acks() {
        let mut bridge = GameBridge::new();
        let mut game = game();
        let mut out = Vec::new();
        let outcome = bridge.apply(&mut game, actions(&[GameAction::MoveUp]), |m| out.push(m));
        assert!(!outcome.changed);
        assert_eq!(out.len(), 1);
        assert!(matches!(out[0], OutboundMessage::ToClientAck { .. }));
    }

    #[test]
    fn restart_is_a_state_change_without_event() {
        let mut bridge = GameBridge::new();
        let mut game = game();
        let mut out = Vec::new();
        let outcome = bridge.apply(&mut game, actions(&[GameAction::Restart]), |m| out.push(m));
        assert!(outcome.changed);
        assert!(outcome.restarted);
        assert!(outcome.events.is_empty());
        assert_eq!(game.episode_id(), 1);
        match &out[0] {
            OutboundMessage::BroadcastObservation { obs } => {
                assert_eq!(obs.episode_id, 1);
                assert!(obs.last_event.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn restart_drops_earlier_events() {
        let grid = Grid::from_values([[1024, 1024, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
        let mut game =
            Game::from_state(GameState::from_grid(grid), SequenceRng::first_cell_twos());
        let mut bridge = GameBridge::new();
        let mut out = Vec::new();

        let outcome = bridge.apply(
            &mut game,
            actions(&[GameAction::MoveLeft, GameAction::Restart]),
            |m| out.push(m),
        );
        assert!(outcome.restarted);
        assert!(outcome.events.is_empty());
        assert!(!game.won());

        // Moves after the restart are kept.
        let outcome = bridge.apply(
            &mut game,
            actions(&[GameAction::Restart, GameAction::MoveLeft, GameAction::MoveRight]),
            |m| out.push(m),
        );
        assert!(outcome.restarted);
        assert!(!outcome.events.is_empty());
        assert!(outcome.events.len() <= 2);
    }

    #[test]
    fn snapshot_request_goes_to_one_client() {
        let mut bridge = GameBridge::new();
        let mut game = game();
        let mut out = Vec::new();
        let cmd = InboundCommand {
            client_id: 7,
            seq: 1,
            payload: InboundPayload::SnapshotRequest,
        };
        let outcome = bridge.apply(&mut game, cmd, |m| out.push(m));
        assert!(!outcome.changed);
        match &out[..] {
            [OutboundMessage::ToClientObservation { client_id, obs }] => {
                assert_eq!(*client_id, 7);
                assert_eq!(obs.grid[0], [2, 2, 0, 0]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
