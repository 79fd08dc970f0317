//! Background tasks around the shared rooms map: the single elected
//! timeout trigger and the abandoned-room reaper.

use crate::game::timer::TimeoutLedger;
use crate::state::AppState;
use crate::types::Rejection;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

/// Sweep all rooms once and fire every due phase timeout. The ledger
/// guarantees at most one fire per `turn_start_time`; the transaction
/// re-validates against latest state so a turn that advanced between
/// snapshot and fire is left alone.
pub async fn fire_due_timeouts(state: &AppState, ledger: &mut TimeoutLedger) -> usize {
    let now = Utc::now();
    let room_ids = state.room_ids().await;
    ledger.retain_rooms(&room_ids);

    let mut fired = 0;
    for room_id in room_ids {
        let Some(game) = state.get_room_state(&room_id).await else {
            continue;
        };
        if !game.game_started || game.game_over || game.paused {
            continue;
        }
        let Some(turn_start) = game.turn_start_time else {
            continue;
        };
        if game.remaining_secs(now) != Some(0) {
            continue;
        }
        if !ledger.should_fire(&room_id, turn_start) {
            continue;
        }

        let result = state
            .update_room(&room_id, |s| {
                if s.turn_start_time != Some(turn_start) {
                    return Err(Rejection::Superseded);
                }
                s.timeout_end_turn(now)
            })
            .await;
        match result {
            Ok(()) => {
                tracing::info!("Phase timed out in room {}", room_id);
                fired += 1;
            }
            Err(Rejection::Superseded) => {}
            Err(e) => tracing::debug!("Timeout fire skipped in {}: {}", room_id, e),
        }
    }
    fired
}

/// Spawn the background task acting as this process's timeout trigger
/// owner. Clients also derive `timeout_owner` from the roster, but with
/// the session server-resident there is exactly one watcher per process
/// and duplicate fires cannot happen.
pub fn spawn_timeout_watcher(state: Arc<AppState>) {
    tokio::spawn(async move {
        let mut ledger = TimeoutLedger::new();
        loop {
            tokio::time::sleep(Duration::from_secs(1)).await;
            fire_due_timeouts(&state, &mut ledger).await;
        }
    });
}

/// Spawn the background task destroying rooms whose whole roster has been
/// gone longer than the abandonment timeout
pub fn spawn_room_reaper(state: Arc<AppState>) {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(60)).await;
            let reaped = state.reap_abandoned_rooms().await;
            if reaped > 0 {
                tracing::info!("Reaped {} abandoned rooms", reaped);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::*;
    use chrono::Duration as ChronoDuration;

    /// Room with a started 2v2 game, clock already expired
    async fn expired_room(state: &AppState) -> (RoomId, PlayerId) {
        let (room, owner_id) = state
            .create_room("alice".to_string(), None, None, None)
            .await
            .unwrap();
        let code = room.room_code.clone();

        let mut ids = vec![owner_id.clone()];
        for name in ["bob", "carol", "dave"] {
            let (_, id) = state
                .join_room(&code, Some(name.to_string()), None, None)
                .await
                .unwrap();
            ids.push(id);
        }

        let owner = owner_id.clone();
        state
            .update_room(&code, move |s| {
                for (i, id) in ids.iter().enumerate() {
                    let p = s.players.get_mut(id).ok_or(Rejection::UnknownPlayer)?;
                    p.team = Some(if i % 2 == 0 { Team::Red } else { Team::Blue });
                    p.role = Some(if i < 2 {
                        PlayerRole::ClueGiver
                    } else {
                        PlayerRole::Guesser
                    });
                }
                s.starting_team = Team::Red;
                s.start_game(&owner, Utc::now())?;
                s.turn_start_time = Some(Utc::now() - ChronoDuration::seconds(600));
                Ok(())
            })
            .await
            .unwrap();
        (code, owner_id)
    }

    #[tokio::test]
    async fn test_due_timeout_fires_exactly_once() {
        let state = AppState::new();
        let (code, _) = expired_room(&state).await;
        let before = state.get_room_state(&code).await.unwrap();
        assert_eq!(before.current_team, Team::Red);

        let mut ledger = TimeoutLedger::new();
        assert_eq!(fire_due_timeouts(&state, &mut ledger).await, 1);

        let after = state.get_room_state(&code).await.unwrap();
        assert_eq!(after.current_team, Team::Blue, "timeout passed the turn");

        // The fresh turn has a full budget: nothing further to fire
        assert_eq!(fire_due_timeouts(&state, &mut ledger).await, 0);
    }

    #[tokio::test]
    async fn test_already_fired_turn_start_is_not_fired_again() {
        let state = AppState::new();
        let (code, _) = expired_room(&state).await;
        let turn_start = state
            .get_room_state(&code)
            .await
            .unwrap()
            .turn_start_time
            .unwrap();

        // The trigger owner already actioned this expiry
        let mut ledger = TimeoutLedger::new();
        assert!(ledger.should_fire(&code, turn_start));

        assert_eq!(fire_due_timeouts(&state, &mut ledger).await, 0);
        let after = state.get_room_state(&code).await.unwrap();
        assert_eq!(after.current_team, Team::Red, "turn must not advance twice");
    }

    #[tokio::test]
    async fn test_paused_rooms_never_time_out() {
        let state = AppState::new();
        let (code, owner_id) = expired_room(&state).await;
        state
            .update_room(&code, |s| s.pause_game(&owner_id, Utc::now()))
            .await
            .unwrap();

        let mut ledger = TimeoutLedger::new();
        assert_eq!(fire_due_timeouts(&state, &mut ledger).await, 0);
        let after = state.get_room_state(&code).await.unwrap();
        assert_eq!(after.current_team, Team::Red);
    }
}
