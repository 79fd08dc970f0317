use codewords::protocol::{ClientMessage, ServerMessage};
use codewords::state::AppState;
use codewords::types::*;
use codewords::ws::handlers::{handle_message, Session};
use std::sync::Arc;

/// Drive one command through the dispatch layer for a given session
async fn send(
    state: &Arc<AppState>,
    session: &mut Session,
    msg: ClientMessage,
) -> Option<ServerMessage> {
    handle_message(msg, session, state).await
}

/// Create a room and join three more players; returns the sessions in
/// order owner, then joiners
async fn four_player_room(state: &Arc<AppState>) -> (String, Vec<Session>) {
    let mut owner = Session::default();
    let welcome = send(
        state,
        &mut owner,
        ClientMessage::CreateRoom {
            name: "alice".to_string(),
            avatar: None,
            room_name: None,
            visibility: None,
        },
    )
    .await;

    let room_code = match welcome {
        Some(ServerMessage::Welcome { room, .. }) => room.room_code,
        other => panic!("Expected Welcome, got {:?}", other),
    };

    let mut sessions = vec![owner];
    for name in ["bob", "carol", "dave"] {
        let mut session = Session::default();
        let reply = send(
            state,
            &mut session,
            ClientMessage::JoinRoom {
                room_code: room_code.clone(),
                name: Some(name.to_string()),
                avatar: None,
                player_id: None,
            },
        )
        .await;
        assert!(
            matches!(reply, Some(ServerMessage::Welcome { .. })),
            "{name} failed to join"
        );
        sessions.push(session);
    }
    (room_code, sessions)
}

/// Seat the four players 2v2 (owner + second as red giver/guesser, third +
/// fourth as blue giver/guesser) and force red to start
async fn seat_and_start(state: &Arc<AppState>, room_code: &str, sessions: &mut [Session]) {
    let seats = [
        (Team::Red, PlayerRole::ClueGiver),
        (Team::Red, PlayerRole::Guesser),
        (Team::Blue, PlayerRole::ClueGiver),
        (Team::Blue, PlayerRole::Guesser),
    ];
    for (session, (team, role)) in sessions.iter_mut().zip(seats) {
        let reply = send(
            state,
            session,
            ClientMessage::SetLobbyRole {
                team: Some(team),
                role,
                target_player_id: None,
            },
        )
        .await;
        assert!(matches!(reply, Some(ServerMessage::RoomState { .. })));
    }

    // Deterministic starting team for the assertions below
    state
        .update_room(room_code, |s| {
            s.starting_team = Team::Red;
            Ok(())
        })
        .await
        .unwrap();

    let reply = send(state, &mut sessions[0], ClientMessage::StartGame).await;
    match reply {
        Some(ServerMessage::RoomState { room }) => {
            assert_eq!(room.phase, GamePhase::Clue);
            assert_eq!(room.current_team, Team::Red);
        }
        other => panic!("Expected RoomState after start, got {:?}", other),
    }
}

/// Index of an unrevealed card of the given hidden team, via the clue
/// giver's omniscient snapshot
async fn hidden_card(state: &Arc<AppState>, room_code: &str, team: CardTeam) -> usize {
    let snapshot = state.get_room_state(room_code).await.unwrap();
    snapshot
        .board
        .iter()
        .position(|c| c.team == team && !c.revealed)
        .expect("no hidden card of that team left")
}

#[tokio::test]
async fn test_full_game_flow_red_trap_loss() {
    let state = Arc::new(AppState::new());
    let (room_code, mut sessions) = four_player_room(&state).await;
    seat_and_start(&state, &room_code, &mut sessions).await;

    // 1. Red's clue giver submits a clue
    let reply = send(
        &state,
        &mut sessions[0],
        ClientMessage::GiveClue {
            word: "harvest".to_string(),
            count: 2,
        },
    )
    .await;
    match reply {
        Some(ServerMessage::RoomState { room }) => {
            assert_eq!(room.phase, GamePhase::Guess);
            assert_eq!(
                room.current_clue,
                Some(Clue {
                    word: "HARVEST".to_string(),
                    count: 2
                })
            );
            assert_eq!(room.remaining_guesses, Some(3));
        }
        other => panic!("Expected RoomState after clue, got {:?}", other),
    }

    // 2. Red's guesser reveals one of their own cards
    let red_card = hidden_card(&state, &room_code, CardTeam::Red).await;
    send(
        &state,
        &mut sessions[1],
        ClientMessage::VoteCard { index: red_card },
    )
    .await;
    let reply = send(
        &state,
        &mut sessions[1],
        ClientMessage::ConfirmReveal { index: red_card },
    )
    .await;
    match reply {
        Some(ServerMessage::RoomState { room }) => {
            assert!(room.board[red_card].revealed);
            assert_eq!(room.remaining_guesses, Some(2));
            assert_eq!(room.current_team, Team::Red, "turn continues");
        }
        other => panic!("Expected RoomState after reveal, got {:?}", other),
    }

    // 3. They hit the trap: instant loss, blue wins
    let trap = hidden_card(&state, &room_code, CardTeam::Trap).await;
    send(
        &state,
        &mut sessions[1],
        ClientMessage::VoteCard { index: trap },
    )
    .await;
    let reply = send(
        &state,
        &mut sessions[1],
        ClientMessage::ConfirmReveal { index: trap },
    )
    .await;
    match reply {
        Some(ServerMessage::RoomState { room }) => {
            assert_eq!(room.phase, GamePhase::GameOver);
            assert_eq!(room.winner, Some(Team::Blue));
        }
        other => panic!("Expected RoomState after trap, got {:?}", other),
    }

    // 4. Further guessing is rejected with a typed code
    let reply = send(
        &state,
        &mut sessions[1],
        ClientMessage::VoteCard { index: 0 },
    )
    .await;
    match reply {
        Some(ServerMessage::Error { code, .. }) => assert_eq!(code, "GAME_OVER"),
        other => panic!("Expected Error, got {:?}", other),
    }

    // 5. Owner rematches: fresh board, alternated start, same seats
    let reply = send(&state, &mut sessions[0], ClientMessage::Rematch).await;
    match reply {
        Some(ServerMessage::RoomState { room }) => {
            assert_eq!(room.phase, GamePhase::Clue);
            assert_eq!(room.starting_team, Team::Blue);
            assert!(room.board.iter().all(|c| !c.revealed));
            assert_eq!(room.winner, None);
        }
        other => panic!("Expected RoomState after rematch, got {:?}", other),
    }
}

#[tokio::test]
async fn test_authorization_rejections() {
    let state = Arc::new(AppState::new());
    let (_room_code, mut sessions) = four_player_room(&state).await;

    // Non-owner cannot start
    let reply = send(&state, &mut sessions[1], ClientMessage::StartGame).await;
    match reply {
        Some(ServerMessage::Error { code, .. }) => assert_eq!(code, "NOT_OWNER"),
        other => panic!("Expected Error, got {:?}", other),
    }

    // Owner cannot start with unseated teams
    let reply = send(&state, &mut sessions[0], ClientMessage::StartGame).await;
    match reply {
        Some(ServerMessage::Error { code, .. }) => assert_eq!(code, "TEAMS_NOT_READY"),
        other => panic!("Expected Error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_wrong_seat_commands_are_rejected() {
    let state = Arc::new(AppState::new());
    let (room_code, mut sessions) = four_player_room(&state).await;
    seat_and_start(&state, &room_code, &mut sessions).await;

    // Blue's clue giver cannot clue on red's turn
    let reply = send(
        &state,
        &mut sessions[2],
        ClientMessage::GiveClue {
            word: "harvest".to_string(),
            count: 1,
        },
    )
    .await;
    match reply {
        Some(ServerMessage::Error { code, .. }) => assert_eq!(code, "NOT_YOUR_TURN"),
        other => panic!("Expected Error, got {:?}", other),
    }

    // A guesser cannot vote before any clue is out
    let reply = send(&state, &mut sessions[1], ClientMessage::VoteCard { index: 0 }).await;
    match reply {
        Some(ServerMessage::Error { code, .. }) => assert_eq!(code, "NO_CLUE_GIVEN"),
        other => panic!("Expected Error, got {:?}", other),
    }

    // An illegal clue comes back with its specific reason
    let snapshot = state.get_room_state(&room_code).await.unwrap();
    let board_word = snapshot.board[0].word.clone();
    let reply = send(
        &state,
        &mut sessions[0],
        ClientMessage::GiveClue {
            word: board_word,
            count: 1,
        },
    )
    .await;
    match reply {
        Some(ServerMessage::Error { code, .. }) => {
            assert_eq!(code, "CLUE_MATCHES_BOARD_WORD")
        }
        other => panic!("Expected Error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_disconnect_pause_and_resume() {
    let state = Arc::new(AppState::new());
    let (room_code, mut sessions) = four_player_room(&state).await;
    seat_and_start(&state, &room_code, &mut sessions).await;

    send(
        &state,
        &mut sessions[0],
        ClientMessage::GiveClue {
            word: "harvest".to_string(),
            count: 2,
        },
    )
    .await;

    // Red's clue giver drops mid-guess: automatic pause
    let alice_id = sessions[0].player_id.clone().unwrap();
    state.disconnect_player(&room_code, &alice_id).await;

    let snapshot = state.get_room_state(&room_code).await.unwrap();
    assert_eq!(snapshot.phase(), GamePhase::Paused);
    assert_eq!(
        snapshot.pause_reason,
        Some(PauseReason::ClueGiverDisconnected)
    );

    // Voting is rejected while paused
    let reply = send(&state, &mut sessions[1], ClientMessage::VoteCard { index: 0 }).await;
    match reply {
        Some(ServerMessage::Error { code, .. }) => assert_eq!(code, "GAME_PAUSED"),
        other => panic!("Expected Error, got {:?}", other),
    }

    // Resume is rejected until the seat is staffed again
    let reply = send(&state, &mut sessions[1], ClientMessage::ResumeGame).await;
    match reply {
        Some(ServerMessage::Error { code, .. }) => assert_eq!(code, "CANNOT_RESUME"),
        other => panic!("Expected Error, got {:?}", other),
    }

    // The clue giver reconnects and resumes; play continues in Guess
    let mut returning = Session::default();
    let reply = send(
        &state,
        &mut returning,
        ClientMessage::JoinRoom {
            room_code: room_code.clone(),
            name: None,
            avatar: None,
            player_id: Some(alice_id.clone()),
        },
    )
    .await;
    assert!(matches!(reply, Some(ServerMessage::Welcome { .. })));

    let reply = send(&state, &mut returning, ClientMessage::ResumeGame).await;
    match reply {
        Some(ServerMessage::RoomState { room }) => {
            assert_eq!(room.phase, GamePhase::Guess);
            assert_eq!(room.pause_reason, None);
        }
        other => panic!("Expected RoomState after resume, got {:?}", other),
    }
}

#[tokio::test]
async fn test_kick_ban_and_room_lock() {
    let state = Arc::new(AppState::new());
    let (room_code, mut sessions) = four_player_room(&state).await;
    let bob_id = sessions[1].player_id.clone().unwrap();

    // Kick is owner-only
    let reply = send(
        &state,
        &mut sessions[2],
        ClientMessage::KickPlayer {
            player_id: bob_id.clone(),
        },
    )
    .await;
    match reply {
        Some(ServerMessage::Error { code, .. }) => assert_eq!(code, "NOT_OWNER"),
        other => panic!("Expected Error, got {:?}", other),
    }

    let reply = send(
        &state,
        &mut sessions[0],
        ClientMessage::KickPlayer {
            player_id: bob_id.clone(),
        },
    )
    .await;
    assert!(matches!(reply, Some(ServerMessage::RoomState { .. })));

    // The banned id cannot come back yet
    let mut bob_again = Session::default();
    let reply = send(
        &state,
        &mut bob_again,
        ClientMessage::JoinRoom {
            room_code: room_code.clone(),
            name: Some("bob".to_string()),
            avatar: None,
            player_id: Some(bob_id),
        },
    )
    .await;
    match reply {
        Some(ServerMessage::Error { code, .. }) => assert_eq!(code, "BANNED"),
        other => panic!("Expected Error, got {:?}", other),
    }

    // Locking blocks strangers
    send(
        &state,
        &mut sessions[0],
        ClientMessage::SetRoomLocked { locked: true },
    )
    .await;
    let mut stranger = Session::default();
    let reply = send(
        &state,
        &mut stranger,
        ClientMessage::JoinRoom {
            room_code: room_code.clone(),
            name: Some("erin".to_string()),
            avatar: None,
            player_id: None,
        },
    )
    .await;
    match reply {
        Some(ServerMessage::Error { code, .. }) => assert_eq!(code, "ROOM_LOCKED"),
        other => panic!("Expected Error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_commands_without_a_room_are_rejected() {
    let state = Arc::new(AppState::new());
    let mut session = Session::default();

    let reply = send(&state, &mut session, ClientMessage::StartGame).await;
    match reply {
        Some(ServerMessage::Error { code, .. }) => assert_eq!(code, "NOT_IN_ROOM"),
        other => panic!("Expected Error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_voluntary_end_turn_and_word_pack_change() {
    let state = Arc::new(AppState::new());
    let (room_code, mut sessions) = four_player_room(&state).await;

    // Pack change in the lobby regenerates the board
    let reply = send(
        &state,
        &mut sessions[0],
        ClientMessage::SetWordPacks {
            packs: vec!["mythology".to_string()],
            custom_words: vec![],
        },
    )
    .await;
    match reply {
        Some(ServerMessage::RoomState { room }) => {
            assert_eq!(room.word_packs, vec!["mythology".to_string()]);
        }
        other => panic!("Expected RoomState, got {:?}", other),
    }

    seat_and_start(&state, &room_code, &mut sessions).await;
    send(
        &state,
        &mut sessions[0],
        ClientMessage::GiveClue {
            word: "harvest".to_string(),
            count: 1,
        },
    )
    .await;

    let reply = send(&state, &mut sessions[1], ClientMessage::EndTurn).await;
    match reply {
        Some(ServerMessage::RoomState { room }) => {
            assert_eq!(room.current_team, Team::Blue);
            assert_eq!(room.phase, GamePhase::Clue);
        }
        other => panic!("Expected RoomState after end turn, got {:?}", other),
    }

    // Pack changes are locked once the game is live
    let reply = send(
        &state,
        &mut sessions[0],
        ClientMessage::SetWordPacks {
            packs: vec!["animals".to_string()],
            custom_words: vec![],
        },
    )
    .await;
    match reply {
        Some(ServerMessage::Error { code, .. }) => assert_eq!(code, "REASSIGNMENT_LOCKED"),
        other => panic!("Expected Error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_guesser_view_hides_teams_on_the_wire() {
    let state = Arc::new(AppState::new());
    let (room_code, mut sessions) = four_player_room(&state).await;
    seat_and_start(&state, &room_code, &mut sessions).await;

    send(
        &state,
        &mut sessions[0],
        ClientMessage::GiveClue {
            word: "harvest".to_string(),
            count: 1,
        },
    )
    .await;

    // Guesser's own projection after voting carries no hidden assignments
    let reply = send(&state, &mut sessions[1], ClientMessage::VoteCard { index: 0 }).await;
    match reply {
        Some(ServerMessage::RoomState { room }) => {
            assert!(room.board.iter().all(|c| c.team.is_none()));
            assert!(room.votes.get(&0).is_some());
        }
        other => panic!("Expected RoomState, got {:?}", other),
    }
}
