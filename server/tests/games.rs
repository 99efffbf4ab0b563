use spades_api::{
    Bid, BotStrategy, GameError, GameEvent, GameId, GameMode, GameOptions, Seat, Seed, UserId,
};
use spades_server::{ledger, Database, Games, ServerError};
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;

fn setup(dir: &TempDir) -> Games {
    let _ = env_logger::builder().is_test(true).try_init();
    let db = Box::leak(Box::new(Database::new(dir.path().join("spades.db")).unwrap()));
    Games::new(db, false)
}

fn options(buy_in: i64, win_threshold: i32, loss_threshold: i32) -> GameOptions {
    GameOptions {
        mode: GameMode::Partners,
        buy_in,
        win_threshold,
        loss_threshold,
    }
}

async fn replay(games: &Games, game_id: GameId, user_id: UserId) -> Vec<GameEvent> {
    let mut rx = games.subscribe(game_id, user_id, None).await.unwrap();
    let mut events = Vec::new();
    while let Some((event, _)) = rx.recv().await {
        if let GameEvent::EndReplay { .. } = event {
            break;
        }
        events.push(event);
    }
    events
}

/// Spawns a task that bids a flat 3 and plays its highest legal card
/// whenever `seat` is on turn.
fn drive(games: Games, game_id: GameId, user_id: UserId, seat: Seat) {
    tokio::spawn(async move {
        let mut rx = games.subscribe(game_id, user_id, None).await.unwrap();
        while let Some((event, _)) = rx.recv().await {
            match event {
                GameEvent::BidStatus { next_bidder } if next_bidder == seat => {
                    let _ = games.bid(game_id, user_id, Bid::Tricks { count: 3 }).await;
                }
                GameEvent::PlayStatus {
                    next_player,
                    legal_plays,
                } if next_player == seat && !legal_plays.is_empty() => {
                    let _ = games.play_card(game_id, user_id, legal_plays.max()).await;
                }
                GameEvent::GameComplete { .. } => break,
                _ => {}
            }
        }
    });
}

/// Plays the host seat to completion against the three seated bots and
/// returns the winning unit.
async fn finish_as_host(games: &Games, game_id: GameId, host: UserId) -> usize {
    let mut rx = games.subscribe(game_id, host, None).await.unwrap();
    games.start_game(game_id, host).await.unwrap();
    loop {
        let (event, _) = rx.recv().await.unwrap();
        match event {
            GameEvent::BidStatus {
                next_bidder: Seat::North,
            } => {
                games
                    .bid(game_id, host, Bid::Tricks { count: 3 })
                    .await
                    .unwrap();
            }
            GameEvent::PlayStatus {
                next_player: Seat::North,
                legal_plays,
            } => {
                games
                    .play_card(game_id, host, legal_plays.max())
                    .await
                    .unwrap();
            }
            GameEvent::GameComplete { winning_unit, .. } => return winning_unit,
            _ => {}
        }
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_game() {
    let dir = tempfile::tempdir().unwrap();
    let games = setup(&dir);
    let game_id = GameId::new();
    assert!(matches!(
        games.bid(game_id, UserId::new(), Bid::Nil).await,
        Err(ServerError::UnknownGame(id)) if id == game_id
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_seating_permissions() {
    let dir = tempfile::tempdir().unwrap();
    let games = setup(&dir);
    let host = UserId::new();
    let game_id = games
        .create_game(host, GameOptions::default(), Seed::random())
        .unwrap();
    games
        .join_game(game_id, host, "host".into(), Seat::North)
        .await
        .unwrap();
    assert!(matches!(
        games
            .seat_bot(game_id, UserId::new(), Seat::East, BotStrategy::Random)
            .await,
        Err(ServerError::Rules {
            source: GameError::PermissionDenied(..)
        })
    ));
    games
        .seat_bot(game_id, host, Seat::East, BotStrategy::Random)
        .await
        .unwrap();
    assert!(matches!(
        games
            .join_game(game_id, UserId::new(), "late".into(), Seat::East)
            .await,
        Err(ServerError::Rules {
            source: GameError::SeatOccupied(Seat::East)
        })
    ));
    let friend = UserId::new();
    games
        .join_game(game_id, friend, "friend".into(), Seat::South)
        .await
        .unwrap();
    assert!(matches!(
        games
            .seat_bot(game_id, friend, Seat::West, BotStrategy::Random)
            .await,
        Err(ServerError::Rules {
            source: GameError::PermissionDenied(..)
        })
    ));
    assert!(matches!(
        games.remove_bot(game_id, host, Seat::West).await,
        Err(ServerError::Rules {
            source: GameError::NotABot(Seat::West)
        })
    ));
    games.remove_bot(game_id, host, Seat::East).await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_start_requires_full_table() {
    let dir = tempfile::tempdir().unwrap();
    let games = setup(&dir);
    let host = UserId::new();
    let game_id = games
        .create_game(host, GameOptions::default(), Seed::random())
        .unwrap();
    games
        .join_game(game_id, host, "host".into(), Seat::North)
        .await
        .unwrap();
    assert!(matches!(
        games.start_game(game_id, host).await,
        Err(ServerError::NotEnoughPlayers)
    ));
    assert!(matches!(
        games.start_game(game_id, UserId::new()).await,
        Err(ServerError::InvalidPlayer(..))
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_game_runs_to_completion_with_bots() {
    let dir = tempfile::tempdir().unwrap();
    let games = setup(&dir);
    let host = UserId::new();
    let game_id = games
        .create_game(
            host,
            options(0, 150, -150),
            Seed::Chosen {
                value: "integration".into(),
            },
        )
        .unwrap();
    games
        .join_game(game_id, host, "host".into(), Seat::North)
        .await
        .unwrap();
    for &seat in &[Seat::East, Seat::South, Seat::West] {
        games
            .seat_bot(game_id, host, seat, BotStrategy::Random)
            .await
            .unwrap();
    }
    finish_as_host(&games, game_id, host).await;
    assert!(matches!(
        games.bid(game_id, host, Bid::Nil).await,
        Err(ServerError::Rules { .. })
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_buy_in_debited_and_pot_settled() {
    let dir = tempfile::tempdir().unwrap();
    let games = setup(&dir);
    let host = UserId::new();
    let game_id = games
        .create_game(host, options(100, 150, -150), Seed::random())
        .unwrap();
    games
        .join_game(game_id, host, "host".into(), Seat::North)
        .await
        .unwrap();
    for &seat in &[Seat::East, Seat::South, Seat::West] {
        games
            .seat_bot(game_id, host, seat, BotStrategy::Random)
            .await
            .unwrap();
    }
    let winning_unit = finish_as_host(&games, game_id, host).await;
    let account = games
        .db()
        .run_read_only(|tx| ledger::account(&tx, host))
        .unwrap();
    assert_eq!(account.wins + account.losses, 1);
    if winning_unit == 0 {
        // the host is the only human, so the whole pot flows back
        assert_eq!(account.wins, 1);
        assert_eq!(account.balance, ledger::STARTING_BALANCE);
    } else {
        assert_eq!(account.losses, 1);
        assert_eq!(account.balance, ledger::STARTING_BALANCE - 100);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_insufficient_funds_blocks_start() {
    let dir = tempfile::tempdir().unwrap();
    let games = setup(&dir);
    let host = UserId::new();
    let game_id = games
        .create_game(host, options(2000, 500, -200), Seed::random())
        .unwrap();
    games
        .join_game(game_id, host, "host".into(), Seat::North)
        .await
        .unwrap();
    for &seat in &[Seat::East, Seat::South, Seat::West] {
        games
            .seat_bot(game_id, host, seat, BotStrategy::Random)
            .await
            .unwrap();
    }
    assert!(matches!(
        games.start_game(game_id, host).await,
        Err(ServerError::InsufficientFunds(id)) if id == host
    ));
    let account = games
        .db()
        .run_read_only(|tx| ledger::account(&tx, host))
        .unwrap();
    assert_eq!(account.balance, ledger::STARTING_BALANCE);
    assert!(matches!(
        games.bid(game_id, host, Bid::Nil).await,
        Err(ServerError::Rules { .. })
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_hydration_after_restart() {
    let dir = tempfile::tempdir().unwrap();
    let games = setup(&dir);
    let users = [UserId::new(), UserId::new(), UserId::new(), UserId::new()];
    let game_id = games
        .create_game(users[0], GameOptions::default(), Seed::random())
        .unwrap();
    for (idx, &seat) in Seat::VALUES.iter().enumerate() {
        games
            .join_game(game_id, users[idx], format!("player{}", idx), seat)
            .await
            .unwrap();
    }
    games.start_game(game_id, users[0]).await.unwrap();

    // a second registry over the same database sees the same game
    let restarted = Games::new(games.db(), false);
    let events = replay(&restarted, game_id, users[0]).await;
    let next_bidder = events
        .iter()
        .rev()
        .find_map(|event| match event {
            GameEvent::BidStatus { next_bidder } => Some(*next_bidder),
            _ => None,
        })
        .unwrap();
    let hand = events
        .iter()
        .find_map(|event| match event {
            GameEvent::Deal { north, .. } => Some(*north),
            _ => None,
        })
        .unwrap();
    assert_eq!(hand.len(), 13);
    restarted
        .bid(game_id, users[next_bidder.idx()], Bid::Tricks { count: 3 })
        .await
        .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_bot_fills_vacated_seat_mid_hand() {
    let dir = tempfile::tempdir().unwrap();
    let games = setup(&dir);
    let users = [UserId::new(), UserId::new(), UserId::new(), UserId::new()];
    let game_id = games
        .create_game(users[0], GameOptions::default(), Seed::random())
        .unwrap();
    for (idx, &seat) in Seat::VALUES.iter().enumerate() {
        games
            .join_game(game_id, users[idx], format!("player{}", idx), seat)
            .await
            .unwrap();
    }
    let mut rx = games.subscribe(game_id, users[0], None).await.unwrap();
    games.start_game(game_id, users[0]).await.unwrap();
    games.leave_game(game_id, users[1]).await.unwrap();
    // East's partner sits across at West and may fill the empty seat
    assert!(matches!(
        games
            .seat_bot(game_id, users[0], Seat::East, BotStrategy::Heuristic)
            .await,
        Err(ServerError::Rules {
            source: GameError::PermissionDenied(..)
        })
    ));
    games
        .seat_bot(game_id, users[3], Seat::East, BotStrategy::Heuristic)
        .await
        .unwrap();
    for &seat in &[Seat::North, Seat::South, Seat::West] {
        drive(games.clone(), game_id, users[seat.idx()], seat);
    }
    loop {
        let (event, _) = rx.recv().await.unwrap();
        if let GameEvent::HandComplete { scores, .. } = event {
            assert_eq!(scores.len(), 4);
            break;
        }
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_subscribe_resumes_after_last_event_id() {
    let dir = tempfile::tempdir().unwrap();
    let games = setup(&dir);
    let host = UserId::new();
    let game_id = games
        .create_game(host, GameOptions::default(), Seed::random())
        .unwrap();
    games
        .join_game(game_id, host, "host".into(), Seat::North)
        .await
        .unwrap();
    let mut rx: UnboundedReceiver<(GameEvent, usize)> =
        games.subscribe(game_id, host, Some(1)).await.unwrap();
    let (event, event_id) = rx.recv().await.unwrap();
    assert!(matches!(event, GameEvent::SeatHuman { .. }));
    assert_eq!(event_id, 2);
    let (event, event_id) = rx.recv().await.unwrap();
    assert!(matches!(event, GameEvent::EndReplay { .. }));
    assert_eq!(event_id, 0);
}
