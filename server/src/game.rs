use crate::{ledger, util, BotRunner, Database, Sender, ServerError, ToSqlJson, ToSqlStr};
use log::info;
use rand_distr::Gamma;
use rusqlite::{params, Transaction};
use spades_api::{
    Bid, BotStrategy, Card, Game, GameEvent, GameId, GameOptions, Occupant, Profile, Seat, Seed,
    UserId,
};
use std::{
    collections::{hash_map::Entry, HashMap, HashSet},
    sync::Arc,
};
use tokio::{
    sync::{mpsc, mpsc::UnboundedReceiver, Mutex},
    task,
};

#[derive(Clone)]
pub struct Games {
    db: &'static Database,
    bot_delay: Option<Gamma<f32>>,
    inner: Arc<Mutex<HashMap<GameId, Arc<Mutex<Game<Sender>>>>>>,
}

impl Games {
    pub fn new(db: &'static Database, delay: bool) -> Self {
        Self {
            db,
            bot_delay: if delay {
                Some(Gamma::new(2.5, 0.8).unwrap())
            } else {
                None
            },
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn db(&self) -> &'static Database {
        self.db
    }

    pub async fn ping(&self) {
        let mut inner = self.inner.lock().await;
        let mut unwatched = Vec::new();
        for (game_id, game) in inner.iter() {
            let mut game = game.lock().await;
            broadcast(&mut game, &GameEvent::Ping);
            if game.subscribers.is_empty() {
                unwatched.push(*game_id);
            }
        }
        for game_id in unwatched {
            inner.remove(&game_id);
        }
    }

    async fn with_game<F, T>(&self, game_id: GameId, f: F) -> Result<T, ServerError>
    where
        F: FnOnce(&mut Game<Sender>) -> Result<T, ServerError>,
    {
        let mut launch_bots = false;
        let game = {
            let mut inner = self.inner.lock().await;
            match inner.entry(game_id) {
                Entry::Occupied(entry) => Arc::clone(entry.get()),
                Entry::Vacant(entry) => {
                    let game = Arc::new(Mutex::new(Game::new()));
                    entry.insert(Arc::clone(&game));
                    launch_bots = true;
                    game
                }
            }
        };
        let mut game = game.lock().await;
        if game.events.is_empty() {
            self.db
                .run_read_only(|tx| hydrate_events(&tx, game_id, &mut game))?;
        }
        if game.events.is_empty() {
            Err(ServerError::UnknownGame(game_id))
        } else {
            if launch_bots {
                for &seat in &Seat::VALUES {
                    if let Occupant::Bot { profile, strategy } = game.roster.get(seat).clone() {
                        self.run_bot(game_id, seat, profile.user_id, strategy, &mut game);
                    }
                }
            }
            f(&mut game)
        }
    }

    fn run_bot(
        &self,
        game_id: GameId,
        seat: Seat,
        user_id: UserId,
        strategy: BotStrategy,
        game: &mut Game<Sender>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let tx = Sender::new(tx, None);
        task::spawn(BotRunner::new(game_id, seat, user_id, strategy).run(
            self.clone(),
            rx,
            self.bot_delay,
        ));
        self.replay_events(game, &tx, Some(seat));
        game.bots.push((seat, tx));
        info!(
            "run_bot: game_id={}, seat={}, user_id={}, strategy={:?}",
            game_id, seat, user_id, strategy
        );
    }

    pub fn create_game(
        &self,
        user_id: UserId,
        options: GameOptions,
        seed: Seed,
    ) -> Result<GameId, ServerError> {
        let game_id = GameId::new();
        let event = GameEvent::Create { options, seed };
        let result = self.db.run_with_retry(|tx| {
            tx.execute(
                "INSERT INTO game (game_id, created_time, created_by) VALUES (?, ?, ?)",
                params![game_id.sql(), util::timestamp(), user_id.sql()],
            )?;
            persist_events(&tx, game_id, 0, &[event.clone()])
        });
        info!(
            "create_game: game_id={}, user_id={}, error={:?}",
            game_id,
            user_id,
            result.as_ref().err()
        );
        result.map(|()| game_id)
    }

    pub async fn join_game(
        &self,
        game_id: GameId,
        user_id: UserId,
        name: String,
        seat: Seat,
    ) -> Result<(), ServerError> {
        let result = self
            .with_game(game_id, |game| {
                if game.seat(user_id).is_some() {
                    return Err(ServerError::AlreadySeated(user_id, game_id));
                }
                game.verify_seat_human(seat)?;
                let event = GameEvent::SeatHuman {
                    seat,
                    profile: Profile::new(user_id, name),
                };
                self.db.run_with_retry(|tx| {
                    persist_events(&tx, game_id, game.events.len(), &[event.clone()])
                })?;
                game.apply(&event, |g, e| broadcast(g, e));
                Ok(())
            })
            .await;
        info!(
            "join_game: game_id={}, user_id={}, seat={}, error={:?}",
            game_id,
            user_id,
            seat,
            result.as_ref().err()
        );
        result
    }

    pub async fn seat_bot(
        &self,
        game_id: GameId,
        user_id: UserId,
        seat: Seat,
        strategy: BotStrategy,
    ) -> Result<UserId, ServerError> {
        let result = self
            .with_game(game_id, |game| {
                game.verify_seat_bot(user_id, seat)?;
                let bot_id = UserId::new();
                let event = GameEvent::SeatBot {
                    seat,
                    profile: Profile::new(bot_id, bot_name(strategy)),
                    strategy,
                };
                self.db.run_with_retry(|tx| {
                    persist_events(&tx, game_id, game.events.len(), &[event.clone()])
                })?;
                game.apply(&event, |g, e| broadcast(g, e));
                self.run_bot(game_id, seat, bot_id, strategy, game);
                Ok(bot_id)
            })
            .await;
        info!(
            "seat_bot: game_id={}, user_id={}, seat={}, error={:?}",
            game_id,
            user_id,
            seat,
            result.as_ref().err()
        );
        result
    }

    pub async fn remove_bot(
        &self,
        game_id: GameId,
        user_id: UserId,
        seat: Seat,
    ) -> Result<(), ServerError> {
        let result = self
            .with_game(game_id, |game| {
                game.verify_remove_bot(user_id, seat)?;
                let event = GameEvent::RemoveBot { seat };
                self.db.run_with_retry(|tx| {
                    persist_events(&tx, game_id, game.events.len(), &[event.clone()])
                })?;
                game.apply(&event, |g, e| broadcast(g, e));
                // closes the channel and ends the runner
                game.bots.retain(|(s, _)| *s != seat);
                Ok(())
            })
            .await;
        info!(
            "remove_bot: game_id={}, user_id={}, seat={}, error={:?}",
            game_id,
            user_id,
            seat,
            result.as_ref().err()
        );
        result
    }

    pub async fn leave_game(&self, game_id: GameId, user_id: UserId) -> Result<(), ServerError> {
        let result = self
            .with_game(game_id, |game| match game.seat(user_id) {
                None => Err(ServerError::InvalidPlayer(user_id, game_id)),
                Some(seat) => {
                    let event = GameEvent::VacateSeat { seat };
                    self.db.run_with_retry(|tx| {
                        persist_events(&tx, game_id, game.events.len(), &[event.clone()])
                    })?;
                    game.apply(&event, |g, e| broadcast(g, e));
                    Ok(!game.roster.has_human())
                }
            })
            .await;
        info!(
            "leave_game: game_id={}, user_id={}, error={:?}",
            game_id,
            user_id,
            result.as_ref().err()
        );
        match result {
            Ok(abandoned) => {
                if abandoned {
                    self.inner.lock().await.remove(&game_id);
                }
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    pub async fn start_game(&self, game_id: GameId, user_id: UserId) -> Result<(), ServerError> {
        let result = self
            .with_game(game_id, |game| {
                if game.seat(user_id).is_none() {
                    return Err(ServerError::InvalidPlayer(user_id, game_id));
                }
                if game.state.dealer.is_some() || !game.state.phase.is_waiting() {
                    return Err(ServerError::GameHasStarted(game_id));
                }
                if !game.roster.is_full() {
                    return Err(ServerError::NotEnoughPlayers);
                }
                let deal = game.next_deal_event()?;
                let buy_in = game.state.options.buy_in;
                let humans = game.roster.humans().collect::<Vec<_>>();
                self.db.run_with_retry(|tx| {
                    for &user_id in &humans {
                        if ledger::account(&tx, user_id)?.balance < buy_in {
                            return Err(ServerError::InsufficientFunds(user_id));
                        }
                    }
                    for &user_id in &humans {
                        ledger::charge_buy_in(&tx, game_id, user_id, buy_in)?;
                    }
                    persist_events(&tx, game_id, game.events.len(), &[deal.clone()])
                })?;
                game.apply(&deal, |g, e| broadcast(g, e));
                Ok(())
            })
            .await;
        info!(
            "start_game: game_id={}, user_id={}, error={:?}",
            game_id,
            user_id,
            result.as_ref().err()
        );
        result
    }

    pub async fn bid(&self, game_id: GameId, user_id: UserId, bid: Bid) -> Result<(), ServerError> {
        let result = self
            .with_game(game_id, |game| match game.seat(user_id) {
                None => Err(ServerError::InvalidPlayer(user_id, game_id)),
                Some(seat) => {
                    game.verify_bid(seat, bid)?;
                    let event = GameEvent::Bid { seat, bid };
                    self.db.run_with_retry(|tx| {
                        persist_events(&tx, game_id, game.events.len(), &[event.clone()])
                    })?;
                    game.apply(&event, |g, e| broadcast(g, e));
                    Ok(())
                }
            })
            .await;
        info!(
            "bid: game_id={}, user_id={}, bid={}, error={:?}",
            game_id,
            user_id,
            bid,
            result.as_ref().err()
        );
        result
    }

    pub async fn play_card(
        &self,
        game_id: GameId,
        user_id: UserId,
        card: Card,
    ) -> Result<bool, ServerError> {
        let result = self
            .with_game(game_id, |game| match game.seat(user_id) {
                None => Err(ServerError::InvalidPlayer(user_id, game_id)),
                Some(seat) => {
                    game.verify_play(seat, card)?;
                    let mut events = vec![GameEvent::Play { seat, card }];
                    let ends_hand = game.hands.iter().map(|hand| hand.len()).sum::<usize>() == 1;
                    let mut settled = None;
                    if ends_hand {
                        // Peek at the post-play state so the next deal, or the
                        // payout, lands in the same transaction as the play.
                        let mut preview = game.state.clone();
                        preview.apply(&events[0]);
                        if preview.phase.is_complete() {
                            let winning_unit = preview.scoreboard.winning_unit();
                            let mode = preview.options.mode;
                            let mut winners = Vec::new();
                            let mut losers = Vec::new();
                            for &seat in &Seat::VALUES {
                                let occupant = game.roster.get(seat);
                                if let (true, Some(user_id)) =
                                    (occupant.is_human(), occupant.user_id())
                                {
                                    if mode.unit(seat) == winning_unit {
                                        winners.push(user_id);
                                    } else {
                                        losers.push(user_id);
                                    }
                                }
                            }
                            settled = Some((winning_unit, winners, losers));
                        } else {
                            let dealer = game.roster.assign_dealer(preview.dealer)?;
                            events.push(game.seed.deal(dealer, preview.history.len() as u32));
                        }
                    }
                    self.db.run_with_retry(|tx| {
                        persist_events(&tx, game_id, game.events.len(), &events)?;
                        if let Some((winning_unit, winners, losers)) = &settled {
                            tx.execute(
                                "UPDATE game SET completed_time = ?, winning_unit = ? \
                                 WHERE game_id = ?",
                                params![util::timestamp(), *winning_unit as i64, game_id.sql()],
                            )?;
                            ledger::settle(&tx, game_id, winners, losers)?;
                        }
                        Ok(())
                    })?;
                    for event in events {
                        game.apply(&event, |g, e| broadcast(g, e));
                    }
                    Ok(game.state.phase.is_complete())
                }
            })
            .await;
        info!(
            "play: game_id={}, user_id={}, card={}, error={:?}",
            game_id,
            user_id,
            card,
            result.as_ref().err()
        );
        result
    }

    pub async fn subscribe(
        &self,
        game_id: GameId,
        user_id: UserId,
        last_event_id: Option<usize>,
    ) -> Result<UnboundedReceiver<(GameEvent, usize)>, ServerError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let tx = Sender::new(tx, last_event_id);
        self.with_game(game_id, |game| {
            let seat = game.seat(user_id);
            let mut subscribers = game
                .subscribers
                .iter()
                .map(|(user_id, _)| *user_id)
                .collect::<HashSet<_>>();
            if subscribers.insert(user_id) {
                broadcast(game, &GameEvent::JoinGame { user_id });
            }
            self.replay_events(game, &tx, seat);
            tx.send(GameEvent::EndReplay { subscribers });
            game.subscribers.push((user_id, tx));
            Ok(())
        })
        .await?;
        info!("subscribe: game_id={}, user_id={}", game_id, user_id);
        Ok(rx)
    }

    fn replay_events(&self, game: &Game<Sender>, tx: &Sender, seat: Option<Seat>) {
        let mut copy: Game<Sender> = Game::new();
        for event in &game.events {
            copy.apply(event, |_, e| {
                tx.send(e.redact(seat));
            });
        }
    }
}

fn bot_name(strategy: BotStrategy) -> String {
    match strategy {
        BotStrategy::Heuristic => "heuristic bot".to_string(),
        BotStrategy::Random => "random bot".to_string(),
    }
}

fn broadcast(game: &mut Game<Sender>, event: &GameEvent) {
    let roster = game.roster.clone();
    let mut disconnects = HashSet::new();
    game.subscribers.retain(|(user_id, tx)| {
        let seat = roster.seat_of(*user_id);
        if tx.send(event.redact(seat)) {
            true
        } else {
            disconnects.insert(*user_id);
            false
        }
    });
    if !disconnects.is_empty() {
        for (user_id, _) in &game.subscribers {
            disconnects.remove(user_id);
        }
        for user_id in disconnects {
            broadcast(game, &GameEvent::LeaveGame { user_id });
        }
    }
    for (seat, bot) in &game.bots {
        bot.send(event.redact(Some(*seat)));
    }
}

pub fn persist_events(
    tx: &Transaction,
    game_id: GameId,
    event_id: usize,
    events: &[GameEvent],
) -> Result<(), ServerError> {
    let mut stmt = tx.prepare_cached(
        "INSERT INTO event (game_id, event_id, timestamp, event) VALUES (?, ?, ?, ?)",
    )?;
    let timestamp = util::timestamp();
    let mut event_id = event_id as i64;
    for event in events {
        stmt.execute(params![game_id.sql(), event_id, timestamp, event.sql()])?;
        event_id += 1;
    }
    Ok(())
}

fn hydrate_events(
    tx: &Transaction,
    game_id: GameId,
    game: &mut Game<Sender>,
) -> Result<(), ServerError> {
    let mut stmt = tx.prepare_cached(
        "SELECT event FROM event WHERE game_id = ? AND event_id >= ? ORDER BY event_id",
    )?;
    let mut rows = stmt.query(params![game_id.sql(), game.events.len() as i64])?;
    while let Some(row) = rows.next()? {
        let event = serde_json::from_str(&row.get::<_, String>(0)?)?;
        game.apply(&event, |_, _| {});
    }
    Ok(())
}
