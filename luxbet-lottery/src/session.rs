use crate::prediction::{PredictionProvider, Suggestion};
use crate::ticker::RoundTicker;
use crate::{PeriodId, Result, ResultFeed, RoundScheduler, SettledResult, TickOutcome};
use luxbet_core::{GameConfig, Player, Rupees};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

const EVENT_CAPACITY: usize = 256;

/// Change notifications for whatever renders the game screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Tick { period: PeriodId, remaining: u32 },
    Settled(SettledResult),
    SelectionChanged { period: PeriodId, number: u8 },
    BetPlaced { period: PeriodId, number: u8 },
    SuggestionStarted { period: PeriodId },
    SuggestionApplied { period: PeriodId, suggestion: Suggestion },
    SuggestionDiscarded { suggestion: Suggestion },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionOutcome {
    Applied(Suggestion),
    /// Arrived after the bet was locked or the round settled.
    Discarded(Suggestion),
    /// Another request for this session is still in flight.
    Busy,
    /// The bet is already placed; nothing was requested.
    Locked,
}

/// Owned copy of everything the game screen draws.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub session_id: Uuid,
    pub period: PeriodId,
    pub time_remaining: u32,
    pub countdown: String,
    pub urgent: bool,
    pub selected_number: Option<u8>,
    pub bet_locked: bool,
    pub suggestion_pending: bool,
    pub results: Vec<SettledResult>,
    pub balance: Rupees,
    pub stake: Rupees,
    pub potential_win: Option<Rupees>,
}

impl GameSnapshot {
    pub fn feed(&self) -> ResultFeed<'_> {
        if self.results.is_empty() {
            ResultFeed::Waiting
        } else {
            ResultFeed::Results(&self.results)
        }
    }
}

struct Shared {
    scheduler: Mutex<RoundScheduler>,
    events: broadcast::Sender<GameEvent>,
    suggestion_busy: AtomicBool,
}

impl Shared {
    fn emit(&self, event: GameEvent) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }

    /// Events go out while the scheduler lock is held, so observers see
    /// them in the same order as the state changes.
    fn on_tick(&self) {
        let mut scheduler = self.scheduler.lock();
        if let TickOutcome::Settled(result) = scheduler.tick() {
            self.emit(GameEvent::Settled(result));
        }
        let round = scheduler.round();
        self.emit(GameEvent::Tick {
            period: round.period(),
            remaining: round.time_remaining(),
        });
    }
}

/// Releases the in-flight flag however the request future ends.
struct SuggestionGuard<'a> {
    busy: &'a AtomicBool,
}

impl<'a> SuggestionGuard<'a> {
    fn acquire(busy: &'a AtomicBool) -> Option<Self> {
        busy.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { busy })
    }
}

impl Drop for SuggestionGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// The active game screen: one scheduler, its ticker and its observers.
/// The ticker runs from `enter` until `leave` or drop.
pub struct GameSession {
    id: Uuid,
    config: GameConfig,
    player: Player,
    provider: Arc<dyn PredictionProvider>,
    shared: Arc<Shared>,
    ticker: Mutex<Option<RoundTicker>>,
}

impl GameSession {
    /// Start a session with a freshly seeded scheduler. Needs a tokio runtime.
    pub fn enter(
        config: GameConfig,
        player: Player,
        provider: Arc<dyn PredictionProvider>,
    ) -> Result<Self> {
        let scheduler = RoundScheduler::new(&config);
        Self::enter_with_scheduler(config, player, provider, scheduler)
    }

    pub fn enter_with_scheduler(
        config: GameConfig,
        player: Player,
        provider: Arc<dyn PredictionProvider>,
        scheduler: RoundScheduler,
    ) -> Result<Self> {
        config.validate()?;

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let shared = Arc::new(Shared {
            scheduler: Mutex::new(scheduler),
            events,
            suggestion_busy: AtomicBool::new(false),
        });

        let tick_shared = shared.clone();
        let ticker = RoundTicker::spawn(config.tick_interval, move || tick_shared.on_tick());

        let id = Uuid::new_v4();
        tracing::info!(
            "Game session {} entered by {} at period {}",
            id,
            player.username,
            shared.scheduler.lock().round().period()
        );

        Ok(Self {
            id,
            config,
            player,
            provider,
            shared,
            ticker: Mutex::new(Some(ticker)),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.ticker.lock().as_ref().is_some_and(RoundTicker::is_active)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.shared.events.subscribe()
    }

    pub fn suggestion_pending(&self) -> bool {
        self.shared.suggestion_busy.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let scheduler = self.shared.scheduler.lock();
        let round = scheduler.round();
        let selected_number = round.selected_number();

        GameSnapshot {
            session_id: self.id,
            period: round.period(),
            time_remaining: round.time_remaining(),
            countdown: round.countdown_label(),
            urgent: round.is_urgent(self.config.urgent_seconds),
            selected_number,
            bet_locked: round.bet_locked(),
            suggestion_pending: self.suggestion_pending(),
            results: scheduler.results().all().to_vec(),
            balance: self.player.balance,
            stake: self.config.bet.stake,
            potential_win: selected_number.map(|_| self.config.bet.potential_win()),
        }
    }

    /// Pick a number. Returns whether the pick was taken.
    pub fn select_number(&self, number: u8) -> bool {
        let mut scheduler = self.shared.scheduler.lock();
        match scheduler.select_number(number) {
            Ok(()) => {
                let period = scheduler.round().period();
                self.shared
                    .emit(GameEvent::SelectionChanged { period, number });
                true
            }
            Err(e) => {
                tracing::debug!("Selection of {} ignored: {}", number, e);
                false
            }
        }
    }

    /// Lock the current pick in. Balance is never touched.
    pub fn place_bet(&self) -> bool {
        let mut scheduler = self.shared.scheduler.lock();
        match scheduler.place_bet() {
            Ok(()) => {
                let round = scheduler.round();
                self.shared.emit(GameEvent::BetPlaced {
                    period: round.period(),
                    number: round.selected_number().unwrap_or_default(),
                });
                true
            }
            Err(e) => {
                tracing::debug!("Bet ignored: {}", e);
                false
            }
        }
    }

    /// Ask the provider for a number and pre-fill the pick with it.
    ///
    /// At most one request runs per session. The answer only lands if the
    /// round it was requested for is still open and unlocked.
    pub async fn request_suggestion(&self) -> SuggestionOutcome {
        let (period, _guard) = {
            let scheduler = self.shared.scheduler.lock();
            if scheduler.round().bet_locked() {
                return SuggestionOutcome::Locked;
            }
            let Some(guard) = SuggestionGuard::acquire(&self.shared.suggestion_busy) else {
                tracing::debug!("Suggestion already in flight for session {}", self.id);
                return SuggestionOutcome::Busy;
            };
            let period = scheduler.round().period();
            self.shared.emit(GameEvent::SuggestionStarted { period });
            (period, guard)
        };

        let suggestion = self.provider.request_suggestion().await;

        let mut scheduler = self.shared.scheduler.lock();
        if scheduler.accepts_suggestion(period)
            && scheduler.select_number(suggestion.number).is_ok()
        {
            self.shared.emit(GameEvent::SuggestionApplied {
                period,
                suggestion: suggestion.clone(),
            });
            SuggestionOutcome::Applied(suggestion)
        } else {
            tracing::debug!(
                "Discarding stale suggestion #{} requested in period {}",
                suggestion.number,
                period
            );
            self.shared.emit(GameEvent::SuggestionDiscarded {
                suggestion: suggestion.clone(),
            });
            SuggestionOutcome::Discarded(suggestion)
        }
    }

    /// Leave the game screen and release the timer.
    pub fn leave(&self) {
        if let Some(ticker) = self.ticker.lock().take() {
            ticker.cancel();
            tracing::info!("Game session {} left", self.id);
        }
    }
}

impl Drop for GameSession {
    fn drop(&mut self) {
        self.leave();
    }
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("id", &self.id)
            .field("player", &self.player.username)
            .field("active", &self.is_active())
            .field("suggestion_pending", &self.suggestion_pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prediction::SuggestionSource;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use tokio::time;

    struct FixedPredictor {
        delay: Duration,
        number: u8,
        calls: AtomicUsize,
    }

    impl FixedPredictor {
        fn new(delay: Duration, number: u8) -> Arc<Self> {
            Arc::new(Self {
                delay,
                number,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl PredictionProvider for FixedPredictor {
        async fn request_suggestion(&self) -> Suggestion {
            self.calls.fetch_add(1, Ordering::SeqCst);
            time::sleep(self.delay).await;
            Suggestion {
                number: self.number,
                reason: "fixed".to_string(),
                source: SuggestionSource::Model,
            }
        }
    }

    fn session(provider: Arc<dyn PredictionProvider>) -> GameSession {
        let config = GameConfig::default();
        let scheduler = RoundScheduler::with_seed(&config, 1);
        GameSession::enter_with_scheduler(config, Player::demo(), provider, scheduler).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_round_settles_after_sixty_ticks() {
        let session = session(FixedPredictor::new(Duration::ZERO, 1));
        let mut events = session.subscribe();

        let mut ticks = 0;
        let settled = loop {
            match events.recv().await.unwrap() {
                GameEvent::Tick { remaining, .. } => {
                    ticks += 1;
                    assert!((1..=60).contains(&remaining));
                }
                GameEvent::Settled(result) => break result,
                other => panic!("unexpected event {:?}", other),
            }
        };

        assert_eq!(ticks, 59);
        assert_eq!(settled.period, "202310240001");
        assert!((1..=50).contains(&settled.winning_number));

        let snapshot = session.snapshot();
        assert_eq!(snapshot.period, PeriodId(202310240002));
        assert_eq!(snapshot.time_remaining, 60);
        assert_eq!(snapshot.results, vec![settled]);
        assert!(matches!(snapshot.feed(), ResultFeed::Results(r) if r.len() == 1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_bet_freezes_selection() {
        let session = session(FixedPredictor::new(Duration::ZERO, 1));

        assert!(!session.place_bet());
        assert!(session.select_number(7));
        assert!(session.place_bet());
        assert!(!session.select_number(12));

        let snapshot = session.snapshot();
        assert_eq!(snapshot.feed(), ResultFeed::Waiting);
        assert_eq!(snapshot.selected_number, Some(7));
        assert!(snapshot.bet_locked);
        assert_eq!(snapshot.balance, Rupees(300));
        assert_eq!(snapshot.potential_win, Some(Rupees(1650)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_suggestions_apply_once() {
        let provider = FixedPredictor::new(Duration::from_secs(1), 21);
        let session = session(provider.clone());

        let (first, second) = tokio::join!(
            session.request_suggestion(),
            session.request_suggestion()
        );

        let outcomes = [first, second];
        let applied = outcomes
            .iter()
            .filter(|o| matches!(o, SuggestionOutcome::Applied(_)))
            .count();
        assert_eq!(applied, 1);
        assert!(outcomes.contains(&SuggestionOutcome::Busy));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.snapshot().selected_number, Some(21));
        assert!(!session.suggestion_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_suggestion_discarded_after_bet() {
        let session = session(FixedPredictor::new(Duration::from_secs(2), 33));

        let (outcome, _) = tokio::join!(session.request_suggestion(), async {
            assert!(session.suggestion_pending());
            assert!(session.select_number(3));
            assert!(session.place_bet());
        });

        assert!(matches!(outcome, SuggestionOutcome::Discarded(ref s) if s.number == 33));
        assert_eq!(session.snapshot().selected_number, Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_suggestion_discarded_after_settlement() {
        let session = session(FixedPredictor::new(Duration::from_secs(61), 44));

        let outcome = session.request_suggestion().await;

        assert!(matches!(outcome, SuggestionOutcome::Discarded(_)));
        let snapshot = session.snapshot();
        assert_eq!(snapshot.period, PeriodId(202310240002));
        assert_eq!(snapshot.selected_number, None);
        assert_eq!(snapshot.results.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_locked_round_skips_provider() {
        let provider = FixedPredictor::new(Duration::ZERO, 5);
        let session = session(provider.clone());
        session.select_number(8);
        session.place_bet();

        assert_eq!(session.request_suggestion().await, SuggestionOutcome::Locked);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_leave_stops_countdown() {
        let session = session(FixedPredictor::new(Duration::ZERO, 1));
        time::sleep(Duration::from_millis(5500)).await;
        assert_eq!(session.snapshot().time_remaining, 55);
        assert!(session.is_active());

        session.leave();
        assert!(!session.is_active());

        time::sleep(Duration::from_secs(30)).await;
        assert_eq!(session.snapshot().time_remaining, 55);
    }

    #[tokio::test(start_paused = true)]
    async fn test_suggestion_while_open_is_applied() {
        let session = session(FixedPredictor::new(Duration::from_millis(1500), 12));
        let mut events = session.subscribe();

        assert!(matches!(
            session.request_suggestion().await,
            SuggestionOutcome::Applied(ref s) if s.number == 12
        ));
        assert_eq!(session.snapshot().selected_number, Some(12));

        let mut saw_started = false;
        let mut saw_applied = false;
        while let Ok(event) = events.try_recv() {
            match event {
                GameEvent::SuggestionStarted { .. } => saw_started = true,
                GameEvent::SuggestionApplied { suggestion, .. } => {
                    saw_applied = suggestion.number == 12
                }
                _ => {}
            }
        }
        assert!(saw_started && saw_applied);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_events_follow_state_order_across_threads() {
        for _ in 0..100 {
            let config = GameConfig {
                round_seconds: 1,
                tick_interval: Duration::from_secs(3600),
                ..GameConfig::default()
            };
            let scheduler = RoundScheduler::with_seed(&config, 7);
            let session = GameSession::enter_with_scheduler(
                config,
                Player::demo(),
                FixedPredictor::new(Duration::ZERO, 1),
                scheduler,
            )
            .unwrap();
            let mut events = session.subscribe();

            let shared = session.shared.clone();
            let ticker = std::thread::spawn(move || {
                for _ in 0..50 {
                    shared.on_tick();
                }
            });
            for _ in 0..50 {
                session.select_number(7);
            }
            ticker.join().unwrap();

            // every round lasts one tick, so each tick settles a period
            let mut current = PeriodId(202310240001);
            while let Ok(event) = events.try_recv() {
                match event {
                    GameEvent::Settled(result) => {
                        assert_eq!(result.period, current.to_string());
                        current = current.next();
                    }
                    GameEvent::SelectionChanged { period, .. } => assert_eq!(period, current),
                    GameEvent::Tick { period, .. } => assert_eq!(period, current),
                    other => panic!("unexpected event {:?}", other),
                }
            }
            assert_eq!(current, PeriodId(202310240051));
        }
    }
}
