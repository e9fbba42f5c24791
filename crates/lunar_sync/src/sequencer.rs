//! Plays the scoring events of one move on a single timeline.

use crate::config::AnimationTimings;
use crate::display::DisplayModel;
use crate::surface::{PresentationSurface, TokenOrigin};
use lunar_core::{chain_edges, CycleScore, Event, NodeId, PairScore, PlayerId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Shared "a timeline is running" flag.
///
/// Cloneable so a surface or test can observe it while the sequencer owns the
/// writes.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    /// Creates a cleared flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true while a timeline runs.
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn raise(&self) -> BusyGuard<'_> {
        self.0.store(true, Ordering::SeqCst);
        BusyGuard(self)
    }
}

/// Clears the flag when the timeline ends, including when its future is dropped.
struct BusyGuard<'a>(&'a BusyFlag);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        (self.0).0.store(false, Ordering::SeqCst);
    }
}

/// Which mark a pair event registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PairKind {
    Phase,
    FullMoon,
}

/// Turns an ordered event list into surface calls separated by delays.
#[derive(Debug, Clone)]
pub struct AnimationSequencer {
    timings: AnimationTimings,
    busy: BusyFlag,
}

impl AnimationSequencer {
    /// Creates a sequencer with the given delays.
    pub fn new(timings: AnimationTimings) -> Self {
        Self {
            timings,
            busy: BusyFlag::new(),
        }
    }

    /// Handle to the busy flag.
    pub fn busy_flag(&self) -> BusyFlag {
        self.busy.clone()
    }

    /// Returns true while a timeline runs.
    pub fn is_animating(&self) -> bool {
        self.busy.is_set()
    }

    /// The configured delays.
    pub fn timings(&self) -> &AnimationTimings {
        &self.timings
    }

    /// Plays every event in order, each to completion before the next starts.
    ///
    /// An empty list returns at once without raising the busy flag.
    #[instrument(skip_all, fields(events = events.len()))]
    pub async fn play<S>(&self, events: &[Event], surface: &mut S, display: &mut DisplayModel)
    where
        S: PresentationSurface + ?Sized,
    {
        if events.is_empty() {
            return;
        }

        let _busy = self.busy.raise();
        info!("Animation started");
        for (index, event) in events.iter().enumerate() {
            debug!(index, kind = event.kind(), "Playing event");
            match event {
                Event::PhasePair(score) => {
                    self.play_pair(score, PairKind::Phase, surface, display).await
                }
                Event::FullMoonPair(score) => {
                    self.play_pair(score, PairKind::FullMoon, surface, display).await
                }
                Event::LunarCycle(cycle) => self.play_cycle(cycle, surface, display).await,
                Event::Unrecognized => {
                    warn!(index, "Unknown event kind, skipping");
                    pause(self.timings.unknown_event()).await;
                }
            }
        }
        info!("Animation finished");
    }

    async fn play_pair<S>(
        &self,
        score: &PairScore,
        kind: PairKind,
        surface: &mut S,
        display: &mut DisplayModel,
    ) where
        S: PresentationSurface + ?Sized,
    {
        let [a, b] = score.pair();
        surface.highlight_nodes(score.pair());
        pause(self.timings.settle()).await;

        match kind {
            PairKind::Phase => display.add_phase_mark(a, b),
            PairKind::FullMoon => display.add_full_moon_mark(a, b),
        };
        surface.draw_connections(display);

        let origin = TokenOrigin::Midpoint(score.pair().clone());
        for _ in 0..*score.points() {
            self.score_token(&origin, *score.player(), surface, display).await;
        }
    }

    async fn play_cycle<S>(&self, cycle: &CycleScore, surface: &mut S, display: &mut DisplayModel)
    where
        S: PresentationSurface + ?Sized,
    {
        surface.highlight_nodes(cycle.chain());
        pause(self.timings.settle()).await;

        for edge in chain_edges(cycle.chain()) {
            surface.draw_edge(&edge);
            pause(self.timings.edge()).await;
        }
        let added = display.add_chain(cycle.chain());
        debug!(added, "Cycle edges persisted");
        surface.draw_connections(display);

        for node in cycle.chain() {
            let origin = TokenOrigin::Node(NodeId::clone(node));
            self.score_token(&origin, *cycle.player(), surface, display).await;
        }
    }

    async fn score_token<S>(
        &self,
        origin: &TokenOrigin,
        player: PlayerId,
        surface: &mut S,
        display: &mut DisplayModel,
    ) where
        S: PresentationSurface + ?Sized,
    {
        surface.launch_score_token(origin, player);
        pause(self.timings.token()).await;
        let score = display.bump_score(player);
        debug!(player = %player, score, "Score token landed");
        surface.update_scores(display.scores());
    }
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
