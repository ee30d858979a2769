use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};

use crate::market::{DataSource, MarketSnapshot, load_snapshot};
use crate::sim::{BubbleScene, PhysicsParams};

mod bubbles;
mod render_utils;
mod search;
mod ui;

pub struct MarketBubblesApp {
    source: DataSource,
    seed: Option<u64>,
    state: AppState,
    reload_rx: Option<Receiver<MarketSnapshot>>,
}

enum AppState {
    Loading { rx: Receiver<MarketSnapshot> },
    Ready(Box<ViewModel>),
}

struct ViewModel {
    snapshot: MarketSnapshot,
    search: String,
    scene: BubbleScene<egui::Id>,
    scene_dirty: bool,
    visible_count: usize,
    pointer_inside: bool,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
}

impl MarketBubblesApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, source: DataSource, seed: Option<u64>) -> Self {
        let state = AppState::Loading {
            rx: Self::spawn_load(source.clone()),
        };
        Self {
            source,
            seed,
            state,
            reload_rx: None,
        }
    }

    /// Loads on a worker thread; the snapshot arrives through the channel.
    /// Loading never fails, it degrades to the fallback dataset.
    fn spawn_load(source: DataSource) -> Receiver<MarketSnapshot> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let _ = tx.send(load_snapshot(&source));
        });

        rx
    }
}

impl eframe::App for MarketBubblesApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(snapshot) => {
                        transition = Some(AppState::Ready(Box::new(ViewModel::new(
                            snapshot, self.seed,
                        ))));
                    }
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        log::error!("market data worker disconnected, using fallback dataset");
                        transition = Some(AppState::Ready(Box::new(ViewModel::new(
                            load_snapshot(&DataSource::Fallback),
                            self.seed,
                        ))));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading market data...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    log::info!("refreshing market data from {}", self.source.label());
                    self.reload_rx = Some(Self::spawn_load(self.source.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(snapshot) => model.replace_snapshot(snapshot),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            log::error!("market data worker disconnected during refresh");
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}

impl ViewModel {
    fn new(snapshot: MarketSnapshot, seed: Option<u64>) -> Self {
        Self {
            snapshot,
            search: String::new(),
            scene: BubbleScene::new(PhysicsParams::default(), seed),
            scene_dirty: true,
            visible_count: 0,
            pointer_inside: false,
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
        }
    }

    /// A finished refresh always rebuilds the bubbles, even when the tickers
    /// did not change.
    fn replace_snapshot(&mut self, snapshot: MarketSnapshot) {
        self.snapshot = snapshot;
        self.scene_dirty = true;
    }

    fn rebuild_scene(&mut self) {
        let filtered = search::filter_records(&self.snapshot.records, &self.search);
        self.visible_count = filtered.len();

        if filtered.is_empty() {
            self.scene.teardown();
        } else {
            self.scene.load(&filtered);
        }
        self.scene_dirty = false;
    }
}
