use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::Context as _;
use eframe::egui::{self, Context};
use tracing::{info, warn};

use crate::notes::{CategoryTaxonomy, Note, load_notes, load_taxonomy};
use crate::view::{RenderConfig, RenderOutcome};

mod graph;
mod render_utils;
mod ui;

/// Where the app reads its notes and taxonomy from.
#[derive(Clone, Debug)]
pub struct NoteSource {
    pub notes: PathBuf,
    pub taxonomy: Option<PathBuf>,
}

impl NoteSource {
    fn load(&self) -> anyhow::Result<LoadedNotes> {
        let taxonomy = match &self.taxonomy {
            Some(path) => load_taxonomy(path)
                .with_context(|| format!("failed to load taxonomy {}", path.display()))?,
            None => CategoryTaxonomy::default(),
        };
        let notes = load_notes(&self.notes)
            .with_context(|| format!("failed to load notes {}", self.notes.display()))?;
        info!(
            notes = notes.len(),
            path = %self.notes.display(),
            "loaded notes"
        );
        Ok(LoadedNotes { notes, taxonomy })
    }
}

struct LoadedNotes {
    notes: Vec<Note>,
    taxonomy: CategoryTaxonomy,
}

type LoadResult = Result<LoadedNotes, String>;

pub struct ConstellationApp {
    source: NoteSource,
    config: RenderConfig,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    notes: Vec<Note>,
    taxonomy: CategoryTaxonomy,
    config: RenderConfig,
    /// Built lazily once the canvas size is known; dropped to re-render.
    view: Option<RenderOutcome>,
    search: String,
    search_match_cache: Option<SearchMatchCache>,
    selected: Option<String>,
    fullscreen: bool,
}

struct SearchMatchCache {
    query: String,
    matches: Arc<HashSet<usize>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ToolbarAction {
    ZoomIn,
    ZoomOut,
    Fit,
    ToggleFullscreen,
}

impl ConstellationApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, source: NoteSource, config: RenderConfig) -> Self {
        let state = Self::start_load(source.clone());
        Self {
            source,
            config,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(source: NoteSource) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = source.load().map_err(|error| format!("{error:#}"));
            if tx.send(result).is_err() {
                warn!("note load finished after the window closed");
            }
        });

        rx
    }

    fn start_load(source: NoteSource) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(source),
        }
    }

    fn ready(&self, loaded: LoadedNotes) -> AppState {
        AppState::Ready(Box::new(ViewModel::new(
            loaded.notes,
            loaded.taxonomy,
            self.config.clone(),
        )))
    }
}

impl eframe::App for ConstellationApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;
        let mut retry = false;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(result) => {
                        transition = Some(result);
                    }
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(Err("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading notes...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load notes");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    retry = ui.button("Retry").clicked();
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                let source_label = self.source.notes.display().to_string();
                model.show(ctx, &source_label, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    info!("reloading notes");
                    self.reload_rx = Some(Self::spawn_load(self.source.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition = Some(result);
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(Err("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if retry {
            self.state = Self::start_load(self.source.clone());
        }

        if let Some(result) = transition {
            self.reload_rx = None;
            self.state = match result {
                Ok(loaded) => self.ready(loaded),
                Err(error) => {
                    warn!(%error, "note load failed");
                    AppState::Error(error)
                }
            };
        }
    }
}
