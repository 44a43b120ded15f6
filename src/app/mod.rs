use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::Context as _;
use eframe::egui::{self, Context, Pos2};
use tracing::{info, warn};
use word_orbit::collab::{
    GenerationReply, GraphPersistence, JsonExporter, JsonFile, Lexicon, WordGenerator,
};
use word_orbit::config::EngineConfig;
use word_orbit::mindmap::{Category, EngineState, MindGraph, NodeId};

mod actions;
mod graph;
mod render_utils;
mod ui;

/// Paths and seed word the app was started with.
#[derive(Clone, Debug)]
pub struct Launch {
    pub graph_path: PathBuf,
    pub seed: String,
    pub lexicon_path: PathBuf,
    pub config_path: Option<PathBuf>,
    pub export_dir: PathBuf,
}

pub struct MindMapApp {
    launch: Launch,
    state: AppState,
}

enum AppState {
    Loading {
        rx: Receiver<Result<Session, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct Session {
    engine: EngineState,
    lexicon: Lexicon,
}

struct PendingGeneration {
    rx: Receiver<GenerationReply>,
    parent_word: String,
    category: Category,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StatusKind {
    Info,
    Error,
}

struct Status {
    kind: StatusKind,
    text: String,
}

/// Clickable affordances drawn on top of nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Control {
    Delete(NodeId),
    MoreWords { parent: NodeId, category: Category },
}

struct ViewModel {
    engine: EngineState,
    saved: MindGraph,
    store: JsonFile,
    exporter: JsonExporter,
    generator: Arc<dyn WordGenerator>,
    pending: Option<PendingGeneration>,
    selected: Option<NodeId>,
    search: String,
    new_word: String,
    new_word_category: Category,
    rename: String,
    status: Option<Status>,
    touches: BTreeMap<u64, Pos2>,
    pressed_control: Option<Control>,
}

impl MindMapApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, launch: Launch) -> Self {
        let state = Self::start_load(launch.clone());
        Self { launch, state }
    }

    fn spawn_load(launch: Launch) -> Receiver<Result<Session, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_session(&launch).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(launch: Launch) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(launch),
        }
    }
}

fn load_session(launch: &Launch) -> anyhow::Result<Session> {
    let config = EngineConfig::load(launch.config_path.as_deref())?;

    let lexicon = if launch.lexicon_path.exists() {
        Lexicon::load(&launch.lexicon_path)?
    } else {
        warn!(path = %launch.lexicon_path.display(), "lexicon not found, expansions will be empty");
        Lexicon::default()
    };

    let store = JsonFile::new(&launch.graph_path);
    let engine = match store.load()? {
        Some(nodes) => {
            let graph = MindGraph::from_nodes(nodes).with_context(|| {
                format!("{} does not hold a valid mind map", launch.graph_path.display())
            })?;
            EngineState::new(config, graph)
        }
        None => {
            info!(seed = %launch.seed, "starting a fresh map");
            EngineState::seeded(config, &launch.seed)
        }
    };

    Ok(Session { engine, lexicon })
}

impl eframe::App for MindMapApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok(session)) => {
                        transition = Some(AppState::Ready(Box::new(ViewModel::new(
                            session,
                            &self.launch,
                        ))));
                    }
                    Ok(Err(error)) => transition = Some(AppState::Error(error)),
                    Err(TryRecvError::Empty) => {}
                    Err(TryRecvError::Disconnected) => {
                        transition =
                            Some(AppState::Error("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading mind map...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to open the mind map");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.launch.clone()));
                    }
                });
            }
            AppState::Ready(model) => model.show(ctx, &self.launch),
        }

        if let Some(next_state) = transition {
            self.state = next_state;
        }
    }
}
