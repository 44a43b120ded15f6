use std::sync::Arc;
use std::sync::mpsc::TryRecvError;

use eframe::egui::Context;
use tracing::{error, warn};
use word_orbit::collab::{ExportSnapshot, GraphPersistence, SnapshotExporter, spawn_generation};
use word_orbit::mindmap::{AddNodesError, Effect, EngineEvent, NodeId, Step};

use super::{PendingGeneration, Status, StatusKind, ViewModel};

impl ViewModel {
    /// Runs one engine transition and carries out its effect.
    pub(in crate::app) fn dispatch(&mut self, event: EngineEvent) {
        let Step { state, effect } = self.engine.reduce(event);
        self.engine = state;
        if let Some(effect) = effect {
            self.handle_effect(effect);
        }
        self.drop_stale_selection();
    }

    fn handle_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Generate(request) => {
                if self.pending.is_some() {
                    self.set_status(StatusKind::Info, "Still generating the previous request");
                    return;
                }
                let parent_word = request.parent_word.clone();
                let category = request.category;
                self.pending = Some(PendingGeneration {
                    rx: spawn_generation(Arc::clone(&self.generator), request),
                    parent_word,
                    category,
                });
            }
            Effect::NodeClicked(id) => self.select(Some(id)),
            Effect::AddRejected(error) => {
                let text = match &error {
                    AddNodesError::Capacity { limit } => {
                        format!("The map is full ({limit} nodes). Delete something first.")
                    }
                    AddNodesError::Empty => "No new words found.".to_owned(),
                    AddNodesError::Invalid(reason) => format!("Could not add words: {reason}"),
                };
                self.set_status(StatusKind::Error, text);
            }
        }
    }

    pub(in crate::app) fn poll_generation(&mut self, ctx: &Context) {
        let Some(pending) = self.pending.take() else {
            return;
        };

        match pending.rx.try_recv() {
            Ok(reply) => {
                let before = self.engine.graph().len();
                self.dispatch(reply.into_event());
                let added = self.engine.graph().len().saturating_sub(before);
                if added > 0 {
                    self.set_status(
                        StatusKind::Info,
                        format!(
                            "Added {added} {} for \"{}\"",
                            self.engine.config().category_style(pending.category).label,
                            pending.parent_word
                        ),
                    );
                }
            }
            Err(TryRecvError::Empty) => {
                self.pending = Some(pending);
                ctx.request_repaint();
            }
            Err(TryRecvError::Disconnected) => {
                warn!("generation worker exited without replying");
                self.set_status(StatusKind::Error, "Word generation stopped unexpectedly.");
            }
        }
    }

    pub(in crate::app) fn save(&mut self) {
        match self.store.save(self.engine.graph().nodes()) {
            Ok(()) => {
                self.saved = self.engine.graph().clone();
                self.dispatch(EngineEvent::Saved);
                let text = format!("Saved to {}", self.store.path().display());
                self.set_status(StatusKind::Info, text);
            }
            Err(err) => {
                error!(error = %format!("{err:#}"), "save failed");
                self.set_status(StatusKind::Error, format!("Save failed: {err:#}"));
            }
        }
    }

    pub(in crate::app) fn reload(&mut self) {
        match self.store.load() {
            Ok(Some(nodes)) => {
                let before = self.engine.graph().clone();
                self.dispatch(EngineEvent::Loaded(nodes));
                if self.engine.graph().shares_storage(&before) {
                    self.set_status(StatusKind::Error, "The saved map is not a valid tree.");
                } else {
                    self.saved = self.engine.graph().clone();
                    self.set_status(StatusKind::Info, "Reloaded the saved map.");
                }
            }
            Ok(None) => self.set_status(StatusKind::Info, "Nothing saved yet."),
            Err(err) => {
                error!(error = %format!("{err:#}"), "reload failed");
                self.set_status(StatusKind::Error, format!("Reload failed: {err:#}"));
            }
        }
    }

    pub(in crate::app) fn export(&mut self) {
        let snapshot = ExportSnapshot::of(self.engine.graph());
        match self.exporter.export(&snapshot) {
            Ok(path) => self.set_status(StatusKind::Info, format!("Exported {}", path.display())),
            Err(err) => {
                error!(error = %format!("{err:#}"), "export failed");
                self.set_status(StatusKind::Error, format!("Export failed: {err:#}"));
            }
        }
    }

    pub(in crate::app) fn has_unsaved_changes(&self) -> bool {
        !self.engine.graph().shares_storage(&self.saved)
    }

    pub(in crate::app) fn select(&mut self, selected: Option<NodeId>) {
        if self.selected == selected {
            return;
        }

        self.rename = selected
            .as_ref()
            .and_then(|id| self.engine.graph().get(id))
            .map(|node| node.word.clone())
            .unwrap_or_default();
        self.selected = selected;
    }

    fn drop_stale_selection(&mut self) {
        if self
            .selected
            .as_ref()
            .is_some_and(|id| !self.engine.graph().contains(id))
        {
            self.select(None);
        }
    }

    pub(in crate::app) fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(Status {
            kind,
            text: text.into(),
        });
    }
}
