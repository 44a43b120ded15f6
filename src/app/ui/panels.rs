use std::collections::BTreeMap;
use std::sync::Arc;

use eframe::egui::{self, Align, Color32, Context, Key, KeyboardShortcut, Layout, Modifiers};
use word_orbit::collab::{JsonExporter, JsonFile};
use word_orbit::mindmap::{Category, EngineEvent};

use super::super::{Launch, Session, StatusKind, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(session: Session, launch: &Launch) -> Self {
        let Session { engine, lexicon } = session;
        Self {
            saved: engine.graph().clone(),
            engine,
            store: JsonFile::new(&launch.graph_path),
            exporter: JsonExporter::new(&launch.export_dir, "mindmap"),
            generator: Arc::new(lexicon),
            pending: None,
            selected: None,
            search: String::new(),
            new_word: String::new(),
            new_word_category: Category::Synonyms,
            rename: String::new(),
            status: None,
            touches: BTreeMap::new(),
            pressed_control: None,
        }
    }

    pub(in crate::app) fn show(&mut self, ctx: &Context, launch: &Launch) {
        self.poll_generation(ctx);
        self.handle_shortcuts(ctx);

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("word-orbit");
                    ui.separator();
                    let unsaved = if self.has_unsaved_changes() { " *" } else { "" };
                    ui.label(format!("{}{unsaved}", launch.graph_path.display()));
                    ui.label(format!(
                        "nodes: {} / {}",
                        self.engine.graph().len(),
                        self.engine.config().max_total_nodes
                    ));
                    ui.separator();

                    let history = self.engine.history();
                    let (can_undo, can_redo) = (history.can_undo(), history.can_redo());
                    if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                        self.dispatch(EngineEvent::Undo);
                    }
                    if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                        self.dispatch(EngineEvent::Redo);
                    }
                    if ui.button("Save").clicked() {
                        self.save();
                    }
                    if ui.button("Reload").clicked() {
                        self.reload();
                    }
                    if ui.button("Export").clicked() {
                        self.export();
                    }
                    if ui.button("Reset view").clicked() {
                        self.dispatch(EngineEvent::ResetView);
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if self.pending.is_some() {
                            ui.spinner();
                        }
                        if let Some(status) = &self.status {
                            let color = match status.kind {
                                StatusKind::Info => Color32::from_gray(200),
                                StatusKind::Error => Color32::from_rgb(232, 120, 108),
                            };
                            ui.colored_label(color, status.text.as_str());
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_graph(ui));
    }

    fn handle_shortcuts(&mut self, ctx: &Context) {
        if ctx.wants_keyboard_input() {
            return;
        }

        let redo = KeyboardShortcut::new(Modifiers::COMMAND | Modifiers::SHIFT, Key::Z);
        let redo_alt = KeyboardShortcut::new(Modifiers::COMMAND, Key::Y);
        let undo = KeyboardShortcut::new(Modifiers::COMMAND, Key::Z);
        let save = KeyboardShortcut::new(Modifiers::COMMAND, Key::S);

        let (redo, undo, save, reset) = ctx.input_mut(|input| {
            (
                input.consume_shortcut(&redo) || input.consume_shortcut(&redo_alt),
                input.consume_shortcut(&undo),
                input.consume_shortcut(&save),
                input.consume_key(Modifiers::NONE, Key::Num0),
            )
        });

        if redo {
            self.dispatch(EngineEvent::Redo);
        } else if undo {
            self.dispatch(EngineEvent::Undo);
        }
        if save {
            self.save();
        }
        if reset {
            self.dispatch(EngineEvent::ResetView);
        }
    }
}
