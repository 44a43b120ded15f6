use eframe::egui::{self, RichText, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use word_orbit::mindmap::{Category, EngineEvent, MindGraph, NodeId};

use super::super::render_utils::category_color;
use super::super::ViewModel;

const SEARCH_RESULTS: usize = 12;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

/// Best matches first; ties keep graph order.
fn search_nodes(graph: &MindGraph, query: &str, limit: usize) -> Vec<(NodeId, String)> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default();
    let mut scored = graph
        .nodes()
        .iter()
        .filter_map(|node| {
            fuzzy_match_score(&matcher, &node.word, query)
                .map(|score| (score, node.id.clone(), node.word.clone()))
        })
        .collect::<Vec<_>>();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored
        .into_iter()
        .take(limit)
        .map(|(_, id, word)| (id, word))
        .collect()
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Find");
        ui.add(egui::TextEdit::singleline(&mut self.search).hint_text("search words"));

        let results = search_nodes(self.engine.graph(), &self.search, SEARCH_RESULTS);
        if !self.search.trim().is_empty() && results.is_empty() {
            ui.label("No matching words.");
        }
        for (id, word) in results {
            if ui.link(word).clicked() {
                self.select(Some(id.clone()));
                self.dispatch(EngineEvent::Recenter(id));
            }
        }

        ui.separator();
        let Some(target) = self.expansion_target() else {
            ui.label("The map is empty.");
            return;
        };
        let target_word = self
            .engine
            .graph()
            .get(&target)
            .map(|node| node.word.clone())
            .unwrap_or_default();

        ui.heading("Expand");
        ui.label(RichText::new(format!("Related words for \"{target_word}\"")).weak());
        let busy = self.pending.is_some();
        ui.add_enabled_ui(!busy, |ui| {
            egui::Grid::new("expand_grid")
                .num_columns(3)
                .spacing([6.0, 6.0])
                .show(ui, |ui| {
                    for (index, category) in Category::ALL.into_iter().enumerate() {
                        let style = self.engine.config().category_style(category);
                        let color = category_color(self.engine.config(), Some(category));
                        let button = egui::Button::new(RichText::new(style.label).color(color));
                        if ui.add(button).clicked() {
                            self.dispatch(EngineEvent::RequestExpansion {
                                parent: target.clone(),
                                category,
                            });
                        }
                        if index % 3 == 2 {
                            ui.end_row();
                        }
                    }
                });
        });

        ui.separator();
        ui.heading("Add a word");
        egui::ComboBox::from_id_salt("new_word_category")
            .selected_text(self.engine.config().category_style(self.new_word_category).label)
            .show_ui(ui, |ui| {
                for category in Category::ALL {
                    let label = self.engine.config().category_style(category).label;
                    ui.selectable_value(&mut self.new_word_category, category, label);
                }
            });

        let response = ui.add(egui::TextEdit::singleline(&mut self.new_word).hint_text("word"));
        let submitted =
            response.lost_focus() && ui.input(|input| input.key_pressed(egui::Key::Enter));
        let can_add = !self.new_word.trim().is_empty();
        if (ui.add_enabled(can_add, egui::Button::new("Add")).clicked() || submitted) && can_add {
            let word = std::mem::take(&mut self.new_word);
            self.dispatch(EngineEvent::AddWord {
                parent: target,
                category: self.new_word_category,
                word,
            });
        }
    }

    /// Selected node, falling back to the center.
    pub(in crate::app) fn expansion_target(&self) -> Option<NodeId> {
        self.selected
            .clone()
            .or_else(|| self.engine.graph().center().map(|node| node.id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use word_orbit::config::EngineConfig;
    use word_orbit::mindmap::{EngineState, IdSeq};

    use super::*;

    fn sample() -> MindGraph {
        let state = EngineState::new(
            EngineConfig::default(),
            MindGraph::seeded("light", &mut IdSeq::default()),
        );
        let step = state.reduce(EngineEvent::GenerationCompleted {
            parent: NodeId::new("node-0"),
            category: Category::Synonyms,
            outcome: Ok(vec!["Glow".to_owned(), "gleam".to_owned(), "radiance".to_owned()]),
        });
        step.state.graph().clone()
    }

    #[test]
    fn search_ranks_matches_and_ignores_case() {
        let graph = sample();
        let hits = search_nodes(&graph, "gl", 10);
        let words = hits.iter().map(|(_, word)| word.as_str()).collect::<Vec<_>>();
        assert!(words.contains(&"Glow"));
        assert!(words.contains(&"gleam"));
        assert!(!words.contains(&"radiance"));
    }

    #[test]
    fn blank_query_finds_nothing() {
        assert!(search_nodes(&sample(), "   ", 10).is_empty());
    }

    #[test]
    fn results_are_capped() {
        assert_eq!(search_nodes(&sample(), "a", 1).len(), 1);
    }
}
