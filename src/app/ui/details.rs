use eframe::egui::{self, RichText, Ui};
use word_orbit::mindmap::{EngineEvent, MindGraph, NodeId};

use super::super::ViewModel;

/// Words from the root down to `id`, elided in the middle when long.
fn lineage_label(graph: &MindGraph, id: &NodeId) -> String {
    let mut words = graph
        .ancestors(id)
        .iter()
        .rev()
        .chain(std::iter::once(id))
        .filter_map(|id| graph.get(id).map(|node| node.word.as_str()))
        .collect::<Vec<_>>();

    if words.len() > 8 {
        let tail = words.split_off(words.len() - 3);
        words.truncate(4);
        return format!("{} -> ... -> {}", words.join(" -> "), tail.join(" -> "));
    }
    words.join(" -> ")
}

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection");
        ui.add_space(6.0);
        self.draw_selection(ui);

        ui.separator();
        self.draw_map_stats(ui);
    }

    fn draw_selection(&mut self, ui: &mut Ui) {
        let Some(selected) = self.selected.clone() else {
            ui.label("Click a word on the map to select it.");
            return;
        };
        let graph = self.engine.graph().clone();
        let Some(node) = graph.get(&selected) else {
            ui.label("The selected word is no longer on the map.");
            return;
        };

        let config = self.engine.config();
        let category = node
            .category
            .map(|category| config.category_style(category).label)
            .unwrap_or_else(|| "seed".to_owned());
        let parent = node
            .parent_id
            .as_ref()
            .and_then(|id| graph.get(id))
            .map(|parent| parent.word.clone());
        let children = graph
            .nodes()
            .iter()
            .filter(|child| child.parent_id.as_ref() == Some(&selected))
            .count();

        ui.label(RichText::new(node.word.as_str()).strong().size(18.0));
        ui.small(selected.as_str());
        ui.add_space(6.0);

        egui::Grid::new("selection_facts")
            .num_columns(2)
            .spacing([12.0, 4.0])
            .show(ui, |ui| {
                ui.label("Relation");
                ui.label(category);
                ui.end_row();
                if let Some(parent) = &parent {
                    ui.label("Parent");
                    ui.label(parent.as_str());
                    ui.end_row();
                }
                ui.label("Children");
                ui.label(children.to_string());
                ui.end_row();
                ui.label("Subtree");
                ui.label(graph.descendants(&selected).len().to_string());
                ui.end_row();
            });
        ui.label(RichText::new(lineage_label(&graph, &selected)).weak());

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            let response =
                ui.add(egui::TextEdit::singleline(&mut self.rename).desired_width(160.0));
            let submitted =
                response.lost_focus() && ui.input(|input| input.key_pressed(egui::Key::Enter));
            let changed = self.rename.trim() != node.word && !self.rename.trim().is_empty();
            if (ui.add_enabled(changed, egui::Button::new("Rename")).clicked() || submitted)
                && changed
            {
                self.dispatch(EngineEvent::RenameNode {
                    node: selected.clone(),
                    word: self.rename.clone(),
                });
            }
        });

        ui.horizontal(|ui| {
            let is_center = node.is_center;
            if ui
                .add_enabled(!is_center, egui::Button::new("Recenter"))
                .clicked()
            {
                self.dispatch(EngineEvent::Recenter(selected.clone()));
            }
            let delete = ui
                .add_enabled(!node.is_root(), egui::Button::new("Delete"))
                .on_disabled_hover_text("The seed word cannot be deleted.");
            if delete.clicked() {
                self.dispatch(EngineEvent::DeleteNode(selected.clone()));
            }
        });
    }

    fn draw_map_stats(&self, ui: &mut Ui) {
        let config = self.engine.config();
        let stats = self.engine.graph().stats();
        let history = self.engine.history();

        ui.label(RichText::new("Map").strong());
        ui.label(format!(
            "Words: {} of {}",
            stats.node_count, config.max_total_nodes
        ));
        ui.label(format!("Depth: {}", stats.depth));
        ui.label(format!(
            "History: step {} of {}",
            history.cursor() + 1,
            history.len()
        ));

        if stats.per_category.is_empty() {
            return;
        }
        ui.add_space(4.0);
        for (category, count) in &stats.per_category {
            ui.label(format!("{}: {count}", config.category_style(*category).label));
        }
    }
}

#[cfg(test)]
mod tests {
    use word_orbit::mindmap::{Category, IdSeq, Node};

    use super::*;

    fn chain(len: usize) -> MindGraph {
        let mut nodes = vec![Node::seed(NodeId::new("node-0"), "w0")];
        for index in 1..len {
            let mut node = Node::seed(NodeId::new(format!("node-{index}")), format!("w{index}"));
            node.parent_id = Some(NodeId::new(format!("node-{}", index - 1)));
            node.category = Some(Category::Synonyms);
            node.is_center = false;
            nodes.push(node);
        }
        match MindGraph::from_nodes(nodes) {
            Ok(graph) => graph,
            Err(error) => panic!("chain should be valid: {error}"),
        }
    }

    #[test]
    fn lineage_runs_from_the_seed() {
        let graph = chain(3);
        assert_eq!(lineage_label(&graph, &NodeId::new("node-2")), "w0 -> w1 -> w2");
    }

    #[test]
    fn long_lineages_are_elided() {
        let graph = chain(12);
        assert_eq!(
            lineage_label(&graph, &NodeId::new("node-11")),
            "w0 -> w1 -> w2 -> w3 -> ... -> w9 -> w10 -> w11"
        );
    }

    #[test]
    fn seed_lineage_is_just_the_seed() {
        let graph = MindGraph::seeded("light", &mut IdSeq::default());
        assert_eq!(lineage_label(&graph, &NodeId::new("node-0")), "light");
    }
}
