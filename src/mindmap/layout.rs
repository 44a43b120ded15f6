//! Radial spoke placement.
//!
//! Every category owns a fixed direction around its parent. Siblings of one
//! (parent, category) group are strung along that spoke so consecutive
//! labels sit exactly `boundary_gap` apart edge to edge.

use eframe::egui::{Pos2, Vec2, vec2};

use crate::config::LayoutConfig;

use super::node::Category;

/// Label width guess used before the renderer has measured any text.
pub fn estimate_width(word: &str, config: &LayoutConfig) -> f32 {
    let chars = word.chars().count() as f32;
    (chars * config.char_width + config.label_padding).max(config.min_label_width)
}

/// Where the first new label on a spoke goes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpokeStart {
    /// Empty spoke: start at the base radius.
    Fresh,
    /// Continue past the current frontier label.
    After { radius: f32, width: f32 },
}

/// Radius from the parent for each word, in order.
pub fn spoke_radii(words: &[String], start: SpokeStart, config: &LayoutConfig) -> Vec<f32> {
    let mut radii = Vec::with_capacity(words.len());
    let mut previous = match start {
        SpokeStart::Fresh => None,
        SpokeStart::After { radius, width } => Some((radius, width)),
    };

    for word in words {
        let width = estimate_width(word, config);
        let radius = match previous {
            None => config.base_radius,
            Some((prev_radius, prev_width)) => {
                prev_radius + (prev_width / 2.0) + config.boundary_gap + (width / 2.0)
            }
        };
        radii.push(radius);
        previous = Some((radius, width));
    }

    radii
}

pub fn spoke_direction(category: Category) -> Vec2 {
    let angle = category.spoke_angle();
    vec2(angle.cos(), angle.sin())
}

/// World positions for `words` laid along `category`'s spoke from `parent`.
pub fn place_on_spoke(
    parent: Pos2,
    category: Category,
    words: &[String],
    start: SpokeStart,
    config: &LayoutConfig,
) -> Vec<Pos2> {
    let direction = spoke_direction(category);
    spoke_radii(words, start, config)
        .into_iter()
        .map(|radius| parent + direction * radius)
        .collect()
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|word| (*word).to_owned()).collect()
    }

    #[test]
    fn width_estimate_respects_minimum() {
        let config = LayoutConfig::default();
        assert_eq!(estimate_width("be", &config), 100.0);
        assert_eq!(estimate_width("alpha", &config), 100.0);
        assert_eq!(estimate_width("wonderful", &config), 9.0 * 12.0 + 32.0);
        assert_eq!(estimate_width("ça", &config), 100.0);
    }

    #[test]
    fn first_spoke_places_words_along_positive_x() {
        let config = LayoutConfig::default();
        let list = words(&["alpha", "be", "gamma"]);
        let positions = place_on_spoke(
            pos2(0.0, 0.0),
            Category::Derivatives,
            &list,
            SpokeStart::Fresh,
            &config,
        );

        let alpha = estimate_width("alpha", &config);
        let be = estimate_width("be", &config);
        let gamma = estimate_width("gamma", &config);
        let second = 250.0 + alpha / 2.0 + 80.0 + be / 2.0;
        let third = second + be / 2.0 + 80.0 + gamma / 2.0;

        assert_eq!(positions.len(), 3);
        assert!((positions[0].x - 250.0).abs() < 1e-4);
        assert!((positions[1].x - second).abs() < 1e-4);
        assert!((positions[2].x - third).abs() < 1e-4);
        for position in positions {
            assert!(position.y.abs() < 1e-4);
        }
    }

    #[test]
    fn continuation_starts_past_the_frontier_label() {
        let config = LayoutConfig::default();
        let list = words(&["extraordinary"]);
        let radii = spoke_radii(
            &list,
            SpokeStart::After {
                radius: 400.0,
                width: 120.0,
            },
            &config,
        );
        let width = estimate_width("extraordinary", &config);
        assert!((radii[0] - (400.0 + 60.0 + 80.0 + width / 2.0)).abs() < 1e-4);
    }

    #[test]
    fn empty_word_list_places_nothing() {
        let config = LayoutConfig::default();
        let positions = place_on_spoke(
            pos2(10.0, 10.0),
            Category::Idioms,
            &[],
            SpokeStart::Fresh,
            &config,
        );
        assert!(positions.is_empty());
    }

    #[test]
    fn spoke_is_offset_from_the_parent() {
        let config = LayoutConfig::default();
        let parent = pos2(-40.0, 75.0);
        let positions = place_on_spoke(
            parent,
            Category::Antonyms,
            &words(&["cold"]),
            SpokeStart::Fresh,
            &config,
        );
        assert!((positions[0].distance(parent) - config.base_radius).abs() < 1e-3);
    }
}
