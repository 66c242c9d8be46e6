//! Plain text rendering of the view state
//!
//! No colors or special formatting. Pure function of [`ViewState`].

use std::fmt::Write;

use crate::controller::panel::KnowledgePanel;
use crate::controller::view::{ImagesView, ListView, ViewState};
use crate::types::Tab;

/// Render the active tab as text
pub fn render_plain(view: &ViewState) -> String {
    let mut out = String::new();

    let tabs: Vec<String> = Tab::ALL
        .iter()
        .map(|t| {
            if *t == view.tab {
                format!("[{}]", t.label())
            } else {
                t.label().to_string()
            }
        })
        .collect();
    let _ = writeln!(out, "Search: {}", view.query);
    let _ = writeln!(out, "{}", tabs.join("  "));
    if view.any_loading {
        let _ = writeln!(out, "Loading...");
    }
    if let Some(error) = &view.error {
        let _ = writeln!(out, "Error: {}", error);
    }
    out.push('\n');

    match view.tab {
        Tab::All => {
            render_list(&mut out, &view.web, "No results");
            render_panel(&mut out, &view.panel);
        }
        Tab::News => render_list(&mut out, &view.news, "No news found"),
        Tab::Videos => render_list(&mut out, &view.videos, "No videos found"),
        Tab::Images => render_images(&mut out, &view.images),
    }

    out
}

fn render_list(out: &mut String, list: &ListView, empty: &str) {
    for (i, row) in list.rows.iter().enumerate() {
        let _ = writeln!(out, "{:>2}. {}", i + 1, row.title);
        let _ = writeln!(out, "    {}", row.url);
        if let Some(snippet) = &row.snippet {
            let _ = writeln!(out, "    {}", snippet);
        }
        let _ = writeln!(out, "    [{}]", row.source_label);
    }

    if list.no_results {
        let _ = writeln!(out, "{}", empty);
    }

    let prev = if list.pager.can_prev { "<- Previous" } else { "   " };
    let next = if list.pager.can_next { "Next ->" } else { "" };
    let _ = writeln!(out, "\n{}  Page {}  {}", prev, list.pager.page, next);
}

fn render_panel(out: &mut String, panel: &KnowledgePanel) {
    let Some(data) = panel.data() else {
        return;
    };

    let _ = writeln!(out, "\n== {} ==", data.title);
    if let Some(description) = &data.description {
        let _ = writeln!(out, "{}", description);
    }
    if let Some(extract) = &data.extract {
        let _ = writeln!(out, "{}", extract);
    }
    if let Some(thumb) = &data.thumb {
        let _ = writeln!(out, "({})", thumb);
    }
}

fn render_images(out: &mut String, images: &ImagesView) {
    for card in &images.cards {
        let marker = if card.selected { "*" } else { "-" };
        let _ = writeln!(out, "{} {} [{}]", marker, card.title, card.source_label);
        let _ = writeln!(out, "  {}", card.src);
    }

    if images.skeletons > 0 {
        let _ = writeln!(out, "({} more loading)", images.skeletons);
    }
    if images.no_images {
        let _ = writeln!(out, "No images found");
    }
    if images.end_of_results {
        let _ = writeln!(out, "You have reached the end of the pictures");
    }
    if let Some(viewer) = &images.viewer {
        let _ = writeln!(out, "\nViewing: {} ({})", viewer.title, viewer.source_label);
        let _ = writeln!(out, "Visit: {}", viewer.url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{Event, SearchController};
    use crate::types::{ResultItem, ResultType, SearchPage};

    fn loaded_controller() -> SearchController {
        let mut controller = SearchController::default();
        let commands = controller.mount("/search?q=Paris");
        let seq = commands
            .iter()
            .find_map(|c| match c {
                crate::controller::Command::Search { seq, .. } => Some(*seq),
                _ => None,
            })
            .unwrap();
        controller.apply(Event::SearchCompleted {
            kind: ResultType::Web,
            seq,
            result: Ok(SearchPage {
                results: vec![ResultItem {
                    title: "Paris".into(),
                    url: "https://a.com/1".into(),
                    snippet: Some("City of light".into()),
                    source: "a.com".into(),
                    thumb: Some("https://a.com/p.jpg".into()),
                    display_link: None,
                }],
                next_cursor: Some("c2".into()),
            }),
        });
        controller
    }

    #[test]
    fn test_renders_web_results_and_pager() {
        let text = render_plain(&loaded_controller().view());
        assert!(text.contains("[All]"));
        assert!(text.contains(" 1. Paris"));
        assert!(text.contains("City of light"));
        assert!(text.contains("Page 1  Next ->"));
        assert!(!text.contains("<- Previous"));
        // Summary lookup still pending, first result has a thumbnail
        assert!(text.contains("== Paris =="));
    }

    #[test]
    fn test_renders_empty_images_state() {
        let mut controller = SearchController::default();
        controller.select_tab(Tab::Images);
        // Nothing fetched yet
        assert!(!render_plain(&controller.view()).contains("No images found"));

        let seq = controller
            .mount("/search?q=zzz")
            .iter()
            .find_map(|c| match c {
                crate::controller::Command::Search { seq, .. } => Some(*seq),
                _ => None,
            })
            .unwrap();
        let follow_up = controller.apply(Event::SearchCompleted {
            kind: ResultType::Images,
            seq,
            result: Ok(SearchPage::default()),
        });
        assert!(follow_up.is_empty());

        let text = render_plain(&controller.view());
        assert!(text.contains("[Images]"));
        assert!(text.contains("No images found"));
        assert!(!text.contains("end of the pictures"));
    }
}
