//! Compass
//!
//! Headless search results client. Drives the search controller against the
//! configured services and prints the resulting page.
//!
//! # Configuration
//! Set `COMPASS_API` env var or configure in `~/.compass/config.toml`

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use compass::backends::Services;
use compass::cli::{Cli, Commands};
use compass::config::Config;
use compass::controller::view::ViewState;
use compass::navigation::{self, History};
use compass::render::render_plain;
use compass::{SearchController, SearchRuntime, Tab};

fn print_view(view: &ViewState, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
    } else {
        print!("{}", render_plain(view));
    }
    Ok(())
}

async fn run_search(
    runtime: &mut SearchRuntime,
    query: &str,
    tab: Tab,
    pages: u32,
    open: Option<usize>,
) {
    runtime.act(|c| c.select_tab(tab));
    runtime.act(|c| c.mount(&navigation::search_path(query)));
    runtime.settle().await;

    // The image feed follows its own cursors until exhausted
    if tab != Tab::Images {
        for _ in 1..pages {
            if !runtime.view().active_list().is_some_and(|l| l.pager.can_next) {
                break;
            }
            runtime.act(|c| c.next_page());
            runtime.settle().await;
        }
    }

    if let Some(n) = open {
        let url = runtime
            .controller()
            .images()
            .items()
            .get(n.saturating_sub(1))
            .map(|item| item.url.clone());
        match url {
            Some(url) => {
                runtime.act(|c| {
                    c.open_image(&url);
                    Vec::new()
                });
            }
            None => tracing::warn!("No image #{} to open", n),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    compass_common::init_tracing("compass", cli.verbose)?;

    let mut config = Config::load()?;
    if let Some(api) = cli.api.clone() {
        config.search.base_url = api;
    }
    tracing::info!("Search API: {}", config.search.base_url);

    if let Commands::Config = cli.command {
        print!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let services = Services::from_config(&config)?;
    let mut runtime = SearchRuntime::new(
        SearchController::new((&config.ui).into()),
        services,
        Arc::new(History::new()),
        config.ui.debounce(),
    );

    match cli.command {
        Commands::Search {
            query,
            tab,
            pages,
            open,
        } => {
            run_search(&mut runtime, &query, tab, pages, open).await;
            print_view(&runtime.view(), cli.json)?;
        }
        Commands::Suggest { input } => {
            runtime.act(|c| c.input(&input));
            runtime.settle().await;

            let suggestions = runtime.view().suggestions;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&suggestions)?);
            } else {
                for s in suggestions {
                    match s.desc {
                        Some(desc) => println!("{} - {}", s.title, desc),
                        None => println!("{}", s.title),
                    }
                }
            }
        }
        Commands::Config => {}
    }

    runtime.shutdown();
    Ok(())
}
