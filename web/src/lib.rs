use clap::Parser;
use wasm_bindgen::prelude::*;

mod board;
mod chart;
mod game;
mod menu;
mod panel;
mod settings;
mod theme;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    #[command(flatten)]
    game: game::GameProps,
}

#[wasm_bindgen(start)]
pub fn run_app() {
    use gloo::utils::{document, window};

    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let location_hash = window()
        .location()
        .hash()
        .unwrap_or_else(|_| "".to_string());

    let args = match Args::try_parse_from(location_hash.split(['#', '&'])) {
        Ok(args) => args,
        Err(err) => {
            console_log::init_with_level(log::Level::Warn).expect("Error initializing logger");
            log::warn!("ignoring url arguments: {}", err);
            Args::parse_from([""])
        }
    };
    if let Some(log_level) = args.verbose.log_level() {
        // a logger may already be installed by the fallback above
        let _ = console_log::init_with_level(log_level);
    }
    log::debug!("args: {:?}", args);

    theme::Theme::apply(args.game.theme);

    let root = document()
        .get_element_by_id("game")
        .expect("Could not find id=\"game\" element");

    log::debug!("App started");
    yew::Renderer::<game::GameView>::with_root_and_props(root, args.game).render();
}
