use wasm_bindgen::prelude::*;

pub mod bindings;
mod download;
mod media_element;
mod player;
mod requester;
mod utils;

pub use player::{MediaChunkPlayer, MediaSourceReadyState};
pub use utils::logger::{Logger, LoggerLevel};
