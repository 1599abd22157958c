pub(crate) mod bootstrap;
mod features;
mod levels;
mod player;
mod scenes;
mod state;
mod text;
