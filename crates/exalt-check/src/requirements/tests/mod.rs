mod common;
mod loader;
mod routing;
