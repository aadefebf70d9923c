mod app;
mod args;
mod constants;
mod logger;
mod progress;
mod prompt;
mod utils;

use crate::app::App;

#[tokio::main]
async fn main() {
    std::process::exit(App::new().run().await);
}
