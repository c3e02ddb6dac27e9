mod allocator;
mod app;
mod cancel;
mod config;
mod error;
mod format;
mod oracle;
mod padding;
mod secret;
mod types;
mod ui;
mod wallet;
mod worker;

use crate::app::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    App::init()?.execute().await
}
