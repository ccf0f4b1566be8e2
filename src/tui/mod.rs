pub mod app;
pub mod colors;
pub mod search;
pub mod table;
pub mod ui;

use crate::config::AppConfig;
use crate::remote::ContactSource;
use std::sync::Arc;

/// Entry point: take over the terminal and run the contact view until quit
pub fn run(source: Arc<dyn ContactSource>, config: &AppConfig) -> crate::Result<()> {
    let mut terminal = ratatui::try_init()?;
    let mut app = app::App::new(source, config);
    let result = app.run(&mut terminal);
    let restored = ratatui::try_restore();
    result?;
    restored?;
    Ok(())
}
