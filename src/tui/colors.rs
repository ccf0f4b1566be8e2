use crate::diagnostics::ConnectionStatus;
use ratatui::style::Color;

pub const BAR_BG: Color = Color::Rgb(0, 95, 135);
pub const STRIP_BG: Color = Color::Rgb(40, 40, 50);
pub const SELECTED_BG: Color = Color::Rgb(60, 60, 80);
pub const STRIPE_BG: Color = Color::Rgb(25, 25, 35);

pub fn connection_color(status: ConnectionStatus) -> Color {
    match status {
        ConnectionStatus::Unknown => Color::Yellow,
        ConnectionStatus::Connected => Color::Green,
        ConnectionStatus::Failed => Color::Red,
    }
}
