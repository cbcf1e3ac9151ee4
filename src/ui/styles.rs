use ratatui::style::{Color, Modifier, Style};

pub const PANEL: Color = Color::Rgb(24, 26, 33);
pub const TEXT: Color = Color::Rgb(205, 209, 220);
pub const BRIGHT: Color = Color::Rgb(240, 243, 250);
pub const DIM: Color = Color::Rgb(120, 126, 140);
pub const MUTED: Color = Color::Rgb(90, 95, 108);
pub const CYAN: Color = Color::Rgb(86, 182, 194);
pub const GREEN: Color = Color::Rgb(140, 194, 101);
pub const RED: Color = Color::Rgb(220, 106, 118);
pub const YELLOW: Color = Color::Rgb(226, 192, 120);

pub fn selected_style() -> Style {
    Style::default()
        .bg(Color::Rgb(44, 48, 60))
        .add_modifier(Modifier::BOLD)
}
