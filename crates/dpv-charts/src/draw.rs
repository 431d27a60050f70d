//! Backend-agnostic drawing helpers.

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use dpv_core::DpvError;

/// Folds any drawing-layer failure into a coded chart error.
pub(crate) fn draw_err(err: impl std::fmt::Display) -> DpvError {
    DpvError::chart("draw-failed", err.to_string())
}

/// Fills a panel with a centered title and message, the stand-in used when a
/// panel has no drawable data.
pub(crate) fn draw_placeholder<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    message: &str,
) -> Result<(), DpvError> {
    let (width, height) = area.dim_in_pixel();
    let center_x = width as i32 / 2;
    let title_style = ("sans-serif", 56)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    area.draw(&Text::new(title.to_string(), (center_x, 90), title_style))
        .map_err(draw_err)?;
    let body_style = ("sans-serif", 44)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    let base_y = height as i32 / 2;
    for (idx, line) in message.split('\n').enumerate() {
        area.draw(&Text::new(
            line.to_string(),
            (center_x, base_y + idx as i32 * 56),
            body_style.clone(),
        ))
        .map_err(draw_err)?;
    }
    Ok(())
}
