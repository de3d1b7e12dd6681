/// Width (in columns) of the right-hand scene panel.
pub const RIGHT_PANEL_WIDTH: u16 = 28;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Layout {
    pub right_panel_width: u16,
    pub canvas_x: u16,
    pub canvas_y: u16,
    pub canvas_width: u16,
    pub canvas_height: u16,
    pub status_y: u16,
    pub term_width: u16,
}

impl Layout {
    pub fn compute(term_width: u16, term_height: u16) -> Self {
        let menu_h: u16 = 1;
        let status_h: u16 = 1;
        // Narrow terminals drop the panel rather than the canvas.
        let right = if term_width >= RIGHT_PANEL_WIDTH * 2 {
            RIGHT_PANEL_WIDTH
        } else {
            0
        };
        Layout {
            right_panel_width: right,
            canvas_x: 0,
            canvas_y: menu_h,
            canvas_width: term_width.saturating_sub(right),
            canvas_height: term_height.saturating_sub(menu_h + status_h),
            status_y: term_height.saturating_sub(status_h),
            term_width,
        }
    }
}
