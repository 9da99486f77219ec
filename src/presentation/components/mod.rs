mod banner;
mod calendar;
mod fields;
mod footer;
mod header;
mod layout;
mod popup;

pub use banner::render_banner;
pub use calendar::render_calendar_panel;
pub use fields::render_fields;
pub use footer::render_footer;
pub use header::render_header;
pub use popup::render_popup;
