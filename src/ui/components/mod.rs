pub mod history_view;
pub mod stat_view;
pub mod typing_area;
