pub mod menu;
pub mod order;
pub mod pizza;
pub mod selection;
