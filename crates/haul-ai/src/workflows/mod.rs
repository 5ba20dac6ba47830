pub mod cost_model;
pub mod inventory;
pub mod load_search;
