pub mod anim;
pub mod catalog;
pub mod color;
pub mod layout;
pub mod models;
pub mod nav;
pub mod weather;
