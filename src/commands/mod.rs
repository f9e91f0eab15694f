pub mod compare;
pub mod extract;
pub mod show;
pub mod status;
