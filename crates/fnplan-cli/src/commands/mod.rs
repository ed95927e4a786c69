pub mod resolve;
pub mod scaffold;
