pub mod extraction;
pub mod submissions;
