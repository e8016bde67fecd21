pub mod gae;
