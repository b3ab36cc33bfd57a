pub mod compass;
pub mod label_encoder;
