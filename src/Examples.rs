/// demonstration route with known numbers
pub mod cost_examples;
