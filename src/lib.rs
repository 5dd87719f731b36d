pub mod math;
pub mod scene;
pub mod validation;
pub mod ymap;
