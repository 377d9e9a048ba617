#[allow(non_snake_case)]
pub mod Preview;
#[allow(non_snake_case)]
pub mod Rendering;
#[allow(non_snake_case)]
pub mod Service;
pub mod cli;
pub mod settings;
