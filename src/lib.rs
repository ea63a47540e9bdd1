pub mod solver {
    pub mod problem;
    pub mod tableau;
    pub mod pivot;
    pub mod driver;
}
pub mod facade {
    pub mod backend;
    pub mod program_builder;
}
pub mod display {
    pub mod render;
    pub mod table;
    pub mod report;
}
pub mod json;
