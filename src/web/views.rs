pub mod point;
pub mod r#static;
pub mod vars;
pub mod viz;
