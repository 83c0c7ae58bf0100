// Configuration files: parser syntax settings and template variables

pub mod syntax_settings;
pub mod variables;

pub use syntax_settings::{ParameterQuoting, SyntaxSettings};
pub use variables::{load_variables, parse_assignment, variables_from_str};
